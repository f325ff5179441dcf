use std::convert::From;
use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    YearRangeTooWide,
    InvalidDate,
    ConfigParse,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(
            ErrorKind::ConfigParse,
            &format!("Could not parse config: {}", toml_error),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::YearRangeTooWide => "year picker range too wide".to_owned(),
            ErrorKind::InvalidDate => "invalid date".to_owned(),
            ErrorKind::ConfigParse => "invalid configuration".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = Error::new(ErrorKind::YearRangeTooWide, "4 + 3 > 6");
        assert_eq!(err.to_string(), "year picker range too wide: 4 + 3 > 6");

        let err = Error::from(ErrorKind::InvalidDate);
        assert_eq!(err.to_string(), "invalid date");
    }

    #[test]
    fn io_error_keeps_its_description() {
        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        assert!(matches!(err.kind, ErrorKind::IOError(_)));
        assert_eq!(err.to_string(), "no such file");
    }
}
