use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::decorator::{DecorationSet, UnselectableRule};
use crate::error::{Error, ErrorKind, Result};

const CONFIG_PATH_ENV_VAR: &str = "CALKEYS_CONFIG_FILE";

/// Widest year picker row: backward plus forward years, the centre year excluded.
pub const MAX_YEAR_SPAN: u8 = 6;

const DEFAULT_DAY_NAMES: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
const DEFAULT_MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::with_capacity(3);

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("calkeys").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".calkeys.toml"));
    }

    locations
}

/// Loads the config at `path` or, without one, the first existing file out of the
/// usual locations. Falls back to the default config if there is none.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_config_file(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => load_config_file(&location),
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn load_config_file(path: &Path) -> Result<Config> {
    log::debug!("Loading config from '{}'", path.display());

    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    Ok(config)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFile")]
pub struct Config {
    pub day_names: [String; 7],
    pub month_names: [String; 12],
    pub years_backward: u8,
    pub years_forward: u8,
    pub home_label: String,
    pub decorations: DecorationSet,
    pub unselectable: UnselectableRule,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            day_names: DEFAULT_DAY_NAMES.map(str::to_owned),
            month_names: DEFAULT_MONTH_NAMES.map(str::to_owned),
            years_backward: 3,
            years_forward: 3,
            home_label: "🏠".to_owned(),
            decorations: DecorationSet::default(),
            unselectable: UnselectableRule::default(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        let span = u16::from(self.years_backward) + u16::from(self.years_forward);

        if span > u16::from(MAX_YEAR_SPAN) {
            log::warn!(
                "Rejecting config with {} + {} selectable years",
                self.years_backward,
                self.years_forward
            );
            return Err(Error::new(
                ErrorKind::YearRangeTooWide,
                &format!(
                    "{} years backward and {} years forward exceed the maximum of {}",
                    self.years_backward, self.years_forward, MAX_YEAR_SPAN
                ),
            ));
        }

        Ok(())
    }

    /// Name of month `number` in 1..=12.
    pub fn month_name(&self, number: u32) -> &str {
        number
            .checked_sub(1)
            .and_then(|idx| self.month_names.get(idx as usize))
            .map_or("", String::as_str)
    }
}

/// On-disk form of [`Config`]. Missing keys take their default.
#[derive(Deserialize)]
#[serde(default)]
struct ConfigFile {
    day_names: [String; 7],
    month_names: [String; 12],
    years_backward: u8,
    years_forward: u8,
    home_label: String,
    decorations: DecorationSet,
    unselectable: UnselectableRule,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let config = Config::default();

        ConfigFile {
            day_names: config.day_names,
            month_names: config.month_names,
            years_backward: config.years_backward,
            years_forward: config.years_forward,
            home_label: config.home_label,
            decorations: config.decorations,
            unselectable: config.unselectable,
        }
    }
}

impl TryFrom<ConfigFile> for Config {
    type Error = Error;

    fn try_from(file: ConfigFile) -> Result<Self> {
        let config = Config {
            day_names: file.day_names,
            month_names: file.month_names,
            years_backward: file.years_backward,
            years_forward: file.years_forward,
            home_label: file.home_label,
            decorations: file.decorations,
            unselectable: file.unselectable,
        };

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn day_names<S: Into<String>>(mut self, names: [S; 7]) -> Self {
        self.config.day_names = names.map(Into::into);
        self
    }

    pub fn month_names<S: Into<String>>(mut self, names: [S; 12]) -> Self {
        self.config.month_names = names.map(Into::into);
        self
    }

    pub fn years_backward(mut self, years: u8) -> Self {
        self.config.years_backward = years;
        self
    }

    pub fn years_forward(mut self, years: u8) -> Self {
        self.config.years_forward = years;
        self
    }

    pub fn home_label<S: Into<String>>(mut self, label: S) -> Self {
        self.config.home_label = label.into();
        self
    }

    pub fn decorations(mut self, decorations: DecorationSet) -> Self {
        self.config.decorations = decorations;
        self
    }

    pub fn unselectable(mut self, rule: UnselectableRule) -> Self {
        self.config.unselectable = rule;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// A config that can be replaced while others keep rendering with the
/// snapshot they already hold.
#[derive(Debug, Default)]
pub struct SharedConfig {
    inner: RwLock<Arc<Config>>,
}

impl SharedConfig {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(SharedConfig {
            inner: RwLock::new(Arc::new(config)),
        })
    }

    pub fn snapshot(&self) -> Arc<Config> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn replace(&self, config: Config) -> Result<()> {
        config.validate()?;

        let config = Arc::new(config);
        match self.inner.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }

        Ok(())
    }
}
