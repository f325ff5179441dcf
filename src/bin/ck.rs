extern crate calkeys as lib;

use chrono::{Local, NaiveDate};
use flexi_logger::{FileSpec, Logger};
use itertools::Itertools;
use lib::grid::GridMatrix;
use lib::navigation::{Navigator, Reply};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "ck",
    about = "Calkeys - render calendar keyboards and answer their payloads."
)]
pub struct Args {
    #[structopt(help = "payload of a clicked button, e.g. calendar/nxm_00.06.2023")]
    pub payload: Option<String>,

    #[structopt(
        short = "d",
        long = "date",
        help = "reference day as YYYY-MM-DD (default: today)"
    )]
    pub date: Option<NaiveDate>,

    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(short = "p", long = "payloads", help = "print the payload of every button")]
    pub payloads: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn print_grid(grid: &GridMatrix, payloads: bool) {
    let width = grid
        .rows()
        .iter()
        .flat_map(|row| row.buttons())
        .map(|button| button.label.chars().count())
        .max()
        .unwrap_or(0);

    for row in grid.rows() {
        println!(
            "{}",
            row.buttons()
                .iter()
                .map(|button| format!("{:>width$}", button.label, width = width))
                .join(" ")
        );
        if payloads {
            println!(
                "  {}",
                row.buttons().iter().map(|button| &button.payload).join(" ")
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let navigator = Navigator::new(&config);

    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let payload = args.payload.unwrap_or_default();

    match navigator.process(&payload, &today) {
        Reply::Grid(grid) => print_grid(&grid, args.payloads),
        Reply::Selected(selection) => {
            if selection.unselectable {
                println!("selected {} (unselectable)", selection.date);
            } else {
                println!("selected {}", selection.date);
            }
        }
        Reply::Empty => {}
    }

    Ok(())
}
