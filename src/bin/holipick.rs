extern crate holipick as lib;

use chrono::Local;
use flexi_logger::{FileSpec, Logger};
use lib::events::Event;
use lib::holiday::HolidayCatalog;
use lib::picker::Picker;
use lib::ui::MonthView;
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "holipick",
    about = "Shows a month calendar with holidays and Sundays highlighted."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        long = "holidays",
        help = "holiday file, one '<YYYY-MM-DD> <true|false>' record per line",
        parse(from_os_str)
    )]
    pub holidays: Option<PathBuf>,

    #[structopt(short = "y", long = "year", help = "year to show")]
    pub year: Option<i32>,

    #[structopt(short = "m", long = "month", help = "month to show (1-12)")]
    pub month: Option<i32>,

    #[structopt(short = "s", long = "select", help = "date to select as DD/MM/YYYY")]
    pub select: Option<String>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
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

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let catalog = args
        .holidays
        .or(config.holidays)
        .map(|path| HolidayCatalog::load(&path))
        .unwrap_or_default();

    let mut picker = Picker::new(Local::now().date_naive(), &catalog, config.week_start)?;

    if let Some(year) = args.year {
        picker = picker.update(Event::YearChanged(year), &catalog);
    }

    if let Some(month) = args.month {
        picker = picker.update(Event::MonthChanged(month - 1), &catalog);
    }

    if let Some(text) = args.select {
        if let Err(e) = lib::calendar::parse_date(&text) {
            log::error!("{}", e);
        }
        picker = picker.update(Event::DateTyped(text), &catalog);
    }

    let view = MonthView::new(picker.grid(), picker.selection()).colored(termion::is_tty(&stdout()));
    print!("{}", view);

    if !picker.input().is_empty() {
        println!("Selected: {}", picker.input());
    }

    Ok(())
}
