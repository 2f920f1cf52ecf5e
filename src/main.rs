mod app;
mod help;
mod jumpto;
use crate::app::App;
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use swipecal::calendar::{CalendarConfig, CalendarFormat, CalendarState};
use swipecal::events::EventMap;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    start_date: Option<Date>,
    selected: Option<Date>,
    today: Option<Date>,
    weekly: bool,
    week_start: Option<u8>,
    events: Option<PathBuf>,
    controls: bool,
    no_scroll: bool,
    indicators: bool,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('w') | Arg::Long("weekly") => opts.weekly = true,
                Arg::Long("week-start") => opts.week_start = Some(parser.value()?.parse()?),
                Arg::Long("selected") => opts.selected = Some(parse_date(parser.value()?)?),
                Arg::Long("today") => opts.today = Some(parse_date(parser.value()?)?),
                Arg::Short('e') | Arg::Long("events") => {
                    opts.events = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('c') | Arg::Long("controls") => opts.controls = true,
                Arg::Long("no-scroll") => opts.no_scroll = true,
                Arg::Long("indicators") => opts.indicators = true,
                Arg::Long("log-file") => opts.log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if opts.start_date.is_none() => {
                    opts.start_date = Some(parse_date(value)?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(path) = &opts.log_file {
                    init_logging(path)?;
                }
                let today = match opts.today {
                    Some(d) => d,
                    None => OffsetDateTime::now_local()
                        .context("failed to determine local date")?
                        .date(),
                };
                let config = opts.config()?;
                log::info!(
                    "Starting with today = {today}, {} event date(s)",
                    config.events_map().len()
                );
                let calendar = CalendarState::new(today, config);
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(calendar).run(&mut terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: swipecal [<options>] [YYYY-MM-DD]");
                println!();
                println!("Swipeable month/week terminal calendar");
                println!();
                println!("Options:");
                println!("  -w, --weekly            Start in weekly format");
                println!("      --week-start <N>    First day of the week (0 = Sunday ... 6 = Saturday)");
                println!("      --selected <DATE>   Initially selected date");
                println!("      --today <DATE>      Use DATE as today's date");
                println!("  -e, --events <FILE>     Load event dates from a JSON file");
                println!("  -c, --controls          Show Prev/Next controls");
                println!("      --no-scroll         Disable swiping between pages");
                println!("      --indicators        Mark days that have events");
                println!("      --log-file <FILE>   Write log messages to FILE");
                println!("  -h, --help              Display this help message and exit");
                println!("  -V, --version           Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl Options {
    fn config(&self) -> anyhow::Result<CalendarConfig> {
        let format = if self.weekly {
            CalendarFormat::Weekly
        } else {
            CalendarFormat::Monthly
        };
        let mut config = CalendarConfig::default()
            .format(format)
            .show_controls(self.controls)
            .scroll_enabled(!self.no_scroll)
            .show_event_indicators(self.indicators);
        if let Some(n) = self.week_start {
            config = config.week_start(n)?;
        }
        // Open on the selected date unless told otherwise
        if let Some(date) = self.start_date.or(self.selected) {
            config = config.start_date(date);
        }
        if let Some(date) = self.selected {
            config = config.selected_date(date);
        }
        if let Some(path) = &self.events {
            let events = EventMap::load(path)
                .with_context(|| format!("failed to load events from {}", path.display()))?;
            config = config.event_map(events);
        }
        Ok(config)
    }
}

fn parse_date(value: OsString) -> Result<Date, lexopt::Error> {
    let value = value.string()?;
    match Date::parse(&value, &YMD_FMT) {
        Ok(d) => Ok(d),
        Err(e) => Err(lexopt::Error::ParsingFailed {
            value,
            error: Box::new(e),
        }),
    }
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to initialize logging")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = execute!(io::stdout(), EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|()| func(terminal));
    if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
        log::warn!("Failed to disable mouse capture: {e}");
    }
    ratatui::restore();
    r
}
