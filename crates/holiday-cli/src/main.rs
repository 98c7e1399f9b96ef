//! `holidays` CLI: query market holiday calendars and trading days.
//!
//! ## Usage
//!
//! ```sh
//! # Holidays in a range (one date per line)
//! holidays list --start 2023-01-01 --end 2023-12-31
//!
//! # Same, as JSON
//! holidays list --start 2023-01-01 --end 2023-12-31 --json
//!
//! # Is a date a holiday, a weekend, or a trading day?
//! holidays check 2015-07-03
//!
//! # Normalize a local timestamp to its UTC date first
//! holidays check --at 2015-07-03T22:00:00 --tz America/New_York
//!
//! # Adjacent trading days
//! holidays next 2015-07-02
//! holidays previous 2001-09-17
//!
//! # Business dates that need a price row
//! holidays trading-days --start 2012-10-26 --end 2012-11-01
//!
//! # Load extra jurisdictions from JSON and inspect them
//! holidays --rules custom.json -j XMAS rules
//! ```

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use holiday_engine::{
    canonical_date_in, is_weekend, CalendarStore, DateWindow, RuleSet, StoreConfig,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Margin kept around a date when searching for adjacent trading days.
const SEARCH_MARGIN_DAYS: u64 = 31;

#[derive(Parser)]
#[command(
    name = "holidays",
    version,
    about = "Market holiday calendars and trading days"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Jurisdiction code
    #[arg(short, long, default_value = "US", global = true)]
    jurisdiction: String,

    /// JSON file with extra rule sets (one object or an array)
    #[arg(long, global = true)]
    rules: Option<String>,

    /// First date of the precomputed window (defaults to 2000-01-01)
    #[arg(long, global = true)]
    from: Option<NaiveDate>,

    /// Days past today to include in the precomputed window
    #[arg(long, default_value_t = 0, global = true)]
    lookahead: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// List holidays in an inclusive date range
    List {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Emit JSON instead of one date per line
        #[arg(long)]
        json: bool,
    },
    /// Report whether a date is a holiday, a weekend day or a trading day
    Check {
        /// Calendar date (YYYY-MM-DD)
        #[arg(required_unless_present = "at", conflicts_with = "at")]
        date: Option<NaiveDate>,
        /// Local timestamp (YYYY-MM-DDTHH:MM:SS), normalized to its UTC date
        #[arg(long, requires = "tz")]
        at: Option<NaiveDateTime>,
        /// IANA timezone for --at (e.g. America/New_York)
        #[arg(long)]
        tz: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// First trading day strictly after a date
    Next { date: NaiveDate },
    /// Last trading day strictly before a date
    Previous { date: NaiveDate },
    /// List trading days in an inclusive date range
    TradingDays {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Emit JSON instead of one date per line
        #[arg(long)]
        json: bool,
    },
    /// Print the jurisdiction's rule set as JSON
    Rules,
    /// List registered jurisdiction codes
    Jurisdictions,
}

#[derive(Serialize)]
struct DateList<'a> {
    jurisdiction: &'a str,
    start: NaiveDate,
    end: NaiveDate,
    dates: &'a [NaiveDate],
}

#[derive(Serialize)]
struct DateStatus<'a> {
    jurisdiction: &'a str,
    date: NaiveDate,
    holiday: bool,
    weekend: bool,
    trading_day: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = build_store(&cli)?;
    let code = cli.jurisdiction.trim().to_ascii_uppercase();
    let code = code.as_str();

    match cli.command {
        Commands::List { start, end, json } => {
            let range = DateWindow::new(start, end)?;
            ensure_covers(&store, code, range)?;
            let dates = store.holidays_in(code, start, end)?;
            print_dates(code, range, &dates, json)?;
        }
        Commands::Check { date, at, tz, json } => {
            let date = match (date, at, tz) {
                (Some(date), _, _) => date,
                (None, Some(at), Some(tz)) => canonical_date_in(at, &tz)
                    .with_context(|| format!("Failed to normalize {} in {}", at, tz))?,
                _ => anyhow::bail!("check needs a DATE or --at with --tz"),
            };
            ensure_covers(&store, code, DateWindow::day(date))?;
            let status = DateStatus {
                jurisdiction: code,
                date,
                holiday: store.is_holiday(code, date)?,
                weekend: is_weekend(date),
                trading_day: store.is_trading_day(code, date)?,
            };
            if json {
                println!("{}", serde_json::to_string(&status)?);
            } else {
                let label = if status.holiday {
                    "holiday"
                } else if status.weekend {
                    "weekend"
                } else {
                    "trading day"
                };
                println!("{} {} {}", date, code, label);
            }
        }
        Commands::Next { date } => {
            ensure_covers(&store, code, around(date)?)?;
            println!("{}", store.next_trading_day(code, date)?);
        }
        Commands::Previous { date } => {
            ensure_covers(&store, code, around(date)?)?;
            println!("{}", store.previous_trading_day(code, date)?);
        }
        Commands::TradingDays { start, end, json } => {
            let range = DateWindow::new(start, end)?;
            ensure_covers(&store, code, range)?;
            let dates = store.trading_days_in(code, start, end)?;
            print_dates(code, range, &dates, json)?;
        }
        Commands::Rules => {
            let rule_set = store.rule_set(code)?;
            println!("{}", rule_set.to_json_pretty()?);
        }
        Commands::Jurisdictions => {
            for code in store.jurisdictions() {
                println!("{}", code);
            }
        }
    }

    Ok(())
}

/// Build the store from the window flags and register any `--rules` file.
fn build_store(cli: &Cli) -> Result<CalendarStore> {
    let mut config = StoreConfig::default().with_lookahead(cli.lookahead);
    if let Some(from) = cli.from {
        config = config.with_start(from);
    }
    let store = CalendarStore::new(&config).context("Invalid calendar window")?;

    if let Some(path) = cli.rules.as_deref() {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path))?;
        let rule_sets = RuleSet::from_json_many(&json)
            .with_context(|| format!("Failed to load rule sets from {}", path))?;
        tracing::debug!(path, count = rule_sets.len(), "loaded rule sets");
        for rule_set in rule_sets {
            store.register(rule_set);
        }
    }

    Ok(store)
}

/// Recompute the jurisdiction's set over a wider window if `range` is not
/// already inside the cached one.
fn ensure_covers(store: &CalendarStore, code: &str, range: DateWindow) -> Result<()> {
    let window = store.holiday_set(code)?.window();
    if window.contains(range.start()) && window.contains(range.end()) {
        return Ok(());
    }
    let wider = DateWindow::new(
        window.start().min(range.start()),
        window.end().max(range.end()),
    )?;
    store.recompute(code, wider)?;
    Ok(())
}

fn around(date: NaiveDate) -> Result<DateWindow> {
    let margin = Days::new(SEARCH_MARGIN_DAYS);
    let start = date.checked_sub_days(margin).unwrap_or(NaiveDate::MIN);
    let end = date.checked_add_days(margin).unwrap_or(NaiveDate::MAX);
    Ok(DateWindow::new(start, end)?)
}

fn print_dates(code: &str, range: DateWindow, dates: &[NaiveDate], json: bool) -> Result<()> {
    if json {
        let list = DateList {
            jurisdiction: code,
            start: range.start(),
            end: range.end(),
            dates,
        };
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        for date in dates {
            println!("{}", date);
        }
    }
    Ok(())
}
