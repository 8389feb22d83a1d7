use crate::model::filters::parse_day;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "perfdash")]
#[command(about = "Terminal analytics and component performance dashboard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file (defaults to ./perfdash.toml when present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Log level when PERFDASH_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a dashboard database with generated records
    Generate {
        /// Output database path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Number of analytics records (overrides the config file)
        #[arg(long, short = 'n')]
        records: Option<usize>,

        /// Generator seed (overrides the config file)
        #[arg(long, short = 's')]
        seed: Option<u64>,
    },

    /// Print one page of the records or components table
    Table {
        /// Which table to show
        #[arg(value_enum)]
        table: TableKind,

        /// Dashboard database (defaults to most recent, then generated data)
        file: Option<PathBuf>,

        /// Case-insensitive text to search for in any field
        #[arg(long, short = 'q')]
        search: Option<String>,

        /// Only rows with this status
        #[arg(long)]
        status: Option<String>,

        /// Only records from this data source (api, database, frontend, mobile, all)
        #[arg(long)]
        source: Option<String>,

        /// Only records in this category (performance, user-behavior, revenue, engagement, all)
        #[arg(long)]
        category: Option<String>,

        /// First day of the record date range, YYYY-MM-DD (default 2024-01-01)
        #[arg(long, value_parser = parse_day)]
        from: Option<NaiveDate>,

        /// Last day of the record date range, YYYY-MM-DD (default 2024-12-31)
        #[arg(long, value_parser = parse_day)]
        to: Option<NaiveDate>,

        /// Field to sort by
        #[arg(long)]
        sort: Option<String>,

        /// Sort ascending
        #[arg(long, conflicts_with = "desc")]
        asc: bool,

        /// Sort descending
        #[arg(long, conflicts_with = "asc")]
        desc: bool,

        /// Page to show (1-based)
        #[arg(long, short = 'p', default_value = "1")]
        page: usize,

        /// Output as JSON
        #[arg(long, conflicts_with = "csv")]
        json: bool,

        /// Output as CSV
        #[arg(long, conflicts_with = "json")]
        csv: bool,
    },

    /// Interactive terminal dashboard
    View {
        /// Dashboard database (defaults to most recent, then generated data)
        file: Option<PathBuf>,

        /// Run the live component simulation
        #[arg(long)]
        live: bool,
    },

    /// Run the live simulation headless and record checkpoints
    Monitor {
        /// Dashboard database (a new one is created when omitted)
        file: Option<PathBuf>,

        /// Checkpoint interval
        #[arg(long, short = 'i', default_value = "1s", value_parser = parse_duration)]
        interval: Duration,

        /// Monitoring duration (default: until Ctrl-C)
        #[arg(long, short = 'd', value_parser = parse_duration)]
        duration: Option<Duration>,

        /// Stress test rate in ops/sec (overrides the config file)
        #[arg(long)]
        rate: Option<u32>,
    },

    /// List saved dashboard databases
    List {
        /// Directory to search (defaults to current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Execute raw SQL query on a dashboard database
    Query {
        /// Dashboard database file
        file: PathBuf,

        /// SQL query to execute
        sql: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    Records,
    Components,
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    if let Ok(d) = humantime::parse_duration(s) {
        return Ok(d);
    }

    // Bare number as seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    Err(format!(
        "Invalid duration '{}'. Examples: 250ms, 30s, 5m, 1h30m, 90",
        s
    ))
}

impl Cli {
    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |msg: String| -> crate::Result<()> { Err(crate::Error::InvalidArgument(msg)) };
        match &self.command {
            Some(Command::Table { page: 0, .. }) => invalid("Page numbers start at 1".to_string()),
            Some(Command::Table {
                table: TableKind::Components,
                source,
                category,
                from,
                to,
                ..
            }) if source.is_some() || category.is_some() || from.is_some() || to.is_some() => invalid(
                "--source, --category, --from and --to only apply to the records table".to_string(),
            ),
            Some(Command::Monitor { interval, .. }) if interval.is_zero() => {
                invalid("Checkpoint interval must be greater than zero".to_string())
            }
            Some(Command::Generate {
                records: Some(n), ..
            }) if *n > 1_000_000 => invalid(format!("Record count must be at most 1000000, got {n}")),
            _ => Ok(()),
        }
    }
}
