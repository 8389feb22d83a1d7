use anyhow::Context;
use clap::Parser;
use perfdash::cli::{Cli, Command};
use perfdash::commands::table::{OutputFormat, TableOptions};
use perfdash::config::DashConfig;
use perfdash::error::exit_code;
use perfdash::table::SortDirection;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_code::SUCCESS as u8),
        Err(e) => {
            eprintln!("Error: {e:#}");
            if let Some(dash_err) = e.downcast_ref::<perfdash::Error>() {
                ExitCode::from(dash_err.exit_code() as u8)
            } else {
                ExitCode::from(exit_code::GENERAL_ERROR as u8)
            }
        }
    }
}

/// Initialize logging: PERFDASH_LOG wins over --log-level. Output goes to
/// --log-file when given, otherwise stderr, except for the interactive
/// dashboard which drops it.
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("PERFDASH_LOG")
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .with_context(|| format!("Invalid log level '{}'", cli.log_level))?;

    if let Some(path) = &cli.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return Ok(());
    }

    let interactive = matches!(cli.command, None | Some(Command::View { .. }));
    if interactive {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    cli.validate()?;

    init_logging(&cli)?;

    let config = DashConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Some(Command::Generate {
            output,
            records,
            seed,
        }) => {
            perfdash::commands::generate::run(output, records, seed, &config)?;
        }
        Some(Command::Table {
            table,
            file,
            search,
            status,
            source,
            category,
            from,
            to,
            sort,
            asc,
            desc,
            page,
            json,
            csv,
        }) => {
            let direction = match (asc, desc) {
                (true, _) => Some(SortDirection::Ascending),
                (_, true) => Some(SortDirection::Descending),
                _ => None,
            };
            let format = if json {
                OutputFormat::Json
            } else if csv {
                OutputFormat::Csv
            } else {
                OutputFormat::Table
            };
            let options = TableOptions {
                search,
                status,
                source,
                category,
                from,
                to,
                sort,
                direction,
                page,
                format,
            };
            perfdash::commands::table::run(table, file.as_deref(), &options, &config)?;
        }
        Some(Command::View { file, live }) => {
            perfdash::commands::view::run(file.as_deref(), live, &config)?;
        }
        Some(Command::Monitor {
            file,
            interval,
            duration,
            rate,
        }) => {
            perfdash::commands::monitor::run(file, interval, duration, rate, &config)?;
        }
        Some(Command::List { dir }) => {
            perfdash::commands::list::run(dir.as_deref())?;
        }
        Some(Command::Query { file, sql }) => {
            perfdash::commands::query::run(&file, &sql)?;
        }
        Some(Command::Completions { shell }) => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "perfdash", &mut std::io::stdout());
        }
        None => {
            perfdash::commands::view::run(None::<&Path>, false, &config)?;
        }
    }

    Ok(())
}
