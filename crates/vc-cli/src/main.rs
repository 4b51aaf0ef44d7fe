//! vault-calendar: month view of dated notes
//!
//! Main entry point for the vault-calendar binary.
//!
//! Usage:
//!   vault-calendar                     - Show the current month
//!   vault-calendar --month 2025-03     - Show a given month
//!   vault-calendar --watch             - Re-render after changes reported on stdin
//!   vault-calendar --help              - Show help

mod error;
mod records;
mod render;
mod vault;
mod watch;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use vc_calendar::{CalendarController, EventAssembler, MonthCursor};
use vc_core::{ModifiedSignal, VaultCalendarConfig};
use vc_schedule::ChangeDebouncer;

use crate::error::{CliError, Result};
use crate::records::JsonFileExecutor;
use crate::vault::VaultTaskProvider;
use crate::watch::{watch_loop, write_view};

/// Run mode
#[derive(Debug, PartialEq)]
enum RunMode {
    /// Render the calendar
    Show(Options),
    /// Show help
    Help,
    /// Show version
    Version,
}

/// Command line overrides for a calendar run
#[derive(Debug, Default, PartialEq)]
struct Options {
    month: Option<MonthCursor>,
    vault: Option<String>,
    query: Option<String>,
    watch: bool,
}

impl Options {
    fn apply(&self, config: &mut VaultCalendarConfig) {
        if let Some(vault) = &self.vault {
            config.vault.root = vault.clone();
        }
        if let Some(query) = &self.query {
            config.query.source = query.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args)? {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("vault-calendar {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Show(options) => options,
    };

    // Logs go to stderr; stdout carries the grid
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut config =
        VaultCalendarConfig::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    options.apply(&mut config);

    tracing::info!("Vault: {}", config.vault.root);
    if config.query.source.trim().is_empty() {
        tracing::info!("No query configured, scanning open tasks");
    } else {
        tracing::info!("Query source: {}", config.query.source);
    }

    let signal = ModifiedSignal::default();
    let assembler = EventAssembler::new(
        Arc::new(JsonFileExecutor::new(".")),
        Arc::new(VaultTaskProvider::new(&config.vault.root)),
    );
    let mut controller = CalendarController::new(
        Arc::new(assembler),
        config.query.source.clone(),
        signal.clone(),
        options.month.unwrap_or_else(MonthCursor::today),
        config.calendar.week_start(),
    );

    let view = controller.refresh().await?;
    write_view(&mut std::io::stdout(), &controller, &view, &config)?;

    if options.watch {
        run_watch(&mut controller, signal, &config).await?;
    }

    Ok(())
}

/// Re-render whenever a change reported on stdin settles
async fn run_watch(
    controller: &mut CalendarController,
    signal: ModifiedSignal,
    config: &VaultCalendarConfig,
) -> anyhow::Result<()> {
    let debouncer = ChangeDebouncer::from_settings(signal, &config.calendar).start();
    let lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!(
        "Watching for changes ({} ms quiet period), press Ctrl+C to exit",
        config.calendar.update_delay_ms
    );

    let interrupted = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    watch_loop(
        controller,
        debouncer,
        lines,
        &mut std::io::stdout(),
        interrupted,
        config,
    )
    .await
}

/// Parse command line arguments (without the program name)
fn parse_args(args: &[String]) -> Result<RunMode> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(RunMode::Help),
            "--version" | "-v" => return Ok(RunMode::Version),
            "--watch" | "-w" => options.watch = true,
            "--month" | "-m" => options.month = Some(parse_month(next_value(&mut iter, arg)?)?),
            "--vault" => options.vault = Some(next_value(&mut iter, arg)?.to_string()),
            "--query" | "-q" => options.query = Some(next_value(&mut iter, arg)?.to_string()),
            other => return Err(CliError::Args(format!("unknown argument: {}", other))),
        }
    }

    Ok(RunMode::Show(options))
}

fn next_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a str> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| CliError::Args(format!("{} needs a value", flag)))
}

/// `YYYY-MM`
fn parse_month(value: &str) -> Result<MonthCursor> {
    let invalid = || CliError::Args(format!("expected YYYY-MM, got {}", value));
    let (year, month) = value.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    Ok(MonthCursor::new(year, month)?)
}

/// Print help message
fn print_help() {
    println!("vault-calendar - Month view of dated notes");
    println!();
    println!("Usage:");
    println!("  vault-calendar [options]");
    println!();
    println!("Options:");
    println!("  -m, --month YYYY-MM   Month to show (default: current month)");
    println!("      --vault DIR       Vault root to scan for tasks");
    println!("  -q, --query FILE      JSON record file to use instead of the task scan");
    println!("  -w, --watch           Re-render after each change line read from stdin");
    println!("  -h, --help            Show this help message");
    println!("  -v, --version         Show version");
    println!();
    println!("Configuration is read from vault-calendar.toml when present.");
    println!();
    println!("Environment Variables:");
    println!("  VAULT_ROOT                Vault root (default: .)");
    println!("  CALENDAR_QUERY            Query source (default: empty, task scan)");
    println!("  CALENDAR_UPDATE_DELAY_MS  Quiet period before reloading (default: 3000)");
    println!("  CALENDAR_START_OF_WEEK    First column, 0 = Sunday (default: 0)");
    println!("  RUST_LOG                  Log filter (default: info)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(parse_args(&[]).unwrap(), RunMode::Show(Options::default()));
    }

    #[test]
    fn test_parse_all_options() {
        let mode = parse_args(&args(&[
            "--month", "2025-03", "--vault", "notes", "-q", "events.json", "--watch",
        ]))
        .unwrap();

        assert_eq!(
            mode,
            RunMode::Show(Options {
                month: Some(MonthCursor::new(2025, 3).unwrap()),
                vault: Some("notes".to_string()),
                query: Some("events.json".to_string()),
                watch: true,
            })
        );
    }

    #[test]
    fn test_help_and_version_win() {
        assert_eq!(parse_args(&args(&["--watch", "-h"])).unwrap(), RunMode::Help);
        assert_eq!(parse_args(&args(&["--version"])).unwrap(), RunMode::Version);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_args(&args(&["--month"])), Err(CliError::Args(_))));
        assert!(matches!(parse_args(&args(&["--bogus"])), Err(CliError::Args(_))));
        assert!(matches!(parse_args(&args(&["-m", "March"])), Err(CliError::Args(_))));
        assert!(matches!(
            parse_args(&args(&["-m", "2025-13"])),
            Err(CliError::Calendar(_))
        ));
    }

    #[test]
    fn test_options_override_config() {
        let mut config = VaultCalendarConfig::default();
        let options = Options {
            vault: Some("/notes".to_string()),
            query: Some("q.json".to_string()),
            ..Options::default()
        };
        options.apply(&mut config);
        assert_eq!(config.vault.root, "/notes");
        assert_eq!(config.query.source, "q.json");
    }
}
