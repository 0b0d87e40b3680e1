//! partsdb CLI
//!
//! Command-line interface for building the full-text parts databases served
//! to the design tool.

mod cli_types;
mod commands;
mod error;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let settings_path = cli.config.clone().unwrap_or_else(partsdb_build::settings_path);

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run_generate(args, &settings_path, cli.quiet),
        Commands::Stats { db } => commands::stats::run_stats(&db),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&settings_path),
            ConfigAction::Path => commands::config::run_config_path(&settings_path),
            ConfigAction::Save(overrides) => {
                commands::config::run_config_save(&settings_path, &overrides)
            }
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}

/// Route `log` output to stdout, or to `logfile` with colour codes removed.
///
/// Info messages are printed bare since they are the command's normal output.
/// `--verbose` switches to timestamped records at debug level, `--quiet`
/// keeps warnings and errors only. `RUST_LOG` overrides both.
fn init_logging(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            Level::Warn => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stdout, |t| t.yellow()),
                record.args()
            ),
            Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stdout, |t| t.red()),
                record.args()
            ),
            _ => writeln!(buf, "{}", record.args()),
        });
    }

    match logfile {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(|e| {
                CliError::other(format!("Cannot create log file {}: {}", path.display(), e))
            })?;
            builder.target(env_logger::Target::Pipe(Box::new(
                strip_ansi_escapes::Writer::new(file),
            )));
        }
        None => {
            builder.target(env_logger::Target::Stdout);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::other(e.to_string()))
}
