//! Folio CLI - command-line interface for the contact-form pipeline
//!
//! This is the main entry point for the `folio` binary, providing commands
//! for validating and submitting contact-form posts and for serving the
//! HTTP endpoint the portfolio site posts to.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    if !config.output.color {
        control::set_override(false);
    }

    let log_guard = match init_logging(&cli, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    let result = run(cli, config).await;

    // process::exit skips destructors; flush file logs first
    drop(log_guard);

    match result {
        Ok(()) => process::exit(0),
        Err(e) => exit_with(&e),
    }
}

fn exit_with(error: &error::Error) -> ! {
    eprintln!(
        "{}",
        error::format_error(error, control::SHOULD_COLORIZE.should_colorize())
    );

    if error.should_show_help() {
        eprintln!("\nFor more information, try '--help'");
    }

    process::exit(error.exit_code());
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let use_color = cli.use_color() && config.output.color;
    let mut output = OutputWriter::new(cli.output, use_color, cli.quiet, config.output.progress);

    tracing::info!(
        verbosity = cli.verbosity_level(),
        sink = %config.sink.kind,
        "Executing command"
    );

    match cli.command {
        Commands::Validate(args) => handlers::handle_validate(args, &config, &mut output).await,
        Commands::Submit(args) => handlers::handle_submit(args, &config, &mut output).await,
        Commands::Serve(args) => handlers::handle_serve(args, &config, &mut output).await,
        Commands::Config(args) => {
            handlers::handle_config(args, &config, cli.config.as_deref(), &mut output).await
        }
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<Option<WorkerGuard>> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    // -v flags beat the config file; the environment beats both
    if cli.verbosity_level() == 0 {
        logging_config.merge_with_file_config(&config.logging);
    } else if let Some(file) = &config.logging.file {
        logging_config.file = Some(file.clone());
    }
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["folio", "validate", "--name", "Al"]);
        assert_eq!(cli.verbosity_level(), 0);

        let cli = Cli::parse_from(["folio", "-vv", "submit", "--dry-run"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["folio", "--quiet", "config", "show"]);
        assert_eq!(cli.verbosity_level(), 0);
    }
}
