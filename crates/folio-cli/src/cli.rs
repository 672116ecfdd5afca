//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::config::SinkKind;

/// Folio - contact-form submissions for a portfolio site
///
/// Validate submissions, push them through the full pipeline into a
/// persistence sink, or run the HTTP endpoint that the site posts to.
#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a submission against the form rules without storing it
    Validate(ValidateArgs),

    /// Run a submission through validation, bot detection and persistence
    Submit(SubmitArgs),

    /// Serve the contact endpoint over HTTP
    Serve(ServeArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Where the submission fields come from
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// JSON or YAML file holding the submission fields
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Sender name
    #[arg(long)]
    pub name: Option<String>,

    /// Sender email address
    #[arg(long)]
    pub email: Option<String>,

    /// Message subject
    #[arg(long)]
    pub subject: Option<String>,

    /// Message body
    #[arg(long)]
    pub message: Option<String>,

    /// Honeypot value, as a bot would fill it in
    #[arg(long = "address", value_name = "VALUE")]
    pub honeypot: Option<String>,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Arguments for the submit command
#[derive(Parser, Debug)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub fields: FieldArgs,

    /// Sink to persist into (overrides configuration)
    #[arg(long, value_enum)]
    pub sink: Option<SinkChoice>,

    /// JSON Lines file for the jsonl sink (overrides configuration)
    #[arg(long, value_name = "PATH")]
    pub jsonl_path: Option<PathBuf>,

    /// Run the pipeline against an in-memory sink and show what would be stored
    #[arg(long, conflicts_with = "sink")]
    pub dry_run: bool,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Socket address to listen on (overrides configuration)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Sink to persist into (overrides configuration)
    #[arg(long, value_enum)]
    pub sink: Option<SinkChoice>,

    /// Maximum request body size in bytes
    #[arg(long, value_name = "BYTES")]
    pub max_body_bytes: Option<usize>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show the effective configuration (secrets masked)
    Show(ConfigShowArgs),

    /// Check that the configured sink has everything it needs
    Validate,

    /// Print the configuration file that would be loaded
    Path,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file
    #[arg(long, default_value = "folio.toml")]
    pub path: PathBuf,

    /// Sink to select in the new file
    #[arg(long, value_enum, default_value = "sanity")]
    pub sink: SinkChoice,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// Pretty-printed JSON output
    JsonPretty,
    /// YAML output
    Yaml,
}

/// Sink selection on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SinkChoice {
    /// Sanity CMS dataset
    Sanity,
    /// Append-only JSON Lines file
    Jsonl,
    /// In-process memory, discarded on exit
    Memory,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<SinkChoice> for SinkKind {
    fn from(choice: SinkChoice) -> Self {
        match choice {
            SinkChoice::Sanity => SinkKind::Sanity,
            SinkChoice::Jsonl => SinkKind::Jsonl,
            SinkChoice::Memory => SinkKind::Memory,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["folio", "-vv", "validate", "--name", "Al"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["folio", "--quiet", "validate", "--name", "Al"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_submit_flags() {
        let cli = Cli::parse_from([
            "folio",
            "submit",
            "--name",
            "Al",
            "--sink",
            "jsonl",
            "--jsonl-path",
            "out.jsonl",
        ]);
        match cli.command {
            Commands::Submit(args) => {
                assert_eq!(args.sink, Some(SinkChoice::Jsonl));
                assert_eq!(args.fields.name.as_deref(), Some("Al"));
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_dry_run_conflicts_with_sink() {
        let result = Cli::try_parse_from(["folio", "submit", "--dry-run", "--sink", "memory"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sink_choice_conversion() {
        assert_eq!(SinkKind::from(SinkChoice::Sanity), SinkKind::Sanity);
        assert_eq!(SinkKind::from(SinkChoice::Memory), SinkKind::Memory);
    }
}
