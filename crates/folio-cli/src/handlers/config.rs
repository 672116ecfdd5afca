//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs, OutputFormat};
use crate::config::{Config, ConfigBuilder, SinkKind};
use crate::error::{Error, Result};
use crate::logging::redaction;
use crate::output::OutputWriter;
use serde_json::{json, Value};
use std::path::Path;

/// Handle the config command
pub async fn handle_config(
    args: ConfigArgs,
    config: &Config,
    config_path: Option<&Path>,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Validate => handle_config_validate(config, output),
        ConfigAction::Path => handle_config_path(config_path, output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(Error::config(format!(
            "{} already exists; pass --force to overwrite it",
            args.path.display()
        )));
    }

    let config = ConfigBuilder::new().sink(SinkKind::from(args.sink)).build();
    config.save(&args.path)?;

    output.success(&format!("✓ Created config at {}", args.path.display()))?;
    if config.sink.kind == SinkKind::Sanity {
        output.info("Set SANITY_SERVER_API_TOKEN in the environment or a .env file")?;
    }
    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(
    args: ConfigShowArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let mut value = serde_json::to_value(config)?;
    redaction::redact_json_value(&mut value);

    let rendered = match args.format {
        ConfigFormat::Toml => toml::to_string_pretty(&strip_nulls(value))?,
        ConfigFormat::Json => serde_json::to_string_pretty(&value)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&value)?,
    };

    output.writeln(rendered.trim_end())
}

/// Handle config validate subcommand
fn handle_config_validate(config: &Config, output: &mut OutputWriter) -> Result<()> {
    config.validate()?;

    output.success(&format!(
        "✓ Configuration is valid (sink: {})",
        config.sink.kind
    ))?;
    if output.format() != OutputFormat::Human {
        output.data(&json!({ "valid": true, "sink": config.sink.kind }))?;
    }
    Ok(())
}

/// Handle config path subcommand
fn handle_config_path(config_path: Option<&Path>, output: &mut OutputWriter) -> Result<()> {
    let path = config_path.map(Path::to_path_buf).or_else(Config::locate);

    match path {
        Some(path) => output.writeln(&path.display().to_string()),
        None => {
            output.info("No configuration file found; using defaults and environment")?;
            Ok(())
        }
    }
}

/// TOML has no null; drop unset values before rendering
fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(strip_nulls)
                .collect(),
        ),
        other => other,
    }
}
