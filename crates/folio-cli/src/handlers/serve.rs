//! Serve command handler

use crate::cli::ServeArgs;
use crate::config::{Config, SinkKind};
use crate::error::Result;
use crate::output::OutputWriter;
use folio_server::AppState;
use tracing::{info, instrument};

use super::utils::{build_handler, build_sink};

/// Run the HTTP endpoint until Ctrl-C or SIGTERM
#[instrument(skip_all)]
pub async fn handle_serve(
    args: ServeArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(max_body_bytes) = args.max_body_bytes {
        config.server.max_body_bytes = max_body_bytes;
    }
    if let Some(sink) = args.sink {
        config.sink.kind = SinkKind::from(sink);
    }
    config.validate()?;

    let sink = build_sink(&config, config.sink.kind)?;
    if config.sink.kind == SinkKind::Memory {
        output.warning("Memory sink: submissions are lost when the server stops")?;
    }
    output.info(&format!(
        "Serving POST /api/contact on {} ({} sink)",
        config.server.bind,
        sink.name()
    ))?;
    info!(bind = %config.server.bind, sink = sink.name(), "starting contact server");

    let state = AppState::new(build_handler(&config, sink)?);
    folio_server::serve(state, config.server.clone()).await?;

    output.success("Server stopped")?;
    Ok(())
}
