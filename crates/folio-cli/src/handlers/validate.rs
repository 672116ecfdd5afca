//! Validate command handler

use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{OutputWriter, ValidationReport};
use tracing::{info, instrument};

use super::utils::load_raw_submission;

/// Run the form rules only; nothing is stored
#[instrument(skip_all)]
pub async fn handle_validate(
    args: ValidateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let raw = load_raw_submission(&args.fields, &config.form.honeypot_field)?;

    match folio_core::validate(&raw) {
        Ok(_) => {
            info!("submission is valid");
            output.validation_report(&ValidationReport::valid())
        }
        Err(err) => {
            info!(field = %err.field, "submission is invalid");
            output.validation_report(&ValidationReport::invalid(&err))?;
            Err(Error::Rejected(err.message))
        }
    }
}
