//! `POST /api/contact`
//!
//! Body formats, chosen by `Content-Type`:
//! - `multipart/form-data` (a browser `FormData` post)
//! - `application/json` (an object of string or null values)
//! - anything else is read as `application/x-www-form-urlencoded`
//!
//! For every format the first occurrence of a field wins. The response body
//! is always a submission result, unreadable and oversized bodies included;
//! a discarded bot submission gets the same status and bytes as a stored one.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_core::{Error as CoreError, RawSubmission, SubmissionOutcome, SubmissionResult};
use std::fmt;
use tracing::{debug, warn};

use crate::AppState;

/// Message for bodies that cannot be decoded at all
pub const MALFORMED_BODY_MESSAGE: &str = "Invalid form data.";

/// Message for bodies over the configured size limit
pub const BODY_TOO_LARGE_MESSAGE: &str = "Form data is too large.";

enum BodyKind {
    Multipart,
    Json,
    UrlEncoded,
}

fn body_kind(request: &Request) -> BodyKind {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        BodyKind::Multipart
    } else if content_type.starts_with("application/json") {
        BodyKind::Json
    } else {
        BodyKind::UrlEncoded
    }
}

/// HTTP status for a terminal outcome
pub fn status_for(outcome: &SubmissionOutcome) -> StatusCode {
    match outcome {
        SubmissionOutcome::Persisted | SubmissionOutcome::BotDiscarded => StatusCode::OK,
        SubmissionOutcome::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionOutcome::PersistFailed => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub async fn submit_contact(State(state): State<AppState>, request: Request) -> Response {
    let honeypot_key = state.handler.detector().field().to_string();

    let raw = match read_submission(request, &state, &honeypot_key).await {
        Ok(raw) => raw,
        Err(response) => return response,
    };

    let report = state.handler.submit(raw).await;
    (status_for(&report.outcome), Json(report.result)).into_response()
}

async fn read_submission(
    request: Request,
    state: &AppState,
    honeypot_key: &str,
) -> Result<RawSubmission, Response> {
    match body_kind(&request) {
        BodyKind::Multipart => {
            let mut multipart = Multipart::from_request(request, state)
                .await
                .map_err(|e| unreadable_body(e.status(), e))?;

            let mut pairs = Vec::new();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| unreadable_body(e.status(), e))?
            {
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                let value = field
                    .text()
                    .await
                    .map_err(|e| unreadable_body(e.status(), e))?;
                pairs.push((name, value));
            }
            Ok(RawSubmission::from_pairs_with_honeypot(pairs, honeypot_key))
        }
        BodyKind::Json => {
            let body = Bytes::from_request(request, state)
                .await
                .map_err(|e| unreadable_body(e.status(), e))?;
            let value: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
                debug!(error = %e, "undecodable JSON contact body");
                malformed_body()
            })?;
            RawSubmission::from_json_with_honeypot(&value, honeypot_key).map_err(|e| match e {
                CoreError::Validation(err) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(SubmissionResult::failure(err.message)),
                )
                    .into_response(),
                other => {
                    warn!(error = %other, "unexpected error decoding contact body");
                    malformed_body()
                }
            })
        }
        BodyKind::UrlEncoded => {
            let body = Bytes::from_request(request, state)
                .await
                .map_err(|e| unreadable_body(e.status(), e))?;
            let pairs = url::form_urlencoded::parse(&body).into_owned();
            Ok(RawSubmission::from_pairs_with_honeypot(pairs, honeypot_key))
        }
    }
}

/// Extractor failures as a submission result. Over-limit bodies keep 413;
/// every other read failure is the caller's malformed body.
fn unreadable_body(status: StatusCode, error: impl fmt::Display) -> Response {
    debug!(%status, error = %error, "unreadable contact body");
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(SubmissionResult::failure(BODY_TOO_LARGE_MESSAGE)),
        )
            .into_response()
    } else {
        malformed_body()
    }
}

fn malformed_body() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(SubmissionResult::failure(MALFORMED_BODY_MESSAGE)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::validator::ValidationError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&SubmissionOutcome::Persisted), StatusCode::OK);
        assert_eq!(status_for(&SubmissionOutcome::BotDiscarded), StatusCode::OK);
        assert_eq!(
            status_for(&SubmissionOutcome::Rejected(ValidationError::new("name", "short"))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&SubmissionOutcome::PersistFailed),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_unreadable_body_status() {
        let response = unreadable_body(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded");
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let response = unreadable_body(StatusCode::INTERNAL_SERVER_ERROR, "stream ended");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
