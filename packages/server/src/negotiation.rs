//! `Accept` / `Content-Type` enforcement as composable middleware.
//!
//! Each check is a plain `from_fn_with_state` middleware whose state is the
//! media type it enforces:
//!
//! ```ignore
//! post(handler)
//!     .layer(from_fn_with_state(APPLICATION_JSON, negotiation::require))
//!     .layer(from_fn_with_state(APPLICATION_JSON, negotiation::accept))
//! ```
//!
//! The last layer added runs first, so in the example above the `Accept`
//! check decides the response when both would fail.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use mime_guess::mime::{self, Mime};

use crate::error::AppError;

pub const APPLICATION_JSON: &str = "application/json";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Reject requests whose `Accept` header rules out `mime_type` with 406.
pub async fn accept(
    State(mime_type): State<&'static str>,
    request: Request,
    next: Next,
) -> Response {
    if !accepts(request.headers(), mime_type) {
        tracing::debug!(accept = ?request.headers().get(header::ACCEPT), mime_type, "not acceptable");
        return AppError::NotAcceptable(mime_type).into_response();
    }
    next.run(request).await
}

/// Reject requests whose `Content-Type` is not `mime_type` with 415.
pub async fn require(
    State(mime_type): State<&'static str>,
    request: Request,
    next: Next,
) -> Response {
    if !content_type_is(request.headers(), mime_type) {
        tracing::debug!(content_type = ?request.headers().get(header::CONTENT_TYPE), mime_type, "unsupported media type");
        return AppError::UnsupportedMediaType(mime_type).into_response();
    }
    next.run(request).await
}

/// Whether the `Accept` header admits `mime_type`.
///
/// An absent header admits everything. Otherwise at least one media range
/// must match exactly or by wildcard with a non-zero quality.
pub fn accepts(headers: &HeaderMap, mime_type: &str) -> bool {
    let Ok(wanted) = mime_type.parse::<Mime>() else {
        return false;
    };

    let mut values = headers.get_all(header::ACCEPT).iter().peekable();
    if values.peek().is_none() {
        return true;
    }

    values
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|range| range.trim().parse::<Mime>().ok())
        .any(|range| quality(&range) > 0.0 && range_matches(&range, &wanted))
}

/// Whether the `Content-Type` essence equals `mime_type`, ignoring parameters.
pub fn content_type_is(headers: &HeaderMap, mime_type: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Mime>().ok())
        .is_some_and(|m| m.essence_str().eq_ignore_ascii_case(mime_type))
}

fn range_matches(range: &Mime, wanted: &Mime) -> bool {
    let type_ok = range.type_() == mime::STAR || range.type_() == wanted.type_();
    let subtype_ok = range.subtype() == mime::STAR || range.subtype() == wanted.subtype();
    type_ok && subtype_ok
}

fn quality(range: &Mime) -> f32 {
    range
        .get_param("q")
        .and_then(|q| q.as_str().parse::<f32>().ok())
        .unwrap_or(1.0)
}
