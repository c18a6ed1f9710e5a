//! Request handler module
//!
//! Responsible for request routing dispatch and the per-endpoint intake logic.
//! Handlers are generic over the request body so they can be driven by
//! hyper's `Incoming` in production and by in-memory bodies in tests.

pub mod bookings;
pub mod leads;
pub mod partners;
pub mod quotes;
pub mod router;
pub mod seo;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Response, StatusCode};

use crate::http;
use crate::storage::StorageError;

/// Error type accepted from request bodies
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// Re-export main entry point
pub use router::handle_request;

/// Collect a request body, refusing anything above `max_body_size`
pub async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            tracing::warn!(max_body_size, "request body too large");
            Err(http::build_413_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to read request body");
            Err(http::json_error(
                StatusCode::BAD_REQUEST,
                "Failed to read request body",
            ))
        }
    }
}

/// Convert a storage error into the `{error}` body used by the intake endpoints
///
/// Server-side failures report `server_message` plus the underlying detail.
pub fn storage_error_response(err: &StorageError, server_message: &str) -> Response<Full<Bytes>> {
    if err.is_server_error() {
        tracing::error!(error = %err, "{server_message}");
        http::json_response(
            err.status(),
            &serde_json::json!({ "error": server_message, "details": err.to_string() }),
        )
    } else {
        tracing::warn!(error = %err, status = err.status().as_u16(), "request rejected");
        http::json_error(err.status(), &err.to_string())
    }
}
