//! Booking submissions
//!
//! `POST /bookings` stores the caller's payload verbatim under
//! `leads/<year>/<MM>/<id>.json`; `GET /bookings` only describes the endpoint.

use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde_json::{json, Value};
use std::path::PathBuf;

use super::{read_body, storage_error_response, BoxError};
use crate::config::AppState;
use crate::http;
use crate::storage::{StorageError, SubmissionLayout, SubmissionRecord, BOOKING_REQUIRED_FIELDS};

pub async fn submit<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<BoxError>,
{
    let body = match read_body(req.into_body(), state.config.http.max_body_size).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    match store_booking(&body, state, Utc::now()).await {
        Ok((booking_id, path)) => {
            let file_path = state.display_path(&path);
            tracing::info!(booking_id = %booking_id, file = %file_path, "booking saved");
            http::json_response(
                StatusCode::CREATED,
                &json!({
                    "success": true,
                    "bookingId": booking_id,
                    "message": "Booking received successfully",
                    "filePath": file_path,
                }),
            )
        }
        Err(e) => storage_error_response(&e, "Failed to process booking"),
    }
}

/// Validate and persist; returns the identifier exactly as the caller sent it
async fn store_booking(
    body: &[u8],
    state: &AppState,
    received_at: DateTime<Utc>,
) -> Result<(Value, PathBuf), StorageError> {
    let mut record = SubmissionRecord::from_slice(body)?;
    record.require(BOOKING_REQUIRED_FIELDS)?;
    record.stamp(received_at);

    let path = state
        .leads
        .persist(&record, SubmissionLayout::Partitioned, received_at)
        .await?;
    let booking_id = record.get("id").cloned().unwrap_or(Value::Null);
    Ok((booking_id, path))
}

pub fn info() -> Response<Full<Bytes>> {
    http::json_response(
        StatusCode::OK,
        &json!({ "message": "Bookings API endpoint. Use POST to submit new bookings." }),
    )
}
