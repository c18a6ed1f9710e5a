//! Free-consult lead capture
//!
//! `POST /leads/submit` assigns a server-side identifier, writes
//! `leads/<id>.json` and appends the record to `leads/leads-log.jsonl`.
//! The per-record file is authoritative; a failed log append is only logged.

use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde_json::json;

use super::{read_body, storage_error_response, BoxError};
use crate::config::AppState;
use crate::http;
use crate::storage::{ids, StorageError, SubmissionLayout, SubmissionRecord, LEAD_REQUIRED_FIELDS};

/// Initial workflow status of every captured lead
const NEW_LEAD_STATUS: &str = "new";

pub async fn submit<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<BoxError>,
{
    let body = match read_body(req.into_body(), state.config.http.max_body_size).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    match capture_lead(&body, state, Utc::now()).await {
        Ok(lead_id) => http::json_response(
            StatusCode::OK,
            &json!({
                "success": true,
                "leadId": lead_id,
                "message": "Lead captured successfully",
            }),
        ),
        Err(e) => storage_error_response(&e, "Failed to process lead submission"),
    }
}

async fn capture_lead(
    body: &[u8],
    state: &AppState,
    received_at: DateTime<Utc>,
) -> Result<String, StorageError> {
    let mut record = SubmissionRecord::from_slice(body)?;
    record.require(LEAD_REQUIRED_FIELDS)?;

    let lead_id = ids::lead_id(received_at);
    record.set("id", lead_id.clone());
    record.set("status", NEW_LEAD_STATUS);
    record.set_default("whatsappConfirm", false);
    record.stamp(received_at);

    let path = state
        .leads
        .persist(&record, SubmissionLayout::Flat, received_at)
        .await?;

    if let Err(e) = state.leads.append_log(&record).await {
        tracing::warn!(
            lead_id = %lead_id,
            error = %e,
            "failed to append to lead log, record file kept"
        );
    }

    tracing::info!(
        lead_id = %lead_id,
        source = record.get("source").and_then(serde_json::Value::as_str).unwrap_or_default(),
        file = %state.display_path(&path),
        "lead captured"
    );
    Ok(lead_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::{body_json, post_json, state_in};
    use serde_json::Value;

    fn lead(name: &str) -> Value {
        json!({
            "name": name,
            "phone": "9876543210",
            "concern": "hair fall",
            "city": "Nagpur",
            "preferredTime": "morning",
            "source": "free_consult_hero",
            "utm": {"campaign": "diwali"}
        })
    }

    fn read_json(path: &std::path::Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_two_leads_two_log_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state_in(dir.path());

        let mut ids = Vec::new();
        for name in ["Meera", "Karan"] {
            let resp = submit(post_json("/leads/submit", &lead(name)), &state).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body = body_json(resp).await;
            assert_eq!(body["success"], true);
            ids.push(body["leadId"].as_str().unwrap().to_string());
        }
        assert_ne!(ids[0], ids[1]);

        let log = std::fs::read_to_string(dir.path().join("leads/leads-log.jsonl")).unwrap();
        let lines: Vec<Value> = log.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 2);

        for (line, id) in lines.iter().zip(&ids) {
            let file = read_json(&dir.path().join("leads").join(format!("{id}.json")));
            assert_eq!(line, &file);
            assert_eq!(file["id"], id.as_str());
        }
    }

    #[tokio::test]
    async fn test_server_fields_override_caller() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state_in(dir.path());
        let mut payload = lead("Meera");
        payload["id"] = json!("CALLER_ID");
        payload["status"] = json!("converted");

        let body = body_json(submit(post_json("/leads/submit", &payload), &state).await).await;
        let id = body["leadId"].as_str().unwrap();
        assert!(id.starts_with("LEAD_"));

        let stored = read_json(&dir.path().join("leads").join(format!("{id}.json")));
        assert_eq!(stored["id"], id);
        assert_eq!(stored["status"], "new");
        assert_eq!(stored["whatsappConfirm"], false);
        assert_eq!(stored["utm"]["campaign"], "diwali");
        assert!(stored["timestamp"].is_string());
        assert!(!dir.path().join("leads/CALLER_ID.json").exists());
    }

    #[tokio::test]
    async fn test_missing_field_is_named() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state_in(dir.path());
        let mut payload = lead("Meera");
        payload.as_object_mut().unwrap().remove("preferredTime");

        let resp = submit(post_json("/leads/submit", &payload), &state).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await["error"],
            "Missing required field: preferredTime"
        );
        assert!(!dir.path().join("leads").exists());
    }

    #[tokio::test]
    async fn test_log_append_failure_keeps_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        // a directory where the log file should be makes every append fail
        std::fs::create_dir_all(dir.path().join("leads/leads-log.jsonl")).unwrap();
        let state = state_in(dir.path());

        let resp = submit(post_json("/leads/submit", &lead("Meera")), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let id = body_json(resp).await["leadId"].as_str().unwrap().to_string();
        assert!(dir.path().join("leads").join(format!("{id}.json")).is_file());
    }
}
