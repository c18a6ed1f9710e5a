//! Doctor partnership applications
//!
//! `POST /partners/doctors/apply` validates a fixed schema, reporting every
//! failing field at once, and stores the accepted fields under
//! `partners/<year>/<MM>/<id>.json`. Fields outside the schema are dropped.

use chrono::{DateTime, SecondsFormat, Utc};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{header, Request, Response, StatusCode};
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::LazyLock;

use super::{read_body, BoxError};
use crate::config::AppState;
use crate::http;
use crate::storage::{ids, StorageError, SubmissionLayout, SubmissionRecord};

const NEXT_STEPS: [&str; 5] = [
    "Credential verification (1-2 days)",
    "Onboarding call scheduling",
    "KYC completion",
    "Slot synchronization",
    "Go live",
];

#[derive(Debug, Clone, Copy)]
enum Rule {
    Text { min: usize },
    OptionalText,
    TextList { min: usize },
    Number { min: f64, max: f64 },
    Phone,
    Email,
}

const SCHEMA: &[(&str, Rule)] = &[
    ("fullName", Rule::Text { min: 2 }),
    ("clinicName", Rule::Text { min: 2 }),
    ("specialties", Rule::TextList { min: 1 }),
    ("registrationNo", Rule::Text { min: 3 }),
    ("yearsExperience", Rule::Number { min: 0.0, max: 70.0 }),
    ("city", Rule::Text { min: 1 }),
    ("address", Rule::Text { min: 10 }),
    ("phone", Rule::Phone),
    ("email", Rule::Email),
    ("slotAvailability", Rule::Text { min: 10 }),
    ("panGst", Rule::OptionalText),
    ("clinicServices", Rule::TextList { min: 0 }),
    ("message", Rule::OptionalText),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

pub async fn apply<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<BoxError>,
{
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let body = match read_body(req.into_body(), state.config.http.max_body_size).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let submitted = match SubmissionRecord::from_slice(&body) {
        Ok(record) => record,
        Err(e) => {
            let error = FieldError {
                field: "body".to_string(),
                message: e.to_string(),
            };
            return validation_failed(&[error]);
        }
    };

    let accepted = match validate(submitted.fields()) {
        Ok(fields) => fields,
        Err(errors) => return validation_failed(&errors),
    };

    let received_at = Utc::now();
    let application_id = ids::doctor_application_id(received_at);
    match store_application(accepted, &application_id, &user_agent, state, received_at).await {
        Ok(record) => {
            tracing::info!(
                application_id = %application_id,
                name = record
                    .get("fullName")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default(),
                city = record
                    .get("city")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default(),
                "doctor application received"
            );
            http::json_response(
                StatusCode::CREATED,
                &json!({
                    "success": true,
                    "message": "Application received successfully",
                    "applicationId": application_id,
                    "nextSteps": NEXT_STEPS,
                }),
            )
        }
        Err(e) => {
            tracing::error!(application_id = %application_id, error = %e, "doctor application failed");
            http::json_response(
                e.status(),
                &json!({
                    "success": false,
                    "message": "Failed to process application. Please try again or contact support.",
                }),
            )
        }
    }
}

async fn store_application(
    accepted: Map<String, Value>,
    application_id: &str,
    user_agent: &str,
    state: &AppState,
    received_at: DateTime<Utc>,
) -> Result<SubmissionRecord, StorageError> {
    let mut record = SubmissionRecord::from_value(Value::Object(accepted))?;
    record.set("id", application_id);
    record.set(
        "timestamp",
        received_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    record.set("type", "doctor_partnership");
    record.set("status", "pending_review");
    record.set("source", "join-doctor-page");
    record.set("userAgent", user_agent);

    state
        .partners
        .persist(&record, SubmissionLayout::Partitioned, received_at)
        .await?;
    Ok(record)
}

fn validation_failed(errors: &[FieldError]) -> Response<Full<Bytes>> {
    tracing::warn!(failing_fields = errors.len(), "doctor application rejected");
    http::json_response(
        StatusCode::BAD_REQUEST,
        &json!({
            "success": false,
            "message": "Validation failed",
            "errors": errors,
        }),
    )
}

/// Check every schema field; on success return only the schema fields
pub fn validate(fields: &Map<String, Value>) -> Result<Map<String, Value>, Vec<FieldError>> {
    let mut accepted = Map::new();
    let mut errors = Vec::new();

    for (name, rule) in SCHEMA {
        match check(*rule, fields.get(*name)) {
            Ok(Some(value)) => {
                accepted.insert((*name).to_string(), value);
            }
            Ok(None) => {}
            Err(message) => errors.push(FieldError {
                field: (*name).to_string(),
                message,
            }),
        }
    }

    if errors.is_empty() {
        Ok(accepted)
    } else {
        Err(errors)
    }
}

fn check(rule: Rule, value: Option<&Value>) -> Result<Option<Value>, String> {
    let value = match (rule, value) {
        (Rule::OptionalText, None | Some(Value::Null)) => return Ok(None),
        (_, None | Some(Value::Null)) => return Err("Required".to_string()),
        (_, Some(v)) => v,
    };

    match rule {
        Rule::Text { min } => {
            let s = expect_str(value)?;
            if s.chars().count() < min {
                return Err(format!("Must contain at least {min} character(s)"));
            }
        }
        Rule::OptionalText => {
            expect_str(value)?;
        }
        Rule::TextList { min } => {
            let items = value.as_array().ok_or("Expected array")?;
            if !items.iter().all(Value::is_string) {
                return Err("Expected array of strings".to_string());
            }
            if items.len() < min {
                return Err(format!("Must contain at least {min} element(s)"));
            }
        }
        Rule::Number { min, max } => {
            let n = value.as_f64().ok_or("Expected number")?;
            if !(min..=max).contains(&n) {
                return Err(format!("Must be between {min} and {max}"));
            }
        }
        Rule::Phone => {
            if !is_indian_mobile(expect_str(value)?) {
                return Err("Invalid phone number".to_string());
            }
        }
        Rule::Email => {
            if !is_email(expect_str(value)?) {
                return Err("Invalid email".to_string());
            }
        }
    }
    Ok(Some(value.clone()))
}

fn expect_str(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| "Expected string".to_string())
}

/// Indian mobile number: ten ASCII digits starting with 6-9
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid phone pattern"));

/// Dot-separated local part that neither starts nor ends with a dot, then
/// hostname labels starting with an alphanumeric and a TLD of 2+ letters
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:[a-z0-9_'+\-]+\.)*[a-z0-9_'+\-]*[a-z0-9_+\-]@(?:[a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$",
    )
    .expect("valid email pattern")
});

fn is_indian_mobile(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

fn is_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
