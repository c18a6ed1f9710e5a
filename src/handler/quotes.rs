//! Quote download
//!
//! `GET /quote/download?file=<id>` returns a stored HTML quote inline.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::storage_error_response;
use crate::config::AppState;
use crate::http::{self, CachePolicy};

pub async fn download(query: Option<&str>, state: &AppState) -> Response<Full<Bytes>> {
    let Some(file) = file_param(query) else {
        return http::json_error(StatusCode::BAD_REQUEST, "Missing file parameter");
    };

    match state.quotes.read(&file).await {
        Ok(doc) => {
            tracing::debug!(file = %file, bytes = doc.content.len(), "serving quote");
            http::build_inline_html_response(doc.content, &doc.file_name, CachePolicy::QUOTE)
        }
        Err(e) => storage_error_response(&e, "Failed to retrieve quote"),
    }
}

/// First non-empty `file` value of the query string, percent-decoded
fn file_param(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "file")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::{body_bytes, body_json, state_in};

    const QUOTE_HTML: &str = "<html><body><h1>Quote Q1</h1><p>Rs. 4,500</p></body></html>";

    fn seed_quote(root: &std::path::Path, relative: &str) {
        let path = root.join("quotes").join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, QUOTE_HTML).unwrap();
    }

    #[test]
    fn test_file_param_is_decoded() {
        assert_eq!(
            file_param(Some("x=1&file=2026%2F10%2FQ1.html")).as_deref(),
            Some("2026/10/Q1.html")
        );
        assert_eq!(file_param(Some("file=")), None);
        assert_eq!(file_param(None), None);
    }

    #[tokio::test]
    async fn test_download_returns_exact_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        seed_quote(dir.path(), "2026/10/Q1.html");
        let state = state_in(dir.path());

        let resp = download(Some("file=2026/10/Q1.html"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers["Content-Type"], "text/html; charset=utf-8");
        assert_eq!(headers["Content-Disposition"], "inline; filename=\"Q1.html\"");
        assert_eq!(headers["Cache-Control"], "private, max-age=3600");
        assert_eq!(body_bytes(resp).await, QUOTE_HTML);
    }

    #[tokio::test]
    async fn test_traversal_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("secret.html"), "secret").unwrap();
        let state = state_in(dir.path());

        for query in ["file=../secret.html", "file=%2E%2E%2Fsecret.html", "file=~/secret.html"] {
            let resp = download(Some(query), &state).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{query}");
            assert_eq!(body_json(resp).await["error"], "Invalid file path");
        }
    }

    #[tokio::test]
    async fn test_missing_parameter_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state_in(dir.path());

        let resp = download(None, &state).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Missing file parameter");

        let resp = download(Some("file=2026/10/nope.html"), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "Quote file not found");
    }
}
