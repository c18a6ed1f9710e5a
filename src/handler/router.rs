//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: access logging, body size
//! pre-check, method validation and dispatch to the endpoint handlers.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use super::{bookings, leads, partners, quotes, seo, BoxError};
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<BoxError>,
{
    let logging = &state.config.logging;
    let mut entry = logging
        .access_log
        .then(|| AccessLogEntry::from_request(&req, remote_addr));

    let mut response = route_request(req, &state).await;
    apply_common_headers(&mut response, &state);

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes);
        logger::log_access(entry, &logging.access_log_format);
    }

    Ok(response)
}

/// `Server` on every response, plus the CORS origin when enabled
fn apply_common_headers(response: &mut Response<Full<Bytes>>, state: &AppState) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert(header::SERVER, value);
    }
    if state.config.http.enable_cors {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
}

async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<BoxError>,
{
    if req.method() == Method::OPTIONS {
        return http::build_options_response(state.config.http.enable_cors);
    }

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    let method = req.method().clone();
    let is_read = method == Method::GET || method == Method::HEAD;
    let path = req.uri().path().to_owned();

    match path.as_str() {
        "/healthz" | "/readyz" if is_read => http::build_health_response("ok"),
        "/healthz" | "/readyz" => method_not_allowed(&method, "GET, HEAD"),

        "/bookings" if method == Method::POST => bookings::submit(req, state).await,
        "/bookings" if is_read => bookings::info(),
        "/bookings" => method_not_allowed(&method, "GET, POST"),

        "/leads/submit" if method == Method::POST => leads::submit(req, state).await,
        "/leads/submit" => method_not_allowed(&method, "POST"),

        "/partners/doctors/apply" if method == Method::POST => partners::apply(req, state).await,
        "/partners/doctors/apply" => method_not_allowed(&method, "POST"),

        "/quote/download" if is_read => {
            let query = req.uri().query().map(str::to_owned);
            quotes::download(query.as_deref(), state).await
        }
        "/quote/download" => method_not_allowed(&method, "GET"),

        "/sitemap.xml" if is_read => seo::sitemap(state),
        "/robots.txt" if is_read => seo::robots(state),
        "/sitemap.xml" | "/robots.txt" => method_not_allowed(&method, "GET"),

        _ => {
            tracing::debug!(path = %path, "no route");
            http::build_404_response()
        }
    }
}

fn method_not_allowed(method: &Method, allow: &str) -> Response<Full<Bytes>> {
    tracing::warn!(method = %method, allow, "method not allowed");
    http::build_405_response(allow)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(header::CONTENT_LENGTH)?;
    let Ok(size_str) = content_length.to_str() else {
        tracing::warn!("Content-Length header contains non-ASCII characters");
        return None;
    };

    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            tracing::warn!(size, max_body_size, "request body too large");
            Some(http::build_413_response())
        }
        Err(_) => {
            tracing::warn!(value = size_str, "invalid Content-Length, skipping size check");
            None
        }
        _ => None,
    }
}
