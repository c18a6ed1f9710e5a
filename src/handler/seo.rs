//! Generated site metadata: `/sitemap.xml` and `/robots.txt`

use chrono::Local;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::http::{self, CachePolicy};
use crate::seo;

pub fn sitemap(state: &AppState) -> Response<Full<Bytes>> {
    let xml = seo::render_sitemap(&state.config.site, Local::now().date_naive());
    http::build_text_response(xml, "application/xml", CachePolicy::SITE_METADATA)
}

pub fn robots(state: &AppState) -> Response<Full<Bytes>> {
    let text = seo::render_robots(&state.config.site);
    http::build_text_response(text, "text/plain; charset=utf-8", CachePolicy::SITE_METADATA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::{body_bytes, state_in};

    #[tokio::test]
    async fn test_sitemap_lists_configured_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state_in(dir.path());

        let resp = sitemap(&state);
        assert_eq!(resp.headers()["Content-Type"], "application/xml");
        let body = String::from_utf8(body_bytes(resp).await.to_vec()).unwrap();
        assert!(body.starts_with("<?xml"));
        assert_eq!(
            body.matches("<url>").count(),
            state.config.site.pages.len() + state.config.site.conditions.len()
        );
    }

    #[tokio::test]
    async fn test_robots_points_at_sitemap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state_in(dir.path());

        let resp = robots(&state);
        assert_eq!(resp.headers()["Cache-Control"], "public, max-age=3600");
        let body = String::from_utf8(body_bytes(resp).await.to_vec()).unwrap();
        assert!(body.ends_with(&format!(
            "Sitemap: {}/sitemap.xml\n",
            state.config.site.base_url
        )));
    }
}
