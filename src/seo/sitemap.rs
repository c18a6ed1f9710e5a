//! sitemap.xml rendering

use chrono::NaiveDate;
use std::fmt::Write;

use crate::config::{ChangeFrequency, SiteConfig};

/// Condition pages are refreshed monthly with a fixed priority
const CONDITION_FREQUENCY: ChangeFrequency = ChangeFrequency::Monthly;
const CONDITION_PRIORITY: f32 = 0.8;

/// Render the sitemap; every entry carries `lastmod` = `generated_on`
pub fn render_sitemap(site: &SiteConfig, generated_on: NaiveDate) -> String {
    let base = site.base_url.trim_end_matches('/');
    let lastmod = generated_on.format("%Y-%m-%d").to_string();

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for page in &site.pages {
        let loc = format!("{base}{}", page.path);
        push_url(&mut xml, &loc, &lastmod, page.change_frequency, page.priority);
    }

    for slug in &site.conditions {
        let loc = format!("{base}/conditions/{slug}");
        push_url(&mut xml, &loc, &lastmod, CONDITION_FREQUENCY, CONDITION_PRIORITY);
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: &str, freq: ChangeFrequency, priority: f32) {
    // writing to a String cannot fail
    let _ = write!(
        xml,
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n    \
         <changefreq>{}</changefreq>\n    <priority>{priority:.1}</priority>\n  </url>\n",
        escape_xml(loc),
        freq.as_str(),
    );
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
