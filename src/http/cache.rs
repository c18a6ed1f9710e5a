//! HTTP cache control module
//!
//! Maps per-resource cache policies to `Cache-Control` header values.

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Private cache (browser cache only)
    Private(u32),
}

impl CachePolicy {
    /// Quote documents belong to a single visitor
    pub const QUOTE: Self = Self::Private(3600);
    /// sitemap.xml and robots.txt
    pub const SITE_METADATA: Self = Self::Public(3600);

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::Private(max_age) => format!("private, max-age={max_age}"),
        }
    }
}
