// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `clinic_intake=debug`
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Storage configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Directory holding `leads/`, `partners/` and `quotes/`
    pub data_root: String,
}

/// Public site metadata used for sitemap.xml and robots.txt
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_pages")]
    pub pages: Vec<SitePage>,
    /// Condition slugs, each published at `/conditions/<slug>`
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default = "default_robots")]
    pub robots: Vec<RobotsRule>,
}

/// Static page listed in the sitemap
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SitePage {
    /// Path below the base URL; empty for the homepage
    pub path: String,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// One robots.txt group
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RobotsRule {
    pub user_agent: String,
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub disallow: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_base_url() -> String {
    "https://glowheal.in".to_string()
}

fn page(path: &str, change_frequency: ChangeFrequency, priority: f32) -> SitePage {
    SitePage {
        path: path.to_string(),
        change_frequency,
        priority,
    }
}

fn default_pages() -> Vec<SitePage> {
    vec![
        page("", ChangeFrequency::Daily, 1.0),
        page("/about", ChangeFrequency::Monthly, 0.9),
        page("/pricing", ChangeFrequency::Monthly, 0.7),
        page("/book", ChangeFrequency::Monthly, 0.8),
        page("/contact", ChangeFrequency::Monthly, 0.6),
        page("/privacy", ChangeFrequency::Yearly, 0.3),
        page("/terms", ChangeFrequency::Yearly, 0.3),
    ]
}

fn rule(user_agent: &str, disallow: &[&str]) -> RobotsRule {
    RobotsRule {
        user_agent: user_agent.to_string(),
        allow: vec!["/".to_string()],
        disallow: disallow.iter().map(ToString::to_string).collect(),
    }
}

fn default_robots() -> Vec<RobotsRule> {
    vec![
        rule(
            "*",
            &[
                "/api/", "/admin/", "/docs/", "/landing/", "/data/", "/_next/", "/private/",
            ],
        ),
        rule("Googlebot", &["/api/", "/landing/", "/admin/"]),
    ]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            pages: default_pages(),
            conditions: Vec::new(),
            robots: default_robots(),
        }
    }
}
