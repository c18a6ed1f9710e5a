//! Site metadata for crawlers, rendered from `[site]` configuration

mod robots;
mod sitemap;

pub use robots::render_robots;
pub use sitemap::render_sitemap;
