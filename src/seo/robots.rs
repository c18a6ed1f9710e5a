//! robots.txt rendering

use crate::config::SiteConfig;

pub fn render_robots(site: &SiteConfig) -> String {
    let mut groups = Vec::with_capacity(site.robots.len());

    for rule in &site.robots {
        let mut lines = vec![format!("User-Agent: {}", rule.user_agent)];
        lines.extend(rule.allow.iter().map(|p| format!("Allow: {p}")));
        lines.extend(rule.disallow.iter().map(|p| format!("Disallow: {p}")));
        groups.push(lines.join("\n"));
    }

    let mut out = groups.join("\n\n");
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str(&format!(
        "Sitemap: {}/sitemap.xml\n",
        site.base_url.trim_end_matches('/')
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let txt = render_robots(&SiteConfig::default());

        assert!(txt.starts_with("User-Agent: *\nAllow: /\nDisallow: /api/\n"));
        assert!(txt.contains("\n\nUser-Agent: Googlebot\n"));
        assert!(txt.contains("Disallow: /_next/"));
        assert!(txt.ends_with("\n\nSitemap: https://glowheal.in/sitemap.xml\n"));
    }

    #[test]
    fn test_custom_rule_without_allow() {
        let mut site = SiteConfig::default();
        let mut rule = site.robots[0].clone();
        rule.user_agent = "BadBot".to_string();
        rule.allow.clear();
        rule.disallow = vec!["/".to_string()];
        site.robots = vec![rule];

        assert_eq!(
            render_robots(&site),
            "User-Agent: BadBot\nDisallow: /\n\nSitemap: https://glowheal.in/sitemap.xml\n"
        );
    }
}
