//! Robots.txt parser and checker.

use std::collections::HashMap;

/// A single allow/disallow line.
#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    allow: bool,
}

/// Parsed robots.txt rules.
#[derive(Debug, Clone, Default)]
pub struct RobotsTxt {
    /// Rules per user-agent token (lowercase)
    groups: HashMap<String, Vec<Rule>>,

    /// Rules for `*`
    default_rules: Vec<Rule>,
}

impl RobotsTxt {
    /// Parse robots.txt content.
    ///
    /// Consecutive `User-agent` lines share the rules that follow them; a
    /// `User-agent` line after a rule starts a new group. Groups naming the
    /// same agent are merged.
    pub fn parse(content: &str) -> Self {
        let mut robots = Self::default();
        let mut current_agents: Vec<String> = Vec::new();
        let mut current_rules: Vec<Rule> = Vec::new();
        let mut seen_rule = false;

        for line in content.lines() {
            // Strip trailing comments
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let directive = directive.trim().to_lowercase();
            let value = value.trim();

            match directive.as_str() {
                "user-agent" => {
                    if seen_rule {
                        robots.commit(&mut current_agents, &mut current_rules);
                        seen_rule = false;
                    }
                    current_agents.push(value.to_lowercase());
                }
                "disallow" | "allow" => {
                    seen_rule = true;
                    // An empty Disallow means "nothing is disallowed"
                    if !value.is_empty() {
                        current_rules.push(Rule {
                            pattern: value.to_string(),
                            allow: directive == "allow",
                        });
                    }
                }
                _ => {}
            }
        }

        robots.commit(&mut current_agents, &mut current_rules);
        robots
    }

    fn commit(&mut self, agents: &mut Vec<String>, rules: &mut Vec<Rule>) {
        for agent in agents.drain(..) {
            if agent == "*" {
                self.default_rules.extend(rules.iter().cloned());
            } else {
                self.groups
                    .entry(agent)
                    .or_default()
                    .extend(rules.iter().cloned());
            }
        }
        rules.clear();
    }

    /// Check if a path is allowed for a user-agent.
    ///
    /// The longest matching pattern decides; on a tie `Allow` wins. Patterns
    /// may use `*` wildcards and a trailing `$` anchor. An agent without an
    /// exact group uses the longest group token it contains, then the `*`
    /// rules.
    pub fn is_allowed(&self, user_agent: &str, path: &str) -> bool {
        let agent_lower = user_agent.to_lowercase();

        let rules = self
            .groups
            .get(&agent_lower)
            .or_else(|| {
                self.groups
                    .iter()
                    .filter(|(token, _)| agent_lower.contains(token.as_str()))
                    .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
                    .map(|(_, rules)| rules)
            })
            .unwrap_or(&self.default_rules);

        let mut best: Option<&Rule> = None;
        for rule in rules {
            if !pattern_matches(&rule.pattern, path) {
                continue;
            }
            best = match best {
                Some(current)
                    if current.pattern.len() > rule.pattern.len()
                        || (current.pattern.len() == rule.pattern.len() && current.allow) =>
                {
                    Some(current)
                }
                _ => Some(rule),
            };
        }

        best.map_or(true, |rule| rule.allow)
    }
}

/// Match a robots.txt path pattern (`*` wildcard, optional trailing `$`).
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let (pattern, anchored) = match pattern.strip_suffix('$') {
        Some(p) => (p, true),
        None => (pattern, false),
    };

    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or("");
    if !path.starts_with(first) {
        return false;
    }

    let rest: Vec<&str> = parts.collect();
    let mut pos = first.len();
    if rest.is_empty() {
        return !anchored || pos == path.len();
    }

    for (i, part) in rest.iter().enumerate() {
        if anchored && i == rest.len() - 1 {
            return path.len() >= pos + part.len() && path.ends_with(part);
        }
        match path[pos..].find(part) {
            Some(offset) => pos += offset + part.len(),
            None => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let content = r"
User-agent: *
Disallow: /private/
Disallow: /admin/
Allow: /public/

Sitemap: https://example.gov.in/sitemap.xml
        ";

        let robots = RobotsTxt::parse(content);

        assert!(robots.is_allowed("*", "/public/page"));
        assert!(!robots.is_allowed("*", "/private/page"));
        assert!(!robots.is_allowed("*", "/admin/"));
        assert!(robots.is_allowed("*", "/other/page"));
    }

    #[test]
    fn test_specific_user_agent() {
        let content = r"
User-agent: *
Disallow: /

User-agent: goodbot
Disallow:
        ";

        let robots = RobotsTxt::parse(content);

        assert!(!robots.is_allowed("BadBot", "/page"));
        assert!(robots.is_allowed("GoodBot", "/page"));
    }

    #[test]
    fn test_grouped_user_agents_share_rules() {
        let content = r"
User-agent: alpha
User-agent: beta
Disallow: /jobs/
        ";

        let robots = RobotsTxt::parse(content);

        assert!(!robots.is_allowed("alpha", "/jobs/1"));
        assert!(!robots.is_allowed("beta", "/jobs/1"));
        assert!(robots.is_allowed("gamma", "/jobs/1"));
    }

    #[test]
    fn test_longest_match_wins() {
        let content = r"
User-agent: *
Disallow: /private/
Allow: /private/public/
        ";

        let robots = RobotsTxt::parse(content);

        assert!(!robots.is_allowed("*", "/private/secret"));
        assert!(robots.is_allowed("*", "/private/public/page"));
    }

    #[test]
    fn test_wildcards_and_anchors() {
        let content = r"
User-agent: *
Disallow: /*.pdf$
Disallow: /search*q=
        ";

        let robots = RobotsTxt::parse(content);

        assert!(!robots.is_allowed("*", "/notices/2025.pdf"));
        assert!(robots.is_allowed("*", "/notices/2025.pdf.html"));
        assert!(!robots.is_allowed("*", "/search?page=2&q=clerk"));
        assert!(robots.is_allowed("*", "/search?page=2"));
    }

    #[test]
    fn test_comments_are_ignored() {
        let content = "User-agent: * # everyone\nDisallow: /tmp/ # scratch\n";
        let robots = RobotsTxt::parse(content);
        assert!(!robots.is_allowed("*", "/tmp/x"));
    }

    #[test]
    fn test_empty_robots() {
        let robots = RobotsTxt::parse("");
        assert!(robots.is_allowed("AnyBot", "/any/path"));
    }

    #[test]
    fn test_disallow_all() {
        let robots = RobotsTxt::parse("User-agent: *\nDisallow: /\n");

        assert!(!robots.is_allowed("Bot", "/"));
        assert!(!robots.is_allowed("Bot", "/anything"));
    }

    #[test]
    fn test_longest_agent_token_wins() {
        let content = r"
User-agent: job
Disallow: /

User-agent: jobwatch
Allow: /

User-agent: watch
Disallow: /
        ";

        // Each parse gets a fresh map iteration order
        for _ in 0..10 {
            let robots = RobotsTxt::parse(content);
            assert!(robots.is_allowed("Mozilla/5.0 (compatible; JobWatch/0.1)", "/jobs"));
            assert!(!robots.is_allowed("JobBot", "/jobs"));
        }
    }
}
