//! Robots.txt policy checking
//!
//! Consulted once before discovery begins. An explicit disallow of the
//! audited start URL aborts the whole audit (fail-closed); a robots.txt
//! that cannot be fetched is treated as allow-all.

use reqwest::Client;
use robotstxt::DefaultMatcher;
use url::Url;

/// Result of a robots-policy check
#[derive(Debug, Clone)]
pub struct RobotsVerdict {
    pub allowed: bool,
    /// Populated when disallowed, for the user-visible error
    pub reason: Option<String>,
    /// Crawl-delay in seconds, when the site specifies one
    pub crawl_delay: Option<f64>,
}

/// Parsed robots.txt data
///
/// Wraps the robotstxt crate's matcher; an empty content string means
/// allow-all.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    content: String,
}

impl ParsedRobots {
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Permissive default, used when robots.txt cannot be fetched
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// Checks if a URL is allowed for the given user agent
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.is_empty() {
            return true;
        }
        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// Prefers a group naming the agent over the wildcard group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        if self.content.is_empty() {
            return None;
        }

        let normalized_agent = user_agent.to_lowercase();
        let mut current_agents: Vec<String> = Vec::new();
        let mut wildcard_delay: Option<f64> = None;
        let mut agent_delay: Option<f64> = None;

        for line in self.content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => current_agents.push(value.to_lowercase()),
                "crawl-delay" => {
                    if let Ok(delay) = value.parse::<f64>() {
                        if current_agents.iter().any(|ua| ua == "*") {
                            wildcard_delay = Some(delay);
                        }
                        if current_agents
                            .iter()
                            .any(|ua| ua != "*" && normalized_agent.contains(ua.as_str()))
                        {
                            agent_delay = Some(delay);
                        }
                    }
                    current_agents.clear();
                }
                _ => {}
            }
        }

        agent_delay.or(wildcard_delay)
    }
}

/// Fetches robots.txt from the origin of `base`
///
/// Any fetch failure or non-2xx status yields the permissive default; robots
/// enforcement must never make an unreachable robots.txt fatal.
pub async fn fetch_robots(client: &Client, base: &Url) -> ParsedRobots {
    let url = match base.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot derive robots.txt URL from {}: {}", base, e);
            return ParsedRobots::allow_all();
        }
    };

    match client.get(url.as_str()).send().await {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(content) => ParsedRobots::from_content(&content),
            Err(e) => {
                tracing::debug!("Failed to read robots.txt body from {}: {}", url, e);
                ParsedRobots::allow_all()
            }
        },
        Ok(response) => {
            tracing::debug!("robots.txt at {} answered {}", url, response.status());
            ParsedRobots::allow_all()
        }
        Err(e) => {
            tracing::debug!("Failed to fetch robots.txt from {}: {}", url, e);
            ParsedRobots::allow_all()
        }
    }
}

/// Checks whether the audit may proceed for the given start URL
pub async fn check_start_url(client: &Client, base: &Url, user_agent: &str) -> RobotsVerdict {
    let robots = fetch_robots(client, base).await;
    let allowed = robots.is_allowed(base.as_str(), user_agent);
    RobotsVerdict {
        allowed,
        reason: (!allowed)
            .then(|| format!("robots.txt disallows {} for {}", base, user_agent)),
        crawl_delay: robots.crawl_delay(user_agent),
    }
}
