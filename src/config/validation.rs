use crate::config::types::{
    AuditTarget, Config, DiscoveryConfig, OutputConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    validate_audit_target(&config.audit)?;
    validate_discovery_config(&config.discovery)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the audit target
fn validate_audit_target(audit: &AuditTarget) -> Result<(), ConfigError> {
    if audit.domain.is_empty() {
        return Err(ConfigError::Validation(
            "audit domain cannot be empty".to_string(),
        ));
    }

    if audit.domain.contains('/') || audit.domain.contains(':') {
        return Err(ConfigError::Validation(format!(
            "audit domain must be a bare hostname, got '{}'",
            audit.domain
        )));
    }

    if let Some(start_url) = &audit.start_url {
        let url = Url::parse(start_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start-url: {}", e)))?;
        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "start-url has no host: {}",
                start_url
            )));
        }
    }

    Ok(())
}

/// Validates discovery limits
fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.batch_size < 1 || config.batch_size > 10 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be between 1 and 10, got {}",
            config.batch_size
        )));
    }

    if config.max_links_per_page < 1 {
        return Err(ConfigError::Validation(format!(
            "max_links_per_page must be >= 1, got {}",
            config.max_links_per_page
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 60 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 60, got {}",
            config.request_timeout_secs
        )));
    }

    if config.sitemap_timeout_secs < 1 || config.sitemap_timeout_secs > 60 {
        return Err(ConfigError::Validation(format!(
            "sitemap_timeout_secs must be between 1 and 60, got {}",
            config.sitemap_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation: one @ with non-empty local and domain parts
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid contact_email: '{}'",
            email
        )));
    }
    Ok(())
}
