//! Configuration loading and validation
//!
//! Audit runs are configured through a TOML file with kebab-case keys.
//! Library users can also build a [`Config`] directly; [`DiscoveryConfig`]
//! has sensible defaults for embedding.

mod parser;
mod types;
mod validation;

pub use parser::{load_config, load_config_with_hash};
pub use types::{AuditTarget, Config, DiscoveryConfig, OutputConfig, UserAgentConfig};
pub use validation::validate_config;
