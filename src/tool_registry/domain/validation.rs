//! Pre-connection validation of server descriptors.

use super::ids::is_name_charset;
use super::{McpTransport, ServerDescriptor};
use serde::Serialize;

/// Outcome of validating a server descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigValidation {
    valid: bool,
    errors: Vec<String>,
}

impl ConfigValidation {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Returns whether the descriptor passed every check.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the human-readable problems found, in check order.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Consumes the outcome and returns its problems.
    #[must_use]
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Validates a descriptor before a connection is attempted.
///
/// Checks are pure and never touch the network. Every problem is reported,
/// not only the first.
#[must_use]
pub fn validate_server_config(descriptor: &ServerDescriptor) -> ConfigValidation {
    let mut errors = Vec::new();

    if !descriptor.is_enabled() {
        errors.push(format!("Server '{}' is disabled", descriptor.name()));
    }

    match descriptor.transport() {
        McpTransport::Stdio(config) => {
            if config.command().is_empty() {
                errors.push("Command is required".to_owned());
            }
            if config.args().is_empty() {
                errors.push("Args are required".to_owned());
            }
            if config.working_directory() == Some("") {
                errors.push("Working directory must not be empty when provided".to_owned());
            }
            if descriptor.is_enabled() {
                errors.extend(
                    config
                        .env()
                        .iter()
                        .filter(|(_, value)| value.trim().is_empty())
                        .map(|(key, _)| format!("Missing required environment variable: {key}")),
                );
            }
        }
        McpTransport::Http(config) => {
            let url = config.url();
            if url.is_empty() {
                errors.push("URL is required".to_owned());
            } else if !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.push(format!("URL '{url}' must start with 'http://' or 'https://'"));
            }
        }
    }

    errors.extend(
        descriptor
            .categories()
            .iter()
            .filter(|tag| tag.is_empty() || !is_name_charset(tag))
            .map(|tag| format!("Category tag '{tag}' is malformed")),
    );

    ConfigValidation::from_errors(errors)
}
