//! Failures inside an audit handler.
//!
//! Each step returns `Result<_, AuditError>`; the handler turns the error
//! into reply text once, with [`AuditError::user_text`].

use solaudit_core::ProviderError;
use solaudit_metrics::MetricsError;
use std::path::PathBuf;

/// Reply sent when a message has no fenced contract code.
pub const USAGE_TEXT: &str = "Please provide the smart contract code enclosed in code blocks (```).";

/// Prefix for every non-usage failure reply.
pub const ERROR_PREFIX: &str = "Error analyzing contract";

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The message did not carry what the action needs.
    #[error("{}", USAGE_TEXT)]
    Usage,

    #[error(transparent)]
    Generation(#[from] MetricsError),

    #[error("failed to write report {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Model(#[from] ProviderError),
}

impl AuditError {
    /// Text for the user-facing callback.
    pub fn user_text(&self) -> String {
        match self {
            AuditError::Usage => USAGE_TEXT.to_string(),
            other => format!("{ERROR_PREFIX}: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_text_is_verbatim() {
        assert_eq!(
            AuditError::Usage.user_text(),
            "Please provide the smart contract code enclosed in code blocks (```)."
        );
    }

    #[test]
    fn model_errors_are_prefixed() {
        let err = AuditError::from(ProviderError::Network("connection reset".into()));
        assert_eq!(
            err.user_text(),
            "Error analyzing contract: Network error: connection reset"
        );
    }

    #[test]
    fn generation_errors_carry_metrics_message() {
        let err = AuditError::from(MetricsError::NotFound {
            path: PathBuf::from("contracts/src"),
        });
        assert_eq!(
            err.user_text(),
            "Error analyzing contract: path not found: contracts/src"
        );
    }

    #[test]
    fn io_errors_name_the_report() {
        let err = AuditError::Io {
            path: PathBuf::from("out/report.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let text = err.user_text();
        assert!(text.starts_with("Error analyzing contract: failed to write report out/report.md"));
        assert!(text.ends_with("denied"));
    }
}
