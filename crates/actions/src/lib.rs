//! Smart-contract audit actions.
//!
//! - [`DirectoryAuditAction`] (`SECRET_CODE`) generates a metrics report for
//!   the configured contracts directory, saves it, and asks the model for an
//!   audit based on it.
//! - [`InlineAuditAction`] (`AUDIT_CONTRACT`) audits contract code pasted in
//!   a fenced block of the message body.
//!
//! Both reply through the host callback and never return errors to the host.

pub mod directory_audit;
pub mod error;
pub mod inline_audit;

#[cfg(test)]
mod test_support;

use solaudit_core::ActionRegistry;
use std::path::PathBuf;

pub use directory_audit::DirectoryAuditAction;
pub use error::AuditError;
pub use inline_audit::InlineAuditAction;

/// Filesystem locations used by the directory audit. Relative paths resolve
/// against the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditPaths {
    /// Directory scanned (non-recursively) for `.sol` files.
    pub contracts_dir: PathBuf,
    /// Where the markdown metrics report is written.
    pub report_path: PathBuf,
}

impl Default for AuditPaths {
    fn default() -> Self {
        Self {
            contracts_dir: PathBuf::from("contracts").join("src"),
            report_path: PathBuf::from("contracts").join("metrics-report.md"),
        }
    }
}

/// Register both audit actions. The directory audit goes first, so a message
/// that mentions "secret code" and "audit" runs the directory audit.
pub fn register_all(registry: &mut ActionRegistry, paths: AuditPaths) {
    registry.register(Box::new(DirectoryAuditAction::new(paths)));
    registry.register(Box::new(InlineAuditAction::new()));
}

/// A registry holding just the audit actions.
pub fn default_registry(paths: AuditPaths) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    register_all(&mut registry, paths);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedProvider, runtime};
    use solaudit_core::{CollectingCallback, Message, Options, State};

    #[test]
    fn registration_order() {
        let registry = default_registry(AuditPaths::default());
        assert_eq!(registry.names(), vec!["SECRET_CODE", "AUDIT_CONTRACT"]);
    }

    #[tokio::test]
    async fn dispatch_routes_inline_audit() {
        let registry = default_registry(AuditPaths::default());
        let provider = ScriptedProvider::replying("Looks fine.");
        let callback = CollectingCallback::new();

        let outcome = registry
            .dispatch(
                &runtime(provider),
                &Message::user("Review this\n```contract Foo {}```"),
                &State::new(),
                &Options::new(),
                &callback,
            )
            .await
            .unwrap();

        assert_eq!(outcome.action, "AUDIT_CONTRACT");
        assert!(outcome.success);
        assert_eq!(callback.texts(), vec!["Security Audit Report:\n\nLooks fine.\n\n"]);
    }

    #[tokio::test]
    async fn secret_code_wins_over_audit() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AuditPaths {
            contracts_dir: dir.path().join("missing"),
            report_path: dir.path().join("report.md"),
        };
        let registry = default_registry(paths);
        let callback = CollectingCallback::new();

        let outcome = registry
            .dispatch(
                &runtime(ScriptedProvider::replying("unused")),
                &Message::user("audit the secret code"),
                &State::new(),
                &Options::new(),
                &callback,
            )
            .await
            .unwrap();

        assert_eq!(outcome.action, "SECRET_CODE");
        assert!(!outcome.success);
    }

    #[test]
    fn default_paths() {
        let paths = AuditPaths::default();
        assert!(paths.contracts_dir.ends_with("contracts/src"));
        assert!(paths.report_path.ends_with("contracts/metrics-report.md"));
    }
}
