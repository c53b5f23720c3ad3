pub mod actions;
pub mod chat;
pub mod metrics;
pub mod onboard;
pub mod status;

use solaudit_actions::AuditPaths;
use solaudit_config::AppConfig;

/// Audit paths from the loaded configuration.
pub fn audit_paths(config: &AppConfig) -> AuditPaths {
    AuditPaths {
        contracts_dir: config.audit.contracts_dir.clone(),
        report_path: config.audit.report_path.clone(),
    }
}
