//! `SECRET_CODE`: audit every contract under the configured directory.
//!
//! Generates the metrics report, saves it to disk, then asks the large model
//! for an analysis grounded on that report.

use crate::AuditPaths;
use crate::error::AuditError;
use async_trait::async_trait;
use solaudit_core::{
    Action, AgentRuntime, Content, HandlerCallback, Message, ModelClass, Options, State,
};
use std::path::Path;
use tracing::{debug, info, warn};

pub struct DirectoryAuditAction {
    paths: AuditPaths,
}

impl DirectoryAuditAction {
    pub fn new(paths: AuditPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &AuditPaths {
        &self.paths
    }

    async fn audit(&self, runtime: &AgentRuntime) -> Result<String, AuditError> {
        let dir = &self.paths.contracts_dir;
        let report = solaudit_metrics::generate_metrics(dir).await?;
        write_report(&self.paths.report_path, &report).await?;
        debug!(path = %self.paths.report_path.display(), bytes = report.len(), "Metrics report saved");

        let prompt = directory_prompt(dir, &report);
        let analysis = runtime.generate_text(&prompt, ModelClass::Large).await?;
        Ok(analysis)
    }
}

fn directory_prompt(dir: &Path, report: &str) -> String {
    format!(
        "Analyze the following smart contract repo contracts {} for security vulnerabilities and provide detailed recommendations and correct contracts code from knowledge based on this report:\n\n{report}",
        dir.display()
    )
}

/// Overwrite `path` with `report`, creating the parent directory first.
async fn write_report(path: &Path, report: &str) -> Result<(), AuditError> {
    let io_error = |source| AuditError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, report).await.map_err(io_error)
}

#[async_trait]
impl Action for DirectoryAuditAction {
    fn name(&self) -> &str {
        "SECRET_CODE"
    }

    fn description(&self) -> &str {
        "Displays secret code"
    }

    fn similes(&self) -> &[&str] {
        &["Show secret code"]
    }

    fn suppress_initial_message(&self) -> bool {
        true
    }

    async fn validate(&self, _runtime: &AgentRuntime, message: &Message) -> bool {
        let text = message.serialized_lowercase();
        text.contains("secret") && text.contains("code")
    }

    async fn handle(
        &self,
        runtime: &AgentRuntime,
        message: &Message,
        _state: &State,
        _options: &Options,
        callback: &dyn HandlerCallback,
    ) -> bool {
        let (reply, success) = match self.audit(runtime).await {
            Ok(analysis) => {
                info!(
                    message_id = %message.id,
                    dir = %self.paths.contracts_dir.display(),
                    "Directory audit completed"
                );
                (
                    format!(
                        "Security Audit Report:\n\n{analysis}\n\nMetrics report saved at: {}",
                        self.paths.report_path.display()
                    ),
                    true,
                )
            }
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Directory audit failed");
                (e.user_text(), false)
            }
        };

        if let Err(e) = callback.send(Content::text(reply)).await {
            warn!(error = %e, "Failed to deliver audit reply");
        }
        success
    }
}
