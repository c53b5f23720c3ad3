//! `AUDIT_CONTRACT`: audit contract code pasted into the message.

use crate::error::AuditError;
use async_trait::async_trait;
use regex_lite::Regex;
use solaudit_core::{
    Action, AgentRuntime, Content, HandlerCallback, Message, ModelClass, Options, State,
};
use tracing::{debug, info, warn};

/// First fenced block whose body reaches a `contract` keyword. Group 1 starts
/// at that keyword.
const CODE_BLOCK: &str = r"(?i)```[\s\S]*?(contract[\s\S]*?)```";

const TRIGGERS: [&str; 3] = ["audit", "check", "review"];

#[derive(Debug, Default)]
pub struct InlineAuditAction;

impl InlineAuditAction {
    pub fn new() -> Self {
        Self
    }

    async fn audit(&self, runtime: &AgentRuntime, message: &Message) -> Result<String, AuditError> {
        let code = extract_contract(&message.content).ok_or(AuditError::Usage)?;
        debug!(code_chars = code.len(), "Extracted contract code");

        let prompt = inline_prompt(code);
        let analysis = runtime.generate_text(&prompt, ModelClass::Large).await?;
        Ok(analysis)
    }
}

/// Pull the contract source out of a fenced code block in `body`.
pub fn extract_contract(body: &str) -> Option<&str> {
    Regex::new(CODE_BLOCK)
        .ok()?
        .captures(body)?
        .get(1)
        .map(|m| m.as_str())
}

fn inline_prompt(code: &str) -> String {
    format!(
        "Analyze the following smart contract code for security vulnerabilities and provide detailed recommendations and correct contract code from knowledge:\n\n{code}\n"
    )
}

#[async_trait]
impl Action for InlineAuditAction {
    fn name(&self) -> &str {
        "AUDIT_CONTRACT"
    }

    fn description(&self) -> &str {
        "Analyzes smart contract code for security vulnerabilities and provides recommendations"
    }

    fn similes(&self) -> &[&str] {
        &[
            "Audit this contract",
            "Check contract security",
            "Review smart contract",
        ]
    }

    fn suppress_initial_message(&self) -> bool {
        true
    }

    async fn validate(&self, _runtime: &AgentRuntime, message: &Message) -> bool {
        let text = message.serialized_lowercase();
        TRIGGERS.iter().any(|t| text.contains(t))
    }

    async fn handle(
        &self,
        runtime: &AgentRuntime,
        message: &Message,
        _state: &State,
        _options: &Options,
        callback: &dyn HandlerCallback,
    ) -> bool {
        let (reply, success) = match self.audit(runtime, message).await {
            Ok(analysis) => {
                info!(message_id = %message.id, "Inline audit completed");
                (format!("Security Audit Report:\n\n{analysis}\n\n"), true)
            }
            Err(AuditError::Usage) => {
                debug!(message_id = %message.id, "No contract code block in message");
                (AuditError::Usage.user_text(), false)
            }
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Inline audit failed");
                (e.user_text(), false)
            }
        };

        if let Err(e) = callback.send(Content::text(reply)).await {
            warn!(error = %e, "Failed to deliver audit reply");
        }
        success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::USAGE_TEXT;
    use crate::test_support::{ScriptedProvider, runtime};
    use solaudit_core::{CollectingCallback, ProviderError};

    async fn run(provider: std::sync::Arc<ScriptedProvider>, body: &str) -> (bool, Vec<String>) {
        let rt = runtime(provider);
        let callback = CollectingCallback::new();
        let ok = InlineAuditAction::new()
            .handle(&rt, &Message::user(body), &State::new(), &Options::new(), &callback)
            .await;
        (ok, callback.texts())
    }

    #[test]
    fn extracts_from_solidity_fence() {
        let body = "Please audit:\n```solidity\ncontract Foo {}\n```\nthanks";
        let code = extract_contract(body).unwrap();
        assert!(code.starts_with("contract Foo {}"));
        assert_eq!(code, "contract Foo {}\n");
    }

    #[test]
    fn extraction_skips_pragma_before_contract() {
        let body = "```\npragma solidity ^0.8.0;\nContract Bar { }\n```";
        assert_eq!(extract_contract(body), Some("Contract Bar { }\n"));
    }

    #[test]
    fn first_block_wins() {
        let body = "```contract A {}```\nand\n```contract B {}```";
        assert_eq!(extract_contract(body), Some("contract A {}"));
    }

    #[test]
    fn no_fence_no_code() {
        assert_eq!(extract_contract("contract Foo {}"), None);
        assert_eq!(extract_contract("```\nlet x = 1;\n```"), None);
    }

    #[tokio::test]
    async fn validate_triggers() {
        let action = InlineAuditAction::new();
        let rt = runtime(ScriptedProvider::replying("ok"));
        assert!(action.validate(&rt, &Message::user("Please AUDIT this")).await);
        assert!(action.validate(&rt, &Message::user("check it")).await);
        assert!(action.validate(&rt, &Message::user("Review my code")).await);
        assert!(!action.validate(&rt, &Message::user("hello there")).await);
    }

    #[tokio::test]
    async fn code_goes_into_the_prompt() {
        let provider = ScriptedProvider::replying("No issues found.");
        let (ok, texts) = run(
            provider.clone(),
            "audit this\n```solidity\ncontract Foo {}\n```",
        )
        .await;

        assert!(ok);
        assert_eq!(texts, vec!["Security Audit Report:\n\nNo issues found.\n\n"]);
        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(
            prompts[0],
            "Analyze the following smart contract code for security vulnerabilities and provide detailed recommendations and correct contract code from knowledge:\n\ncontract Foo {}\n\n"
        );
        assert_eq!(provider.models(), vec!["test-large"]);
    }

    #[tokio::test]
    async fn missing_code_block_asks_for_code() {
        let provider = ScriptedProvider::replying("unused");
        let (ok, texts) = run(provider.clone(), "audit my contract please").await;
        assert!(!ok);
        assert_eq!(texts, vec![USAGE_TEXT]);
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn code_in_metadata_is_ignored() {
        let provider = ScriptedProvider::replying("unused");
        let rt = runtime(provider.clone());
        let callback = CollectingCallback::new();
        let message = Message::user("audit the attached")
            .with_metadata("attachment", serde_json::json!("```contract X {}```"));

        let ok = InlineAuditAction::new()
            .handle(&rt, &message, &State::new(), &Options::new(), &callback)
            .await;
        assert!(!ok);
        assert_eq!(callback.texts(), vec![USAGE_TEXT]);
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn model_failure_is_reported() {
        let provider = ScriptedProvider::failing(ProviderError::Timeout("120s elapsed".into()));
        let (ok, texts) = run(provider, "review\n```contract Foo {}```").await;
        assert!(!ok);
        assert_eq!(
            texts,
            vec!["Error analyzing contract: Request timed out: 120s elapsed"]
        );
    }

    #[tokio::test]
    async fn empty_model_reply_is_an_error() {
        let provider = ScriptedProvider::replying("   ");
        let (ok, texts) = run(provider, "review\n```contract Foo {}```").await;
        assert!(!ok);
        assert!(texts[0].starts_with("Error analyzing contract: "));
        assert!(texts[0].contains("empty response"));
    }

    #[test]
    fn metadata() {
        let action = InlineAuditAction::new();
        assert_eq!(action.name(), "AUDIT_CONTRACT");
        assert_eq!(action.similes().len(), 3);
        assert!(action.suppress_initial_message());
        assert!(action.examples().is_empty());
    }
}
