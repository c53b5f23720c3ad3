//! Action trait: the abstraction over message-triggered behaviors.
//!
//! The host receives a message, asks each action whether it applies
//! (`validate`), and runs the first one that does (`handle`). A handler
//! replies through a [`HandlerCallback`] and reports success as a bool.

use crate::error::ActionError;
use crate::message::{Content, Message};
use crate::runtime::AgentRuntime;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::debug;

/// Conversation state the host threads through handlers.
pub type State = serde_json::Map<String, serde_json::Value>;

/// Free-form per-invocation options.
pub type Options = serde_json::Map<String, serde_json::Value>;

/// One turn of an example conversation, used by the host for few-shot
/// prompting and documentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionExample {
    pub user: String,
    pub content: Content,
}

/// Where a handler sends its user-visible reply.
#[async_trait]
pub trait HandlerCallback: Send + Sync {
    async fn send(&self, content: Content) -> std::result::Result<(), ActionError>;
}

/// Forwards replies into a tokio channel.
pub struct ChannelCallback {
    tx: tokio::sync::mpsc::Sender<Content>,
}

impl ChannelCallback {
    pub fn new(tx: tokio::sync::mpsc::Sender<Content>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl HandlerCallback for ChannelCallback {
    async fn send(&self, content: Content) -> std::result::Result<(), ActionError> {
        self.tx
            .send(content)
            .await
            .map_err(|e| ActionError::Callback(e.to_string()))
    }
}

/// Buffers replies in memory.
#[derive(Debug, Default)]
pub struct CollectingCallback {
    replies: Mutex<Vec<Content>>,
}

impl CollectingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reply texts received so far, in order.
    pub fn texts(&self) -> Vec<String> {
        self.replies
            .lock()
            .map(|r| r.iter().map(|c| c.text.clone()).collect())
            .unwrap_or_default()
    }

    /// Drain the buffered replies.
    pub fn take(&self) -> Vec<Content> {
        self.replies
            .lock()
            .map(|mut r| std::mem::take(&mut *r))
            .unwrap_or_default()
    }
}

#[async_trait]
impl HandlerCallback for CollectingCallback {
    async fn send(&self, content: Content) -> std::result::Result<(), ActionError> {
        self.replies
            .lock()
            .map_err(|e| ActionError::Callback(e.to_string()))?
            .push(content);
        Ok(())
    }
}

/// The core Action trait.
#[async_trait]
pub trait Action: Send + Sync {
    /// Unique name (e.g., "AUDIT_CONTRACT").
    fn name(&self) -> &str;

    /// What this action does.
    fn description(&self) -> &str;

    /// Alternate phrasings that should trigger this action. Advisory only.
    fn similes(&self) -> &[&str];

    /// Whether the host should skip its default acknowledgment message.
    fn suppress_initial_message(&self) -> bool {
        false
    }

    /// Example conversations for the host.
    fn examples(&self) -> Vec<Vec<ActionExample>> {
        Vec::new()
    }

    /// Decide whether this action should handle the message.
    async fn validate(&self, runtime: &AgentRuntime, message: &Message) -> bool;

    /// Do the work and reply through `callback`. Returns whether it succeeded.
    async fn handle(
        &self,
        runtime: &AgentRuntime,
        message: &Message,
        state: &State,
        options: &Options,
        callback: &dyn HandlerCallback,
    ) -> bool;
}

/// Which action ran for a dispatched message, and how it went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub action: String,
    pub success: bool,
}

/// An ordered set of actions.
///
/// Dispatch tries actions in registration order; the first whose
/// `validate` returns true handles the message.
#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action. Replaces an existing action with the same name
    /// without changing its position.
    pub fn register(&mut self, action: Box<dyn Action>) {
        match self.actions.iter().position(|a| a.name() == action.name()) {
            Some(idx) => self.actions[idx] = action,
            None => self.actions.push(action),
        }
    }

    /// Get an action by name.
    pub fn get(&self, name: &str) -> Option<&dyn Action> {
        self.actions
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.as_ref())
    }

    /// Registered actions, in order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Action> {
        self.actions.iter().map(|a| a.as_ref())
    }

    /// Registered action names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run the first action that validates. `None` if nothing matched.
    pub async fn dispatch(
        &self,
        runtime: &AgentRuntime,
        message: &Message,
        state: &State,
        options: &Options,
        callback: &dyn HandlerCallback,
    ) -> Option<DispatchOutcome> {
        for action in &self.actions {
            if !action.validate(runtime, message).await {
                continue;
            }
            debug!(action = %action.name(), message_id = %message.id, "Dispatching message");
            let success = action
                .handle(runtime, message, state, options, callback)
                .await;
            return Some(DispatchOutcome {
                action: action.name().to_string(),
                success,
            });
        }
        debug!(message_id = %message.id, "No action matched");
        None
    }

    /// Run a specific action without consulting `validate`.
    pub async fn handle_named(
        &self,
        name: &str,
        runtime: &AgentRuntime,
        message: &Message,
        state: &State,
        options: &Options,
        callback: &dyn HandlerCallback,
    ) -> std::result::Result<bool, ActionError> {
        let action = self
            .get(name)
            .ok_or_else(|| ActionError::NotFound(name.to_string()))?;
        Ok(action
            .handle(runtime, message, state, options, callback)
            .await)
    }
}
