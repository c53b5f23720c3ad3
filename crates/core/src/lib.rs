//! # solaudit core
//!
//! Domain types, traits, and error definitions shared by the solaudit crates.
//! Nothing here talks to the network or the filesystem; it defines the model
//! the other crates implement against.
//!
//! ## Seams
//!
//! - [`Provider`]: an LLM backend that completes a request.
//! - [`Action`]: a message-triggered unit of behavior (validate + handle).
//! - [`HandlerCallback`]: where an action sends its user-visible reply.
//! - [`AgentRuntime`]: what an action sees of the host (text generation by
//!   model tier).

pub mod action;
pub mod error;
pub mod message;
pub mod provider;
pub mod runtime;

// Re-export key types at crate root for ergonomics
pub use action::{
    Action, ActionExample, ActionRegistry, ChannelCallback, CollectingCallback, DispatchOutcome,
    HandlerCallback, Options, State,
};
pub use error::{ActionError, Error, ProviderError, Result};
pub use message::{Content, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use runtime::{AgentRuntime, ModelClass, ModelSettings};
