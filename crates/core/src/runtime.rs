//! The slice of the host runtime that actions depend on.
//!
//! Actions ask for text by [`ModelClass`]; the runtime maps the class to a
//! configured model name and forwards the prompt to its provider.

use crate::error::ProviderError;
use crate::message::Message;
use crate::provider::{Provider, ProviderRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Capability/cost tier for a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelClass {
    Small,
    Medium,
    Large,
}

impl std::fmt::Display for ModelClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelClass::Small => write!(f, "small"),
            ModelClass::Medium => write!(f, "medium"),
            ModelClass::Large => write!(f, "large"),
        }
    }
}

/// Model names per tier plus sampling defaults.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub small: String,
    pub medium: String,
    pub large: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl ModelSettings {
    /// Resolve the model name for a tier.
    pub fn model_for(&self, class: ModelClass) -> &str {
        match class {
            ModelClass::Small => &self.small,
            ModelClass::Medium => &self.medium,
            ModelClass::Large => &self.large,
        }
    }
}

/// Shared handle passed to every action invocation.
#[derive(Clone)]
pub struct AgentRuntime {
    provider: Arc<dyn Provider>,
    models: ModelSettings,
}

impl AgentRuntime {
    pub fn new(provider: Arc<dyn Provider>, models: ModelSettings) -> Self {
        Self { provider, models }
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn models(&self) -> &ModelSettings {
        &self.models
    }

    /// Generate text for a single prompt at the given tier.
    ///
    /// The completion is returned as-is. A blank one is reported as
    /// [`ProviderError::EmptyResponse`].
    pub async fn generate_text(
        &self,
        context: &str,
        class: ModelClass,
    ) -> std::result::Result<String, ProviderError> {
        let model = self.models.model_for(class).to_string();
        debug!(
            provider = %self.provider.name(),
            model = %model,
            class = %class,
            prompt_chars = context.len(),
            "Generating text"
        );

        let request = ProviderRequest {
            model: model.clone(),
            messages: vec![Message::user(context)],
            temperature: self.models.temperature,
            max_tokens: self.models.max_tokens,
            stop: Vec::new(),
        };

        let response = self.provider.complete(request).await?;
        let text = response.message.content;
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse(model));
        }
        Ok(text)
    }
}

impl std::fmt::Debug for AgentRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRuntime")
            .field("provider", &self.provider.name())
            .field("models", &self.models)
            .finish()
    }
}
