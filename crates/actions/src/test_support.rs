//! Scripted provider for handler tests.

use async_trait::async_trait;
use solaudit_core::{
    AgentRuntime, Message, ModelSettings, Provider, ProviderError, ProviderRequest,
    ProviderResponse,
};
use std::sync::{Arc, Mutex};

/// Returns a fixed reply (or error) and records every prompt it sees.
pub struct ScriptedProvider {
    reply: Result<String, ProviderError>,
    prompts: Mutex<Vec<String>>,
    models: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
            models: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
            models: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn models(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);
        self.models.lock().unwrap().push(request.model.clone());

        let text = self.reply.clone()?;
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: None,
            model: request.model,
        })
    }
}

pub fn runtime(provider: Arc<ScriptedProvider>) -> AgentRuntime {
    AgentRuntime::new(
        provider,
        ModelSettings {
            small: "test-small".into(),
            medium: "test-medium".into(),
            large: "test-large".into(),
            temperature: 0.2,
            max_tokens: None,
        },
    )
}
