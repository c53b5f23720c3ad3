//! `solaudit chat`: Dispatch one message, or each stdin line, through the
//! audit actions and print their replies.

use super::audit_paths;
use solaudit_actions::default_registry;
use solaudit_config::AppConfig;
use solaudit_core::{ActionRegistry, AgentRuntime, CollectingCallback, Message, Options, State};
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() && config.default_provider != "ollama" {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    OPENROUTER_API_KEY=sk-or-v1-...   (recommended)");
        eprintln!("    OPENAI_API_KEY=sk-...             (for OpenAI direct)");
        eprintln!("    SOLAUDIT_API_KEY=sk-...           (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let router = solaudit_providers::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;
    let runtime = AgentRuntime::new(provider, config.model_settings());
    let registry = default_registry(audit_paths(&config));

    if let Some(text) = message {
        for reply in dispatch(&registry, &runtime, &text).await {
            println!("{reply}");
        }
        return Ok(());
    }

    eprintln!("  Reading messages from stdin, one per line. Ctrl+D to finish.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }
        for reply in dispatch(&registry, &runtime, line).await {
            println!("{reply}");
        }
    }

    Ok(())
}

/// Run the first matching action for `text` and collect its replies.
pub async fn dispatch(registry: &ActionRegistry, runtime: &AgentRuntime, text: &str) -> Vec<String> {
    let message = Message::user(text);
    let callback = CollectingCallback::new();

    match registry
        .dispatch(runtime, &message, &State::new(), &Options::new(), &callback)
        .await
    {
        Some(outcome) => {
            tracing::debug!(action = %outcome.action, success = outcome.success, "Action finished");
            callback.texts()
        }
        None => vec![format!(
            "No action matched. Try one of: {}",
            registry.names().join(", ")
        )],
    }
}
