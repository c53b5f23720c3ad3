//! `solaudit status`: Show configuration status.

use solaudit_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("solaudit Status");
    println!("===============");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Provider:       {}", config.default_provider);
    println!("  Model (small):  {}", config.models.small);
    println!("  Model (medium): {}", config.models.medium);
    println!("  Model (large):  {}", config.models.large);
    println!("  Temperature:    {}", config.default_temperature);
    println!("  Max tokens:     {}", config.default_max_tokens);
    println!("  Contracts dir:  {}", config.audit.contracts_dir.display());
    println!("  Report path:    {}", config.audit.report_path.display());
    println!(
        "  API key:        {}",
        if config.has_api_key() { "set" } else { "missing" }
    );

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `solaudit onboard` first");
    }

    if !config.audit.contracts_dir.is_dir() {
        println!(
            "  ⚠️  Contracts directory {} does not exist",
            config.audit.contracts_dir.display()
        );
    }

    Ok(())
}
