//! `solaudit actions`: List registered actions.

use solaudit_actions::{AuditPaths, default_registry};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = default_registry(AuditPaths::default());

    println!("Registered actions ({}), in dispatch order:\n", registry.len());
    for action in registry.iter() {
        println!("  {}", action.name());
        println!("    {}", action.description());
        if !action.similes().is_empty() {
            println!("    Similes: {}", action.similes().join(", "));
        }
        println!();
    }

    Ok(())
}
