//! `concierge doctor`: Diagnose configuration and knowledge source.

use concierge_config::AppConfig;
use concierge_core::KnowledgeStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Concierge Doctor: System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults (run `concierge onboard` to create one)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            Some(config)
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            issues += 1;
            None
        }
    };

    if let Some(config) = &config {
        match config.knowledge_path() {
            Some(path) => match KnowledgeStore::load_from(&path) {
                Ok(store) => println!(
                    "  ✅ Knowledge file loaded: {} ({} records)",
                    path.display(),
                    store.len()
                ),
                Err(e) => {
                    println!("  ❌ Knowledge file unusable: {e}");
                    issues += 1;
                }
            },
            None => println!(
                "  ✅ Using built-in guide ({} records)",
                KnowledgeStore::builtin().len()
            ),
        }

        if let Err(e) = concierge_gateway::cors_layer(&config.gateway.allowed_origins) {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
