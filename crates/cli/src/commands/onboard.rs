//! `concierge onboard`: Write the default configuration.

use concierge_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("🏨 Magical Palace Concierge — Setup");
    println!("===================================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("  Config file exists, leaving it untouched: {}", config_path.display());
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Wrote default config: {}", config_path.display());
    }

    println!();
    println!("Next: run `concierge serve` and open http://127.0.0.1:8000");

    Ok(())
}
