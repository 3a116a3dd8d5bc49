//! `concierge serve`: Start the HTTP gateway.

use concierge_config::{AppConfig, ConfigError};

pub async fn run(
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    apply_overrides(&mut config, host_override, port_override)
        .map_err(|e| format!("Invalid command-line override: {e}"))?;

    println!("🏨 Magical Palace Concierge");
    println!("   Listening: http://{}:{}", config.gateway.host, config.gateway.port);
    println!(
        "   Cache: {}",
        if config.cache.enabled {
            format!("on, {}s TTL", config.cache.ttl_secs)
        } else {
            "off".to_string()
        }
    );

    concierge_gateway::start(config).await?;

    Ok(())
}

/// Apply `--host`/`--port` on top of the loaded config, then re-validate.
fn apply_overrides(
    config: &mut AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), ConfigError> {
    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }
    config.validate()
}
