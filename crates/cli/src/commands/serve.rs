//! `bizpilot serve`: start the HTTP API server.

use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }

    println!("🧭 bizpilot gateway");
    println!("   Listening:   {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:       {}", config.default_model);
    println!("   CORS origin: {}", config.gateway.cors_origin);
    match &config.data.base_url {
        Some(url) => println!("   Live data:   {url}"),
        None => println!("   Live data:   off"),
    }

    bizpilot_gateway::start(config).await?;

    Ok(())
}
