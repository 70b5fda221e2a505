use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::bootstrap;
use crate::infrastructure::config::ConfigService;
use crate::interfaces::http;

pub async fn run() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = ConfigService::new().load()?;
    let state = bootstrap::setup(&config)?;

    info!(host = %config.host, port = config.port, "server listening");

    http::start_server(state, &config)?.await?;

    Ok(())
}
