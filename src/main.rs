use chrono::Utc;
use github_notify::bus::LogPublisher;
use github_notify::error::NotifyError;
use github_notify::{AppState, NotifyConfig, Stats, handlers, logging};
use std::fs;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_CONFIG_PATH: &str = "notify_config.toml";

/// Load and parse the configuration file. A missing file is not an error;
/// the service runs fine on defaults.
fn load_config(path: &str) -> Result<NotifyConfig, NotifyError> {
    let config_str = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(NotifyConfig::default()),
        Err(e) => {
            return Err(NotifyError::ConfigError(format!(
                "Failed to read config file '{}': {}",
                path, e
            )));
        }
    };

    let config: NotifyConfig = toml::from_str(&config_str).map_err(|e| {
        NotifyError::ConfigError(format!("Failed to parse config file '{}': {}", path, e))
    })?;

    Ok(config)
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let config_path =
        std::env::var("NOTIFY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config: NotifyConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let _log_guard = logging::init(config.log_directory.as_deref());

    let state = Arc::new(AppState {
        config,
        publisher: Arc::new(LogPublisher),
        stats: Stats::default(),
        start_time: Instant::now(),
        started_at: Utc::now(),
    });

    let app = handlers::app(state);

    info!("Listening on {}", bind_address);
    info!("Using config at {:?}", config_path);
    let listener = tokio::net::TcpListener::bind(bind_address).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
