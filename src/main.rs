use domain::gate::missing_settings;
use log::{error, info, warn};
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
        std::process::exit(1);
    }

    let missing = missing_settings(&config);
    if !missing.is_empty() {
        warn!("Gate checks will fail at the env step, missing: {missing:?}");
    }
    if config.supabase_url().is_none() || config.supabase_service_role_key().is_none() {
        info!("Supabase is not configured, click tracking is disabled");
    }

    let app_state = AppState::new(config);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
