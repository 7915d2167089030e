use log::{error, info};
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
        std::process::exit(1);
    }

    info!("Starting up in {} mode...", config.runtime_env());

    let broadcaster = Arc::new(service::init_broadcaster(&config));
    let app_state = web::AppState::new(config, &broadcaster);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server terminated: {e}");
        std::process::exit(1);
    }

    info!("Server stopped");
}
