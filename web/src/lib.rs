//! HTTP surface: the `/events` stream endpoint plus the demo room pages that
//! publish into it.

use axum::http::{HeaderValue, Method};
use log::*;
use service::config::Config;
use ::sse::{Broadcaster, FragmentRenderer};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

mod controller;
mod error;
mod params;
pub mod room;
pub mod router;
mod sse;
pub mod templates;

pub use error::{Error, Result};

use room::Room;
use templates::RoomTemplates;

// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub broadcaster: Arc<Broadcaster>,
    pub room: Arc<Room>,
    pub templates: Arc<dyn FragmentRenderer>,
}

impl AppState {
    pub fn new(app_config: Config, broadcaster: &Arc<Broadcaster>) -> Self {
        Self {
            config: app_config,
            broadcaster: Arc::clone(broadcaster),
            room: Arc::new(Room::with_greeting()),
            templates: Arc::new(RoomTemplates),
        }
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let listen_addr = format!(
        "{}:{}",
        app_state.config.interface(),
        app_state.config.port
    );

    info!("Server starting... listening for connections on http://{listen_addr}");

    let cors_layer = cors_layer(&app_state.config);
    let broadcaster = Arc::clone(&app_state.broadcaster);
    let listener = TcpListener::bind(&listen_addr).await?;

    axum::serve(listener, router::define_routes(app_state).layer(cors_layer))
        .with_graceful_shutdown(shutdown_signal(broadcaster))
        .await
}

fn cors_layer(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(config))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_credentials(true)
}

// Production only accepts https origins.
fn allowed_origins(config: &Config) -> Vec<HeaderValue> {
    config
        .allowed_origins
        .iter()
        .filter(|origin| {
            let allowed = !config.is_production() || origin.starts_with("https://");
            if !allowed {
                warn!("Ignoring non-https CORS origin {origin} in production");
            }
            allowed
        })
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {origin}: {e}");
                None
            }
        })
        .collect()
}

// Event streams never end on their own, so every group is closed before the
// server waits for in-flight responses to drain.
async fn shutdown_signal(broadcaster: Arc<Broadcaster>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for the shutdown signal: {e}");
        return;
    }

    info!("Shutdown signal received, closing all event streams");
    broadcaster.close_all();
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use clap::Parser;

    let config = Config::parse_from(["hotwire_rs"]);
    let broadcaster = Arc::new(Broadcaster::with_settings(config.connection_settings()));
    AppState {
        config,
        broadcaster,
        room: Arc::new(Room::new()),
        templates: Arc::new(RoomTemplates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_skips_invalid_origins() {
        use clap::Parser;

        let config = Config::parse_from([
            "hotwire_rs",
            "--allowed-origins",
            "http://localhost:3000,bad\norigin",
        ]);
        assert_eq!(allowed_origins(&config), vec!["http://localhost:3000"]);
        // Building the layer must not panic on the invalid entry
        let _layer = cors_layer(&config);
    }

    #[test]
    fn test_production_only_allows_https_origins() {
        use clap::Parser;

        let origins = "http://localhost:3000,https://chat.example.com";
        let development = Config::parse_from(["hotwire_rs", "--allowed-origins", origins]);
        let production = Config::parse_from([
            "hotwire_rs",
            "--allowed-origins",
            origins,
            "--runtime-env",
            "production",
        ]);

        assert_eq!(allowed_origins(&development).len(), 2);
        assert_eq!(allowed_origins(&production), vec!["https://chat.example.com"]);
    }

    #[test]
    fn test_app_state_shares_the_broadcaster() {
        use clap::Parser;

        let config = Config::parse_from(["hotwire_rs"]);
        let broadcaster = Arc::new(Broadcaster::new());
        let app_state = AppState::new(config, &broadcaster);

        assert!(Arc::ptr_eq(&app_state.broadcaster, &broadcaster));
        assert_eq!(app_state.room.list_messages().len(), 1);
    }
}
