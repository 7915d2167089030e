use config::Config;
use log::info;
use sse::Broadcaster;

pub mod config;
pub mod logging;

/// Build the process's broadcaster from the stream settings in `config`.
pub fn init_broadcaster(config: &Config) -> Broadcaster {
    let settings = config.connection_settings();
    info!(
        "SSE broadcaster config: buffer_capacity={}, max_rejected_deliveries={}, keep_alive={}s",
        settings.buffer_capacity,
        settings.max_rejected_deliveries,
        config.keep_alive_interval().as_secs(),
    );

    Broadcaster::with_settings(settings)
}
