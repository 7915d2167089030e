use crate::controller::{health_check_controller, message_controller, room_controller};
use crate::{sse::handler::sse_handler, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(event_stream_routes(app_state.clone()))
        .merge(room_routes(app_state.clone()))
        .merge(message_routes(app_state))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn event_stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/events", get(sse_handler))
        .with_state(app_state)
}

fn room_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(room_controller::index))
        .with_state(app_state)
}

fn message_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/messages", post(message_controller::create))
        .route("/messages/:id", post(message_controller::update))
        .route("/messages/:id", delete(message_controller::delete))
        .with_state(app_state)
}
