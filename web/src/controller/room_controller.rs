use crate::templates::ROOM_TEMPLATE;
use crate::{AppState, Error};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use serde_json::json;

use log::*;

/// GET the room page with every current message. The page subscribes itself to `/events`.
pub async fn index(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let messages = app_state.room.list_messages();
    debug!("GET Room with {} message(s)", messages.len());

    let page = app_state
        .templates
        .render(ROOM_TEMPLATE, &json!({ "messages": messages }))?;

    Ok(Html(page))
}

#[cfg(test)]
mod tests {
    use crate::router::define_routes;
    use crate::test_state;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_index_lists_messages() {
        let app_state = test_state();
        let message = app_state.room.add_message("first!");
        let app = define_routes(app_state);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let page = std::str::from_utf8(&body).unwrap();
        assert!(page.contains(&format!("id=\"message-{}\"", message.id)));
        assert!(page.contains("<p>first!</p>"));
    }
}
