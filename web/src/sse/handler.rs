use crate::params::stream::StreamParams;
use crate::AppState;
use async_stream::stream;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures::Stream;
use log::*;
use sse::Subscription;
use std::convert::Infallible;

/// SSE handler that streams one group's envelopes to a browser.
/// The connection stays registered for as long as the response body is alive.
pub(crate) async fn sse_handler(
    State(app_state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> impl IntoResponse {
    let group = params.group_or(app_state.config.default_group());
    debug!("Establishing SSE connection for group '{group}'");

    let subscription = app_state.broadcaster.subscribe(group);

    (
        [(header::CONNECTION, "keep-alive")],
        Sse::new(event_stream(subscription))
            .keep_alive(KeepAlive::new().interval(app_state.config.keep_alive_interval())),
    )
}

// axum drops this stream when the client disconnects, and dropping the
// subscription unsubscribes it.
fn event_stream(mut subscription: Subscription) -> impl Stream<Item = Result<Event, Infallible>> {
    stream! {
        while let Some(event) = subscription.recv().await {
            yield Ok::<Event, Infallible>(event.to_sse_event());
        }

        debug!(
            "SSE connection {} in group '{}' closed by the server",
            subscription.id().as_str(),
            subscription.group()
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::router::define_routes;
    use crate::test_state;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use sse::Action;
    use std::time::Duration;
    use tower::ServiceExt;

    async fn next_frame(body: &mut Body) -> Option<String> {
        let frame = tokio::time::timeout(Duration::from_secs(2), body.frame())
            .await
            .expect("timed out waiting for a frame")?
            .expect("body error");
        let data = frame.into_data().expect("expected a data frame");
        Some(String::from_utf8(data.to_vec()).unwrap())
    }

    fn events_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_stream_response_headers() {
        let app_state = test_state();
        let app = define_routes(app_state);

        let response = app.oneshot(events_request("/events")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(response.headers()[header::CONNECTION], "keep-alive");
    }

    #[tokio::test]
    async fn test_stream_delivers_room_message_frame() {
        let app_state = test_state();
        let broadcaster = app_state.broadcaster.clone();
        let app = define_routes(app_state);

        let response = app
            .oneshot(events_request("/events?group=room-messages"))
            .await
            .unwrap();
        assert_eq!(broadcaster.connection_count("room-messages"), 1);

        broadcaster
            .broadcast("room-messages", Action::Append, "room-messages", "<div>hi</div>")
            .unwrap();

        let mut body = response.into_body();
        let frame = next_frame(&mut body).await.unwrap();

        assert!(frame.contains("id: 2\n"));
        assert!(frame.contains("event: message\n"));
        assert!(frame.contains(
            "data: <turbo-stream action=\"append\" target=\"room-messages\">\
             <template><div>hi</div></template></turbo-stream>\n"
        ));
        assert!(frame.ends_with("\n\n"));
    }

    #[tokio::test]
    async fn test_multi_line_payload_becomes_multiple_data_lines() {
        let app_state = test_state();
        let broadcaster = app_state.broadcaster.clone();
        let app = define_routes(app_state);

        let response = app.oneshot(events_request("/events")).await.unwrap();
        broadcaster
            .broadcast("", Action::Update, "t", "<p>one</p>\r\n<p>two</p>")
            .unwrap();

        let mut body = response.into_body();
        let frame = next_frame(&mut body).await.unwrap();

        assert!(frame.contains(
            "data: <turbo-stream action=\"update\" target=\"t\"><template><p>one</p>\n\
             data: <p>two</p></template></turbo-stream>\n\n"
        ));
    }

    #[tokio::test]
    async fn test_absent_group_uses_default_group() {
        let app_state = test_state();
        let broadcaster = app_state.broadcaster.clone();
        let app = define_routes(app_state);

        let _response = app.oneshot(events_request("/events?group=")).await.unwrap();

        assert_eq!(broadcaster.connection_count(""), 1);
    }

    #[tokio::test]
    async fn test_configured_default_group_is_used() {
        let mut app_state = test_state();
        app_state.config = app_state.config.set_default_group("lobby");
        let broadcaster = app_state.broadcaster.clone();
        let app = define_routes(app_state);

        let _response = app.oneshot(events_request("/events")).await.unwrap();

        assert_eq!(broadcaster.connection_count("lobby"), 1);
        assert_eq!(broadcaster.connection_count(""), 0);
    }

    #[tokio::test]
    async fn test_dropping_the_response_unsubscribes() {
        let app_state = test_state();
        let broadcaster = app_state.broadcaster.clone();
        let app = define_routes(app_state);

        let response = app
            .oneshot(events_request("/events?group=room"))
            .await
            .unwrap();
        assert_eq!(broadcaster.connection_count("room"), 1);

        drop(response);

        assert_eq!(broadcaster.connection_count("room"), 0);
    }

    #[tokio::test]
    async fn test_closing_the_group_ends_the_stream() {
        let app_state = test_state();
        let broadcaster = app_state.broadcaster.clone();
        let app = define_routes(app_state);

        let response = app
            .oneshot(events_request("/events?group=room"))
            .await
            .unwrap();
        let mut body = response.into_body();

        broadcaster.close("room");

        assert!(next_frame(&mut body).await.is_none());
    }
}
