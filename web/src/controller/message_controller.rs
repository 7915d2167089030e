use crate::controller::ApiResponse;
use crate::params::message::MessageParams;
use crate::room::{self, MESSAGES_TARGET};
use crate::templates::MESSAGE_TEMPLATE;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::{Form, Json};
use sse::{Action, RenderError};

use log::*;

/// POST a new message to the room and append it on every open page.
pub async fn create(
    State(app_state): State<AppState>,
    Form(params): Form<MessageParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Message: {params:?}");

    let message = app_state.room.add_message(params.body);
    let data = serde_json::to_value(&message)
        .map_err(|e| RenderError::new(MESSAGE_TEMPLATE, e.to_string()))?;

    app_state.broadcaster.send_event(
        app_state.config.default_group(),
        Action::Append,
        MESSAGES_TARGET,
        app_state.templates.as_ref(),
        MESSAGE_TEMPLATE,
        &data,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), message)),
    ))
}

/// POST an edit of an existing message and replace it on every open page.
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Form(params): Form<MessageParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Update Message {id}: {params:?}");

    let message = app_state
        .room
        .update_message(&id, params.body)
        .ok_or_else(|| Error::NotFound(format!("message {id}")))?;
    let data = serde_json::to_value(&message)
        .map_err(|e| RenderError::new(MESSAGE_TEMPLATE, e.to_string()))?;

    app_state.broadcaster.send_event(
        app_state.config.default_group(),
        Action::Replace,
        &message.dom_id(),
        app_state.templates.as_ref(),
        MESSAGE_TEMPLATE,
        &data,
    )?;

    Ok(Redirect::to("/"))
}

/// DELETE a message and remove it from every open page.
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Message by id: {id}");

    app_state
        .room
        .remove_message(&id)
        .ok_or_else(|| Error::NotFound(format!("message {id}")))?;

    app_state.broadcaster.broadcast(
        app_state.config.default_group(),
        Action::Remove,
        &room::dom_id(&id),
        "",
    )?;

    Ok(StatusCode::NO_CONTENT)
}
