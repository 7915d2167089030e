use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use sse::error::{Error as StreamError, ErrorKind as StreamErrorKind};
use sse::RenderError;

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// A broadcast or fragment render failed.
    Stream(StreamError),
    /// The addressed room message does not exist.
    NotFound(String),
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Stream(err) => Some(err),
            Error::NotFound(_) => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        match self {
            Error::Stream(err) => write!(fmt, "{err}"),
            Error::NotFound(what) => write!(fmt, "not found: {what}"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Stream(err) => match err.error_kind {
                StreamErrorKind::Render(_) => {
                    error!("Failed to render stream fragment: {err}");
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
                StreamErrorKind::InvalidAction(_) => {
                    warn!("Rejected stream request: {err}");
                    (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE ENTITY").into_response()
                }
            },
            Error::NotFound(what) => {
                debug!("Not found: {what}");
                (StatusCode::NOT_FOUND, "NOT FOUND").into_response()
            }
        }
    }
}

impl From<StreamError> for Error {
    fn from(err: StreamError) -> Self {
        Error::Stream(err)
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Error::Stream(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_maps_to_500() {
        let err: Error = RenderError::new("message", "boom").into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_action_maps_to_422() {
        let err: Error = StreamError::invalid_action("explode").into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = Error::NotFound("message 42".to_string());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
