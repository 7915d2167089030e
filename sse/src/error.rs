//! Error types for the `sse` crate.
//!
//! Follows the same shape as the other layers: a root `Error` struct holding an
//! `error_kind` tree plus the optional original `source`. Only producer-facing
//! operations return these; per-connection delivery failures are handled inside
//! the crate and never surface here.

use crate::template::RenderError;
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors a producer can see.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The template collaborator failed to produce the fragment.
    Render(RenderErrorKind),
    /// An action name that is not part of the wire protocol.
    InvalidAction(String),
}

#[derive(Debug, PartialEq)]
pub enum RenderErrorKind {
    TemplateNotFound(String),
    Template(String),
}

impl Error {
    pub fn invalid_action(action: &str) -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::InvalidAction(action.to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Render(RenderErrorKind::TemplateNotFound(template)) => {
                write!(f, "SSE Error: template not found: {template}")
            }
            ErrorKind::Render(RenderErrorKind::Template(template)) => {
                write!(f, "SSE Error: error executing template {template}")
            }
            ErrorKind::InvalidAction(action) => {
                write!(f, "SSE Error: invalid stream action: {action}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// Translate the template collaborator's error into this layer, keeping the original as source.
impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        let render_error_kind = if err.is_not_found() {
            RenderErrorKind::TemplateNotFound(err.template().to_string())
        } else {
            RenderErrorKind::Template(err.template().to_string())
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Render(render_error_kind),
        }
    }
}
