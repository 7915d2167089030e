//! Contract with the HTML template collaborator.
//!
//! The broadcaster never renders application data itself. A `FragmentRenderer`
//! turns a template id and a data value into trusted HTML, and that output is
//! embedded in the envelope verbatim.

use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;

/// Renders named templates into HTML fragments.
pub trait FragmentRenderer: Send + Sync {
    fn render(&self, template: &str, data: &Value) -> Result<String, RenderError>;
}

/// Failure reported by a `FragmentRenderer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    template: String,
    reason: String,
    not_found: bool,
}

impl RenderError {
    pub fn new(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            reason: reason.into(),
            not_found: false,
        }
    }

    pub fn not_found(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            reason: "no such template".to_string(),
            not_found: true,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_not_found(&self) -> bool {
        self.not_found
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "error executing template {}: {}",
            self.template, self.reason
        )
    }
}

impl StdError for RenderError {}
