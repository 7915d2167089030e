use serde::Deserialize;

/// Form body for creating or editing a room message.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageParams {
    pub(crate) body: String,
}
