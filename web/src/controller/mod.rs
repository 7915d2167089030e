use serde::Serialize;
pub(crate) mod health_check_controller;
pub(crate) mod message_controller;
pub(crate) mod room_controller;

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T) -> Self {
        Self {
            status_code,
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::Room;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_serialize_api_response_with_message() {
        let message = Room::new().add_message("hi");
        let response = ApiResponse::new(StatusCode::CREATED.into(), message.clone());

        // Compare as values since serde_json::to_string does not promise a key order
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status_code"], json!(201));
        assert_eq!(value["data"]["id"], json!(message.id));
        assert_eq!(value["data"]["body"], json!("hi"));
    }

    #[test]
    fn test_serialize_api_response_with_none() {
        let response = ApiResponse::<()> {
            status_code: StatusCode::NO_CONTENT.into(),
            data: None,
        };
        let serialized = serde_json::to_string(&response).unwrap();
        assert_eq!(serialized, json!({"status_code": 204}).to_string());
    }
}
