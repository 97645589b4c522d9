//! JSON response envelope
//!
//! Every endpoint answers with `{ "success": bool, "data"?: T, "error"?: string }`.

use serde::Serialize;

/// Uniform response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_omits_error() {
        let json = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 3 }));
    }

    #[test]
    fn test_failure_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("Game not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "error": "Game not found" })
        );
    }
}
