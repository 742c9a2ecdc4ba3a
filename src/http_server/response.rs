//! # Response Formatting
//!
//! The two envelope families of the student API. Create and update answer
//! with a numeric `code`; list and delete answer with a `success` flag.

use serde::Serialize;

/// `{ code: 0, data }`
#[derive(Debug, Clone, Serialize)]
pub struct CodeResponse<T: Serialize> {
    pub code: i32,
    pub data: T,
}

impl<T: Serialize> CodeResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { code: 0, data }
    }
}

/// `{ code, type?, msg }`
#[derive(Debug, Clone, Serialize)]
pub struct CodeErrorResponse {
    pub code: i32,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub msg: String,
}

/// `{ success: true, data? }`
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with_data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

impl SuccessResponse<()> {
    /// Bare `{ success: true }`
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
        }
    }
}

/// `{ success: false, message }`
#[derive(Debug, Clone, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_code_response_serialization() {
        let value = serde_json::to_value(CodeResponse::ok(json!({"id": 1}))).unwrap();
        assert_eq!(value, json!({"code": 0, "data": {"id": 1}}));
    }

    #[test]
    fn test_code_error_omits_missing_type() {
        let value = serde_json::to_value(CodeErrorResponse {
            code: -1,
            kind: None,
            msg: "gone".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"code": -1, "msg": "gone"}));
    }

    #[test]
    fn test_empty_success() {
        let value = serde_json::to_value(SuccessResponse::empty()).unwrap();
        assert_eq!(value, json!({"success": true}));
    }
}
