//! Failure taxonomy shared by every admin action.
//!
//! Validation and authorization failures are produced locally and never reach
//! the network. Everything else comes from an HTTP exchange. Callers turn the
//! error into an [`ActionResult`] and decide how to tell the user; nothing is
//! retried.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name → message, ordered so forms render errors deterministically.
pub type FieldErrors = BTreeMap<String, String>;

/// Shown when the server response carries no readable message.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Pull a human message out of an error response body, if it has one.
pub fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(trimmed) {
        return parsed
            .message
            .or(parsed.error)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
    }
    // Plain-text bodies are passed through unless they look like an HTML page.
    if trimmed.starts_with('<') {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl ApiError {
    /// Classify a non-2xx response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound(message.unwrap_or_else(|| "resource".to_string())),
            500..=599 => ApiError::Server {
                status,
                message: message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            },
            _ => ApiError::Http {
                status,
                message: message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Server {
                status, ..
            }
            | ApiError::Http {
                status, ..
            } => Some(*status),
            _ => None,
        }
    }

    /// Toast text. 401/403/404/5xx each get their own wording.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(_) => "Please fix the highlighted fields.".to_string(),
            ApiError::PermissionDenied(_) => {
                "You do not have permission to perform this action.".to_string()
            },
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ApiError::Forbidden => "Access denied for this account.".to_string(),
            ApiError::NotFound(_) => "The requested record no longer exists.".to_string(),
            ApiError::Server {
                ..
            } => "The server failed to process the request. Please try again later.".to_string(),
            ApiError::Http {
                message, ..
            } => message.clone(),
            ApiError::Network(_) => "Unable to reach the server. Check your connection.".to_string(),
            ApiError::Decode(_) => GENERIC_FAILURE.to_string(),
        }
    }

    /// Whether the session should be discarded and the user sent to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Outcome of one user-triggered action, in the `{success, message}` shape UI
/// handlers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    /// Entities touched on success (or before the first failure).
    #[serde(default)]
    pub affected: usize,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>, affected: usize) -> Self {
        Self {
            success: true,
            message: message.into(),
            affected,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            affected: 0,
        }
    }
}

impl From<&ApiError> for ActionResult {
    fn from(err: &ApiError) -> Self {
        ActionResult::failed(err.user_message())
    }
}

impl From<ApiError> for ActionResult {
    fn from(err: ApiError) -> Self {
        ActionResult::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_taken_from_json_body() {
        let err = ApiError::from_response(422, r#"{"message":"Price must be positive"}"#);
        assert_eq!(
            err,
            ApiError::Http {
                status: 422,
                message: "Price must be positive".to_string()
            }
        );
        assert_eq!(err.user_message(), "Price must be positive");
    }

    #[test]
    fn error_field_is_a_fallback_for_message() {
        assert_eq!(extract_message(r#"{"error":"bad id"}"#).as_deref(), Some("bad id"));
        assert_eq!(extract_message(r#"{"message":"  "}"#), None);
        assert_eq!(extract_message("<html>oops</html>"), None);
        assert_eq!(extract_message("plain failure").as_deref(), Some("plain failure"));
    }

    #[test]
    fn status_classes_get_distinct_toasts() {
        let toasts = [401_u16, 403, 404, 500]
            .iter()
            .map(|status| ApiError::from_response(*status, "").user_message())
            .collect::<std::collections::HashSet<_>>();
        assert_eq!(toasts.len(), 4);
        assert!(ApiError::from_response(401, "").requires_login());
        assert_eq!(ApiError::from_response(503, "").status(), Some(503));
    }

    #[test]
    fn generic_fallback_when_body_is_empty() {
        match ApiError::from_response(400, "") {
            ApiError::Http {
                message, ..
            } => assert_eq!(message, GENERIC_FAILURE),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn error_converts_to_failed_action_result() {
        let result = ActionResult::from(ApiError::PermissionDenied("orders:delete".into()));
        assert!(!result.success);
        assert_eq!(result.affected, 0);
    }
}
