use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable response (connect, timeout, decode).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("server returned {status}: {}", .detail.as_deref().unwrap_or("no details"))]
    Status { status: u16, detail: Option<String> },
}

impl ApiError {
    /// Server-provided message, if the backend sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            ApiError::Transport(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }

    pub fn from_status(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            detail: error_detail(body),
        }
    }
}

/// Extract the `detail` message from a FastAPI error body. Plain errors carry a
/// string; request validation errors carry a list of `{loc, msg, type}` objects.
pub fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_string() {
        assert_eq!(
            error_detail(r#"{"detail":"Invalid credentials"}"#),
            Some("Invalid credentials".into())
        );
    }

    #[test]
    fn test_error_detail_validation_list() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required","type":"missing"},
                                  {"loc":["body","password"],"msg":"too short","type":"value_error"}]}"#;
        assert_eq!(error_detail(body), Some("field required; too short".into()));
    }

    #[test]
    fn test_error_detail_absent_or_garbage() {
        assert_eq!(error_detail(""), None);
        assert_eq!(error_detail("<html>502</html>"), None);
        assert_eq!(error_detail(r#"{"error":"x"}"#), None);
        assert_eq!(error_detail(r#"{"detail":""}"#), None);
    }

    #[test]
    fn test_status_helpers() {
        let err = ApiError::from_status(401, r#"{"detail":"Invalid credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.detail(), Some("Invalid credentials"));
        assert_eq!(err.to_string(), "server returned 401: Invalid credentials");

        let err = ApiError::from_status(500, "oops");
        assert!(!err.is_unauthorized());
        assert_eq!(err.detail(), None);
        assert_eq!(err.to_string(), "server returned 500: no details");
    }
}
