use thiserror::Error;
use tracing::{error, warn};

/// Error severity for UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,     // Blue - informational
    Warning,  // Yellow - recoverable
    Error,    // Red - operation failed
    Critical, // Red + modal - requires user action
}

/// Domain-specific errors for the Zendesk palette.
///
/// Two kinds matter to callers: `Api` (Zendesk answered with a non-2xx
/// status; the response body is carried verbatim) and `Network` (the request
/// never produced a response). Both are non-recoverable at the call site and
/// propagate up to the UI layer, which shows a failure toast and resets the
/// affected view.
#[derive(Error, Debug)]
pub enum ZendeskError {
    #[error("Zendesk API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("could not reach Zendesk: {source}")]
    Network {
        #[from]
        source: ureq::Error,
    },

    #[error("unexpected response payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ZendeskError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Api { .. } => ErrorSeverity::Error,
            Self::Network { .. } => ErrorSeverity::Error,
            Self::Json(_) => ErrorSeverity::Warning,
            Self::Config(_) => ErrorSeverity::Warning,
        }
    }

    /// Short message suitable for a toast title.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { status, .. } => format!("Zendesk request failed (HTTP {})", status),
            Self::Network { .. } => "Could not reach Zendesk. Check your connection.".to_string(),
            Self::Json(_) => "Zendesk returned an unexpected response.".to_string(),
            Self::Config(msg) => format!("Configuration issue: {}", msg),
        }
    }

    /// Longer detail line for the expandable part of a toast, when one adds
    /// anything beyond `user_message`.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Api { body, .. } if !body.is_empty() => Some(body.clone()),
            Self::Network { source } => Some(source.to_string()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZendeskError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_carries_status_and_body() {
        let err = ZendeskError::Api {
            status: 422,
            body: r#"{"error":"RecordInvalid"}"#.to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("422"));
        assert!(rendered.contains(r#"{"error":"RecordInvalid"}"#));
    }

    #[test]
    fn test_severity_mapping() {
        let api = ZendeskError::Api {
            status: 500,
            body: String::new(),
        };
        assert_eq!(api.severity(), ErrorSeverity::Error);

        let config = ZendeskError::Config("missing subdomain".into());
        assert_eq!(config.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_user_message_does_not_leak_body() {
        let err = ZendeskError::Api {
            status: 404,
            body: "secret internal detail".to_string(),
        };
        assert!(err.user_message().contains("404"));
        assert!(!err.user_message().contains("secret"));
        assert_eq!(err.detail(), Some("secret internal detail".to_string()));
    }

    #[test]
    fn test_log_err_returns_option() {
        let ok: std::result::Result<u32, String> = Ok(7);
        assert_eq!(ok.log_err(), Some(7));

        let bad: std::result::Result<u32, String> = Err("boom".into());
        assert_eq!(bad.log_err(), None);
    }
}
