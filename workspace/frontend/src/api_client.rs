pub mod prediction;

use common::{ErrorBody, PredictionResponse};
use thiserror::Error;

/// Why a prediction request did not produce a result.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictError {
    /// The backend rejected the request with a message of its own.
    #[error("{0}")]
    Application(String),

    /// The body was not JSON at all. An expired session makes the backend
    /// answer with its HTML login page, so this is treated as a logout.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The backend refused the session outright.
    #[error("Not authenticated (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Valid JSON, but not a prediction.
    #[error("Unexpected response: {0}")]
    UnexpectedShape(String),

    /// The request never completed.
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to serialize request: {0}")]
    Serialize(String),
}

impl PredictError {
    /// Errors that mean the session is gone and the user has to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::MalformedResponse(_) | Self::Unauthorized { .. })
    }

    /// Text shown to the user for errors that keep them on the form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Application(message) => message.clone(),
            Self::MalformedResponse(_) | Self::Unauthorized { .. } => {
                "Your session has expired. Please log in again.".to_string()
            }
            Self::UnexpectedShape(_) => {
                "The prediction service returned an unexpected response.".to_string()
            }
            Self::Transport(_) => {
                "Could not reach the prediction service. Please try again.".to_string()
            }
            Self::Serialize(e) => format!("Could not prepare the request: {}", e),
        }
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Classifies a completed HTTP exchange.
///
/// `redirected_to_login` is set when the browser followed a redirect that
/// ended on the login route.
pub fn interpret(
    status: u16,
    redirected_to_login: bool,
    body: &str,
) -> Result<PredictionResponse, PredictError> {
    if status == 401 || status == 403 || redirected_to_login {
        return Err(PredictError::Unauthorized { status });
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| PredictError::MalformedResponse(e.to_string()))?;

    if !is_success(status) {
        let message = serde_json::from_value::<ErrorBody>(value)
            .ok()
            .and_then(|body| body.error)
            .filter(|error| !error.is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        return Err(PredictError::Application(message));
    }

    serde_json::from_value(value).map_err(|e| PredictError::UnexpectedShape(e.to_string()))
}

/// Whether `url` (absolute or root-relative) points at `login_path`.
pub fn is_login_url(url: &str, login_path: &str) -> bool {
    let path = match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            rest.find('/').map_or("/", |i| &rest[i..])
        }
        None => url,
    };
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.trim_end_matches('/') == login_path.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS: &str = r#"{"severity":"MODERATE","probabilities":{
        "MILD":0.2,"MODERATE":0.5,"SEVERE":0.2,"VERY SEVERE":0.1}}"#;

    #[test]
    fn test_success_body_is_returned() {
        let response = interpret(200, false, SUCCESS).unwrap();
        assert_eq!(response.severity, "MODERATE");
        assert_eq!(response.probabilities.len(), 4);
    }

    #[test]
    fn test_error_field_becomes_application_error() {
        let err = interpret(400, false, r#"{"error":"invalid input"}"#).unwrap_err();
        assert_eq!(err, PredictError::Application("invalid input".to_string()));
        assert_eq!(err.user_message(), "invalid input");
        assert!(!err.requires_login());
    }

    #[test]
    fn test_error_without_field_gets_generic_message() {
        let err = interpret(500, false, r#"{"detail":"boom"}"#).unwrap_err();
        assert_eq!(err, PredictError::Application("HTTP error! status: 500".to_string()));

        let err = interpret(502, false, r#"["not", "an", "object"]"#).unwrap_err();
        assert_eq!(err, PredictError::Application("HTTP error! status: 502".to_string()));

        let err = interpret(400, false, r#"{"error":""}"#).unwrap_err();
        assert_eq!(err, PredictError::Application("HTTP error! status: 400".to_string()));
    }

    #[test]
    fn test_html_body_means_session_expired() {
        let html = "<!DOCTYPE html><html><body><form id=\"loginForm\"></form></body></html>";

        let err = interpret(200, false, html).unwrap_err();
        assert!(matches!(err, PredictError::MalformedResponse(_)));
        assert!(err.requires_login());

        let err = interpret(500, false, html).unwrap_err();
        assert!(err.requires_login());
    }

    #[test]
    fn test_auth_status_means_session_expired() {
        for status in [401, 403] {
            let err = interpret(status, false, r#"{"error":"login required"}"#).unwrap_err();
            assert_eq!(err, PredictError::Unauthorized { status });
            assert!(err.requires_login());
        }
    }

    #[test]
    fn test_redirect_to_login_means_session_expired() {
        let err = interpret(200, true, SUCCESS).unwrap_err();
        assert!(err.requires_login());
    }

    #[test]
    fn test_wrong_shape_is_not_a_logout() {
        let err = interpret(200, false, r#"{"prediction":"MILD"}"#).unwrap_err();
        assert!(matches!(err, PredictError::UnexpectedShape(_)));
        assert!(!err.requires_login());
    }

    #[test]
    fn test_transport_message_is_generic() {
        let err = PredictError::Transport("TypeError: Failed to fetch".to_string());
        assert!(!err.requires_login());
        assert!(!err.user_message().contains("TypeError"));
    }

    #[test]
    fn test_is_login_url() {
        assert!(is_login_url("http://localhost:5000/login", "/login"));
        assert!(is_login_url("https://example.org/login/?next=%2Fpredict", "/login"));
        assert!(is_login_url("/login", "/login"));
        assert!(!is_login_url("http://localhost:5000/predict", "/login"));
        assert!(!is_login_url("http://localhost:5000", "/login"));
        assert!(!is_login_url("http://localhost:5000/login-help", "/login"));
    }
}
