//! Backend-to-UI events and reachability wording for the desktop GUI.

use client_core::ClientError;
use shared::protocol::{AddTextResponse, QueryResponse};

pub enum UiEvent {
    Info(String),
    BackendReachable { message: Option<String> },
    BackendUnreachable(String),
    AddTextSettled(Result<AddTextResponse, ClientError>),
    QuerySettled(Result<QueryResponse, ClientError>),
}

/// Status-bar wording for a failed reachability check.
pub fn classify_backend_failure(server_url: &str, err: &ClientError) -> String {
    match err {
        ClientError::Transport { .. } if err.is_timeout() => {
            format!("Backend at {server_url} timed out; it may still be loading its model.")
        }
        ClientError::Transport { .. } => {
            format!("Backend unreachable at {server_url}; check that it is running.")
        }
        ClientError::Status { status, .. } => {
            format!("Backend at {server_url} answered HTTP {status}.")
        }
        ClientError::Decode { .. } => {
            format!("Backend at {server_url} sent an unexpected reply.")
        }
        ClientError::Build(_) | ClientError::Unavailable(_) => {
            format!("Backend worker unavailable: {err}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_failures_mention_the_http_status() {
        let err = ClientError::Status {
            endpoint: "/",
            status: reqwest_status(503),
        };
        let text = classify_backend_failure("http://127.0.0.1:8000", &err);
        assert!(text.contains("503"), "{text}");
        assert!(text.contains("http://127.0.0.1:8000"), "{text}");
    }

    #[test]
    fn worker_failures_carry_the_reason() {
        let err = ClientError::Unavailable("queue closed".to_string());
        assert_eq!(
            classify_backend_failure("http://127.0.0.1:8000", &err),
            "Backend worker unavailable: backend unavailable: queue closed"
        );
    }

    fn reqwest_status(code: u16) -> client_core::StatusCode {
        client_core::StatusCode::from_u16(code).expect("valid status")
    }
}
