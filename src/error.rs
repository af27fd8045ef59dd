use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// Errors that reach the caller of the proxy.
///
/// Summarization failures are not part of this type: they are absorbed by the
/// compression step and never surface as a response.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Invalid JSON: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error("Failed to forward request upstream: {0}")]
    UpstreamForward(#[from] reqwest::Error),
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            ProxyError::UpstreamForward(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ProxyError::MalformedInput(_) => {
                HttpResponse::build(self.status_code()).body(self.to_string())
            }
            // upstream details stay in the log
            ProxyError::UpstreamForward(_) => {
                HttpResponse::build(self.status_code()).body("Upstream error")
            }
        }
    }
}
