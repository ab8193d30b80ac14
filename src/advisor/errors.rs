use std::fmt;

/// Errors raised by the `ScoreClient` while talking to the advisor service.
#[derive(Debug)]
pub enum ClientError {
    /// Could not reach the service, or the attempt timed out.
    Transport(String),
    /// The service answered with a non-success status.
    Response { status: u16, body: String },
    /// The response body did not parse as a score.
    Decode(String),
    /// The caller's context ended mid-call.
    Cancelled,
    /// The underlying HTTP client could not be built.
    Build(String),
}

impl ClientError {
    /// Transport and status errors reflect transient remote state and are
    /// worth another attempt; the rest are permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Response { .. }
        )
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ClientError::Response { status, body } => {
                write!(f, "Response error: status={} body={}", status, body)
            }
            ClientError::Decode(msg) => write!(f, "Decode error: {}", msg),
            ClientError::Cancelled => write!(f, "Call cancelled"),
            ClientError::Build(msg) => write!(f, "Client build error: {}", msg),
        }
    }
}
