/// Errors surfaced by the streaming chat client.
///
/// All fatal errors carry enough structure (status + message) for callers to
/// distinguish HTTP-level failures from in-stream failures.
#[derive(Debug, thiserror::Error)]
pub enum StreamingError {
    /// The initial request returned a non-success status; no stream was opened
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    /// The server signaled a failure mid-stream via an `error` envelope
    #[error("{message}")]
    Stream { status: u16, message: String },
    /// A transport read failed mid-stream (only surfaced under
    /// [`ReadErrorPolicy::Surface`](crate::stream::ReadErrorPolicy))
    #[error("Transport error: {0}")]
    Transport(String),
    /// Network-related errors from the underlying HTTP client
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The request was rejected before any network I/O
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

impl StreamingError {
    /// Builds the error for a server-signaled `error` envelope.
    pub(crate) fn server(message: Option<String>) -> Self {
        Self::Stream {
            status: 500,
            message: message.unwrap_or_else(|| "Stream error".to_string()),
        }
    }

    /// The HTTP or stream status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } | Self::Stream { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StreamingError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
