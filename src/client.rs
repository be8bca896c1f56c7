use crate::core::StreamingError;
use crate::request::StreamRequest;
use crate::stream::{content_stream, ContentStream, ReadErrorPolicy};
use futures::StreamExt;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client;

/// Client for a streaming chat endpoint.
///
/// The endpoint is an explicit constructor argument; the bearer token is
/// supplied by the caller. The client owns no other state, and concurrent
/// invocations are fully independent.
pub struct ChatClient {
    client: Client,
    endpoint: String,
    token: String,
    read_error_policy: ReadErrorPolicy,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
            read_error_policy: ReadErrorPolicy::default(),
        }
    }

    /// Overrides how transport read failures mid-stream are handled.
    pub const fn with_read_error_policy(mut self, policy: ReadErrorPolicy) -> Self {
        self.read_error_policy = policy;
        self
    }

    /// Sends one streaming chat request and returns the lazy sequence of
    /// content fragments.
    ///
    /// A non-success status fails immediately with
    /// [`StreamingError::Http`]; no stream is returned in that case. On
    /// success the response connection is owned by the returned stream and is
    /// released on every exit path, including abandoned iteration.
    pub async fn stream_chat(
        &self,
        request: &StreamRequest,
    ) -> Result<ContentStream, StreamingError> {
        if request.message.is_empty() {
            return Err(StreamingError::InvalidRequest(
                "message must not be empty".to_string(),
            ));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamingError::Http {
                status: status.as_u16(),
            });
        }

        Ok(content_stream(response.bytes_stream(), self.read_error_policy).boxed())
    }
}
