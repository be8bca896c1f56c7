use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The request body sent to the streaming chat endpoint.
///
/// `message` is required and must be non-empty; the client rejects an empty
/// message before any network I/O.
#[derive(Debug, Clone, Serialize)]
pub struct StreamRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
}

impl StreamRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            system_prompt: None,
            model: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub const fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }
}

/// Model backend the server should route the request to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    #[value(name = "claude")]
    Claude,
    #[value(name = "openai")]
    OpenAI,
}
