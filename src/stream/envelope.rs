use serde::Deserialize;

/// One structured JSON unit carried by a single `data:` line.
///
/// Envelope types this client does not know about deserialize to `Unknown`
/// and are ignored rather than failing the stream.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    Content {
        #[serde(default)]
        content: String,
    },
    Done,
    Error {
        content: Option<String>,
    },
    #[serde(other)]
    Unknown,
}
