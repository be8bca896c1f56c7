/// Prefix marking lines that carry a structured event payload.
pub const DATA_PREFIX: &str = "data: ";

/// Accumulates decoded text and yields complete newline-terminated lines.
///
/// A line whose terminator has not arrived yet is retained until the next
/// chunk supplies it. Splitting each chunk independently would corrupt events
/// whose payload spans a chunk boundary.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self {
            buffer: String::with_capacity(1024),
        }
    }

    /// Appends decoded text to the line buffer.
    pub fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Drains the next complete line, without its terminator. A trailing `\r`
    /// is stripped so CRLF framing is handled transparently.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buffer.find('\n')?;
        let line = self.buffer[..end].trim_end_matches('\r').to_string();
        self.buffer.drain(..=end);
        Some(line)
    }

    /// Yields whatever unterminated text remains at end-of-stream, so a final
    /// event that arrived without a trailing newline is still seen.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

/// Returns the payload of a structured-event line, or `None` for blank lines,
/// comments and anything else.
pub fn data_payload(line: &str) -> Option<&str> {
    line.strip_prefix(DATA_PREFIX)
}
