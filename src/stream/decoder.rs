/// Incremental UTF-8 decoder.
///
/// Network chunk boundaries do not align with character boundaries, so a
/// multi-byte sequence can be split between two deliveries. The decoder
/// withholds an incomplete trailing sequence (at most 3 bytes) and prepends it
/// to the next chunk instead of emitting a replacement character.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    carry: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one chunk, including any bytes withheld from the previous one.
    ///
    /// Invalid sequences are replaced with U+FFFD and decoding continues; an
    /// incomplete sequence at the end of the chunk is carried over.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let owned;
        let input: &[u8] = if self.carry.is_empty() {
            chunk
        } else {
            let mut bytes = std::mem::take(&mut self.carry);
            bytes.extend_from_slice(chunk);
            owned = bytes;
            &owned
        };

        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match err.error_len() {
                        // Incomplete sequence at the end of the chunk; wait
                        // for the next delivery.
                        None => {
                            self.carry = after.to_vec();
                            break;
                        }
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                    }
                }
            }
        }
        out
    }

    /// Flushes any bytes still withheld at end-of-stream.
    pub fn finish(&mut self) -> String {
        let carry = std::mem::take(&mut self.carry);
        String::from_utf8_lossy(&carry).into_owned()
    }
}
