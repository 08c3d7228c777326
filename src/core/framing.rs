/// Incremental newline-delimited line splitter.
///
/// Bytes are buffered until a `\n` arrives; each completed line is decoded
/// lossily as UTF-8 and trimmed of surrounding whitespace, which also strips
/// the `\r` of CRLF line endings. Partial trailing data stays buffered for
/// the next push.
pub struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Ingest a chunk of raw bytes and return any completed lines, in order.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &b in bytes {
            if b == b'\n' {
                let line = String::from_utf8_lossy(&self.buffer).trim().to_string();
                lines.push(line);
                self.buffer.clear();
            } else {
                self.buffer.push(b);
            }
        }

        lines
    }

    /// Discard any buffered partial line.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}
