/// Splits an arbitrarily chunked byte stream into complete lines.
///
/// Bytes after the last newline are held back and prefixed to the next chunk,
/// so a record (or a multi-byte character) split across chunks is reassembled
/// before it is decoded.
#[derive(Debug, Default)]
pub struct LineDecoder {
    pending: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and collect every line it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            lines.push(decode_line(&self.pending[start..end]));
            start = end + 1;
        }
        self.pending.drain(..start);
        lines
    }

    /// Flush the trailing partial line once the source is exhausted
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = decode_line(&self.pending);
        self.pending.clear();
        Some(line)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lines_in_one_chunk() {
        let mut decoder = LineDecoder::new();
        let lines = decoder.push(b"one\ntwo\r\n\nthree");
        assert_eq!(lines, vec!["one", "two", ""]);
        assert!(decoder.has_pending());
        assert_eq!(decoder.finish(), Some("three".to_string()));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut decoder = LineDecoder::new();
        assert!(decoder.push(b"data: {\"ev").is_empty());
        assert!(decoder.push(b"ent\":").is_empty());
        let lines = decoder.push(b"\"x\"}\nda");
        assert_eq!(lines, vec!["data: {\"event\":\"x\"}"]);
        assert_eq!(decoder.finish(), Some("da".to_string()));
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let text = "café\n".as_bytes();
        // 'é' is two bytes; split between them
        let split = text.len() - 2;
        let mut decoder = LineDecoder::new();
        assert!(decoder.push(&text[..split]).is_empty());
        assert_eq!(decoder.push(&text[split..]), vec!["café"]);
    }
}
