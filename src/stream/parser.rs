//! Frame parser for the analysis event stream
//!
//! The backend replies to an analysis request with a `text/event-stream`
//! body framed as repeated `event: <tag>` / `data: <json>` line pairs
//! separated by blank lines. This parser consumes raw byte chunks in
//! whatever sizes the transport delivers them, reassembles complete lines,
//! and yields one [`Frame`] per `data:` line.
//!
//! Malformed input never aborts the stream: a `data:` payload that fails
//! to parse as JSON drops that single frame, a `data:` line with no
//! preceding `event:` tag is skipped, and unrecognized lines are ignored.

use crate::stream::event::Frame;

/// Incremental parser turning byte chunks into [`Frame`]s
///
/// One parser instance covers exactly one response body; it is not
/// restartable. Feed chunks with [`push`](Self::push) as they arrive and
/// call [`finish`](Self::finish) once the stream ends to flush any
/// trailing unterminated line.
///
/// # Examples
///
/// ```
/// use vizstream::stream::FrameParser;
///
/// let mut parser = FrameParser::new();
/// let mut frames = parser.push(b"event: text\ndata: {\"content\":\"Hel");
/// frames.extend(parser.push(b"lo\"}\n\n"));
/// assert_eq!(frames.len(), 1);
/// assert_eq!(frames[0].event, "text");
/// ```
#[derive(Debug, Default)]
pub struct FrameParser {
    /// Raw bytes held over from chunks that did not end on a line boundary
    buffer: Vec<u8>,
    /// Tag from the most recent `event:` line, applied to `data:` lines
    pending_event: Option<String>,
}

impl FrameParser {
    /// Create a parser for a new response body
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes, returning the frames it completed
    ///
    /// Bytes after the last line feed are retained until a later chunk
    /// (or [`finish`](Self::finish)) completes the line, so a UTF-8 code
    /// point or JSON payload split across chunks reassembles correctly.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..pos]);
            if let Some(frame) = self.process_line(line.trim_end_matches('\r')) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flush the stream tail, returning any frame completed by it
    ///
    /// End-of-stream terminates the final line even without a trailing
    /// line feed.
    pub fn finish(&mut self) -> Vec<Frame> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        let tail = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&tail).to_string();
        self.process_line(line.trim_end_matches('\r'))
            .into_iter()
            .collect()
    }

    /// Classify one complete line and emit a frame for `data:` lines
    fn process_line(&mut self, line: &str) -> Option<Frame> {
        if line.is_empty() {
            // Blank separator between frames.
            return None;
        }

        if let Some(tag) = line.strip_prefix("event:") {
            self.pending_event = Some(tag.trim().to_string());
            return None;
        }

        if let Some(payload) = line.strip_prefix("data:") {
            let Some(event) = self.pending_event.clone() else {
                tracing::debug!("Dropping data line with no preceding event tag");
                return None;
            };

            return match serde_json::from_str(payload.trim()) {
                Ok(data) => Some(Frame { event, data }),
                Err(e) => {
                    tracing::debug!("Dropping frame with malformed JSON payload: {}", e);
                    None
                }
            };
        }

        // Anything else (comments, unknown fields) is ignored.
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// A single well-formed frame parses into tag and payload.
    #[test]
    fn test_single_frame_parsed() {
        let mut parser = FrameParser::new();
        let frames = parser.push(b"event: status\ndata: {\"message\":\"Starting\"}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "status");
        assert_eq!(frames[0].data, json!({"message": "Starting"}));
    }

    /// A line split across two chunks reassembles into one frame.
    #[test]
    fn test_chunk_split_mid_line_reassembled() {
        let mut parser = FrameParser::new();
        let mut frames = parser.push(b"event: text\ndata: {\"content\":\"Hel");
        assert!(frames.is_empty());
        frames.extend(parser.push(b"lo\"}\n\n"));
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "text");
        assert_eq!(frames[0].data, json!({"content": "Hello"}));
    }

    /// A multi-byte UTF-8 code point split across chunks survives.
    #[test]
    fn test_chunk_split_mid_codepoint_reassembled() {
        let payload = "data: {\"content\":\"héllo\"}\n\n".as_bytes();
        // Split inside the two-byte 'é' sequence.
        let split = payload.iter().position(|&b| b == 0xc3).unwrap() + 1;

        let mut parser = FrameParser::new();
        parser.push(b"event: text\n");
        let mut frames = parser.push(&payload[..split]);
        frames.extend(parser.push(&payload[split..]));
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, json!({"content": "héllo"}));
    }

    /// Invalid JSON drops that frame only; parsing continues.
    #[test]
    fn test_malformed_json_dropped_stream_continues() {
        let mut parser = FrameParser::new();
        let frames = parser.push(
            b"event: text\ndata: {not json}\n\nevent: text\ndata: {\"content\":\"ok\"}\n\n",
        );
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, json!({"content": "ok"}));
    }

    /// A data line before any event line is skipped.
    #[test]
    fn test_data_without_event_tag_skipped() {
        let mut parser = FrameParser::new();
        let frames = parser.push(b"data: {\"content\":\"orphan\"}\n\n");
        assert!(frames.is_empty());
    }

    /// Two data lines after one event line both use that tag.
    #[test]
    fn test_tag_applies_to_subsequent_data_lines() {
        let mut parser = FrameParser::new();
        let frames =
            parser.push(b"event: text\ndata: {\"content\":\"a\"}\ndata: {\"content\":\"b\"}\n\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].event, "text");
        assert_eq!(frames[1].event, "text");
    }

    /// Unrecognized lines and blank lines are ignored without error.
    #[test]
    fn test_unknown_lines_ignored() {
        let mut parser = FrameParser::new();
        let frames = parser.push(
            b": comment\nretry: 500\n\nevent: status\ndata: {\"message\":\"hi\"}\n\n",
        );
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "status");
    }

    /// CRLF line endings are tolerated.
    #[test]
    fn test_crlf_lines_tolerated() {
        let mut parser = FrameParser::new();
        let frames = parser.push(b"event: text\r\ndata: {\"content\":\"x\"}\r\n\r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, json!({"content": "x"}));
    }

    /// finish() completes a final line lacking a trailing line feed.
    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut parser = FrameParser::new();
        let frames = parser.push(b"event: text\ndata: {\"content\":\"tail\"}");
        assert!(frames.is_empty());
        let frames = parser.finish();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, json!({"content": "tail"}));
    }

    /// finish() on an empty buffer yields nothing.
    #[test]
    fn test_finish_empty_is_noop() {
        let mut parser = FrameParser::new();
        assert!(parser.finish().is_empty());
    }

    /// Byte-at-a-time delivery produces the same frames as one chunk.
    #[test]
    fn test_byte_at_a_time_delivery() {
        let body: &[u8] =
            b"event: chart\ndata: {\"filename\":\"a.png\",\"data\":\"QUJD\",\"type\":\"image/png\",\"size\":3}\n\n";
        let mut parser = FrameParser::new();
        let mut frames = Vec::new();
        for b in body {
            frames.extend(parser.push(std::slice::from_ref(b)));
        }
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "chart");
    }

    /// Chunks arrive as `Bytes` off the transport; the parser takes them
    /// as-is.
    #[test]
    fn test_bytes_chunks_from_transport() {
        use bytes::Bytes;

        let chunks = [
            Bytes::from_static(b"event: status\nda"),
            Bytes::from_static(b"ta: {\"message\":\"working\"}\n\n"),
        ];

        let mut parser = FrameParser::new();
        let mut frames = Vec::new();
        for chunk in &chunks {
            frames.extend(parser.push(chunk));
        }
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "status");
    }
}
