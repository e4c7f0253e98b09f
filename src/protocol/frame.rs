//! Frame extraction and request/response encoding.
//!
//! The wire protocol is minimal: a request is a JSON array of
//! strings delimited by the first `[` in the stream and the next `]` after it.
//! Nested brackets are not supported and argument values can never contain
//! `[`, `]` or whitespace — the client-side tokenizer (see [`tokenize`]) only
//! ever produces alphanumeric tokens.
//!
//! ## Incremental extraction
//!
//! TCP delivers a byte stream, so a frame may arrive split across reads, or
//! several frames may arrive pipelined in one read. [`extract`] is called
//! against the connection's receive buffer and returns:
//!
//! - `Some(frame)` — a complete frame; the buffer is advanced past it
//! - `None` — no complete frame yet; the buffer is left untouched for more data

use bytes::{Bytes, BytesMut};

/// Extracts the next complete bracket-delimited frame from `buffer`.
///
/// Scans for the first `[` and the next `]` strictly after it. On success the
/// buffer is advanced past the closing bracket (any bytes preceding the
/// opening bracket are discarded with it) and the `[...]` slice is returned.
pub fn extract(buffer: &mut BytesMut) -> Option<Bytes> {
    let start = buffer.iter().position(|&b| b == b'[')?;
    let close = buffer[start + 1..].iter().position(|&b| b == b']')?;
    let end = start + 1 + close;

    let taken = buffer.split_to(end + 1).freeze();
    Some(taken.slice(start..))
}

/// Decodes one frame into its token list.
///
/// Returns `None` for anything that is not a JSON array of strings; malformed
/// frames are dropped by the caller without a response.
pub fn decode_request(frame: &[u8]) -> Option<Vec<String>> {
    serde_json::from_slice(frame).ok()
}

/// Encodes a response as a JSON array of strings.
pub fn encode_response(response: &[String]) -> serde_json::Result<String> {
    serde_json::to_string(response)
}

/// Splits raw line input into maximal runs of ASCII alphanumerics.
///
/// Every other character — whitespace, punctuation, quotes — is a separator
/// and is discarded. There is no escaping. This is what the terminal client
/// applies to user input before wrapping the tokens in a JSON array, and the
/// server accepts exactly this encoding.
pub fn tokenize(raw: &str) -> Vec<String> {
    raw.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_complete_frame() {
        let mut buf = BytesMut::from(&br#"["GET","x"]"#[..]);
        let frame = extract(&mut buf).unwrap();
        assert_eq!(&frame[..], br#"["GET","x"]"#);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_extract_incomplete_frame_waits() {
        let mut buf = BytesMut::from(&br#"["GET","#[..]);
        assert!(extract(&mut buf).is_none());
        // Buffer untouched, pending more data.
        assert_eq!(&buf[..], br#"["GET","#);

        buf.extend_from_slice(br#""x"]"#);
        let frame = extract(&mut buf).unwrap();
        assert_eq!(&frame[..], br#"["GET","x"]"#);
    }

    #[test]
    fn test_extract_pipelined_frames_in_order() {
        let mut buf = BytesMut::from(&br#"["SET","x","1"]["GET","x"]"#[..]);
        assert_eq!(&extract(&mut buf).unwrap()[..], br#"["SET","x","1"]"#);
        assert_eq!(&extract(&mut buf).unwrap()[..], br#"["GET","x"]"#);
        assert!(extract(&mut buf).is_none());
    }

    #[test]
    fn test_extract_discards_leading_junk() {
        let mut buf = BytesMut::from(&b"\r\n noise [\"LLEN\",\"l\"] tail"[..]);
        let frame = extract(&mut buf).unwrap();
        assert_eq!(&frame[..], br#"["LLEN","l"]"#);
        assert_eq!(&buf[..], b" tail");
    }

    #[test]
    fn test_extract_close_before_open() {
        // A stray `]` before any `[` cannot terminate a frame.
        let mut buf = BytesMut::from(&br#"]["DEL"#[..]);
        assert!(extract(&mut buf).is_none());
        buf.extend_from_slice(br#"","x"]"#);
        assert_eq!(&extract(&mut buf).unwrap()[..], br#"["DEL","x"]"#);
    }

    #[test]
    fn test_decode_request() {
        let tokens = decode_request(br#"["SET","x","5"]"#).unwrap();
        assert_eq!(tokens, vec!["SET", "x", "5"]);
        assert_eq!(decode_request(br#"[]"#), Some(vec![]));
    }

    #[test]
    fn test_decode_request_rejects_malformed() {
        assert!(decode_request(br#"["SET",]"#).is_none());
        assert!(decode_request(br#"[1,2]"#).is_none());
        assert!(decode_request(br#"{"not":"array"}"#).is_none());
    }

    #[test]
    fn test_encode_response() {
        let out = encode_response(&["OK".to_string()]).unwrap();
        assert_eq!(out, r#"["OK"]"#);
        let empty = encode_response(&[String::new()]).unwrap();
        assert_eq!(empty, r#"[""]"#);
    }

    #[test]
    fn test_tokenize_alphanumeric_runs() {
        assert_eq!(tokenize("SET x 5"), vec!["SET", "x", "5"]);
        assert_eq!(
            tokenize("  HSET, h: \"f\" 'v'  "),
            vec!["HSET", "h", "f", "v"]
        );
        assert_eq!(tokenize("!!!"), Vec::<String>::new());
        assert_eq!(tokenize(""), Vec::<String>::new());
    }
}
