//! Wire Protocol
//!
//! Requests and responses travel as JSON arrays of strings; a frame is
//! delimited by the first `[` in the stream and the next `]` after it. This
//! module owns frame extraction from receive buffers, request decoding,
//! response encoding, and the tokenizer the terminal client applies to raw
//! input.

pub mod frame;

pub use frame::{decode_request, encode_response, extract, tokenize};
