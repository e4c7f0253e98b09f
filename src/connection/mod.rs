//! TCP connection handling.

pub mod handler;

pub use handler::{ConnectionError, ConnectionHandler, ConnectionStats};
