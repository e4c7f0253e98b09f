//! # EmberKV
//!
//! An in-memory, multi-type key-value server speaking a bracketed JSON-array
//! protocol over TCP.
//!
//! ## Architecture
//!
//! ```text
//! +-------------+     +----------------+     +---------------------------+
//! | TCP clients | --> |  connection::  | --> |        scheduler::        |
//! |             | <-- | one task each, | <-- | single task, owns Vec<Db> |
//! +-------------+     | frame + decode |     | command FIFO + timer heap |
//!                     +----------------+     +------------+--------------+
//!                                                         |
//!                                             +-----------v-----------+
//!                                             | commands::executor    |
//!                                             | storage::Db, object:: |
//!                                             +-----------------------+
//! ```
//!
//! - [`protocol`] frames `[...]` requests out of the byte stream and decodes
//!   them as JSON string arrays.
//! - [`commands`] classifies a request into one of seven families and runs it.
//! - [`scheduler`] serializes every command through one task that owns all
//!   databases, and expires keys from a deadline min-heap on the same task.
//! - [`storage`] and [`object`] are plain data: keyspaces mapping names to
//!   typed values, with no locking of their own.
//! - [`connection`] reads frames, submits commands, and flushes each response
//!   before reading further input.

pub mod commands;
pub mod connection;
pub mod object;
pub mod protocol;
pub mod scheduler;
pub mod storage;

pub use commands::Command;
pub use connection::{ConnectionError, ConnectionHandler, ConnectionStats};
pub use object::{Object, ObjectType};
pub use scheduler::{Scheduler, SchedulerHandle};
pub use storage::Db;

/// Default listen address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default number of databases available to SELECT.
pub const DEFAULT_DATABASES: usize = 16;

/// Crate version, reported at startup.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
