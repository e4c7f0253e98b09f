//! Storage Module
//!
//! The keyspace layer: a [`Db`] maps key names to exclusively-owned typed
//! objects and tracks an expiry deadline per key. A server holds a fixed set
//! of databases, created once at startup; connections address them by numeric
//! index via SELECT.
//!
//! Databases carry no locking of their own: they are owned by the single
//! scheduler task and only ever touched by it, so each command executes
//! atomically with respect to every other client and key.

pub mod db;

pub use db::Db;
