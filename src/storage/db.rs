//! The `Db` keyspace: named keys owning typed objects, plus expiry metadata.

use crate::object::Object;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// One database: a mapping from key name to an owned [`Object`], with an
/// expiry deadline per key.
///
/// A `Db` is plain data with no interior locking; all access is serialized by
/// the scheduler task that owns it. Command execution borrows an object via
/// [`Db::get`] / [`Db::get_mut`] for the duration of a single command and
/// never holds the reference past it.
#[derive(Debug, Default)]
pub struct Db {
    index: usize,
    objects: HashMap<String, Object>,
    deadlines: HashMap<String, Instant>,
}

impl Db {
    /// Creates an empty database with the given numeric identity.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            objects: HashMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// The numeric identifier clients use with SELECT.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Inserts a fresh object under `key` only when the key is absent.
    /// Returns whether the object was inserted.
    pub fn create(&mut self, key: impl Into<String>, object: Object) -> bool {
        let key = key.into();
        if self.objects.contains_key(&key) {
            return false;
        }
        self.objects.insert(key, object);
        true
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.objects.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Removes `key` and its expiry metadata. Returns whether it existed.
    pub fn del(&mut self, key: &str) -> bool {
        self.deadlines.remove(key);
        self.objects.remove(key).is_some()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Sets or refreshes the expiry deadline for an existing key.
    ///
    /// Returns the recorded deadline so the caller can arm a timer for it, or
    /// `None` when the key does not exist.
    pub fn expire(&mut self, key: &str, ttl: Duration) -> Option<Instant> {
        if !self.objects.contains_key(key) {
            return None;
        }
        let deadline = Instant::now() + ttl;
        self.deadlines.insert(key.to_string(), deadline);
        Some(deadline)
    }

    /// Whether `key` carries a deadline at or before `now`.
    ///
    /// A timer armed before a later EXPIRE refresh sees a newer recorded
    /// deadline here and must not delete the key yet.
    pub fn expiry_due(&self, key: &str, now: Instant) -> bool {
        self.deadlines.get(key).is_some_and(|d| *d <= now)
    }
}
