//! Hash (field-to-value map) values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A field-to-value map.
///
/// Lookup goes through the map; `get_all` reports fields in the order they
/// were first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hash {
    fields: HashMap<String, String>,
    order: Vec<String>,
}

impl Hash {
    /// Sets `field` to `value`, inserting or overwriting.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        if !self.fields.contains_key(&field) {
            self.order.push(field.clone());
        }
        self.fields.insert(field, value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn exists(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Removes `field`. Returns whether it was present.
    pub fn del(&mut self, field: &str) -> bool {
        if self.fields.remove(field).is_some() {
            self.order.retain(|f| f != field);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All `(field, value)` pairs in insertion order.
    pub fn get_all(&self) -> Vec<(&str, &str)> {
        self.order
            .iter()
            .filter_map(|f| self.fields.get(f).map(|v| (f.as_str(), v.as_str())))
            .collect()
    }

    /// Adds `delta` to the integer value stored at `field`. Returns `false`
    /// (without mutating) when the field is missing or not an integer.
    pub fn incr_by(&mut self, field: &str, delta: u64) -> bool {
        self.adjust(field, delta as i64)
    }

    /// Subtracts `delta` from the integer value stored at `field`. Returns
    /// `false` (without mutating) when the field is missing or not an integer.
    pub fn decr_by(&mut self, field: &str, delta: u64) -> bool {
        self.adjust(field, -(delta as i64))
    }

    fn adjust(&mut self, field: &str, delta: i64) -> bool {
        let Some(value) = self.fields.get_mut(field) else {
            return false;
        };
        match value.parse::<i64>() {
            Ok(current) => {
                *value = current.wrapping_add(delta).to_string();
                true
            }
            Err(_) => false,
        }
    }
}
