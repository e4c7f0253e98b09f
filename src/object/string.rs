//! String values with integer arithmetic.

use serde::{Deserialize, Serialize};

/// A plain string value.
///
/// `incr_by`/`decr_by` interpret the current contents as a signed 64-bit
/// integer; if the contents do not parse, the value is left untouched and the
/// operation reports failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Str {
    data: String,
}

impl Str {
    /// Replaces the whole value.
    pub fn set(&mut self, value: impl Into<String>) {
        self.data = value.into();
    }

    /// Returns the current value.
    pub fn get(&self) -> &str {
        &self.data
    }

    /// Appends to the current value.
    pub fn append(&mut self, value: &str) {
        self.data.push_str(value);
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Adds `n` to the integer value. Returns `false` (without mutating) if
    /// the current contents are not an integer.
    pub fn incr_by(&mut self, n: i64) -> bool {
        match self.data.parse::<i64>() {
            Ok(current) => {
                self.data = current.wrapping_add(n).to_string();
                true
            }
            Err(_) => false,
        }
    }

    /// Subtracts `n` from the integer value. Returns `false` (without
    /// mutating) if the current contents are not an integer.
    pub fn decr_by(&mut self, n: i64) -> bool {
        match self.data.parse::<i64>() {
            Ok(current) => {
                self.data = current.wrapping_sub(n).to_string();
                true
            }
            Err(_) => false,
        }
    }
}
