//! Typed Object Model
//!
//! Every key in a database owns exactly one [`Object`]. An object is one of
//! five value types, each implemented in its own submodule:
//!
//! - [`Str`]: a plain string with integer arithmetic
//! - [`List`]: a double-ended sequence
//! - [`Hash`]: a field-to-value map that remembers insertion order
//! - [`Set`]: unique members with snapshot intersection/difference
//! - [`ZSet`]: members ordered by `(score, member)`
//!
//! `Object` is a closed enum rather than a tag-plus-downcast hierarchy: command
//! execution reaches the concrete value through the `as_*` accessors, so a verb
//! aimed at a key of the wrong type gets `None` instead of a bad cast.
//!
//! Objects also know how to snapshot themselves to bytes ([`Object::encode`] /
//! [`Object::decode`]), which is what a future persistence layer would write.

pub mod hash;
pub mod list;
pub mod set;
pub mod string;
pub mod zset;

pub use hash::Hash;
pub use list::List;
pub use set::Set;
pub use string::Str;
pub use zset::ZSet;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from the object snapshot codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("object encode failed: {0}")]
    Encode(#[source] bincode::Error),

    #[error("object decode failed: {0}")]
    Decode(#[source] bincode::Error),
}

/// The type tag of a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    Str,
    List,
    Hash,
    Set,
    ZSet,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectType::Str => "str",
            ObjectType::List => "list",
            ObjectType::Hash => "hash",
            ObjectType::Set => "set",
            ObjectType::ZSet => "zset",
        };
        f.write_str(name)
    }
}

/// A value stored under a key: exactly one of the five supported types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Object {
    Str(Str),
    List(List),
    Hash(Hash),
    Set(Set),
    ZSet(ZSet),
}

impl Object {
    /// Returns the type tag of this object.
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Str(_) => ObjectType::Str,
            Object::List(_) => ObjectType::List,
            Object::Hash(_) => ObjectType::Hash,
            Object::Set(_) => ObjectType::Set,
            Object::ZSet(_) => ObjectType::ZSet,
        }
    }

    /// Creates a fresh zero-valued object of the given type.
    pub fn new(object_type: ObjectType) -> Self {
        match object_type {
            ObjectType::Str => Object::Str(Str::default()),
            ObjectType::List => Object::List(List::default()),
            ObjectType::Hash => Object::Hash(Hash::default()),
            ObjectType::Set => Object::Set(Set::default()),
            ObjectType::ZSet => Object::ZSet(ZSet::default()),
        }
    }

    pub fn as_str(&self) -> Option<&Str> {
        match self {
            Object::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str_mut(&mut self) -> Option<&mut Str> {
        match self {
            Object::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Object::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Object::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&Hash> {
        match self {
            Object::Hash(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_hash_mut(&mut self) -> Option<&mut Hash> {
        match self {
            Object::Hash(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&Set> {
        match self {
            Object::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_set_mut(&mut self) -> Option<&mut Set> {
        match self {
            Object::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_zset(&self) -> Option<&ZSet> {
        match self {
            Object::ZSet(z) => Some(z),
            _ => None,
        }
    }

    pub fn as_zset_mut(&mut self) -> Option<&mut ZSet> {
        match self {
            Object::ZSet(z) => Some(z),
            _ => None,
        }
    }

    /// Serializes the object (type tag included) into a compact binary form.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(self).map_err(CodecError::Encode)
    }

    /// Reconstructs an object from [`Object::encode`] output.
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        bincode::deserialize(buf).map_err(CodecError::Decode)
    }
}
