//! Set (unique members) values.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A set of unique strings.
///
/// `inter` and `diff` are pure computations over snapshots; neither operand is
/// mutated. `rand_member` picks an arbitrary member without removing it, `pop`
/// removes the member it returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Set {
    members: HashSet<String>,
}

impl Set {
    /// Inserts `member`. Returns whether it was newly added.
    pub fn add(&mut self, member: impl Into<String>) -> bool {
        self.members.insert(member.into())
    }

    /// Removes `member`. Returns whether it was present.
    pub fn rem(&mut self, member: &str) -> bool {
        self.members.remove(member)
    }

    pub fn card(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_member(&self, member: &str) -> bool {
        self.members.contains(member)
    }

    /// Snapshot of all members, in sorted order so responses are stable.
    pub fn members(&self) -> Vec<String> {
        let mut out: Vec<String> = self.members.iter().cloned().collect();
        out.sort();
        out
    }

    /// An arbitrary member, left in place.
    pub fn rand_member(&self) -> Option<&str> {
        self.members.iter().next().map(String::as_str)
    }

    /// Removes and returns an arbitrary member.
    pub fn pop(&mut self) -> Option<String> {
        let member = self.members.iter().next().cloned()?;
        self.members.remove(&member);
        Some(member)
    }

    /// Members present in both sets, sorted.
    pub fn inter(&self, other: &Set) -> Vec<String> {
        let mut out: Vec<String> = self
            .members
            .intersection(&other.members)
            .cloned()
            .collect();
        out.sort();
        out
    }

    /// Members present in `self` but not in `other`, sorted.
    pub fn diff(&self, other: &Set) -> Vec<String> {
        let mut out: Vec<String> = self.members.difference(&other.members).cloned().collect();
        out.sort();
        out
    }
}
