//! Sorted-set values: members ordered by `(score, member)`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A member-to-score mapping with a total order.
///
/// The order is primary by score, tie-broken by member lexical order. Every
/// range operation reports `(member, score)` pairs in that order. Two indexes
/// are kept in lockstep: `scores` for point lookups and `ordered` for ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZSet {
    scores: HashMap<String, i64>,
    ordered: BTreeSet<(i64, String)>,
}

impl ZSet {
    /// Inserts `member` with `score`, replacing any previous score.
    pub fn add(&mut self, score: i64, member: impl Into<String>) {
        let member = member.into();
        if let Some(old) = self.scores.insert(member.clone(), score) {
            self.ordered.remove(&(old, member.clone()));
        }
        self.ordered.insert((score, member));
    }

    /// Removes `member` only if it is currently stored with exactly `score`.
    /// Returns whether anything was removed.
    pub fn rem(&mut self, score: i64, member: &str) -> bool {
        match self.scores.get(member) {
            Some(&current) if current == score => {
                self.scores.remove(member);
                self.ordered.remove(&(score, member.to_string()));
                true
            }
            _ => false,
        }
    }

    /// Adds `delta` to `member`'s score; an absent member starts from 0.
    pub fn incr_by(&mut self, delta: i64, member: &str) {
        let current = self.scores.get(member).copied().unwrap_or(0);
        self.add(current.wrapping_add(delta), member);
    }

    /// Subtracts `delta` from `member`'s score; an absent member starts from 0.
    pub fn decr_by(&mut self, delta: i64, member: &str) {
        let current = self.scores.get(member).copied().unwrap_or(0);
        self.add(current.wrapping_sub(delta), member);
    }

    pub fn card(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score of `member`, if present.
    pub fn score(&self, member: &str) -> Option<i64> {
        self.scores.get(member).copied()
    }

    /// Number of members with score in the inclusive range `[lo, hi]`.
    pub fn count(&self, lo: i64, hi: i64) -> usize {
        self.iter().filter(|(_, s)| (lo..=hi).contains(s)).count()
    }

    /// Number of members lexically in the inclusive range `[lo, hi]`.
    pub fn lex_count(&self, lo: &str, hi: &str) -> usize {
        self.scores
            .keys()
            .filter(|m| m.as_str() >= lo && m.as_str() <= hi)
            .count()
    }

    /// Members at index positions `[lo, hi)` of the total order, clamped.
    pub fn range(&self, lo: usize, hi: usize) -> Vec<(String, i64)> {
        self.iter().skip(lo).take(hi.saturating_sub(lo)).collect()
    }

    /// Members with score in the inclusive range `[lo, hi]`, in total order.
    pub fn range_by_score(&self, lo: i64, hi: i64) -> Vec<(String, i64)> {
        self.ordered
            .range((lo, String::new())..)
            .take_while(|(s, _)| *s <= hi)
            .map(|(s, m)| (m.clone(), *s))
            .collect()
    }

    /// Members lexically in the inclusive range `[lo, hi]`, in total order.
    pub fn range_by_lex(&self, lo: &str, hi: &str) -> Vec<(String, i64)> {
        self.iter()
            .filter(|(m, _)| m.as_str() >= lo && m.as_str() <= hi)
            .collect()
    }

    fn iter(&self) -> impl Iterator<Item = (String, i64)> + '_ {
        self.ordered.iter().map(|(s, m)| (m.clone(), *s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ZSet {
        let mut z = ZSet::default();
        z.add(3, "carol");
        z.add(1, "alice");
        z.add(2, "bob");
        z.add(2, "amy"); // same score as bob, earlier lexically
        z
    }

    #[test]
    fn test_total_order_score_then_member() {
        let z = sample();
        let all = z.range(0, z.card());
        assert_eq!(
            all,
            vec![
                ("alice".to_string(), 1),
                ("amy".to_string(), 2),
                ("bob".to_string(), 2),
                ("carol".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_add_updates_score_in_place() {
        let mut z = sample();
        z.add(10, "alice");
        assert_eq!(z.card(), 4);
        assert_eq!(z.score("alice"), Some(10));
        let all = z.range(0, z.card());
        assert_eq!(all.last().unwrap().0, "alice");
    }

    #[test]
    fn test_rem_requires_exact_pair() {
        let mut z = sample();
        assert!(!z.rem(99, "alice"));
        assert!(z.score("alice").is_some());
        assert!(z.rem(1, "alice"));
        assert_eq!(z.score("alice"), None);
        assert_eq!(z.card(), 3);
    }

    #[test]
    fn test_incr_decr_and_absent_member() {
        let mut z = ZSet::default();
        z.incr_by(5, "new");
        assert_eq!(z.score("new"), Some(5));
        z.decr_by(7, "new");
        assert_eq!(z.score("new"), Some(-2));
    }

    #[test]
    fn test_count_and_lex_count() {
        let z = sample();
        assert_eq!(z.count(2, 3), 3);
        assert_eq!(z.count(5, 9), 0);
        assert_eq!(z.lex_count("alice", "bob"), 3);
        assert_eq!(z.lex_count("x", "z"), 0);
    }

    #[test]
    fn test_range_by_score_contiguous_subrange() {
        let z = sample();
        let sub = z.range_by_score(2, 2);
        assert_eq!(
            sub,
            vec![("amy".to_string(), 2), ("bob".to_string(), 2)]
        );

        // The sub-range is a contiguous slice of the full order.
        let all = z.range(0, z.card());
        let pos = all.iter().position(|p| p == &sub[0]).unwrap();
        assert_eq!(&all[pos..pos + sub.len()], sub.as_slice());
    }

    #[test]
    fn test_range_by_score_negative_bounds() {
        let mut z = ZSet::default();
        z.add(-5, "low");
        z.add(0, "mid");
        z.add(5, "high");
        assert_eq!(
            z.range_by_score(-10, 0),
            vec![("low".to_string(), -5), ("mid".to_string(), 0)]
        );
    }

    #[test]
    fn test_range_clamps_indices() {
        let z = sample();
        assert_eq!(z.range(2, 100).len(), 2);
        assert!(z.range(9, 12).is_empty());
        assert!(z.range(3, 3).is_empty());
    }

    #[test]
    fn test_range_by_lex() {
        let z = sample();
        let got = z.range_by_lex("amy", "bob");
        assert_eq!(
            got,
            vec![("amy".to_string(), 2), ("bob".to_string(), 2)]
        );
    }
}
