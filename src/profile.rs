//! This module contains the difficulty fingerprint recorded while a puzzle
//! is solved with the ranked deduction rules.

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display, Formatter};

/// One event of a solve attempt: the rule at `level` fired and emitted
/// `count` moves.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ProfileEntry {

    /// The difficulty level of the rule that fired, that is, its index in
    /// the rule table.
    pub level: usize,

    /// The number of moves the rule emitted in that sweep.
    pub count: usize
}

/// The difficulty fingerprint of a solve attempt: an ordered log of
/// [ProfileEntry]s in the order the engine discovered them, together with a
/// flag whether the attempt ended in a solved grid.
///
/// The profile is a log, not a histogram. The sequence
/// `(0, 4), (1, 2), (0, 1), (2, 3)` describes a different solving
/// experience from `(0, 5), (1, 2), (2, 3)` even though the per-level
/// totals match: the first solver had to reach for the harder rule in the
/// middle of a run of easy moves.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Profile {
    entries: Vec<ProfileEntry>,
    solved: bool
}

impl Profile {

    /// Creates a new, empty profile that is not marked solved.
    pub fn new() -> Profile {
        Profile::default()
    }

    /// Appends an entry recording that the rule at `level` emitted `count`
    /// moves.
    pub fn add(&mut self, level: usize, count: usize) {
        self.entries.push(ProfileEntry { level, count });
    }

    /// Gets the number of recorded entries. This is the number of times any
    /// rule fired, which makes it the primary difficulty measure.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Indicates whether no rule fired at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets the difficulty level of the `i`-th entry.
    pub fn level(&self, i: usize) -> usize {
        self.entries[i].level
    }

    /// Gets the move count of the `i`-th entry.
    pub fn count(&self, i: usize) -> usize {
        self.entries[i].count
    }

    /// Gets the recorded entries in discovery order.
    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }

    /// Gets the total number of moves across all entries.
    pub fn total_moves(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Indicates whether the solve attempt this profile describes ended in
    /// a completely solved grid.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Records whether the solve attempt ended in a solved grid.
    pub fn set_solved(&mut self, solved: bool) {
        self.solved = solved;
    }

    /// Removes all entries and resets the solved flag.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.solved = false;
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{} : {}", entry.level, entry.count)?;
        }

        writeln!(f, "{}", if self.solved { "solved" } else { "unsolved" })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn profile_records_in_order() {
        let mut profile = Profile::new();
        profile.add(0, 4);
        profile.add(1, 2);
        profile.add(0, 1);

        assert_eq!(3, profile.len());
        assert_eq!(0, profile.level(0));
        assert_eq!(4, profile.count(0));
        assert_eq!(1, profile.level(1));
        assert_eq!(0, profile.level(2));
        assert_eq!(7, profile.total_moves());
        assert!(!profile.is_solved());
    }

    #[test]
    fn order_distinguishes_profiles() {
        let mut first = Profile::new();
        first.add(0, 4);
        first.add(1, 2);
        let mut second = Profile::new();
        second.add(1, 2);
        second.add(0, 4);

        assert_ne!(first, second);
        assert_eq!(first.total_moves(), second.total_moves());
    }

    #[test]
    fn clear_resets_everything() {
        let mut profile = Profile::new();
        profile.add(2, 3);
        profile.set_solved(true);
        profile.clear();

        assert!(profile.is_empty());
        assert!(!profile.is_solved());
    }

    #[test]
    fn display_lists_entries() {
        let mut profile = Profile::new();
        profile.add(0, 4);
        profile.add(1, 2);
        profile.set_solved(true);

        assert_eq!("0 : 4\n1 : 2\nsolved\n", format!("{}", profile));
    }
}
