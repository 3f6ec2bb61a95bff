//! Append-only roll history.

use super::DieSpec;
use serde::{Deserialize, Serialize};

/// Ordered sequence of roll outcomes for one session.
///
/// Entries are stored as given. Values that do not name a face of the
/// die being analysed are kept in the history but skipped when tallying,
/// so a single malformed entry never invalidates a long history.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollHistory {
    rolls: Vec<i64>,
}

impl RollHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history from existing roll outcomes.
    pub fn from_rolls(rolls: Vec<i64>) -> Self {
        Self { rolls }
    }

    /// Appends one outcome.
    #[inline]
    pub fn push(&mut self, roll: i64) {
        self.rolls.push(roll);
    }

    /// Returns the recorded outcomes in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[i64] {
        &self.rolls
    }

    /// Returns the number of recorded entries, including out-of-range ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.rolls.len()
    }

    /// Returns true if nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }

    /// Discards every recorded entry.
    pub fn clear(&mut self) {
        self.rolls.clear();
    }

    /// Counts occurrences of each face; index 0 holds face 1.
    pub fn tally(&self, die: DieSpec) -> Vec<u64> {
        tally(&self.rolls, die)
    }

    /// Number of entries that name a face of `die`.
    pub fn in_range_total(&self, die: DieSpec) -> u64 {
        self.rolls.iter().filter(|&&r| die.contains(r)).count() as u64
    }
}

impl Extend<i64> for RollHistory {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        self.rolls.extend(iter);
    }
}

impl FromIterator<i64> for RollHistory {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            rolls: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for RollHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollHistory")
            .field("len", &self.rolls.len())
            .field("last", &self.rolls.last())
            .finish()
    }
}

/// Per-face counts over a slice of outcomes, ignoring out-of-range values.
pub(crate) fn tally(rolls: &[i64], die: DieSpec) -> Vec<u64> {
    let mut counts = vec![0u64; die.arity() as usize];
    for &roll in rolls {
        if die.contains(roll) {
            counts[(roll - 1) as usize] += 1;
        }
    }
    counts
}
