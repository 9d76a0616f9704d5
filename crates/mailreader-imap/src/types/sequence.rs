//! Sequence sets.

use std::fmt;

use super::SeqNum;

/// A non-empty list of sequence numbers, sent in the order given.
///
/// Order matters: servers answer FETCH in set order, and listings rely
/// on that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSet(Vec<SeqNum>);

impl SequenceSet {
    /// One message; `None` for zero.
    #[must_use]
    pub fn single(n: u32) -> Option<Self> {
        SeqNum::new(n).map(Self::from)
    }

    /// `None` for an empty slice.
    #[must_use]
    pub fn from_seq_nums(ids: &[SeqNum]) -> Option<Self> {
        (!ids.is_empty()).then(|| Self(ids.to_vec()))
    }

    /// `None` for an empty slice or when any number is zero.
    #[must_use]
    pub fn from_numbers(nums: &[u32]) -> Option<Self> {
        let ids = nums
            .iter()
            .map(|&n| SeqNum::new(n))
            .collect::<Option<Vec<_>>>()?;
        Self::from_seq_nums(&ids)
    }

    /// The members in order.
    #[must_use]
    pub fn ids(&self) -> &[SeqNum] {
        &self.0
    }
}

impl From<SeqNum> for SequenceSet {
    fn from(id: SeqNum) -> Self {
        Self(vec![id])
    }
}

impl fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            id.fmt(f)?;
        }
        Ok(())
    }
}
