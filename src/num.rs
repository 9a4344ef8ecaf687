//! Cheap total ordering for the coordinates we sweep over.

use std::hash::Hash;

/// A wrapper for `f64` that implements `Ord`.
///
/// Every ordering decision in this crate (sweep order, status order, output
/// sorting) goes through this type. It does not try to order NaNs: comparing
/// a NaN yields `Equal`, which is nonsense, so the ingestion layer rejects
/// non-finite coordinates before they can reach a comparison. Skipping the
/// NaN bookkeeping of the `ordered_float` wrappers keeps the hot comparison
/// path to two branches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheapOrderedFloat(f64);

impl CheapOrderedFloat {
    /// Retrieve the inner `f64`.
    pub fn into_inner(self) -> f64 {
        self.0
    }
}

impl From<f64> for CheapOrderedFloat {
    fn from(value: f64) -> Self {
        CheapOrderedFloat(value)
    }
}

impl Hash for CheapOrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state)
    }
}

impl Eq for CheapOrderedFloat {}

impl PartialOrd for CheapOrderedFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapOrderedFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}
