//! Result Collection
//!
//! Order-preserving storage for job results. Backed by a pre-allocated slot
//! array indexed by `JobIndex`, so concurrent `put` calls from different
//! workers touch disjoint memory; only the fill counter is shared.

use crate::JobIndex;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Invariant violations in result collection.
///
/// None of these correspond to a job-level failure; each indicates a bug in
/// the dispatching layer and is fatal to the batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectorError {
    /// A slot received a second value.
    #[error("duplicate result for job index {index}")]
    DuplicateIndex {
        /// The index that was published twice.
        index: JobIndex,
    },

    /// A result was published for an index outside `[0, N)`.
    #[error("job index {index} out of range for batch of {len}")]
    OutOfRange {
        /// The offending index.
        index: JobIndex,
        /// The batch size.
        len: usize,
    },

    /// `drain` was called before every slot was filled.
    #[error("incomplete batch: {filled} of {expected} results collected")]
    Incomplete {
        /// Slots filled so far.
        filled: usize,
        /// Batch size.
        expected: usize,
    },
}

/// Collects per-job results keyed by original index.
///
/// Each slot is written at most once; `drain` reassembles the batch in index
/// order once every slot is filled, independent of completion order.
#[derive(Debug)]
pub struct ResultCollector<T> {
    slots: Vec<OnceLock<T>>,
    filled: AtomicUsize,
}

impl<T> ResultCollector<T> {
    /// Create a collector with one empty slot per job.
    pub fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, OnceLock::new);
        Self {
            slots,
            filled: AtomicUsize::new(0),
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the collector has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots filled so far.
    pub fn filled(&self) -> usize {
        self.filled.load(Ordering::Acquire)
    }

    /// Whether every slot holds a result.
    pub fn is_complete(&self) -> bool {
        self.filled() == self.slots.len()
    }

    /// Store `value` at `index`.
    ///
    /// Safe to call concurrently from multiple workers as long as each index
    /// is published once; a second publish for the same index reports
    /// `DuplicateIndex`.
    pub fn put(&self, index: JobIndex, value: T) -> Result<(), CollectorError> {
        let slot = self
            .slots
            .get(index)
            .ok_or(CollectorError::OutOfRange {
                index,
                len: self.slots.len(),
            })?;

        slot.set(value)
            .map_err(|_| CollectorError::DuplicateIndex { index })?;
        self.filled.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Consume the collector and return the results in index order.
    ///
    /// Callable only once all slots are filled.
    pub fn drain(self) -> Result<Vec<T>, CollectorError> {
        let expected = self.slots.len();
        let filled = self.filled.load(Ordering::Acquire);
        if filled != expected {
            return Err(CollectorError::Incomplete { filled, expected });
        }

        // Every slot is set at this point; into_inner cannot yield None.
        Ok(self
            .slots
            .into_iter()
            .map(|slot| slot.into_inner().expect("filled slot"))
            .collect())
    }
}
