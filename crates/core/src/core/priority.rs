//! Priority queue for BPE merge candidates.
//!
//! Candidates are never removed from the queue when a neighbouring merge
//! invalidates them; the merge engine revalidates each one as it is popped.

use dary_heap::OctonaryHeap;
use std::cmp::Ordering;

/// A pending merge of the symbol at `pos` with its right neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeCandidate {
    /// Index of the left symbol in the word's backing storage
    pub pos: usize,
    /// Rank of the merge rule (lower = higher priority)
    pub rank: u32,
    /// ID of the token the pair collapses into
    pub new_id: u32,
}

impl MergeCandidate {
    /// Create a new merge candidate.
    pub fn new(pos: usize, rank: u32, new_id: u32) -> Self {
        Self { pos, rank, new_id }
    }
}

// The heap is a max-heap, so the lowest rank (then lowest position) must
// compare as the greatest.
impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .rank
            .cmp(&self.rank)
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of merge candidates.
///
/// Uses an 8-ary heap for better cache locality than a binary heap.
#[derive(Debug, Default)]
pub struct MergeQueue {
    heap: OctonaryHeap<MergeCandidate>,
}

impl MergeQueue {
    /// Create a new priority queue with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
        }
    }

    /// Push a merge candidate onto the queue.
    #[inline]
    pub fn push(&mut self, candidate: MergeCandidate) {
        self.heap.push(candidate);
    }

    /// Pop the best candidate: lowest rank, ties broken by lowest position.
    ///
    /// The returned candidate may be stale.
    #[inline]
    pub fn pop(&mut self) -> Option<MergeCandidate> {
        self.heap.pop()
    }

    /// Get the number of (potentially stale) entries in the queue.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Extend<MergeCandidate> for MergeQueue {
    fn extend<I: IntoIterator<Item = MergeCandidate>>(&mut self, iter: I) {
        for candidate in iter {
            self.heap.push(candidate);
        }
    }
}
