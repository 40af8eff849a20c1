use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::ranking::RankedCandidate;

/// Heap entry: highest score wins, ties go to the lower row.
#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    score: f32,
    row: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.row.cmp(&self.row))
    }
}

/// Consume-once, best-first view over a full score vector.
///
/// Building the heap is linear; each `next()` is a log-time pop, so a scan that
/// stops early never pays for a full sort.
#[derive(Debug)]
pub struct RankedCandidates {
    heap: BinaryHeap<HeapEntry>,
}

impl RankedCandidates {
    /// `scores[row]` is the score of vocabulary row `row`.
    pub fn from_scores(scores: Vec<f32>) -> Self {
        let entries: Vec<HeapEntry> = scores
            .into_iter()
            .enumerate()
            .map(|(row, score)| HeapEntry { score, row })
            .collect();
        Self {
            heap: BinaryHeap::from(entries),
        }
    }

    pub fn remaining(&self) -> usize {
        self.heap.len()
    }
}

impl Iterator for RankedCandidates {
    type Item = RankedCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        self.heap
            .pop()
            .map(|entry| RankedCandidate::new(entry.row, entry.score))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl ExactSizeIterator for RankedCandidates {}
