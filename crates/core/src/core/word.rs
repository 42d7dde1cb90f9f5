//! Word representation and the greedy merge engine.
//!
//! A [`Word`] is a doubly linked list of [`Symbol`]s threaded through a flat
//! vector by index. Merging never shifts elements: the right half of a merged
//! pair is tombstoned (`len == 0`) and every tombstone is dropped in a single
//! compaction pass once no merge applies any more.

use crate::core::merges::MergeRules;
use crate::core::priority::{MergeCandidate, MergeQueue};
use rand::Rng;
use tracing::trace;

/// One unit of a word being merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// Current token id
    pub id: u32,
    /// Index of the previous live symbol
    pub prev: Option<usize>,
    /// Index of the next live symbol
    pub next: Option<usize>,
    /// Byte length of the input covered by this symbol, 0 once absorbed
    pub len: usize,
}

impl Symbol {
    /// Absorb `right`, which must be this symbol's next neighbour.
    #[inline]
    fn merge_with(&mut self, right: &Symbol, new_id: u32) {
        self.id = new_id;
        self.len += right.len;
        self.next = right.next;
    }
}

/// A word as a sequence of symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    symbols: Vec<Symbol>,
}

impl Word {
    /// Create an empty word.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty word with room for `capacity` symbols.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(capacity),
        }
    }

    /// Append a symbol covering `len` bytes of input.
    pub fn add(&mut self, id: u32, len: usize) {
        let prev = match self.symbols.len() {
            0 => None,
            n => {
                self.symbols[n - 1].next = Some(n);
                Some(n - 1)
            }
        };

        self.symbols.push(Symbol {
            id,
            prev,
            next: None,
            len,
        });
    }

    /// Number of symbols, including tombstones while a merge is in progress.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the word has no symbols.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols in storage order.
    #[inline]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Token ids in storage order, including tombstones while a merge is in
    /// progress. After a merge completes this is the final token order.
    pub fn ids(&self) -> Vec<u32> {
        self.symbols.iter().map(|s| s.id).collect()
    }

    /// Iterate `(id, (start, end))` over the live symbols in link order.
    ///
    /// Offsets are half-open and accumulate from 0.
    pub fn spans(&self) -> Spans<'_> {
        Spans {
            symbols: &self.symbols,
            cursor: if self.symbols.is_empty() { None } else { Some(0) },
            offset: 0,
        }
    }

    /// Apply every applicable merge, highest priority first.
    pub fn merge_all(&mut self, merges: &MergeRules) {
        self.merge_with(merges, |_| false);
    }

    /// Apply merges as [`Word::merge_all`] does, but skip each popped
    /// candidate with probability `dropout`.
    ///
    /// Skipped candidates are re-queued as soon as a popped candidate is not
    /// skipped, so they get another chance later on. With `dropout >= 1.0` no
    /// merge is ever applied.
    pub fn merge_all_with_dropout<R: Rng + ?Sized>(
        &mut self,
        merges: &MergeRules,
        dropout: f32,
        rng: &mut R,
    ) {
        self.merge_with(merges, |candidate| {
            let skip = rng.random::<f32>() < dropout;
            if skip {
                trace!(pos = candidate.pos, rank = candidate.rank, "dropout skipped merge");
            }
            skip
        });
    }

    fn merge_with<F>(&mut self, merges: &MergeRules, mut skip: F)
    where
        F: FnMut(&MergeCandidate) -> bool,
    {
        let mut queue = MergeQueue::with_capacity(self.symbols.len());
        let mut skipped: Vec<MergeCandidate> = Vec::new();

        for (pos, window) in self.symbols.windows(2).enumerate() {
            if let Some((rank, new_id)) = merges.get((window[0].id, window[1].id)) {
                queue.push(MergeCandidate::new(pos, rank, new_id));
            }
        }

        while let Some(top) = queue.pop() {
            if skip(&top) {
                skipped.push(top);
                continue;
            }
            queue.extend(skipped.drain(..));

            let current = self.symbols[top.pos];
            if current.len == 0 {
                continue;
            }
            let Some(next_pos) = current.next else {
                continue;
            };
            let right = self.symbols[next_pos];

            // A merge elsewhere may have changed either side since this
            // candidate was queued.
            match merges.get((current.id, right.id)) {
                Some((_, new_id)) if new_id == top.new_id => {}
                _ => continue,
            }

            self.symbols[top.pos].merge_with(&right, top.new_id);
            self.symbols[next_pos].len = 0;
            if let Some(after) = right.next {
                self.symbols[after].prev = Some(top.pos);
            }

            let current = self.symbols[top.pos];
            if let Some(prev) = current.prev {
                if let Some((rank, new_id)) = merges.get((self.symbols[prev].id, current.id)) {
                    queue.push(MergeCandidate::new(prev, rank, new_id));
                }
            }
            if let Some(next) = current.next {
                if let Some((rank, new_id)) = merges.get((current.id, self.symbols[next].id)) {
                    queue.push(MergeCandidate::new(top.pos, rank, new_id));
                }
            }
        }

        self.compact();
    }

    /// Drop tombstones and relink the survivors in storage order.
    fn compact(&mut self) {
        self.symbols.retain(|s| s.len != 0);

        let last = self.symbols.len().saturating_sub(1);
        for (i, symbol) in self.symbols.iter_mut().enumerate() {
            symbol.prev = i.checked_sub(1);
            symbol.next = (i < last).then_some(i + 1);
        }
    }
}

/// Iterator over a word's symbols with their offsets, see [`Word::spans`].
pub struct Spans<'a> {
    symbols: &'a [Symbol],
    cursor: Option<usize>,
    offset: usize,
}

impl Iterator for Spans<'_> {
    type Item = (u32, (usize, usize));

    fn next(&mut self) -> Option<Self::Item> {
        let symbol = self.symbols.get(self.cursor?)?;
        let start = self.offset;
        self.offset += symbol.len;
        self.cursor = symbol.next;
        Some((symbol.id, (start, self.offset)))
    }
}
