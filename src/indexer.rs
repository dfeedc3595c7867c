//! Candidate-rule index.
//!
//! Given the patterns of N rules, the indexer answers one question fast: for
//! this probe string, which rule indices *could* match? The caller re-tests
//! every candidate against the probe, so the index may over-approximate but
//! must never miss a match.
//!
//! ## Build side
//!
//! Each indexable pattern contributes its literal key, truncated to the
//! leading [`KEY_LENGTH`] characters (suffix patterns contribute their
//! trailing characters instead). Keys go
//! into one bucket map per wildcard kind, each bucket holding rule indices
//! in insertion order (equal to ascending declaration order).
//!
//! Keys are stored lower-cased even for case-sensitive patterns: one fold of
//! the probe at lookup beats probing the maps in several cases, and the
//! pattern's own re-test restores exact-case semantics.
//!
//! ## Lookup side
//!
//! The probe is folded once, then every character window of length
//! `1..=min(KEY_LENGTH, n)` is sliced and probed against the kinds it can
//! serve: `None` only as the full-length prefix window, `Right` at the
//! start, `Left` at the end, `Both` anywhere. A kind is pruned for windows
//! shorter than its shortest stored key. Results are unioned and returned
//! ascending.

use std::collections::{BTreeSet, HashMap};

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::pattern::{IndexEntry, Wildcard};

/// Index keys are truncated to this many characters. 7–9 works well.
pub(crate) const KEY_LENGTH: usize = 8;

bitflags! {
    /// The wildcard kinds a probe window can serve.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct WildcardSet: u8 {
        const NONE  = 1 << 0;
        const RIGHT = 1 << 1;
        const LEFT  = 1 << 2;
        const BOTH  = 1 << 3;
    }
}

const KINDS: [(WildcardSet, usize); 4] = [
    (WildcardSet::NONE, 0),
    (WildcardSet::RIGHT, 1),
    (WildcardSet::LEFT, 2),
    (WildcardSet::BOTH, 3),
];

fn bucket_of(wildcard: Wildcard) -> usize {
    match wildcard {
        Wildcard::None => 0,
        Wildcard::Right => 1,
        Wildcard::Left => 2,
        Wildcard::Both => 3,
    }
}

#[derive(Debug)]
pub(crate) struct Indexer {
    buckets: [HashMap<String, Vec<usize>>; 4],
    key_length: usize,
    /// Shortest stored key per kind, set by `freeze`. `None` inside the array
    /// means the kind holds no keys at all.
    min_key_len: Option<[Option<usize>; 4]>,
}

impl Indexer {
    pub(crate) fn new(key_length: usize) -> Self {
        Self { buckets: Default::default(), key_length, min_key_len: None }
    }

    /// Register the pattern of rule number `order_no`.
    pub(crate) fn add(&mut self, entry: IndexEntry<'_>, order_no: usize) {
        let key: String = if entry.wildcard == Wildcard::Left {
            let len = entry.key.chars().count();
            entry.key.chars().skip(len.saturating_sub(self.key_length)).collect()
        } else {
            entry.key.chars().take(self.key_length).collect()
        };
        // insensitive keys are already folded at parse time
        let key = if entry.case_sensitive { key.to_lowercase() } else { key };
        self.buckets[bucket_of(entry.wildcard)].entry(key).or_default().push(order_no);
    }

    /// Compute per-kind minimum key lengths. One-shot; a second call fails.
    pub(crate) fn freeze(&mut self) -> Result<()> {
        if self.min_key_len.is_some() {
            return Err(Error::IndexerFrozen);
        }
        let mut mins = [None; 4];
        for (bucket, min) in self.buckets.iter().zip(mins.iter_mut()) {
            *min = bucket.keys().map(|key| key.chars().count()).min();
        }
        self.min_key_len = Some(mins);
        Ok(())
    }

    /// Candidate rule indices for `probe`, ascending.
    pub(crate) fn lookup(&self, probe: &str) -> Vec<usize> {
        let Some(mins) = &self.min_key_len else {
            return Vec::new();
        };
        let probe = probe.to_lowercase();
        let chars: Vec<char> = probe.chars().collect();
        let mut hits = BTreeSet::new();
        for (start, stop, kinds) in self.windows(chars.len(), mins) {
            let key: String = chars[start..stop].iter().collect();
            for (flag, bucket) in KINDS {
                if kinds.contains(flag) {
                    if let Some(found) = self.buckets[bucket].get(&key) {
                        hits.extend(found.iter().copied());
                    }
                }
            }
        }
        hits.into_iter().collect()
    }

    /// All `(start, stop, kinds)` character windows worth probing for a
    /// string of `length` characters. A pure function of the length and the
    /// frozen minimums.
    fn windows(&self, length: usize, mins: &[Option<usize>; 4]) -> Vec<(usize, usize, WildcardSet)> {
        let mut out = Vec::new();
        let max_window = self.key_length.min(length);
        for window in 1..=max_window {
            for start in 0..=(length - window) {
                let stop = start + window;
                let is_begin = start == 0;
                let is_end = stop == length;
                let mut kinds = WildcardSet::BOTH;
                if is_begin && window == max_window {
                    kinds |= WildcardSet::NONE;
                }
                if is_begin {
                    kinds |= WildcardSet::RIGHT;
                }
                if is_end {
                    kinds |= WildcardSet::LEFT;
                }
                // drop kinds whose shortest key cannot fit this window
                for (flag, bucket) in KINDS {
                    match mins[bucket] {
                        Some(min) if window >= min => {}
                        _ => kinds -= flag,
                    }
                }
                if !kinds.is_empty() {
                    out.push((start, stop, kinds));
                }
            }
        }
        out
    }
}
