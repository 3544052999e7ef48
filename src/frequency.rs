//! Per-class word frequency tables.
//!
//! A table maps token text to an occurrence count. Keys are compared
//! byte-for-byte (case-sensitive), every key is unique, and counts only ever
//! grow while a corpus is being accumulated.
//!
//! The [`WordCounts`] trait is the contract the corpus accumulator and the
//! classifier depend on; [`FrequencyTable`] is the implementation used by the
//! binary.

use ahash::AHashMap;

/// One (word, count) pair. `count` is at least 1 for any stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFreq {
    pub word: Box<[u8]>,
    pub count: u32,
}

impl WordFreq {
    fn new(word: &[u8]) -> Self {
        Self {
            word: word.into(),
            count: 1,
        }
    }
}

/// Exact-match string dictionary with count accumulation.
pub trait WordCounts {
    /// Find the entry for `word`, inserting it with count 1 if absent.
    ///
    /// A freshly inserted entry already carries its first occurrence, so
    /// callers only increment when the word was already present. Use
    /// [`WordCounts::add`] to get that right without thinking about it.
    fn lookup_or_insert(&mut self, word: &[u8]) -> (&mut WordFreq, bool);

    /// Read-only lookup. `None` means the word never occurred.
    fn count(&self, word: &[u8]) -> Option<u32>;

    /// Number of distinct words.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in first-insertion order.
    fn entries(&self) -> &[WordFreq];

    /// Record one occurrence of `word`.
    fn add(&mut self, word: &[u8]) {
        let (entry, inserted) = self.lookup_or_insert(word);
        if !inserted {
            entry.count += 1;
        }
    }

    /// Sum of all counts.
    fn total(&self) -> u64 {
        self.entries().iter().map(|e| u64::from(e.count)).sum()
    }

    /// Fold `other` into `self`: shared words sum their counts, new words are
    /// appended in `other`'s insertion order.
    fn merge<T: WordCounts + ?Sized>(&mut self, other: &T) {
        for theirs in other.entries() {
            let (ours, inserted) = self.lookup_or_insert(&theirs.word);
            if inserted {
                ours.count = theirs.count;
            } else {
                ours.count += theirs.count;
            }
        }
    }
}

/// Insertion-ordered frequency table with a hash index over the entries.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<WordFreq>,
    index: AHashMap<Box<[u8]>, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WordCounts for FrequencyTable {
    fn lookup_or_insert(&mut self, word: &[u8]) -> (&mut WordFreq, bool) {
        if let Some(&slot) = self.index.get(word) {
            return (&mut self.entries[slot], false);
        }

        let slot = self.entries.len();
        self.entries.push(WordFreq::new(word));
        self.index.insert(word.into(), slot);
        (&mut self.entries[slot], true)
    }

    fn count(&self, word: &[u8]) -> Option<u32> {
        self.index.get(word).map(|&slot| self.entries[slot].count)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries(&self) -> &[WordFreq] {
        &self.entries
    }
}
