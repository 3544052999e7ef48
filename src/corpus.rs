//! Corpus accumulation: turning a directory of labelled documents into the
//! per-class statistics the classifier consumes.
//!
//! # Pipeline
//!
//! ```text
//! list_regular_files(dir) ──▶ DocumentLoader::load(path) ──▶ tokenize ──▶ table.add
//! ```
//!
//! Every token bumps the class word count (repeats included) and every
//! document bumps the document count. A document that cannot be loaded aborts
//! the whole class; nothing is skipped.
//!
//! # Workers
//!
//! With `workers == 1` documents are processed strictly in order. With more
//! workers, documents are loaded and tokenized in parallel into per-document
//! partial tables, and each partial table is merged into the class table
//! under a lock. Counts are identical either way; only the insertion order of
//! the class table may differ.

use crate::error::{NbcError, Result};
use crate::frequency::{FrequencyTable, WordCounts};
use crate::tokenizer::tokenize;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Source of document bytes.
pub trait DocumentLoader: Sync {
    /// Read the whole document at `path`.
    fn load(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Loads documents from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl DocumentLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| NbcError::file(path, e))
    }
}

/// List the regular files directly inside `dir`, sorted by path.
///
/// Subdirectories are not descended into. A symlink is listed only if it
/// resolves to a regular file; dangling links and links to directories are
/// skipped.
pub fn list_regular_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| NbcError::directory(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| NbcError::directory(dir, e))?;
        let path = entry.path();
        let regular = match fs::symlink_metadata(&path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                fs::metadata(&path).map(|target| target.is_file()).unwrap_or(false)
            }
            Ok(meta) => meta.file_type().is_file(),
            // Entry vanished between readdir and lstat.
            Err(_) => false,
        };
        if regular {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Training statistics for one class.
///
/// `word_count` is the number of tokens fed through accumulation, tracked
/// separately rather than recomputed from the table.
#[derive(Debug, Clone, Default)]
pub struct ClassStats {
    pub table: FrequencyTable,
    pub word_count: u64,
    pub doc_count: u64,
}

impl ClassStats {
    pub fn new() -> Self {
        Self {
            table: FrequencyTable::new(),
            word_count: 0,
            doc_count: 0,
        }
    }

    /// Fold one document into the statistics.
    pub fn add_document(&mut self, doc: &[u8]) {
        for token in tokenize(doc) {
            debug_assert!(!token.is_empty());
            self.table.add(token.as_bytes());
            self.word_count += 1;
        }
        self.doc_count += 1;
    }

    /// Fold a partial result (e.g. a single tokenized document) into `self`.
    pub fn merge(&mut self, partial: &ClassStats) {
        self.table.merge(&partial.table);
        self.word_count += partial.word_count;
        self.doc_count += partial.doc_count;
    }
}

/// Drives document loading and tokenization for one class.
#[derive(Debug, Clone, Copy)]
pub struct Accumulator {
    workers: usize,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

impl Accumulator {
    /// `workers` below 1 is treated as 1.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Accumulate every document in `paths` into `stats`.
    ///
    /// Returns the running `(word_count, doc_count)` of the class after the
    /// call. On error `stats` may hold a partial accumulation and must be
    /// discarded.
    pub fn accumulate<I, L>(&self, paths: I, loader: &L, stats: &mut ClassStats) -> Result<(u64, u64)>
    where
        I: IntoIterator<Item = PathBuf>,
        L: DocumentLoader + ?Sized,
    {
        if self.workers == 1 {
            for path in paths {
                debug!(file = %path.display(), "accumulating");
                let doc = loader.load(&path)?;
                stats.add_document(&doc);
            }
        } else {
            self.accumulate_parallel(paths.into_iter().collect(), loader, stats)?;
        }

        Ok((stats.word_count, stats.doc_count))
    }

    fn accumulate_parallel<L>(&self, paths: Vec<PathBuf>, loader: &L, stats: &mut ClassStats) -> Result<()>
    where
        L: DocumentLoader + ?Sized,
    {
        let queue = Mutex::new(paths.into_iter());
        let shared = Mutex::new(std::mem::take(stats));
        let failure: Mutex<Option<NbcError>> = Mutex::new(None);

        let (next_path, class_stats, first_error) = (&queue, &shared, &failure);
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..self.workers)
                .map(|_| {
                    scope.spawn(move || loop {
                        if first_error.lock().is_some() {
                            break;
                        }
                        let Some(path) = next_path.lock().next() else {
                            break;
                        };

                        debug!(file = %path.display(), "accumulating");
                        let doc = match loader.load(&path) {
                            Ok(doc) => doc,
                            Err(e) => {
                                first_error.lock().get_or_insert(e);
                                break;
                            }
                        };

                        let mut partial = ClassStats::new();
                        partial.add_document(&doc);
                        class_stats.lock().merge(&partial);
                    })
                })
                .collect();

            for handle in handles {
                if let Err(panic) = handle.join() {
                    let msg = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    first_error.lock().get_or_insert(NbcError::WorkerPanic(msg));
                }
            }
        });

        *stats = shared.into_inner();
        match failure.into_inner() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// List `dir` and accumulate every regular file in it into fresh statistics.
pub fn train_class<L>(name: &str, dir: &Path, accumulator: &Accumulator, loader: &L) -> Result<ClassStats>
where
    L: DocumentLoader + ?Sized,
{
    let files = list_regular_files(dir)?;
    debug!(class = name, dir = %dir.display(), files = files.len(), "training class");

    let mut stats = ClassStats::new();
    let (word_count, doc_count) = accumulator.accumulate(files, loader, &mut stats)?;
    if stats.table.is_empty() {
        warn!(class = name, docs = doc_count, "class corpus contains no tokens");
    }
    info!(
        class = name,
        docs = doc_count,
        words = word_count,
        counted = stats.table.total(),
        distinct = stats.table.len(),
        "class trained"
    );
    Ok(stats)
}

/// Train the ham and spam classes concurrently. The two classes share no
/// state, so each runs on its own thread.
pub fn train_pair<L>(
    ham_dir: &Path,
    spam_dir: &Path,
    accumulator: &Accumulator,
    loader: &L,
) -> Result<(ClassStats, ClassStats)>
where
    L: DocumentLoader + ?Sized,
{
    let (ham, spam) = std::thread::scope(|scope| {
        let spam = scope.spawn(|| train_class("spam", spam_dir, accumulator, loader));
        let ham = train_class("ham", ham_dir, accumulator, loader);
        let spam = spam
            .join()
            .unwrap_or_else(|_| Err(NbcError::WorkerPanic("spam training thread".to_string())));
        (ham, spam)
    });

    Ok((ham?, spam?))
}
