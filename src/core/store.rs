//! Record store: the owner of the on-disk ledger file
//!
//! All account state lives in one flat text file, one encoded record per
//! line, with no header or index. Reads are streaming scans; mutation never
//! patches bytes in place. Patching variable-length text lines in place is
//! unsafe (a shorter replacement leaves stale bytes, a longer one overwrites
//! the next record), so every update and delete goes through the selective
//! rewrite in [`RecordStore::replace_where`]:
//!
//! 1. stream the current file;
//! 2. write every record to a freshly created staging file, applying the
//!    caller's transform to records matching the predicate;
//! 3. swap the staging file into the store's path (remove original, rename
//!    staging over it).
//!
//! Any failure before step 3 discards the staging file and leaves the store
//! exactly as it was. The window between remove and rename in step 3 is the
//! one non-recoverable gap; an interruption there leaves the store missing.

use crate::io::{codec, LedgerScanner};
use crate::types::{LedgerError, Record, RecordId};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File-backed store of account records
///
/// The store holds only the path; every operation opens the file afresh,
/// which keeps scans restartable and the store trivially cheap to clone
/// around a single session. The design assumes one interactive session owns
/// the file for its lifetime (no cross-process locking).
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Open a store at `path`, creating an empty ledger if none exists
    ///
    /// # Errors
    ///
    /// [`LedgerError::Io`] if the file cannot be created or opened; callers
    /// treat this as fatal at startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LedgerError::Io {
                message: format!("cannot open ledger '{}': {}", path.display(), e),
            })?;
        Ok(Self { path })
    }

    /// Path of the backing ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream all records in file order
    ///
    /// Decoding is lazy; the iterator yields a [`LedgerError::Malformed`] for
    /// a corrupt line rather than stopping silently.
    pub fn scan(&self) -> Result<LedgerScanner, LedgerError> {
        LedgerScanner::open(&self.path)
    }

    /// First record satisfying `predicate`, in file order
    pub fn find_one<P>(&self, mut predicate: P) -> Result<Option<Record>, LedgerError>
    where
        P: FnMut(&Record) -> bool,
    {
        for item in self.scan()? {
            let record = item?;
            if predicate(&record) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// All records satisfying `predicate`, file order preserved
    pub fn find_all<P>(&self, mut predicate: P) -> Result<Vec<Record>, LedgerError>
    where
        P: FnMut(&Record) -> bool,
    {
        let mut matches = Vec::new();
        for item in self.scan()? {
            let record = item?;
            if predicate(&record) {
                matches.push(record);
            }
        }
        Ok(matches)
    }

    /// Append one encoded record at the end of the file
    ///
    /// Used only for creation; existing records are never patched in place.
    /// The record is encoded (and thereby validated) before the file is
    /// touched, so an encode failure leaves the ledger unchanged.
    pub fn append(&self, record: &Record) -> Result<(), LedgerError> {
        let line = codec::encode(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Next sequential record id: one past the highest id in the file
    pub fn next_record_id(&self) -> Result<RecordId, LedgerError> {
        let mut max = 0;
        for item in self.scan()? {
            max = max.max(item?.id);
        }
        Ok(max + 1)
    }

    /// Selective rewrite: the general-purpose update/delete primitive
    ///
    /// Streams the existing file into a staging file, copying every record
    /// unchanged except those matching `predicate`, which are passed through
    /// `transform`: `Some(new)` replaces the record, `None` deletes it. After
    /// a clean pass the staging file is swapped into the store's path.
    ///
    /// Output order equals input order; deletions remove their slot without
    /// renumbering (`id` is stable, not positional). A predicate matching
    /// zero records still performs the full copy and returns 0 — callers use
    /// that to detect "not found" and decide how to react.
    ///
    /// # Errors
    ///
    /// Any I/O error, malformed stored line, or encode failure raised before
    /// the swap discards the staging file and returns with the original file
    /// untouched.
    pub fn replace_where<P, T>(
        &self,
        mut predicate: P,
        mut transform: T,
    ) -> Result<usize, LedgerError>
    where
        P: FnMut(&Record) -> bool,
        T: FnMut(Record) -> Option<Record>,
    {
        let staging = self.staging_path();
        let matched = match self.write_staging(&staging, &mut predicate, &mut transform) {
            Ok(matched) => matched,
            Err(e) => {
                let _ = fs::remove_file(&staging);
                return Err(e);
            }
        };

        // The swap. An interruption between these two calls is the accepted
        // non-recoverable window.
        fs::remove_file(&self.path)?;
        fs::rename(&staging, &self.path)?;
        Ok(matched)
    }

    fn write_staging<P, T>(
        &self,
        staging: &Path,
        predicate: &mut P,
        transform: &mut T,
    ) -> Result<usize, LedgerError>
    where
        P: FnMut(&Record) -> bool,
        T: FnMut(Record) -> Option<Record>,
    {
        let scanner = self.scan()?;
        let mut writer = BufWriter::new(File::create(staging)?);
        let mut matched = 0;

        for item in scanner {
            let record = item?;
            let output = if predicate(&record) {
                matched += 1;
                transform(record)
            } else {
                Some(record)
            };
            if let Some(record) = output {
                writeln!(writer, "{}", codec::encode(&record)?)?;
            }
        }

        writer.flush()?;
        Ok(matched)
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }
}
