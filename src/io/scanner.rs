//! Streaming ledger reader
//!
//! [`LedgerScanner`] iterates over the records of a ledger file in file
//! order, decoding lazily one line at a time, with O(1) memory per record.
//! Each decode failure carries the line number it occurred on; the scan is
//! restartable by opening a fresh scanner.

use crate::io::codec;
use crate::types::{LedgerError, Record};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// Iterator over the records of a ledger file
pub struct LedgerScanner {
    reader: Reader<File>,
    fields: StringRecord,
}

impl LedgerScanner {
    /// Open a scanner over the ledger at `path`
    ///
    /// # Errors
    ///
    /// [`LedgerError::FileNotFound`] if the file does not exist, otherwise
    /// [`LedgerError::Io`] for any other open failure.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LedgerError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LedgerError::Io {
                message: format!("failed to open '{}': {}", path.display(), e),
            },
        })?;

        // flexible: field-count mismatches are reported by the codec with a
        // line number instead of as an opaque csv error.
        let reader = ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        Ok(Self {
            reader,
            fields: StringRecord::new(),
        })
    }
}

impl Iterator for LedgerScanner {
    type Item = Result<Record, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.reader.position().line();
        match self.reader.read_record(&mut self.fields) {
            Ok(false) => None,
            Ok(true) => Some(codec::decode_fields(&self.fields, Some(line))),
            Err(e) => Some(Err(e.into())),
        }
    }
}
