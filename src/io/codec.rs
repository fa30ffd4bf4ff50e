//! Record codec: one account record to/from one ledger line
//!
//! The wire format is a fixed sequence of nine space-delimited fields:
//!
//! ```text
//! id owner_id owner_name account_number mm/dd/yyyy country phone balance account_type
//! ```
//!
//! with the balance rendered to 2 decimal places. [`decode`] is the exact
//! left inverse of [`encode`] for every valid record. A line with the wrong
//! field count, or non-numeric text in a numeric field, produces
//! [`LedgerError::Malformed`] so the store can report a corrupt file instead
//! of crashing. Text fields containing the delimiter are rejected at encode
//! time, here, not at call sites.
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{AccountType, Date, LedgerError, Record};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of fields in one encoded record
pub const FIELD_COUNT: usize = 9;

/// Wire delimiter between fields
const DELIMITER: u8 = b' ';

/// Raw wire shape of one record, before domain conversion
///
/// Dates and balances stay as strings here; converting them (and attaching
/// line context to failures) is this module's job, mirroring how numeric ids
/// are left to serde.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
struct RawRecord {
    id: u32,
    owner_id: u32,
    owner_name: String,
    account_number: u32,
    deposit_date: String,
    country: String,
    phone: String,
    balance: String,
    account_type: String,
}

/// Encode a record as a single ledger line (no trailing newline)
///
/// # Errors
///
/// - [`LedgerError::InvalidAccountType`] for a legacy/unknown type: unknown
///   values are rejected at write time, never silently persisted.
/// - [`LedgerError::DelimiterInField`] when a text field contains whitespace,
///   which would corrupt the field grammar.
pub fn encode(record: &Record) -> Result<String, LedgerError> {
    if let AccountType::Legacy(token) = &record.account_type {
        return Err(LedgerError::InvalidAccountType {
            value: token.clone(),
        });
    }

    ensure_no_delimiter("owner_name", &record.owner_name)?;
    ensure_no_delimiter("country", &record.country)?;
    ensure_no_delimiter("phone", &record.phone)?;

    let raw = RawRecord {
        id: record.id,
        owner_id: record.owner_id,
        owner_name: record.owner_name.clone(),
        account_number: record.account_number,
        deposit_date: record.deposit_date.to_string(),
        country: record.country.clone(),
        phone: record.phone.clone(),
        balance: format!("{:.2}", record.balance),
        account_type: record.account_type.as_wire().to_string(),
    };

    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(Vec::new());
    writer.serialize(&raw)?;
    let bytes = writer.into_inner().map_err(|e| LedgerError::Io {
        message: e.to_string(),
    })?;

    let mut line = String::from_utf8(bytes).map_err(|e| LedgerError::Io {
        message: e.to_string(),
    })?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

/// Decode a single ledger line into a record
pub fn decode(line: &str) -> Result<Record, LedgerError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut fields = StringRecord::new();
    if !reader.read_record(&mut fields)? {
        return Err(LedgerError::malformed(None, "empty line"));
    }
    decode_fields(&fields, None)
}

/// Convert an already-split field row into a record
///
/// Shared by [`decode`] and the streaming scanner; `line` is attached to any
/// failure for diagnostics.
pub(crate) fn decode_fields(
    fields: &StringRecord,
    line: Option<u64>,
) -> Result<Record, LedgerError> {
    if fields.len() != FIELD_COUNT {
        return Err(LedgerError::malformed(
            line,
            format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        ));
    }

    let raw: RawRecord = fields
        .deserialize(None)
        .map_err(|e| LedgerError::malformed(line, e.to_string()))?;

    let deposit_date = raw
        .deposit_date
        .parse::<Date>()
        .map_err(|e| at_line(e, line))?;

    let balance = Decimal::from_str(&raw.balance).map_err(|_| {
        LedgerError::malformed(line, format!("invalid balance '{}'", raw.balance))
    })?;

    Ok(Record {
        id: raw.id,
        owner_id: raw.owner_id,
        owner_name: raw.owner_name,
        account_number: raw.account_number,
        deposit_date,
        country: raw.country,
        phone: raw.phone,
        balance,
        account_type: AccountType::from_wire(&raw.account_type),
    })
}

fn ensure_no_delimiter(field: &'static str, value: &str) -> Result<(), LedgerError> {
    if value.chars().any(|c| c.is_whitespace()) {
        return Err(LedgerError::DelimiterInField {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn at_line(error: LedgerError, line: Option<u64>) -> LedgerError {
    match error {
        LedgerError::Malformed { message, .. } => LedgerError::Malformed { line, message },
        other => other,
    }
}
