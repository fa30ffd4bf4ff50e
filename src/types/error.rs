//! Error types for the ledger manager
//!
//! A single enum covers the whole taxonomy the presentation layer needs to
//! dispatch on:
//!
//! - **Fatal**: the ledger or user file cannot be opened, read, or written, or
//!   a stored line fails to decode. These abort the current session with a
//!   diagnostic; a malformed ledger is detected, never repaired automatically.
//! - **Recoverable**: validation failures, not-found lookups, conflicts, and
//!   refused operations on fixed deposits. These are reported back to the
//!   caller, which may reprompt.

use rust_decimal::Decimal;
use thiserror::Error;

use super::record::AccountNumber;

/// Main error type for ledger operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Backing file missing and could not be created
    #[error("file not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O failure while reading or writing a backing file
    ///
    /// Any I/O error raised before the rewrite swap leaves the prior file
    /// contents intact.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the underlying error
        message: String,
    },

    /// A stored line failed to decode
    ///
    /// Surfaced to the caller as a corrupt-store condition, not swallowed.
    #[error("malformed record{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Malformed {
        /// Line number within the file, when known
        line: Option<u64>,
        /// Description of the decode failure
        message: String,
    },

    /// A text field contains the wire delimiter and cannot be encoded
    #[error("field '{field}' must not contain whitespace: '{value}'")]
    DelimiterInField {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// Date out of range or inconsistent with its month/year
    #[error("invalid date {month:02}/{day:02}/{year:04}")]
    InvalidDate { month: u8, day: u8, year: u16 },

    /// Phone number fails the length or digits-only rule
    #[error("invalid phone number '{phone}'")]
    InvalidPhone { phone: String },

    /// Amount not positive or carrying more than 2 decimal places
    #[error("invalid amount {amount}")]
    InvalidAmount { amount: Decimal },

    /// Account type outside the supported set at write time
    #[error("invalid account type '{value}'")]
    InvalidAccountType { value: String },

    /// Country name empty or not alphabetic
    #[error("invalid country name '{value}'")]
    InvalidCountry { value: String },

    /// User name fails the directory naming rules
    #[error("invalid user name '{value}'")]
    InvalidUserName { value: String },

    /// No record with this account number for this owner
    #[error("account {account_number} not found for user '{owner}'")]
    AccountNotFound {
        owner: String,
        account_number: AccountNumber,
    },

    /// Name does not resolve in the user directory
    #[error("user '{name}' not found")]
    UserNotFound { name: String },

    /// The `(owner, account_number)` pair already exists
    #[error("account {account_number} already exists for user '{owner}'")]
    DuplicateAccount {
        owner: String,
        account_number: AccountNumber,
    },

    /// Registration with a name that is already taken
    #[error("user '{name}' already exists")]
    DuplicateUser { name: String },

    /// Login rejected
    #[error("invalid credentials for user '{name}'")]
    InvalidCredentials { name: String },

    /// Operation refused on a fixed-term deposit
    #[error("account {account_number} is a fixed deposit ({account_type}) and cannot be modified")]
    ImmutableAccount {
        account_number: AccountNumber,
        account_type: String,
    },

    /// Withdrawal would leave the balance negative
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        balance: Decimal,
        requested: Decimal,
    },

    /// Deposit would push the balance past the ceiling
    #[error("balance would exceed the {ceiling} ceiling")]
    BalanceCeiling { ceiling: Decimal },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());
        LedgerError::Malformed {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Whether this error aborts the session rather than reprompting
    ///
    /// File-level failures and corrupt records are fatal; everything else is
    /// reported and retried at the presentation layer's discretion.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LedgerError::FileNotFound { .. }
                | LedgerError::Io { .. }
                | LedgerError::Malformed { .. }
        )
    }

    /// Create a Malformed error
    pub fn malformed(line: Option<u64>, message: impl Into<String>) -> Self {
        LedgerError::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(owner: &str, account_number: AccountNumber) -> Self {
        LedgerError::AccountNotFound {
            owner: owner.to_string(),
            account_number,
        }
    }

    /// Create a UserNotFound error
    pub fn user_not_found(name: &str) -> Self {
        LedgerError::UserNotFound {
            name: name.to_string(),
        }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(owner: &str, account_number: AccountNumber) -> Self {
        LedgerError::DuplicateAccount {
            owner: owner.to_string(),
            account_number,
        }
    }

    /// Create an ImmutableAccount error
    pub fn immutable_account(account_number: AccountNumber, account_type: &str) -> Self {
        LedgerError::ImmutableAccount {
            account_number,
            account_type: account_type.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds { balance, requested }
    }
}
