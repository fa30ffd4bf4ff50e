//! Types module
//!
//! Core data types shared across the ledger manager: the account record and
//! its value types, the user identity, and the error taxonomy.

pub mod error;
pub mod record;
pub mod user;

pub use error::LedgerError;
pub use record::{AccountNumber, AccountType, Date, Record, RecordId, UserId};
pub use user::User;
