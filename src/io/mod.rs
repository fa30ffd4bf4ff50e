//! I/O module
//!
//! Wire-format handling for the flat ledger file: the per-line record codec
//! and the streaming scanner built on it.

pub mod codec;
pub mod scanner;

pub use codec::{decode, encode};
pub use scanner::LedgerScanner;
