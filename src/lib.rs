//! Bank Ledger Manager
//!
//! # Overview
//!
//! A single-user, terminal-driven manager for bank account records stored in
//! a flat text file, one space-delimited record per line. There is no
//! database and no index: reads are streaming scans and every update or
//! delete is a selective rewrite of the whole file through a staging file.
//!
//! # Architecture
//!
//! - [`types`] - Core data types ([`Record`], [`Date`], [`AccountType`],
//!   [`User`]) and the [`LedgerError`] taxonomy
//! - [`io`] - Wire codec and the streaming line scanner
//! - [`core`] - Business logic:
//!   - [`core::store`] - The record store and its selective-rewrite protocol
//!   - [`core::validate`] - Field validation rules
//!   - [`core::interest`] - The per-type interest policy
//!   - [`core::directory`] - The user directory (login and registration)
//!   - [`core::service`] - The account service facade
//!   - [`core::notify`] - Best-effort transfer notifications
//! - [`cli`] - Argument parsing and the interactive menu
//!
//! # Account Types
//!
//! - **saving**: 7% annual interest, accrued monthly on the deposit day
//! - **current**: no interest
//! - **fixed01/02/03**: 1/2/3-year fixed deposits at 4%/5%/8% annual, paid at
//!   maturity; immutable except for ownership transfer
//!
//! Unknown type tokens from older ledgers decode as legacy accounts: readable
//! and transferable, but never written back and earning no interest.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{AccountService, NewAccount, RecordStore, TransactionKind, UserDirectory};
pub use types::{AccountNumber, AccountType, Date, LedgerError, Record, RecordId, User, UserId};
