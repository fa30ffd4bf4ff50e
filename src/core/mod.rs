//! Core domain logic: storage, validation, interest, users, and the service
//! facade tying them together.

pub mod directory;
pub mod interest;
pub mod notify;
pub mod service;
pub mod store;
pub mod validate;

pub use directory::UserDirectory;
pub use interest::{Interest, Schedule};
pub use notify::{Notifier, NoopNotifier, OutboxNotifier};
pub use service::{AccountService, NewAccount, TransactionKind};
pub use store::RecordStore;
