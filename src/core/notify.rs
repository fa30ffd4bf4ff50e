//! Notification seam
//!
//! Ownership transfers emit a best-effort, fire-and-forget message to an
//! out-of-band channel. Delivery failure must never fail the transfer, so
//! the trait returns nothing and implementations swallow their own errors.

use crate::types::{AccountNumber, User};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Out-of-band notification channel
pub trait Notifier {
    /// Announce a completed ownership transfer to the new owner
    fn transfer_completed(&self, from: &User, to: &User, account_number: AccountNumber);
}

/// Notifier that drops every message
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn transfer_completed(&self, _from: &User, _to: &User, _account_number: AccountNumber) {}
}

/// Notifier appending one message line per event to an outbox file
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    path: PathBuf,
}

impl OutboxNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Notifier for OutboxNotifier {
    fn transfer_completed(&self, from: &User, to: &User, account_number: AccountNumber) {
        let _ = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| {
                writeln!(
                    file,
                    "User {} transferred account {} to you ({})",
                    from.name, account_number, to.name
                )
            });
    }
}
