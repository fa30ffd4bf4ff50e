//! User identity type
//!
//! The core receives a [`User`] by value as an opaque identity; it is owned
//! and produced by the user directory.

use super::record::UserId;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique id, assigned at registration, monotonically increasing
    pub id: UserId,

    /// Unique, immutable login name
    pub name: String,

    /// Stored credential, compared exactly at login
    pub credential: String,
}
