//! User directory
//!
//! Registered users live in their own flat file, one `id name credential`
//! line per user, read with the same scan contract as the ledger. The
//! directory resolves names to identities for login and for ownership
//! transfer, and registers new users with monotonically increasing ids.

use crate::core::validate;
use crate::types::{LedgerError, User, UserId};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Number of fields in one user line
const FIELD_COUNT: usize = 3;

#[derive(Debug, Deserialize, Serialize)]
struct RawUser {
    id: UserId,
    name: String,
    credential: String,
}

/// File-backed directory of registered users
#[derive(Debug, Clone)]
pub struct UserDirectory {
    path: PathBuf,
}

impl UserDirectory {
    /// Open a directory at `path`, creating an empty file if none exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LedgerError::Io {
                message: format!("cannot open user file '{}': {}", path.display(), e),
            })?;
        Ok(Self { path })
    }

    /// Path of the backing user file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a name to a registered user
    pub fn find_by_name(&self, name: &str) -> Result<Option<User>, LedgerError> {
        Ok(self.read_all()?.into_iter().find(|u| u.name == name))
    }

    /// Log a user in by exact credential comparison
    ///
    /// # Errors
    ///
    /// [`LedgerError::UserNotFound`] when the name does not resolve and
    /// [`LedgerError::InvalidCredentials`] on a mismatch; both are
    /// recoverable, the caller reprompts.
    pub fn authenticate(&self, name: &str, credential: &str) -> Result<User, LedgerError> {
        let user = self
            .find_by_name(name)?
            .ok_or_else(|| LedgerError::user_not_found(name))?;
        if user.credential != credential {
            return Err(LedgerError::InvalidCredentials {
                name: name.to_string(),
            });
        }
        Ok(user)
    }

    /// Register a new user
    ///
    /// Names are unique and immutable; the new id is one past the highest id
    /// on file.
    pub fn register(&self, name: &str, credential: &str) -> Result<User, LedgerError> {
        validate::user_name(name)?;
        if credential.is_empty() || credential.chars().any(|c| c.is_whitespace()) {
            return Err(LedgerError::DelimiterInField {
                field: "credential",
                value: credential.to_string(),
            });
        }

        let users = self.read_all()?;
        if users.iter().any(|u| u.name == name) {
            return Err(LedgerError::DuplicateUser {
                name: name.to_string(),
            });
        }

        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            name: name.to_string(),
            credential: credential.to_string(),
        };
        self.append(&user)?;
        Ok(user)
    }

    fn append(&self, user: &User) -> Result<(), LedgerError> {
        let mut writer = WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_writer(Vec::new());
        writer.serialize(RawUser {
            id: user.id,
            name: user.name.clone(),
            credential: user.credential.clone(),
        })?;
        let line = writer.into_inner().map_err(|e| LedgerError::Io {
            message: e.to_string(),
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&line)?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<User>, LedgerError> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LedgerError::FileNotFound {
                path: self.path.display().to_string(),
            },
            _ => LedgerError::Io {
                message: format!("failed to open '{}': {}", self.path.display(), e),
            },
        })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut users = Vec::new();
        let mut fields = StringRecord::new();
        loop {
            let line = reader.position().line();
            if !reader.read_record(&mut fields)? {
                break;
            }
            if fields.len() != FIELD_COUNT {
                return Err(LedgerError::malformed(
                    Some(line),
                    format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
                ));
            }
            let raw: RawUser = fields
                .deserialize(None)
                .map_err(|e| LedgerError::malformed(Some(line), e.to_string()))?;
            users.push(User {
                id: raw.id,
                name: raw.name,
                credential: raw.credential,
            });
        }
        Ok(users)
    }
}
