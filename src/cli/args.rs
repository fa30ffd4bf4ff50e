use clap::Parser;
use std::path::PathBuf;

/// Manage bank accounts in a flat-file ledger
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Manage bank accounts in a flat-file ledger", long_about = None)]
pub struct CliArgs {
    /// Directory holding the ledger, user, and notification files
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = "./data",
        help = "Directory holding the data files"
    )]
    pub data_dir: PathBuf,

    /// Override the ledger file path
    #[arg(
        long = "ledger-file",
        value_name = "FILE",
        help = "Ledger file (default: <data-dir>/records.txt)"
    )]
    pub ledger_file: Option<PathBuf>,

    /// Override the user directory file path
    #[arg(
        long = "users-file",
        value_name = "FILE",
        help = "User directory file (default: <data-dir>/users.txt)"
    )]
    pub users_file: Option<PathBuf>,

    /// Override the transfer notification outbox path
    #[arg(
        long = "notify-file",
        value_name = "FILE",
        help = "Notification outbox file (default: <data-dir>/notifications.txt)"
    )]
    pub notify_file: Option<PathBuf>,
}

impl CliArgs {
    /// Resolved path of the ledger file
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("records.txt"))
    }

    /// Resolved path of the user directory file
    pub fn users_path(&self) -> PathBuf {
        self.users_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("users.txt"))
    }

    /// Resolved path of the notification outbox
    pub fn notify_path(&self) -> PathBuf {
        self.notify_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("notifications.txt"))
    }
}
