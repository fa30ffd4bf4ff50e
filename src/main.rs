//! Bank Ledger Manager CLI
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --data-dir /var/bank
//! cargo run -- --ledger-file ledger.txt --users-file users.txt
//! ```
//!
//! The program opens (creating if missing) the ledger and user files under
//! the data directory, then runs an interactive login and account-management
//! session on stdin/stdout.
//!
//! # Exit Codes
//!
//! - 0: Session ended voluntarily
//! - 1: Fatal error (unreadable data files, corrupt record, closed input)

use bank_ledger::cli::{self, Menu};
use bank_ledger::core::{AccountService, OutboxNotifier, RecordStore, UserDirectory};
use std::io::{self, BufReader};
use std::process;

fn main() {
    let args = cli::parse_args();

    if let Err(e) = std::fs::create_dir_all(&args.data_dir) {
        eprintln!(
            "Error: cannot create data directory '{}': {}",
            args.data_dir.display(),
            e
        );
        process::exit(1);
    }

    let result = RecordStore::open(args.ledger_path())
        .and_then(|store| {
            let directory = UserDirectory::open(args.users_path())?;
            Ok((store, directory))
        })
        .and_then(|(store, directory)| {
            let notifier = Box::new(OutboxNotifier::new(args.notify_path()));
            let service = AccountService::new(store, directory.clone(), notifier);

            let stdin = BufReader::new(io::stdin());
            let stdout = io::stdout();
            Menu::new(&service, &directory, stdin, stdout).run()
        });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
