//! Interactive terminal session
//!
//! One authenticated user drives the account service through a numbered menu.
//! Input and output are generic so a test can script a whole session through
//! in-memory buffers. Recoverable errors are printed and followed by a
//! retry/menu/exit prompt; fatal errors propagate out of [`Menu::run`] and end
//! the session.

use crate::core::interest::Schedule;
use crate::core::{AccountService, NewAccount, TransactionKind, UserDirectory};
use crate::types::{AccountType, Date, LedgerError, Record, User};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

/// Where control goes after an operation finishes or fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the same operation again
    Retry,
    /// Return to the main menu
    MainMenu,
    /// End the session
    Exit,
}

/// The interactive menu loop
pub struct Menu<'a, R, W> {
    input: R,
    output: W,
    service: &'a AccountService,
    directory: &'a UserDirectory,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(
        service: &'a AccountService,
        directory: &'a UserDirectory,
        input: R,
        output: W,
    ) -> Self {
        Self {
            input,
            output,
            service,
            directory,
        }
    }

    /// Run the session to completion
    ///
    /// Returns `Ok(())` on a voluntary exit. Fatal errors (unreadable files,
    /// corrupt records, closed input) are returned to the caller.
    pub fn run(&mut self) -> Result<(), LedgerError> {
        writeln!(self.output, "=== Bank Ledger Manager ===")?;
        let Some(user) = self.authenticate()? else {
            writeln!(self.output, "Goodbye.")?;
            return Ok(());
        };
        writeln!(self.output, "Welcome, {}.", user.name)?;
        self.session(&user)?;
        writeln!(self.output, "Goodbye.")?;
        Ok(())
    }

    /// Login/register loop; `None` means the user chose to leave
    fn authenticate(&mut self) -> Result<Option<User>, LedgerError> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "[1] Login")?;
            writeln!(self.output, "[2] Register")?;
            writeln!(self.output, "[3] Exit")?;
            let choice = self.prompt("> ")?;

            let attempt = match choice.trim() {
                "1" => {
                    let name = self.prompt("Name: ")?;
                    let credential = self.prompt("Password: ")?;
                    self.directory.authenticate(name.trim(), credential.trim())
                }
                "2" => {
                    let name = self.prompt("Name: ")?;
                    let credential = self.prompt("Password: ")?;
                    self.directory.register(name.trim(), credential.trim())
                }
                "3" => return Ok(None),
                other => {
                    writeln!(self.output, "Unrecognized option '{}'.", other.trim())?;
                    continue;
                }
            };

            match attempt {
                Ok(user) => return Ok(Some(user)),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    writeln!(self.output, "Error: {}", e)?;
                    match self.stay_or_return()? {
                        Flow::Exit => return Ok(None),
                        Flow::Retry | Flow::MainMenu => continue,
                    }
                }
            }
        }
    }

    fn session(&mut self, user: &User) -> Result<(), LedgerError> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "[1] Create a new account")?;
            writeln!(self.output, "[2] Update account information")?;
            writeln!(self.output, "[3] Check account details")?;
            writeln!(self.output, "[4] List owned accounts")?;
            writeln!(self.output, "[5] Make a transaction")?;
            writeln!(self.output, "[6] Remove an account")?;
            writeln!(self.output, "[7] Transfer ownership")?;
            writeln!(self.output, "[8] Exit")?;
            let choice = self.prompt("> ")?;

            let flow = match choice.trim() {
                "1" => self.run_operation(user, Self::create_account)?,
                "2" => self.run_operation(user, Self::update_info)?,
                "3" => self.run_operation(user, Self::account_details)?,
                "4" => self.run_operation(user, Self::list_accounts)?,
                "5" => self.run_operation(user, Self::transact)?,
                "6" => self.run_operation(user, Self::remove_account)?,
                "7" => self.run_operation(user, Self::transfer_ownership)?,
                "8" => Flow::Exit,
                other => {
                    writeln!(self.output, "Unrecognized option '{}'.", other.trim())?;
                    Flow::MainMenu
                }
            };

            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Run one operation with the retry/menu/exit prompt around it
    fn run_operation(
        &mut self,
        user: &User,
        operation: fn(&mut Self, &User) -> Result<(), LedgerError>,
    ) -> Result<Flow, LedgerError> {
        loop {
            match operation(self, user) {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => writeln!(self.output, "Error: {}", e)?,
            }
            match self.stay_or_return()? {
                Flow::Retry => continue,
                flow => return Ok(flow),
            }
        }
    }

    fn create_account(&mut self, user: &User) -> Result<(), LedgerError> {
        let account_number = self.prompt_u32("Account number: ")?;
        let deposit_date = self.prompt_date("Deposit date (mm/dd/yyyy): ")?;
        let country = self.prompt("Country: ")?.trim().to_string();
        let phone = self.prompt("Phone: ")?.trim().to_string();
        let balance = self.prompt_amount("Initial deposit: ")?;
        let account_type = AccountType::from_wire(
            self.prompt("Type (saving/current/fixed01/fixed02/fixed03): ")?
                .trim(),
        );

        let record = self.service.create_account(
            user,
            NewAccount {
                account_number,
                deposit_date,
                country,
                phone,
                balance,
                account_type,
            },
        )?;
        writeln!(self.output, "Account {} created.", record.account_number)?;
        self.print_record(&record)
    }

    fn update_info(&mut self, user: &User) -> Result<(), LedgerError> {
        let account_number = self.prompt_u32("Account number: ")?;
        let country = self.prompt("New country: ")?.trim().to_string();
        let phone = self.prompt("New phone: ")?.trim().to_string();

        let record = self
            .service
            .update_info(user, account_number, &country, &phone)?;
        writeln!(self.output, "Account {} updated.", record.account_number)?;
        self.print_record(&record)
    }

    fn account_details(&mut self, user: &User) -> Result<(), LedgerError> {
        let account_number = self.prompt_u32("Account number: ")?;
        let (record, interest) = self.service.account_details(user, account_number)?;

        self.print_record(&record)?;
        match interest.schedule {
            Schedule::Monthly { day } => writeln!(
                self.output,
                "Interest: {:.2} on day {} of every month",
                interest.amount, day
            )?,
            Schedule::AtMaturity { date } => writeln!(
                self.output,
                "Interest: {:.2} at maturity on {}",
                interest.amount, date
            )?,
            Schedule::None => writeln!(self.output, "This account earns no interest.")?,
        }
        Ok(())
    }

    fn list_accounts(&mut self, user: &User) -> Result<(), LedgerError> {
        let records = self.service.list_accounts(user)?;
        if records.is_empty() {
            writeln!(self.output, "You own no accounts.")?;
            return Ok(());
        }
        writeln!(self.output, "You own {} account(s):", records.len())?;
        for record in &records {
            self.print_record(record)?;
        }
        Ok(())
    }

    fn transact(&mut self, user: &User) -> Result<(), LedgerError> {
        let account_number = self.prompt_u32("Account number: ")?;
        let kind = loop {
            let choice = self.prompt("[1] Deposit  [2] Withdraw: ")?;
            match choice.trim() {
                "1" => break TransactionKind::Deposit,
                "2" => break TransactionKind::Withdraw,
                _ => writeln!(self.output, "Enter 1 or 2.")?,
            }
        };
        let amount = self.prompt_amount("Amount: ")?;
        let date = self.prompt_date("Date (mm/dd/yyyy): ")?;

        let record = self
            .service
            .transact(user, account_number, kind, amount, date)?;
        writeln!(
            self.output,
            "Done. New balance of account {}: {:.2}",
            record.account_number, record.balance
        )?;
        Ok(())
    }

    fn remove_account(&mut self, user: &User) -> Result<(), LedgerError> {
        let account_number = self.prompt_u32("Account number: ")?;
        self.service.remove_account(user, account_number)?;
        writeln!(self.output, "Account {} removed.", account_number)?;
        Ok(())
    }

    fn transfer_ownership(&mut self, user: &User) -> Result<(), LedgerError> {
        let account_number = self.prompt_u32("Account number: ")?;
        let new_owner = self.prompt("Transfer to user: ")?.trim().to_string();

        let record = self
            .service
            .transfer_ownership(user, account_number, &new_owner)?;
        writeln!(
            self.output,
            "Account {} transferred to {}.",
            record.account_number, record.owner_name
        )?;
        Ok(())
    }

    /// The universal post-operation prompt
    fn stay_or_return(&mut self) -> Result<Flow, LedgerError> {
        loop {
            let choice = self.prompt("[0] Try again  [1] Main menu  [2] Exit: ")?;
            match choice.trim() {
                "0" => return Ok(Flow::Retry),
                "1" => return Ok(Flow::MainMenu),
                "2" => return Ok(Flow::Exit),
                _ => writeln!(self.output, "Enter 0, 1, or 2.")?,
            }
        }
    }

    fn print_record(&mut self, record: &Record) -> Result<(), LedgerError> {
        writeln!(
            self.output,
            "  #{} account {} | {} | deposited {} | {} | {} | balance {:.2}",
            record.id,
            record.account_number,
            record.account_type,
            record.deposit_date,
            record.country,
            record.phone,
            record.balance
        )?;
        Ok(())
    }

    /// Read one line, reprompting never; EOF is a fatal condition
    fn prompt(&mut self, message: &str) -> Result<String, LedgerError> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(LedgerError::Io {
                message: "input stream closed".to_string(),
            });
        }
        Ok(line)
    }

    fn prompt_u32(&mut self, message: &str) -> Result<u32, LedgerError> {
        loop {
            let line = self.prompt(message)?;
            match line.trim().parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Enter a whole number.")?,
            }
        }
    }

    fn prompt_amount(&mut self, message: &str) -> Result<Decimal, LedgerError> {
        loop {
            let line = self.prompt(message)?;
            match line.trim().parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Enter an amount like 500.00.")?,
            }
        }
    }

    fn prompt_date(&mut self, message: &str) -> Result<Date, LedgerError> {
        loop {
            let line = self.prompt(message)?;
            match line.trim().parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Enter a date as mm/dd/yyyy.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NoopNotifier, RecordStore};
    use std::io::Cursor;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        service: AccountService,
        directory: UserDirectory,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = RecordStore::open(dir.path().join("records.txt")).unwrap();
        let directory = UserDirectory::open(dir.path().join("users.txt")).unwrap();
        let service =
            AccountService::new(store, directory.clone(), Box::new(NoopNotifier));
        Fixture {
            _dir: dir,
            service,
            directory,
        }
    }

    fn run_session(fx: &Fixture, script: &str) -> String {
        let mut output = Vec::new();
        let mut menu = Menu::new(
            &fx.service,
            &fx.directory,
            Cursor::new(script.to_string()),
            &mut output,
        );
        menu.run().expect("session should end voluntarily");
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn exit_from_the_login_menu() {
        let fx = fixture();
        let transcript = run_session(&fx, "3\n");
        assert!(transcript.contains("Goodbye."));
    }

    #[test]
    fn register_create_and_list() {
        let fx = fixture();
        let script = "2\nalice\nhunter2\n\
                      1\n100\n01/15/2024\nportugal\n123456789\n500.00\nsaving\n1\n\
                      4\n1\n\
                      8\n";
        let transcript = run_session(&fx, script);

        assert!(transcript.contains("Welcome, alice."));
        assert!(transcript.contains("Account 100 created."));
        assert!(transcript.contains("You own 1 account(s):"));
        assert!(transcript.contains("balance 500.00"));
    }

    #[test]
    fn failed_login_reprompts_and_then_succeeds() {
        let fx = fixture();
        fx.directory.register("alice", "hunter2").unwrap();

        let script = "1\nalice\nwrong\n0\n\
                      1\nalice\nhunter2\n\
                      8\n";
        let transcript = run_session(&fx, script);

        assert!(transcript.contains("Error: invalid credentials for user 'alice'"));
        assert!(transcript.contains("Welcome, alice."));
    }

    #[test]
    fn rejected_withdrawal_reports_and_retries() {
        let fx = fixture();
        let alice = fx.directory.register("alice", "hunter2").unwrap();
        fx.service
            .create_account(
                &alice,
                NewAccount {
                    account_number: 100,
                    deposit_date: Date::new(1, 15, 2024),
                    country: "portugal".to_string(),
                    phone: "123456789".to_string(),
                    balance: Decimal::new(50000, 2),
                    account_type: AccountType::Savings,
                },
            )
            .unwrap();

        // Withdraw 600 (rejected), retry with 200 (new balance 300), exit.
        let script = "1\nalice\nhunter2\n\
                      5\n100\n2\n600.00\n02/01/2024\n0\n\
                      100\n2\n200.00\n02/01/2024\n2\n";
        let transcript = run_session(&fx, script);

        assert!(transcript.contains("Error: insufficient funds: balance 500.00, requested 600.00"));
        assert!(transcript.contains("New balance of account 100: 300.00"));
    }

    #[test]
    fn details_describe_the_interest_schedule() {
        let fx = fixture();
        let alice = fx.directory.register("alice", "hunter2").unwrap();
        fx.service
            .create_account(
                &alice,
                NewAccount {
                    account_number: 100,
                    deposit_date: Date::new(3, 9, 2024),
                    country: "portugal".to_string(),
                    phone: "123456789".to_string(),
                    balance: Decimal::new(50000, 2),
                    account_type: AccountType::Savings,
                },
            )
            .unwrap();

        let script = "1\nalice\nhunter2\n3\n100\n1\n8\n";
        let transcript = run_session(&fx, script);

        assert!(transcript.contains("Interest: 2.92 on day 9 of every month"));
    }

    #[test]
    fn garbage_menu_choice_returns_to_the_menu() {
        let fx = fixture();
        let script = "2\nalice\nhunter2\n9\n8\n";
        let transcript = run_session(&fx, script);
        assert!(transcript.contains("Unrecognized option '9'."));
    }

    #[test]
    fn non_numeric_account_number_is_reprompted() {
        let fx = fixture();
        let script = "2\nalice\nhunter2\n3\nabc\n100\n1\n8\n";
        let transcript = run_session(&fx, script);
        assert!(transcript.contains("Enter a whole number."));
        assert!(transcript.contains("Error: account 100 not found for user 'alice'"));
    }

    #[test]
    fn closed_input_is_fatal() {
        let fx = fixture();
        let mut output = Vec::new();
        let mut menu = Menu::new(
            &fx.service,
            &fx.directory,
            Cursor::new(String::new()),
            &mut output,
        );
        let result = menu.run();
        assert!(matches!(result, Err(LedgerError::Io { .. })));
    }
}
