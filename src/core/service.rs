//! Account service
//!
//! Orchestrates the record store, validation rules, interest policy, user
//! directory, and notifier to implement the seven user-facing operations.
//! Every operation follows the same shape: validate the input, then perform
//! the store operation, then map the outcome. Validation failures never
//! reach the store, and fixed-deposit refusals are decided before any store
//! call is attempted.

use crate::core::directory::UserDirectory;
use crate::core::interest::{self, Interest};
use crate::core::notify::Notifier;
use crate::core::store::RecordStore;
use crate::core::validate;
use crate::types::{AccountNumber, AccountType, Date, LedgerError, Record, User};
use rust_decimal::Decimal;

/// Direction of a balance transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

/// Parsed input for account creation
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub account_number: AccountNumber,
    pub deposit_date: Date,
    pub country: String,
    pub phone: String,
    pub balance: Decimal,
    pub account_type: AccountType,
}

/// The account-management facade driven by the presentation layer
///
/// Holds no session state: the acting [`User`] is threaded through every
/// call explicitly.
pub struct AccountService {
    store: RecordStore,
    directory: UserDirectory,
    notifier: Box<dyn Notifier>,
}

impl AccountService {
    pub fn new(store: RecordStore, directory: UserDirectory, notifier: Box<dyn Notifier>) -> Self {
        Self {
            store,
            directory,
            notifier,
        }
    }

    /// Create a new account for `user`
    ///
    /// # Errors
    ///
    /// Validation errors for any bad field; [`LedgerError::DuplicateAccount`]
    /// if the `(owner, account_number)` pair already exists — the append is
    /// never attempted in that case.
    pub fn create_account(&self, user: &User, new: NewAccount) -> Result<Record, LedgerError> {
        validate::date(&new.deposit_date)?;
        validate::account_type(&new.account_type)?;
        validate::country(&new.country)?;
        validate::phone(&new.phone)?;
        validate::amount(new.balance)?;

        if self
            .store
            .find_one(owned_by(user, new.account_number))?
            .is_some()
        {
            return Err(LedgerError::duplicate_account(
                &user.name,
                new.account_number,
            ));
        }

        let record = Record {
            id: self.store.next_record_id()?,
            owner_id: user.id,
            owner_name: user.name.clone(),
            account_number: new.account_number,
            deposit_date: new.deposit_date,
            country: new.country,
            phone: new.phone,
            balance: new.balance,
            account_type: new.account_type,
        };
        self.store.append(&record)?;
        Ok(record)
    }

    /// All accounts owned by `user`, in file order
    pub fn list_accounts(&self, user: &User) -> Result<Vec<Record>, LedgerError> {
        self.store.find_all(|r| r.owner_name == user.name)
    }

    /// One account plus its computed interest
    pub fn account_details(
        &self,
        user: &User,
        account_number: AccountNumber,
    ) -> Result<(Record, Interest), LedgerError> {
        let record = self.find_owned(user, account_number)?;
        let interest = interest::compute(&record.account_type, record.balance, record.deposit_date);
        Ok((record, interest))
    }

    /// Update the contact fields (country, phone) of an account
    pub fn update_info(
        &self,
        user: &User,
        account_number: AccountNumber,
        country: &str,
        phone: &str,
    ) -> Result<Record, LedgerError> {
        let record = self.find_owned(user, account_number)?;
        refuse_fixed(&record)?;
        validate::country(country)?;
        validate::phone(phone)?;

        let mut updated = record;
        updated.country = country.to_string();
        updated.phone = phone.to_string();

        self.rewrite_owned(user, account_number, updated)
    }

    /// Deposit into or withdraw from an account
    ///
    /// The transaction date is validated but not persisted; the wire format
    /// carries only the opening deposit date.
    pub fn transact(
        &self,
        user: &User,
        account_number: AccountNumber,
        kind: TransactionKind,
        amount: Decimal,
        date: Date,
    ) -> Result<Record, LedgerError> {
        let record = self.find_owned(user, account_number)?;
        refuse_fixed(&record)?;
        validate::amount(amount)?;
        validate::date(&date)?;

        let balance = match kind {
            TransactionKind::Deposit => {
                let new_balance =
                    record
                        .balance
                        .checked_add(amount)
                        .ok_or(LedgerError::BalanceCeiling {
                            ceiling: validate::balance_ceiling(),
                        })?;
                if new_balance > validate::balance_ceiling() {
                    return Err(LedgerError::BalanceCeiling {
                        ceiling: validate::balance_ceiling(),
                    });
                }
                new_balance
            }
            TransactionKind::Withdraw => {
                // Rejected, not clamped: the balance never goes negative.
                if amount > record.balance {
                    return Err(LedgerError::insufficient_funds(record.balance, amount));
                }
                record.balance - amount
            }
        };

        let mut updated = record;
        updated.balance = balance;
        self.rewrite_owned(user, account_number, updated)
    }

    /// Remove an account
    pub fn remove_account(
        &self,
        user: &User,
        account_number: AccountNumber,
    ) -> Result<(), LedgerError> {
        let record = self.find_owned(user, account_number)?;
        refuse_fixed(&record)?;

        let matched = self
            .store
            .replace_where(owned_by(user, account_number), |_| None)?;
        ensure_matched(matched, user, account_number)
    }

    /// Transfer an account to another registered user
    ///
    /// The destination name is resolved in the user directory before the
    /// store is touched; an unknown destination aborts with the ledger
    /// unmodified. After a successful rewrite, one best-effort notification
    /// is emitted; its delivery is not part of the operation's outcome.
    pub fn transfer_ownership(
        &self,
        user: &User,
        account_number: AccountNumber,
        new_owner_name: &str,
    ) -> Result<Record, LedgerError> {
        let record = self.find_owned(user, account_number)?;

        let new_owner = self
            .directory
            .find_by_name(new_owner_name)?
            .ok_or_else(|| LedgerError::user_not_found(new_owner_name))?;

        // The (owner, account_number) pair stays unique: refuse a transfer
        // that would collide in the destination owner's namespace.
        if self
            .store
            .find_one(owned_by(&new_owner, account_number))?
            .is_some()
        {
            return Err(LedgerError::duplicate_account(
                &new_owner.name,
                account_number,
            ));
        }

        let mut updated = record;
        updated.owner_id = new_owner.id;
        updated.owner_name = new_owner.name.clone();
        let updated = self.rewrite_owned(user, account_number, updated)?;

        self.notifier
            .transfer_completed(user, &new_owner, account_number);
        Ok(updated)
    }

    /// Find an account in the caller's namespace or report `NotFound`
    fn find_owned(
        &self,
        user: &User,
        account_number: AccountNumber,
    ) -> Result<Record, LedgerError> {
        self.store
            .find_one(owned_by(user, account_number))?
            .ok_or_else(|| LedgerError::account_not_found(&user.name, account_number))
    }

    /// Replace the caller's record with `updated` via selective rewrite
    fn rewrite_owned(
        &self,
        user: &User,
        account_number: AccountNumber,
        updated: Record,
    ) -> Result<Record, LedgerError> {
        let replacement = updated.clone();
        let matched = self
            .store
            .replace_where(owned_by(user, account_number), move |_| {
                Some(replacement.clone())
            })?;
        ensure_matched(matched, user, account_number)?;
        Ok(updated)
    }
}

/// Predicate selecting the one record in `user`'s namespace
fn owned_by(user: &User, account_number: AccountNumber) -> impl Fn(&Record) -> bool + '_ {
    move |r: &Record| r.owner_name == user.name && r.account_number == account_number
}

fn refuse_fixed(record: &Record) -> Result<(), LedgerError> {
    if record.account_type.is_fixed() {
        return Err(LedgerError::immutable_account(
            record.account_number,
            record.account_type.as_wire(),
        ));
    }
    Ok(())
}

fn ensure_matched(
    matched: usize,
    user: &User,
    account_number: AccountNumber,
) -> Result<(), LedgerError> {
    if matched == 0 {
        return Err(LedgerError::account_not_found(&user.name, account_number));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interest::Schedule;
    use crate::core::notify::NoopNotifier;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Notifier capturing messages for assertions
    struct RecordingNotifier(Rc<RefCell<Vec<String>>>);

    impl Notifier for RecordingNotifier {
        fn transfer_completed(&self, from: &User, to: &User, account_number: AccountNumber) {
            self.0.borrow_mut().push(format!(
                "{} -> {} ({})",
                from.name, to.name, account_number
            ));
        }
    }

    struct Fixture {
        _dir: TempDir,
        service: AccountService,
        store: RecordStore,
        alice: User,
        bob: User,
        notifications: Rc<RefCell<Vec<String>>>,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = RecordStore::open(dir.path().join("records.txt")).unwrap();
        let directory = UserDirectory::open(dir.path().join("users.txt")).unwrap();

        let alice = directory.register("alice", "hunter2").unwrap();
        let bob = directory.register("bob", "swordfish").unwrap();

        let notifications = Rc::new(RefCell::new(Vec::new()));
        let service = AccountService::new(
            store.clone(),
            directory,
            Box::new(RecordingNotifier(notifications.clone())),
        );

        Fixture {
            _dir: dir,
            service,
            store,
            alice,
            bob,
            notifications,
        }
    }

    fn new_account(account_number: AccountNumber, balance_cents: i64) -> NewAccount {
        NewAccount {
            account_number,
            deposit_date: Date::new(1, 15, 2024),
            country: "portugal".to_string(),
            phone: "123456789".to_string(),
            balance: Decimal::new(balance_cents, 2),
            account_type: AccountType::Savings,
        }
    }

    fn ledger_bytes(store: &RecordStore) -> String {
        fs::read_to_string(store.path()).unwrap()
    }

    #[test]
    fn create_assigns_sequential_ids_and_lists_in_file_order() {
        let fx = fixture();

        let first = fx
            .service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();
        let second = fx
            .service
            .create_account(&fx.alice, new_account(200, 10000))
            .unwrap();
        fx.service
            .create_account(&fx.bob, new_account(100, 20000))
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let mine = fx.service.list_accounts(&fx.alice).unwrap();
        assert_eq!(
            mine.iter().map(|r| r.account_number).collect::<Vec<_>>(),
            vec![100, 200]
        );
    }

    #[test]
    fn duplicate_account_number_for_same_owner_is_a_conflict() {
        let fx = fixture();
        fx.service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();
        let before = ledger_bytes(&fx.store);

        let result = fx.service.create_account(&fx.alice, new_account(100, 99900));

        assert!(matches!(result, Err(LedgerError::DuplicateAccount { .. })));
        assert_eq!(ledger_bytes(&fx.store), before);
    }

    #[test]
    fn same_account_number_is_fine_across_owners() {
        let fx = fixture();
        fx.service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();
        assert!(fx
            .service
            .create_account(&fx.bob, new_account(100, 50000))
            .is_ok());
    }

    #[test]
    fn create_rejects_invalid_input_before_touching_the_store() {
        let fx = fixture();
        let before = ledger_bytes(&fx.store);

        let mut bad_phone = new_account(100, 50000);
        bad_phone.phone = "12ab".to_string();
        assert!(matches!(
            fx.service.create_account(&fx.alice, bad_phone),
            Err(LedgerError::InvalidPhone { .. })
        ));

        let mut bad_date = new_account(100, 50000);
        bad_date.deposit_date = Date::new(2, 30, 2024);
        assert!(matches!(
            fx.service.create_account(&fx.alice, bad_date),
            Err(LedgerError::InvalidDate { .. })
        ));

        let mut bad_type = new_account(100, 50000);
        bad_type.account_type = AccountType::Legacy("premium".to_string());
        assert!(matches!(
            fx.service.create_account(&fx.alice, bad_type),
            Err(LedgerError::InvalidAccountType { .. })
        ));

        assert_eq!(ledger_bytes(&fx.store), before);
    }

    #[test]
    fn details_returns_record_with_interest() {
        let fx = fixture();
        fx.service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();

        let (record, interest) = fx.service.account_details(&fx.alice, 100).unwrap();

        assert_eq!(record.balance, Decimal::new(50000, 2));
        assert_eq!(interest.amount, Decimal::new(292, 2)); // 500 * 7% / 12
        assert_eq!(interest.schedule, Schedule::Monthly { day: 15 });
    }

    #[test]
    fn details_of_unknown_account_is_not_found() {
        let fx = fixture();
        assert!(matches!(
            fx.service.account_details(&fx.alice, 999),
            Err(LedgerError::AccountNotFound { .. })
        ));
    }

    #[test]
    fn update_rewrites_contact_fields_only() {
        let fx = fixture();
        fx.service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();

        let updated = fx
            .service
            .update_info(&fx.alice, 100, "france", "987654321")
            .unwrap();

        assert_eq!(updated.country, "france");
        assert_eq!(updated.phone, "987654321");
        assert_eq!(updated.balance, Decimal::new(50000, 2));
        assert_eq!(updated.account_number, 100);

        let (stored, _) = fx.service.account_details(&fx.alice, 100).unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn withdrawal_past_balance_is_rejected_not_clamped() {
        let fx = fixture();
        fx.service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();

        let result = fx.service.transact(
            &fx.alice,
            100,
            TransactionKind::Withdraw,
            Decimal::new(60000, 2),
            Date::new(2, 1, 2024),
        );

        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds(
                Decimal::new(50000, 2),
                Decimal::new(60000, 2)
            ))
        );
        let (record, _) = fx.service.account_details(&fx.alice, 100).unwrap();
        assert_eq!(record.balance, Decimal::new(50000, 2));
    }

    #[test]
    fn withdrawal_within_balance_updates_only_the_balance() {
        let fx = fixture();
        let created = fx
            .service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();

        let updated = fx
            .service
            .transact(
                &fx.alice,
                100,
                TransactionKind::Withdraw,
                Decimal::new(20000, 2),
                Date::new(2, 1, 2024),
            )
            .unwrap();

        assert_eq!(updated.balance, Decimal::new(30000, 2));
        assert_eq!(
            Record {
                balance: created.balance,
                ..updated
            },
            created
        );
    }

    #[test]
    fn deposit_increases_balance() {
        let fx = fixture();
        fx.service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();

        let updated = fx
            .service
            .transact(
                &fx.alice,
                100,
                TransactionKind::Deposit,
                Decimal::new(25050, 2),
                Date::new(2, 1, 2024),
            )
            .unwrap();

        assert_eq!(updated.balance, Decimal::new(75050, 2));
    }

    #[test]
    fn deposit_past_ceiling_is_rejected() {
        let fx = fixture();
        let mut near_ceiling = new_account(100, 0);
        near_ceiling.balance = validate::balance_ceiling() - Decimal::new(100, 2);
        fx.service.create_account(&fx.alice, near_ceiling).unwrap();

        let result = fx.service.transact(
            &fx.alice,
            100,
            TransactionKind::Deposit,
            Decimal::new(200, 2),
            Date::new(2, 1, 2024),
        );

        assert!(matches!(result, Err(LedgerError::BalanceCeiling { .. })));
    }

    #[test]
    fn fixed_accounts_refuse_mutation_with_ledger_untouched() {
        let fx = fixture();
        let mut fixed = new_account(100, 50000);
        fixed.account_type = AccountType::Fixed2;
        fx.service.create_account(&fx.alice, fixed).unwrap();
        let before = ledger_bytes(&fx.store);

        let update = fx.service.update_info(&fx.alice, 100, "france", "987654321");
        let transact = fx.service.transact(
            &fx.alice,
            100,
            TransactionKind::Withdraw,
            Decimal::new(100, 2),
            Date::new(2, 1, 2024),
        );
        let remove = fx.service.remove_account(&fx.alice, 100);

        for result in [update.map(|_| ()), transact.map(|_| ()), remove] {
            assert!(matches!(result, Err(LedgerError::ImmutableAccount { .. })));
        }
        assert_eq!(ledger_bytes(&fx.store), before);
    }

    #[test]
    fn remove_deletes_only_the_target_record() {
        let fx = fixture();
        fx.service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();
        fx.service
            .create_account(&fx.alice, new_account(200, 10000))
            .unwrap();

        fx.service.remove_account(&fx.alice, 100).unwrap();

        let mine = fx.service.list_accounts(&fx.alice).unwrap();
        assert_eq!(
            mine.iter().map(|r| r.account_number).collect::<Vec<_>>(),
            vec![200]
        );
        assert!(matches!(
            fx.service.remove_account(&fx.alice, 100),
            Err(LedgerError::AccountNotFound { .. })
        ));
    }

    #[test]
    fn transfer_to_unknown_user_leaves_store_unmodified() {
        let fx = fixture();
        fx.service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();
        let before = ledger_bytes(&fx.store);

        let result = fx.service.transfer_ownership(&fx.alice, 100, "carol");

        assert!(matches!(result, Err(LedgerError::UserNotFound { .. })));
        assert_eq!(ledger_bytes(&fx.store), before);
        assert!(fx.notifications.borrow().is_empty());
    }

    #[test]
    fn transfer_rewrites_owner_fields_and_notifies_once() {
        let fx = fixture();
        let created = fx
            .service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();

        let updated = fx
            .service
            .transfer_ownership(&fx.alice, 100, "bob")
            .unwrap();

        assert_eq!(updated.owner_id, fx.bob.id);
        assert_eq!(updated.owner_name, "bob");
        assert_eq!(
            Record {
                owner_id: created.owner_id,
                owner_name: created.owner_name.clone(),
                ..updated
            },
            created
        );

        assert!(fx.service.list_accounts(&fx.alice).unwrap().is_empty());
        assert_eq!(fx.service.list_accounts(&fx.bob).unwrap().len(), 1);
        assert_eq!(
            fx.notifications.borrow().as_slice(),
            ["alice -> bob (100)"]
        );
    }

    #[test]
    fn transfer_into_colliding_namespace_is_a_conflict() {
        let fx = fixture();
        fx.service
            .create_account(&fx.alice, new_account(100, 50000))
            .unwrap();
        fx.service
            .create_account(&fx.bob, new_account(100, 10000))
            .unwrap();
        let before = ledger_bytes(&fx.store);

        let result = fx.service.transfer_ownership(&fx.alice, 100, "bob");

        assert!(matches!(result, Err(LedgerError::DuplicateAccount { .. })));
        assert_eq!(ledger_bytes(&fx.store), before);
        assert!(fx.notifications.borrow().is_empty());
    }

    #[test]
    fn fixed_accounts_may_still_be_transferred() {
        let fx = fixture();
        let mut fixed = new_account(100, 50000);
        fixed.account_type = AccountType::Fixed1;
        fx.service.create_account(&fx.alice, fixed).unwrap();

        let updated = fx
            .service
            .transfer_ownership(&fx.alice, 100, "bob")
            .unwrap();
        assert_eq!(updated.owner_name, "bob");
        assert_eq!(updated.account_type, AccountType::Fixed1);
    }

    #[test]
    fn noop_notifier_satisfies_the_seam() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path().join("records.txt")).unwrap();
        let directory = UserDirectory::open(dir.path().join("users.txt")).unwrap();
        let alice = directory.register("alice", "pw12345").unwrap();
        let bob = directory.register("bob", "pw12345").unwrap();
        let service = AccountService::new(store, directory, Box::new(NoopNotifier));

        service
            .create_account(&alice, new_account(100, 50000))
            .unwrap();
        assert_eq!(
            service
                .transfer_ownership(&alice, 100, "bob")
                .unwrap()
                .owner_id,
            bob.id
        );
    }
}
