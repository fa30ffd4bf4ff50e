//! Ledger record types
//!
//! This module defines the on-ledger account record, the calendar date value
//! type used for deposit dates, and the account type enumeration with its
//! wire-token mapping.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use super::error::LedgerError;

/// Record identifier, unique within the ledger file
///
/// Assigned sequentially at creation and stable for the lifetime of the record.
pub type RecordId = u32;

/// User identifier, assigned by the user directory at registration
pub type UserId = u32;

/// Account number, unique per owner (not globally unique)
pub type AccountNumber = u32;

/// Calendar date as stored on the wire (`mm/dd/yyyy`)
///
/// This is a plain value type: parsing only checks that the three components
/// are numeric and slash-separated. Range and month/leap-year consistency are
/// enforced by [`crate::core::validate::date`] before a date is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub month: u8,
    pub day: u8,
    pub year: u16,
}

impl Date {
    pub fn new(month: u8, day: u8, year: u16) -> Self {
        Date { month, day, year }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.month, self.day, self.year)
    }
}

impl FromStr for Date {
    type Err = LedgerError;

    /// Parse a `mm/dd/yyyy` date
    ///
    /// Returns [`LedgerError::Malformed`] when the component count is wrong or
    /// any component is non-numeric, so a garbled ledger line is reported as a
    /// corrupt-store condition rather than a panic.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        let [month, day, year] = parts.as_slice() else {
            return Err(LedgerError::malformed(
                None,
                format!("invalid date '{}': expected mm/dd/yyyy", s),
            ));
        };

        let parse_part = |part: &str, what: &str| {
            part.parse::<u32>().map_err(|_| {
                LedgerError::malformed(None, format!("invalid {} in date '{}'", what, s))
            })
        };

        let month = parse_part(month, "month")?;
        let day = parse_part(day, "day")?;
        let year = parse_part(year, "year")?;

        if month > u8::MAX as u32 || day > u8::MAX as u32 || year > u16::MAX as u32 {
            return Err(LedgerError::malformed(
                None,
                format!("date component out of range in '{}'", s),
            ));
        }

        Ok(Date::new(month as u8, day as u8, year as u16))
    }
}

/// Account type enumeration
///
/// The first five variants are the supported set; writing any other value is
/// rejected by the codec. [`AccountType::Legacy`] carries an unrecognized wire
/// token so that records written by older codec versions still decode; legacy
/// accounts earn no interest and behave like current accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountType {
    /// Savings account: 7% annual interest accrued monthly
    Savings,
    /// Current account: no interest
    Current,
    /// Fixed deposit, 1 year term at 4% annual
    Fixed1,
    /// Fixed deposit, 2 year term at 5% annual
    Fixed2,
    /// Fixed deposit, 3 year term at 8% annual
    Fixed3,
    /// Unrecognized wire token from an older ledger
    Legacy(String),
}

impl AccountType {
    /// Parse a wire token into an account type
    ///
    /// Known tokens map to their variant; anything else is preserved as
    /// [`AccountType::Legacy`] rather than rejected, so decoding never fails
    /// on the type field.
    pub fn from_wire(token: &str) -> Self {
        match token {
            "saving" | "savings" => AccountType::Savings,
            "current" => AccountType::Current,
            "fixed01" => AccountType::Fixed1,
            "fixed02" => AccountType::Fixed2,
            "fixed03" => AccountType::Fixed3,
            other => AccountType::Legacy(other.to_string()),
        }
    }

    /// The token written to the ledger file for this type
    pub fn as_wire(&self) -> &str {
        match self {
            AccountType::Savings => "saving",
            AccountType::Current => "current",
            AccountType::Fixed1 => "fixed01",
            AccountType::Fixed2 => "fixed02",
            AccountType::Fixed3 => "fixed03",
            AccountType::Legacy(token) => token,
        }
    }

    /// Whether this is a fixed-term deposit
    ///
    /// Fixed accounts are immutable except for ownership transfer: no deposit,
    /// withdrawal, contact update, or removal is permitted once created.
    pub fn is_fixed(&self) -> bool {
        matches!(
            self,
            AccountType::Fixed1 | AccountType::Fixed2 | AccountType::Fixed3
        )
    }

    /// Term length in years for fixed deposits
    pub fn term_years(&self) -> Option<u16> {
        match self {
            AccountType::Fixed1 => Some(1),
            AccountType::Fixed2 => Some(2),
            AccountType::Fixed3 => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// One account record as persisted in the ledger file
///
/// The `(owner_name, account_number)` pair is unique across live records.
/// `owner_name` is a denormalized copy of the owner's directory name, kept in
/// sync on ownership transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Unique record id, stable across rewrites
    pub id: RecordId,

    /// Directory id of the owning user
    pub owner_id: UserId,

    /// Name of the owning user (denormalized)
    pub owner_name: String,

    /// Account number, unique within the owner's namespace
    pub account_number: AccountNumber,

    /// Date of the opening deposit
    pub deposit_date: Date,

    /// Country of residence
    pub country: String,

    /// Contact phone number (digits only)
    pub phone: String,

    /// Current balance, never negative, rendered with 2 decimal places
    pub balance: Decimal,

    /// Type of account
    pub account_type: AccountType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Date::new(1, 2, 2024), "01/02/2024")]
    #[case(Date::new(12, 31, 1999), "12/31/1999")]
    #[case(Date::new(6, 7, 2100), "06/07/2100")]
    fn date_display_zero_pads(#[case] date: Date, #[case] expected: &str) {
        assert_eq!(date.to_string(), expected);
    }

    #[rstest]
    #[case("01/02/2024", Date::new(1, 2, 2024))]
    #[case("12/31/1999", Date::new(12, 31, 1999))]
    #[case("6/7/2024", Date::new(6, 7, 2024))] // unpadded input accepted
    fn date_parses_valid_input(#[case] input: &str, #[case] expected: Date) {
        assert_eq!(input.parse::<Date>().unwrap(), expected);
    }

    #[rstest]
    #[case::missing_component("01/2024")]
    #[case::extra_component("01/02/2024/05")]
    #[case::non_numeric("ab/02/2024")]
    #[case::empty("")]
    #[case::out_of_range("300/02/2024")]
    fn date_rejects_garbage(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Date>(),
            Err(LedgerError::Malformed { .. })
        ));
    }

    #[test]
    fn date_round_trips_through_display() {
        let date = Date::new(3, 9, 2021);
        assert_eq!(date.to_string().parse::<Date>().unwrap(), date);
    }

    #[rstest]
    #[case("saving", AccountType::Savings)]
    #[case("savings", AccountType::Savings)]
    #[case("current", AccountType::Current)]
    #[case("fixed01", AccountType::Fixed1)]
    #[case("fixed02", AccountType::Fixed2)]
    #[case("fixed03", AccountType::Fixed3)]
    fn account_type_from_known_tokens(#[case] token: &str, #[case] expected: AccountType) {
        assert_eq!(AccountType::from_wire(token), expected);
    }

    #[test]
    fn account_type_preserves_unknown_tokens() {
        let parsed = AccountType::from_wire("premium");
        assert_eq!(parsed, AccountType::Legacy("premium".to_string()));
        assert_eq!(parsed.as_wire(), "premium");
        assert!(!parsed.is_fixed());
    }

    #[rstest]
    #[case(AccountType::Fixed1, true, Some(1))]
    #[case(AccountType::Fixed2, true, Some(2))]
    #[case(AccountType::Fixed3, true, Some(3))]
    #[case(AccountType::Savings, false, None)]
    #[case(AccountType::Current, false, None)]
    fn account_type_fixed_terms(
        #[case] account_type: AccountType,
        #[case] fixed: bool,
        #[case] years: Option<u16>,
    ) {
        assert_eq!(account_type.is_fixed(), fixed);
        assert_eq!(account_type.term_years(), years);
    }
}
