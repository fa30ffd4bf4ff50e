//! Validation rules
//!
//! Pure predicates over field values, called by the account service before
//! any store mutation — invalid input never reaches the store. Each returns
//! a structured reason on failure and performs no I/O.

use crate::types::{AccountType, Date, LedgerError};
use rust_decimal::Decimal;

/// Upper bound on any balance or single transaction amount
pub fn balance_ceiling() -> Decimal {
    // 100,000,000.00
    Decimal::new(10_000_000_000, 2)
}

/// Check a calendar date for range and month/leap-year consistency
pub fn date(d: &Date) -> Result<(), LedgerError> {
    let valid = (1900..=2100).contains(&d.year)
        && (1..=12).contains(&d.month)
        && d.day >= 1
        && d.day <= days_in_month(d.month, d.year);
    if valid {
        Ok(())
    } else {
        Err(LedgerError::InvalidDate {
            month: d.month,
            day: d.day,
            year: d.year,
        })
    }
}

/// Check a phone number: digits only, 7 to 15 characters
pub fn phone(value: &str) -> Result<(), LedgerError> {
    let valid = (7..=15).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(LedgerError::InvalidPhone {
            phone: value.to_string(),
        })
    }
}

/// Check a monetary amount: positive, at most 2 decimal places, below ceiling
///
/// The 2-decimal-place bound keeps amounts exactly representable on the wire,
/// where balances are rendered with 2 decimal places.
pub fn amount(value: Decimal) -> Result<(), LedgerError> {
    if value <= Decimal::ZERO || value.normalize().scale() > 2 {
        return Err(LedgerError::InvalidAmount { amount: value });
    }
    if value > balance_ceiling() {
        return Err(LedgerError::BalanceCeiling {
            ceiling: balance_ceiling(),
        });
    }
    Ok(())
}

/// Check membership in the supported account type set
///
/// Legacy tokens decoded from older ledgers are readable but may not be
/// written back.
pub fn account_type(value: &AccountType) -> Result<(), LedgerError> {
    match value {
        AccountType::Legacy(token) => Err(LedgerError::InvalidAccountType {
            value: token.clone(),
        }),
        _ => Ok(()),
    }
}

/// Check a country name: non-empty, alphabetic only
pub fn country(value: &str) -> Result<(), LedgerError> {
    let valid = !value.is_empty() && value.chars().all(|c| c.is_alphabetic());
    if valid {
        Ok(())
    } else {
        Err(LedgerError::InvalidCountry {
            value: value.to_string(),
        })
    }
}

/// Check a directory user name: alphanumeric or underscore, at most 50 chars
pub fn user_name(value: &str) -> Result<(), LedgerError> {
    let valid = !value.is_empty()
        && value.len() <= 50
        && value.chars().all(|c| c.is_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(LedgerError::InvalidUserName {
            value: value.to_string(),
        })
    }
}

fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
