//! Interest policy
//!
//! Pure mapping from account type, balance, and deposit date to a payable
//! interest figure and its accrual schedule. Fixed rates per type:
//!
//! - savings: 7%/yr, accrued monthly on the deposit-day anniversary
//! - fixed01: 4%/yr, paid once at maturity (1 year)
//! - fixed02: 5%/yr x 2, paid at maturity (2 years)
//! - fixed03: 8%/yr x 3, paid at maturity (3 years)
//! - current: no interest
//!
//! Unknown legacy type tokens earn nothing, same as current accounts. That is
//! deliberate forward compatibility with records written by older codec
//! versions, not an error path.

use crate::types::{AccountType, Date};
use rust_decimal::Decimal;

/// A computed interest figure with its accrual schedule
#[derive(Debug, Clone, PartialEq)]
pub struct Interest {
    /// Amount paid per accrual (monthly for savings, once for fixed terms)
    pub amount: Decimal,
    /// When the amount is paid
    pub schedule: Schedule,
}

/// When interest is paid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Paid on this day of every month
    Monthly { day: u8 },
    /// Paid once when the fixed term matures
    AtMaturity { date: Date },
    /// No interest accrues
    None,
}

/// Compute the interest for an account
pub fn compute(account_type: &AccountType, balance: Decimal, deposit_date: Date) -> Interest {
    let percent = |num: i64| Decimal::new(num, 2);

    match account_type {
        AccountType::Savings => Interest {
            amount: (balance * percent(7) / Decimal::from(12)).round_dp(2),
            schedule: Schedule::Monthly {
                day: deposit_date.day,
            },
        },
        AccountType::Fixed1 => fixed_term(balance, percent(4), 1, deposit_date),
        AccountType::Fixed2 => fixed_term(balance, percent(5), 2, deposit_date),
        AccountType::Fixed3 => fixed_term(balance, percent(8), 3, deposit_date),
        AccountType::Current | AccountType::Legacy(_) => Interest {
            amount: Decimal::ZERO,
            schedule: Schedule::None,
        },
    }
}

fn fixed_term(balance: Decimal, rate: Decimal, years: u16, deposit_date: Date) -> Interest {
    Interest {
        amount: (balance * rate * Decimal::from(years)).round_dp(2),
        schedule: Schedule::AtMaturity {
            date: Date::new(
                deposit_date.month,
                deposit_date.day,
                deposit_date.year + years,
            ),
        },
    }
}
