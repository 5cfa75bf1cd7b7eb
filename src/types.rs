use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::parsers::prelude::*;

/// Numeric value of an account balance.
///
/// Some accounts report a status word (for example `"Active"`) instead of an
/// amount; those are `NotNumeric`, which is a valid state rather than a
/// parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Balance {
    Numeric(Decimal),
    NotNumeric,
}

impl Balance {
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Balance::Numeric(amount) => Some(*amount),
            Balance::NotNumeric => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Balance::Numeric(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub balance: Balance,
    /// Balance text exactly as the service sent it
    pub raw_balance: String,
}

impl Account {
    /// Text to render for the balance; always the original string.
    pub fn display_balance(&self) -> &str {
        &self.raw_balance
    }
}

impl From<&RawAccount> for Account {
    fn from(raw: &RawAccount) -> Self {
        Account {
            name: raw.name.clone(),
            balance: parse_currency(&raw.balance),
            raw_balance: raw.balance.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub account: String,
    /// Signed amount: negative is a debit, positive a credit
    pub amount: Decimal,
    pub date: TransactionDate,
    /// Date text exactly as the service sent it
    pub date_string: String,
    pub location: String,
    pub transaction_type: String,
}

impl Transaction {
    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.date.as_datetime()
    }
}

impl From<&RawTransaction> for Transaction {
    fn from(raw: &RawTransaction) -> Self {
        Transaction {
            account: raw.account.clone(),
            amount: parse_transaction_amount(&raw.amount),
            date: parse_date(&raw.date),
            date_string: raw.date.clone(),
            location: raw.location.clone(),
            transaction_type: raw.transaction_type.clone(),
        }
    }
}

/// Spend on one calendar day of the weekly chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySpending {
    /// Short weekday label, e.g. `"Mon"`
    pub label: String,
    pub date: NaiveDate,
    /// Sum of debit magnitudes; never negative
    pub amount: Decimal,
}

/// Figures derived from one fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_balance: Decimal,
    pub weekly_spending: Decimal,
    /// Oldest day first; the last bucket is today
    pub daily_spending: [DailySpending; 7],
}
