//! Amount strings as reported by the account service.
//!
//! Balances look like `"1,234.56 USD"` or a status word such as `"Active"`.
//! Transaction amounts use accounting notation: `"(12.89) USD"` is a debit,
//! `"12.89 USD"` a credit.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::types::Balance;

static PLAIN_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<number>[\d,]*(?:\.\d+)?)\s+\w+$").expect("valid plain amount regex")
});

static PARENTHESIZED_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\((?P<number>[\d,]*(?:\.\d+)?)\)\s+\w+$")
        .expect("valid parenthesized amount regex")
});

/// Strip grouping commas and parse as an unsigned decimal.
fn parse_number(number: &str) -> Option<Decimal> {
    let cleaned = number.replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    let cleaned = if cleaned.starts_with('.') {
        format!("0{}", cleaned)
    } else {
        cleaned
    };
    Decimal::from_str(&cleaned).ok()
}

/// Parse a balance string into a [`Balance`].
///
/// The result is never negative. Anything that is not `NUMBER CODE` is
/// status text and yields [`Balance::NotNumeric`].
pub fn parse_currency(raw: &str) -> Balance {
    PLAIN_AMOUNT
        .captures(raw.trim())
        .and_then(|caps| parse_number(&caps["number"]))
        .map(Balance::Numeric)
        .unwrap_or(Balance::NotNumeric)
}

/// Parse a transaction amount, returning a negative value for debits.
///
/// Unrecognized input yields exactly zero.
pub fn parse_transaction_amount(raw: &str) -> Decimal {
    let raw = raw.trim();

    if let Some(caps) = PARENTHESIZED_AMOUNT.captures(raw) {
        return parse_number(&caps["number"])
            .map(|n| -n)
            .unwrap_or(Decimal::ZERO);
    }

    PLAIN_AMOUNT
        .captures(raw)
        .and_then(|caps| parse_number(&caps["number"]))
        .unwrap_or(Decimal::ZERO)
}
