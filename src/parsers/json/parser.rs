use super::dto::{BalanceEnvelope, RawAccount, RawTransaction, TransactionsEnvelope};
use crate::errors::FinanceResult;
use crate::parsers::traits::Parser;
use crate::types::{Account, Balance, Transaction};

/// Normalize accounts, keeping input order and length.
pub fn parse_accounts(raw: &[RawAccount]) -> Vec<Account> {
    let accounts: Vec<Account> = raw.iter().map(Account::from).collect();

    for account in accounts.iter().filter(|a| a.balance == Balance::NotNumeric) {
        tracing::debug!(
            account = %account.name,
            balance = %account.raw_balance,
            "balance is not numeric"
        );
    }

    accounts
}

/// Normalize transactions and sort them most recent first.
///
/// The sort is stable, so entries with equal timestamps keep their input
/// order. Entries whose date could not be parsed go last.
pub fn parse_transactions(raw: &[RawTransaction]) -> Vec<Transaction> {
    let mut transactions: Vec<Transaction> = raw.iter().map(Transaction::from).collect();

    for txn in transactions.iter().filter(|t| !t.date.is_valid()) {
        tracing::warn!(
            date = %txn.date_string,
            location = %txn.location,
            "transaction date could not be parsed"
        );
    }

    // None < Some(_), so reversing the comparison also pushes invalid dates last
    transactions.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    transactions
}

pub struct AccountsParser;

impl Parser for AccountsParser {
    type Output = Account;

    fn parse(content: &str) -> FinanceResult<Vec<Self::Output>> {
        let envelope: BalanceEnvelope = serde_json::from_str(content)?;
        let raw = envelope.into_accounts()?;
        tracing::debug!(count = raw.len(), "parsed accounts");
        Ok(parse_accounts(&raw))
    }
}

pub struct TransactionsParser;

impl Parser for TransactionsParser {
    type Output = Transaction;

    fn parse(content: &str) -> FinanceResult<Vec<Self::Output>> {
        let envelope: TransactionsEnvelope = serde_json::from_str(content)?;
        let raw = envelope.into_transactions()?;
        tracing::debug!(count = raw.len(), "parsed transactions");
        Ok(parse_transactions(&raw))
    }
}
