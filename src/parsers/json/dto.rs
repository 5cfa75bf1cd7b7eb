use serde::{Deserialize, Serialize};

use crate::errors::{FinanceError, FinanceResult};

/// Account entry as returned by `/api/balance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAccount {
    pub name: String,
    pub balance: String,
}

/// Transaction row as returned by `/api/transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub account: String,
    pub amount: String,
    pub date: String,
    pub location: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BalanceEnvelope {
    #[serde(default)]
    pub(crate) accounts: Option<Vec<RawAccount>>,
    #[serde(default)]
    pub(crate) timestamp: Option<String>,
    #[serde(default)]
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionsEnvelope {
    #[serde(default)]
    pub(crate) transactions: Option<Vec<RawTransaction>>,
    #[serde(default)]
    pub(crate) count: Option<u64>,
    #[serde(default)]
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

/// Body of a non-success response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub(crate) error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthEnvelope {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

/// An `error` field wins over any data that came along with it.
fn check_error(error: Option<String>) -> FinanceResult<()> {
    match error {
        Some(msg) => Err(FinanceError::Upstream(msg)),
        None => Ok(()),
    }
}

impl BalanceEnvelope {
    pub(crate) fn into_accounts(self) -> FinanceResult<Vec<RawAccount>> {
        check_error(self.error)?;
        if let Some(status) = self.status.as_deref().filter(|s| *s != "success") {
            tracing::debug!(status, "balance response has unexpected status");
        }
        tracing::debug!(timestamp = ?self.timestamp, "balance response received");
        self.accounts.ok_or(FinanceError::MissingPayload("accounts"))
    }
}

impl TransactionsEnvelope {
    pub(crate) fn into_transactions(self) -> FinanceResult<Vec<RawTransaction>> {
        check_error(self.error)?;
        if let Some(status) = self.status.as_deref().filter(|s| *s != "success") {
            tracing::debug!(status, "transactions response has unexpected status");
        }
        let transactions = self
            .transactions
            .ok_or(FinanceError::MissingPayload("transactions"))?;
        if let Some(count) = self.count.filter(|c| *c != transactions.len() as u64) {
            tracing::warn!(
                count,
                received = transactions.len(),
                "transaction count does not match payload"
            );
        }
        Ok(transactions)
    }
}

impl HealthEnvelope {
    pub(crate) fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_raw_transaction_type_rename() {
        let json = r#"{
            "account": "Dining Dollars",
            "amount": "(4.50) USD",
            "date": "10/14/2026 8:15 AM",
            "location": "Coffee Shop",
            "type": "Purchase"
        }"#;

        let raw: RawTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(raw.transaction_type, "Purchase");

        let back = serde_json::to_string(&raw).unwrap();
        assert!(back.contains(r#""type":"Purchase""#));
    }

    #[test]
    fn test_balance_envelope_success() {
        let json = r#"{
            "accounts": [{"name": "Checking", "balance": "559.72 USD"}],
            "timestamp": "2026-10-14T09:00:00",
            "status": "success"
        }"#;

        let envelope: BalanceEnvelope = serde_json::from_str(json).unwrap();
        let accounts = envelope.into_accounts().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].balance, "559.72 USD");
    }

    #[rstest]
    #[case(r#"{"error": "session_expired"}"#, "session_expired")]
    #[case(
        r#"{"error": "Timeout", "accounts": [{"name": "A", "balance": "1.00 USD"}]}"#,
        "Timeout"
    )]
    fn test_balance_envelope_error(#[case] json: &str, #[case] message: &str) {
        let envelope: BalanceEnvelope = serde_json::from_str(json).unwrap();
        match envelope.into_accounts() {
            Err(FinanceError::Upstream(msg)) => assert_eq!(msg, message),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_balance_envelope_missing_accounts() {
        let envelope: BalanceEnvelope = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(matches!(
            envelope.into_accounts(),
            Err(FinanceError::MissingPayload("accounts"))
        ));
    }

    #[test]
    fn test_transactions_envelope_success() {
        let json = r#"{
            "transactions": [
                {"account": "Dining Dollars", "amount": "(4.50) USD", "date": "10/14/2026 8:15 AM", "location": "Coffee Shop", "type": "Purchase"},
                {"account": "Dining Dollars", "amount": "100.00 USD", "date": "10/13/2026 1:00 PM", "location": "Online Deposit", "type": "Deposit"}
            ],
            "count": 2,
            "status": "success"
        }"#;

        let envelope: TransactionsEnvelope = serde_json::from_str(json).unwrap();
        let transactions = envelope.into_transactions().unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1].transaction_type, "Deposit");
    }

    #[test]
    fn test_transactions_envelope_error() {
        let envelope: TransactionsEnvelope =
            serde_json::from_str(r#"{"error": "Session expired — cookies need to be refreshed"}"#)
                .unwrap();
        assert!(matches!(
            envelope.into_transactions(),
            Err(FinanceError::Upstream(msg)) if msg.starts_with("Session expired")
        ));
    }

    #[rstest]
    #[case(r#"{"status": "ok"}"#, true)]
    #[case(r#"{"status": "degraded"}"#, false)]
    #[case(r#"{}"#, false)]
    fn test_health_envelope(#[case] json: &str, #[case] expected: bool) {
        let envelope: HealthEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.is_ok(), expected);
    }
}
