//! Blocking HTTP client for the account service.
//!
//! The service exposes three read-only endpoints: `/api/balance`,
//! `/api/transactions` and `/api/health`. Failures come back as JSON bodies
//! carrying an `error` field, usually with HTTP 401 (expired upstream login)
//! or 500.

use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config;
use crate::errors::{FinanceError, FinanceResult};
use crate::parsers::json::{BalanceEnvelope, ErrorEnvelope, HealthEnvelope, TransactionsEnvelope};
use crate::parsers::prelude::*;

/// Source of raw account data.
///
/// The session only depends on this trait, so tests and alternative
/// transports can stand in for [`ApiClient`].
pub trait DataSource: Send + Sync {
    fn fetch_accounts(&self) -> FinanceResult<Vec<RawAccount>>;

    fn fetch_transactions(&self) -> FinanceResult<Vec<RawTransaction>>;
}

/// Date window for `/api/transactions`. Without one the service uses the
/// default range of its history page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRange {
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TransactionRange {
    pub fn new(begin: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { begin, end }
    }

    fn query(&self) -> [(&'static str, String); 2] {
        [
            ("begin_date", format_range_date(self.begin)),
            ("end_date", format_range_date(self.end)),
        ]
    }
}

/// Format a date the way the service expects range parameters (`2/1/2026 12:00 AM`).
pub fn format_range_date(dt: NaiveDateTime) -> String {
    dt.format("%-m/%-d/%Y %-I:%M %p").to_string()
}

pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: config::DEFAULT_TIMEOUT,
        }
    }
}

impl ApiClientBuilder {
    /// Override the service URL. Defaults to [`config::base_url`].
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> FinanceResult<ApiClient> {
        let http = Client::builder().timeout(self.timeout).build()?;
        Ok(ApiClient {
            base_url: self.base_url.unwrap_or_else(config::base_url),
            http,
        })
    }
}

pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The body is read even on failure so its `error` text can be reported.
    fn get(&self, path: &str, query: &[(&str, String)]) -> FinanceResult<String> {
        let url = self.url(path);
        let started = Instant::now();
        tracing::debug!(%url, "requesting");

        let response = self.http.get(&url).query(query).send()?;
        let status = response.status();
        let body = response.text()?;

        tracing::debug!(
            %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response received"
        );
        check_status(status, &body)?;
        Ok(body)
    }

    /// Whether the service reports itself healthy.
    pub fn health(&self) -> FinanceResult<bool> {
        let body = self.get(config::HEALTH_PATH, &[])?;
        let envelope: HealthEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.is_ok())
    }

    pub fn fetch_transactions_between(
        &self,
        range: &TransactionRange,
    ) -> FinanceResult<Vec<RawTransaction>> {
        let body = self.get(config::TRANSACTIONS_PATH, &range.query())?;
        serde_json::from_str::<TransactionsEnvelope>(&body)?.into_transactions()
    }
}

impl DataSource for ApiClient {
    fn fetch_accounts(&self) -> FinanceResult<Vec<RawAccount>> {
        let body = self.get(config::BALANCE_PATH, &[])?;
        serde_json::from_str::<BalanceEnvelope>(&body)?.into_accounts()
    }

    fn fetch_transactions(&self) -> FinanceResult<Vec<RawTransaction>> {
        let body = self.get(config::TRANSACTIONS_PATH, &[])?;
        serde_json::from_str::<TransactionsEnvelope>(&body)?.into_transactions()
    }
}

/// Map a non-success response to an error, preferring the body's `error` text.
fn check_status(status: StatusCode, body: &str) -> FinanceResult<()> {
    if status.is_success() {
        return Ok(());
    }

    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error);

    match (status, message) {
        (StatusCode::UNAUTHORIZED, Some(msg)) => Err(FinanceError::SessionExpired(msg)),
        (StatusCode::UNAUTHORIZED, None) => Err(FinanceError::SessionExpired(
            "Session expired".to_string(),
        )),
        (_, Some(msg)) => Err(FinanceError::Upstream(msg)),
        (status, None) => Err(FinanceError::Status(status.as_u16())),
    }
}
