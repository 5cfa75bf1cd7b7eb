//! Fetch campus card balances and transactions and summarize spending.
//!
//! Raw strings from the account service (`"1,234.56 USD"`, `"(12.89) USD"`,
//! `"10/14/2026 8:15 AM"`) are normalized into typed records, then reduced to
//! a total balance, the spending of the trailing seven days and a seven-day
//! chart series.
//!
//! ```rust,ignore
//! use campus_balance_rs::FinanceSession;
//!
//! let session = FinanceSession::builder().build()?;
//! let snapshot = session.refresh()?;
//! println!("{}", snapshot.summary.weekly_spending);
//! ```

mod types;

pub mod aggregate;
pub mod budget;
pub mod client;
pub mod config;
pub mod errors;
pub mod parsers;
pub mod session;

pub use aggregate::{
    budget_remaining, calculate_total_balance, calculate_weekly_spending, get_daily_spending,
};
pub use budget::BudgetStore;
pub use client::{ApiClient, ApiClientBuilder, DataSource, TransactionRange};
pub use errors::{FinanceError, FinanceResult};
pub use parsers::prelude::*;
pub use session::{
    Clock, FinanceSession, FixedClock, SessionBuilder, SessionState, Snapshot, SubscriptionId,
    SystemClock,
};
pub use types::{Account, Balance, DailySpending, Summary, Transaction};
