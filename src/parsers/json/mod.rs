mod dto;
mod parser;

pub(crate) use dto::{BalanceEnvelope, ErrorEnvelope, HealthEnvelope, TransactionsEnvelope};

pub mod prelude {
    pub use super::dto::{RawAccount, RawTransaction};
    pub use super::parser::{AccountsParser, TransactionsParser, parse_accounts, parse_transactions};
}
