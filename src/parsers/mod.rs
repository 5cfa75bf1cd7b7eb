pub mod amount;
pub mod date;
pub mod json;
pub mod traits;

pub mod prelude {
    pub use super::amount::{parse_currency, parse_transaction_amount};
    pub use super::date::{TransactionDate, parse_date};
    pub use super::json::prelude::*;
    pub use super::traits::Parser;
}
