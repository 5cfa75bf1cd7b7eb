use crate::errors::FinanceResult;

/// Decodes one endpoint's JSON body into normalized records.
pub trait Parser {
    type Output;

    fn parse(content: &str) -> FinanceResult<Vec<Self::Output>>;
}
