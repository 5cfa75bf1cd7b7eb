//! Summary figures derived from normalized accounts and transactions.
//!
//! Every function takes the evaluation instant explicitly so results are
//! reproducible; nothing here reads the system clock.

use chrono::{NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;

use crate::types::{Account, DailySpending, Summary, Transaction};

/// Number of calendar days shown in the spending chart, today included.
pub const CHART_DAYS: usize = 7;

/// Length in days of the rolling weekly spending window.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Sum of every numeric balance; status-only balances count as zero.
pub fn calculate_total_balance(accounts: &[Account]) -> Decimal {
    accounts
        .iter()
        .filter_map(|account| account.balance.as_decimal())
        .sum()
}

/// Total debit magnitude over the 168 hours ending at `now`.
pub fn calculate_weekly_spending(transactions: &[Transaction], now: NaiveDateTime) -> Decimal {
    let window_start = now - TimeDelta::days(WEEKLY_WINDOW_DAYS);

    transactions
        .iter()
        .filter(|txn| txn.is_debit())
        .filter(|txn| txn.timestamp().is_some_and(|ts| ts >= window_start))
        .map(|txn| txn.amount.abs())
        .sum()
}

/// Debit magnitudes per calendar day for today and the six days before it.
///
/// Buckets are ordered oldest first, so the last one is always today.
/// Days without spending are still present with a zero amount.
pub fn get_daily_spending(
    transactions: &[Transaction],
    now: NaiveDateTime,
) -> [DailySpending; CHART_DAYS] {
    let today = now.date();

    std::array::from_fn(|index| {
        let days_back = (CHART_DAYS - 1 - index) as i64;
        let date = today - TimeDelta::days(days_back);

        let amount = transactions
            .iter()
            .filter(|txn| txn.is_debit())
            .filter(|txn| txn.timestamp().map(|ts| ts.date()) == Some(date))
            .map(|txn| txn.amount.abs())
            .sum();

        DailySpending {
            label: date.format("%a").to_string(),
            date,
            amount,
        }
    })
}

/// Budget left for the week; negative once spending exceeds the budget.
pub fn budget_remaining(budget: Decimal, weekly_spending: Decimal) -> Decimal {
    budget - weekly_spending
}

impl Summary {
    pub fn compute(accounts: &[Account], transactions: &[Transaction], now: NaiveDateTime) -> Self {
        Summary {
            total_balance: calculate_total_balance(accounts),
            weekly_spending: calculate_weekly_spending(transactions, now),
            daily_spending: get_daily_spending(transactions, now),
        }
    }

    /// Bucket for the evaluation day.
    pub fn today(&self) -> &DailySpending {
        &self.daily_spending[CHART_DAYS - 1]
    }

    /// Largest daily amount, used to scale the chart.
    pub fn max_daily_spending(&self) -> Decimal {
        self.daily_spending
            .iter()
            .map(|bucket| bucket.amount)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::date::TransactionDate;
    use crate::types::Balance;
    use chrono::NaiveDate;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn account(balance: Balance) -> Account {
        Account {
            name: "Account".to_string(),
            balance,
            raw_balance: String::new(),
        }
    }

    fn txn(amount: &str, date: TransactionDate) -> Transaction {
        Transaction {
            account: "Dining Dollars".to_string(),
            amount: dec(amount),
            date,
            date_string: String::new(),
            location: "Somewhere".to_string(),
            transaction_type: "Purchase".to_string(),
        }
    }

    fn ago(delta: TimeDelta) -> TransactionDate {
        TransactionDate::Valid(now() - delta)
    }

    #[test]
    fn test_total_balance_ignores_not_numeric() {
        let accounts = vec![
            account(Balance::Numeric(dec("100"))),
            account(Balance::NotNumeric),
            account(Balance::Numeric(dec("50"))),
        ];
        assert_eq!(calculate_total_balance(&accounts), dec("150"));
    }

    #[rstest]
    #[case(vec![], "0")]
    #[case(vec![Balance::NotNumeric, Balance::NotNumeric], "0")]
    #[case(vec![Balance::Numeric(dec("559.72")), Balance::Numeric(dec("0.28"))], "560.00")]
    fn test_total_balance_cases(#[case] balances: Vec<Balance>, #[case] expected: &str) {
        let accounts: Vec<Account> = balances.into_iter().map(account).collect();
        assert_eq!(calculate_total_balance(&accounts), dec(expected));
    }

    #[test]
    fn test_weekly_spending_excludes_credits_and_stale_debits() {
        let transactions = vec![
            txn("-20", ago(TimeDelta::days(6))),
            txn("-30", ago(TimeDelta::days(8))),
            txn("40", ago(TimeDelta::days(1))),
        ];
        assert_eq!(calculate_weekly_spending(&transactions, now()), dec("20"));
    }

    #[rstest]
    #[case(TimeDelta::days(7), "5")]                             // no limite exato da janela
    #[case(TimeDelta::days(7) + TimeDelta::seconds(1), "0")]
    #[case(TimeDelta::hours(167), "5")]
    #[case(TimeDelta::zero(), "5")]
    #[case(-TimeDelta::hours(1), "5")]                           // data futura ainda conta
    #[case(-TimeDelta::days(3), "5")]
    fn test_weekly_spending_window_boundary(#[case] age: TimeDelta, #[case] expected: &str) {
        let transactions = vec![txn("-5", ago(age))];
        assert_eq!(calculate_weekly_spending(&transactions, now()), dec(expected));
    }

    #[test]
    fn test_weekly_spending_skips_invalid_dates_and_zero_amounts() {
        let transactions = vec![
            txn("-9.99", TransactionDate::Invalid),
            txn("0", ago(TimeDelta::hours(1))),
            txn("-1.01", ago(TimeDelta::hours(2))),
        ];
        assert_eq!(calculate_weekly_spending(&transactions, now()), dec("1.01"));
    }

    #[test]
    fn test_daily_spending_empty_input() {
        let buckets = get_daily_spending(&[], now());

        assert_eq!(buckets.len(), CHART_DAYS);
        assert!(buckets.iter().all(|b| b.amount == Decimal::ZERO));
    }

    #[test]
    fn test_daily_spending_order_and_labels() {
        let buckets = get_daily_spending(&[], now());

        // 2026-10-14 is a Wednesday
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"]);
        assert_eq!(buckets[0].date, NaiveDate::from_ymd_opt(2026, 10, 8).unwrap());
        assert_eq!(buckets[6].date, NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
    }

    #[test]
    fn test_daily_spending_uses_calendar_days() {
        let yesterday_late = NaiveDate::from_ymd_opt(2026, 10, 13)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let today_early = NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(0, 1, 0)
            .unwrap();
        let six_days_back = NaiveDate::from_ymd_opt(2026, 10, 8)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let seven_days_back = NaiveDate::from_ymd_opt(2026, 10, 7)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();

        let transactions = vec![
            txn("-3.00", yesterday_late.into()),
            txn("-2.50", today_early.into()),
            txn("-1.25", today_early.into()),
            txn("10.00", today_early.into()),
            txn("-4.00", six_days_back.into()),
            txn("-8.00", seven_days_back.into()),
            txn("-6.00", TransactionDate::Invalid),
        ];

        let buckets = get_daily_spending(&transactions, now());
        assert_eq!(buckets[6].amount, dec("3.75"));
        assert_eq!(buckets[5].amount, dec("3.00"));
        assert_eq!(buckets[0].amount, dec("4.00"));
        let total: Decimal = buckets.iter().map(|b| b.amount).sum();
        assert_eq!(total, dec("10.75"));
    }

    #[rstest]
    #[case(TimeDelta::hours(14))]                                // amanhã à meia-noite
    #[case(TimeDelta::days(1))]
    #[case(TimeDelta::days(5))]
    fn test_daily_spending_ignores_future_days(#[case] ahead: TimeDelta) {
        let transactions = vec![txn("-9.00", ago(-ahead))];

        let buckets = get_daily_spending(&transactions, now());
        assert!(buckets.iter().all(|b| b.amount == Decimal::ZERO));
        // the rolling week still counts it
        assert_eq!(calculate_weekly_spending(&transactions, now()), dec("9.00"));
    }

    #[test]
    fn test_summary_compute() {
        let accounts = vec![account(Balance::Numeric(dec("20.00")))];
        let transactions = vec![
            txn("-4.00", ago(TimeDelta::hours(1))),
            txn("-6.00", ago(TimeDelta::days(2))),
        ];

        let summary = Summary::compute(&accounts, &transactions, now());
        assert_eq!(summary.total_balance, dec("20.00"));
        assert_eq!(summary.weekly_spending, dec("10.00"));
        assert_eq!(summary.today().amount, dec("4.00"));
        assert_eq!(summary.max_daily_spending(), dec("6.00"));
    }

    #[rstest]
    #[case("100", "40", "60")]
    #[case("100", "100", "0")]
    #[case("25", "30.50", "-5.50")]
    fn test_budget_remaining(#[case] budget: &str, #[case] spent: &str, #[case] expected: &str) {
        assert_eq!(budget_remaining(dec(budget), dec(spent)), dec(expected));
    }
}
