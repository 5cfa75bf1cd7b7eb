use campus_balance_rs::{BudgetStore, FinanceSession};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let session = FinanceSession::builder()
        .budget_store(BudgetStore::default())
        .build()?;

    let snapshot = match session.refresh() {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return Ok(());
        }
    };

    println!("Accounts:");
    for account in &snapshot.accounts {
        println!("  {}: {}", account.name, account.display_balance());
    }

    println!("\nTotal balance: ${:.2}", snapshot.summary.total_balance);
    println!("Spent this week: ${:.2}", snapshot.summary.weekly_spending);
    if let Some(remaining) = session.budget_remaining() {
        println!("Budget remaining: ${:.2}", remaining);
    }

    println!("\nLast 7 days:");
    for bucket in &snapshot.summary.daily_spending {
        println!("  {} {}  ${:.2}", bucket.label, bucket.date, bucket.amount);
    }

    println!("\nRecent transactions:");
    for txn in snapshot.transactions.iter().take(10) {
        println!(
            "  {} | {} | {} | {}",
            txn.date_string, txn.location, txn.transaction_type, txn.amount
        );
    }

    if snapshot.transactions.len() > 10 {
        println!("  ... and {} more", snapshot.transactions.len() - 10);
    }

    Ok(())
}
