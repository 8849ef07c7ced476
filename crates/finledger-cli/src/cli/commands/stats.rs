//! Stats view: totals plus the most recent transactions.

use anyhow::Result;
use finledger_core::views::{recent, summarize};

use crate::cli::app::App;
use crate::cli::render;

pub async fn show(app: &mut App, limit: Option<usize>) -> Result<()> {
    let fetched = app.api().list_transactions().await;
    let transactions = app.check(fetched)?;

    let currency = &app.config.currency;
    let summary = summarize(&transactions);
    println!("Income:  {}", render::money(summary.income, currency));
    println!("Expense: {}", render::money(summary.expense, currency));
    println!("Balance: {}", render::money(summary.balance, currency));

    let limit = limit.unwrap_or(app.config.recent_limit);
    let rows = recent(&transactions, limit);
    if rows.is_empty() {
        println!("\nNo transactions yet.");
    } else {
        println!("\nRecent transactions");
        println!("{}", render::transactions_table(&rows, currency));
    }
    Ok(())
}
