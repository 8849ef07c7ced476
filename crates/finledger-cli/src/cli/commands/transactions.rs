//! Transaction command handlers.

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use finledger_core::models::{EntityRef, Transaction, TransactionType};
use finledger_core::views::{SortKey, SortOrder, TransactionFilter};
use rust_decimal::Decimal;

use crate::cli::app::App;
use crate::cli::render;

#[derive(clap::Subcommand)]
pub enum TransactionCommands {
    /// List transactions
    List(ListArgs),
    /// Show a single transaction
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Record a new transaction
    Add(AddArgs),
    /// Change fields of an existing transaction
    Edit(EditArgs),
    /// Delete a transaction
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Only this type (income, expense, transfer)
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<TransactionType>,

    /// Only this account id
    #[arg(long, value_name = "ID")]
    account: Option<i64>,

    /// Only this category id
    #[arg(long, value_name = "ID")]
    category: Option<i64>,

    /// Earliest date (inclusive, YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    from: Option<NaiveDate>,

    /// Latest date (inclusive, YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    to: Option<NaiveDate>,

    /// Text to look for in description or notes
    #[arg(short, long)]
    search: Option<String>,

    /// Sort by date, amount or description
    #[arg(long, default_value = "date")]
    sort: SortKey,

    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,

    /// Show at most this many rows
    #[arg(short = 'n', long)]
    limit: Option<usize>,
}

#[derive(clap::Args)]
pub struct AddArgs {
    /// Transaction type (income, expense, transfer)
    #[arg(long = "type", value_name = "TYPE")]
    kind: TransactionType,

    #[arg(long)]
    amount: Decimal,

    #[arg(short, long)]
    description: String,

    /// Account id the money moves from/into
    #[arg(long, value_name = "ID")]
    account: i64,

    /// Destination account id (transfers only)
    #[arg(long, value_name = "ID")]
    to_account: Option<i64>,

    #[arg(long, value_name = "ID")]
    category: Option<i64>,

    /// Date (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    #[arg(long)]
    notes: Option<String>,
}

#[derive(clap::Args)]
pub struct EditArgs {
    #[arg(value_name = "ID")]
    id: i64,

    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<TransactionType>,

    #[arg(long)]
    amount: Option<Decimal>,

    #[arg(short, long)]
    description: Option<String>,

    #[arg(long, value_name = "ID")]
    account: Option<i64>,

    #[arg(long, value_name = "ID")]
    to_account: Option<i64>,

    #[arg(long, value_name = "ID")]
    category: Option<i64>,

    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    #[arg(long)]
    notes: Option<String>,
}

pub async fn run(app: &mut App, command: TransactionCommands) -> Result<()> {
    match command {
        TransactionCommands::List(args) => list(app, args).await,
        TransactionCommands::Show { id } => show(app, id).await,
        TransactionCommands::Add(args) => add(app, args).await,
        TransactionCommands::Edit(args) => edit(app, args).await,
        TransactionCommands::Delete { id } => delete(app, id).await,
    }
}

async fn list(app: &mut App, args: ListArgs) -> Result<()> {
    // Narrow on the server when a single dimension allows it; the local
    // filter below still applies every criterion.
    let fetched = if let Some(account) = args.account {
        app.api().transactions_by_account(account).await
    } else if let Some(category) = args.category {
        app.api().transactions_by_category(category).await
    } else if let Some(kind) = args.kind {
        app.api().transactions_by_type(kind).await
    } else {
        app.api().list_transactions().await
    };
    let transactions = app.check(fetched)?;

    let filter = TransactionFilter {
        kind: args.kind,
        account_id: args.account,
        category_id: args.category,
        from: args.from,
        to: args.to,
        search: args.search,
    };
    let order = if args.asc {
        SortOrder::Asc
    } else {
        SortOrder::Desc
    };
    let mut rows = filter.apply(&transactions, args.sort, order);
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    if rows.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }
    println!("{}", render::transactions_table(&rows, &app.config.currency));
    Ok(())
}

async fn show(app: &mut App, id: i64) -> Result<()> {
    let fetched = app.api().get_transaction(id).await;
    let txn = app.check(fetched)?;
    print_detail(&txn, &app.config.currency);
    Ok(())
}

async fn add(app: &mut App, args: AddArgs) -> Result<()> {
    validate(args.kind, args.amount, args.to_account)?;

    let draft = Transaction {
        id: None,
        transaction_date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        description: args.description.trim().to_string(),
        amount: args.amount,
        transaction_type: args.kind,
        category: args.category.map(EntityRef::id),
        account: EntityRef::id(args.account),
        target_account: args.to_account.map(EntityRef::id),
        notes: args.notes.filter(|n| !n.trim().is_empty()),
        created_at: None,
        updated_at: None,
    };
    if draft.description.is_empty() {
        bail!("Description must not be empty");
    }

    let created = app.api().create_transaction(&draft).await;
    let created = app.check(created)?;
    println!(
        "Created transaction {}",
        created.id.map_or_else(|| "?".to_string(), |id| id.to_string())
    );
    Ok(())
}

async fn edit(app: &mut App, args: EditArgs) -> Result<()> {
    let fetched = app.api().get_transaction(args.id).await;
    let mut txn = app
        .check(fetched)
        .with_context(|| format!("load transaction {}", args.id))?;

    if let Some(kind) = args.kind {
        txn.transaction_type = kind;
    }
    if let Some(amount) = args.amount {
        txn.amount = amount;
    }
    if let Some(description) = args.description {
        txn.description = description.trim().to_string();
    }
    if let Some(account) = args.account {
        txn.account = EntityRef::id(account);
    }
    if let Some(target) = args.to_account {
        txn.target_account = Some(EntityRef::id(target));
    }
    if txn.transaction_type != TransactionType::Transfer {
        txn.target_account = None;
    }
    if let Some(category) = args.category {
        txn.category = Some(EntityRef::id(category));
    }
    if let Some(date) = args.date {
        txn.transaction_date = date;
    }
    if let Some(notes) = args.notes {
        txn.notes = Some(notes).filter(|n| !n.trim().is_empty());
    }
    validate(
        txn.transaction_type,
        txn.amount,
        txn.target_account.as_ref().map(|t| t.id),
    )?;

    let updated = app.api().update_transaction(args.id, &txn).await;
    app.check(updated)?;
    println!("Updated transaction {}", args.id);
    Ok(())
}

async fn delete(app: &mut App, id: i64) -> Result<()> {
    let deleted = app.api().delete_transaction(id).await;
    app.check(deleted)?;
    println!("Deleted transaction {id}");
    Ok(())
}

fn validate(kind: TransactionType, amount: Decimal, to_account: Option<i64>) -> Result<()> {
    if amount <= Decimal::ZERO {
        bail!("Amount must be greater than zero");
    }
    match (kind, to_account) {
        (TransactionType::Transfer, None) => bail!("Transfers need --to-account"),
        (TransactionType::Income | TransactionType::Expense, Some(_)) => {
            bail!("--to-account only applies to transfers")
        }
        _ => Ok(()),
    }
}

fn print_detail(txn: &Transaction, currency: &str) {
    println!("ID:          {}", txn.id.unwrap_or_default());
    println!("Date:        {}", txn.transaction_date);
    println!("Type:        {}", txn.transaction_type);
    println!("Description: {}", txn.description);
    println!("Amount:      {}", render::signed_amount(txn, currency));
    println!("Account:     {}", render::entity(&txn.account));
    if let Some(target) = &txn.target_account {
        println!("To account:  {}", render::entity(target));
    }
    if let Some(category) = &txn.category {
        println!("Category:    {}", render::entity(category));
    }
    if let Some(notes) = &txn.notes {
        println!("Notes:       {notes}");
    }
}
