//! Account command handlers.

use anyhow::{Result, bail};
use finledger_core::models::{Account, AccountType};
use rust_decimal::Decimal;

use crate::cli::app::App;
use crate::cli::render;

#[derive(clap::Subcommand)]
pub enum AccountCommands {
    /// List accounts
    List {
        /// Only active accounts
        #[arg(long, conflicts_with = "kind")]
        active: bool,

        /// Only this type (cash, bank, card, credit-card, investment, savings)
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<AccountType>,
    },
    /// Show a single account
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Open a new account
    Add {
        #[arg(long)]
        name: String,

        #[arg(long = "type", value_name = "TYPE")]
        kind: AccountType,

        /// Opening balance
        #[arg(long, default_value = "0")]
        balance: Decimal,

        /// Currency code (default: configured currency)
        #[arg(long)]
        currency: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Overwrite an account's balance
    SetBalance {
        #[arg(value_name = "ID")]
        id: i64,

        #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
        balance: Decimal,
    },
    /// Mark an account active or inactive
    SetActive {
        #[arg(value_name = "ID")]
        id: i64,

        #[arg(value_name = "ACTIVE", action = clap::ArgAction::Set)]
        active: bool,
    },
    /// Delete an account
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

pub async fn run(app: &mut App, command: AccountCommands) -> Result<()> {
    match command {
        AccountCommands::List { active, kind } => {
            let fetched = match (active, kind) {
                (true, _) => app.api().active_accounts().await,
                (false, Some(kind)) => app.api().accounts_by_type(kind).await,
                (false, None) => app.api().list_accounts().await,
            };
            let accounts = app.check(fetched)?;
            if accounts.is_empty() {
                println!("No accounts found.");
            } else {
                println!("{}", render::accounts_table(&accounts, &app.config.currency));
            }
            Ok(())
        }
        AccountCommands::Show { id } => {
            let fetched = app.api().get_account(id).await;
            let account = app.check(fetched)?;
            println!(
                "{}",
                render::accounts_table(std::slice::from_ref(&account), &app.config.currency)
            );
            if let Some(description) = &account.description {
                println!("{description}");
            }
            Ok(())
        }
        AccountCommands::Add {
            name,
            kind,
            balance,
            currency,
            description,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                bail!("Account name must not be empty");
            }
            let draft = Account {
                id: None,
                name,
                account_type: kind,
                balance,
                currency: Some(currency.unwrap_or_else(|| app.config.currency.clone())),
                description,
                is_active: true,
                created_at: None,
                updated_at: None,
            };
            let created = app.api().create_account(&draft).await;
            let created = app.check(created)?;
            println!(
                "Created account {} ({})",
                created.name,
                created.id.map_or_else(|| "?".to_string(), |id| id.to_string())
            );
            Ok(())
        }
        AccountCommands::SetBalance { id, balance } => {
            let updated = app.api().update_account_balance(id, balance).await;
            let account = app.check(updated)?;
            let currency = account.currency.as_deref().unwrap_or(&app.config.currency);
            println!(
                "{} balance is now {}",
                account.name,
                render::money(account.balance, currency)
            );
            Ok(())
        }
        AccountCommands::SetActive { id, active } => {
            let fetched = app.api().get_account(id).await;
            let mut account = app.check(fetched)?;
            account.is_active = active;
            let updated = app.api().update_account(id, &account).await;
            let account = app.check(updated)?;
            let status = if account.is_active { "active" } else { "inactive" };
            println!("{} is now {status}", account.name);
            Ok(())
        }
        AccountCommands::Delete { id } => {
            let deleted = app.api().delete_account(id).await;
            app.check(deleted)?;
            println!("Deleted account {id}");
            Ok(())
        }
    }
}
