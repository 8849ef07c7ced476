//! Category command handlers.

use anyhow::{Result, bail};
use finledger_core::models::{Category, CategoryType};

use crate::cli::app::App;
use crate::cli::render;

#[derive(clap::Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only this type (income, expense, both)
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<CategoryType>,
    },
    /// Show a single category
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Create a category
    Add {
        #[arg(long)]
        name: String,

        #[arg(long = "type", value_name = "TYPE")]
        kind: CategoryType,

        /// Display color, e.g. #ff8800
        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Rename a category
    Rename {
        #[arg(value_name = "ID")]
        id: i64,

        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Delete a category
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

pub async fn run(app: &mut App, command: CategoryCommands) -> Result<()> {
    match command {
        CategoryCommands::List { kind } => {
            let fetched = match kind {
                Some(kind) => app.api().categories_by_type(kind).await,
                None => app.api().list_categories().await,
            };
            let categories = app.check(fetched)?;
            if categories.is_empty() {
                println!("No categories found.");
            } else {
                println!("{}", render::categories_table(&categories));
            }
            Ok(())
        }
        CategoryCommands::Show { id } => {
            let fetched = app.api().get_category(id).await;
            let category = app.check(fetched)?;
            println!("{}", render::categories_table(std::slice::from_ref(&category)));
            Ok(())
        }
        CategoryCommands::Add {
            name,
            kind,
            color,
            icon,
            description,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                bail!("Category name must not be empty");
            }
            let draft = Category {
                id: None,
                name,
                color,
                icon,
                description,
                transaction_type: kind,
            };
            let created = app.api().create_category(&draft).await;
            let created = app.check(created)?;
            println!(
                "Created category {} ({})",
                created.name,
                created.id.map_or_else(|| "?".to_string(), |id| id.to_string())
            );
            Ok(())
        }
        CategoryCommands::Rename { id, name } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                bail!("Category name must not be empty");
            }
            let fetched = app.api().get_category(id).await;
            let mut category = app.check(fetched)?;
            category.name = name;
            let updated = app.api().update_category(id, &category).await;
            let category = app.check(updated)?;
            println!("Renamed category {id} to {}", category.name);
            Ok(())
        }
        CategoryCommands::Delete { id } => {
            let deleted = app.api().delete_category(id).await;
            app.check(deleted)?;
            println!("Deleted category {id}");
            Ok(())
        }
    }
}
