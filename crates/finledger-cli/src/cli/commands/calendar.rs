//! Calendar (home) view.

use anyhow::{Result, anyhow};
use chrono::Local;
use comfy_table::{ContentArrangement, Table};
use finledger_core::views::{CalendarDay, CalendarMonth, YearMonth};

use crate::cli::app::App;
use crate::cli::render;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub async fn show(app: &mut App, month: Option<&str>) -> Result<()> {
    let today = Local::now().date_naive();
    let month = match month {
        Some(month) => month.parse::<YearMonth>().map_err(|e| anyhow!(e))?,
        None => YearMonth::of(today),
    };

    let fetched = app.api().list_transactions().await;
    let transactions = app.check(fetched)?;
    let grid = CalendarMonth::build(month, &transactions, today);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(WEEKDAYS.to_vec());
    for week in grid.weeks() {
        table.add_row(
            week.iter()
                .map(|day| cell(day, &app.config.currency))
                .collect::<Vec<_>>(),
        );
    }

    println!("{month}");
    println!("{table}");
    println!("prev: {}  next: {}", month.previous(), month.next());
    Ok(())
}

fn cell(day: &CalendarDay<'_>, currency: &str) -> String {
    if !day.is_current_month {
        return String::new();
    }
    let mut lines = vec![if day.is_today {
        format!("[{}]", day.day)
    } else {
        day.day.to_string()
    }];
    if !day.total_income.is_zero() {
        lines.push(format!("+{}", render::money(day.total_income, currency)));
    }
    if !day.total_expense.is_zero() {
        lines.push(format!("-{}", render::money(day.total_expense, currency)));
    }
    lines.join("\n")
}
