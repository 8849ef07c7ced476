//! Terminal rendering helpers.

use comfy_table::{CellAlignment, ContentArrangement, Row, Table};
use finledger_core::models::{Account, Category, EntityRef, Transaction};
use rust_decimal::Decimal;

/// Formats an amount with thousands separators and the currency code.
///
/// Whole amounts are shown without decimals.
pub fn money(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp(2).normalize();
    let text = rounded.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction:0<2} {currency}"),
        None => format!("{sign}{grouped} {currency}"),
    }
}

/// Amount prefixed with the sign of its transaction type.
pub fn signed_amount(txn: &Transaction, currency: &str) -> String {
    format!("{}{}", txn.transaction_type.sign(), money(txn.amount, currency))
}

pub fn entity(entity: &EntityRef) -> String {
    entity
        .name
        .clone()
        .unwrap_or_else(|| format!("#{}", entity.id))
}

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn right_align_last(table: &mut Table) {
    let last = table.column_count().saturating_sub(1);
    if let Some(column) = table.column_mut(last) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}

fn id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

pub fn transactions_table(rows: &[&Transaction], currency: &str) -> Table {
    let mut table = table(&[
        "ID",
        "Date",
        "Type",
        "Description",
        "Category",
        "Account",
        "Amount",
    ]);
    for txn in rows {
        let account = match &txn.target_account {
            Some(target) => format!("{} → {}", entity(&txn.account), entity(target)),
            None => entity(&txn.account),
        };
        table.add_row(Row::from(vec![
            id(txn.id),
            txn.transaction_date.to_string(),
            txn.transaction_type.to_string(),
            txn.description.clone(),
            txn.category.as_ref().map(entity).unwrap_or_default(),
            account,
            signed_amount(txn, currency),
        ]));
    }
    right_align_last(&mut table);
    table
}

pub fn accounts_table(accounts: &[Account], default_currency: &str) -> Table {
    let mut table = table(&["ID", "Name", "Type", "Active", "Balance"]);
    for account in accounts {
        let currency = account.currency.as_deref().unwrap_or(default_currency);
        table.add_row(Row::from(vec![
            id(account.id),
            account.name.clone(),
            account.account_type.to_string(),
            if account.is_active { "yes" } else { "no" }.to_string(),
            money(account.balance, currency),
        ]));
    }
    right_align_last(&mut table);
    table
}

pub fn categories_table(categories: &[Category]) -> Table {
    let mut table = table(&["ID", "Name", "Type", "Color", "Description"]);
    for category in categories {
        table.add_row(Row::from(vec![
            id(category.id),
            category.name.clone(),
            category.transaction_type.to_string(),
            category.color.clone().unwrap_or_default(),
            category.description.clone().unwrap_or_default(),
        ]));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_money_groups_thousands() {
        assert_eq!(money(dec("1234567"), "KRW"), "1,234,567 KRW");
        assert_eq!(money(dec("999"), "KRW"), "999 KRW");
        assert_eq!(money(dec("0"), "KRW"), "0 KRW");
    }

    #[test]
    fn test_money_keeps_cents() {
        assert_eq!(money(dec("12500.5"), "USD"), "12,500.50 USD");
        assert_eq!(money(dec("-1000.256"), "USD"), "-1,000.26 USD");
        assert_eq!(money(dec("100.00"), "USD"), "100 USD");
    }

    #[test]
    fn test_entity_falls_back_to_id() {
        assert_eq!(entity(&EntityRef::id(4)), "#4");
    }
}
