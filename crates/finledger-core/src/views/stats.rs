use rust_decimal::Decimal;

use crate::models::{Transaction, TransactionType};

/// Totals over a set of transactions. Transfers count in neither column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

pub fn summarize(transactions: &[Transaction]) -> Summary {
    let income = total_of(transactions, TransactionType::Income);
    let expense = total_of(transactions, TransactionType::Expense);
    Summary {
        income,
        expense,
        balance: income - expense,
    }
}

pub(crate) fn total_of<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    kind: TransactionType,
) -> Decimal {
    transactions
        .into_iter()
        .filter(|t| t.transaction_type == kind)
        .map(|t| t.amount)
        .sum()
}

/// The `limit` most recent transactions, newest first.
///
/// Same-day transactions keep their input order.
pub fn recent(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::models::{EntityRef, Transaction, TransactionType};

    pub fn txn(id: i64, date: &str, kind: TransactionType, amount: i64) -> Transaction {
        Transaction {
            id: Some(id),
            transaction_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description: format!("txn {id}"),
            amount: Decimal::new(amount, 0),
            transaction_type: kind,
            category: None,
            account: EntityRef::id(1),
            target_account: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }
}
