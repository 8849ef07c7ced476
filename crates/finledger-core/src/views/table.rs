//! Filtering and sorting for the transaction table.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::models::{Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Description,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "description" => Ok(SortKey::Description),
            other => Err(format!(
                "Unknown sort key '{other}' (expected date, amount or description)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
    /// Inclusive.
    pub from: Option<NaiveDate>,
    /// Inclusive.
    pub to: Option<NaiveDate>,
    /// Case-insensitive match against description and notes.
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if self.kind.is_some_and(|kind| txn.transaction_type != kind) {
            return false;
        }
        if self.account_id.is_some_and(|id| txn.account.id != id) {
            return false;
        }
        if let Some(id) = self.category_id
            && txn.category.as_ref().is_none_or(|c| c.id != id)
        {
            return false;
        }
        if self.from.is_some_and(|from| txn.transaction_date < from) {
            return false;
        }
        if self.to.is_some_and(|to| txn.transaction_date > to) {
            return false;
        }
        if let Some(needle) = self.search.as_deref().map(str::trim)
            && !needle.is_empty()
        {
            let needle = needle.to_lowercase();
            let in_description = txn.description.to_lowercase().contains(&needle);
            let in_notes = txn
                .notes
                .as_deref()
                .is_some_and(|notes| notes.to_lowercase().contains(&needle));
            if !in_description && !in_notes {
                return false;
            }
        }
        true
    }

    /// Matching transactions, sorted. Ties keep their input order.
    pub fn apply<'a>(
        &self,
        transactions: &'a [Transaction],
        key: SortKey,
        order: SortOrder,
    ) -> Vec<&'a Transaction> {
        let mut rows: Vec<&Transaction> = transactions.iter().filter(|t| self.matches(t)).collect();
        rows.sort_by(|a, b| {
            let ordering = compare(a, b, key);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        rows
    }
}

fn compare(a: &Transaction, b: &Transaction, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.transaction_date.cmp(&b.transaction_date),
        SortKey::Amount => a.amount.cmp(&b.amount),
        SortKey::Description => a
            .description
            .to_lowercase()
            .cmp(&b.description.to_lowercase()),
    }
}
