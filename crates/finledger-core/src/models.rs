//! Ledger entities as exchanged with the backend.
//!
//! The backend owns and validates these; the client only renders and submits
//! them. Field names follow the backend's camelCase JSON.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of money movement recorded by a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
            TransactionType::Transfer => "TRANSFER",
        }
    }

    /// Sign prefix used when displaying an amount of this type.
    pub fn sign(&self) -> &'static str {
        match self {
            TransactionType::Income => "+",
            TransactionType::Expense => "-",
            TransactionType::Transfer => "",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            "TRANSFER" => Ok(TransactionType::Transfer),
            other => Err(format!(
                "Unknown transaction type '{other}' (expected income, expense or transfer)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Cash,
    Bank,
    Card,
    CreditCard,
    Investment,
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Cash => "CASH",
            AccountType::Bank => "BANK",
            AccountType::Card => "CARD",
            AccountType::CreditCard => "CREDIT_CARD",
            AccountType::Investment => "INVESTMENT",
            AccountType::Savings => "SAVINGS",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "CASH" => Ok(AccountType::Cash),
            "BANK" => Ok(AccountType::Bank),
            "CARD" => Ok(AccountType::Card),
            "CREDIT_CARD" => Ok(AccountType::CreditCard),
            "INVESTMENT" => Ok(AccountType::Investment),
            "SAVINGS" => Ok(AccountType::Savings),
            other => Err(format!("Unknown account type '{other}'")),
        }
    }
}

/// Which transaction types a category applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryType {
    Income,
    Expense,
    Both,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "INCOME",
            CategoryType::Expense => "EXPENSE",
            CategoryType::Both => "BOTH",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(CategoryType::Income),
            "EXPENSE" => Ok(CategoryType::Expense),
            "BOTH" => Ok(CategoryType::Both),
            other => Err(format!("Unknown category type '{other}'")),
        }
    }
}

/// Reference to another entity by id, optionally carrying its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityRef {
    pub fn id(id: i64) -> Self {
        Self { id, name: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub transaction_date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EntityRef>,
    pub account: EntityRef,
    /// Destination account for transfers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_account: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl Transaction {
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.name.as_deref())
    }

    pub fn account_name(&self) -> Option<&str> {
        self.account.name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub account_type: AccountType,
    pub balance: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub transaction_type: CategoryType,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_parses_backend_json() {
        let json = r#"{
            "id": 7,
            "transactionDate": "2024-03-05",
            "description": "Lunch",
            "amount": 12500.50,
            "transactionType": "EXPENSE",
            "category": {"id": 2, "name": "Food"},
            "account": {"id": 1, "name": "Wallet"},
            "targetAccount": null,
            "notes": null,
            "createdAt": "2024-03-05T12:00:00"
        }"#;

        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.id, Some(7));
        assert_eq!(txn.transaction_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(txn.amount, "12500.50".parse::<Decimal>().unwrap());
        assert_eq!(txn.transaction_type, TransactionType::Expense);
        assert_eq!(txn.category_name(), Some("Food"));
        assert!(txn.target_account.is_none());
    }

    #[test]
    fn test_transaction_serializes_camel_case_without_timestamps() {
        let txn = Transaction {
            id: None,
            transaction_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            description: "Salary".to_string(),
            amount: Decimal::new(300_000, 0),
            transaction_type: TransactionType::Income,
            category: None,
            account: EntityRef::id(1),
            target_account: None,
            notes: None,
            created_at: Some("ignored".to_string()),
            updated_at: None,
        };

        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["transactionDate"], "2024-01-02");
        assert_eq!(value["transactionType"], "INCOME");
        assert_eq!(value["account"]["id"], 1);
        assert!(value.get("createdAt").is_none());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_account_type_round_trips_screaming_case() {
        let account: Account = serde_json::from_str(
            r#"{"id":1,"name":"Visa","accountType":"CREDIT_CARD","balance":-10,"currency":"KRW","isActive":true}"#,
        )
        .unwrap();
        assert_eq!(account.account_type, AccountType::CreditCard);
        assert_eq!("credit-card".parse::<AccountType>().unwrap(), AccountType::CreditCard);
    }

    #[test]
    fn test_type_parsing_is_case_insensitive() {
        assert_eq!("income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!("Both".parse::<CategoryType>().unwrap(), CategoryType::Both);
        assert!("refund".parse::<TransactionType>().is_err());
    }
}
