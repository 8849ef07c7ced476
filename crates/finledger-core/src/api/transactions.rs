use super::{ApiClient, ApiError};
use crate::models::{Transaction, TransactionType};

impl ApiClient {
    /// `GET /transactions`
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.get("/transactions").await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn get_transaction(&self, id: i64) -> Result<Transaction, ApiError> {
        self.get(&format!("/transactions/{id}")).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn transactions_by_type(
        &self,
        kind: TransactionType,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.get(&format!("/transactions/type/{kind}")).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn transactions_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.get(&format!("/transactions/category/{category_id}"))
            .await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn transactions_by_account(
        &self,
        account_id: i64,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.get(&format!("/transactions/account/{account_id}")).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn create_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Transaction, ApiError> {
        self.post("/transactions", transaction).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn update_transaction(
        &self,
        id: i64,
        transaction: &Transaction,
    ) -> Result<Transaction, ApiError> {
        self.put(&format!("/transactions/{id}"), transaction).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/transactions/{id}")).await
    }
}
