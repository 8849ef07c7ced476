use rust_decimal::Decimal;

use super::{ApiClient, ApiError};
use crate::models::{Account, AccountType};

impl ApiClient {
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.get("/accounts").await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn active_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.get("/accounts/active").await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn accounts_by_type(&self, kind: AccountType) -> Result<Vec<Account>, ApiError> {
        self.get(&format!("/accounts/type/{kind}")).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn get_account(&self, id: i64) -> Result<Account, ApiError> {
        self.get(&format!("/accounts/{id}")).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn create_account(&self, account: &Account) -> Result<Account, ApiError> {
        self.post("/accounts", account).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn update_account(&self, id: i64, account: &Account) -> Result<Account, ApiError> {
        self.put(&format!("/accounts/{id}"), account).await
    }

    /// Sets the balance directly (`PUT /accounts/{id}/balance?balance=`).
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn update_account_balance(
        &self,
        id: i64,
        balance: Decimal,
    ) -> Result<Account, ApiError> {
        self.put_empty(&format!("/accounts/{id}/balance?balance={balance}"))
            .await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn delete_account(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/accounts/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::session::SessionHandle;
    use crate::session::storage::MemoryStorage;

    fn client(server: &MockServer) -> ApiClient {
        let session = SessionHandle::new(Arc::new(MemoryStorage::new()));
        session.hydrate();
        ApiClient::new(&server.uri(), session, None).unwrap()
    }

    #[tokio::test]
    async fn test_update_balance_sends_query_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/accounts/2/balance"))
            .and(query_param("balance", "1500.25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 2,
                "name": "Checking",
                "accountType": "BANK",
                "balance": 1500.25,
                "isActive": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let account = client(&server)
            .update_account_balance(2, "1500.25".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(account.account_type, AccountType::Bank);
        assert_eq!(account.balance, "1500.25".parse::<Decimal>().unwrap());
    }

    #[tokio::test]
    async fn test_accounts_by_type_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts/type/CREDIT_CARD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let accounts = client(&server)
            .accounts_by_type(AccountType::CreditCard)
            .await
            .unwrap();
        assert!(accounts.is_empty());
    }
}
