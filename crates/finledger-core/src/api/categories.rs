use super::{ApiClient, ApiError};
use crate::models::{Category, CategoryType};

impl ApiClient {
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/categories").await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn categories_by_type(&self, kind: CategoryType) -> Result<Vec<Category>, ApiError> {
        self.get(&format!("/categories/type/{kind}")).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn get_category(&self, id: i64) -> Result<Category, ApiError> {
        self.get(&format!("/categories/{id}")).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn create_category(&self, category: &Category) -> Result<Category, ApiError> {
        self.post("/categories", category).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn update_category(
        &self,
        id: i64,
        category: &Category,
    ) -> Result<Category, ApiError> {
        self.put(&format!("/categories/{id}"), category).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/categories/{id}")).await
    }
}
