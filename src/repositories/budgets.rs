use crate::models::budgets::{Budget, NewBudget};

use super::{Api, ApiError};

#[derive(Clone)]
pub struct BudgetRepository {
    api: Api,
}

impl BudgetRepository {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Budget>, ApiError> {
        self.api.get(&format!("/api/budgets/{user_id}")).await
    }

    pub async fn create(&self, budget: &NewBudget) -> Result<Budget, ApiError> {
        self.api.post("/api/budgets/", budget).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.delete(&format!("/api/budgets/{id}")).await?;
        Ok(())
    }
}
