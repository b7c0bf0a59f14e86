use crate::models::expenses::{Expense, ExpenseUpdate, NewExpense};

use super::{Api, ApiError};

#[derive(Clone)]
pub struct ExpenseRepository {
    api: Api,
}

impl ExpenseRepository {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Expense>, ApiError> {
        self.api.get(&format!("/api/expenses/{user_id}")).await
    }

    pub async fn create(&self, expense: &NewExpense) -> Result<Expense, ApiError> {
        self.api.post("/api/expenses/", expense).await
    }

    pub async fn update(&self, id: &str, update: &ExpenseUpdate) -> Result<Expense, ApiError> {
        self.api.put(&format!("/api/expenses/{id}"), update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.delete(&format!("/api/expenses/{id}")).await?;
        Ok(())
    }
}
