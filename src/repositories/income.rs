use crate::models::income::{Income, NewIncome};

use super::{Api, ApiError};

#[derive(Clone)]
pub struct IncomeRepository {
    api: Api,
}

impl IncomeRepository {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Income>, ApiError> {
        self.api.get(&format!("/api/income/{user_id}")).await
    }

    pub async fn create(&self, income: &NewIncome) -> Result<Income, ApiError> {
        self.api.post("/api/income/", income).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.delete(&format!("/api/income/{id}")).await?;
        Ok(())
    }
}
