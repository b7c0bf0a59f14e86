use crate::models::savings::{NewSavingsEntry, SavingsEntry};

use super::{Api, ApiError};

#[derive(Clone)]
pub struct SavingsRepository {
    api: Api,
}

impl SavingsRepository {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<SavingsEntry>, ApiError> {
        self.api.get(&format!("/api/savings/{user_id}")).await
    }

    pub async fn list_for_month(
        &self,
        user_id: &str,
        month: &str,
    ) -> Result<Vec<SavingsEntry>, ApiError> {
        self.api
            .get(&format!("/api/savings/{user_id}?month={month}"))
            .await
    }

    pub async fn create(&self, entry: &NewSavingsEntry) -> Result<SavingsEntry, ApiError> {
        self.api.post("/api/savings/", entry).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.delete(&format!("/api/savings/{id}")).await?;
        Ok(())
    }
}
