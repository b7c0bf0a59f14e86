use crate::models::insights::{AutoBudgetPlan, Prediction, Recommendations, SavingsChallenge};

use super::{Api, ApiError};

/// Read-only AI endpoints. Each one is an independent fetch; the dashboard
/// treats their failures independently as well.
#[derive(Clone)]
pub struct InsightsRepository {
    api: Api,
}

impl InsightsRepository {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn predict(&self, user_id: &str) -> Result<Prediction, ApiError> {
        self.api.get(&format!("/api/ai/predict/{user_id}")).await
    }

    pub async fn recommend(&self, user_id: &str) -> Result<Recommendations, ApiError> {
        self.api.get(&format!("/api/ai/recommend/{user_id}")).await
    }

    pub async fn auto_budget(&self, user_id: &str) -> Result<AutoBudgetPlan, ApiError> {
        self.api.get(&format!("/api/ai/autobudget/{user_id}")).await
    }

    pub async fn savings_challenge(&self, user_id: &str) -> Result<SavingsChallenge, ApiError> {
        self.api.get(&format!("/api/ai/challenges/{user_id}")).await
    }
}
