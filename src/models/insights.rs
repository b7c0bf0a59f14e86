use serde::{Deserialize, Serialize};

use super::amount;

#[derive(Clone, Debug, Deserialize)]
pub struct Prediction {
    #[serde(deserialize_with = "amount::deserialize")]
    pub prediction: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Recommendations {
    pub tips: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlanItem {
    #[serde(default)]
    pub label: String,
    #[serde(deserialize_with = "amount::deserialize")]
    pub amount: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AutoBudgetPlan {
    pub plan: Vec<PlanItem>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SavingsChallenge {
    pub challenge: String,
}
