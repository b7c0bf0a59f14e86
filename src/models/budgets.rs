use serde::{Deserialize, Serialize};

use super::amount;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Budget {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub category: String,
    #[serde(deserialize_with = "amount::deserialize")]
    pub amount: f64,
    /// Month key, `YYYY-MM`.
    pub month: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewBudget {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub category: String,
    pub amount: f64,
    pub month: String,
}
