use serde::{Deserialize, Serialize};

use super::amount;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Income {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(deserialize_with = "amount::deserialize")]
    pub amount: f64,
    pub month: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewIncome {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub amount: f64,
    pub month: String,
}
