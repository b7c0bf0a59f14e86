use serde::{Deserialize, Serialize};

use super::amount;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SavingsEntry {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(deserialize_with = "amount::deserialize")]
    pub goal: f64,
    #[serde(deserialize_with = "amount::deserialize")]
    pub saved: f64,
    pub month: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewSavingsEntry {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub goal: f64,
    pub saved: f64,
    pub month: String,
}
