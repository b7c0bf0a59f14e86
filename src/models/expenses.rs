use serde::{Deserialize, Serialize};

use super::amount;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Expense {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(deserialize_with = "amount::deserialize")]
    pub amount: f64,
    pub category: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewExpense {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExpenseUpdate {
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub description: String,
}
