pub mod amount;
pub mod auth;
pub mod budgets;
pub mod expenses;
pub mod income;
pub mod insights;
pub mod savings;
