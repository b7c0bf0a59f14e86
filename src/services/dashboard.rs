use async_trait::async_trait;
use tokio::sync::mpsc;

use super::aggregation::{
    self, BudgetVsSavingsPoint, CategoryRemaining, CategoryTotal, MonthlyTotal, PlanShare,
};
use super::{RequestHandler, Service, ServiceError};
use crate::models::budgets::Budget;
use crate::models::expenses::Expense;
use crate::models::income::Income;
use crate::models::insights::PlanItem;
use crate::models::savings::SavingsEntry;
use crate::repositories::budgets::BudgetRepository;
use crate::repositories::expenses::ExpenseRepository;
use crate::repositories::income::IncomeRepository;
use crate::repositories::insights::InsightsRepository;
use crate::repositories::savings::SavingsRepository;
use crate::repositories::Api;

pub enum DashboardRequest {
    Refresh {
        user_id: String,
        generation: u64,
        respond_to: mpsc::Sender<DashboardUpdate>,
    },
}

/// A refresh result tagged with the generation it was requested under, so the
/// UI can discard responses from superseded refreshes.
pub struct DashboardUpdate {
    pub generation: u64,
    pub snapshot: DashboardSnapshot,
}

/// One refresh cycle's worth of data. Every panel is its own `Result`: a
/// failed fetch leaves the other panels intact, and the UI keeps the prior
/// rendered state for the failed one.
pub struct DashboardSnapshot {
    pub month: String,
    pub expenses: Result<ExpensePanel, ServiceError>,
    pub budgets: Result<BudgetPanel, ServiceError>,
    pub income: Result<Vec<Income>, ServiceError>,
    pub savings: Result<Vec<SavingsEntry>, ServiceError>,
    pub remaining: Result<Vec<CategoryRemaining>, ServiceError>,
    pub budget_vs_savings: Result<Vec<BudgetVsSavingsPoint>, ServiceError>,
    pub prediction: Result<f64, ServiceError>,
    pub tips: Result<Vec<String>, ServiceError>,
    pub auto_budget: Result<Vec<PlanShare>, ServiceError>,
    pub challenge: Result<String, ServiceError>,
}

pub struct ExpensePanel {
    /// Date-descending for the table.
    pub rows: Vec<Expense>,
    /// Month-ascending for the trend chart.
    pub monthly_trend: Vec<MonthlyTotal>,
    /// Current-month totals per category.
    pub category_totals: Vec<CategoryTotal>,
}

pub struct BudgetPanel {
    /// Every row the backend returned, duplicates included, month-descending.
    pub rows: Vec<Budget>,
    /// Current-month allocation with percentage shares.
    pub allocation: Vec<PlanShare>,
}

#[derive(Clone)]
pub struct DashboardRequestHandler {
    expenses: ExpenseRepository,
    budgets: BudgetRepository,
    income: IncomeRepository,
    savings: SavingsRepository,
    insights: InsightsRepository,
}

impl DashboardRequestHandler {
    pub fn new(api: Api) -> Self {
        Self {
            expenses: ExpenseRepository::new(api.clone()),
            budgets: BudgetRepository::new(api.clone()),
            income: IncomeRepository::new(api.clone()),
            savings: SavingsRepository::new(api.clone()),
            insights: InsightsRepository::new(api),
        }
    }

    /// Fires all independent fetches at once and awaits them together; no
    /// fetch depends on another's result.
    async fn refresh(&self, user_id: &str) -> DashboardSnapshot {
        let month = current_month();

        let (expenses, budgets, income, savings, prediction, tips, auto_budget, challenge) = tokio::join!(
            self.expenses.list(user_id),
            self.budgets.list(user_id),
            self.income.list(user_id),
            self.savings.list(user_id),
            self.insights.predict(user_id),
            self.insights.recommend(user_id),
            self.insights.auto_budget(user_id),
            self.insights.savings_challenge(user_id),
        );

        // Cross-collection aggregates first, while the fetch results can
        // still be borrowed.
        let remaining = match (&budgets, &expenses) {
            (Ok(b), Ok(e)) => {
                aggregation::remaining_by_category(b, e, &month).map_err(ServiceError::from)
            }
            (Err(_), _) => Err(ServiceError::Dependency("budgets")),
            (_, Err(_)) => Err(ServiceError::Dependency("expenses")),
        };
        let budget_vs_savings = match (&budgets, &savings) {
            (Ok(b), Ok(s)) => aggregation::merge_monthly_series(b, s).map_err(ServiceError::from),
            (Err(_), _) => Err(ServiceError::Dependency("budgets")),
            (_, Err(_)) => Err(ServiceError::Dependency("savings")),
        };

        DashboardSnapshot {
            expenses: expenses
                .map_err(ServiceError::Api)
                .and_then(|rows| expense_panel(rows, &month)),
            budgets: budgets
                .map_err(ServiceError::Api)
                .and_then(|rows| budget_panel(rows, &month)),
            income: income.map_err(ServiceError::Api).map(|mut rows| {
                aggregation::sort_descending_by_month(&mut rows, |i| i.month.as_str());
                rows
            }),
            savings: savings.map_err(ServiceError::Api).map(|mut rows| {
                aggregation::sort_descending_by_month(&mut rows, |s| s.month.as_str());
                rows
            }),
            remaining,
            budget_vs_savings,
            prediction: prediction.map(|p| p.prediction).map_err(ServiceError::Api),
            tips: tips.map(|t| t.tips).map_err(ServiceError::Api),
            auto_budget: auto_budget
                .map_err(ServiceError::Api)
                .and_then(|p| aggregation::percentage_split(&p.plan).map_err(ServiceError::from)),
            challenge: challenge.map(|c| c.challenge).map_err(ServiceError::Api),
            month,
        }
    }
}

fn expense_panel(mut rows: Vec<Expense>, month: &str) -> Result<ExpensePanel, ServiceError> {
    let monthly_trend =
        aggregation::sum_by_month(&rows, |e| e.date.as_str(), |e| e.amount, |e| e.id.as_str())?;
    let category_totals = aggregation::sum_by_category(&rows, month)?;
    aggregation::sort_descending_by_month(&mut rows, |e| e.date.as_str());
    Ok(ExpensePanel {
        rows,
        monthly_trend,
        category_totals,
    })
}

fn budget_panel(mut rows: Vec<Budget>, month: &str) -> Result<BudgetPanel, ServiceError> {
    let plan: Vec<PlanItem> = rows
        .iter()
        .filter(|b| b.month == month)
        .map(|b| PlanItem {
            label: b.category.clone(),
            amount: b.amount,
        })
        .collect();
    let allocation = aggregation::percentage_split(&plan)?;
    aggregation::sort_descending_by_month(&mut rows, |b| b.month.as_str());
    Ok(BudgetPanel { rows, allocation })
}

pub fn current_month() -> String {
    chrono::Utc::now().format("%Y-%m").to_string()
}

#[async_trait]
impl RequestHandler<DashboardRequest> for DashboardRequestHandler {
    async fn handle_request(&self, request: DashboardRequest) {
        match request {
            DashboardRequest::Refresh {
                user_id,
                generation,
                respond_to,
            } => {
                let snapshot = self.refresh(&user_id).await;
                if let Err(e) = respond_to
                    .send(DashboardUpdate {
                        generation,
                        snapshot,
                    })
                    .await
                {
                    log::warn!("Dropping refresh result, receiver gone: {e}");
                }
            }
        }
    }
}

pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        DashboardService {}
    }
}

#[async_trait]
impl Service<DashboardRequest, DashboardRequestHandler> for DashboardService {}
