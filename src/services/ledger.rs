use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::budgets::{Budget, NewBudget};
use crate::models::expenses::{Expense, ExpenseUpdate, NewExpense};
use crate::models::income::{Income, NewIncome};
use crate::models::savings::{NewSavingsEntry, SavingsEntry};
use crate::repositories::budgets::BudgetRepository;
use crate::repositories::expenses::ExpenseRepository;
use crate::repositories::income::IncomeRepository;
use crate::repositories::savings::SavingsRepository;
use crate::repositories::Api;

/// Mutations for the four entity collections. A failed mutation answers with
/// the typed error and triggers nothing else; the UI decides whether to
/// refresh afterwards.
pub enum LedgerRequest {
    CreateExpense {
        expense: NewExpense,
        response: oneshot::Sender<Result<Expense, ServiceError>>,
    },
    UpdateExpense {
        id: String,
        update: ExpenseUpdate,
        response: oneshot::Sender<Result<Expense, ServiceError>>,
    },
    DeleteExpense {
        id: String,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
    CreateBudget {
        budget: NewBudget,
        response: oneshot::Sender<Result<Budget, ServiceError>>,
    },
    DeleteBudget {
        id: String,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
    CreateIncome {
        income: NewIncome,
        response: oneshot::Sender<Result<Income, ServiceError>>,
    },
    DeleteIncome {
        id: String,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
    CreateSavings {
        entry: NewSavingsEntry,
        response: oneshot::Sender<Result<SavingsEntry, ServiceError>>,
    },
    DeleteSavings {
        id: String,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
}

#[derive(Clone)]
pub struct LedgerRequestHandler {
    expenses: ExpenseRepository,
    budgets: BudgetRepository,
    income: IncomeRepository,
    savings: SavingsRepository,
}

impl LedgerRequestHandler {
    pub fn new(api: Api) -> Self {
        Self {
            expenses: ExpenseRepository::new(api.clone()),
            budgets: BudgetRepository::new(api.clone()),
            income: IncomeRepository::new(api.clone()),
            savings: SavingsRepository::new(api),
        }
    }
}

#[async_trait]
impl RequestHandler<LedgerRequest> for LedgerRequestHandler {
    async fn handle_request(&self, request: LedgerRequest) {
        match request {
            LedgerRequest::CreateExpense { expense, response } => {
                let result = self.expenses.create(&expense).await;
                let _ = response.send(result.map_err(ServiceError::Api));
            }
            LedgerRequest::UpdateExpense {
                id,
                update,
                response,
            } => {
                let result = self.expenses.update(&id, &update).await;
                let _ = response.send(result.map_err(ServiceError::Api));
            }
            LedgerRequest::DeleteExpense { id, response } => {
                let result = self.expenses.delete(&id).await;
                let _ = response.send(result.map_err(ServiceError::Api));
            }
            LedgerRequest::CreateBudget { budget, response } => {
                let result = self.budgets.create(&budget).await;
                let _ = response.send(result.map_err(ServiceError::Api));
            }
            LedgerRequest::DeleteBudget { id, response } => {
                let result = self.budgets.delete(&id).await;
                let _ = response.send(result.map_err(ServiceError::Api));
            }
            LedgerRequest::CreateIncome { income, response } => {
                let result = self.income.create(&income).await;
                let _ = response.send(result.map_err(ServiceError::Api));
            }
            LedgerRequest::DeleteIncome { id, response } => {
                let result = self.income.delete(&id).await;
                let _ = response.send(result.map_err(ServiceError::Api));
            }
            LedgerRequest::CreateSavings { entry, response } => {
                let result = self.savings.create(&entry).await;
                let _ = response.send(result.map_err(ServiceError::Api));
            }
            LedgerRequest::DeleteSavings { id, response } => {
                let result = self.savings.delete(&id).await;
                let _ = response.send(result.map_err(ServiceError::Api));
            }
        }
    }
}

pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        LedgerService {}
    }
}

#[async_trait]
impl Service<LedgerRequest, LedgerRequestHandler> for LedgerService {}
