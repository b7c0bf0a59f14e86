use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::TableState;
use tokio::sync::{mpsc, oneshot};

use super::input::LineEdit;
use super::util;
use crate::models::auth::Session;
use crate::models::budgets::{Budget, NewBudget};
use crate::models::expenses::{Expense, ExpenseUpdate, NewExpense};
use crate::models::income::{Income, NewIncome};
use crate::models::savings::{NewSavingsEntry, SavingsEntry};
use crate::services::aggregation::{
    BudgetVsSavingsPoint, CategoryRemaining, CategoryTotal, MonthlyTotal, PlanShare,
};
use crate::services::auth::AuthRequest;
use crate::services::dashboard::{self, DashboardRequest, DashboardSnapshot, DashboardUpdate};
use crate::services::ledger::LedgerRequest;
use crate::services::ServiceChannels;
use crate::settings::Settings;

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Login,
    Overview,
    Expenses,
    Budgets,
    Income,
    Savings,
    Insights,
    Help,
}

const CYCLE: [Tab; 6] = [
    Tab::Overview,
    Tab::Expenses,
    Tab::Budgets,
    Tab::Income,
    Tab::Savings,
    Tab::Insights,
];

pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
    expires: Instant,
}

/// Latest good value per panel. A failed refresh never clears a panel; the
/// previous data stays on screen.
#[derive(Default)]
pub struct DashboardData {
    pub month: String,
    pub expenses: Vec<Expense>,
    pub monthly_trend: Vec<MonthlyTotal>,
    pub category_totals: Vec<CategoryTotal>,
    pub budgets: Vec<Budget>,
    pub allocation: Vec<PlanShare>,
    pub remaining: Vec<CategoryRemaining>,
    pub income: Vec<Income>,
    pub savings: Vec<SavingsEntry>,
    pub budget_vs_savings: Vec<BudgetVsSavingsPoint>,
    pub prediction: Option<f64>,
    pub tips: Vec<String>,
    pub auto_budget: Vec<PlanShare>,
    pub challenge: Option<String>,
}

#[derive(Default)]
pub struct LoginForm {
    pub signup_mode: bool,
    pub name: LineEdit,
    pub email: LineEdit,
    pub password: LineEdit,
    pub focus: usize,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl LoginForm {
    fn fresh() -> Self {
        let mut form = LoginForm::default();
        form.password.password = true;
        form
    }

    fn field_count(&self) -> usize {
        if self.signup_mode {
            3
        } else {
            2
        }
    }
}

#[derive(Default)]
pub struct ExpenseForm {
    /// Id of the expense being edited; `None` when adding.
    pub editing: Option<String>,
    pub amount: LineEdit,
    pub category: LineEdit,
    pub date: LineEdit,
    pub description: LineEdit,
    pub focus: usize,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct BudgetForm {
    pub category: LineEdit,
    pub amount: LineEdit,
    pub month: LineEdit,
    pub focus: usize,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct IncomeForm {
    pub amount: LineEdit,
    pub month: LineEdit,
    pub focus: usize,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct SavingsForm {
    pub goal: LineEdit,
    pub saved: LineEdit,
    pub month: LineEdit,
    pub focus: usize,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct ExpensesPage {
    pub table: TableState,
    pub form: ExpenseForm,
    pub form_open: bool,
}

#[derive(Default)]
pub struct BudgetsPage {
    pub table: TableState,
    pub form: BudgetForm,
    pub form_open: bool,
}

#[derive(Default)]
pub struct IncomePage {
    pub table: TableState,
    pub form: IncomeForm,
    pub form_open: bool,
}

#[derive(Default)]
pub struct SavingsPage {
    pub table: TableState,
    pub form: SavingsForm,
    pub form_open: bool,
}

pub struct App {
    channels: ServiceChannels,
    pub session: Option<Session>,
    pub tab: Tab,
    pub quit: bool,
    pub status: Option<StatusLine>,
    pub high_budget_threshold: f64,
    /// Bumped on every refresh request; updates tagged with an older value
    /// belong to a superseded refresh and are dropped.
    generation: u64,
    updates_tx: mpsc::Sender<DashboardUpdate>,
    updates_rx: mpsc::Receiver<DashboardUpdate>,
    pub data: DashboardData,
    pub login: LoginForm,
    pub expenses: ExpensesPage,
    pub budgets: BudgetsPage,
    pub income: IncomePage,
    pub savings: SavingsPage,
}

impl App {
    pub fn new(channels: ServiceChannels, session: Option<Session>, settings: &Settings) -> Self {
        let (updates_tx, updates_rx) = mpsc::channel(8);
        let tab = if session.is_some() {
            Tab::Overview
        } else {
            Tab::Login
        };

        Self {
            channels,
            session,
            tab,
            quit: false,
            status: None,
            high_budget_threshold: settings.ui.high_budget_threshold,
            generation: 0,
            updates_tx,
            updates_rx,
            data: DashboardData::default(),
            login: LoginForm::fresh(),
            expenses: ExpensesPage::default(),
            budgets: BudgetsPage::default(),
            income: IncomePage::default(),
            savings: SavingsPage::default(),
        }
    }

    // ============= status line =============

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error,
            expires: Instant::now() + STATUS_TTL,
        });
    }

    pub fn expire_status(&mut self) {
        if let Some(status) = &self.status {
            if Instant::now() >= status.expires {
                self.status = None;
            }
        }
    }

    // ============= refresh cycle =============

    pub async fn request_refresh(&mut self) {
        let Some(session) = &self.session else { return };
        self.generation += 1;
        let request = DashboardRequest::Refresh {
            user_id: session.user_id.clone(),
            generation: self.generation,
            respond_to: self.updates_tx.clone(),
        };
        if self.channels.dashboard.send(request).await.is_err() {
            log::error!("Dashboard service is gone.");
        }
    }

    pub fn drain_updates(&mut self) {
        while let Ok(update) = self.updates_rx.try_recv() {
            if update.generation < self.generation {
                log::debug!(
                    "Discarding stale refresh (generation {} < {}).",
                    update.generation,
                    self.generation
                );
                continue;
            }
            self.apply_snapshot(update.snapshot);
        }
    }

    fn apply_snapshot(&mut self, snapshot: DashboardSnapshot) {
        let mut failed: Vec<&str> = Vec::new();
        self.data.month = snapshot.month;

        match snapshot.expenses {
            Ok(panel) => {
                self.data.expenses = panel.rows;
                self.data.monthly_trend = panel.monthly_trend;
                self.data.category_totals = panel.category_totals;
            }
            Err(e) => {
                log::warn!("Expenses panel refresh failed: {e}");
                failed.push("expenses");
            }
        }
        match snapshot.budgets {
            Ok(panel) => {
                self.data.budgets = panel.rows;
                self.data.allocation = panel.allocation;
            }
            Err(e) => {
                log::warn!("Budgets panel refresh failed: {e}");
                failed.push("budgets");
            }
        }
        match snapshot.income {
            Ok(rows) => self.data.income = rows,
            Err(e) => {
                log::warn!("Income panel refresh failed: {e}");
                failed.push("income");
            }
        }
        match snapshot.savings {
            Ok(rows) => self.data.savings = rows,
            Err(e) => {
                log::warn!("Savings panel refresh failed: {e}");
                failed.push("savings");
            }
        }
        match snapshot.remaining {
            Ok(rows) => self.data.remaining = rows,
            Err(e) => {
                log::warn!("Remaining-by-category refresh failed: {e}");
                failed.push("remaining");
            }
        }
        match snapshot.budget_vs_savings {
            Ok(points) => self.data.budget_vs_savings = points,
            Err(e) => {
                log::warn!("Budget-vs-savings refresh failed: {e}");
                failed.push("budget vs savings");
            }
        }
        // Insight endpoints are optional extras; their failures are logged
        // but do not raise a status message.
        match snapshot.prediction {
            Ok(p) => self.data.prediction = Some(p),
            Err(e) => log::warn!("Prediction fetch failed: {e}"),
        }
        match snapshot.tips {
            Ok(tips) => self.data.tips = tips,
            Err(e) => log::warn!("Recommendations fetch failed: {e}"),
        }
        match snapshot.auto_budget {
            Ok(shares) => self.data.auto_budget = shares,
            Err(e) => log::warn!("Auto-budget fetch failed: {e}"),
        }
        match snapshot.challenge {
            Ok(c) => self.data.challenge = Some(c),
            Err(e) => log::warn!("Savings challenge fetch failed: {e}"),
        }

        if !failed.is_empty() {
            self.set_status(format!("Refresh failed for: {}", failed.join(", ")), true);
        }
    }

    // ============= key handling =============

    pub async fn handle_key(&mut self, k: KeyEvent) -> anyhow::Result<()> {
        if k.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.tab == Tab::Login {
            self.handle_login_key(k).await;
            return Ok(());
        }
        if self.form_open() {
            self.handle_form_key(k).await;
            return Ok(());
        }

        match k.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('r') => self.request_refresh().await,
            KeyCode::Char('l') => self.logout().await,
            KeyCode::Char('?') => self.tab = Tab::Help,
            KeyCode::Tab => self.cycle_tab(1),
            KeyCode::BackTab => self.cycle_tab(-1),
            KeyCode::Char('1') => self.tab = Tab::Overview,
            KeyCode::Char('2') => self.tab = Tab::Expenses,
            KeyCode::Char('3') => self.tab = Tab::Budgets,
            KeyCode::Char('4') => self.tab = Tab::Income,
            KeyCode::Char('5') => self.tab = Tab::Savings,
            KeyCode::Char('6') => self.tab = Tab::Insights,
            _ => self.handle_tab_key(k).await,
        }
        Ok(())
    }

    fn cycle_tab(&mut self, delta: isize) {
        let i = CYCLE.iter().position(|t| *t == self.tab).unwrap_or(0) as isize;
        let next = (i + delta).rem_euclid(CYCLE.len() as isize) as usize;
        self.tab = CYCLE[next];
    }

    fn form_open(&self) -> bool {
        match self.tab {
            Tab::Expenses => self.expenses.form_open,
            Tab::Budgets => self.budgets.form_open,
            Tab::Income => self.income.form_open,
            Tab::Savings => self.savings.form_open,
            _ => false,
        }
    }

    async fn handle_tab_key(&mut self, k: KeyEvent) {
        match self.tab {
            Tab::Expenses => match k.code {
                KeyCode::Up => move_row(&mut self.expenses.table, self.data.expenses.len(), -1),
                KeyCode::Down => move_row(&mut self.expenses.table, self.data.expenses.len(), 1),
                KeyCode::Char('a') => self.open_expense_form(false),
                KeyCode::Char('e') => self.open_expense_form(true),
                KeyCode::Char('x') | KeyCode::Delete => self.delete_expense().await,
                _ => {}
            },
            Tab::Budgets => match k.code {
                KeyCode::Up => move_row(&mut self.budgets.table, self.data.budgets.len(), -1),
                KeyCode::Down => move_row(&mut self.budgets.table, self.data.budgets.len(), 1),
                KeyCode::Char('a') => self.open_budget_form(),
                KeyCode::Char('x') | KeyCode::Delete => self.delete_budget().await,
                _ => {}
            },
            Tab::Income => match k.code {
                KeyCode::Up => move_row(&mut self.income.table, self.data.income.len(), -1),
                KeyCode::Down => move_row(&mut self.income.table, self.data.income.len(), 1),
                KeyCode::Char('a') => self.open_income_form(),
                KeyCode::Char('x') | KeyCode::Delete => self.delete_income().await,
                _ => {}
            },
            Tab::Savings => match k.code {
                KeyCode::Up => move_row(&mut self.savings.table, self.data.savings.len(), -1),
                KeyCode::Down => move_row(&mut self.savings.table, self.data.savings.len(), 1),
                KeyCode::Char('a') => self.open_savings_form(),
                KeyCode::Char('x') | KeyCode::Delete => self.delete_savings().await,
                _ => {}
            },
            Tab::Help => {
                if k.code == KeyCode::Esc {
                    self.tab = Tab::Overview;
                }
            }
            _ => {}
        }
    }

    // ============= forms =============

    fn open_expense_form(&mut self, edit: bool) {
        let mut form = ExpenseForm::default();
        if edit {
            let Some(expense) = self
                .expenses
                .table
                .selected()
                .and_then(|i| self.data.expenses.get(i))
            else {
                return;
            };
            form.editing = Some(expense.id.clone());
            form.amount.set(util::fmt_money(expense.amount));
            form.category.set(expense.category.clone());
            form.date.set(expense.date.clone());
            form.description.set(expense.description.clone());
        } else {
            form.date.set(util::today());
        }
        self.expenses.form = form;
        self.expenses.form_open = true;
    }

    fn open_budget_form(&mut self) {
        let mut form = BudgetForm::default();
        form.month.set(dashboard::current_month());
        self.budgets.form = form;
        self.budgets.form_open = true;
    }

    fn open_income_form(&mut self) {
        let mut form = IncomeForm::default();
        form.month.set(dashboard::current_month());
        self.income.form = form;
        self.income.form_open = true;
    }

    fn open_savings_form(&mut self) {
        let mut form = SavingsForm::default();
        form.month.set(dashboard::current_month());
        self.savings.form = form;
        self.savings.form_open = true;
    }

    async fn handle_form_key(&mut self, k: KeyEvent) {
        match self.tab {
            Tab::Expenses => match k.code {
                KeyCode::Esc => {
                    self.expenses.form_open = false;
                    self.expenses.form = ExpenseForm::default();
                }
                KeyCode::Tab => self.expenses.form.focus = (self.expenses.form.focus + 1) % 4,
                KeyCode::BackTab => self.expenses.form.focus = (self.expenses.form.focus + 3) % 4,
                KeyCode::Enter => self.submit_expense().await,
                code => {
                    let form = &mut self.expenses.form;
                    let field = match form.focus {
                        0 => &mut form.amount,
                        1 => &mut form.category,
                        2 => &mut form.date,
                        _ => &mut form.description,
                    };
                    edit_field(field, code);
                }
            },
            Tab::Budgets => match k.code {
                KeyCode::Esc => {
                    self.budgets.form_open = false;
                    self.budgets.form = BudgetForm::default();
                }
                KeyCode::Tab => self.budgets.form.focus = (self.budgets.form.focus + 1) % 3,
                KeyCode::BackTab => self.budgets.form.focus = (self.budgets.form.focus + 2) % 3,
                KeyCode::Enter => self.submit_budget().await,
                code => {
                    let form = &mut self.budgets.form;
                    let field = match form.focus {
                        0 => &mut form.category,
                        1 => &mut form.amount,
                        _ => &mut form.month,
                    };
                    edit_field(field, code);
                }
            },
            Tab::Income => match k.code {
                KeyCode::Esc => {
                    self.income.form_open = false;
                    self.income.form = IncomeForm::default();
                }
                KeyCode::Tab => self.income.form.focus = (self.income.form.focus + 1) % 2,
                KeyCode::BackTab => self.income.form.focus = (self.income.form.focus + 1) % 2,
                KeyCode::Enter => self.submit_income().await,
                code => {
                    let form = &mut self.income.form;
                    let field = match form.focus {
                        0 => &mut form.amount,
                        _ => &mut form.month,
                    };
                    edit_field(field, code);
                }
            },
            Tab::Savings => match k.code {
                KeyCode::Esc => {
                    self.savings.form_open = false;
                    self.savings.form = SavingsForm::default();
                }
                KeyCode::Tab => self.savings.form.focus = (self.savings.form.focus + 1) % 3,
                KeyCode::BackTab => self.savings.form.focus = (self.savings.form.focus + 2) % 3,
                KeyCode::Enter => self.submit_savings().await,
                code => {
                    let form = &mut self.savings.form;
                    let field = match form.focus {
                        0 => &mut form.goal,
                        1 => &mut form.saved,
                        _ => &mut form.month,
                    };
                    edit_field(field, code);
                }
            },
            _ => {}
        }
    }

    async fn submit_expense(&mut self) {
        let Some(session) = self.session.clone() else { return };
        let form = &mut self.expenses.form;
        let Some(amount) = util::parse_amount(&form.amount.value) else {
            form.error = Some("Amount must be a non-negative number".into());
            return;
        };
        let Some(date) = util::parse_date(&form.date.value) else {
            form.error = Some("Date must be YYYY-MM-DD".into());
            return;
        };
        let category = form.category.value.trim().to_owned();
        if category.is_empty() {
            form.error = Some("Category is required".into());
            return;
        }
        let description = form.description.value.trim().to_owned();
        let editing = form.editing.clone();

        let (tx, rx) = oneshot::channel();
        let request = match editing {
            Some(id) => LedgerRequest::UpdateExpense {
                id,
                update: ExpenseUpdate {
                    amount,
                    category,
                    date,
                    description,
                },
                response: tx,
            },
            None => LedgerRequest::CreateExpense {
                expense: NewExpense {
                    user_id: session.user_id.clone(),
                    amount,
                    category,
                    date,
                    description,
                },
                response: tx,
            },
        };
        if self.channels.ledger.send(request).await.is_err() {
            self.set_status("Ledger service unavailable", true);
            return;
        }
        match rx.await {
            Ok(Ok(_)) => {
                self.expenses.form = ExpenseForm::default();
                self.expenses.form_open = false;
                self.set_status("Expense saved", false);
                self.request_refresh().await;
            }
            Ok(Err(e)) => self.expenses.form.error = Some(e.to_string()),
            Err(_) => self.set_status("Save failed: no response", true),
        }
    }

    async fn submit_budget(&mut self) {
        let Some(session) = self.session.clone() else { return };
        let form = &mut self.budgets.form;
        let Some(amount) = util::parse_amount(&form.amount.value) else {
            form.error = Some("Amount must be a non-negative number".into());
            return;
        };
        let Some(month) = util::parse_month(&form.month.value) else {
            form.error = Some("Month must be YYYY-MM".into());
            return;
        };
        let category = form.category.value.trim().to_owned();
        if category.is_empty() {
            form.error = Some("Category is required".into());
            return;
        }

        let (tx, rx) = oneshot::channel();
        let request = LedgerRequest::CreateBudget {
            budget: NewBudget {
                user_id: session.user_id.clone(),
                category,
                amount,
                month,
            },
            response: tx,
        };
        if self.channels.ledger.send(request).await.is_err() {
            self.set_status("Ledger service unavailable", true);
            return;
        }
        match rx.await {
            Ok(Ok(_)) => {
                self.budgets.form = BudgetForm::default();
                self.budgets.form_open = false;
                self.set_status("Budget set", false);
                self.request_refresh().await;
            }
            Ok(Err(e)) => self.budgets.form.error = Some(e.to_string()),
            Err(_) => self.set_status("Save failed: no response", true),
        }
    }

    async fn submit_income(&mut self) {
        let Some(session) = self.session.clone() else { return };
        let form = &mut self.income.form;
        let Some(amount) = util::parse_amount(&form.amount.value) else {
            form.error = Some("Amount must be a non-negative number".into());
            return;
        };
        let Some(month) = util::parse_month(&form.month.value) else {
            form.error = Some("Month must be YYYY-MM".into());
            return;
        };

        let (tx, rx) = oneshot::channel();
        let request = LedgerRequest::CreateIncome {
            income: NewIncome {
                user_id: session.user_id.clone(),
                amount,
                month,
            },
            response: tx,
        };
        if self.channels.ledger.send(request).await.is_err() {
            self.set_status("Ledger service unavailable", true);
            return;
        }
        match rx.await {
            Ok(Ok(_)) => {
                self.income.form = IncomeForm::default();
                self.income.form_open = false;
                self.set_status("Income recorded", false);
                self.request_refresh().await;
            }
            Ok(Err(e)) => self.income.form.error = Some(e.to_string()),
            Err(_) => self.set_status("Save failed: no response", true),
        }
    }

    async fn submit_savings(&mut self) {
        let Some(session) = self.session.clone() else { return };
        let form = &mut self.savings.form;
        let Some(goal) = util::parse_amount(&form.goal.value) else {
            form.error = Some("Goal must be a non-negative number".into());
            return;
        };
        let Some(saved) = util::parse_amount(&form.saved.value) else {
            form.error = Some("Saved must be a non-negative number".into());
            return;
        };
        let Some(month) = util::parse_month(&form.month.value) else {
            form.error = Some("Month must be YYYY-MM".into());
            return;
        };

        let (tx, rx) = oneshot::channel();
        let request = LedgerRequest::CreateSavings {
            entry: NewSavingsEntry {
                user_id: session.user_id.clone(),
                goal,
                saved,
                month,
            },
            response: tx,
        };
        if self.channels.ledger.send(request).await.is_err() {
            self.set_status("Ledger service unavailable", true);
            return;
        }
        match rx.await {
            Ok(Ok(_)) => {
                self.savings.form = SavingsForm::default();
                self.savings.form_open = false;
                self.set_status("Savings entry recorded", false);
                self.request_refresh().await;
            }
            Ok(Err(e)) => self.savings.form.error = Some(e.to_string()),
            Err(_) => self.set_status("Save failed: no response", true),
        }
    }

    // ============= deletes =============

    async fn delete_expense(&mut self) {
        let Some(expense) = self
            .expenses
            .table
            .selected()
            .and_then(|i| self.data.expenses.get(i))
        else {
            return;
        };
        let id = expense.id.clone();
        let (tx, rx) = oneshot::channel();
        let request = LedgerRequest::DeleteExpense { id, response: tx };
        self.finish_delete(request, rx, "Expense deleted").await;
    }

    async fn delete_budget(&mut self) {
        let Some(budget) = self
            .budgets
            .table
            .selected()
            .and_then(|i| self.data.budgets.get(i))
        else {
            return;
        };
        let id = budget.id.clone();
        let (tx, rx) = oneshot::channel();
        let request = LedgerRequest::DeleteBudget { id, response: tx };
        self.finish_delete(request, rx, "Budget deleted").await;
    }

    async fn delete_income(&mut self) {
        let Some(income) = self
            .income
            .table
            .selected()
            .and_then(|i| self.data.income.get(i))
        else {
            return;
        };
        let id = income.id.clone();
        let (tx, rx) = oneshot::channel();
        let request = LedgerRequest::DeleteIncome { id, response: tx };
        self.finish_delete(request, rx, "Income deleted").await;
    }

    async fn delete_savings(&mut self) {
        let Some(entry) = self
            .savings
            .table
            .selected()
            .and_then(|i| self.data.savings.get(i))
        else {
            return;
        };
        let id = entry.id.clone();
        let (tx, rx) = oneshot::channel();
        let request = LedgerRequest::DeleteSavings { id, response: tx };
        self.finish_delete(request, rx, "Savings entry deleted").await;
    }

    async fn finish_delete(
        &mut self,
        request: LedgerRequest,
        rx: oneshot::Receiver<Result<(), crate::services::ServiceError>>,
        done: &str,
    ) {
        if self.channels.ledger.send(request).await.is_err() {
            self.set_status("Ledger service unavailable", true);
            return;
        }
        match rx.await {
            Ok(Ok(())) => {
                self.set_status(done.to_owned(), false);
                self.request_refresh().await;
            }
            Ok(Err(e)) => self.set_status(format!("Delete failed: {e}"), true),
            Err(_) => self.set_status("Delete failed: no response", true),
        }
    }

    // ============= login / logout =============

    async fn handle_login_key(&mut self, k: KeyEvent) {
        if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('t') {
            self.login.signup_mode = !self.login.signup_mode;
            self.login.focus = 0;
            self.login.error = None;
            return;
        }
        match k.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Tab | KeyCode::Down => {
                self.login.focus = (self.login.focus + 1) % self.login.field_count();
            }
            KeyCode::BackTab | KeyCode::Up => {
                let n = self.login.field_count();
                self.login.focus = (self.login.focus + n - 1) % n;
            }
            KeyCode::Enter => {
                if self.login.signup_mode {
                    self.submit_signup().await;
                } else {
                    self.submit_login().await;
                }
            }
            code => {
                let form = &mut self.login;
                let field = if form.signup_mode {
                    match form.focus {
                        0 => &mut form.name,
                        1 => &mut form.email,
                        _ => &mut form.password,
                    }
                } else {
                    match form.focus {
                        0 => &mut form.email,
                        _ => &mut form.password,
                    }
                };
                edit_field(field, code);
            }
        }
    }

    async fn submit_login(&mut self) {
        let email = self.login.email.value.trim().to_owned();
        let password = self.login.password.value.clone();
        if email.is_empty() || password.is_empty() {
            self.login.error = Some("Email and password are required".into());
            return;
        }

        let (tx, rx) = oneshot::channel();
        let request = AuthRequest::Login {
            email,
            password,
            response: tx,
        };
        if self.channels.auth.send(request).await.is_err() {
            self.login.error = Some("Auth service unavailable".into());
            return;
        }
        match rx.await {
            Ok(Ok(session)) => {
                self.login = LoginForm::fresh();
                self.session = Some(session);
                self.tab = Tab::Overview;
                self.request_refresh().await;
            }
            Ok(Err(e)) => self.login.error = Some(e.to_string()),
            Err(_) => self.login.error = Some("Login failed: no response".into()),
        }
    }

    async fn submit_signup(&mut self) {
        let name = self.login.name.value.trim().to_owned();
        let email = self.login.email.value.trim().to_owned();
        let password = self.login.password.value.clone();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            self.login.error = Some("Name, email and password are required".into());
            return;
        }

        let (tx, rx) = oneshot::channel();
        let request = AuthRequest::Signup {
            name,
            email,
            password,
            response: tx,
        };
        if self.channels.auth.send(request).await.is_err() {
            self.login.error = Some("Auth service unavailable".into());
            return;
        }
        match rx.await {
            Ok(Ok(_message)) => {
                self.login = LoginForm::fresh();
                self.login.notice = Some("Signup successful! Please log in.".into());
            }
            Ok(Err(e)) => self.login.error = Some(e.to_string()),
            Err(_) => self.login.error = Some("Signup failed: no response".into()),
        }
    }

    async fn logout(&mut self) {
        let (tx, rx) = oneshot::channel();
        if self
            .channels
            .auth
            .send(AuthRequest::Logout { response: tx })
            .await
            .is_err()
        {
            self.set_status("Auth service unavailable", true);
            return;
        }
        match rx.await {
            Ok(Ok(())) => {
                self.session = None;
                self.data = DashboardData::default();
                self.login = LoginForm::fresh();
                self.tab = Tab::Login;
            }
            Ok(Err(e)) => self.set_status(format!("Logout failed: {e}"), true),
            Err(_) => self.set_status("Logout failed: no response", true),
        }
    }
}

fn edit_field(field: &mut LineEdit, code: KeyCode) {
    match code {
        KeyCode::Char(c) => field.push(c),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.left(),
        KeyCode::Right => field.right(),
        _ => {}
    }
}

fn move_row(table: &mut TableState, len: usize, delta: isize) {
    if len == 0 {
        table.select(None);
        return;
    }
    let cur = table.selected().unwrap_or(0) as isize;
    let next = (cur + delta).rem_euclid(len as isize) as usize;
    table.select(Some(next));
}
