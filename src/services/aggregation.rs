//! Pure derivations of summary views from fetched entity collections.
//! Everything here is side-effect free and operates on the caller's private
//! copy of the data. Malformed input (bad month keys, non-finite amounts)
//! fails with a typed error instead of leaking NaN into the charts.

use std::collections::BTreeMap;

use crate::models::budgets::Budget;
use crate::models::expenses::Expense;
use crate::models::insights::PlanItem;
use crate::models::savings::SavingsEntry;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AggregationError {
    #[error("malformed date `{0}`: expected YYYY-MM-DD")]
    BadDate(String),
    #[error("amount for `{0}` is not a finite number")]
    BadAmount(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BudgetVsSavingsPoint {
    pub month: String,
    pub budget_total: f64,
    pub savings_saved: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryRemaining {
    pub category: String,
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub used_percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlanShare {
    pub label: String,
    pub amount: f64,
    pub percent: f64,
}

/// Month key of an ISO date: the first 7 characters, validated as `YYYY-MM`.
pub fn month_of(date: &str) -> Result<&str, AggregationError> {
    let key = date
        .get(..7)
        .ok_or_else(|| AggregationError::BadDate(date.to_owned()))?;
    if !is_month_key(key) || (date.len() > 7 && !date[7..].starts_with('-')) {
        return Err(AggregationError::BadDate(date.to_owned()));
    }
    Ok(key)
}

pub fn is_month_key(key: &str) -> bool {
    let b = key.as_bytes();
    b.len() == 7
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..].iter().all(u8::is_ascii_digit)
}

fn checked_amount(label: &str, amount: f64) -> Result<f64, AggregationError> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(AggregationError::BadAmount(label.to_owned()))
    }
}

/// Groups items by month key. No ordering guarantee beyond the map's;
/// callers re-sort explicitly for display.
pub fn group_by_month<'a, T, F>(
    items: &'a [T],
    date_of: F,
) -> Result<BTreeMap<String, Vec<&'a T>>, AggregationError>
where
    F: Fn(&T) -> &str,
{
    let mut groups: BTreeMap<String, Vec<&T>> = BTreeMap::new();
    for item in items {
        let month = month_of(date_of(item))?;
        groups.entry(month.to_owned()).or_default().push(item);
    }
    Ok(groups)
}

/// Per-month sums, ascending by month key (lexicographic on `YYYY-MM` is
/// chronological). `label_of` names the offending record in a bad-amount
/// error.
pub fn sum_by_month<T, F, A, L>(
    items: &[T],
    date_of: F,
    amount_of: A,
    label_of: L,
) -> Result<Vec<MonthlyTotal>, AggregationError>
where
    F: Fn(&T) -> &str,
    A: Fn(&T) -> f64,
    L: Fn(&T) -> &str,
{
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for item in items {
        let month = month_of(date_of(item))?;
        let amount = checked_amount(label_of(item), amount_of(item))?;
        *totals.entry(month.to_owned()).or_insert(0.0) += amount;
    }
    Ok(totals
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect())
}

/// Outer-join of budget totals and saved amounts per month; a month present
/// in only one collection gets 0 for the other. Budget amounts accumulate,
/// but a later savings row for the same month replaces the earlier one; the
/// two collections are deliberately not symmetric here.
pub fn merge_monthly_series(
    budgets: &[Budget],
    savings: &[SavingsEntry],
) -> Result<Vec<BudgetVsSavingsPoint>, AggregationError> {
    #[derive(Default)]
    struct Point {
        budget: f64,
        savings: f64,
    }

    let mut months: BTreeMap<String, Point> = BTreeMap::new();
    for budget in budgets {
        if !is_month_key(&budget.month) {
            return Err(AggregationError::BadDate(budget.month.clone()));
        }
        let amount = checked_amount(&budget.category, budget.amount)?;
        months.entry(budget.month.clone()).or_default().budget += amount;
    }
    for entry in savings {
        if !is_month_key(&entry.month) {
            return Err(AggregationError::BadDate(entry.month.clone()));
        }
        let saved = checked_amount(&entry.id, entry.saved)?;
        months.entry(entry.month.clone()).or_default().savings = saved;
    }

    Ok(months
        .into_iter()
        .map(|(month, point)| BudgetVsSavingsPoint {
            month,
            budget_total: point.budget,
            savings_saved: point.savings,
        })
        .collect())
}

/// Remaining budget per category for `target_month`. Duplicate budgets for a
/// `(category, month)` pair accumulate; a zero budget reports `used_percent`
/// of 0 rather than dividing by zero.
pub fn remaining_by_category(
    budgets: &[Budget],
    expenses: &[Expense],
    target_month: &str,
) -> Result<Vec<CategoryRemaining>, AggregationError> {
    let mut budgeted: BTreeMap<String, f64> = BTreeMap::new();
    for budget in budgets.iter().filter(|b| b.month == target_month) {
        let amount = checked_amount(&budget.category, budget.amount)?;
        *budgeted.entry(budget.category.clone()).or_insert(0.0) += amount;
    }

    let mut spent_by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in expenses {
        if month_of(&expense.date)? != target_month {
            continue;
        }
        let amount = checked_amount(&expense.category, expense.amount)?;
        *spent_by_category
            .entry(expense.category.as_str())
            .or_insert(0.0) += amount;
    }

    Ok(budgeted
        .into_iter()
        .map(|(category, budget)| {
            let spent = spent_by_category
                .get(category.as_str())
                .copied()
                .unwrap_or(0.0);
            let used_percent = if budget == 0.0 {
                0.0
            } else {
                spent / budget * 100.0
            };
            CategoryRemaining {
                remaining: budget - spent,
                category,
                budget,
                spent,
                used_percent,
            }
        })
        .collect())
}

/// Per-category expense totals for `target_month`. Expenses without a
/// category land in "Other".
pub fn sum_by_category(
    expenses: &[Expense],
    target_month: &str,
) -> Result<Vec<CategoryTotal>, AggregationError> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for expense in expenses {
        if month_of(&expense.date)? != target_month {
            continue;
        }
        let category = if expense.category.is_empty() {
            "Other"
        } else {
            expense.category.as_str()
        };
        let amount = checked_amount(category, expense.amount)?;
        *totals.entry(category.to_owned()).or_insert(0.0) += amount;
    }
    Ok(totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect())
}

/// Share of each plan item in the total, rounded to one decimal. A zero
/// total yields all-zero percentages, never NaN.
pub fn percentage_split(plan: &[PlanItem]) -> Result<Vec<PlanShare>, AggregationError> {
    let mut total = 0.0;
    for item in plan {
        total += checked_amount(&item.label, item.amount)?;
    }

    Ok(plan
        .iter()
        .map(|item| {
            let percent = if total == 0.0 {
                0.0
            } else {
                round_one_decimal(item.amount / total * 100.0)
            };
            PlanShare {
                label: item.label.clone(),
                amount: item.amount,
                percent,
            }
        })
        .collect())
}

fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Lexicographic sort on a `YYYY-MM` (or full ISO date) key; the key format
/// makes that chronological.
pub fn sort_ascending_by_month<T, F>(items: &mut [T], key_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| key_of(a).cmp(key_of(b)));
}

pub fn sort_descending_by_month<T, F>(items: &mut [T], key_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| key_of(b).cmp(key_of(a)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(date: &str, category: &str, amount: f64) -> Expense {
        Expense {
            id: format!("e-{date}-{category}"),
            user_id: "u1".into(),
            amount,
            category: category.into(),
            date: date.into(),
            description: String::new(),
        }
    }

    fn budget(month: &str, category: &str, amount: f64) -> Budget {
        Budget {
            id: format!("b-{month}-{category}"),
            user_id: "u1".into(),
            category: category.into(),
            amount,
            month: month.into(),
        }
    }

    fn savings(month: &str, goal: f64, saved: f64) -> SavingsEntry {
        SavingsEntry {
            id: format!("s-{month}"),
            user_id: "u1".into(),
            goal,
            saved,
            month: month.into(),
        }
    }

    #[test]
    fn month_of_takes_the_date_prefix() {
        assert_eq!(month_of("2024-01-05").unwrap(), "2024-01");
        assert_eq!(month_of("2024-01").unwrap(), "2024-01");
    }

    #[test]
    fn month_of_rejects_malformed_dates() {
        for bad in ["", "2024", "24-01-05", "2024/01/05", "2024-0105", "garbage"] {
            assert!(matches!(month_of(bad), Err(AggregationError::BadDate(_))), "{bad}");
        }
    }

    #[test]
    fn sum_by_month_of_nothing_is_empty() {
        let out = sum_by_month(
            &[] as &[Expense],
            |e| e.date.as_str(),
            |e| e.amount,
            |e| e.id.as_str(),
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn sum_by_month_totals_and_orders_ascending() {
        let expenses = vec![
            expense("2024-01-05", "Food", 10.0),
            expense("2024-01-20", "Travel", 5.0),
            expense("2024-02-01", "Food", 7.0),
        ];
        let out = sum_by_month(&expenses, |e| e.date.as_str(), |e| e.amount, |e| e.id.as_str())
            .unwrap();
        assert_eq!(
            out,
            vec![
                MonthlyTotal { month: "2024-01".into(), total: 15.0 },
                MonthlyTotal { month: "2024-02".into(), total: 7.0 },
            ]
        );
    }

    #[test]
    fn sum_by_month_fails_loudly_on_non_finite_amounts() {
        let expenses = vec![expense("2024-01-05", "Food", f64::NAN)];
        let out = sum_by_month(&expenses, |e| e.date.as_str(), |e| e.amount, |e| e.id.as_str());
        // the error names the record, not its month bucket
        assert_eq!(
            out,
            Err(AggregationError::BadAmount("e-2024-01-05-Food".into()))
        );
    }

    #[test]
    fn group_by_month_collects_per_key() {
        let expenses = vec![
            expense("2024-01-05", "Food", 10.0),
            expense("2024-02-01", "Food", 7.0),
            expense("2024-01-20", "Travel", 5.0),
        ];
        let groups = group_by_month(&expenses, |e| e.date.as_str()).unwrap();
        assert_eq!(groups["2024-01"].len(), 2);
        assert_eq!(groups["2024-02"].len(), 1);
    }

    #[test]
    fn merge_is_an_outer_join_with_zero_fill() {
        let budgets = vec![budget("2024-01", "Food", 100.0)];
        let savings = vec![savings("2024-02", 50.0, 20.0)];
        let out = merge_monthly_series(&budgets, &savings).unwrap();
        assert_eq!(
            out,
            vec![
                BudgetVsSavingsPoint {
                    month: "2024-01".into(),
                    budget_total: 100.0,
                    savings_saved: 0.0,
                },
                BudgetVsSavingsPoint {
                    month: "2024-02".into(),
                    budget_total: 0.0,
                    savings_saved: 20.0,
                },
            ]
        );
    }

    #[test]
    fn merge_accumulates_budgets_but_overwrites_savings() {
        let budgets = vec![
            budget("2024-01", "Food", 100.0),
            budget("2024-01", "Travel", 40.0),
        ];
        let entries = vec![savings("2024-01", 0.0, 10.0), savings("2024-01", 0.0, 25.0)];
        let out = merge_monthly_series(&budgets, &entries).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].budget_total, 140.0);
        // last-seen savings row wins
        assert_eq!(out[0].savings_saved, 25.0);
    }

    #[test]
    fn remaining_goes_negative_when_overspent() {
        let budgets = vec![budget("2024-03", "Food", 200.0)];
        let expenses = vec![
            expense("2024-03-02", "Food", 150.0),
            expense("2024-03-20", "Food", 100.0),
            expense("2024-02-20", "Food", 999.0),
        ];
        let out = remaining_by_category(&budgets, &expenses, "2024-03").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].spent, 250.0);
        assert_eq!(out[0].remaining, -50.0);
        assert_eq!(out[0].used_percent, 125.0);
    }

    #[test]
    fn remaining_guards_zero_budgets() {
        let budgets = vec![budget("2024-03", "Misc", 0.0)];
        let expenses = vec![expense("2024-03-02", "Misc", 30.0)];
        let out = remaining_by_category(&budgets, &expenses, "2024-03").unwrap();
        assert_eq!(out[0].used_percent, 0.0);
        assert_eq!(out[0].remaining, -30.0);
    }

    #[test]
    fn duplicate_budgets_accumulate_in_aggregation() {
        let budgets = vec![
            budget("2024-03", "Food", 100.0),
            budget("2024-03", "Food", 50.0),
        ];
        let out = remaining_by_category(&budgets, &[], "2024-03").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].budget, 150.0);
    }

    #[test]
    fn category_totals_fold_uncategorized_into_other() {
        let expenses = vec![
            expense("2024-03-02", "Food", 30.0),
            expense("2024-03-05", "", 12.0),
            expense("2024-04-01", "Food", 99.0),
        ];
        let out = sum_by_category(&expenses, "2024-03").unwrap();
        assert_eq!(
            out,
            vec![
                CategoryTotal { category: "Food".into(), total: 30.0 },
                CategoryTotal { category: "Other".into(), total: 12.0 },
            ]
        );
    }

    #[test]
    fn percentage_split_rounds_to_one_decimal() {
        let plan = vec![
            PlanItem { label: "Needs".into(), amount: 2.0 },
            PlanItem { label: "Wants".into(), amount: 1.0 },
        ];
        let out = percentage_split(&plan).unwrap();
        assert_eq!(out[0].percent, 66.7);
        assert_eq!(out[1].percent, 33.3);
    }

    #[test]
    fn percentage_split_of_zero_total_is_all_zeros() {
        let plan = vec![
            PlanItem { label: "A".into(), amount: 0.0 },
            PlanItem { label: "B".into(), amount: 0.0 },
        ];
        let out = percentage_split(&plan).unwrap();
        assert!(out.iter().all(|s| s.percent == 0.0));
    }

    #[test]
    fn sorts_are_lexicographic_on_the_key() {
        let mut totals = vec![
            MonthlyTotal { month: "2024-02".into(), total: 1.0 },
            MonthlyTotal { month: "2023-12".into(), total: 2.0 },
            MonthlyTotal { month: "2024-01".into(), total: 3.0 },
        ];
        sort_ascending_by_month(&mut totals, |t| t.month.as_str());
        assert_eq!(totals[0].month, "2023-12");
        sort_descending_by_month(&mut totals, |t| t.month.as_str());
        assert_eq!(totals[0].month, "2024-02");
    }
}
