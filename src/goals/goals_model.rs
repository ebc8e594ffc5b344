use chrono::{DateTime, NaiveDate};
use diesel::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::goals_schedule::ContributionFrequency;
use crate::constants::DATE_FORMAT;

/// A user-defined savings target with optional deadline and cadence.
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::savings_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target_amount: String,
    pub current_amount: String,
    pub deadline: Option<String>,
    pub contribution_frequency: Option<String>,
    pub contribution_day: Option<i32>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl SavingsGoal {
    pub fn target_amount_decimal(&self) -> Decimal {
        self.target_amount.parse().unwrap_or(Decimal::ZERO)
    }

    /// Saved balance; negative stored values are clamped to zero.
    pub fn current_amount_decimal(&self) -> Decimal {
        self.current_amount
            .parse()
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO)
    }

    pub fn deadline_date(&self) -> Option<NaiveDate> {
        self.deadline
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
    }

    /// Date part of `created_at`; schedule generation starts strictly after it.
    pub fn created_date(&self) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.date_naive())
            .ok()
            .or_else(|| NaiveDate::parse_from_str(&self.created_at, DATE_FORMAT).ok())
    }

    pub fn frequency(&self) -> ContributionFrequency {
        ContributionFrequency::parse(self.contribution_frequency.as_deref())
    }

    /// Percentage complete, clamped to 100.
    pub fn percent_complete(&self) -> Decimal {
        let target = self.target_amount_decimal();
        if target <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.current_amount_decimal() / target * dec!(100))
            .min(dec!(100))
            .round_dp(1)
    }
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_goals)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    pub id: Option<String>,
    pub name: String,
    pub target_amount: String,
    pub current_amount: String,
    pub deadline: Option<String>,
    pub contribution_frequency: Option<String>,
    pub contribution_day: Option<i32>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

/// Validated input for creating a goal.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalDraft {
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: Option<String>,
    #[serde(default)]
    pub contribution_frequency: ContributionFrequency,
    pub contribution_day: Option<i32>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub notes: Option<String>,
}

/// Partial update; `Some(None)` clears a nullable field.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub deadline: Option<Option<String>>,
    pub contribution_frequency: Option<ContributionFrequency>,
    pub contribution_day: Option<Option<i32>>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub notes: Option<Option<String>>,
}

/// Column-level changeset the repository applies.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::savings_goals)]
pub struct SavingsGoalChangeset {
    pub name: Option<String>,
    pub target_amount: Option<String>,
    pub deadline: Option<Option<String>>,
    pub contribution_frequency: Option<Option<String>>,
    pub contribution_day: Option<Option<i32>>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub notes: Option<Option<String>>,
}

/// Goal with numeric fields for the frontend.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalDto {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<String>,
    pub contribution_frequency: ContributionFrequency,
    pub contribution_day: Option<i32>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub percent_complete: f64,
}

impl From<SavingsGoal> for SavingsGoalDto {
    fn from(goal: SavingsGoal) -> Self {
        let target = goal.target_amount_decimal();
        let current = goal.current_amount_decimal();
        let percent = goal.percent_complete();
        let frequency = goal.frequency();
        SavingsGoalDto {
            id: goal.id,
            name: goal.name,
            target_amount: target.to_string().parse().unwrap_or(0.0),
            current_amount: current.to_string().parse().unwrap_or(0.0),
            deadline: goal.deadline,
            contribution_frequency: frequency,
            contribution_day: goal.contribution_day,
            icon: goal.icon,
            color: goal.color,
            notes: goal.notes,
            created_at: goal.created_at,
            percent_complete: percent.to_string().parse().unwrap_or(0.0),
        }
    }
}

/// One ledger row: positive for contributions, negative rows release a bank's
/// committed total after a withdrawal.
#[derive(
    Queryable,
    Identifiable,
    Associations,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(SavingsGoal, foreign_key = goal_id))]
#[diesel(table_name = crate::schema::savings_contributions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SavingsContribution {
    pub id: String,
    pub goal_id: String,
    pub amount: String,
    pub date: String,
    pub bank: Option<String>,
}

impl SavingsContribution {
    pub fn amount_decimal(&self) -> Decimal {
        self.amount.parse().unwrap_or(Decimal::ZERO)
    }
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_contributions)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsContribution {
    pub id: Option<String>,
    pub goal_id: String,
    pub amount: String,
    pub date: String,
    pub bank: Option<String>,
}

#[derive(
    Queryable,
    Identifiable,
    Associations,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(SavingsGoal, foreign_key = goal_id))]
#[diesel(table_name = crate::schema::savings_withdrawals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SavingsWithdrawal {
    pub id: String,
    pub goal_id: String,
    pub amount: String,
    pub reason: Option<String>,
    pub category: Option<String>,
    pub bank: Option<String>,
    pub date: String,
    pub repay_by: String,
    pub repaid: bool,
    pub repaid_at: Option<String>,
}

impl SavingsWithdrawal {
    pub fn amount_decimal(&self) -> Decimal {
        self.amount.parse().unwrap_or(Decimal::ZERO)
    }
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_withdrawals)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsWithdrawal {
    pub id: Option<String>,
    pub goal_id: String,
    pub amount: String,
    pub reason: Option<String>,
    pub category: Option<String>,
    pub bank: Option<String>,
    pub date: String,
    pub repay_by: String,
    pub repaid: bool,
    pub repaid_at: Option<String>,
}

/// Input for withdrawing funds from a goal.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub amount: Decimal,
    pub reason: Option<String>,
    pub category: Option<String>,
    pub bank: Option<String>,
    pub repay_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalHistoryKind {
    Contribution,
    Withdrawal,
}

/// Unified ledger row for the goal detail view: contributions positive,
/// withdrawals negative.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoalHistoryEntry {
    pub id: String,
    pub source_id: String,
    pub date: String,
    pub amount: Decimal,
    pub kind: GoalHistoryKind,
    pub bank: Option<String>,
    pub detail: String,
}

/// Committed total one bank holds for a goal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalBankTotal {
    pub bank: String,
    pub total: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    pub total_saved: Decimal,
    pub goal_count: usize,
}

/// Withdrawal still waiting to be repaid, annotated with its goal's name.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PendingWithdrawal {
    pub id: String,
    pub goal_id: String,
    pub goal_name: String,
    pub amount: Decimal,
    pub reason: Option<String>,
    pub category: Option<String>,
    pub bank: Option<String>,
    pub date: String,
    pub repay_by: String,
}
