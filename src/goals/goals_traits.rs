use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::goals_model::{
    GoalBankTotal, GoalHistoryEntry, NewSavingsContribution, NewSavingsGoal, NewSavingsWithdrawal,
    PendingWithdrawal, SavingsContribution, SavingsGoal, SavingsGoalChangeset, SavingsGoalDraft,
    SavingsGoalDto, SavingsGoalUpdate, SavingsSummary, SavingsWithdrawal, WithdrawalRequest,
};
use super::goals_schedule::{GoalStatusSummary, Installment};
use crate::errors::Result;

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn load_goals(&self) -> Result<Vec<SavingsGoal>>;
    fn get_goal_by_id(&self, goal_id: &str) -> Result<Option<SavingsGoal>>;
    fn load_contributions(&self, goal_id: &str) -> Result<Vec<SavingsContribution>>;
    fn load_all_contributions(&self) -> Result<Vec<SavingsContribution>>;
    fn load_withdrawals(&self, goal_id: &str) -> Result<Vec<SavingsWithdrawal>>;
    fn get_withdrawal_by_id(&self, withdrawal_id: &str) -> Result<Option<SavingsWithdrawal>>;
    /// Not-repaid withdrawals paired with their goal's name, ordered by
    /// repay-by date.
    fn load_pending_withdrawals(&self) -> Result<Vec<(SavingsWithdrawal, String)>>;

    async fn insert_new_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_goal(
        &self,
        goal_id: &str,
        changes: SavingsGoalChangeset,
    ) -> Result<SavingsGoal>;
    async fn delete_goal(&self, goal_id: &str) -> Result<usize>;

    /// Inserts a (signed) ledger row and shifts the goal's saved balance by
    /// the same amount, in one transaction.
    async fn insert_contribution(
        &self,
        contribution: NewSavingsContribution,
    ) -> Result<(SavingsContribution, SavingsGoal)>;
    /// Records a withdrawal, optionally releasing a bank's committed total
    /// via `release`, and lowers the saved balance.
    async fn insert_withdrawal(
        &self,
        withdrawal: NewSavingsWithdrawal,
        release: Option<NewSavingsContribution>,
    ) -> Result<(SavingsWithdrawal, SavingsGoal)>;
    async fn mark_withdrawal_repaid(
        &self,
        withdrawal_id: &str,
        repaid_at: String,
        restore: Option<NewSavingsContribution>,
    ) -> Result<SavingsGoal>;
    /// Removes a ledger row and recomputes the goal's saved balance from the
    /// remaining rows.
    async fn delete_contribution(&self, contribution_id: &str) -> Result<SavingsGoal>;
    /// Removes a withdrawal together with its matching negative ledger row,
    /// then recomputes the goal's saved balance.
    async fn delete_withdrawal(&self, withdrawal_id: &str) -> Result<SavingsGoal>;
    /// Deletes the goal with its whole ledger, releasing every committed
    /// bank total.
    async fn complete_goal(&self, goal_id: &str) -> Result<usize>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self) -> Result<Vec<SavingsGoalDto>>;
    fn get_goal(&self, goal_id: &str) -> Result<SavingsGoal>;
    async fn create_goal(&self, draft: SavingsGoalDraft) -> Result<SavingsGoal>;
    async fn update_goal(&self, goal_id: &str, update: SavingsGoalUpdate) -> Result<SavingsGoal>;
    async fn update_goal_notes(
        &self,
        goal_id: &str,
        notes: Option<String>,
    ) -> Result<SavingsGoal>;
    async fn delete_goal(&self, goal_id: &str) -> Result<()>;

    async fn contribute(
        &self,
        goal_id: &str,
        amount: Decimal,
        bank: Option<String>,
        date: Option<NaiveDate>,
    ) -> Result<(SavingsContribution, SavingsGoal)>;
    async fn withdraw(
        &self,
        goal_id: &str,
        request: WithdrawalRequest,
    ) -> Result<(SavingsWithdrawal, SavingsGoal)>;
    async fn repay_withdrawal(&self, withdrawal_id: &str) -> Result<SavingsGoal>;
    async fn delete_contribution(&self, contribution_id: &str) -> Result<SavingsGoal>;
    async fn delete_withdrawal(&self, withdrawal_id: &str) -> Result<SavingsGoal>;
    async fn complete_goal(&self, goal_id: &str) -> Result<()>;

    fn get_goal_contributions(&self, goal_id: &str) -> Result<Vec<SavingsContribution>>;
    fn get_goal_withdrawals(&self, goal_id: &str) -> Result<Vec<SavingsWithdrawal>>;
    fn get_goal_history(&self, goal_id: &str) -> Result<Vec<GoalHistoryEntry>>;
    fn get_goal_banks(&self, goal_id: &str) -> Result<Vec<GoalBankTotal>>;
    fn get_savings_by_bank(&self) -> Result<HashMap<String, Decimal>>;
    fn get_savings_summary(&self) -> Result<SavingsSummary>;
    fn get_pending_withdrawals(&self) -> Result<Vec<PendingWithdrawal>>;

    /// Derived installment plan for a goal (recomputed on every call).
    fn get_goal_schedule(&self, goal_id: &str) -> Result<Vec<Installment>>;
    /// Next-due summary for a goal, relative to today.
    fn get_goal_status(&self, goal_id: &str) -> Result<GoalStatusSummary>;
}
