//! Savings goals: models, installment scheduling, repository and service.

pub mod goals_errors;
pub mod goals_model;
pub mod goals_repository;
pub mod goals_schedule;
pub mod goals_service;
pub mod goals_traits;

#[cfg(test)]
mod goals_model_tests;


pub use goals_errors::GoalError;
pub use goals_model::{
    GoalBankTotal, GoalHistoryEntry, GoalHistoryKind, NewSavingsContribution, NewSavingsGoal,
    NewSavingsWithdrawal, PendingWithdrawal, SavingsContribution, SavingsGoal,
    SavingsGoalChangeset, SavingsGoalDraft, SavingsGoalDto, SavingsGoalUpdate, SavingsSummary,
    SavingsWithdrawal, WithdrawalRequest,
};
pub use goals_repository::GoalRepository;
pub use goals_schedule::{
    build_plan, contribution_dates, plan_for_goal, status_summary, summary_for_goal,
    ContributionFrequency, GoalScheduleStatus, GoalStatusSummary, Installment, InstallmentStatus,
};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
