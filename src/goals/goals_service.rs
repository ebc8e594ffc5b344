use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use log::debug;
use rust_decimal::Decimal;

use super::goals_errors::GoalError;
use super::goals_model::{
    GoalBankTotal, GoalHistoryEntry, GoalHistoryKind, NewSavingsContribution, NewSavingsGoal,
    NewSavingsWithdrawal, PendingWithdrawal, SavingsContribution, SavingsGoal,
    SavingsGoalChangeset, SavingsGoalDraft, SavingsGoalDto, SavingsGoalUpdate, SavingsSummary,
    SavingsWithdrawal, WithdrawalRequest,
};
use super::goals_schedule::{
    self, ContributionFrequency, GoalStatusSummary, Installment,
};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::constants::DATE_FORMAT;
use crate::errors::{Result, ValidationError};

pub struct GoalService<T: GoalRepositoryTrait> {
    goal_repo: Arc<T>,
}

impl<T: GoalRepositoryTrait> GoalService<T> {
    pub fn new(goal_repo: Arc<T>) -> Self {
        GoalService { goal_repo }
    }

    fn validate_deadline(deadline: &Option<String>) -> Result<()> {
        if let Some(d) = deadline {
            NaiveDate::parse_from_str(d, DATE_FORMAT).map_err(|_| {
                ValidationError::InvalidInput(format!("Invalid deadline date '{}'", d))
            })?;
        }
        Ok(())
    }

    fn validate_contribution_day(
        frequency: ContributionFrequency,
        day: Option<i32>,
    ) -> Result<()> {
        let valid = match (frequency, day) {
            (_, None) => true,
            (ContributionFrequency::Weekly, Some(d)) => (1..=7).contains(&d),
            (ContributionFrequency::Monthly, Some(d)) => (1..=31).contains(&d),
            // daily plans ignore the day; no schedule means no day to check
            (ContributionFrequency::Daily | ContributionFrequency::None, Some(_)) => true,
        };
        if valid {
            Ok(())
        } else {
            Err(ValidationError::InvalidInput(format!(
                "Contribution day {:?} is out of range for {} frequency",
                day,
                frequency.as_str()
            ))
            .into())
        }
    }

    fn stored_frequency(frequency: ContributionFrequency) -> Option<String> {
        match frequency {
            ContributionFrequency::None => None,
            other => Some(other.as_str().to_string()),
        }
    }

    fn require_goal(&self, goal_id: &str) -> Result<SavingsGoal> {
        self.goal_repo
            .get_goal_by_id(goal_id)?
            .ok_or_else(|| GoalError::NotFound(goal_id.to_string()).into())
    }

    /// Committed totals per bank for one goal, positive only.
    fn bank_totals(rows: &[SavingsContribution]) -> Vec<GoalBankTotal> {
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for row in rows {
            if let Some(bank) = &row.bank {
                if bank.is_empty() {
                    continue;
                }
                *totals.entry(bank.clone()).or_insert(Decimal::ZERO) += row.amount_decimal();
            }
        }
        let mut result: Vec<GoalBankTotal> = totals
            .into_iter()
            .filter(|(_, total)| *total > Decimal::ZERO)
            .map(|(bank, total)| GoalBankTotal { bank, total })
            .collect();
        result.sort_by(|a, b| b.total.cmp(&a.total));
        result
    }
}

#[async_trait]
impl<T: GoalRepositoryTrait + Send + Sync> GoalServiceTrait for GoalService<T> {
    fn get_goals(&self) -> Result<Vec<SavingsGoalDto>> {
        Ok(self
            .goal_repo
            .load_goals()?
            .into_iter()
            .map(SavingsGoalDto::from)
            .collect())
    }

    fn get_goal(&self, goal_id: &str) -> Result<SavingsGoal> {
        self.require_goal(goal_id)
    }

    async fn create_goal(&self, draft: SavingsGoalDraft) -> Result<SavingsGoal> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if draft.target_amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Target amount must be greater than zero".to_string(),
            )
            .into());
        }
        Self::validate_deadline(&draft.deadline)?;
        Self::validate_contribution_day(draft.contribution_frequency, draft.contribution_day)?;

        let new_goal = NewSavingsGoal {
            id: None,
            name: draft.name.trim().to_string(),
            target_amount: draft.target_amount.to_string(),
            current_amount: Decimal::ZERO.to_string(),
            deadline: draft.deadline,
            contribution_frequency: Self::stored_frequency(draft.contribution_frequency),
            contribution_day: draft.contribution_day,
            icon: draft.icon,
            color: draft.color,
            notes: draft.notes,
            created_at: None,
        };

        self.goal_repo.insert_new_goal(new_goal).await
    }

    async fn update_goal(&self, goal_id: &str, update: SavingsGoalUpdate) -> Result<SavingsGoal> {
        let existing = self.require_goal(goal_id)?;

        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingField("name".to_string()).into());
            }
        }
        if let Some(target) = update.target_amount {
            if target <= Decimal::ZERO {
                return Err(ValidationError::InvalidInput(
                    "Target amount must be greater than zero".to_string(),
                )
                .into());
            }
        }
        if let Some(deadline) = &update.deadline {
            Self::validate_deadline(deadline)?;
        }
        let effective_frequency = update
            .contribution_frequency
            .unwrap_or_else(|| existing.frequency());
        if let Some(day) = update.contribution_day {
            Self::validate_contribution_day(effective_frequency, day)?;
        }

        let changes = SavingsGoalChangeset {
            name: update.name.map(|n| n.trim().to_string()),
            target_amount: update.target_amount.map(|t| t.to_string()),
            deadline: update.deadline,
            contribution_frequency: update
                .contribution_frequency
                .map(Self::stored_frequency),
            contribution_day: update.contribution_day,
            icon: update.icon,
            color: update.color,
            notes: update.notes,
        };

        if changes.name.is_none()
            && changes.target_amount.is_none()
            && changes.deadline.is_none()
            && changes.contribution_frequency.is_none()
            && changes.contribution_day.is_none()
            && changes.icon.is_none()
            && changes.color.is_none()
            && changes.notes.is_none()
        {
            return Ok(existing);
        }

        self.goal_repo.update_goal(goal_id, changes).await
    }

    async fn update_goal_notes(
        &self,
        goal_id: &str,
        notes: Option<String>,
    ) -> Result<SavingsGoal> {
        self.require_goal(goal_id)?;
        let changes = SavingsGoalChangeset {
            notes: Some(notes),
            ..Default::default()
        };
        self.goal_repo.update_goal(goal_id, changes).await
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<()> {
        self.require_goal(goal_id)?;
        self.goal_repo.delete_goal(goal_id).await?;
        Ok(())
    }

    async fn contribute(
        &self,
        goal_id: &str,
        amount: Decimal,
        bank: Option<String>,
        date: Option<NaiveDate>,
    ) -> Result<(SavingsContribution, SavingsGoal)> {
        self.require_goal(goal_id)?;
        if amount <= Decimal::ZERO {
            return Err(GoalError::InvalidAmount(
                "Contribution amount must be greater than zero".to_string(),
            )
            .into());
        }

        let date = date
            .unwrap_or_else(|| Local::now().date_naive())
            .format(DATE_FORMAT)
            .to_string();

        debug!("Contributing {} to goal {}", amount, goal_id);
        self.goal_repo
            .insert_contribution(NewSavingsContribution {
                id: None,
                goal_id: goal_id.to_string(),
                amount: amount.to_string(),
                date,
                bank: bank.filter(|b| !b.is_empty()),
            })
            .await
    }

    async fn withdraw(
        &self,
        goal_id: &str,
        request: WithdrawalRequest,
    ) -> Result<(SavingsWithdrawal, SavingsGoal)> {
        let goal = self.require_goal(goal_id)?;

        if request.amount <= Decimal::ZERO {
            return Err(GoalError::InvalidAmount(
                "Withdrawal amount must be greater than zero".to_string(),
            )
            .into());
        }
        if request.amount > goal.current_amount_decimal() {
            return Err(GoalError::InsufficientFunds(format!(
                "Withdrawal of {} exceeds the goal's saved balance of {}",
                request.amount,
                goal.current_amount_decimal()
            ))
            .into());
        }
        NaiveDate::parse_from_str(&request.repay_by, DATE_FORMAT).map_err(|_| {
            ValidationError::InvalidInput(format!(
                "Invalid repay-by date '{}'",
                request.repay_by
            ))
        })?;

        let bank = request.bank.filter(|b| !b.is_empty());
        if let Some(bank_name) = &bank {
            let committed = Self::bank_totals(&self.goal_repo.load_contributions(goal_id)?)
                .into_iter()
                .find(|t| &t.bank == bank_name)
                .map(|t| t.total)
                .unwrap_or(Decimal::ZERO);
            if committed < request.amount {
                return Err(GoalError::InsufficientFunds(format!(
                    "Bank '{}' only holds {} for this goal",
                    bank_name, committed
                ))
                .into());
            }
        }

        let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
        let withdrawal = NewSavingsWithdrawal {
            id: None,
            goal_id: goal_id.to_string(),
            amount: request.amount.to_string(),
            reason: request.reason,
            category: request.category,
            bank: bank.clone(),
            date: today.clone(),
            repay_by: request.repay_by,
            repaid: false,
            repaid_at: None,
        };
        let release = bank.map(|bank_name| NewSavingsContribution {
            id: None,
            goal_id: goal_id.to_string(),
            amount: (-request.amount).to_string(),
            date: today,
            bank: Some(bank_name),
        });

        debug!("Withdrawing {} from goal {}", request.amount, goal_id);
        self.goal_repo.insert_withdrawal(withdrawal, release).await
    }

    async fn repay_withdrawal(&self, withdrawal_id: &str) -> Result<SavingsGoal> {
        let withdrawal = self
            .goal_repo
            .get_withdrawal_by_id(withdrawal_id)?
            .ok_or_else(|| GoalError::WithdrawalNotFound(withdrawal_id.to_string()))?;
        if withdrawal.repaid {
            return Err(GoalError::AlreadyRepaid(withdrawal_id.to_string()).into());
        }

        let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
        let restore = withdrawal.bank.clone().map(|bank| NewSavingsContribution {
            id: None,
            goal_id: withdrawal.goal_id.clone(),
            amount: withdrawal.amount.clone(),
            date: today.clone(),
            bank: Some(bank),
        });

        self.goal_repo
            .mark_withdrawal_repaid(withdrawal_id, today, restore)
            .await
    }

    async fn delete_contribution(&self, contribution_id: &str) -> Result<SavingsGoal> {
        self.goal_repo.delete_contribution(contribution_id).await
    }

    async fn delete_withdrawal(&self, withdrawal_id: &str) -> Result<SavingsGoal> {
        self.goal_repo.delete_withdrawal(withdrawal_id).await
    }

    async fn complete_goal(&self, goal_id: &str) -> Result<()> {
        self.require_goal(goal_id)?;
        self.goal_repo.complete_goal(goal_id).await?;
        Ok(())
    }

    fn get_goal_contributions(&self, goal_id: &str) -> Result<Vec<SavingsContribution>> {
        self.require_goal(goal_id)?;
        self.goal_repo.load_contributions(goal_id)
    }

    fn get_goal_withdrawals(&self, goal_id: &str) -> Result<Vec<SavingsWithdrawal>> {
        self.require_goal(goal_id)?;
        self.goal_repo.load_withdrawals(goal_id)
    }

    fn get_goal_history(&self, goal_id: &str) -> Result<Vec<GoalHistoryEntry>> {
        self.require_goal(goal_id)?;

        let mut history: Vec<GoalHistoryEntry> = Vec::new();

        for c in self.goal_repo.load_contributions(goal_id)? {
            history.push(GoalHistoryEntry {
                id: format!("c_{}", c.id),
                source_id: c.id.clone(),
                date: c.date.clone(),
                amount: c.amount_decimal(),
                kind: GoalHistoryKind::Contribution,
                bank: c.bank.clone(),
                detail: "Contribution".to_string(),
            });
        }

        for w in self.goal_repo.load_withdrawals(goal_id)? {
            history.push(GoalHistoryEntry {
                id: format!("w_{}", w.id),
                source_id: w.id.clone(),
                date: w.date.clone(),
                amount: -w.amount_decimal(),
                kind: GoalHistoryKind::Withdrawal,
                bank: w.bank.clone(),
                detail: w.reason.clone().unwrap_or_else(|| "Withdrawal".to_string()),
            });
        }

        history.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(history)
    }

    fn get_goal_banks(&self, goal_id: &str) -> Result<Vec<GoalBankTotal>> {
        self.require_goal(goal_id)?;
        Ok(Self::bank_totals(
            &self.goal_repo.load_contributions(goal_id)?,
        ))
    }

    fn get_savings_by_bank(&self) -> Result<HashMap<String, Decimal>> {
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for row in self.goal_repo.load_all_contributions()? {
            if let Some(bank) = &row.bank {
                if bank.is_empty() {
                    continue;
                }
                *totals.entry(bank.clone()).or_insert(Decimal::ZERO) += row.amount_decimal();
            }
        }
        Ok(totals)
    }

    fn get_savings_summary(&self) -> Result<SavingsSummary> {
        let goals = self.goal_repo.load_goals()?;
        let total_saved = goals
            .iter()
            .map(|g| g.current_amount_decimal())
            .sum::<Decimal>();
        Ok(SavingsSummary {
            total_saved,
            goal_count: goals.len(),
        })
    }

    fn get_pending_withdrawals(&self) -> Result<Vec<PendingWithdrawal>> {
        Ok(self
            .goal_repo
            .load_pending_withdrawals()?
            .into_iter()
            .map(|(w, goal_name)| PendingWithdrawal {
                amount: w.amount_decimal(),
                id: w.id,
                goal_id: w.goal_id,
                goal_name,
                reason: w.reason,
                category: w.category,
                bank: w.bank,
                date: w.date,
                repay_by: w.repay_by,
            })
            .collect())
    }

    fn get_goal_schedule(&self, goal_id: &str) -> Result<Vec<Installment>> {
        let goal = self.require_goal(goal_id)?;
        Ok(goals_schedule::plan_for_goal(&goal))
    }

    fn get_goal_status(&self, goal_id: &str) -> Result<GoalStatusSummary> {
        let goal = self.require_goal(goal_id)?;
        Ok(goals_schedule::summary_for_goal(
            &goal,
            Local::now().date_naive(),
        ))
    }
}
