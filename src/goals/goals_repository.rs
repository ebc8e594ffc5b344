use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::goals_errors::GoalError;
use super::goals_model::{
    NewSavingsContribution, NewSavingsGoal, NewSavingsWithdrawal, SavingsContribution,
    SavingsGoal, SavingsGoalChangeset, SavingsWithdrawal,
};
use super::goals_traits::GoalRepositoryTrait;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{Error, Result};
use crate::schema::{savings_contributions, savings_goals, savings_withdrawals};

pub struct GoalRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        GoalRepository { pool, writer }
    }
}

fn load_goal(conn: &mut SqliteConnection, goal_id: &str) -> Result<SavingsGoal> {
    savings_goals::table
        .find(goal_id)
        .first::<SavingsGoal>(conn)
        .optional()?
        .ok_or_else(|| Error::Goal(GoalError::NotFound(goal_id.to_string())))
}

fn set_current_amount(
    conn: &mut SqliteConnection,
    goal_id: &str,
    new_amount: Decimal,
) -> Result<()> {
    diesel::update(savings_goals::table.find(goal_id))
        .set(savings_goals::current_amount.eq(new_amount.to_string()))
        .execute(conn)?;
    Ok(())
}

/// Rebuilds the saved balance from the signed ledger rows that remain.
fn recompute_current_amount(conn: &mut SqliteConnection, goal_id: &str) -> Result<SavingsGoal> {
    let rows = savings_contributions::table
        .filter(savings_contributions::goal_id.eq(goal_id))
        .load::<SavingsContribution>(conn)?;
    let total: Decimal = rows.iter().map(|c| c.amount_decimal()).sum();
    set_current_amount(conn, goal_id, total)?;
    load_goal(conn, goal_id)
}

fn insert_contribution_row(
    conn: &mut SqliteConnection,
    mut row: NewSavingsContribution,
) -> Result<SavingsContribution> {
    if row.id.is_none() {
        row.id = Some(Uuid::new_v4().to_string());
    }
    diesel::insert_into(savings_contributions::table)
        .values(&row)
        .execute(conn)?;
    Ok(savings_contributions::table
        .find(row.id.expect("id was set above"))
        .first::<SavingsContribution>(conn)?)
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn load_goals(&self) -> Result<Vec<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(savings_goals::table
            .order(savings_goals::created_at.desc())
            .load::<SavingsGoal>(&mut conn)?)
    }

    fn get_goal_by_id(&self, goal_id: &str) -> Result<Option<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(savings_goals::table
            .find(goal_id)
            .first::<SavingsGoal>(&mut conn)
            .optional()?)
    }

    fn load_contributions(&self, goal_id: &str) -> Result<Vec<SavingsContribution>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(savings_contributions::table
            .filter(savings_contributions::goal_id.eq(goal_id))
            .order(savings_contributions::date.desc())
            .load::<SavingsContribution>(&mut conn)?)
    }

    fn load_all_contributions(&self) -> Result<Vec<SavingsContribution>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(savings_contributions::table.load::<SavingsContribution>(&mut conn)?)
    }

    fn load_withdrawals(&self, goal_id: &str) -> Result<Vec<SavingsWithdrawal>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(savings_withdrawals::table
            .filter(savings_withdrawals::goal_id.eq(goal_id))
            .order(savings_withdrawals::date.desc())
            .load::<SavingsWithdrawal>(&mut conn)?)
    }

    fn get_withdrawal_by_id(&self, withdrawal_id: &str) -> Result<Option<SavingsWithdrawal>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(savings_withdrawals::table
            .find(withdrawal_id)
            .first::<SavingsWithdrawal>(&mut conn)
            .optional()?)
    }

    fn load_pending_withdrawals(&self) -> Result<Vec<(SavingsWithdrawal, String)>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(savings_withdrawals::table
            .inner_join(savings_goals::table)
            .filter(savings_withdrawals::repaid.eq(false))
            .order(savings_withdrawals::repay_by.asc())
            .select((SavingsWithdrawal::as_select(), savings_goals::name))
            .load::<(SavingsWithdrawal, String)>(&mut conn)?)
    }

    async fn insert_new_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let mut goal = new_goal;
                if goal.id.is_none() {
                    goal.id = Some(Uuid::new_v4().to_string());
                }
                if goal.created_at.is_none() {
                    goal.created_at = Some(Utc::now().to_rfc3339());
                }

                diesel::insert_into(savings_goals::table)
                    .values(&goal)
                    .execute(conn)?;

                load_goal(conn, &goal.id.expect("id was set above"))
            })
            .await
    }

    async fn update_goal(
        &self,
        goal_id: &str,
        changes: SavingsGoalChangeset,
    ) -> Result<SavingsGoal> {
        let id_owned = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                diesel::update(savings_goals::table.find(&id_owned))
                    .set(&changes)
                    .execute(conn)?;
                load_goal(conn, &id_owned)
            })
            .await
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<usize> {
        let id_owned = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    savings_contributions::table
                        .filter(savings_contributions::goal_id.eq(&id_owned)),
                )
                .execute(conn)?;
                Ok(diesel::delete(savings_goals::table.find(&id_owned)).execute(conn)?)
            })
            .await
    }

    async fn insert_contribution(
        &self,
        contribution: NewSavingsContribution,
    ) -> Result<(SavingsContribution, SavingsGoal)> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<(SavingsContribution, SavingsGoal)> {
                    let goal = load_goal(conn, &contribution.goal_id)?;
                    let row = insert_contribution_row(conn, contribution)?;

                    let new_total = goal.current_amount_decimal() + row.amount_decimal();
                    set_current_amount(conn, &goal.id, new_total)?;

                    let updated = load_goal(conn, &goal.id)?;
                    Ok((row, updated))
                },
            )
            .await
    }

    async fn insert_withdrawal(
        &self,
        withdrawal: NewSavingsWithdrawal,
        release: Option<NewSavingsContribution>,
    ) -> Result<(SavingsWithdrawal, SavingsGoal)> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<(SavingsWithdrawal, SavingsGoal)> {
                    let goal = load_goal(conn, &withdrawal.goal_id)?;

                    let mut row = withdrawal;
                    if row.id.is_none() {
                        row.id = Some(Uuid::new_v4().to_string());
                    }
                    diesel::insert_into(savings_withdrawals::table)
                        .values(&row)
                        .execute(conn)?;
                    let stored = savings_withdrawals::table
                        .find(row.id.expect("id was set above"))
                        .first::<SavingsWithdrawal>(conn)?;

                    // negative ledger row releases the bank's committed total
                    if let Some(release_row) = release {
                        insert_contribution_row(conn, release_row)?;
                    }

                    let new_total = goal.current_amount_decimal() - stored.amount_decimal();
                    set_current_amount(conn, &goal.id, new_total)?;

                    let updated = load_goal(conn, &goal.id)?;
                    Ok((stored, updated))
                },
            )
            .await
    }

    async fn mark_withdrawal_repaid(
        &self,
        withdrawal_id: &str,
        repaid_at: String,
        restore: Option<NewSavingsContribution>,
    ) -> Result<SavingsGoal> {
        let id_owned = withdrawal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let withdrawal = savings_withdrawals::table
                    .find(&id_owned)
                    .first::<SavingsWithdrawal>(conn)
                    .optional()?
                    .ok_or_else(|| Error::Goal(GoalError::WithdrawalNotFound(id_owned.clone())))?;

                diesel::update(savings_withdrawals::table.find(&id_owned))
                    .set((
                        savings_withdrawals::repaid.eq(true),
                        savings_withdrawals::repaid_at.eq(Some(repaid_at)),
                    ))
                    .execute(conn)?;

                if let Some(restore_row) = restore {
                    insert_contribution_row(conn, restore_row)?;
                }

                let goal = load_goal(conn, &withdrawal.goal_id)?;
                let new_total = goal.current_amount_decimal() + withdrawal.amount_decimal();
                set_current_amount(conn, &goal.id, new_total)?;

                load_goal(conn, &withdrawal.goal_id)
            })
            .await
    }

    async fn delete_contribution(&self, contribution_id: &str) -> Result<SavingsGoal> {
        let id_owned = contribution_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let row = savings_contributions::table
                    .find(&id_owned)
                    .first::<SavingsContribution>(conn)
                    .optional()?
                    .ok_or_else(|| {
                        Error::Goal(GoalError::ContributionNotFound(id_owned.clone()))
                    })?;

                diesel::delete(savings_contributions::table.find(&id_owned)).execute(conn)?;
                recompute_current_amount(conn, &row.goal_id)
            })
            .await
    }

    async fn delete_withdrawal(&self, withdrawal_id: &str) -> Result<SavingsGoal> {
        let id_owned = withdrawal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let withdrawal = savings_withdrawals::table
                    .find(&id_owned)
                    .first::<SavingsWithdrawal>(conn)
                    .optional()?
                    .ok_or_else(|| Error::Goal(GoalError::WithdrawalNotFound(id_owned.clone())))?;

                // the withdrawal's negative ledger row carries no back-link;
                // match it by goal, amount, date and bank
                let negative_amount = (-withdrawal.amount_decimal()).to_string();
                let mut matches = savings_contributions::table
                    .filter(savings_contributions::goal_id.eq(&withdrawal.goal_id))
                    .filter(savings_contributions::amount.eq(&negative_amount))
                    .filter(savings_contributions::date.eq(&withdrawal.date))
                    .into_boxed();
                matches = match &withdrawal.bank {
                    Some(bank) => matches.filter(savings_contributions::bank.eq(bank)),
                    None => matches.filter(savings_contributions::bank.is_null()),
                };
                if let Some(row) = matches
                    .first::<SavingsContribution>(conn)
                    .optional()?
                {
                    diesel::delete(savings_contributions::table.find(&row.id)).execute(conn)?;
                }

                diesel::delete(savings_withdrawals::table.find(&id_owned)).execute(conn)?;
                recompute_current_amount(conn, &withdrawal.goal_id)
            })
            .await
    }

    async fn complete_goal(&self, goal_id: &str) -> Result<usize> {
        let id_owned = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                load_goal(conn, &id_owned)?;

                diesel::delete(
                    savings_contributions::table
                        .filter(savings_contributions::goal_id.eq(&id_owned)),
                )
                .execute(conn)?;
                diesel::delete(
                    savings_withdrawals::table
                        .filter(savings_withdrawals::goal_id.eq(&id_owned)),
                )
                .execute(conn)?;
                Ok(diesel::delete(savings_goals::table.find(&id_owned)).execute(conn)?)
            })
            .await
    }
}
