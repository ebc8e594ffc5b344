//! Installment scheduling for savings goals.
//!
//! Pure functions: a goal snapshot goes in, a derived plan comes out. Nothing
//! here touches the database or the clock — callers pass `today` explicitly —
//! so plans are recomputed on every read and the functions are safe to call
//! from any thread.
//!
//! Invalid or absent configuration (no deadline, deadline not after creation,
//! no frequency) is a defined "no plan" outcome, never an error.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::goals_model::SavingsGoal;
use crate::constants::MAX_SCHEDULE_SLOTS;

/// Cadence at which a goal expects contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributionFrequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl ContributionFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
        }
    }

    /// Parses a stored frequency; anything unrecognized is `None`.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("DAILY") => Self::Daily,
            Some("WEEKLY") => Self::Weekly,
            Some("MONTHLY") => Self::Monthly,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    Paid,
    Partial,
    Pending,
}

/// One scheduled contribution opportunity within a goal's plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub index: usize,
    pub due_date: NaiveDate,
    pub quota_amount: Decimal,
    pub status: InstallmentStatus,
    pub paid_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalScheduleStatus {
    None,
    Late,
    OnTrack,
    Completed,
}

/// What the user owes next, and whether they are behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStatusSummary {
    pub status: GoalScheduleStatus,
    pub next_quota_amount: Decimal,
    pub next_due_date: Option<NaiveDate>,
}

impl GoalStatusSummary {
    fn none() -> Self {
        GoalStatusSummary {
            status: GoalScheduleStatus::None,
            next_quota_amount: Decimal::ZERO,
            next_due_date: None,
        }
    }
}

/// Generates the ordered due-date sequence for a goal: every slot lies
/// strictly after `created_at` and at or before `deadline`, capped at
/// [`MAX_SCHEDULE_SLOTS`].
pub fn contribution_dates(
    created_at: NaiveDate,
    deadline: Option<NaiveDate>,
    frequency: ContributionFrequency,
    day: Option<u32>,
) -> Vec<NaiveDate> {
    let deadline = match deadline {
        Some(d) if d > created_at => d,
        _ => return Vec::new(),
    };

    match frequency {
        ContributionFrequency::None => Vec::new(),
        ContributionFrequency::Daily => walk_days(created_at + Duration::days(1), 1, deadline),
        ContributionFrequency::Weekly => {
            let first = match day.filter(|d| (1..=7).contains(d)) {
                Some(weekday) => {
                    let mut diff =
                        weekday as i64 - created_at.weekday().number_from_monday() as i64;
                    // creation on the preferred weekday pushes a full week out
                    if diff <= 0 {
                        diff += 7;
                    }
                    created_at + Duration::days(diff)
                }
                None => created_at + Duration::days(7),
            };
            walk_days(first, 7, deadline)
        }
        ContributionFrequency::Monthly => walk_months(created_at, day, deadline),
    }
}

fn walk_days(first: NaiveDate, step_days: i64, deadline: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut slot = first;
    while slot <= deadline && dates.len() < MAX_SCHEDULE_SLOTS {
        dates.push(slot);
        slot = slot + Duration::days(step_days);
    }
    dates
}

fn walk_months(created_at: NaiveDate, day: Option<u32>, deadline: NaiveDate) -> Vec<NaiveDate> {
    let explicit = day.filter(|d| (1..=31).contains(d));
    let target_day = explicit.unwrap_or_else(|| created_at.day());

    // With an explicit day the first slot stays in the creation month while
    // that day is still ahead; otherwise it starts one month out.
    let (mut year, mut month) = match explicit {
        Some(d) if created_at.day() < d => (created_at.year(), created_at.month()),
        _ => next_month(created_at.year(), created_at.month()),
    };

    let mut dates = Vec::new();
    loop {
        let slot = clamped_day_of_month(year, month, target_day);
        if slot <= created_at {
            // month-end clamping can collapse the slot onto the creation date
            (year, month) = next_month(year, month);
            continue;
        }
        if slot > deadline || dates.len() >= MAX_SCHEDULE_SLOTS {
            break;
        }
        dates.push(slot);
        (year, month) = next_month(year, month);
    }
    dates
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Requested day-of-month, clamped to the last day when the month is shorter.
/// The requested day is re-targeted every month, so day 31 yields
/// Jan 31, Feb 28, Mar 31.
fn clamped_day_of_month(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| last_day_of_month(year, month))
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("first of month is always a valid date")
        - Duration::days(1)
}

/// Materializes a plan over `dates`: a fixed ceiling quota per slot, with the
/// saved balance consumed greedily left to right.
///
/// The quota is `ceil(target / N)` for every installment; rounding may
/// overshoot the target by up to N-1 currency units and the plan is
/// deliberately not truncated early when it does.
pub fn build_plan(
    dates: &[NaiveDate],
    target_amount: Decimal,
    current_amount: Decimal,
) -> Vec<Installment> {
    if dates.is_empty() {
        return Vec::new();
    }

    let quota = (target_amount / Decimal::from(dates.len() as u64)).ceil();
    let mut remaining = current_amount.max(Decimal::ZERO);

    dates
        .iter()
        .enumerate()
        .map(|(index, due_date)| {
            let (status, paid_amount) = if remaining >= quota {
                remaining -= quota;
                (InstallmentStatus::Paid, quota)
            } else if remaining > Decimal::ZERO {
                let paid = remaining;
                remaining = Decimal::ZERO;
                (InstallmentStatus::Partial, paid)
            } else {
                (InstallmentStatus::Pending, Decimal::ZERO)
            };

            Installment {
                index,
                due_date: *due_date,
                quota_amount: quota,
                status,
                paid_amount,
            }
        })
        .collect()
}

/// Derives the next-due summary from a plan: the first not-fully-paid
/// installment is the current one; it is late when its due date has passed.
pub fn status_summary(plan: &[Installment], today: NaiveDate) -> GoalStatusSummary {
    if plan.is_empty() {
        return GoalStatusSummary::none();
    }

    for installment in plan {
        if installment.status != InstallmentStatus::Paid {
            let status = if installment.due_date < today {
                GoalScheduleStatus::Late
            } else {
                GoalScheduleStatus::OnTrack
            };
            return GoalStatusSummary {
                status,
                next_quota_amount: installment.quota_amount - installment.paid_amount,
                next_due_date: Some(installment.due_date),
            };
        }
    }

    GoalStatusSummary {
        status: GoalScheduleStatus::Completed,
        next_quota_amount: Decimal::ZERO,
        next_due_date: None,
    }
}

/// Full derived plan for a stored goal snapshot. Unparsable dates or
/// frequencies degrade to the empty plan.
pub fn plan_for_goal(goal: &SavingsGoal) -> Vec<Installment> {
    let created_at = match goal.created_date() {
        Some(date) => date,
        None => return Vec::new(),
    };
    let dates = contribution_dates(
        created_at,
        goal.deadline_date(),
        goal.frequency(),
        goal.contribution_day.and_then(|d| u32::try_from(d).ok()),
    );
    build_plan(&dates, goal.target_amount_decimal(), goal.current_amount_decimal())
}

/// Next-due summary for a stored goal snapshot.
pub fn summary_for_goal(goal: &SavingsGoal, today: NaiveDate) -> GoalStatusSummary {
    status_summary(&plan_for_goal(goal), today)
}
