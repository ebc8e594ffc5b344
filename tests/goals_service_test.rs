use std::sync::Arc;

use chrono::{Duration, Local};
use rust_decimal_macros::dec;

use moneta_core::constants::DATE_FORMAT;
use moneta_core::goals::{
    ContributionFrequency, GoalRepository, GoalScheduleStatus, GoalService, GoalServiceTrait,
    InstallmentStatus, SavingsGoalDraft, WithdrawalRequest,
};
use moneta_core::Error;

mod common;

fn goal_service(db: &common::TestDb) -> GoalService<GoalRepository> {
    let repo = Arc::new(GoalRepository::new(db.pool.clone(), db.writer.clone()));
    GoalService::new(repo)
}

fn draft(name: &str, target: rust_decimal::Decimal) -> SavingsGoalDraft {
    SavingsGoalDraft {
        name: name.to_string(),
        target_amount: target,
        deadline: None,
        contribution_frequency: ContributionFrequency::None,
        contribution_day: None,
        icon: None,
        color: None,
        notes: None,
    }
}

#[tokio::test]
async fn test_goal_lifecycle() {
    let db = common::setup();
    let service = goal_service(&db);

    let today = Local::now().date_naive();
    let deadline = (today + Duration::days(30)).format(DATE_FORMAT).to_string();

    let mut new_goal = draft("Trip to Patagonia", dec!(3000));
    new_goal.deadline = Some(deadline);
    new_goal.contribution_frequency = ContributionFrequency::Daily;
    let goal = service.create_goal(new_goal).await.unwrap();
    assert_eq!(goal.current_amount_decimal(), dec!(0));

    // contribute from two banks
    let (_, updated) = service
        .contribute(&goal.id, dec!(150), Some("Andes".to_string()), None)
        .await
        .unwrap();
    assert_eq!(updated.current_amount_decimal(), dec!(150));

    let (_, updated) = service
        .contribute(&goal.id, dec!(100), Some("Cumbre".to_string()), None)
        .await
        .unwrap();
    assert_eq!(updated.current_amount_decimal(), dec!(250));

    let dtos = service.get_goals().unwrap();
    assert_eq!(dtos[0].current_amount, 250.0);
    assert_eq!(dtos[0].percent_complete, 8.3);

    // the derived plan: 30 daily slots, ceil(3000/30) = 100 each
    let plan = service.get_goal_schedule(&goal.id).unwrap();
    assert_eq!(plan.len(), 30);
    assert_eq!(plan[0].quota_amount, dec!(100));
    assert_eq!(plan[0].status, InstallmentStatus::Paid);
    assert_eq!(plan[1].status, InstallmentStatus::Paid);
    assert_eq!(plan[2].status, InstallmentStatus::Partial);
    assert_eq!(plan[2].paid_amount, dec!(50));
    assert_eq!(plan[3].status, InstallmentStatus::Pending);

    let status = service.get_goal_status(&goal.id).unwrap();
    assert_eq!(status.status, GoalScheduleStatus::OnTrack);
    assert_eq!(status.next_quota_amount, dec!(50));
    assert_eq!(status.next_due_date, Some(today + Duration::days(3)));

    // withdraw against the bank that can cover it, then repay
    let repay_by = (today + Duration::days(10)).format(DATE_FORMAT).to_string();
    let (withdrawal, updated) = service
        .withdraw(
            &goal.id,
            WithdrawalRequest {
                amount: dec!(100),
                reason: Some("Car repair".to_string()),
                category: None,
                bank: Some("Andes".to_string()),
                repay_by,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.current_amount_decimal(), dec!(150));
    assert!(!withdrawal.repaid);

    let pending = service.get_pending_withdrawals().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].goal_name, "Trip to Patagonia");
    assert_eq!(pending[0].amount, dec!(100));

    let updated = service.repay_withdrawal(&withdrawal.id).await.unwrap();
    assert_eq!(updated.current_amount_decimal(), dec!(250));
    assert!(service.get_pending_withdrawals().unwrap().is_empty());

    // the unified ledger: 4 contribution rows (2 deposits, release, restore)
    // plus the withdrawal
    let history = service.get_goal_history(&goal.id).unwrap();
    assert_eq!(history.len(), 5);
    let net: rust_decimal::Decimal = history.iter().map(|e| e.amount).sum();
    assert_eq!(net, dec!(150));

    let banks = service.get_goal_banks(&goal.id).unwrap();
    assert_eq!(banks.len(), 2);
    assert_eq!(banks[0].bank, "Andes");
    assert_eq!(banks[0].total, dec!(150));
    assert_eq!(banks[1].bank, "Cumbre");
    assert_eq!(banks[1].total, dec!(100));

    let by_bank = service.get_savings_by_bank().unwrap();
    assert_eq!(by_bank.get("Andes"), Some(&dec!(150)));
    assert_eq!(by_bank.get("Cumbre"), Some(&dec!(100)));

    let summary = service.get_savings_summary().unwrap();
    assert_eq!(summary.total_saved, dec!(250));
    assert_eq!(summary.goal_count, 1);

    // completing the goal clears the ledger
    service.complete_goal(&goal.id).await.unwrap();
    assert!(service.get_goals().unwrap().is_empty());
    assert!(service.get_savings_by_bank().unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_ledger_rows_recomputes_the_balance() {
    let db = common::setup();
    let service = goal_service(&db);

    let goal = service.create_goal(draft("Laptop", dec!(1000))).await.unwrap();
    let (first, _) = service
        .contribute(&goal.id, dec!(300), Some("Andes".to_string()), None)
        .await
        .unwrap();
    service
        .contribute(&goal.id, dec!(200), None, None)
        .await
        .unwrap();

    let updated = service.delete_contribution(&first.id).await.unwrap();
    assert_eq!(updated.current_amount_decimal(), dec!(200));

    let history = service.get_goal_history(&goal.id).unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_deleting_a_withdrawal_also_removes_its_release_row() {
    let db = common::setup();
    let service = goal_service(&db);

    let goal = service.create_goal(draft("Laptop", dec!(1000))).await.unwrap();
    service
        .contribute(&goal.id, dec!(500), Some("Andes".to_string()), None)
        .await
        .unwrap();

    let (withdrawal, updated) = service
        .withdraw(
            &goal.id,
            WithdrawalRequest {
                amount: dec!(200),
                reason: None,
                category: None,
                bank: Some("Andes".to_string()),
                repay_by: "2030-01-01".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.current_amount_decimal(), dec!(300));

    let updated = service.delete_withdrawal(&withdrawal.id).await.unwrap();
    assert_eq!(updated.current_amount_decimal(), dec!(500));
    assert_eq!(service.get_goal_history(&goal.id).unwrap().len(), 1);
}

#[tokio::test]
async fn test_goal_validation_rules() {
    let db = common::setup();
    let service = goal_service(&db);

    let err = service.create_goal(draft("", dec!(100))).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = service
        .create_goal(draft("Zero target", dec!(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let mut bad_day = draft("Bad day", dec!(100));
    bad_day.contribution_frequency = ContributionFrequency::Weekly;
    bad_day.contribution_day = Some(8);
    let err = service.create_goal(bad_day).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let mut bad_deadline = draft("Bad deadline", dec!(100));
    bad_deadline.deadline = Some("31/12/2030".to_string());
    let err = service.create_goal(bad_deadline).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_mutation_guards() {
    let db = common::setup();
    let service = goal_service(&db);

    let goal = service.create_goal(draft("Guarded", dec!(1000))).await.unwrap();

    let err = service
        .contribute(&goal.id, dec!(0), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Goal(_)));

    // more than the saved balance
    let err = service
        .withdraw(
            &goal.id,
            WithdrawalRequest {
                amount: dec!(50),
                reason: None,
                category: None,
                bank: None,
                repay_by: "2030-01-01".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Goal(_)));

    // more than the named bank holds for this goal
    service
        .contribute(&goal.id, dec!(100), Some("Andes".to_string()), None)
        .await
        .unwrap();
    service
        .contribute(&goal.id, dec!(400), Some("Cumbre".to_string()), None)
        .await
        .unwrap();
    let err = service
        .withdraw(
            &goal.id,
            WithdrawalRequest {
                amount: dec!(300),
                reason: None,
                category: None,
                bank: Some("Andes".to_string()),
                repay_by: "2030-01-01".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Goal(_)));

    // repaying twice is rejected
    let (withdrawal, _) = service
        .withdraw(
            &goal.id,
            WithdrawalRequest {
                amount: dec!(100),
                reason: None,
                category: None,
                bank: Some("Andes".to_string()),
                repay_by: "2030-01-01".to_string(),
            },
        )
        .await
        .unwrap();
    service.repay_withdrawal(&withdrawal.id).await.unwrap();
    let err = service.repay_withdrawal(&withdrawal.id).await.unwrap_err();
    assert!(matches!(err, Error::Goal(_)));

    let err = service.get_goal("missing").unwrap_err();
    assert!(matches!(err, Error::Goal(_)));
}

#[tokio::test]
async fn test_goal_without_schedule_reports_none() {
    let db = common::setup();
    let service = goal_service(&db);

    let goal = service.create_goal(draft("No plan", dec!(500))).await.unwrap();

    assert!(service.get_goal_schedule(&goal.id).unwrap().is_empty());
    let status = service.get_goal_status(&goal.id).unwrap();
    assert_eq!(status.status, GoalScheduleStatus::None);
    assert_eq!(status.next_due_date, None);
}
