use std::sync::Arc;

use rust_decimal_macros::dec;

use moneta_core::banks::{BankRepository, BankService, BankServiceTrait};
use moneta_core::categories::{CategoryRepository, CategoryService, CategoryServiceTrait};
use moneta_core::constants::TRANSFER_CATEGORY;
use moneta_core::transactions::{
    TransactionFilters, TransactionInput, TransactionKind, TransactionRepository,
    TransactionService, TransactionServiceTrait, TransactionUpdate, TransferInput,
};
use moneta_core::Error;

mod common;

struct Services {
    transactions: TransactionService,
    banks: BankService<BankRepository>,
    categories: CategoryService<CategoryRepository>,
}

fn setup_services(db: &common::TestDb) -> Services {
    let bank_repo = Arc::new(BankRepository::new(db.pool.clone(), db.writer.clone()));
    let transaction_repo = Arc::new(TransactionRepository::new(
        db.pool.clone(),
        db.writer.clone(),
    ));
    let category_repo = Arc::new(CategoryRepository::new(db.pool.clone(), db.writer.clone()));

    Services {
        transactions: TransactionService::new(transaction_repo, bank_repo.clone()),
        banks: BankService::new(bank_repo),
        categories: CategoryService::new(category_repo),
    }
}

fn input(
    date: &str,
    kind: TransactionKind,
    category: &str,
    bank: Option<&str>,
    amount: rust_decimal::Decimal,
) -> TransactionInput {
    TransactionInput {
        date: date.to_string(),
        kind,
        category: category.to_string(),
        description: format!("{} entry", category),
        bank: bank.map(|b| b.to_string()),
        account: None,
        amount,
    }
}

#[tokio::test]
async fn test_transactions_and_balances() {
    let db = common::setup();
    let services = setup_services(&db);

    services.banks.create_bank("Andes".to_string()).await.unwrap();
    services.banks.create_bank("Cumbre".to_string()).await.unwrap();

    services
        .transactions
        .create_transaction(input(
            "2024-05-01",
            TransactionKind::Income,
            "Salary",
            Some("Andes"),
            dec!(5000),
        ))
        .await
        .unwrap();
    services
        .transactions
        .create_transaction(input(
            "2024-05-02",
            TransactionKind::Expense,
            "Food",
            Some("Andes"),
            dec!(1200),
        ))
        .await
        .unwrap();

    services
        .transactions
        .create_transfer(TransferInput {
            date: "2024-05-03".to_string(),
            from_bank: "Andes".to_string(),
            to_bank: "Cumbre".to_string(),
            amount: dec!(500),
            description: None,
        })
        .await
        .unwrap();

    // the global list hides the transfer pair
    let visible = services
        .transactions
        .get_transactions(&TransactionFilters::default())
        .unwrap();
    assert_eq!(visible.len(), 2);

    let everything = services
        .transactions
        .get_transactions(&TransactionFilters {
            include_transfers: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(everything.len(), 4);

    // a bank filter shows that bank's transfer leg too
    let andes_rows = services
        .transactions
        .get_transactions(&TransactionFilters {
            bank: Some("Andes".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(andes_rows.len(), 3);

    let transfer_rows = services
        .transactions
        .get_transactions(&TransactionFilters {
            category: Some(TRANSFER_CATEGORY.to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(transfer_rows.len(), 2);
    assert!(transfer_rows.iter().all(|t| t.amount_decimal() == dec!(500)));

    let limited = services
        .transactions
        .get_transactions(&TransactionFilters {
            include_transfers: true,
            limit: Some(1),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(limited.len(), 1);
    // ordered by date descending
    assert_eq!(limited[0].date, "2024-05-03");

    let balances = services.transactions.get_bank_balances().unwrap();
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].bank, "Andes");
    assert_eq!(balances[0].total_income, dec!(5000));
    assert_eq!(balances[0].total_expense, dec!(1700));
    assert_eq!(balances[0].balance, dec!(3300));
    assert_eq!(balances[1].bank, "Cumbre");
    assert_eq!(balances[1].balance, dec!(500));

    let with_balance = services.transactions.get_banks_with_balance().unwrap();
    assert_eq!(with_balance.len(), 2);
    assert_eq!(with_balance[0].name, "Andes");
    assert_eq!(with_balance[0].balance, dec!(3300));
}

#[tokio::test]
async fn test_update_rederives_income_and_expense() {
    let db = common::setup();
    let services = setup_services(&db);

    let tx = services
        .transactions
        .create_transaction(input(
            "2024-05-01",
            TransactionKind::Expense,
            "Food",
            None,
            dec!(100),
        ))
        .await
        .unwrap();
    assert_eq!(tx.expense_decimal(), dec!(100));
    assert_eq!(tx.income_decimal(), dec!(0));

    // flipping the kind moves the amount across the derived columns
    let tx = services
        .transactions
        .update_transaction(
            &tx.id,
            TransactionUpdate {
                kind: Some(TransactionKind::Income),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(tx.income_decimal(), dec!(100));
    assert_eq!(tx.expense_decimal(), dec!(0));

    // a new amount applies to the effective kind
    let tx = services
        .transactions
        .update_transaction(
            &tx.id,
            TransactionUpdate {
                amount: Some(dec!(-250)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(tx.amount_decimal(), dec!(250));
    assert_eq!(tx.income_decimal(), dec!(250));
    assert_eq!(tx.expense_decimal(), dec!(0));
}

#[tokio::test]
async fn test_transaction_guards() {
    let db = common::setup();
    let services = setup_services(&db);

    let err = services
        .transactions
        .create_transaction(input(
            "05/01/2024",
            TransactionKind::Income,
            "Salary",
            None,
            dec!(100),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = services
        .transactions
        .create_transfer(TransferInput {
            date: "2024-05-03".to_string(),
            from_bank: "Andes".to_string(),
            to_bank: "Andes".to_string(),
            amount: dec!(500),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transaction(_)));

    let err = services
        .transactions
        .create_transfer(TransferInput {
            date: "2024-05-03".to_string(),
            from_bank: "Andes".to_string(),
            to_bank: "Cumbre".to_string(),
            amount: dec!(0),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transaction(_)));

    let err = services
        .transactions
        .delete_transaction("missing")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transaction(_)));
}

#[tokio::test]
async fn test_category_delete_is_guarded_by_usage() {
    let db = common::setup();
    let services = setup_services(&db);

    let food = services
        .categories
        .create_category("Food".to_string(), false)
        .await
        .unwrap();
    let unused = services
        .categories
        .create_category("Unused".to_string(), true)
        .await
        .unwrap();
    assert!(food.is_expense());
    assert!(unused.is_income());

    services
        .transactions
        .create_transaction(input(
            "2024-05-01",
            TransactionKind::Expense,
            "Food",
            None,
            dec!(50),
        ))
        .await
        .unwrap();

    let err = services.categories.delete_category(&food.id).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let deleted = services.categories.delete_category(&unused.id).await.unwrap();
    assert_eq!(deleted, 1);
}
