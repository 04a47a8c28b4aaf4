use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    AccountKind, Engine, EngineError, NewInvestmentCmd, NewTransactionCmd, TransactionStatus,
    UpdateTransactionCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db)
}

fn transaction_cmd(
    origin: Uuid,
    destination: Uuid,
    amount_minor: i64,
    status: TransactionStatus,
) -> NewTransactionCmd {
    NewTransactionCmd {
        origin_account_id: origin,
        destination_account_id: destination,
        amount_minor,
        status,
        occurred_at: Utc::now(),
        voucher: None,
        note: None,
        created_by: Some("tests".to_string()),
    }
}

fn investment_cmd(origin: Uuid, destination: Uuid, amount_minor: i64) -> NewInvestmentCmd {
    NewInvestmentCmd {
        origin_account_id: origin,
        destination_account_id: destination,
        amount_minor,
        occurred_at: Utc::now(),
        note: None,
        created_by: Some("tests".to_string()),
    }
}

async fn balance(engine: &Engine, account_id: Uuid) -> i64 {
    engine.account(account_id).await.unwrap().balance_minor
}

#[tokio::test]
async fn worked_example_matches_expected_balances() {
    let (engine, _db) = engine_with_db().await;
    let mina = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();
    let comprador = engine
        .new_account("Comprador B", AccountKind::Comprador)
        .await
        .unwrap();

    engine
        .new_transaction(transaction_cmd(
            mina,
            comprador,
            2_000_000,
            TransactionStatus::Completed,
        ))
        .await
        .unwrap();
    engine
        .new_transaction(transaction_cmd(
            mina,
            comprador,
            500_000,
            TransactionStatus::Pending,
        ))
        .await
        .unwrap();
    engine
        .new_investment(investment_cmd(comprador, mina, 300_000))
        .await
        .unwrap();

    let summary = engine.recalculate_all().await.unwrap();
    assert_eq!(summary.accounts_updated, 2);
    // Pending transaction is recorded but not folded.
    assert_eq!(summary.entries_processed, 2);

    assert_eq!(balance(&engine, mina).await, -1_700_000);
    assert_eq!(balance(&engine, comprador).await, 1_700_000);
}

#[tokio::test]
async fn empty_ledger_recalculates_to_zero() {
    let (engine, _db) = engine_with_db().await;
    let mina = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();
    let caja = engine.new_account("Caja", AccountKind::Rodmar).await.unwrap();

    let summary = engine.recalculate_all().await.unwrap();
    assert_eq!(summary.entries_processed, 0);
    assert_eq!(summary.accounts_updated, 2);
    assert_eq!(balance(&engine, mina).await, 0);
    assert_eq!(balance(&engine, caja).await, 0);
}

#[tokio::test]
async fn balances_always_sum_to_zero_after_sweep() {
    let (engine, _db) = engine_with_db().await;
    let a = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();
    let b = engine
        .new_account("Comprador B", AccountKind::Comprador)
        .await
        .unwrap();
    let c = engine
        .new_account("Volquetero C", AccountKind::Volquetero)
        .await
        .unwrap();

    engine
        .new_transaction(transaction_cmd(a, b, 1_250_000, TransactionStatus::Completed))
        .await
        .unwrap();
    engine
        .new_transaction(transaction_cmd(b, c, 400_000, TransactionStatus::Completed))
        .await
        .unwrap();
    engine.new_investment(investment_cmd(c, a, 90_000)).await.unwrap();

    engine.recalculate_all().await.unwrap();

    let mut total = 0;
    for id in [a, b, c] {
        total += balance(&engine, id).await;
    }
    assert_eq!(total, 0);
}

#[tokio::test]
async fn pending_transactions_never_influence_balances() {
    let (engine, _db) = engine_with_db().await;
    let x = engine.new_account("Mina X", AccountKind::Mina).await.unwrap();
    let y = engine
        .new_account("Comprador Y", AccountKind::Comprador)
        .await
        .unwrap();

    let tx_id = engine
        .new_transaction(transaction_cmd(x, y, 1000, TransactionStatus::Pending))
        .await
        .unwrap();

    engine.recalculate_all().await.unwrap();
    assert_eq!(balance(&engine, x).await, 0);
    assert_eq!(balance(&engine, y).await, 0);

    engine.complete_transaction(tx_id).await.unwrap();
    engine.recalculate_all().await.unwrap();
    assert_eq!(balance(&engine, x).await, -1000);
    assert_eq!(balance(&engine, y).await, 1000);
}

#[tokio::test]
async fn completing_twice_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let x = engine.new_account("Mina X", AccountKind::Mina).await.unwrap();
    let y = engine.new_account("Caja", AccountKind::Rodmar).await.unwrap();

    let tx_id = engine
        .new_transaction(transaction_cmd(x, y, 1000, TransactionStatus::Completed))
        .await
        .unwrap();
    let err = engine.complete_transaction(tx_id).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::StatusConflict("transaction already completed".to_string())
    );
    // The double-completion must not have double-applied the deltas.
    assert_eq!(balance(&engine, y).await, 1000);
}

#[tokio::test]
async fn deleting_completed_transaction_restores_balances() {
    let (engine, _db) = engine_with_db().await;
    let mina = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();
    let caja = engine.new_account("Caja", AccountKind::Rodmar).await.unwrap();

    engine
        .new_transaction(transaction_cmd(mina, caja, 700_000, TransactionStatus::Completed))
        .await
        .unwrap();
    let tx_id = engine
        .new_transaction(transaction_cmd(mina, caja, 250_000, TransactionStatus::Completed))
        .await
        .unwrap();
    assert_eq!(balance(&engine, caja).await, 950_000);

    engine.delete_transaction(tx_id).await.unwrap();
    assert_eq!(balance(&engine, mina).await, -700_000);
    assert_eq!(balance(&engine, caja).await, 700_000);

    // A sweep agrees with the incremental revert.
    engine.recalculate_all().await.unwrap();
    assert_eq!(balance(&engine, mina).await, -700_000);
    assert_eq!(balance(&engine, caja).await, 700_000);
}

#[tokio::test]
async fn investments_affect_balances_immediately() {
    let (engine, _db) = engine_with_db().await;
    let x = engine.new_account("Mina X", AccountKind::Mina).await.unwrap();
    let y = engine
        .new_account("Comprador Y", AccountKind::Comprador)
        .await
        .unwrap();

    let investment_id = engine
        .new_investment(investment_cmd(x, y, 500))
        .await
        .unwrap();
    assert_eq!(balance(&engine, x).await, -500);
    assert_eq!(balance(&engine, y).await, 500);

    engine.recalculate_all().await.unwrap();
    assert_eq!(balance(&engine, x).await, -500);
    assert_eq!(balance(&engine, y).await, 500);

    engine.delete_investment(investment_id).await.unwrap();
    assert_eq!(balance(&engine, x).await, 0);
    assert_eq!(balance(&engine, y).await, 0);
}

#[tokio::test]
async fn recalculate_all_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let mina = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();
    let caja = engine.new_account("Caja", AccountKind::Rodmar).await.unwrap();

    engine
        .new_transaction(transaction_cmd(mina, caja, 123_456, TransactionStatus::Completed))
        .await
        .unwrap();
    engine.new_investment(investment_cmd(caja, mina, 111)).await.unwrap();

    let first = engine.recalculate_all().await.unwrap();
    let mina_first = balance(&engine, mina).await;
    let caja_first = balance(&engine, caja).await;

    let second = engine.recalculate_all().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(balance(&engine, mina).await, mina_first);
    assert_eq!(balance(&engine, caja).await, caja_first);
}

#[tokio::test]
async fn recalculate_for_account_matches_full_sweep() {
    let (engine, _db) = engine_with_db().await;
    let a = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();
    let b = engine
        .new_account("Comprador B", AccountKind::Comprador)
        .await
        .unwrap();
    let c = engine.new_account("Caja", AccountKind::Rodmar).await.unwrap();

    engine
        .new_transaction(transaction_cmd(a, b, 800_000, TransactionStatus::Completed))
        .await
        .unwrap();
    engine
        .new_transaction(transaction_cmd(b, c, 150_000, TransactionStatus::Pending))
        .await
        .unwrap();
    engine.new_investment(investment_cmd(c, b, 60_000)).await.unwrap();

    engine.recalculate_all().await.unwrap();
    let full_sweep_b = balance(&engine, b).await;

    let targeted_b = engine.recalculate_for_account(b).await.unwrap();
    assert_eq!(targeted_b, full_sweep_b);
    assert_eq!(balance(&engine, b).await, full_sweep_b);
}

#[tokio::test]
async fn recalculate_restores_corrupted_balances() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();

    let mina = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();
    let caja = engine.new_account("Caja", AccountKind::Rodmar).await.unwrap();
    engine
        .new_transaction(transaction_cmd(mina, caja, 42_000, TransactionStatus::Completed))
        .await
        .unwrap();

    // Corrupt denormalized balances directly in DB.
    for id in [mina, caja] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "UPDATE accounts SET balance_minor = ? WHERE id = ?;",
            vec![999i64.into(), id.to_string().into()],
        ))
        .await
        .unwrap();
    }

    engine.recalculate_all().await.unwrap();
    assert_eq!(balance(&engine, mina).await, -42_000);
    assert_eq!(balance(&engine, caja).await, 42_000);
}

#[tokio::test]
async fn integrity_violation_fails_sweep_and_preserves_balances() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();

    let mina = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();
    let caja = engine.new_account("Caja", AccountKind::Rodmar).await.unwrap();
    engine
        .new_transaction(transaction_cmd(mina, caja, 10_000, TransactionStatus::Completed))
        .await
        .unwrap();

    // Insert an orphan entry referencing a nonexistent account, bypassing the
    // engine validation (simulates a bad import).
    let orphan_id = Uuid::new_v4();
    let missing_account = Uuid::new_v4();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO transactions \
         (id, origin_account_id, destination_account_id, amount_minor, currency, status, occurred_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?);",
        vec![
            orphan_id.to_string().into(),
            missing_account.to_string().into(),
            caja.to_string().into(),
            5_000i64.into(),
            "COP".into(),
            "completed".into(),
            Utc::now().into(),
        ],
    ))
    .await
    .unwrap();

    let err = engine.recalculate_all().await.unwrap_err();
    match err {
        EngineError::LedgerIntegrity(message) => {
            assert!(message.contains(&orphan_id.to_string()));
            assert!(message.contains(&missing_account.to_string()));
        }
        other => panic!("expected LedgerIntegrity, got {other:?}"),
    }

    // The failed sweep rolled back: balances still match the valid ledger.
    assert_eq!(balance(&engine, mina).await, -10_000);
    assert_eq!(balance(&engine, caja).await, 10_000);
}

#[tokio::test]
async fn pending_orphan_entry_fails_sweep() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();

    let mina = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();
    let caja = engine.new_account("Caja", AccountKind::Rodmar).await.unwrap();
    engine
        .new_transaction(transaction_cmd(mina, caja, 10_000, TransactionStatus::Completed))
        .await
        .unwrap();

    // A pending entry never folds into balances, but its references must
    // still be valid: an orphan origin is an integrity violation.
    let orphan_id = Uuid::new_v4();
    let missing_account = Uuid::new_v4();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO transactions \
         (id, origin_account_id, destination_account_id, amount_minor, currency, status, occurred_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?);",
        vec![
            orphan_id.to_string().into(),
            missing_account.to_string().into(),
            caja.to_string().into(),
            5_000i64.into(),
            "COP".into(),
            "pending".into(),
            Utc::now().into(),
        ],
    ))
    .await
    .unwrap();

    let err = engine.recalculate_all().await.unwrap_err();
    match err {
        EngineError::LedgerIntegrity(message) => {
            assert!(message.contains(&orphan_id.to_string()));
            assert!(message.contains(&missing_account.to_string()));
        }
        other => panic!("expected LedgerIntegrity, got {other:?}"),
    }

    assert_eq!(balance(&engine, mina).await, -10_000);
    assert_eq!(balance(&engine, caja).await, 10_000);
}

#[tokio::test]
async fn orphan_counterparty_fails_targeted_recalculation() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();

    let caja = engine.new_account("Caja", AccountKind::Rodmar).await.unwrap();

    // Orphan investment touching the account under recalculation.
    let orphan_id = Uuid::new_v4();
    let missing_account = Uuid::new_v4();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO investments \
         (id, origin_account_id, destination_account_id, amount_minor, currency, occurred_at) \
         VALUES (?, ?, ?, ?, ?, ?);",
        vec![
            orphan_id.to_string().into(),
            missing_account.to_string().into(),
            caja.to_string().into(),
            7_000i64.into(),
            "COP".into(),
            Utc::now().into(),
        ],
    ))
    .await
    .unwrap();

    let err = engine.recalculate_for_account(caja).await.unwrap_err();
    match err {
        EngineError::LedgerIntegrity(message) => {
            assert!(message.contains(&orphan_id.to_string()));
            assert!(message.contains(&missing_account.to_string()));
        }
        other => panic!("expected LedgerIntegrity, got {other:?}"),
    }

    // The cached balance was not rewritten by the failed fold.
    assert_eq!(balance(&engine, caja).await, 0);
}

#[tokio::test]
async fn update_transaction_rebases_balances() {
    let (engine, _db) = engine_with_db().await;
    let mina = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();
    let caja = engine.new_account("Caja", AccountKind::Rodmar).await.unwrap();

    let tx_id = engine
        .new_transaction(transaction_cmd(mina, caja, 100_000, TransactionStatus::Completed))
        .await
        .unwrap();

    engine
        .update_transaction(UpdateTransactionCmd {
            transaction_id: tx_id,
            amount_minor: Some(150_000),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(balance(&engine, mina).await, -150_000);
    assert_eq!(balance(&engine, caja).await, 150_000);

    engine.recalculate_all().await.unwrap();
    assert_eq!(balance(&engine, caja).await, 150_000);
}

#[tokio::test]
async fn duplicate_account_names_are_rejected_accent_insensitively() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_account("Mina El Níspero", AccountKind::Mina)
        .await
        .unwrap();

    let err = engine
        .new_account("mina el nispero", AccountKind::Mina)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("mina el nispero".to_string()));
}

#[tokio::test]
async fn delete_account_rejected_while_referenced() {
    let (engine, _db) = engine_with_db().await;
    let mina = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();
    let caja = engine.new_account("Caja", AccountKind::Rodmar).await.unwrap();

    let tx_id = engine
        .new_transaction(transaction_cmd(mina, caja, 1_000, TransactionStatus::Pending))
        .await
        .unwrap();

    let err = engine.delete_account(mina).await.unwrap_err();
    assert!(matches!(err, EngineError::AccountInUse(_)));

    // Once the referencing entry is gone, deletion succeeds.
    engine.delete_transaction(tx_id).await.unwrap();
    engine.delete_account(mina).await.unwrap();
    assert_eq!(
        engine.account(mina).await.unwrap_err(),
        EngineError::KeyNotFound("account not exists".to_string())
    );
}

#[tokio::test]
async fn transaction_to_unknown_account_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let mina = engine.new_account("Mina A", AccountKind::Mina).await.unwrap();

    let err = engine
        .new_transaction(transaction_cmd(
            mina,
            Uuid::new_v4(),
            1_000,
            TransactionStatus::Completed,
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("account not exists".to_string())
    );
}
