mod common;

use credit_ledger::error::AppError;
use credit_ledger::models::{CreditType, Currency, Money};
use credit_ledger::services::{CreditRequest, DebitRequest};

fn credit(credit_type: CreditType, amount: i64, currency: Currency, tx: &str) -> CreditRequest {
    CreditRequest::new(credit_type, amount, currency, tx)
}

#[tokio::test]
async fn test_credits_accumulate_per_type_and_currency() {
    let service = common::new_service();

    service
        .process_credit("cust-1", credit(CreditType::GiftCard, 15, Currency::USD, "t1"))
        .await
        .unwrap();
    service
        .process_credit("cust-1", credit(CreditType::GiftCard, 10, Currency::USD, "t2"))
        .await
        .unwrap();
    let snapshot = service
        .process_credit("cust-1", credit(CreditType::Promotion, 30, Currency::EUR, "t3"))
        .await
        .unwrap();

    assert_eq!(snapshot.amount_for(CreditType::GiftCard, Currency::USD), Some(25));
    assert_eq!(snapshot.amount_for(CreditType::Promotion, Currency::EUR), Some(30));
    assert_eq!(snapshot.amount_for(CreditType::Cash, Currency::USD), None);
}

/// The canonical multi-step flow: two credit types, two debits that drain
/// the account to empty, with history attributing every slice to its source
/// grant in consumption order.
#[tokio::test]
async fn test_priority_consumption_scenario() {
    let service = common::new_service();

    for (credit_type, amount, tx) in [
        (CreditType::GiftCard, 15, "t1"),
        (CreditType::Cash, 10, "t2"),
        (CreditType::Cash, 17, "t3"),
        (CreditType::GiftCard, 10, "t4"),
    ] {
        service
            .process_credit("cust-1", credit(credit_type, amount, Currency::USD, tx))
            .await
            .unwrap();
    }

    let balance = service.get_balance("cust-1").await;
    assert_eq!(balance.amount_for(CreditType::GiftCard, Currency::USD), Some(25));
    assert_eq!(balance.amount_for(CreditType::Cash, Currency::USD), Some(27));

    // First debit: drains both gift cards, cash untouched.
    let after_first = service
        .process_debit("cust-1", DebitRequest::new("i1", 25, Currency::USD))
        .await
        .unwrap();
    assert_eq!(after_first.amount_for(CreditType::GiftCard, Currency::USD), None);
    assert_eq!(after_first.amount_for(CreditType::Cash, Currency::USD), Some(27));

    // Second debit: drains the cash, account is empty.
    let after_second = service
        .process_debit("cust-1", DebitRequest::new("i2", 27, Currency::USD))
        .await
        .unwrap();
    assert!(after_second.is_empty());

    let history = service.debit_history("cust-1").await;
    let slices: Vec<_> = history
        .iter()
        .map(|d| {
            (
                d.invoice_id.as_str(),
                d.amount.amount,
                d.credit_type,
                d.transaction_id.as_str(),
            )
        })
        .collect();
    assert_eq!(
        slices,
        vec![
            ("i1", 15, CreditType::GiftCard, "t1"),
            ("i1", 10, CreditType::GiftCard, "t4"),
            ("i2", 10, CreditType::Cash, "t2"),
            ("i2", 17, CreditType::Cash, "t3"),
        ]
    );
    assert!(history.iter().all(|d| d.amount.currency == Currency::USD));
}

#[tokio::test]
async fn test_split_debit_records_sum_to_amount() {
    let service = common::new_service();

    service
        .process_credit("cust-1", credit(CreditType::Cash, 5, Currency::USD, "t1"))
        .await
        .unwrap();
    service
        .process_credit("cust-1", credit(CreditType::Cash, 5, Currency::USD, "t2"))
        .await
        .unwrap();
    service
        .process_credit("cust-1", credit(CreditType::Cash, 5, Currency::USD, "t3"))
        .await
        .unwrap();

    service
        .process_debit("cust-1", DebitRequest::new("i1", 12, Currency::USD))
        .await
        .unwrap();

    let history = service.debit_history("cust-1").await;
    assert_eq!(history.len(), 3);
    assert_eq!(history.iter().map(|d| d.amount.amount).sum::<i64>(), 12);
    // Oldest grants drain first; the last is only partially consumed.
    assert_eq!(history[0].transaction_id, "t1");
    assert_eq!(history[1].transaction_id, "t2");
    assert_eq!(history[2].transaction_id, "t3");
    assert_eq!(history[2].amount.amount, 2);

    let balance = service.get_balance("cust-1").await;
    assert_eq!(balance.amount_for(CreditType::Cash, Currency::USD), Some(3));
}

#[tokio::test]
async fn test_overdraw_is_rejected_without_mutation() {
    let service = common::new_service();

    service
        .process_credit("cust-1", credit(CreditType::GiftCard, 15, Currency::USD, "t1"))
        .await
        .unwrap();

    let err = service
        .process_debit("cust-1", DebitRequest::new("i1", 16, Currency::USD))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientCredit {
            requested: 16,
            available: 15,
            currency: Currency::USD,
        }
    ));

    let balance = service.get_balance("cust-1").await;
    assert_eq!(balance.amount_for(CreditType::GiftCard, Currency::USD), Some(15));
    assert!(service.debit_history("cust-1").await.is_empty());
}

#[tokio::test]
async fn test_currencies_are_independent_buckets() {
    let service = common::new_service();

    service
        .process_credit("cust-1", credit(CreditType::Cash, 100, Currency::USD, "t1"))
        .await
        .unwrap();
    service
        .process_credit("cust-1", credit(CreditType::Cash, 40, Currency::EUR, "t2"))
        .await
        .unwrap();

    // EUR balance cannot cover a 50 EUR debit even though USD could.
    let err = service
        .process_debit("cust-1", DebitRequest::new("i1", 50, Currency::EUR))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientCredit { available: 40, currency: Currency::EUR, .. }
    ));

    let snapshot = service
        .process_debit("cust-1", DebitRequest::new("i2", 60, Currency::USD))
        .await
        .unwrap();
    assert_eq!(snapshot.amount_for(CreditType::Cash, Currency::USD), Some(40));
    assert_eq!(snapshot.amount_for(CreditType::Cash, Currency::EUR), Some(40));
    assert_eq!(
        snapshot.balances.get(&CreditType::Cash),
        Some(&vec![Money::new(40, Currency::USD), Money::new(40, Currency::EUR)])
    );
}

#[tokio::test]
async fn test_delete_account_clears_state_but_allows_recrediting() {
    let service = common::new_service();

    service
        .process_credit("cust-1", credit(CreditType::Cash, 50, Currency::USD, "t1"))
        .await
        .unwrap();

    let last = service.delete_account("cust-1").await.unwrap();
    assert_eq!(last.amount_for(CreditType::Cash, Currency::USD), Some(50));
    assert!(service.get_balance("cust-1").await.is_empty());

    // A fresh grant (new transaction id) opens a new ledger.
    let snapshot = service
        .process_credit("cust-1", credit(CreditType::Cash, 5, Currency::USD, "t2"))
        .await
        .unwrap();
    assert_eq!(snapshot.amount_for(CreditType::Cash, Currency::USD), Some(5));
}

#[tokio::test]
async fn test_history_interleaving_is_stable_across_reads() {
    let service = common::new_service();

    service
        .process_credit("cust-1", credit(CreditType::Cash, 10, Currency::USD, "t1"))
        .await
        .unwrap();
    service
        .process_credit("cust-1", credit(CreditType::Cash, 10, Currency::EUR, "t2"))
        .await
        .unwrap();
    service
        .process_debit("cust-1", DebitRequest::new("i1", 10, Currency::EUR))
        .await
        .unwrap();
    service
        .process_debit("cust-1", DebitRequest::new("i2", 10, Currency::USD))
        .await
        .unwrap();

    let first = service.debit_history("cust-1").await;
    let second = service.debit_history("cust-1").await;

    let order = |items: &[credit_ledger::models::DebitLineItem]| {
        items.iter().map(|d| d.invoice_id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(order(&first), order(&second));
    // USD was credited first, so its records lead the concatenation.
    assert_eq!(order(&first), vec!["i2".to_string(), "i1".to_string()]);
}
