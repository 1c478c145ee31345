// File: quizkid-core/tests/redemption_service_tests.rs

use std::sync::Arc;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use mockall::mock;
use uuid::Uuid;

use quizkid_common::models::redeemable::{
    ItemCategory, RedeemableItem, Redemption, RedemptionStatus,
};
use quizkid_common::models::transaction::{ActivityType, TransactionKind, WalletTransaction};
use quizkid_common::models::wallet::Wallet;
use quizkid_common::traits::repository_traits::{
    RedeemableItemRepository, RedemptionRepository, WalletRepository, WalletTransactionRepository,
};
use quizkid_core::services::redemption_service::RedemptionService;
use quizkid_core::Error;

mock! {
    ItemRepo {}
    #[async_trait]
    impl RedeemableItemRepository for ItemRepo {
        async fn create_item(&self, item: &RedeemableItem) -> Result<(), Error>;
        async fn get_item(&self, item_id: Uuid) -> Result<Option<RedeemableItem>, Error>;
        async fn update_item(&self, item: &RedeemableItem) -> Result<(), Error>;
        async fn delete_item(&self, item_id: Uuid) -> Result<(), Error>;
        async fn list_active_items(&self) -> Result<Vec<RedeemableItem>, Error>;
    }
}

mock! {
    RedemptionRepo {}
    #[async_trait]
    impl RedemptionRepository for RedemptionRepo {
        async fn create_redemption(&self, redemption: &Redemption) -> Result<(), Error>;
        async fn get_redemption(&self, redemption_id: Uuid) -> Result<Option<Redemption>, Error>;
        async fn update_redemption(&self, redemption: &Redemption) -> Result<(), Error>;
        async fn list_for_wallet(&self, wallet_id: Uuid, limit: i64) -> Result<Vec<Redemption>, Error>;
        async fn list_pending(&self) -> Result<Vec<Redemption>, Error>;
    }
}

mock! {
    WalletRepo {}
    #[async_trait]
    impl WalletRepository for WalletRepo {
        async fn create_wallet(&self, wallet: &Wallet) -> Result<(), Error>;
        async fn get_wallet(&self, wallet_id: Uuid) -> Result<Option<Wallet>, Error>;
        async fn get_wallet_by_kid(&self, kid_id: Uuid) -> Result<Option<Wallet>, Error>;
        async fn update_wallet(&self, wallet: &Wallet) -> Result<(), Error>;
    }
}

mock! {
    LedgerRepo {}
    #[async_trait]
    impl WalletTransactionRepository for LedgerRepo {
        async fn insert_transaction(&self, tx: &WalletTransaction) -> Result<(), Error>;
        async fn list_for_wallet(
            &self,
            wallet_id: Uuid,
            limit: i64,
            offset: i64,
        ) -> Result<Vec<WalletTransaction>, Error>;
        async fn list_for_wallet_by_activity(
            &self,
            wallet_id: Uuid,
            activity: ActivityType,
            limit: i64,
        ) -> Result<Vec<WalletTransaction>, Error>;
        async fn activity_exists_on(
            &self,
            wallet_id: Uuid,
            activity: ActivityType,
            date: NaiveDate,
        ) -> Result<bool, Error>;
        async fn count_for_wallet(&self, wallet_id: Uuid) -> Result<i64, Error>;
    }
}

fn service_with(
    item_repo: MockItemRepo,
    redemption_repo: MockRedemptionRepo,
    wallet_repo: MockWalletRepo,
    ledger_repo: MockLedgerRepo,
) -> RedemptionService {
    RedemptionService::new(
        Arc::new(item_repo),
        Arc::new(redemption_repo),
        Arc::new(wallet_repo),
        Arc::new(ledger_repo),
    )
}

fn sticker_pack() -> RedeemableItem {
    let now = Utc::now();
    RedeemableItem {
        item_id: Uuid::new_v4(),
        name: "Sticker pack".to_string(),
        description: "A pack of holographic stickers".to_string(),
        category: ItemCategory::Toys,
        coins_cost: Some(50),
        silver_gems_cost: None,
        gold_coins_cost: None,
        rubies_cost: None,
        sapphires_cost: None,
        diamonds_cost: None,
        min_level: 1,
        quantity_available: 3,
        is_active: true,
        expires_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn rich_wallet(kid_id: Uuid) -> Wallet {
    let mut w = Wallet::new(kid_id);
    w.coins = 100;
    w
}

#[tokio::test]
async fn request_freezes_costs_and_debits_nothing() -> Result<(), Error> {
    let kid_id = Uuid::new_v4();
    let wallet = rich_wallet(kid_id);
    let item = sticker_pack();

    let mut wallet_repo = MockWalletRepo::new();
    let w = wallet.clone();
    wallet_repo
        .expect_get_wallet_by_kid()
        .returning(move |_| Ok(Some(w.clone())));
    // No update_wallet expectation: money must not move at request time.

    let mut item_repo = MockItemRepo::new();
    let it = item.clone();
    item_repo.expect_get_item().returning(move |_| Ok(Some(it.clone())));

    let mut redemption_repo = MockRedemptionRepo::new();
    redemption_repo
        .expect_create_redemption()
        .withf(|r| r.status == RedemptionStatus::PendingApproval && r.coins_spent == 50)
        .times(1)
        .returning(|_| Ok(()));

    let svc = service_with(item_repo, redemption_repo, wallet_repo, MockLedgerRepo::new());
    let redemption = svc.request_redemption(kid_id, item.item_id, Some("birthday")).await?;

    assert_eq!(redemption.status, RedemptionStatus::PendingApproval);
    assert_eq!(redemption.coins_spent, 50);
    assert_eq!(redemption.silver_gems_spent, 0);
    assert_eq!(redemption.note.as_deref(), Some("birthday"));
    Ok(())
}

#[tokio::test]
async fn request_rejects_inactive_expired_and_unaffordable_items() {
    let kid_id = Uuid::new_v4();

    let cases: Vec<(RedeemableItem, Wallet)> = vec![
        // Inactive item.
        {
            let mut item = sticker_pack();
            item.is_active = false;
            (item, rich_wallet(kid_id))
        },
        // Expired item.
        {
            let mut item = sticker_pack();
            item.expires_at = Some(Utc::now() - Duration::hours(1));
            (item, rich_wallet(kid_id))
        },
        // Out of stock.
        {
            let mut item = sticker_pack();
            item.quantity_available = 0;
            (item, rich_wallet(kid_id))
        },
        // Level gate.
        {
            let mut item = sticker_pack();
            item.min_level = 5;
            (item, rich_wallet(kid_id))
        },
        // Not enough coins.
        {
            let item = sticker_pack();
            let mut wallet = rich_wallet(kid_id);
            wallet.coins = 49;
            (item, wallet)
        },
    ];

    for (item, wallet) in cases {
        let mut wallet_repo = MockWalletRepo::new();
        let w = wallet.clone();
        wallet_repo
            .expect_get_wallet_by_kid()
            .returning(move |_| Ok(Some(w.clone())));

        let mut item_repo = MockItemRepo::new();
        let it = item.clone();
        item_repo.expect_get_item().returning(move |_| Ok(Some(it.clone())));

        let svc = service_with(
            item_repo,
            MockRedemptionRepo::new(),
            wallet_repo,
            MockLedgerRepo::new(),
        );
        let result = svc.request_redemption(kid_id, item.item_id, None).await;
        assert!(matches!(result, Err(Error::BusinessRule(_))), "item '{}' case", item.name);
    }
}

#[tokio::test]
async fn approve_debits_charges_and_decrements_stock() -> Result<(), Error> {
    let kid_id = Uuid::new_v4();
    let wallet = rich_wallet(kid_id);
    let item = sticker_pack();
    let redemption = Redemption::request(wallet.wallet_id, &item, None);

    let mut redemption_repo = MockRedemptionRepo::new();
    let rd = redemption.clone();
    redemption_repo
        .expect_get_redemption()
        .returning(move |_| Ok(Some(rd.clone())));
    redemption_repo
        .expect_update_redemption()
        .withf(|r| r.status == RedemptionStatus::Approved && r.resolved_at.is_some())
        .times(1)
        .returning(|_| Ok(()));

    let mut wallet_repo = MockWalletRepo::new();
    let w = wallet.clone();
    wallet_repo.expect_get_wallet().returning(move |_| Ok(Some(w.clone())));
    wallet_repo
        .expect_update_wallet()
        .withf(|w| w.coins == 50)
        .times(1)
        .returning(|_| Ok(()));

    let mut ledger_repo = MockLedgerRepo::new();
    ledger_repo
        .expect_insert_transaction()
        .withf(|tx| {
            tx.kind == TransactionKind::Spent
                && tx.activity == ActivityType::Redemption
                && tx.amount == -50
                && tx.balance_after == 50
        })
        .times(1)
        .returning(|_| Ok(()));

    let mut item_repo = MockItemRepo::new();
    let it = item.clone();
    item_repo.expect_get_item().returning(move |_| Ok(Some(it.clone())));
    item_repo
        .expect_update_item()
        .withf(|i| i.quantity_available == 2)
        .times(1)
        .returning(|_| Ok(()));

    let svc = service_with(item_repo, redemption_repo, wallet_repo, ledger_repo);
    let approved = svc.approve_redemption(redemption.redemption_id).await?;

    assert_eq!(approved.status, RedemptionStatus::Approved);
    Ok(())
}

#[tokio::test]
async fn approve_requires_pending_state() {
    let wallet_id = Uuid::new_v4();
    let item = sticker_pack();
    let mut redemption = Redemption::request(wallet_id, &item, None);
    redemption.status = RedemptionStatus::Approved;

    let mut redemption_repo = MockRedemptionRepo::new();
    let rd = redemption.clone();
    redemption_repo
        .expect_get_redemption()
        .returning(move |_| Ok(Some(rd.clone())));

    let svc = service_with(
        MockItemRepo::new(),
        redemption_repo,
        MockWalletRepo::new(),
        MockLedgerRepo::new(),
    );
    let result = svc.approve_redemption(redemption.redemption_id).await;
    assert!(matches!(result, Err(Error::BusinessRule(_))));
}

#[tokio::test]
async fn approve_recheck_fails_when_funds_moved_away() {
    let kid_id = Uuid::new_v4();
    let mut wallet = rich_wallet(kid_id);
    let item = sticker_pack();
    let redemption = Redemption::request(wallet.wallet_id, &item, None);
    // Balance dropped below the frozen charge between request and approval.
    wallet.coins = 10;

    let mut redemption_repo = MockRedemptionRepo::new();
    let rd = redemption.clone();
    redemption_repo
        .expect_get_redemption()
        .returning(move |_| Ok(Some(rd.clone())));

    let mut wallet_repo = MockWalletRepo::new();
    let w = wallet.clone();
    wallet_repo.expect_get_wallet().returning(move |_| Ok(Some(w.clone())));

    let svc = service_with(
        MockItemRepo::new(),
        redemption_repo,
        wallet_repo,
        MockLedgerRepo::new(),
    );
    let result = svc.approve_redemption(redemption.redemption_id).await;
    assert!(matches!(result, Err(Error::BusinessRule(_))));
}

#[tokio::test]
async fn fulfill_only_from_approved() -> Result<(), Error> {
    let wallet_id = Uuid::new_v4();
    let item = sticker_pack();

    // Fulfilling a pending redemption is an invalid transition.
    let pending = Redemption::request(wallet_id, &item, None);
    let mut redemption_repo = MockRedemptionRepo::new();
    let rd = pending.clone();
    redemption_repo
        .expect_get_redemption()
        .returning(move |_| Ok(Some(rd.clone())));
    let svc = service_with(
        MockItemRepo::new(),
        redemption_repo,
        MockWalletRepo::new(),
        MockLedgerRepo::new(),
    );
    let result = svc.fulfill_redemption(pending.redemption_id).await;
    assert!(matches!(result, Err(Error::BusinessRule(_))));

    // From Approved it lands in the terminal Fulfilled state.
    let mut approved = Redemption::request(wallet_id, &item, None);
    approved.status = RedemptionStatus::Approved;
    let mut redemption_repo = MockRedemptionRepo::new();
    let rd = approved.clone();
    redemption_repo
        .expect_get_redemption()
        .returning(move |_| Ok(Some(rd.clone())));
    redemption_repo
        .expect_update_redemption()
        .withf(|r| r.status == RedemptionStatus::Fulfilled && r.fulfilled_at.is_some())
        .times(1)
        .returning(|_| Ok(()));
    let svc = service_with(
        MockItemRepo::new(),
        redemption_repo,
        MockWalletRepo::new(),
        MockLedgerRepo::new(),
    );
    let fulfilled = svc.fulfill_redemption(approved.redemption_id).await?;
    assert_eq!(fulfilled.status, RedemptionStatus::Fulfilled);
    Ok(())
}

#[tokio::test]
async fn reject_is_terminal_and_free() -> Result<(), Error> {
    let wallet_id = Uuid::new_v4();
    let item = sticker_pack();
    let pending = Redemption::request(wallet_id, &item, None);

    let mut redemption_repo = MockRedemptionRepo::new();
    let rd = pending.clone();
    redemption_repo
        .expect_get_redemption()
        .returning(move |_| Ok(Some(rd.clone())));
    redemption_repo
        .expect_update_redemption()
        .withf(|r| r.status == RedemptionStatus::Rejected && r.note.as_deref() == Some("too pricey"))
        .times(1)
        .returning(|_| Ok(()));

    // Wallet and ledger mocks have no expectations: rejection moves no money.
    let svc = service_with(
        MockItemRepo::new(),
        redemption_repo,
        MockWalletRepo::new(),
        MockLedgerRepo::new(),
    );
    let rejected = svc.reject_redemption(pending.redemption_id, Some("too pricey")).await?;
    assert_eq!(rejected.status, RedemptionStatus::Rejected);
    Ok(())
}

#[tokio::test]
async fn cancel_after_approval_refunds_the_frozen_charges() -> Result<(), Error> {
    let kid_id = Uuid::new_v4();
    let mut wallet = rich_wallet(kid_id);
    // Post-approval state: the 50-coin charge has already been debited.
    wallet.coins = 50;
    let mut item = sticker_pack();
    item.quantity_available = 2;
    let mut redemption = Redemption::request(wallet.wallet_id, &item, None);
    redemption.status = RedemptionStatus::Approved;

    let mut redemption_repo = MockRedemptionRepo::new();
    let rd = redemption.clone();
    redemption_repo
        .expect_get_redemption()
        .returning(move |_| Ok(Some(rd.clone())));
    redemption_repo
        .expect_update_redemption()
        .withf(|r| r.status == RedemptionStatus::Cancelled)
        .times(1)
        .returning(|_| Ok(()));

    let mut wallet_repo = MockWalletRepo::new();
    let w = wallet.clone();
    wallet_repo.expect_get_wallet().returning(move |_| Ok(Some(w.clone())));
    wallet_repo
        .expect_update_wallet()
        .withf(|w| w.coins == 100)
        .times(1)
        .returning(|_| Ok(()));

    let mut ledger_repo = MockLedgerRepo::new();
    ledger_repo
        .expect_insert_transaction()
        .withf(|tx| {
            tx.kind == TransactionKind::Earned
                && tx.activity == ActivityType::Redemption
                && tx.amount == 50
        })
        .times(1)
        .returning(|_| Ok(()));

    let mut item_repo = MockItemRepo::new();
    let it = item.clone();
    item_repo.expect_get_item().returning(move |_| Ok(Some(it.clone())));
    item_repo
        .expect_update_item()
        .withf(|i| i.quantity_available == 3)
        .times(1)
        .returning(|_| Ok(()));

    let svc = service_with(item_repo, redemption_repo, wallet_repo, ledger_repo);
    let cancelled = svc.cancel_redemption(redemption.redemption_id).await?;
    assert_eq!(cancelled.status, RedemptionStatus::Cancelled);
    Ok(())
}

#[tokio::test]
async fn cancel_from_terminal_states_is_rejected() {
    let wallet_id = Uuid::new_v4();
    let item = sticker_pack();

    for terminal in [
        RedemptionStatus::Rejected,
        RedemptionStatus::Fulfilled,
        RedemptionStatus::Cancelled,
    ] {
        let mut redemption = Redemption::request(wallet_id, &item, None);
        redemption.status = terminal;

        let mut redemption_repo = MockRedemptionRepo::new();
        let rd = redemption.clone();
        redemption_repo
            .expect_get_redemption()
            .returning(move |_| Ok(Some(rd.clone())));

        let svc = service_with(
            MockItemRepo::new(),
            redemption_repo,
            MockWalletRepo::new(),
            MockLedgerRepo::new(),
        );
        let result = svc.cancel_redemption(redemption.redemption_id).await;
        assert!(matches!(result, Err(Error::BusinessRule(_))), "state {}", terminal);
    }
}

#[tokio::test]
async fn statistics_are_not_yet_supported() {
    let svc = service_with(
        MockItemRepo::new(),
        MockRedemptionRepo::new(),
        MockWalletRepo::new(),
        MockLedgerRepo::new(),
    );
    let result = svc.redemption_statistics(Uuid::new_v4()).await;
    assert!(matches!(result, Err(Error::Unimplemented(_))));
}

#[tokio::test]
async fn item_creation_requires_a_charged_currency() {
    let mut item = sticker_pack();
    item.coins_cost = None;

    let svc = service_with(
        MockItemRepo::new(),
        MockRedemptionRepo::new(),
        MockWalletRepo::new(),
        MockLedgerRepo::new(),
    );
    let result = svc.create_item(item).await;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}
