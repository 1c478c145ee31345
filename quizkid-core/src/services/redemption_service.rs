// File: quizkid-core/src/services/redemption_service.rs

use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;
use tracing::{debug, info, warn};
use quizkid_common::models::redeemable::{RedeemableItem, Redemption, RedemptionStatus};
use quizkid_common::models::transaction::{ActivityType, TransactionKind, WalletTransaction};
use quizkid_common::models::wallet::Wallet;
use quizkid_common::traits::repository_traits::{
    RedeemableItemRepository, RedemptionRepository, WalletRepository, WalletTransactionRepository,
};
use crate::Error;

/// Catalog management plus the redemption approval state machine:
/// PendingApproval -> Approved -> Fulfilled, PendingApproval -> Rejected,
/// and Cancelled from either non-terminal state. Money moves at approval,
/// never at request.
pub struct RedemptionService {
    item_repo: Arc<dyn RedeemableItemRepository + Send + Sync>,
    redemption_repo: Arc<dyn RedemptionRepository + Send + Sync>,
    wallet_repo: Arc<dyn WalletRepository + Send + Sync>,
    ledger_repo: Arc<dyn WalletTransactionRepository + Send + Sync>,
}

impl RedemptionService {
    pub fn new(
        item_repo: Arc<dyn RedeemableItemRepository + Send + Sync>,
        redemption_repo: Arc<dyn RedemptionRepository + Send + Sync>,
        wallet_repo: Arc<dyn WalletRepository + Send + Sync>,
        ledger_repo: Arc<dyn WalletTransactionRepository + Send + Sync>,
    ) -> Self {
        Self {
            item_repo,
            redemption_repo,
            wallet_repo,
            ledger_repo,
        }
    }

    // ------------------------------------------------------------------
    // Catalog CRUD
    // ------------------------------------------------------------------

    pub async fn create_item(&self, item: RedeemableItem) -> Result<RedeemableItem, Error> {
        validate_item(&item)?;
        self.item_repo.create_item(&item).await?;
        info!("Created redeemable item '{}' ({})", item.name, item.item_id);
        Ok(item)
    }

    pub async fn get_item(&self, item_id: Uuid) -> Result<RedeemableItem, Error> {
        self.item_repo
            .get_item(item_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No redeemable item with id={}", item_id)))
    }

    pub async fn update_item(&self, item: &RedeemableItem) -> Result<(), Error> {
        validate_item(item)?;
        let mut updated = item.clone();
        updated.updated_at = Utc::now();
        self.item_repo.update_item(&updated).await
    }

    pub async fn deactivate_item(&self, item_id: Uuid) -> Result<(), Error> {
        let mut item = self.get_item(item_id).await?;
        item.is_active = false;
        item.updated_at = Utc::now();
        self.item_repo.update_item(&item).await
    }

    pub async fn list_catalog(&self) -> Result<Vec<RedeemableItem>, Error> {
        self.item_repo.list_active_items().await
    }

    // ------------------------------------------------------------------
    // Workflow
    // ------------------------------------------------------------------

    /// Files a redemption request. Validates every guard and freezes the
    /// item's current prices into the redemption, but debits nothing.
    pub async fn request_redemption(
        &self,
        kid_id: Uuid,
        item_id: Uuid,
        note: Option<&str>,
    ) -> Result<Redemption, Error> {
        let wallet = self
            .wallet_repo
            .get_wallet_by_kid(kid_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No wallet for kid={}", kid_id)))?;
        let item = self.get_item(item_id).await?;

        if !item.is_active {
            return Err(Error::BusinessRule(format!("Item '{}' is not active", item.name)));
        }
        if item.is_expired(Utc::now()) {
            return Err(Error::BusinessRule(format!("Item '{}' has expired", item.name)));
        }
        if !item.is_in_stock() {
            return Err(Error::BusinessRule(format!("Item '{}' is out of stock", item.name)));
        }
        if wallet.current_level < item.min_level {
            return Err(Error::BusinessRule(format!(
                "Level {} required for '{}', kid is level {}",
                item.min_level, item.name, wallet.current_level
            )));
        }
        ensure_affordable(&wallet, &item.charged_costs())?;

        let redemption = Redemption::request(wallet.wallet_id, &item, note);
        self.redemption_repo.create_redemption(&redemption).await?;
        info!(
            "Redemption {} requested: item '{}' for wallet {}",
            redemption.redemption_id, item.name, wallet.wallet_id
        );
        Ok(redemption)
    }

    /// Approves a pending redemption: re-checks affordability against the
    /// frozen snapshot, debits every charged currency, decrements finite
    /// stock and advances the state. A failed affordability re-check leaves
    /// the redemption pending.
    pub async fn approve_redemption(&self, redemption_id: Uuid) -> Result<Redemption, Error> {
        let mut redemption = self.get_redemption(redemption_id).await?;
        ensure_transition(&redemption, RedemptionStatus::PendingApproval, "approve")?;

        let mut wallet = self
            .wallet_repo
            .get_wallet(redemption.wallet_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("No wallet with id={}", redemption.wallet_id))
            })?;

        let charges = redemption.charged_costs();
        ensure_affordable(&wallet, &charges)?;

        for (currency, amount) in &charges {
            wallet.set_balance(*currency, wallet.balance(*currency) - amount);
        }
        self.wallet_repo.update_wallet(&wallet).await?;

        for (currency, amount) in &charges {
            let tx = WalletTransaction::new(
                wallet.wallet_id,
                *currency,
                -amount,
                TransactionKind::Spent,
                ActivityType::Redemption,
                "Redemption approved",
                Some(redemption.redemption_id),
                wallet.balance(*currency),
            );
            self.ledger_repo.insert_transaction(&tx).await?;
        }

        // Finite stock counts down at approval, when the money moves.
        match self.item_repo.get_item(redemption.item_id).await? {
            Some(mut item) if item.quantity_available > 0 => {
                item.quantity_available -= 1;
                item.updated_at = Utc::now();
                self.item_repo.update_item(&item).await?;
            }
            Some(_) => {}
            None => {
                warn!(
                    "Item {} behind redemption {} no longer exists",
                    redemption.item_id, redemption.redemption_id
                );
            }
        }

        redemption.status = RedemptionStatus::Approved;
        redemption.resolved_at = Some(Utc::now());
        self.redemption_repo.update_redemption(&redemption).await?;
        info!("Redemption {} approved", redemption.redemption_id);
        Ok(redemption)
    }

    pub async fn reject_redemption(
        &self,
        redemption_id: Uuid,
        note: Option<&str>,
    ) -> Result<Redemption, Error> {
        let mut redemption = self.get_redemption(redemption_id).await?;
        ensure_transition(&redemption, RedemptionStatus::PendingApproval, "reject")?;

        redemption.status = RedemptionStatus::Rejected;
        redemption.resolved_at = Some(Utc::now());
        if let Some(n) = note {
            redemption.note = Some(n.to_string());
        }
        self.redemption_repo.update_redemption(&redemption).await?;
        info!("Redemption {} rejected", redemption.redemption_id);
        Ok(redemption)
    }

    pub async fn fulfill_redemption(&self, redemption_id: Uuid) -> Result<Redemption, Error> {
        let mut redemption = self.get_redemption(redemption_id).await?;
        ensure_transition(&redemption, RedemptionStatus::Approved, "fulfill")?;

        redemption.status = RedemptionStatus::Fulfilled;
        redemption.fulfilled_at = Some(Utc::now());
        self.redemption_repo.update_redemption(&redemption).await?;
        info!("Redemption {} fulfilled", redemption.redemption_id);
        Ok(redemption)
    }

    /// Cancels from either non-terminal state. Cancelling after approval
    /// refunds the frozen charges and restores finite stock.
    pub async fn cancel_redemption(&self, redemption_id: Uuid) -> Result<Redemption, Error> {
        let mut redemption = self.get_redemption(redemption_id).await?;

        match redemption.status {
            RedemptionStatus::PendingApproval => {}
            RedemptionStatus::Approved => {
                self.refund(&redemption).await?;
            }
            other => {
                return Err(Error::BusinessRule(format!(
                    "Cannot cancel a redemption in state {}",
                    other
                )));
            }
        }

        redemption.status = RedemptionStatus::Cancelled;
        redemption.resolved_at = Some(Utc::now());
        self.redemption_repo.update_redemption(&redemption).await?;
        info!("Redemption {} cancelled", redemption.redemption_id);
        Ok(redemption)
    }

    pub async fn redemption_history(
        &self,
        kid_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Redemption>, Error> {
        let wallet = self
            .wallet_repo
            .get_wallet_by_kid(kid_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No wallet for kid={}", kid_id)))?;
        self.redemption_repo.list_for_wallet(wallet.wallet_id, limit).await
    }

    pub async fn list_pending(&self) -> Result<Vec<Redemption>, Error> {
        self.redemption_repo.list_pending().await
    }

    /// Aggregated per-kid redemption statistics were never implemented in
    /// the original workflow.
    pub async fn redemption_statistics(&self, _kid_id: Uuid) -> Result<(), Error> {
        Err(Error::Unimplemented("redemption statistics".to_string()))
    }

    // ------------------------------------------------------------------

    async fn get_redemption(&self, redemption_id: Uuid) -> Result<Redemption, Error> {
        self.redemption_repo
            .get_redemption(redemption_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No redemption with id={}", redemption_id)))
    }

    async fn refund(&self, redemption: &Redemption) -> Result<(), Error> {
        let mut wallet = self
            .wallet_repo
            .get_wallet(redemption.wallet_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("No wallet with id={}", redemption.wallet_id))
            })?;

        let charges = redemption.charged_costs();
        for (currency, amount) in &charges {
            wallet.set_balance(*currency, wallet.balance(*currency) + amount);
        }
        self.wallet_repo.update_wallet(&wallet).await?;

        for (currency, amount) in &charges {
            let tx = WalletTransaction::new(
                wallet.wallet_id,
                *currency,
                *amount,
                TransactionKind::Earned,
                ActivityType::Redemption,
                "Refund for cancelled redemption",
                Some(redemption.redemption_id),
                wallet.balance(*currency),
            );
            self.ledger_repo.insert_transaction(&tx).await?;
        }

        if let Some(mut item) = self.item_repo.get_item(redemption.item_id).await? {
            if item.quantity_available >= 0 {
                item.quantity_available += 1;
                item.updated_at = Utc::now();
                self.item_repo.update_item(&item).await?;
            }
        }

        debug!(
            "Refunded {} currencies for redemption {}",
            charges.len(),
            redemption.redemption_id
        );
        Ok(())
    }
}

fn validate_item(item: &RedeemableItem) -> Result<(), Error> {
    if item.name.trim().is_empty() {
        return Err(Error::InvalidArgument("Item name must not be empty".to_string()));
    }
    if item.charged_costs().is_empty() {
        return Err(Error::InvalidArgument(
            "Item must charge at least one currency".to_string(),
        ));
    }
    if item.min_level < 1 {
        return Err(Error::InvalidArgument(format!(
            "min_level must be at least 1, got {}",
            item.min_level
        )));
    }
    Ok(())
}

/// Every charged currency must be individually covered; partial
/// affordability across currencies is not permitted.
fn ensure_affordable(
    wallet: &Wallet,
    charges: &[(quizkid_common::models::wallet::CurrencyType, i64)],
) -> Result<(), Error> {
    for (currency, amount) in charges {
        if wallet.balance(*currency) < *amount {
            return Err(Error::BusinessRule(format!(
                "Insufficient {}: need {}, have {}",
                currency,
                amount,
                wallet.balance(*currency)
            )));
        }
    }
    Ok(())
}

fn ensure_transition(
    redemption: &Redemption,
    expected: RedemptionStatus,
    action: &str,
) -> Result<(), Error> {
    if redemption.status != expected {
        return Err(Error::BusinessRule(format!(
            "Cannot {} a redemption in state {}",
            action, redemption.status
        )));
    }
    Ok(())
}
