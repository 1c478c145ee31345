// File: quizkid-common/src/traits/repository_traits.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;
use crate::error::Error;
use crate::models::kid::{Guardian, GuardianLink, Kid};
use crate::models::quiz::{Quiz, QuizQuestion, QuizResult};
use crate::models::redeemable::{RedeemableItem, Redemption};
use crate::models::transaction::{ActivityType, WalletTransaction};
use crate::models::wallet::Wallet;

#[async_trait]
pub trait KidRepository: Send + Sync {
    async fn create_kid(&self, kid: &Kid) -> Result<(), Error>;
    async fn get_kid(&self, kid_id: Uuid) -> Result<Option<Kid>, Error>;
    async fn update_kid(&self, kid: &Kid) -> Result<(), Error>;
    async fn delete_kid(&self, kid_id: Uuid) -> Result<(), Error>;
    async fn list_active_kids(&self) -> Result<Vec<Kid>, Error>;
}

#[async_trait]
pub trait GuardianRepository: Send + Sync {
    async fn create_guardian(&self, guardian: &Guardian) -> Result<(), Error>;
    async fn get_guardian(&self, guardian_id: Uuid) -> Result<Option<Guardian>, Error>;
    async fn get_guardian_by_email(&self, email: &str) -> Result<Option<Guardian>, Error>;
    async fn update_guardian(&self, guardian: &Guardian) -> Result<(), Error>;
    async fn delete_guardian(&self, guardian_id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait GuardianLinkRepository: Send + Sync {
    async fn insert_link(&self, link: &GuardianLink) -> Result<(), Error>;
    async fn delete_link(&self, kid_id: Uuid, guardian_id: Uuid) -> Result<(), Error>;
    async fn list_links_for_kid(&self, kid_id: Uuid) -> Result<Vec<GuardianLink>, Error>;
    async fn list_links_for_guardian(&self, guardian_id: Uuid) -> Result<Vec<GuardianLink>, Error>;
}

#[async_trait]
pub trait WalletRepository: Send + Sync {
    async fn create_wallet(&self, wallet: &Wallet) -> Result<(), Error>;
    async fn get_wallet(&self, wallet_id: Uuid) -> Result<Option<Wallet>, Error>;
    async fn get_wallet_by_kid(&self, kid_id: Uuid) -> Result<Option<Wallet>, Error>;

    /// Persists the wallet if `wallet.version` still matches the stored
    /// row, bumping the version. A stale version yields `Error::Conflict`.
    async fn update_wallet(&self, wallet: &Wallet) -> Result<(), Error>;
}

#[async_trait]
pub trait WalletTransactionRepository: Send + Sync {
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

    /// True if the wallet already has a transaction with `activity` on the
    /// given UTC calendar date. Backs daily-login idempotence.
    async fn activity_exists_on(
        &self,
        wallet_id: Uuid,
        activity: ActivityType,
        date: NaiveDate,
    ) -> Result<bool, Error>;

    async fn count_for_wallet(&self, wallet_id: Uuid) -> Result<i64, Error>;
}

#[async_trait]
pub trait RedeemableItemRepository: Send + Sync {
    async fn create_item(&self, item: &RedeemableItem) -> Result<(), Error>;
    async fn get_item(&self, item_id: Uuid) -> Result<Option<RedeemableItem>, Error>;
    async fn update_item(&self, item: &RedeemableItem) -> Result<(), Error>;
    async fn delete_item(&self, item_id: Uuid) -> Result<(), Error>;
    async fn list_active_items(&self) -> Result<Vec<RedeemableItem>, Error>;
}

#[async_trait]
pub trait RedemptionRepository: Send + Sync {
    async fn create_redemption(&self, redemption: &Redemption) -> Result<(), Error>;
    async fn get_redemption(&self, redemption_id: Uuid) -> Result<Option<Redemption>, Error>;
    async fn update_redemption(&self, redemption: &Redemption) -> Result<(), Error>;
    async fn list_for_wallet(&self, wallet_id: Uuid, limit: i64) -> Result<Vec<Redemption>, Error>;
    async fn list_pending(&self) -> Result<Vec<Redemption>, Error>;
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create_quiz(&self, quiz: &Quiz, questions: &[QuizQuestion]) -> Result<(), Error>;
    async fn get_quiz(&self, quiz_id: Uuid) -> Result<Option<Quiz>, Error>;
    async fn get_questions(&self, quiz_id: Uuid) -> Result<Vec<QuizQuestion>, Error>;
    async fn update_quiz(&self, quiz: &Quiz) -> Result<(), Error>;
    async fn delete_quiz(&self, quiz_id: Uuid) -> Result<(), Error>;
    async fn list_published(&self) -> Result<Vec<Quiz>, Error>;
}

#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    async fn insert_result(&self, result: &QuizResult) -> Result<(), Error>;
    async fn get_result(&self, result_id: Uuid) -> Result<Option<QuizResult>, Error>;
    async fn list_for_kid(&self, kid_id: Uuid, limit: i64) -> Result<Vec<QuizResult>, Error>;
    async fn list_for_quiz(&self, quiz_id: Uuid, limit: i64) -> Result<Vec<QuizResult>, Error>;
}
