// File: quizkid-core/src/services/reward_service.rs

use std::collections::BTreeMap;
use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;
use tracing::{debug, info};
use quizkid_common::models::transaction::{ActivityType, TransactionKind, WalletTransaction};
use quizkid_common::models::wallet::{conversion_rate_table, CurrencyType, Wallet, WalletSnapshot};
use quizkid_common::traits::repository_traits::{
    KidRepository, WalletRepository, WalletTransactionRepository,
};
use crate::Error;

/// Validated earn command, as a controller would hand it over.
#[derive(Debug, Clone)]
pub struct EarnReward {
    pub kid_id: Uuid,
    pub currency: CurrencyType,
    pub amount: i64,
    pub activity: ActivityType,
    pub description: String,
    pub related_entity_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy)]
pub struct ConvertCurrency {
    pub kid_id: Uuid,
    pub from: CurrencyType,
    pub to: CurrencyType,
    pub amount: i64,
}

/// The reward engine: earning, converting and leveling. Every operation
/// loads the wallet, applies the arithmetic, persists the wallet (version
/// checked) and appends the matching ledger rows.
pub struct RewardService {
    wallet_repo: Arc<dyn WalletRepository + Send + Sync>,
    ledger_repo: Arc<dyn WalletTransactionRepository + Send + Sync>,
    kid_repo: Arc<dyn KidRepository + Send + Sync>,
}

impl RewardService {
    pub fn new(
        wallet_repo: Arc<dyn WalletRepository + Send + Sync>,
        ledger_repo: Arc<dyn WalletTransactionRepository + Send + Sync>,
        kid_repo: Arc<dyn KidRepository + Send + Sync>,
    ) -> Self {
        Self {
            wallet_repo,
            ledger_repo,
            kid_repo,
        }
    }

    /// Returns the kid's wallet, creating an empty one on first access.
    pub async fn get_or_create_wallet(&self, kid_id: Uuid) -> Result<Wallet, Error> {
        if let Some(w) = self.wallet_repo.get_wallet_by_kid(kid_id).await? {
            return Ok(w);
        }

        if self.kid_repo.get_kid(kid_id).await?.is_none() {
            return Err(Error::NotFound(format!("No kid with id={}", kid_id)));
        }

        let wallet = Wallet::new(kid_id);
        self.wallet_repo.create_wallet(&wallet).await?;
        info!("Created wallet {} for kid {}", wallet.wallet_id, kid_id);
        Ok(wallet)
    }

    pub async fn wallet_snapshot(&self, kid_id: Uuid) -> Result<WalletSnapshot, Error> {
        let wallet = self.get_or_create_wallet(kid_id).await?;
        Ok(WalletSnapshot::from(&wallet))
    }

    /// The earn primitive every reward policy builds on. Credits the
    /// balance, advances experience and lifetime coins, appends the Earned
    /// ledger row, then runs the level-up check.
    pub async fn earn(&self, req: EarnReward) -> Result<WalletSnapshot, Error> {
        if req.amount <= 0 {
            return Err(Error::InvalidArgument(format!(
                "earn amount must be positive, got {}",
                req.amount
            )));
        }

        let mut wallet = self.get_or_create_wallet(req.kid_id).await?;

        let new_balance = wallet.balance(req.currency) + req.amount;
        wallet.set_balance(req.currency, new_balance);
        wallet.experience_points += req.amount * req.currency.experience_multiplier();
        wallet.total_lifetime_coins += req.amount * req.currency.value_in_coins();

        let level_bonus = check_level_up(&mut wallet);

        // The version-checked wallet write settles any race first; the
        // ledger rows then describe the state that actually stuck.
        self.wallet_repo.update_wallet(&wallet).await?;

        let earned = WalletTransaction::new(
            wallet.wallet_id,
            req.currency,
            req.amount,
            TransactionKind::Earned,
            req.activity,
            &req.description,
            req.related_entity_id,
            new_balance,
        );
        self.ledger_repo.insert_transaction(&earned).await?;

        if let Some(bonus) = level_bonus {
            info!(
                "Kid {} reached level {} (+{} SilverGems)",
                req.kid_id, wallet.current_level, bonus
            );
            let bonus_tx = WalletTransaction::new(
                wallet.wallet_id,
                CurrencyType::SilverGems,
                bonus,
                TransactionKind::Bonus,
                ActivityType::LevelUp,
                &format!("Reached level {}", wallet.current_level),
                None,
                wallet.silver_gems,
            );
            self.ledger_repo.insert_transaction(&bonus_tx).await?;
        }

        Ok(WalletSnapshot::from(&wallet))
    }

    /// Quiz completion reward: base 10 coins, tiered bonus on accuracy.
    /// A perfect score is classified separately.
    pub async fn award_quiz_completion(
        &self,
        kid_id: Uuid,
        quiz_id: Uuid,
        accuracy_percent: f64,
    ) -> Result<WalletSnapshot, Error> {
        let bonus = if accuracy_percent >= 100.0 {
            20
        } else if accuracy_percent >= 90.0 {
            10
        } else if accuracy_percent >= 80.0 {
            5
        } else {
            0
        };
        let activity = if accuracy_percent >= 100.0 {
            ActivityType::QuizPerfectScore
        } else {
            ActivityType::QuizCompleted
        };

        self.earn(EarnReward {
            kid_id,
            currency: CurrencyType::Coins,
            amount: 10 + bonus,
            activity,
            description: format!("Quiz completed at {:.0}%", accuracy_percent),
            related_entity_id: Some(quiz_id),
        })
        .await
    }

    /// Flat 5 coins, at most once per UTC calendar day. The second call on
    /// the same day is a no-op returning the wallet as-is.
    pub async fn process_daily_login(&self, kid_id: Uuid) -> Result<WalletSnapshot, Error> {
        let wallet = self.get_or_create_wallet(kid_id).await?;
        let today = Utc::now().date_naive();

        let already_rewarded = self
            .ledger_repo
            .activity_exists_on(wallet.wallet_id, ActivityType::DailyLogin, today)
            .await?;
        if already_rewarded {
            debug!("Kid {} already claimed the daily login reward today", kid_id);
            return Ok(WalletSnapshot::from(&wallet));
        }

        self.earn(EarnReward {
            kid_id,
            currency: CurrencyType::Coins,
            amount: 5,
            activity: ActivityType::DailyLogin,
            description: "Daily login".to_string(),
            related_entity_id: None,
        })
        .await
    }

    /// Streak milestones. Day counts off the 7/14/30 milestones earn
    /// nothing and leave the wallet untouched.
    pub async fn award_streak(&self, kid_id: Uuid, days: i32) -> Result<WalletSnapshot, Error> {
        let reward = match days {
            7 => Some((CurrencyType::SilverGems, 50)),
            14 => Some((CurrencyType::SilverGems, 100)),
            30 => Some((CurrencyType::GoldCoins, 1)),
            _ => None,
        };

        let (currency, amount) = match reward {
            Some(r) => r,
            None => {
                debug!("No streak milestone at {} days for kid {}", days, kid_id);
                return self.wallet_snapshot(kid_id).await;
            }
        };

        self.earn(EarnReward {
            kid_id,
            currency,
            amount,
            activity: ActivityType::WeeklyStreak,
            description: format!("{}-day streak", days),
            related_entity_id: None,
        })
        .await
    }

    pub async fn award_achievement(
        &self,
        kid_id: Uuid,
        achievement_name: &str,
    ) -> Result<WalletSnapshot, Error> {
        self.earn(EarnReward {
            kid_id,
            currency: CurrencyType::SilverGems,
            amount: 5,
            activity: ActivityType::Achievement,
            description: format!("Achievement: {}", achievement_name),
            related_entity_id: None,
        })
        .await
    }

    /// A guardian-granted reward in any currency.
    pub async fn award_parent_bonus(
        &self,
        kid_id: Uuid,
        currency: CurrencyType,
        amount: i64,
        note: &str,
    ) -> Result<WalletSnapshot, Error> {
        self.earn(EarnReward {
            kid_id,
            currency,
            amount,
            activity: ActivityType::ParentBonus,
            description: note.to_string(),
            related_entity_id: None,
        })
        .await
    }

    /// Exchanges `amount` of the target currency's worth out of the source
    /// currency at the fixed table rate. Writes a linked debit/credit pair
    /// of Converted ledger rows sharing one event id.
    pub async fn convert_currency(&self, req: ConvertCurrency) -> Result<WalletSnapshot, Error> {
        if req.amount <= 0 {
            return Err(Error::InvalidArgument(format!(
                "conversion amount must be positive, got {}",
                req.amount
            )));
        }
        let rate = CurrencyType::conversion_rate(req.from, req.to).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "Unsupported conversion pair: {} -> {}",
                req.from, req.to
            ))
        })?;

        let mut wallet = self.get_or_create_wallet(req.kid_id).await?;

        let required = req.amount * rate;
        let source_balance = wallet.balance(req.from);
        if source_balance < required {
            return Err(Error::BusinessRule(format!(
                "Insufficient {}: need {}, have {}",
                req.from, required, source_balance
            )));
        }

        wallet.set_balance(req.from, source_balance - required);
        wallet.set_balance(req.to, wallet.balance(req.to) + req.amount);

        self.wallet_repo.update_wallet(&wallet).await?;

        let event_id = Uuid::new_v4();
        let debit = WalletTransaction::new(
            wallet.wallet_id,
            req.from,
            -required,
            TransactionKind::Converted,
            ActivityType::SpecialEvent,
            &format!("Converted {} {} to {} {}", required, req.from, req.amount, req.to),
            Some(event_id),
            wallet.balance(req.from),
        );
        self.ledger_repo.insert_transaction(&debit).await?;

        let credit = WalletTransaction::new(
            wallet.wallet_id,
            req.to,
            req.amount,
            TransactionKind::Converted,
            ActivityType::SpecialEvent,
            &format!("Converted {} {} to {} {}", required, req.from, req.amount, req.to),
            Some(event_id),
            wallet.balance(req.to),
        );
        self.ledger_repo.insert_transaction(&credit).await?;

        debug!(
            "Converted {} {} -> {} {} for kid {}",
            required, req.from, req.amount, req.to, req.kid_id
        );
        Ok(WalletSnapshot::from(&wallet))
    }

    /// The fixed conversion table, keyed `"{From}_{To}"`.
    pub fn conversion_rates(&self) -> BTreeMap<String, f64> {
        conversion_rate_table()
    }

    pub async fn transaction_history(
        &self,
        kid_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WalletTransaction>, Error> {
        let wallet = self.get_or_create_wallet(kid_id).await?;
        self.ledger_repo
            .list_for_wallet(wallet.wallet_id, limit, offset)
            .await
    }
}

/// Single-step level-up check. Advances at most one level per call and
/// credits the SilverGems bonus straight to the balance; the bonus does not
/// feed back into experience, so re-running with unchanged experience is a
/// no-op. Returns the bonus amount when a level was gained.
fn check_level_up(wallet: &mut Wallet) -> Option<i64> {
    let next = wallet.current_level + 1;
    if wallet.experience_points < Wallet::experience_required(next) {
        return None;
    }
    wallet.current_level = next;
    let bonus = (next as i64) * 10;
    wallet.silver_gems += bonus;
    Some(bonus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_up_advances_one_step_and_pays_bonus() {
        let mut w = Wallet::new(Uuid::new_v4());
        w.experience_points = 400;
        let bonus = check_level_up(&mut w);
        assert_eq!(bonus, Some(20));
        assert_eq!(w.current_level, 2);
        assert_eq!(w.silver_gems, 20);
    }

    #[test]
    fn level_up_does_not_cascade() {
        let mut w = Wallet::new(Uuid::new_v4());
        // Enough experience for level 3 (900), but a single call only
        // advances to level 2.
        w.experience_points = 1000;
        assert_eq!(check_level_up(&mut w), Some(20));
        assert_eq!(w.current_level, 2);
        // The next call advances the remaining step.
        assert_eq!(check_level_up(&mut w), Some(30));
        assert_eq!(w.current_level, 3);
    }

    #[test]
    fn level_up_is_idempotent_below_threshold() {
        let mut w = Wallet::new(Uuid::new_v4());
        w.experience_points = 399;
        assert_eq!(check_level_up(&mut w), None);
        assert_eq!(w.current_level, 1);
        assert_eq!(w.silver_gems, 0);
    }
}
