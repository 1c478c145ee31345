// File: quizkid-common/src/models/redeemable.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::error::Error;
use crate::models::wallet::CurrencyType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum ItemCategory {
    Toys,
    Games,
    ScreenTime,
    Activities,
    Treats,
    Special,
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCategory::Toys => write!(f, "Toys"),
            ItemCategory::Games => write!(f, "Games"),
            ItemCategory::ScreenTime => write!(f, "ScreenTime"),
            ItemCategory::Activities => write!(f, "Activities"),
            ItemCategory::Treats => write!(f, "Treats"),
            ItemCategory::Special => write!(f, "Special"),
        }
    }
}

impl FromStr for ItemCategory {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toys" => Ok(ItemCategory::Toys),
            "games" => Ok(ItemCategory::Games),
            "screentime" => Ok(ItemCategory::ScreenTime),
            "activities" => Ok(ItemCategory::Activities),
            "treats" => Ok(ItemCategory::Treats),
            "special" => Ok(ItemCategory::Special),
            other => Err(Error::InvalidArgument(format!("Unknown item category: {}", other))),
        }
    }
}

/// Catalog entry purchasable with wallet balances. Up to six per-currency
/// costs; at least one must be set.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct RedeemableItem {
    pub item_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: ItemCategory,
    pub coins_cost: Option<i64>,
    pub silver_gems_cost: Option<i64>,
    pub gold_coins_cost: Option<i64>,
    pub rubies_cost: Option<i64>,
    pub sapphires_cost: Option<i64>,
    pub diamonds_cost: Option<i64>,
    pub min_level: i32,
    /// -1 means unlimited stock.
    pub quantity_available: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RedeemableItem {
    pub fn cost(&self, currency: CurrencyType) -> Option<i64> {
        match currency {
            CurrencyType::Coins => self.coins_cost,
            CurrencyType::SilverGems => self.silver_gems_cost,
            CurrencyType::GoldCoins => self.gold_coins_cost,
            CurrencyType::Rubies => self.rubies_cost,
            CurrencyType::Sapphires => self.sapphires_cost,
            CurrencyType::Diamonds => self.diamonds_cost,
        }
    }

    /// The currencies this item actually charges, with their amounts.
    pub fn charged_costs(&self) -> Vec<(CurrencyType, i64)> {
        CurrencyType::all()
            .iter()
            .filter_map(|c| self.cost(*c).map(|amount| (*c, amount)))
            .filter(|(_, amount)| *amount > 0)
            .collect()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|e| e <= now).unwrap_or(false)
    }

    pub fn is_in_stock(&self) -> bool {
        self.quantity_available == -1 || self.quantity_available > 0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum RedemptionStatus {
    PendingApproval,
    Approved,
    Rejected,
    Fulfilled,
    Cancelled,
}

impl RedemptionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RedemptionStatus::Rejected | RedemptionStatus::Fulfilled | RedemptionStatus::Cancelled
        )
    }
}

impl fmt::Display for RedemptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedemptionStatus::PendingApproval => write!(f, "PendingApproval"),
            RedemptionStatus::Approved => write!(f, "Approved"),
            RedemptionStatus::Rejected => write!(f, "Rejected"),
            RedemptionStatus::Fulfilled => write!(f, "Fulfilled"),
            RedemptionStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for RedemptionStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pendingapproval" => Ok(RedemptionStatus::PendingApproval),
            "approved" => Ok(RedemptionStatus::Approved),
            "rejected" => Ok(RedemptionStatus::Rejected),
            "fulfilled" => Ok(RedemptionStatus::Fulfilled),
            "cancelled" => Ok(RedemptionStatus::Cancelled),
            other => Err(Error::InvalidArgument(format!("Unknown redemption status: {}", other))),
        }
    }
}

/// A purchase request and its approval lifecycle. The `*_spent` fields are
/// frozen at request time so later catalog price changes never touch an
/// in-flight redemption.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Redemption {
    pub redemption_id: Uuid,
    pub wallet_id: Uuid,
    pub item_id: Uuid,
    pub status: RedemptionStatus,
    pub coins_spent: i64,
    pub silver_gems_spent: i64,
    pub gold_coins_spent: i64,
    pub rubies_spent: i64,
    pub sapphires_spent: i64,
    pub diamonds_spent: i64,
    pub note: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub fulfilled_at: Option<DateTime<Utc>>,
}

impl Redemption {
    /// Builds a pending redemption, freezing the item's current costs.
    pub fn request(wallet_id: Uuid, item: &RedeemableItem, note: Option<&str>) -> Self {
        Self {
            redemption_id: Uuid::new_v4(),
            wallet_id,
            item_id: item.item_id,
            status: RedemptionStatus::PendingApproval,
            coins_spent: item.coins_cost.unwrap_or(0),
            silver_gems_spent: item.silver_gems_cost.unwrap_or(0),
            gold_coins_spent: item.gold_coins_cost.unwrap_or(0),
            rubies_spent: item.rubies_cost.unwrap_or(0),
            sapphires_spent: item.sapphires_cost.unwrap_or(0),
            diamonds_spent: item.diamonds_cost.unwrap_or(0),
            note: note.map(String::from),
            requested_at: Utc::now(),
            resolved_at: None,
            fulfilled_at: None,
        }
    }

    /// The frozen charges, skipping zero entries.
    pub fn charged_costs(&self) -> Vec<(CurrencyType, i64)> {
        [
            (CurrencyType::Coins, self.coins_spent),
            (CurrencyType::SilverGems, self.silver_gems_spent),
            (CurrencyType::GoldCoins, self.gold_coins_spent),
            (CurrencyType::Rubies, self.rubies_spent),
            (CurrencyType::Sapphires, self.sapphires_spent),
            (CurrencyType::Diamonds, self.diamonds_spent),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > 0)
        .collect()
    }
}
