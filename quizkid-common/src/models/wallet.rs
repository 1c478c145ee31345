// File: quizkid-common/src/models/wallet.rs

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::error::Error;

/// The six reward denominations, ordered from least to most valuable.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum CurrencyType {
    Coins,
    SilverGems,
    GoldCoins,
    Rubies,
    Sapphires,
    Diamonds,
}

impl CurrencyType {
    /// Fixed valuation of one unit in base coins. Drives net worth and
    /// lifetime-coin accounting.
    pub fn value_in_coins(&self) -> i64 {
        match self {
            CurrencyType::Coins => 1,
            CurrencyType::SilverGems => 10,
            CurrencyType::GoldCoins => 100,
            CurrencyType::Rubies => 500,
            CurrencyType::Sapphires => 1000,
            CurrencyType::Diamonds => 10000,
        }
    }

    /// Experience gained per unit earned. Same table as `value_in_coins`.
    pub fn experience_multiplier(&self) -> i64 {
        self.value_in_coins()
    }

    /// Conversion rate for the five supported directed pairs, expressed as
    /// "N units of `from` buy 1 unit of `to`". Any other pair is `None`.
    pub fn conversion_rate(from: CurrencyType, to: CurrencyType) -> Option<i64> {
        match (from, to) {
            (CurrencyType::Coins, CurrencyType::SilverGems) => Some(10),
            (CurrencyType::SilverGems, CurrencyType::GoldCoins) => Some(10),
            (CurrencyType::GoldCoins, CurrencyType::Rubies) => Some(5),
            (CurrencyType::GoldCoins, CurrencyType::Sapphires) => Some(10),
            (CurrencyType::Sapphires, CurrencyType::Diamonds) => Some(10),
            _ => None,
        }
    }

    pub fn all() -> [CurrencyType; 6] {
        [
            CurrencyType::Coins,
            CurrencyType::SilverGems,
            CurrencyType::GoldCoins,
            CurrencyType::Rubies,
            CurrencyType::Sapphires,
            CurrencyType::Diamonds,
        ]
    }
}

/// Read-only view of the supported conversion pairs, keyed `"{From}_{To}"`.
pub fn conversion_rate_table() -> BTreeMap<String, f64> {
    let mut table = BTreeMap::new();
    for from in CurrencyType::all() {
        for to in CurrencyType::all() {
            if let Some(rate) = CurrencyType::conversion_rate(from, to) {
                table.insert(format!("{}_{}", from, to), rate as f64);
            }
        }
    }
    table
}

impl fmt::Display for CurrencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyType::Coins => write!(f, "Coins"),
            CurrencyType::SilverGems => write!(f, "SilverGems"),
            CurrencyType::GoldCoins => write!(f, "GoldCoins"),
            CurrencyType::Rubies => write!(f, "Rubies"),
            CurrencyType::Sapphires => write!(f, "Sapphires"),
            CurrencyType::Diamonds => write!(f, "Diamonds"),
        }
    }
}

impl FromStr for CurrencyType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coins" => Ok(CurrencyType::Coins),
            "silvergems" => Ok(CurrencyType::SilverGems),
            "goldcoins" => Ok(CurrencyType::GoldCoins),
            "rubies" => Ok(CurrencyType::Rubies),
            "sapphires" => Ok(CurrencyType::Sapphires),
            "diamonds" => Ok(CurrencyType::Diamonds),
            other => Err(Error::InvalidArgument(format!("Unknown currency: {}", other))),
        }
    }
}

/// Per-kid container of reward balances and progression state. One wallet
/// per kid; created lazily on first access or earn.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Wallet {
    pub wallet_id: Uuid,
    pub kid_id: Uuid,
    pub coins: i64,
    pub silver_gems: i64,
    pub gold_coins: i64,
    pub rubies: i64,
    pub sapphires: i64,
    pub diamonds: i64,
    pub total_lifetime_coins: i64,
    pub current_level: i32,
    pub experience_points: i64,
    /// Bumped on every persisted write; stale writers get a Conflict.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(kid_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            wallet_id: Uuid::new_v4(),
            kid_id,
            coins: 0,
            silver_gems: 0,
            gold_coins: 0,
            rubies: 0,
            sapphires: 0,
            diamonds: 0,
            total_lifetime_coins: 0,
            current_level: 1,
            experience_points: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn balance(&self, currency: CurrencyType) -> i64 {
        match currency {
            CurrencyType::Coins => self.coins,
            CurrencyType::SilverGems => self.silver_gems,
            CurrencyType::GoldCoins => self.gold_coins,
            CurrencyType::Rubies => self.rubies,
            CurrencyType::Sapphires => self.sapphires,
            CurrencyType::Diamonds => self.diamonds,
        }
    }

    pub fn set_balance(&mut self, currency: CurrencyType, value: i64) {
        match currency {
            CurrencyType::Coins => self.coins = value,
            CurrencyType::SilverGems => self.silver_gems = value,
            CurrencyType::GoldCoins => self.gold_coins = value,
            CurrencyType::Rubies => self.rubies = value,
            CurrencyType::Sapphires => self.sapphires = value,
            CurrencyType::Diamonds => self.diamonds = value,
        }
    }

    /// Experience needed to *reach* `level` (quadratic: level² × 100).
    pub fn experience_required(level: i32) -> i64 {
        (level as i64) * (level as i64) * 100
    }

    /// Remaining experience until the next level, floored at zero.
    pub fn experience_to_next_level(&self) -> i64 {
        (Self::experience_required(self.current_level + 1) - self.experience_points).max(0)
    }

    /// Net worth of all balances valued in base coins.
    pub fn total_value_in_coins(&self) -> i64 {
        CurrencyType::all()
            .iter()
            .map(|c| self.balance(*c) * c.value_in_coins())
            .sum()
    }
}

/// Snapshot DTO returned by every reward-engine operation. Controllers
/// serialize this directly.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WalletSnapshot {
    pub wallet_id: Uuid,
    pub kid_id: Uuid,
    pub coins: i64,
    pub silver_gems: i64,
    pub gold_coins: i64,
    pub rubies: i64,
    pub sapphires: i64,
    pub diamonds: i64,
    pub total_lifetime_coins: i64,
    pub current_level: i32,
    pub experience_points: i64,
    pub experience_to_next_level: i64,
    pub total_value_in_coins: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<&Wallet> for WalletSnapshot {
    fn from(w: &Wallet) -> Self {
        Self {
            wallet_id: w.wallet_id,
            kid_id: w.kid_id,
            coins: w.coins,
            silver_gems: w.silver_gems,
            gold_coins: w.gold_coins,
            rubies: w.rubies,
            sapphires: w.sapphires,
            diamonds: w.diamonds,
            total_lifetime_coins: w.total_lifetime_coins,
            current_level: w.current_level,
            experience_points: w.experience_points,
            experience_to_next_level: w.experience_to_next_level(),
            total_value_in_coins: w.total_value_in_coins(),
            updated_at: w.updated_at,
        }
    }
}
