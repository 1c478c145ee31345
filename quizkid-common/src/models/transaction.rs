// File: quizkid-common/src/models/transaction.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::error::Error;
use crate::models::wallet::CurrencyType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum TransactionKind {
    Earned,
    Spent,
    Bonus,
    Penalty,
    Converted,
    Expired,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Earned => write!(f, "Earned"),
            TransactionKind::Spent => write!(f, "Spent"),
            TransactionKind::Bonus => write!(f, "Bonus"),
            TransactionKind::Penalty => write!(f, "Penalty"),
            TransactionKind::Converted => write!(f, "Converted"),
            TransactionKind::Expired => write!(f, "Expired"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "earned" => Ok(TransactionKind::Earned),
            "spent" => Ok(TransactionKind::Spent),
            "bonus" => Ok(TransactionKind::Bonus),
            "penalty" => Ok(TransactionKind::Penalty),
            "converted" => Ok(TransactionKind::Converted),
            "expired" => Ok(TransactionKind::Expired),
            other => Err(Error::InvalidArgument(format!("Unknown transaction kind: {}", other))),
        }
    }
}

/// What the kid was doing when the balance changed.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum ActivityType {
    QuizCompleted,
    QuizPerfectScore,
    DailyLogin,
    WeeklyStreak,
    LevelUp,
    Achievement,
    Challenge,
    HomeworkCompleted,
    ReadingTime,
    CreativeActivity,
    Redemption,
    ParentBonus,
    SpecialEvent,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityType::QuizCompleted => write!(f, "QuizCompleted"),
            ActivityType::QuizPerfectScore => write!(f, "QuizPerfectScore"),
            ActivityType::DailyLogin => write!(f, "DailyLogin"),
            ActivityType::WeeklyStreak => write!(f, "WeeklyStreak"),
            ActivityType::LevelUp => write!(f, "LevelUp"),
            ActivityType::Achievement => write!(f, "Achievement"),
            ActivityType::Challenge => write!(f, "Challenge"),
            ActivityType::HomeworkCompleted => write!(f, "HomeworkCompleted"),
            ActivityType::ReadingTime => write!(f, "ReadingTime"),
            ActivityType::CreativeActivity => write!(f, "CreativeActivity"),
            ActivityType::Redemption => write!(f, "Redemption"),
            ActivityType::ParentBonus => write!(f, "ParentBonus"),
            ActivityType::SpecialEvent => write!(f, "SpecialEvent"),
        }
    }
}

impl FromStr for ActivityType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quizcompleted" => Ok(ActivityType::QuizCompleted),
            "quizperfectscore" => Ok(ActivityType::QuizPerfectScore),
            "dailylogin" => Ok(ActivityType::DailyLogin),
            "weeklystreak" => Ok(ActivityType::WeeklyStreak),
            "levelup" => Ok(ActivityType::LevelUp),
            "achievement" => Ok(ActivityType::Achievement),
            "challenge" => Ok(ActivityType::Challenge),
            "homeworkcompleted" => Ok(ActivityType::HomeworkCompleted),
            "readingtime" => Ok(ActivityType::ReadingTime),
            "creativeactivity" => Ok(ActivityType::CreativeActivity),
            "redemption" => Ok(ActivityType::Redemption),
            "parentbonus" => Ok(ActivityType::ParentBonus),
            "specialevent" => Ok(ActivityType::SpecialEvent),
            other => Err(Error::InvalidArgument(format!("Unknown activity type: {}", other))),
        }
    }
}

/// One immutable, balance-affecting ledger entry. Created only by the
/// reward engine; never updated or deleted.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct WalletTransaction {
    pub transaction_id: Uuid,
    pub wallet_id: Uuid,
    pub currency: CurrencyType,
    /// Positive = credit, negative = debit.
    pub amount: i64,
    pub kind: TransactionKind,
    pub activity: ActivityType,
    pub description: String,
    pub related_entity_id: Option<Uuid>,
    /// The wallet's balance for `currency` immediately after this entry.
    /// This is the ledger's auditability guarantee.
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}

impl WalletTransaction {
    pub fn new(
        wallet_id: Uuid,
        currency: CurrencyType,
        amount: i64,
        kind: TransactionKind,
        activity: ActivityType,
        description: &str,
        related_entity_id: Option<Uuid>,
        balance_after: i64,
    ) -> Self {
        Self {
            transaction_id: Uuid::new_v4(),
            wallet_id,
            currency,
            amount,
            kind,
            activity,
            description: description.to_string(),
            related_entity_id,
            balance_after,
            created_at: Utc::now(),
        }
    }
}
