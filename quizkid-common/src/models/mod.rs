// File: quizkid-common/src/models/mod.rs
pub mod kid;
pub mod wallet;
pub mod transaction;
pub mod redeemable;
pub mod quiz;

pub use kid::{Kid, KidSettings, Guardian, GuardianLink, GuardianRelationship};
pub use wallet::{CurrencyType, Wallet, WalletSnapshot, conversion_rate_table};
pub use transaction::{ActivityType, TransactionKind, WalletTransaction};
pub use redeemable::{ItemCategory, RedeemableItem, Redemption, RedemptionStatus};
pub use quiz::{
    Quiz, QuizAnswer, QuizDifficulty, QuizQuestion, QuizResult, QuizSubject, QuestionResult,
};
