// src/repositories/mod.rs

pub mod postgres;

pub use postgres::kids::PostgresKidRepository;
pub use postgres::guardians::PostgresGuardianRepository;
pub use postgres::guardian_links::PostgresGuardianLinkRepository;
pub use postgres::wallets::PostgresWalletRepository;
pub use postgres::wallet_transactions::PostgresWalletTransactionRepository;
pub use postgres::redeemable_items::PostgresRedeemableItemRepository;
pub use postgres::redemptions::PostgresRedemptionRepository;
pub use postgres::quizzes::PostgresQuizRepository;
pub use postgres::quiz_results::PostgresQuizResultRepository;
