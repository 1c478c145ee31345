// File: quizkid-core/src/repositories/postgres/mod.rs

pub mod kids;
pub mod guardians;
pub mod guardian_links;
pub mod wallets;
pub mod wallet_transactions;
pub mod redeemable_items;
pub mod redemptions;
pub mod quizzes;
pub mod quiz_results;
