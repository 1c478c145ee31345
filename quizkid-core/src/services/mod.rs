// File: src/services/mod.rs

pub mod kid_service;
pub mod reward_service;
pub mod redemption_service;
pub mod quiz_service;
pub mod quiz_gen_service;

pub use kid_service::KidService;
pub use reward_service::RewardService;
pub use redemption_service::RedemptionService;
pub use quiz_service::QuizService;
pub use quiz_gen_service::QuizGenService;
