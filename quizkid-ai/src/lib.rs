// File: quizkid-ai/src/lib.rs

pub mod generator;
pub mod models;
pub mod provider;
pub mod traits;

pub use generator::{GenerateQuizRequest, GeneratedQuestion, GeneratedQuiz, QuizGenerator};
pub use models::ProviderConfig;
pub use provider::{AnthropicProvider, OpenAIProvider};
pub use traits::{ChatMessage, ModelProvider};
