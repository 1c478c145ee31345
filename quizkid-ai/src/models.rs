use serde::{Deserialize, Serialize};

/// Configuration for a model provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    /// Overrides the provider's default endpoint when set.
    pub api_base: Option<String>,
    pub default_model: String,
}
