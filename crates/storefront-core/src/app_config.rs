use std::path::PathBuf;

use crate::pricing::CurrencyFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub env: Environment,
    pub currency: CurrencyFormat,
    pub log_level: String,
    pub catalog_path: PathBuf,
    /// Upper bound on a single cart service call, in milliseconds.
    pub cart_timeout_ms: u64,
    /// Total unit capacity of the in-memory cart; `None` is unbounded.
    pub cart_capacity: Option<u32>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            env: Environment::Development,
            currency: CurrencyFormat::inr(),
            log_level: "info".to_string(),
            catalog_path: PathBuf::from("./catalog.json"),
            cart_timeout_ms: 10_000,
            cart_capacity: None,
        }
    }
}
