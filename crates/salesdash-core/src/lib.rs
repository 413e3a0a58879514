pub mod app_config;
pub mod config;
pub mod criteria;
pub mod nulls;
pub mod orders;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, load_app_config_with_data_path};
pub use criteria::{DateRange, FilterCriteria, FilterDefaults, FilterSelection};
pub use nulls::is_null_token;
pub use orders::{
    Dataset, OrderRecord, DEFAULT_CUSTOMER_SEGMENT, UNKNOWN_PRODUCT_CATEGORY,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
