//! Shared domain types and configuration for the marketplace dashboard report.

pub mod app_config;
pub mod clusters;
pub mod config;
pub mod marketplace;
pub mod records;

use thiserror::Error;

pub use app_config::AppConfig;
pub use clusters::{load_cluster_tables, Cluster, ClusterTable, ClusterTables, FALLBACK_CLUSTER};
pub use config::{load_app_config, load_app_config_from_env, parse_report_date};
pub use marketplace::Marketplace;
pub use records::{NormalizedRecord, RedemptionRecord, StockRecord, UNKNOWN};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read cluster tables from {path}: {source}")]
    ClustersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cluster tables: {0}")]
    ClustersFileParse(#[from] serde_yaml::Error),

    #[error("cluster table validation failed: {0}")]
    Validation(String),
}
