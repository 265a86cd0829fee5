use std::path::PathBuf;

use chrono::NaiveDate;

/// Runtime settings for one report run, resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub wb_input_path: PathBuf,
    pub ozon_input_path: PathBuf,
    pub output_path: PathBuf,
    /// Optional YAML file overriding the built-in cluster tables.
    pub clusters_path: Option<PathBuf>,
    /// Bucket limit for warehouse/region sales and stock-by-warehouse lists.
    pub top_n: usize,
    /// Fixed "today" for reproducible runs. `None` means the local date.
    pub report_date: Option<NaiveDate>,
    pub log_level: String,
}
