use std::path::PathBuf;

use chrono::NaiveDate;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Reads the `MPDASH_*` settings, after merging a `.env` file from the
/// working directory into the process environment if one exists.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for a top-N that is not a positive
/// integer or a report date that is not `YYYY-MM-DD`.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Reads the `MPDASH_*` settings from the current process environment only.
///
/// # Errors
///
/// Same as [`load_app_config`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Unset variables take their defaults; `lookup` stands in for
/// `std::env::var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let wb_input_path = PathBuf::from(or_default(
        "MPDASH_WB_INPUT",
        "./Executions/wb_raw_data.json",
    ));
    let ozon_input_path = PathBuf::from(or_default(
        "MPDASH_OZON_INPUT",
        "./Executions/ozon_raw_data.json",
    ));
    let output_path = PathBuf::from(or_default("MPDASH_OUTPUT", "./dashboard_data.json"));
    let clusters_path = lookup("MPDASH_CLUSTERS_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);
    let top_n = parse_usize("MPDASH_TOP_N", "15")?;
    let report_date = match lookup("MPDASH_REPORT_DATE") {
        Ok(raw) if !raw.trim().is_empty() => Some(parse_report_date(&raw).map_err(|reason| {
            ConfigError::InvalidEnvVar {
                var: "MPDASH_REPORT_DATE".to_string(),
                reason,
            }
        })?),
        _ => None,
    };
    let log_level = or_default("MPDASH_LOG_LEVEL", "info");

    Ok(AppConfig {
        wb_input_path,
        ozon_input_path,
        output_path,
        clusters_path,
        top_n,
        report_date,
        log_level,
    })
}

/// Parse a `YYYY-MM-DD` report date.
///
/// # Errors
///
/// Returns a human-readable reason when the value is not a calendar date.
pub fn parse_report_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{raw}': {e}"))
}
