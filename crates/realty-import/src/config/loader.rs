use std::collections::HashSet;
use std::path::Path;

use crate::config::schema::ImportConfig;
use crate::error::ConfigError;
use crate::normalize;

const SCHEMA_JSON: &str = include_str!("../../../../schema/import-config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ImportConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<ImportConfig, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: ImportConfig = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

pub fn validate_config(config: &ImportConfig) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    for (name, year) in [
        ("market_data_year", config.periods.market_data_year),
        ("har_report_year", config.periods.har_report_year),
    ] {
        if !(1900..=2100).contains(&year) {
            return Err(ConfigError::Validation {
                message: format!("{} out of range: {}", name, year),
            });
        }
    }

    if normalize::parse_date(&config.periods.mls_snapshot_date).is_none() {
        return Err(ConfigError::Validation {
            message: format!(
                "mls_snapshot_date is not a date: {}",
                config.periods.mls_snapshot_date
            ),
        });
    }

    if config.retry.max_attempts == 0 {
        return Err(ConfigError::Validation {
            message: "retry.max_attempts must be at least 1".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for mapping in &config.har_reports {
        if mapping.folder.trim().is_empty() {
            return Err(ConfigError::InvalidReportMapping {
                folder: mapping.folder.clone(),
                reason: "Folder name is empty".to_string(),
            });
        }
        if !(1..=12).contains(&mapping.month) {
            return Err(ConfigError::InvalidReportMapping {
                folder: mapping.folder.clone(),
                reason: format!("Month {} is outside 1..=12", mapping.month),
            });
        }
        if !seen.insert(mapping.folder.as_str()) {
            return Err(ConfigError::InvalidReportMapping {
                folder: mapping.folder.clone(),
                reason: "Duplicate report folder".to_string(),
            });
        }
    }

    Ok(())
}
