// src/config/validation.rs

use super::ConfigBuilder;
use crate::errors::{ConfigError, Result};

/// Validates option values and combinations on the `ConfigBuilder`.
pub(super) fn validate_builder_options(builder: &ConfigBuilder) -> Result<()> {
    if builder.batch_size == Some(0) {
        return Err(invalid("--batch-size", "must be at least 1"));
    }
    if builder.max_tokens == Some(0) {
        return Err(invalid("--max-tokens", "must be at least 1"));
    }
    if builder.timeout_secs == Some(0) {
        return Err(invalid("--timeout", "must be at least 1 second"));
    }
    for (category, ratio) in &builder.ratios {
        if !is_share(*ratio) {
            return Err(invalid(
                &format!("{} ratio", category),
                &format!("{} is not between 0 and 1", ratio),
            ));
        }
    }
    if let Some((paths, ratio)) = &builder.chapter {
        if !is_share(*ratio) {
            return Err(invalid(
                "--ratio",
                &format!("{} is not between 0 and 1", ratio),
            ));
        }
        if paths.is_empty() {
            return Err(invalid("chapter", "at least one path is required"));
        }
        if builder.dry_run.unwrap_or(false) {
            return Err(ConfigError::Conflict {
                option1: "--dry-run".to_string(),
                option2: "chapter".to_string(),
            }
            .into());
        }
    }
    Ok(())
}

fn is_share(ratio: f64) -> bool {
    (0.0..=1.0).contains(&ratio)
}

fn invalid(option: &str, reason: &str) -> crate::errors::Error {
    ConfigError::InvalidValue {
        option: option.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
