// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::CallctlConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &CallctlConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.name must not be empty".to_string(),
        });
    }

    let level = config.service.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level `{}` is not one of {}",
                config.service.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.queue.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "queue.name must not be empty".to_string(),
        });
    }

    if config.queue.max_in_flight == 0 {
        errors.push(ConfigError::Validation {
            message: "queue.max_in_flight must be at least 1".to_string(),
        });
    }

    let publishers = &config.queue.publishers;
    let named = [
        ("asterisk_proxy", &publishers.asterisk_proxy),
        ("customer", &publishers.customer),
        ("flow", &publishers.flow),
        ("fleet", &publishers.fleet),
    ];
    let mut seen = HashSet::new();
    for (key, publisher) in named {
        if publisher.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("queue.publishers.{key} must not be empty"),
            });
        } else if !seen.insert(publisher.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "queue.publishers.{key} `{publisher}` is bound to more than one role"
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&CallctlConfig::default()).is_ok());
    }

    #[test]
    fn zero_in_flight_fails_validation() {
        let mut config = CallctlConfig::default();
        config.queue.max_in_flight = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("max_in_flight"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = CallctlConfig::default();
        config.service.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
        config.service.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = CallctlConfig::default();
        config.service.name = " ".to_string();
        config.queue.name = String::new();
        config.queue.publishers.fleet = config.queue.publishers.flow.clone();
        config.queue.publishers.customer = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4, "{errors:?}");
    }
}
