//! Tunable session configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::LEGACY_TOP_EVENTS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeConfig {
    /// Calendar year a fresh life is born in.
    #[serde(default = "LifeConfig::default_start_year")]
    pub start_year: i32,
    /// Completed lives kept in the archive.
    #[serde(default = "LifeConfig::default_archive_capacity")]
    pub archive_capacity: usize,
    /// Share of final money paid out as legacy currency.
    #[serde(default = "LifeConfig::default_legacy_payout_percent")]
    pub legacy_payout_percent: u32,
    /// Timeline entries copied into a life record.
    #[serde(default = "LifeConfig::default_timeline_highlights")]
    pub timeline_highlights: usize,
    /// Chance of a prison micro-event per year served.
    #[serde(default = "LifeConfig::default_prison_event_chance")]
    pub prison_event_chance: f64,
    /// Chance of a narrative event being offered each year.
    #[serde(default = "LifeConfig::default_event_chance")]
    pub event_chance: f64,
    /// Partner age after which yearly mortality rolls begin.
    #[serde(default = "LifeConfig::default_partner_mortality_age")]
    pub partner_mortality_age: u32,
    /// Age from which a natural death is recorded as old age.
    #[serde(default = "LifeConfig::default_old_age")]
    pub old_age: u32,
}

impl LifeConfig {
    #[must_use]
    pub const fn default_start_year() -> i32 {
        2000
    }

    #[must_use]
    pub const fn default_archive_capacity() -> usize {
        50
    }

    #[must_use]
    pub const fn default_legacy_payout_percent() -> u32 {
        10
    }

    #[must_use]
    pub const fn default_timeline_highlights() -> usize {
        LEGACY_TOP_EVENTS
    }

    #[must_use]
    pub const fn default_prison_event_chance() -> f64 {
        0.5
    }

    #[must_use]
    pub const fn default_event_chance() -> f64 {
        0.7
    }

    #[must_use]
    pub const fn default_partner_mortality_age() -> u32 {
        75
    }

    #[must_use]
    pub const fn default_old_age() -> u32 {
        75
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a config.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.archive_capacity == 0 {
            return Err(ConfigError::Zero("archive_capacity"));
        }
        if self.timeline_highlights == 0 {
            return Err(ConfigError::Zero("timeline_highlights"));
        }
        if self.legacy_payout_percent > 100 {
            return Err(ConfigError::PercentOutOfRange {
                field: "legacy_payout_percent",
                value: self.legacy_payout_percent,
            });
        }
        validate_probability("prison_event_chance", self.prison_event_chance)?;
        validate_probability("event_chance", self.event_chance)?;
        Ok(())
    }
}

fn validate_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ProbabilityOutOfRange { field, value });
    }
    Ok(())
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            start_year: Self::default_start_year(),
            archive_capacity: Self::default_archive_capacity(),
            legacy_payout_percent: Self::default_legacy_payout_percent(),
            timeline_highlights: Self::default_timeline_highlights(),
            prison_event_chance: Self::default_prison_event_chance(),
            event_chance: Self::default_event_chance(),
            partner_mortality_age: Self::default_partner_mortality_age(),
            old_age: Self::default_old_age(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("{field} must be between 0 and 100 (got {value})")]
    PercentOutOfRange { field: &'static str, value: u32 },
    #[error("{field} must be between 0.00 and 1.00 (got {value:.2})")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LifeConfig::default();
        assert_eq!(config.archive_capacity, 50);
        assert_eq!(config.legacy_payout_percent, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            LifeConfig::from_json(r#"{"start_year": 1985, "event_chance": 0.25}"#).unwrap();
        assert_eq!(config.start_year, 1985);
        assert!((config.event_chance - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.archive_capacity, 50);
        assert_eq!(config.partner_mortality_age, 75);
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        let zero = LifeConfig {
            archive_capacity: 0,
            ..LifeConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::Zero("archive_capacity")));

        let greedy = LifeConfig {
            legacy_payout_percent: 150,
            ..LifeConfig::default()
        };
        assert!(matches!(
            greedy.validate(),
            Err(ConfigError::PercentOutOfRange { .. })
        ));

        let chaotic = LifeConfig {
            prison_event_chance: 1.5,
            ..LifeConfig::default()
        };
        assert!(matches!(
            chaotic.validate(),
            Err(ConfigError::ProbabilityOutOfRange {
                field: "prison_event_chance",
                ..
            })
        ));
    }
}
