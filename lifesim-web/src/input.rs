//! Parsing of the loosely typed values the UI passes in.
use chrono::{DateTime, Utc};
use lifesim_game::{CrimeKind, EducationStage, Gender, MinigameKind};

use crate::error::BridgeError;

/// # Errors
///
/// Anything other than `female` or `male`.
pub fn parse_gender(value: &str) -> Result<Gender, BridgeError> {
    value.parse().map_err(|()| BridgeError::Unknown {
        kind: "gender",
        value: value.to_string(),
    })
}

/// # Errors
///
/// Unknown minigame ids.
pub fn parse_minigame(value: &str) -> Result<MinigameKind, BridgeError> {
    value.parse().map_err(|()| BridgeError::Unknown {
        kind: "minigame",
        value: value.to_string(),
    })
}

/// # Errors
///
/// Unknown crime ids.
pub fn parse_crime(value: &str) -> Result<CrimeKind, BridgeError> {
    CrimeKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == value)
        .ok_or_else(|| BridgeError::Unknown {
            kind: "crime",
            value: value.to_string(),
        })
}

/// # Errors
///
/// Anything that is not one of the post-secondary track ids.
pub fn parse_track(value: &str) -> Result<EducationStage, BridgeError> {
    [
        EducationStage::Extended,
        EducationStage::Apprenticeship,
        EducationStage::University,
    ]
    .into_iter()
    .find(|track| track.as_str() == value)
    .ok_or_else(|| BridgeError::Unknown {
        kind: "education track",
        value: value.to_string(),
    })
}

/// Convert a JS `Date.now()` reading.
///
/// # Errors
///
/// Non-finite or out-of-range timestamps.
pub fn timestamp_from_millis(millis: f64) -> Result<DateTime<Utc>, BridgeError> {
    let unknown = || BridgeError::Unknown {
        kind: "timestamp",
        value: millis.to_string(),
    };
    if !millis.is_finite() {
        return Err(unknown());
    }
    #[allow(clippy::cast_possible_truncation)]
    let whole = millis.trunc() as i64;
    DateTime::from_timestamp_millis(whole).ok_or_else(unknown)
}
