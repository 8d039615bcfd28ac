//! Minigame highscores and cumulative play statistics.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::numbers::i64_to_f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinigameKind {
    Memory,
    Reaction,
    Quiz,
    Typing,
    Rhythm,
}

impl MinigameKind {
    pub const ALL: [Self; 5] = [
        Self::Memory,
        Self::Reaction,
        Self::Quiz,
        Self::Typing,
        Self::Rhythm,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Reaction => "reaction",
            Self::Quiz => "quiz",
            Self::Typing => "typing",
            Self::Rhythm => "rhythm",
        }
    }
}

impl fmt::Display for MinigameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MinigameKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub minigame: MinigameKind,
    pub score: i64,
    pub achieved_at: DateTime<Utc>,
}

/// Best score per minigame, keyed by [`MinigameKind::as_str`].
pub type HighscoreTable = BTreeMap<String, HighscoreEntry>;

/// Record `score` if it strictly beats the stored best.
///
/// Returns the updated table and the new entry, or `None` when the score
/// did not replace anything.
#[must_use]
pub fn record_highscore(
    table: &HighscoreTable,
    minigame: MinigameKind,
    score: i64,
    at: DateTime<Utc>,
) -> (HighscoreTable, Option<HighscoreEntry>) {
    let beaten = table
        .get(minigame.as_str())
        .is_none_or(|best| score > best.score);
    if !beaten {
        return (table.clone(), None);
    }
    let entry = HighscoreEntry {
        minigame,
        score,
        achieved_at: at,
    };
    let mut next = table.clone();
    next.insert(minigame.as_str().to_string(), entry.clone());
    (next, Some(entry))
}

/// Cumulative counters for one minigame.
///
/// `low_score` is absent until the first play; it is never stored as a
/// non-finite placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MinigameStats {
    #[serde(default)]
    pub plays: u32,
    #[serde(default)]
    pub total_score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_score: Option<i64>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played: Option<DateTime<Utc>>,
}

impl MinigameStats {
    /// Fold one play into the counters.
    #[must_use]
    pub fn record(&self, score: i64, won: bool, at: DateTime<Utc>) -> Self {
        Self {
            plays: self.plays.saturating_add(1),
            total_score: self.total_score.saturating_add(score),
            high_score: Some(self.high_score.map_or(score, |high| high.max(score))),
            low_score: Some(self.low_score.map_or(score, |low| low.min(score))),
            wins: self.wins + u32::from(won),
            losses: self.losses + u32::from(!won),
            last_played: Some(at),
        }
    }

    #[must_use]
    pub fn average_score(&self) -> Option<f64> {
        (self.plays > 0).then(|| i64_to_f64(self.total_score) / f64::from(self.plays))
    }

    #[must_use]
    pub fn win_rate(&self) -> Option<f64> {
        (self.plays > 0).then(|| f64::from(self.wins) / f64::from(self.plays))
    }
}

/// Stats per minigame id.
pub type MinigameStatsMap = BTreeMap<String, MinigameStats>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn highscore_keeps_the_maximum() {
        let table = HighscoreTable::new();
        let (table, first) = record_highscore(&table, MinigameKind::Quiz, 40, at(1));
        assert_eq!(first.map(|e| e.score), Some(40));
        let (table, lower) = record_highscore(&table, MinigameKind::Quiz, 25, at(2));
        assert!(lower.is_none());
        let (table, equal) = record_highscore(&table, MinigameKind::Quiz, 40, at(3));
        assert!(equal.is_none());
        assert_eq!(table["quiz"].achieved_at, at(1));
        let (table, higher) = record_highscore(&table, MinigameKind::Quiz, 90, at(4));
        assert!(higher.is_some());
        assert_eq!(table["quiz"].score, 90);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn stats_accumulate_every_play() {
        let stats = MinigameStats::default()
            .record(10, true, at(1))
            .record(30, false, at(2))
            .record(20, true, at(3));
        assert_eq!(stats.plays, 3);
        assert_eq!(stats.high_score, Some(30));
        assert_eq!(stats.low_score, Some(10));
        assert_eq!((stats.wins, stats.losses), (2, 1));
        assert_eq!(stats.last_played, Some(at(3)));
        assert!((stats.average_score().unwrap() - 20.0).abs() < f64::EPSILON);
        assert!((stats.win_rate().unwrap() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn unset_low_score_roundtrips_as_absent() {
        let fresh = MinigameStats::default();
        assert!(fresh.average_score().is_none());
        let json = serde_json::to_string(&fresh).unwrap();
        assert!(!json.contains("low_score"));
        let back: MinigameStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fresh);
        let legacy: MinigameStats =
            serde_json::from_str(r#"{"plays": 0, "low_score": null}"#).unwrap();
        assert!(legacy.low_score.is_none());
    }

    #[test]
    fn kinds_parse_from_ids() {
        for kind in MinigameKind::ALL {
            assert_eq!(kind.as_str().parse::<MinigameKind>(), Ok(kind));
        }
        assert!("pinball".parse::<MinigameKind>().is_err());
    }
}
