//! History of completed lives.
use serde::{Deserialize, Serialize};

use crate::player::{EducationStage, Gender};
use crate::stats::PlayerStats;

/// Snapshot written once when a life ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeRecord {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub birth_year: i32,
    pub death_year: i32,
    pub age_at_death: u32,
    pub peak_money: i64,
    pub final_money: i64,
    /// Salary, stipends and crime rewards over the whole life.
    #[serde(default)]
    pub lifetime_earnings: i64,
    pub cause_of_death: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    pub final_stats: PlayerStats,
    pub education: EducationStage,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub marriages: u32,
}

/// Insert `record` at the head, keeping at most `capacity` entries.
#[must_use]
pub fn push_record(archive: &[LifeRecord], record: LifeRecord, capacity: usize) -> Vec<LifeRecord> {
    std::iter::once(record)
        .chain(archive.iter().cloned())
        .take(capacity)
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_record(name: &str) -> LifeRecord {
    LifeRecord {
        id: format!("{name}-id"),
        name: name.to_string(),
        gender: Gender::Female,
        birth_year: 1950,
        death_year: 2030,
        age_at_death: 80,
        peak_money: 90_000,
        final_money: 40_000,
        lifetime_earnings: 250_000,
        cause_of_death: "old age".to_string(),
        highlights: vec!["life.married".to_string()],
        final_stats: PlayerStats::default(),
        education: EducationStage::Highschool,
        job_title: Some("Teacher".to_string()),
        children: 2,
        marriages: 1,
    }
}
