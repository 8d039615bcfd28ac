//! Primary job catalog.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::player::{EducationStage, Player};

/// A primary job. Salary is paid once per year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub salary: i64,
    #[serde(default)]
    pub required_intelligence: i32,
    #[serde(default)]
    pub required_education: EducationStage,
}

impl Job {
    fn listing(
        id: &str,
        title: &str,
        salary: i64,
        required_intelligence: i32,
        required_education: EducationStage,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            salary,
            required_intelligence,
            required_education,
        }
    }
}

static JOB_CATALOG: Lazy<Vec<Job>> = Lazy::new(|| {
    use EducationStage as E;
    vec![
        Job::listing("fast_food", "Fast Food Worker", 18_000, 0, E::None),
        Job::listing("retail", "Retail Clerk", 22_000, 20, E::Middleschool),
        Job::listing("warehouse", "Warehouse Worker", 28_000, 15, E::Middleschool),
        Job::listing("office_assistant", "Office Assistant", 35_000, 40, E::Highschool),
        Job::listing("electrician", "Electrician", 48_000, 45, E::Apprenticeship),
        Job::listing("teacher", "Teacher", 52_000, 60, E::University),
        Job::listing("nurse", "Nurse", 58_000, 55, E::University),
        Job::listing("engineer", "Software Engineer", 85_000, 70, E::University),
        Job::listing("lawyer", "Lawyer", 110_000, 80, E::University),
        Job::listing("doctor", "Doctor", 150_000, 85, E::University),
    ]
});

#[must_use]
pub fn job_catalog() -> &'static [Job] {
    &JOB_CATALOG
}

#[must_use]
pub fn find_job(id: &str) -> Option<&'static Job> {
    JOB_CATALOG.iter().find(|job| job.id == id)
}

/// Catalog entries the player currently qualifies for, best paid first.
#[must_use]
pub fn available_jobs(player: &Player) -> Vec<&'static Job> {
    let mut jobs: Vec<&Job> = JOB_CATALOG
        .iter()
        .filter(|job| player.apply_for_job(job).is_ok())
        .collect();
    jobs.sort_by(|a, b| b.salary.cmp(&a.salary));
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<&str> = job_catalog().iter().map(|job| job.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), job_catalog().len());
    }

    #[test]
    fn unknown_job_is_none() {
        assert!(find_job("astronaut").is_none());
        assert_eq!(find_job("nurse").map(|job| job.salary), Some(58_000));
    }
}
