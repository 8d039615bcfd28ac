//! The player character and the single effect funnel.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{
    APPRENTICESHIP_EXTRA_YEARS, EXTENDED_EXTRA_YEARS, KINDERGARTEN_MIN_AGE, MAJORITY_AGE,
    NEWSPAPER_MIN_AGE, SCHOOL_END_AGE, START_STAT_MAX, START_STAT_MIN, UNIVERSITY_EXTRA_YEARS,
    WORKING_AGE,
};
use crate::crime::CriminalRecord;
use crate::jobs::Job;
use crate::legacy::StartingBonuses;
use crate::stats::{Effects, PlayerStats};

/// Reasons a player decision is refused. The input state is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecisionError {
    #[error("the player is no longer alive")]
    Deceased,
    #[error("this life has already been archived")]
    Archived,
    #[error("not available while incarcerated")]
    Incarcerated,
    #[error("requires age {min}-{max} (player is {age})")]
    AgeOutOfRange { age: u32, min: u32, max: u32 },
    #[error("requires {required} money (player has {available})")]
    InsufficientFunds { required: i64, available: i64 },
    #[error("requirements not met: {0}")]
    Unqualified(&'static str),
    #[error("no eligible partner: {0}")]
    NoEligiblePartner(&'static str),
    #[error("unknown {kind} `{id}`")]
    Unknown { kind: &'static str, id: String },
    #[error("already {0}")]
    AlreadyActive(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl Gender {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Female => Self::Male,
            Self::Male => Self::Female,
        }
    }

    /// Fair coin flip.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Self::Female
        } else {
            Self::Male
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "female" => Ok(Self::Female),
            "male" => Ok(Self::Male),
            _ => Err(()),
        }
    }
}

/// Education stages. The three post-secondary tracks are alternatives; use
/// [`EducationStage::rank`] when comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EducationStage {
    #[default]
    None,
    Kindergarten,
    Elementary,
    Middleschool,
    Highschool,
    Extended,
    Apprenticeship,
    University,
}

impl EducationStage {
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Kindergarten => 1,
            Self::Elementary => 2,
            Self::Middleschool => 3,
            Self::Highschool => 4,
            Self::Extended | Self::Apprenticeship => 5,
            Self::University => 6,
        }
    }

    /// Apprenticeship jobs take an apprenticeship; other requirements are
    /// met by any stage of equal or higher rank.
    #[must_use]
    pub const fn meets(self, required: Self) -> bool {
        match required {
            Self::Apprenticeship => matches!(self, Self::Apprenticeship),
            _ => self.rank() >= required.rank(),
        }
    }

    /// School years granted beyond the compulsory window.
    #[must_use]
    pub const fn extra_years(self) -> u32 {
        match self {
            Self::Extended => EXTENDED_EXTRA_YEARS,
            Self::Apprenticeship => APPRENTICESHIP_EXTRA_YEARS,
            Self::University => UNIVERSITY_EXTRA_YEARS,
            _ => 0,
        }
    }

    #[must_use]
    pub const fn is_post_secondary(self) -> bool {
        matches!(self, Self::Extended | Self::Apprenticeship | Self::University)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Kindergarten => "kindergarten",
            Self::Elementary => "elementary",
            Self::Middleschool => "middleschool",
            Self::Highschool => "highschool",
            Self::Extended => "extended",
            Self::Apprenticeship => "apprenticeship",
            Self::University => "university",
        }
    }
}

impl fmt::Display for EducationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single life's protagonist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub birth_year: i32,
    pub age: u32,
    pub money: i64,
    pub stats: PlayerStats,
    #[serde(default)]
    pub job: Option<Job>,
    #[serde(default)]
    pub education: EducationStage,
    pub alive: bool,
    #[serde(default)]
    pub in_school: bool,
    #[serde(default)]
    pub school_years: u32,
    #[serde(default)]
    pub extra_school_years: u32,
    #[serde(default)]
    pub newspaper_job: bool,
    #[serde(default)]
    pub criminal_record: Vec<CriminalRecord>,
    #[serde(default)]
    pub incarcerated: bool,
    #[serde(default)]
    pub prison_years_left: u32,
    #[serde(default)]
    pub lifetime_earnings: i64,
}

impl Player {
    /// Create a newborn with randomized stats, boosted by legacy bonuses.
    pub fn new_random<R: Rng + ?Sized>(
        name: impl Into<String>,
        gender: Gender,
        birth_year: i32,
        bonuses: &StartingBonuses,
        rng: &mut R,
    ) -> Self {
        let mut roll = || rng.gen_range(START_STAT_MIN..=START_STAT_MAX);
        let rolled = PlayerStats::new(roll(), roll(), roll(), roll(), roll());
        Self {
            id: format!("{:016x}", rng.next_u64()),
            name: name.into(),
            gender,
            birth_year,
            age: 0,
            money: bonuses.money.max(0),
            stats: rolled.apply(&bonuses.stats),
            job: None,
            education: EducationStage::None,
            alive: true,
            in_school: false,
            school_years: 0,
            extra_school_years: 0,
            newspaper_job: false,
            criminal_record: Vec::new(),
            incarcerated: false,
            prison_years_left: 0,
            lifetime_earnings: 0,
        }
    }

    #[must_use]
    pub const fn is_adult(&self) -> bool {
        self.age >= MAJORITY_AGE
    }

    /// Apply an effect set through the single stat/money funnel.
    #[must_use]
    pub fn apply_effects(&self, effects: &Effects) -> Self {
        apply_effects(self, effects)
    }

    /// Guard shared by every decision: the player must be alive and free.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Deceased`] or [`DecisionError::Incarcerated`].
    pub const fn ensure_active(&self) -> Result<(), DecisionError> {
        if !self.alive {
            return Err(DecisionError::Deceased);
        }
        if self.incarcerated {
            return Err(DecisionError::Incarcerated);
        }
        Ok(())
    }

    /// Take a primary job from the catalog.
    ///
    /// # Errors
    ///
    /// Fails when the player is too young, incarcerated, or under-qualified.
    pub fn apply_for_job(&self, job: &Job) -> Result<Self, DecisionError> {
        self.ensure_active()?;
        if self.age < WORKING_AGE {
            return Err(DecisionError::AgeOutOfRange {
                age: self.age,
                min: WORKING_AGE,
                max: u32::MAX,
            });
        }
        if self.stats.intelligence < job.required_intelligence {
            return Err(DecisionError::Unqualified("intelligence too low"));
        }
        if !self.education.meets(job.required_education) {
            return Err(DecisionError::Unqualified("education too low"));
        }
        Ok(Self {
            job: Some(job.clone()),
            ..self.clone()
        })
    }

    #[must_use]
    pub fn quit_job(&self) -> Self {
        Self {
            job: None,
            ..self.clone()
        }
    }

    /// Start the newspaper route.
    ///
    /// # Errors
    ///
    /// Fails below the minimum age or when already delivering papers.
    pub fn take_newspaper_job(&self) -> Result<Self, DecisionError> {
        self.ensure_active()?;
        if self.age < NEWSPAPER_MIN_AGE {
            return Err(DecisionError::AgeOutOfRange {
                age: self.age,
                min: NEWSPAPER_MIN_AGE,
                max: u32::MAX,
            });
        }
        if self.newspaper_job {
            return Err(DecisionError::AlreadyActive("delivering newspapers"));
        }
        Ok(Self {
            newspaper_job: true,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn quit_newspaper_job(&self) -> Self {
        Self {
            newspaper_job: false,
            ..self.clone()
        }
    }

    /// Enroll in kindergarten before compulsory schooling starts.
    ///
    /// # Errors
    ///
    /// Fails outside the kindergarten age window.
    pub fn start_kindergarten(&self) -> Result<Self, DecisionError> {
        self.ensure_active()?;
        let max = crate::constants::ELEMENTARY_AGE - 1;
        if !(KINDERGARTEN_MIN_AGE..=max).contains(&self.age) {
            return Err(DecisionError::AgeOutOfRange {
                age: self.age,
                min: KINDERGARTEN_MIN_AGE,
                max,
            });
        }
        if self.education != EducationStage::None {
            return Err(DecisionError::AlreadyActive("in kindergarten"));
        }
        Ok(Self {
            education: EducationStage::Kindergarten,
            ..self.clone()
        })
    }

    /// Continue after highschool on one of the post-secondary tracks.
    ///
    /// # Errors
    ///
    /// Fails unless the player has reached the end of highschool and picks a
    /// post-secondary track.
    pub fn choose_further_education(&self, track: EducationStage) -> Result<Self, DecisionError> {
        self.ensure_active()?;
        if !track.is_post_secondary() {
            return Err(DecisionError::Unqualified("not a post-secondary track"));
        }
        if self.education != EducationStage::Highschool {
            return Err(DecisionError::Unqualified("highschool not reached"));
        }
        if self.age < SCHOOL_END_AGE {
            return Err(DecisionError::AgeOutOfRange {
                age: self.age,
                min: SCHOOL_END_AGE,
                max: u32::MAX,
            });
        }
        let extra = track.extra_years();
        // Years already past the compulsory window count against the track.
        let already = self.age - SCHOOL_END_AGE;
        Ok(Self {
            education: track,
            extra_school_years: already + extra,
            in_school: true,
            ..self.clone()
        })
    }

    /// Number of caught offenses on record.
    #[must_use]
    pub fn prior_offenses(&self) -> u32 {
        crate::crime::prior_offenses(&self.criminal_record)
    }
}

/// Add `delta` to `money`, flooring at zero while the player is a minor.
#[must_use]
pub const fn adjust_money(money: i64, delta: i64, age: u32) -> i64 {
    let next = money.saturating_add(delta);
    if age < MAJORITY_AGE && next < 0 {
        0
    } else {
        next
    }
}

/// The single stat/money funnel used by every event and decision.
///
/// Stats are re-clamped to `[0, 100]`, money follows [`adjust_money`] and
/// the alive flag is recomputed from health.
#[must_use]
pub fn apply_effects(player: &Player, effects: &Effects) -> Player {
    let stats = player.stats.apply(effects);
    Player {
        stats,
        money: adjust_money(player.money, effects.money, player.age),
        alive: stats.health > 0,
        ..player.clone()
    }
}
