//! Crime attempts, sentencing and prison life.
//!
//! Every attempt is appended to the player's record. Only entries with
//! `caught == true` count as prior offenses, both for the success penalty
//! and for sentencing.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    CRIME_INTELLIGENCE_DIVISOR, CRIME_LUCK_DIVISOR, CRIME_MAX_SUCCESS, CRIME_MIN_SUCCESS,
    CRIME_PRIOR_PENALTY, STAT_CENTER,
};
use crate::player::{DecisionError, Player, apply_effects};
use crate::stats::{Effects, Stat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrimeKind {
    Pickpocket,
    Shoplifting,
    CarTheft,
    Burglary,
    Fraud,
    DrugDealing,
    BankRobbery,
}

/// Static parameters of one crime type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrimeSpec {
    pub kind: CrimeKind,
    pub name: &'static str,
    pub reward_min: i64,
    pub reward_max: i64,
    pub base_success: f64,
    pub prison_min: u32,
    pub prison_max: u32,
}

impl CrimeKind {
    pub const ALL: [Self; 7] = [
        Self::Pickpocket,
        Self::Shoplifting,
        Self::CarTheft,
        Self::Burglary,
        Self::Fraud,
        Self::DrugDealing,
        Self::BankRobbery,
    ];

    #[must_use]
    pub const fn spec(self) -> CrimeSpec {
        let (name, reward_min, reward_max, base_success, prison_min, prison_max) = match self {
            Self::Pickpocket => ("Pickpocket", 50, 500, 0.7, 1, 3),
            Self::Shoplifting => ("Shoplifting", 20, 300, 0.75, 1, 2),
            Self::CarTheft => ("Car Theft", 2_000, 15_000, 0.45, 2, 5),
            Self::Burglary => ("Burglary", 1_000, 10_000, 0.5, 2, 6),
            Self::Fraud => ("Fraud", 5_000, 50_000, 0.4, 3, 8),
            Self::DrugDealing => ("Drug Dealing", 3_000, 30_000, 0.5, 3, 10),
            Self::BankRobbery => ("Bank Robbery", 50_000, 500_000, 0.15, 8, 20),
        };
        CrimeSpec {
            kind: self,
            name,
            reward_min,
            reward_max,
            base_success,
            prison_min,
            prison_max,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pickpocket => "pickpocket",
            Self::Shoplifting => "shoplifting",
            Self::CarTheft => "car_theft",
            Self::Burglary => "burglary",
            Self::Fraud => "fraud",
            Self::DrugDealing => "drug_dealing",
            Self::BankRobbery => "bank_robbery",
        }
    }
}

impl fmt::Display for CrimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable log entry for one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriminalRecord {
    pub crime: CrimeKind,
    pub year: i32,
    pub caught: bool,
    pub prison_years: u32,
}

/// Count of attempts that ended in an arrest.
#[must_use]
pub fn prior_offenses(records: &[CriminalRecord]) -> u32 {
    let caught = records.iter().filter(|record| record.caught).count();
    u32::try_from(caught).unwrap_or(u32::MAX)
}

/// Probability of getting away with `spec`, clamped to `[0.05, 0.95]`.
#[must_use]
pub fn success_rate(spec: &CrimeSpec, intelligence: i32, luck: i32, priors: u32) -> f64 {
    let intelligence_bonus = f64::from(intelligence - STAT_CENTER) / CRIME_INTELLIGENCE_DIVISOR;
    let luck_bonus = f64::from(luck - STAT_CENTER) / CRIME_LUCK_DIVISOR;
    let penalty = f64::from(priors) * CRIME_PRIOR_PENALTY;
    (spec.base_success + intelligence_bonus + luck_bonus - penalty)
        .clamp(CRIME_MIN_SUCCESS, CRIME_MAX_SUCCESS)
}

/// Upper bound on any sentence for `spec` given the prior count.
#[must_use]
pub const fn max_sentence(spec: &CrimeSpec, priors: u32) -> u32 {
    spec.prison_max.saturating_add(priors.saturating_mul(2))
}

/// Sentence for a caught attempt: base + 1.5 per prior (floored) + variance,
/// capped by [`max_sentence`].
pub fn prison_sentence<R: Rng + ?Sized>(spec: &CrimeSpec, priors: u32, rng: &mut R) -> u32 {
    let repeat = priors.saturating_add(priors / 2);
    let spread = spec.prison_max.saturating_sub(spec.prison_min);
    let variance = rng.gen_range(0..=spread);
    spec.prison_min
        .saturating_add(repeat)
        .saturating_add(variance)
        .min(max_sentence(spec, priors))
}

/// Resolution of a single attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeOutcome {
    pub success: bool,
    pub reward: i64,
    pub prison_years: u32,
    pub record: CriminalRecord,
}

/// Roll an attempt of `kind` for a player with the given attributes.
pub fn resolve_crime<R: Rng + ?Sized>(
    kind: CrimeKind,
    intelligence: i32,
    luck: i32,
    priors: u32,
    year: i32,
    rng: &mut R,
) -> CrimeOutcome {
    let spec = kind.spec();
    let rate = success_rate(&spec, intelligence, luck, priors);
    let success = rng.gen_range(0.0..1.0) < rate;
    let (reward, prison_years) = if success {
        (rng.gen_range(spec.reward_min..=spec.reward_max), 0)
    } else {
        (0, prison_sentence(&spec, priors, rng))
    };
    CrimeOutcome {
        success,
        reward,
        prison_years,
        record: CriminalRecord {
            crime: kind,
            year,
            caught: !success,
            prison_years,
        },
    }
}

/// Attempt a crime, returning the updated player and the outcome.
///
/// A success pays the reward; a failure jails the player for the sentence.
///
/// # Errors
///
/// Refused for dead or already incarcerated players.
pub fn commit_crime<R: Rng + ?Sized>(
    player: &Player,
    kind: CrimeKind,
    year: i32,
    rng: &mut R,
) -> Result<(Player, CrimeOutcome), DecisionError> {
    player.ensure_active()?;
    let outcome = resolve_crime(
        kind,
        player.stats.intelligence,
        player.stats.luck,
        player.prior_offenses(),
        year,
        rng,
    );
    let mut next = apply_effects(player, &Effects::money(outcome.reward));
    next.criminal_record.push(outcome.record.clone());
    if outcome.success {
        next.lifetime_earnings = next.lifetime_earnings.saturating_add(outcome.reward);
    } else {
        next.incarcerated = outcome.prison_years > 0;
        next.prison_years_left = outcome.prison_years;
        next.job = None;
        next.newspaper_job = false;
    }
    log::debug!(
        "crime {kind} by {}: success={} reward={} prison={}",
        player.id,
        outcome.success,
        outcome.reward,
        outcome.prison_years
    );
    Ok((next, outcome))
}

/// Flavor event drawn during a year behind bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrisonEvent {
    pub key: &'static str,
    pub description: &'static str,
    pub stat: Stat,
    pub delta: i32,
}

impl PrisonEvent {
    #[must_use]
    pub fn effects(&self) -> Effects {
        Effects::stat(self.stat, self.delta).with_log(self.key)
    }
}

pub const PRISON_EVENTS: [PrisonEvent; 6] = [
    PrisonEvent {
        key: "prison.yard_fight",
        description: "You got into a fight in the yard.",
        stat: Stat::Health,
        delta: -10,
    },
    PrisonEvent {
        key: "prison.illness",
        description: "A cold swept through the cell block.",
        stat: Stat::Health,
        delta: -5,
    },
    PrisonEvent {
        key: "prison.workout",
        description: "You spent your free hours lifting weights.",
        stat: Stat::Fitness,
        delta: 5,
    },
    PrisonEvent {
        key: "prison.kitchen_duty",
        description: "Kitchen duty kept you on your feet.",
        stat: Stat::Fitness,
        delta: 2,
    },
    PrisonEvent {
        key: "prison.library",
        description: "You read everything in the prison library.",
        stat: Stat::Intelligence,
        delta: 4,
    },
    PrisonEvent {
        key: "prison.education_program",
        description: "You enrolled in the prison education program.",
        stat: Stat::Intelligence,
        delta: 6,
    },
];

pub fn draw_prison_event<R: Rng + ?Sized>(rng: &mut R) -> &'static PrisonEvent {
    &PRISON_EVENTS[rng.gen_range(0..PRISON_EVENTS.len())]
}
