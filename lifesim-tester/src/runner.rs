//! Drives seeded lives end to end through a file-backed engine.
use anyhow::{Context, Result};
use lifesim_game::{FileStore, Gender, LifeConfig, LifeEngine, LifeSession};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::policy::AutoplayPolicy;

const NAMES: [&str; 8] = [
    "Alex", "Blair", "Casey", "Devon", "Emery", "Finley", "Harper", "Jordan",
];

/// Options for one tester run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub seeds: Vec<u64>,
    pub lives: u32,
    pub max_years: u32,
    pub data_dir: PathBuf,
    pub life: LifeConfig,
}

/// Outcome of one autoplayed life.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LifeSummary {
    pub seed: u64,
    pub life: u32,
    pub name: String,
    pub resumed: bool,
    pub age_at_death: u32,
    pub cause_of_death: String,
    pub final_money: i64,
    pub peak_money: i64,
    pub education: String,
    pub job_title: Option<String>,
    pub children: u32,
    pub marriages: u32,
    pub crimes: u32,
    pub minigames: u32,
    pub refused_decisions: u32,
    pub legacy_earned: u64,
    pub bonuses_bought: Vec<String>,
    pub highlights: Vec<String>,
}

/// Totals for one seed's data directory after the run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeedSummary {
    pub seed: u64,
    pub data_dir: PathBuf,
    pub lives: Vec<LifeSummary>,
    pub archived_lives: usize,
    pub legacy_currency: u64,
    pub legacy_total_lives: u32,
    pub highscores: usize,
}

/// Per-life seed derived from the run seed and the life index.
#[must_use]
pub fn life_seed(seed: u64, life: u32) -> u64 {
    seed ^ u64::from(life).rotate_left(40)
}

/// Directory holding the documents for `seed`.
#[must_use]
pub fn seed_dir(root: &Path, seed: u64) -> PathBuf {
    root.join(format!("seed-{seed}"))
}

/// Autoplay every configured seed.
///
/// # Errors
///
/// Fails on an invalid life configuration.
pub fn run_all(config: &RunConfig) -> Result<Vec<SeedSummary>> {
    config
        .life
        .validate()
        .context("invalid life configuration")?;
    config
        .seeds
        .iter()
        .map(|&seed| run_seed(config, seed))
        .collect()
}

fn run_seed(config: &RunConfig, seed: u64) -> Result<SeedSummary> {
    let data_dir = seed_dir(&config.data_dir, seed);
    let engine = LifeEngine::new(FileStore::new(&data_dir), config.life.clone());
    let mut lives = Vec::new();
    for life in 0..config.lives {
        let summary = run_life(&engine, seed, life, config.max_years)
            .with_context(|| format!("seed {seed} life {life}"))?;
        lives.push(summary);
    }
    let legacy = engine.legacy();
    Ok(SeedSummary {
        seed,
        data_dir,
        lives,
        archived_lives: engine.archive().len(),
        legacy_currency: legacy.currency,
        legacy_total_lives: legacy.total_lives,
        highscores: engine.highscores().len(),
    })
}

fn start_or_resume(
    engine: &LifeEngine<FileStore>,
    policy: &mut AutoplayPolicy,
    seed: u64,
    life: u32,
) -> (LifeSession, bool, Vec<String>) {
    if let Some(session) = engine.resume() {
        log::info!("resuming saved life of {}", session.player.name);
        return (session, true, Vec::new());
    }
    let bought = policy.spend_legacy(engine);
    let index = usize::try_from(life).unwrap_or(0) % NAMES.len();
    let gender = if policy.coin(0.5) {
        Gender::Female
    } else {
        Gender::Male
    };
    let session = engine.start_life(life_seed(seed, life), NAMES[index], gender);
    (session, false, bought)
}

/// Play one life to its end (or `max_years`), then archive it.
///
/// # Errors
///
/// Fails if the engine refuses a tick on a living player.
pub fn run_life(
    engine: &LifeEngine<FileStore>,
    seed: u64,
    life: u32,
    max_years: u32,
) -> Result<LifeSummary> {
    let mut policy = AutoplayPolicy::new(life_seed(seed, life));
    let (mut session, resumed, bonuses_bought) = start_or_resume(engine, &mut policy, seed, life);
    let currency_before = engine.legacy().currency;

    for _ in 0..max_years {
        if session.is_over() {
            break;
        }
        policy.act(&mut session, engine);
        let report = engine
            .advance_year(&mut session)
            .with_context(|| {
                format!("advancing {} at age {}", session.player.name, session.player.age)
            })?;
        if let Some(event) = report.event {
            let choice = policy.pick_choice(event.choices.len());
            session
                .resolve_event(choice)
                .with_context(|| format!("resolving event {}", event.id))?;
            engine.save(&session);
        }
    }

    let record = engine
        .finish_life(&mut session, None)
        .with_context(|| format!("archiving {}", session.player.name))?;
    let tally = policy.tally();
    let legacy_earned = engine.legacy().currency.saturating_sub(currency_before);
    log::info!(
        "seed {seed} life {life}: {} died at {} ({})",
        record.name,
        record.age_at_death,
        record.cause_of_death
    );
    Ok(LifeSummary {
        seed,
        life,
        name: record.name,
        resumed,
        age_at_death: record.age_at_death,
        cause_of_death: record.cause_of_death,
        final_money: record.final_money,
        peak_money: record.peak_money,
        education: record.education.to_string(),
        job_title: record.job_title,
        children: record.children,
        marriages: record.marriages,
        crimes: tally.crimes,
        minigames: tally.minigames,
        refused_decisions: tally.refused,
        legacy_earned,
        bonuses_bought,
        highlights: record.highlights,
    })
}
