//! Lifesim Game Engine
//!
//! Platform-agnostic life-progression and persistence engine for the Lifesim
//! browser life simulation. This crate provides all game mechanics without UI
//! or platform-specific dependencies; platforms supply a [`KeyValueStore`].

pub mod aging;
pub mod config;
pub mod constants;
pub mod crime;
pub mod events;
pub mod jobs;
pub mod legacy;
pub mod names;
pub mod numbers;
pub mod persistence;
pub mod player;
pub mod pregnancy;
pub mod property;
pub mod relationships;
pub mod rng;
pub mod session;
pub mod stats;

use chrono::{DateTime, Utc};

// Re-export commonly used types
pub use aging::{AgingOutcome, age_one_year};
pub use config::{ConfigError, LifeConfig};
pub use crime::{CrimeKind, CrimeOutcome, CrimeSpec, CriminalRecord, commit_crime, success_rate};
pub use events::{EventCatalog, EventChoice, LifeEvent, resolve_choice};
pub use jobs::{Job, available_jobs, find_job, job_catalog};
pub use legacy::{LegacyBonus, LegacyData, PurchaseError, StartingBonuses};
pub use persistence::{
    FileStore, HighscoreEntry, HighscoreTable, KeyValueStore, LifeRecord, LocalPersistence,
    MemoryStore, MinigameKind, MinigameStats, StorageError,
};
pub use player::{DecisionError, EducationStage, Gender, Player, adjust_money, apply_effects};
pub use pregnancy::{PregnancyOutcome, PregnancyState};
pub use property::{Property, PropertyState, PropertyTier, property_catalog};
pub use relationships::{Child, Partner, PartnerStatus, RelationshipState};
pub use rng::RngBundle;
pub use session::{LifeSession, TimelineEntry, YearReport};
pub use stats::{Effects, PlayerStats, Stat};

/// Result of recording one minigame play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinigameResult {
    pub stats: MinigameStats,
    /// Present when the score set a new best.
    pub new_highscore: Option<HighscoreEntry>,
}

/// Main engine tying life sessions to local persistence
pub struct LifeEngine<S>
where
    S: KeyValueStore,
{
    persistence: LocalPersistence<S>,
    config: LifeConfig,
    catalog: EventCatalog,
}

impl<S> LifeEngine<S>
where
    S: KeyValueStore,
{
    /// Create an engine over `store` with the bundled event catalog.
    pub fn new(store: S, config: LifeConfig) -> Self {
        Self {
            persistence: LocalPersistence::new(store, config.archive_capacity),
            config,
            catalog: EventCatalog::default_catalog().clone(),
        }
    }

    /// Replace the event catalog, e.g. with rows synced from the admin endpoint.
    #[must_use]
    pub fn with_catalog(self, catalog: EventCatalog) -> Self {
        Self { catalog, ..self }
    }

    pub const fn config(&self) -> &LifeConfig {
        &self.config
    }

    pub const fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub const fn persistence(&self) -> &LocalPersistence<S> {
        &self.persistence
    }

    /// Begin a new life boosted by purchased legacy bonuses.
    pub fn start_life(&self, seed: u64, name: &str, gender: Gender) -> LifeSession {
        let bonuses = self.persistence.starting_bonuses();
        log::debug!("starting life {name} with seed {seed}");
        let session = LifeSession::new(seed, name, gender, self.config.clone(), &bonuses);
        self.persistence.save_game(&session);
        session
    }

    /// Advance one year and autosave.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Deceased`] once the life has ended.
    pub fn advance_year(&self, session: &mut LifeSession) -> Result<YearReport, DecisionError> {
        let report = session.advance_year(&self.catalog)?;
        self.persistence.save_game(session);
        Ok(report)
    }

    /// Save the session. Returns whether the write landed.
    pub fn save(&self, session: &LifeSession) -> bool {
        self.persistence.save_game(session)
    }

    /// The saved life, if one exists and is readable.
    pub fn resume(&self) -> Option<LifeSession> {
        self.persistence.load_game()
    }

    /// End the life: archive it, pay out legacy currency and clear the save.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Archived`] for a life that was already
    /// finished; nothing is archived or paid out again.
    pub fn finish_life(
        &self,
        session: &mut LifeSession,
        cause: Option<&str>,
    ) -> Result<LifeRecord, DecisionError> {
        let record = session.end_life(cause)?;
        self.persistence.archive_life(record.clone());
        self.persistence.grant_life_end(&record, self.config.legacy_payout_percent);
        self.persistence.clear_game();
        log::debug!(
            "life {} archived: age {} cause {}",
            record.id,
            record.age_at_death,
            record.cause_of_death
        );
        Ok(record)
    }

    /// Record a finished minigame: stats always, highscore when beaten.
    pub fn record_minigame(
        &self,
        minigame: MinigameKind,
        score: i64,
        won: bool,
        at: DateTime<Utc>,
    ) -> MinigameResult {
        MinigameResult {
            stats: self
                .persistence
                .record_minigame_play(minigame, score, won, at),
            new_highscore: self.persistence.save_highscore(minigame, score, at),
        }
    }

    /// Spend legacy currency on the next level of bonus `id`.
    ///
    /// # Errors
    ///
    /// See [`LegacyData::purchase`].
    pub fn purchase_bonus(&self, id: &str) -> Result<LegacyData, PurchaseError> {
        self.persistence.purchase_bonus(id)
    }

    pub fn legacy(&self) -> LegacyData {
        self.persistence.legacy()
    }

    pub fn archive(&self) -> Vec<LifeRecord> {
        self.persistence.archive()
    }

    pub fn highscores(&self) -> HighscoreTable {
        self.persistence.highscores()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn engine() -> LifeEngine<MemoryStore> {
        LifeEngine::new(MemoryStore::new(), LifeConfig::default())
    }

    #[test]
    fn engine_saves_and_resumes_sessions() {
        let engine = engine();
        assert!(engine.resume().is_none());
        let mut session = engine.start_life(0xABCD, "Jo", Gender::Male);
        for _ in 0..5 {
            engine.advance_year(&mut session).unwrap();
        }
        let resumed = engine.resume().expect("autosaved");
        assert_eq!(resumed.player.age, 5);
        assert_eq!(
            serde_json::to_value(&resumed).unwrap(),
            serde_json::to_value(&session).unwrap()
        );
    }

    #[test]
    fn finishing_a_life_archives_and_pays_legacy() {
        let engine = engine();
        let mut session = engine.start_life(1, "Kim", Gender::Female);
        session.player.age = 60;
        session.player.money = 12_345;
        let record = engine
            .finish_life(&mut session, Some("heart attack"))
            .unwrap();
        assert_eq!(record.cause_of_death, "heart attack");
        assert!(engine.resume().is_none());
        assert_eq!(engine.archive(), vec![record]);
        let legacy = engine.legacy();
        assert_eq!(legacy.currency, 1_234);
        assert_eq!(legacy.total_lives, 1);
        assert_eq!(legacy.highest_age, 60);
    }

    #[test]
    fn a_life_is_archived_only_once() {
        let engine = engine();
        let mut session = engine.start_life(4, "Ren", Gender::Female);
        session.player.age = 70;
        session.player.money = 300;
        let record = engine.finish_life(&mut session, None).unwrap();
        assert_eq!(engine.legacy().currency, 30);

        assert_eq!(
            engine.finish_life(&mut session, Some("rewritten")),
            Err(DecisionError::Archived)
        );
        assert_eq!(engine.archive(), vec![record]);
        let legacy = engine.legacy();
        assert_eq!(legacy.currency, 30);
        assert_eq!(legacy.total_lives, 1);
        assert_eq!(session.cause_of_death.as_deref(), Some("ended early"));
    }

    #[test]
    fn legacy_bonuses_apply_to_the_next_life() {
        let engine = engine();
        let mut session = engine.start_life(2, "Lee", Gender::Male);
        session.player.money = 1_000;
        engine.finish_life(&mut session, None).unwrap();
        assert_eq!(engine.legacy().currency, 100);
        engine.purchase_bonus("trust_fund").unwrap();
        let next = engine.start_life(3, "Lee II", Gender::Male);
        assert_eq!(next.player.money, 1_000);
        assert_eq!(engine.legacy().currency, 80);
    }

    #[test]
    fn minigames_record_stats_and_highscores() {
        let engine = engine();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let first = engine.record_minigame(MinigameKind::Reaction, 300, true, at);
        assert!(first.new_highscore.is_some());
        let second = engine.record_minigame(MinigameKind::Reaction, 120, false, at);
        assert!(second.new_highscore.is_none());
        assert_eq!(second.stats.plays, 2);
        assert_eq!(second.stats.low_score, Some(120));
        assert_eq!(engine.highscores()["reaction"].score, 300);
    }
}
