//! Local persistence: saves, archive, highscores, minigame stats and legacy.
//!
//! Every document lives under its own key in a [`KeyValueStore`]. Storage
//! failures never reach the caller: reads fall back to the empty/default
//! document and writes become no-ops, with a `log::warn!` either way.
pub mod archive;
pub mod save;
pub mod scores;
pub mod store;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::legacy::{LegacyData, PurchaseError, StartingBonuses};
use crate::session::LifeSession;

pub use archive::{LifeRecord, push_record};
pub use save::SAVE_VERSION;
pub use scores::{
    HighscoreEntry, HighscoreTable, MinigameKind, MinigameStats, MinigameStatsMap,
    record_highscore,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError};

pub const SAVE_KEY: &str = "lifesim.save";
pub const ARCHIVE_KEY: &str = "lifesim.archive";
pub const HIGHSCORES_KEY: &str = "lifesim.highscores";
pub const MINIGAME_STATS_KEY: &str = "lifesim.minigame-stats";
pub const LEGACY_KEY: &str = "lifesim.legacy";

/// Typed, failure-swallowing view over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct LocalPersistence<S> {
    store: S,
    archive_capacity: usize,
}

impl<S: KeyValueStore> LocalPersistence<S> {
    pub const fn new(store: S, archive_capacity: usize) -> Self {
        Self {
            store,
            archive_capacity,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Parsed document under `key`, or `None` when absent or unreadable.
    pub fn read_document<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                log::warn!("failed to read {key}: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("discarding corrupt {key}: {}", StorageError::from(err));
                None
            }
        }
    }

    /// Serialize and store `value`. Returns whether the write landed.
    pub fn write_document<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(key, &json));
        if let Err(err) = &result {
            log::warn!("failed to write {key}: {err}");
        }
        result.is_ok()
    }

    pub fn remove_document(&self, key: &str) -> bool {
        let result = self.store.remove(key);
        if let Err(err) = &result {
            log::warn!("failed to remove {key}: {err}");
        }
        result.is_ok()
    }

    pub fn save_game(&self, session: &LifeSession) -> bool {
        self.write_document(SAVE_KEY, &save::SaveDocumentRef::new(session))
    }

    pub fn load_game(&self) -> Option<LifeSession> {
        self.read_document::<save::SaveDocument>(SAVE_KEY)?
            .into_current()
    }

    pub fn clear_game(&self) -> bool {
        self.remove_document(SAVE_KEY)
    }

    pub fn archive(&self) -> Vec<LifeRecord> {
        self.read_document(ARCHIVE_KEY).unwrap_or_default()
    }

    /// Insert a finished life at the head of the archive.
    pub fn archive_life(&self, record: LifeRecord) -> Vec<LifeRecord> {
        let archive = push_record(&self.archive(), record, self.archive_capacity);
        self.write_document(ARCHIVE_KEY, &archive);
        archive
    }

    pub fn clear_archive(&self) -> bool {
        self.remove_document(ARCHIVE_KEY)
    }

    pub fn highscores(&self) -> HighscoreTable {
        self.read_document(HIGHSCORES_KEY).unwrap_or_default()
    }

    /// Store `score` if it beats the current best for `minigame`.
    pub fn save_highscore(
        &self,
        minigame: MinigameKind,
        score: i64,
        at: DateTime<Utc>,
    ) -> Option<HighscoreEntry> {
        let (table, entry) = record_highscore(&self.highscores(), minigame, score, at);
        if entry.is_some() {
            self.write_document(HIGHSCORES_KEY, &table);
        }
        entry
    }

    pub fn clear_highscores(&self) -> bool {
        self.remove_document(HIGHSCORES_KEY)
    }

    pub fn minigame_stats(&self) -> MinigameStatsMap {
        self.read_document(MINIGAME_STATS_KEY).unwrap_or_default()
    }

    /// Fold one play into the stats for `minigame`.
    pub fn record_minigame_play(
        &self,
        minigame: MinigameKind,
        score: i64,
        won: bool,
        at: DateTime<Utc>,
    ) -> MinigameStats {
        let mut all = self.minigame_stats();
        let updated = all
            .get(minigame.as_str())
            .cloned()
            .unwrap_or_default()
            .record(score, won, at);
        all.insert(minigame.as_str().to_string(), updated.clone());
        self.write_document(MINIGAME_STATS_KEY, &all);
        updated
    }

    pub fn clear_minigame_stats(&self) -> bool {
        self.remove_document(MINIGAME_STATS_KEY)
    }

    /// Legacy progress merged with the current bonus catalog.
    pub fn legacy(&self) -> LegacyData {
        self.read_document::<LegacyData>(LEGACY_KEY)
            .map(|data| data.merged_with_catalog())
            .unwrap_or_default()
    }

    pub fn save_legacy(&self, data: &LegacyData) -> bool {
        self.write_document(LEGACY_KEY, data)
    }

    /// Pay out a finished life into legacy progress.
    pub fn grant_life_end(&self, record: &LifeRecord, payout_percent: u32) -> LegacyData {
        let data = self.legacy().record_life(record, payout_percent);
        self.save_legacy(&data);
        data
    }

    /// Buy the next level of a legacy bonus and persist the result.
    ///
    /// # Errors
    ///
    /// Returns the refusal from [`LegacyData::purchase`]; nothing is written.
    pub fn purchase_bonus(&self, id: &str) -> Result<LegacyData, PurchaseError> {
        let data = self.legacy().purchase(id)?;
        self.save_legacy(&data);
        Ok(data)
    }

    pub fn starting_bonuses(&self) -> StartingBonuses {
        self.legacy().starting_bonuses()
    }

    pub fn clear_legacy(&self) -> bool {
        self.remove_document(LEGACY_KEY)
    }
}
