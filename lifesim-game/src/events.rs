//! Narrative life events and their choices.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::player::{DecisionError, Player, apply_effects};
use crate::stats::Effects;

const DEFAULT_EVENT_DATA: &str = include_str!("../data/events.json");

/// One option offered by a [`LifeEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChoice {
    pub label: String,
    #[serde(default)]
    pub effects: Effects,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeEvent {
    pub id: String,
    pub title: String,
    #[serde(alias = "description")]
    pub text: String,
    #[serde(default)]
    pub min_age: u32,
    #[serde(default = "default_max_age")]
    pub max_age: u32,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default = "default_active", alias = "is_active")]
    pub active: bool,
    #[serde(default)]
    pub choices: Vec<EventChoice>,
}

const fn default_max_age() -> u32 {
    u32::MAX
}

const fn default_weight() -> u32 {
    1
}

const fn default_active() -> bool {
    true
}

impl LifeEvent {
    /// Active, weighted and within its age window.
    #[must_use]
    pub fn is_eligible(&self, age: u32) -> bool {
        self.active && self.weight > 0 && (self.min_age..=self.max_age).contains(&age)
    }
}

/// Event content, either bundled or synced from the admin catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EventCatalog {
    #[serde(default)]
    pub events: Vec<LifeEvent>,
}

impl EventCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_EVENT_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<EventCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into an event catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse the bare row array returned by the admin `list` action.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are not valid event JSON.
    pub fn from_admin_rows(json: &str) -> Result<Self, serde_json::Error> {
        let events: Vec<LifeEvent> = serde_json::from_str(json)?;
        Ok(Self { events })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LifeEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Insert a new event or replace the one with the same id.
    #[must_use]
    pub fn upsert(&self, event: LifeEvent) -> Self {
        let mut events = self.events.clone();
        match events.iter_mut().find(|existing| existing.id == event.id) {
            Some(existing) => *existing = event,
            None => events.push(event),
        }
        Self { events }
    }

    #[must_use]
    pub fn remove(&self, id: &str) -> Self {
        Self {
            events: self
                .events
                .iter()
                .filter(|event| event.id != id)
                .cloned()
                .collect(),
        }
    }

    /// Flip the active flag of `id`. Unknown ids leave the catalog unchanged.
    #[must_use]
    pub fn toggle_active(&self, id: &str) -> Self {
        let mut next = self.clone();
        if let Some(event) = next.events.iter_mut().find(|event| event.id == id) {
            event.active = !event.active;
        }
        next
    }

    pub fn eligible(&self, age: u32) -> impl Iterator<Item = &LifeEvent> {
        self.events.iter().filter(move |event| event.is_eligible(age))
    }

    /// Weighted draw among the events eligible at `age`.
    pub fn pick_event<R: Rng + ?Sized>(&self, age: u32, rng: &mut R) -> Option<&LifeEvent> {
        let candidates: Vec<&LifeEvent> = self.eligible(age).collect();
        let total: u64 = candidates.iter().map(|event| u64::from(event.weight)).sum();
        if total == 0 {
            return None;
        }
        let roll = rng.gen_range(0..total);
        let mut current = 0;
        for event in candidates.iter().copied() {
            current += u64::from(event.weight);
            if roll < current {
                return Some(event);
            }
        }
        candidates.first().copied()
    }
}

/// Apply choice `index` of `event` to the player.
///
/// # Errors
///
/// Fails for an out-of-range choice or a dead player.
pub fn resolve_choice(
    player: &Player,
    event: &LifeEvent,
    index: usize,
) -> Result<(Player, EventChoice), DecisionError> {
    if !player.alive {
        return Err(DecisionError::Deceased);
    }
    let choice = event
        .choices
        .get(index)
        .ok_or_else(|| DecisionError::Unknown {
            kind: "choice",
            id: format!("{}#{index}", event.id),
        })?;
    log::debug!("event {} resolved with choice {index}", event.id);
    Ok((apply_effects(player, &choice.effects), choice.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::StartingBonuses;
    use crate::player::Gender;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashMap;

    fn event(id: &str, min_age: u32, max_age: u32, weight: u32) -> LifeEvent {
        LifeEvent {
            id: id.into(),
            title: id.into(),
            text: String::new(),
            min_age,
            max_age,
            weight,
            active: true,
            choices: vec![EventChoice {
                label: "ok".into(),
                effects: Effects::money(100),
            }],
        }
    }

    #[test]
    fn bundled_catalog_parses() {
        let catalog = EventCatalog::default_catalog();
        assert!(catalog.events.len() >= 10);
        assert!(catalog.events.iter().all(|event| !event.choices.is_empty()));
        assert!(catalog.get("retired_draft").is_some_and(|e| !e.active));
    }

    #[test]
    fn admin_rows_accept_table_column_names() {
        let rows = r#"[
            {"id": "a", "title": "A", "description": "Row A", "min_age": 3, "max_age": 9,
             "weight": 2, "is_active": false, "choices": []},
            {"id": "b", "title": "B", "text": "Row B"}
        ]"#;
        let catalog = EventCatalog::from_admin_rows(rows).unwrap();
        let a = catalog.get("a").unwrap();
        assert_eq!(a.text, "Row A");
        assert!(!a.active);
        let b = catalog.get("b").unwrap();
        assert!(b.active);
        assert_eq!(b.weight, 1);
        assert!(b.is_eligible(99));
    }

    #[test]
    fn pick_respects_age_window_and_active_flag() {
        let catalog = EventCatalog {
            events: vec![event("kid", 0, 12, 5), event("adult", 18, 99, 5)],
        }
        .upsert(LifeEvent {
            active: false,
            ..event("hidden", 0, 99, 1000)
        });
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(catalog.pick_event(8, &mut rng).unwrap().id, "kid");
            assert_eq!(catalog.pick_event(30, &mut rng).unwrap().id, "adult");
        }
        assert!(catalog.pick_event(15, &mut rng).is_none());
    }

    #[test]
    fn pick_follows_weights() {
        let catalog = EventCatalog {
            events: vec![event("common", 0, 99, 9), event("rare", 0, 99, 1)],
        };
        let mut rng = ChaCha20Rng::seed_from_u64(17);
        let mut counts: HashMap<String, u32> = HashMap::new();
        for _ in 0..5_000 {
            let picked = catalog.pick_event(20, &mut rng).unwrap();
            *counts.entry(picked.id.clone()).or_default() += 1;
        }
        let rare = f64::from(counts["rare"]) / 5_000.0;
        assert!((rare - 0.1).abs() < 0.02, "rare rate {rare:.3}");
    }

    #[test]
    fn admin_edits_update_catalog() {
        let catalog = EventCatalog {
            events: vec![event("a", 0, 10, 1)],
        };
        let toggled = catalog.toggle_active("a");
        assert!(!toggled.get("a").unwrap().active);
        let replaced = toggled.upsert(event("a", 5, 6, 3));
        assert_eq!(replaced.events.len(), 1);
        assert_eq!(replaced.get("a").unwrap().weight, 3);
        assert!(replaced.remove("a").events.is_empty());
        assert_eq!(catalog.toggle_active("missing"), catalog);
    }

    #[test]
    fn resolve_choice_applies_effects() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut player =
            Player::new_random("Hal", Gender::Male, 1999, &StartingBonuses::default(), &mut rng);
        player.age = 20;
        let lifeevent = event("bonus", 0, 99, 1);
        let (next, choice) = resolve_choice(&player, &lifeevent, 0).unwrap();
        assert_eq!(next.money, player.money + 100);
        assert_eq!(choice.label, "ok");
        assert!(matches!(
            resolve_choice(&player, &lifeevent, 3),
            Err(DecisionError::Unknown { .. })
        ));
    }
}
