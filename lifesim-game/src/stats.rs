//! Player attributes and the additive effect structure used by every event.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{STAT_MAX, STAT_MIN};

/// Clamp a raw attribute value into the valid stat range.
#[must_use]
pub const fn clamp_stat(value: i32) -> i32 {
    if value < STAT_MIN {
        STAT_MIN
    } else if value > STAT_MAX {
        STAT_MAX
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Intelligence,
    Health,
    Fitness,
    Looks,
    Luck,
}

impl Stat {
    pub const ALL: [Self; 5] = [
        Self::Intelligence,
        Self::Health,
        Self::Fitness,
        Self::Looks,
        Self::Luck,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intelligence => "intelligence",
            Self::Health => "health",
            Self::Fitness => "fitness",
            Self::Looks => "looks",
            Self::Luck => "luck",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intelligence" => Ok(Self::Intelligence),
            "health" => Ok(Self::Health),
            "fitness" => Ok(Self::Fitness),
            "looks" => Ok(Self::Looks),
            "luck" => Ok(Self::Luck),
            _ => Err(()),
        }
    }
}

/// Five bounded attributes, each kept within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub intelligence: i32,
    pub health: i32,
    pub fitness: i32,
    pub looks: i32,
    pub luck: i32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            intelligence: 50,
            health: 100,
            fitness: 50,
            looks: 50,
            luck: 50,
        }
    }
}

impl PlayerStats {
    /// Build a stat block, clamping every attribute.
    #[must_use]
    pub const fn new(intelligence: i32, health: i32, fitness: i32, looks: i32, luck: i32) -> Self {
        Self {
            intelligence: clamp_stat(intelligence),
            health: clamp_stat(health),
            fitness: clamp_stat(fitness),
            looks: clamp_stat(looks),
            luck: clamp_stat(luck),
        }
    }

    #[must_use]
    pub const fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Intelligence => self.intelligence,
            Stat::Health => self.health,
            Stat::Fitness => self.fitness,
            Stat::Looks => self.looks,
            Stat::Luck => self.luck,
        }
    }

    /// Return a copy with one attribute replaced (and clamped).
    #[must_use]
    pub const fn with(mut self, stat: Stat, value: i32) -> Self {
        let value = clamp_stat(value);
        match stat {
            Stat::Intelligence => self.intelligence = value,
            Stat::Health => self.health = value,
            Stat::Fitness => self.fitness = value,
            Stat::Looks => self.looks = value,
            Stat::Luck => self.luck = value,
        }
        self
    }

    /// Add the stat deltas of `effects`, re-clamping each attribute.
    #[must_use]
    pub fn apply(self, effects: &Effects) -> Self {
        Stat::ALL.iter().fold(self, |acc, &stat| {
            acc.with(stat, acc.get(stat).saturating_add(effects.delta(stat)))
        })
    }
}

/// Additive deltas produced by events, decisions and yearly upkeep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Effects {
    #[serde(default)]
    pub intelligence: i32,
    #[serde(default)]
    pub health: i32,
    #[serde(default)]
    pub fitness: i32,
    #[serde(default)]
    pub looks: i32,
    #[serde(default)]
    pub luck: i32,
    #[serde(default)]
    pub money: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
}

impl Effects {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Single-stat delta.
    #[must_use]
    pub fn stat(stat: Stat, delta: i32) -> Self {
        Self::default().with_stat(stat, delta)
    }

    /// Money-only delta.
    #[must_use]
    pub fn money(delta: i64) -> Self {
        Self {
            money: delta,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn delta(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Intelligence => self.intelligence,
            Stat::Health => self.health,
            Stat::Fitness => self.fitness,
            Stat::Looks => self.looks,
            Stat::Luck => self.luck,
        }
    }

    /// Add `delta` to the given stat's existing delta.
    #[must_use]
    pub fn with_stat(mut self, stat: Stat, delta: i32) -> Self {
        let slot = match stat {
            Stat::Intelligence => &mut self.intelligence,
            Stat::Health => &mut self.health,
            Stat::Fitness => &mut self.fitness,
            Stat::Looks => &mut self.looks,
            Stat::Luck => &mut self.luck,
        };
        *slot = slot.saturating_add(delta);
        self
    }

    #[must_use]
    pub fn with_money(mut self, delta: i64) -> Self {
        self.money = self.money.saturating_add(delta);
        self
    }

    #[must_use]
    pub fn with_log(mut self, key: impl Into<String>) -> Self {
        self.log = Some(key.into());
        self
    }

    /// Sum two effect sets. The log of `other` wins when both carry one.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        let mut merged = Stat::ALL.iter().fold(self.clone(), |acc, &stat| {
            acc.with_stat(stat, other.delta(stat))
        });
        merged.money = merged.money.saturating_add(other.money);
        if other.log.is_some() {
            merged.log.clone_from(&other.log);
        }
        merged
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.money == 0 && Stat::ALL.iter().all(|&stat| self.delta(stat) == 0)
    }
}
