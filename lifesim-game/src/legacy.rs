//! Cross-life meta-progression.
//!
//! Finishing a life pays out legacy currency which buys permanent starting
//! bonuses for every later life. Bonus cost doubles with each level.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::numbers::{floor_f64_to_i64, i64_to_f64};
use crate::persistence::LifeRecord;
use crate::stats::{Effects, Stat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BonusEffect {
    /// Added to one starting stat per level.
    Stat { stat: Stat, per_level: i32 },
    /// Added to starting money per level.
    Money { per_level: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyBonus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_cost: u64,
    pub max_level: u32,
    #[serde(default)]
    pub level: u32,
    pub effect: BonusEffect,
}

impl LegacyBonus {
    fn entry(
        id: &str,
        name: &str,
        description: &str,
        base_cost: u64,
        max_level: u32,
        effect: BonusEffect,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            base_cost,
            max_level,
            level: 0,
            effect,
        }
    }

    /// Price of the next level: `base_cost × 2^level`.
    #[must_use]
    pub fn cost_at(&self, level: u32) -> u64 {
        2u64.checked_pow(level)
            .and_then(|factor| self.base_cost.checked_mul(factor))
            .unwrap_or(u64::MAX)
    }

    #[must_use]
    pub fn next_cost(&self) -> u64 {
        self.cost_at(self.level)
    }

    #[must_use]
    pub const fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }

    fn level_i64(&self) -> i64 {
        i64::from(self.level)
    }
}

/// The bonuses every legacy starts with, all at level 0.
#[must_use]
pub fn bonus_catalog() -> Vec<LegacyBonus> {
    let stat = |stat, per_level| BonusEffect::Stat { stat, per_level };
    vec![
        LegacyBonus::entry(
            "sharp_mind",
            "Sharp Mind",
            "Start each life a little smarter.",
            10,
            5,
            stat(Stat::Intelligence, 5),
        ),
        LegacyBonus::entry(
            "strong_genes",
            "Strong Genes",
            "Start each life healthier.",
            10,
            5,
            stat(Stat::Health, 5),
        ),
        LegacyBonus::entry(
            "athletic",
            "Athletic",
            "Start each life fitter.",
            10,
            5,
            stat(Stat::Fitness, 5),
        ),
        LegacyBonus::entry(
            "good_looks",
            "Good Looks",
            "Start each life better looking.",
            10,
            5,
            stat(Stat::Looks, 5),
        ),
        LegacyBonus::entry(
            "lucky_star",
            "Lucky Star",
            "Start each life luckier.",
            15,
            5,
            stat(Stat::Luck, 5),
        ),
        LegacyBonus::entry(
            "trust_fund",
            "Trust Fund",
            "Start each life with money in the bank.",
            20,
            5,
            BonusEffect::Money { per_level: 1_000 },
        ),
    ]
}

/// Summed effect of every purchased bonus level, applied at player creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StartingBonuses {
    pub stats: Effects,
    pub money: i64,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("unknown legacy bonus `{0}`")]
    UnknownBonus(String),
    #[error("`{id}` is already at max level {max_level}")]
    MaxLevel { id: String, max_level: u32 },
    #[error("need {cost} legacy coins, have {available}")]
    InsufficientCurrency { cost: u64, available: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyData {
    #[serde(default)]
    pub currency: u64,
    #[serde(default)]
    pub total_lives: u32,
    #[serde(default)]
    pub highest_age: u32,
    #[serde(default)]
    pub total_earnings: i64,
    #[serde(default = "bonus_catalog")]
    pub bonuses: Vec<LegacyBonus>,
}

impl Default for LegacyData {
    fn default() -> Self {
        Self {
            currency: 0,
            total_lives: 0,
            highest_age: 0,
            total_earnings: 0,
            bonuses: bonus_catalog(),
        }
    }
}

/// Currency paid for a finished life: 10% of final money, floored. Debts pay nothing.
#[must_use]
pub fn life_payout(final_money: i64, payout_percent: u32) -> u64 {
    let payout = i64_to_f64(final_money.max(0)) * f64::from(payout_percent) / 100.0;
    u64::try_from(floor_f64_to_i64(payout)).unwrap_or(0)
}

impl LegacyData {
    /// Bring saved data up to date with the current catalog.
    ///
    /// Definitions come from the catalog, levels from the save (clamped to the
    /// catalog cap). Saved bonuses missing from the catalog are kept.
    #[must_use]
    pub fn merged_with_catalog(&self) -> Self {
        let mut bonuses: Vec<LegacyBonus> = bonus_catalog()
            .into_iter()
            .map(|mut bonus| {
                if let Some(saved) = self.bonuses.iter().find(|b| b.id == bonus.id) {
                    bonus.level = saved.level.min(bonus.max_level);
                }
                bonus
            })
            .collect();
        let retired = self
            .bonuses
            .iter()
            .filter(|saved| !bonuses.iter().any(|b| b.id == saved.id))
            .cloned()
            .collect::<Vec<_>>();
        bonuses.extend(retired);
        Self {
            bonuses,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn bonus(&self, id: &str) -> Option<&LegacyBonus> {
        self.bonuses.iter().find(|b| b.id == id)
    }

    /// Record a finished life.
    #[must_use]
    pub fn record_life(&self, record: &LifeRecord, payout_percent: u32) -> Self {
        Self {
            currency: self
                .currency
                .saturating_add(life_payout(record.final_money, payout_percent)),
            total_lives: self.total_lives.saturating_add(1),
            highest_age: self.highest_age.max(record.age_at_death),
            total_earnings: self
                .total_earnings
                .saturating_add(record.lifetime_earnings.max(0)),
            ..self.clone()
        }
    }

    /// Buy the next level of bonus `id`, deducting its cost.
    ///
    /// # Errors
    ///
    /// Fails without changing anything when the bonus is unknown, maxed, or
    /// unaffordable.
    pub fn purchase(&self, id: &str) -> Result<Self, PurchaseError> {
        let index = self
            .bonuses
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| PurchaseError::UnknownBonus(id.to_string()))?;
        let bonus = &self.bonuses[index];
        if bonus.is_maxed() {
            return Err(PurchaseError::MaxLevel {
                id: bonus.id.clone(),
                max_level: bonus.max_level,
            });
        }
        let cost = bonus.next_cost();
        if self.currency < cost {
            return Err(PurchaseError::InsufficientCurrency {
                cost,
                available: self.currency,
            });
        }
        let mut next = self.clone();
        next.currency -= cost;
        next.bonuses[index].level += 1;
        log::debug!("legacy bonus {id} raised to level {}", next.bonuses[index].level);
        Ok(next)
    }

    /// Sum of every bonus effect scaled by its current level.
    #[must_use]
    pub fn starting_bonuses(&self) -> StartingBonuses {
        self.bonuses
            .iter()
            .filter(|b| b.level > 0)
            .fold(StartingBonuses::default(), |mut acc, bonus| {
                match bonus.effect {
                    BonusEffect::Stat { stat, per_level } => {
                        let levels = i32::try_from(bonus.level).unwrap_or(i32::MAX);
                        acc.stats = acc
                            .stats
                            .with_stat(stat, per_level.saturating_mul(levels));
                    }
                    BonusEffect::Money { per_level } => {
                        acc.money = acc
                            .money
                            .saturating_add(per_level.saturating_mul(bonus.level_i64()));
                    }
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::archive::sample_record;

    #[test]
    fn cost_doubles_per_level() {
        let bonus = bonus_catalog().remove(0);
        for level in 0..5 {
            assert_eq!(bonus.cost_at(level), bonus.base_cost * 2u64.pow(level));
        }
        assert_eq!(bonus.cost_at(200), u64::MAX);
    }

    #[test]
    fn purchase_deducts_and_levels() {
        let data = LegacyData {
            currency: 30,
            ..LegacyData::default()
        };
        let once = data.purchase("sharp_mind").unwrap();
        assert_eq!(once.currency, 20);
        assert_eq!(once.bonus("sharp_mind").unwrap().level, 1);
        let twice = once.purchase("sharp_mind").unwrap();
        assert_eq!(twice.currency, 0);
        assert_eq!(twice.bonus("sharp_mind").unwrap().level, 2);
        assert_eq!(
            twice.purchase("sharp_mind"),
            Err(PurchaseError::InsufficientCurrency {
                cost: 40,
                available: 0
            })
        );
    }

    #[test]
    fn purchase_rejects_maxed_and_unknown() {
        let mut data = LegacyData {
            currency: u64::MAX / 2,
            ..LegacyData::default()
        };
        for bonus in &mut data.bonuses {
            bonus.level = bonus.max_level;
        }
        let before = data.clone();
        assert!(matches!(
            data.purchase("trust_fund"),
            Err(PurchaseError::MaxLevel { .. })
        ));
        assert_eq!(
            data.purchase("time_travel"),
            Err(PurchaseError::UnknownBonus("time_travel".into()))
        );
        assert_eq!(data, before);
    }

    #[test]
    fn record_life_pays_ten_percent() {
        let mut record = sample_record("Ada");
        record.final_money = 12_345;
        record.age_at_death = 81;
        let data = LegacyData::default().record_life(&record, 10);
        assert_eq!(data.currency, 1_234);
        assert_eq!(data.total_lives, 1);
        assert_eq!(data.highest_age, 81);
        assert_eq!(data.total_earnings, 250_000);

        record.final_money = -5_000;
        record.age_at_death = 40;
        let broke = data.record_life(&record, 10);
        assert_eq!(broke.currency, 1_234);
        assert_eq!(broke.total_lives, 2);
        assert_eq!(broke.highest_age, 81);
    }

    #[test]
    fn spent_earnings_still_count_toward_totals() {
        let mut record = sample_record("Spender");
        record.final_money = 0;
        record.lifetime_earnings = 900_000;
        let data = LegacyData::default().record_life(&record, 10);
        assert_eq!(data.currency, 0);
        assert_eq!(data.total_earnings, 900_000);
    }

    #[test]
    fn starting_bonuses_scale_with_level() {
        let mut data = LegacyData::default();
        for bonus in &mut data.bonuses {
            match bonus.id.as_str() {
                "sharp_mind" => bonus.level = 3,
                "trust_fund" => bonus.level = 2,
                _ => {}
            }
        }
        let bonuses = data.starting_bonuses();
        assert_eq!(bonuses.stats.intelligence, 15);
        assert_eq!(bonuses.stats.health, 0);
        assert_eq!(bonuses.money, 2_000);
    }

    #[test]
    fn merge_keeps_progress_and_adds_new_bonuses() {
        let saved = r#"{
            "currency": 7,
            "total_lives": 3,
            "bonuses": [
                {"id": "sharp_mind", "name": "Old", "description": "", "base_cost": 1,
                 "max_level": 99, "level": 9,
                 "effect": {"kind": "stat", "stat": "intelligence", "per_level": 1}},
                {"id": "retired_bonus", "name": "Gone", "description": "", "base_cost": 5,
                 "max_level": 1, "level": 1, "effect": {"kind": "money", "per_level": 10}}
            ]
        }"#;
        let data: LegacyData = serde_json::from_str(saved).unwrap();
        let merged = data.merged_with_catalog();
        assert_eq!(merged.currency, 7);
        assert_eq!(merged.total_lives, 3);
        let sharp = merged.bonus("sharp_mind").unwrap();
        assert_eq!(sharp.level, sharp.max_level);
        assert_eq!(sharp.base_cost, 10);
        assert!(merged.bonus("trust_fund").is_some());
        assert_eq!(merged.bonus("retired_bonus").unwrap().level, 1);
    }
}
