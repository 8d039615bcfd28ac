//! The yearly tick: decay, schooling, income and prison time.
//!
//! [`age_one_year`] is the only place a player's age changes. Every stat and
//! money change it produces is collected into one [`Effects`] and applied
//! through [`apply_effects`], after the age has already advanced, so decay
//! thresholds and the money floor both see the new age.
use rand::Rng;

use crate::constants::{
    ELEMENTARY_AGE, FITNESS_DECAY_FLOOR, FITNESS_DECAY_MAX, HEALTH_DECAY_AGE, HEALTH_DECAY_MAX,
    HIGHSCHOOL_AGE, LOOKS_DECAY_AGE, LOOKS_DECAY_AMOUNT, LOOKS_DECAY_CHANCE, MIDDLESCHOOL_AGE,
    NEWSPAPER_MIN_AGE, NEWSPAPER_STIPEND, PRISON_HEALTH_PENALTY, PRISON_LUCK_PENALTY,
    SCHOOL_END_AGE, SCHOOL_START_AGE, SENIOR_DECAY_AGE, SENIOR_HEALTH_DECAY_MAX,
};
use crate::player::{EducationStage, Player, apply_effects};
use crate::stats::{Effects, Stat};

/// Everything a yearly tick produced besides the new player.
#[derive(Debug, Clone, PartialEq)]
pub struct AgingOutcome {
    pub player: Player,
    /// Stipend plus salary credited this year.
    pub income: i64,
    /// The sentence ended this year.
    pub released: bool,
    /// Timeline keys for notable changes.
    pub notes: Vec<&'static str>,
}

/// Passive stat decay for a player who has just turned `age`.
pub fn passive_decay<R: Rng + ?Sized>(player: &Player, age: u32, rng: &mut R) -> Effects {
    let mut effects = Effects::none();
    if age > HEALTH_DECAY_AGE {
        effects = effects.with_stat(Stat::Health, -rng.gen_range(0..=HEALTH_DECAY_MAX));
    }
    if age > SENIOR_DECAY_AGE {
        effects = effects.with_stat(Stat::Health, -rng.gen_range(0..=SENIOR_HEALTH_DECAY_MAX));
    }
    if player.stats.fitness > FITNESS_DECAY_FLOOR {
        effects = effects.with_stat(Stat::Fitness, -rng.gen_range(0..=FITNESS_DECAY_MAX));
    }
    if age > LOOKS_DECAY_AGE && rng.gen_bool(LOOKS_DECAY_CHANCE) {
        effects = effects.with_stat(Stat::Looks, -LOOKS_DECAY_AMOUNT);
    }
    if player.incarcerated {
        effects = effects
            .with_stat(Stat::Health, -PRISON_HEALTH_PENALTY)
            .with_stat(Stat::Luck, -PRISON_LUCK_PENALTY);
    }
    effects
}

/// Compulsory stage reached exactly at `age`, if any.
#[must_use]
pub const fn stage_for_age(age: u32) -> Option<EducationStage> {
    match age {
        ELEMENTARY_AGE => Some(EducationStage::Elementary),
        MIDDLESCHOOL_AGE => Some(EducationStage::Middleschool),
        HIGHSCHOOL_AGE => Some(EducationStage::Highschool),
        _ => None,
    }
}

/// Whether a player of `age` with `extra_years` granted is enrolled.
#[must_use]
pub const fn in_school_window(age: u32, extra_years: u32) -> bool {
    age >= SCHOOL_START_AGE && age <= SCHOOL_END_AGE.saturating_add(extra_years)
}

/// Yearly earnings for the player at `age`.
#[must_use]
pub fn yearly_income(player: &Player, age: u32) -> i64 {
    if player.incarcerated {
        return 0;
    }
    let stipend = if player.newspaper_job && age >= NEWSPAPER_MIN_AGE {
        NEWSPAPER_STIPEND
    } else {
        0
    };
    let salary = player.job.as_ref().map_or(0, |job| job.salary);
    stipend.saturating_add(salary)
}

/// Advance `player` by exactly one year.
pub fn age_one_year<R: Rng + ?Sized>(player: &Player, rng: &mut R) -> AgingOutcome {
    let age = player.age.saturating_add(1);
    if !player.alive {
        return AgingOutcome {
            player: Player {
                age,
                ..player.clone()
            },
            income: 0,
            released: false,
            notes: Vec::new(),
        };
    }

    let mut notes = Vec::new();
    let mut next = Player {
        age,
        ..player.clone()
    };

    if let Some(stage) = stage_for_age(age) {
        next.education = stage;
        notes.push(match stage {
            EducationStage::Elementary => "education.elementary",
            EducationStage::Middleschool => "education.middleschool",
            _ => "education.highschool",
        });
    }
    let was_in_school = next.in_school;
    next.in_school = in_school_window(age, next.extra_school_years);
    if next.in_school {
        next.school_years = next.school_years.saturating_add(1);
    } else if was_in_school {
        notes.push("education.graduated");
    }

    let income = yearly_income(player, age);
    next.lifetime_earnings = next.lifetime_earnings.saturating_add(income);

    let mut released = false;
    if player.incarcerated {
        next.prison_years_left = next.prison_years_left.saturating_sub(1);
        if next.prison_years_left == 0 {
            next.incarcerated = false;
            released = true;
            notes.push("prison.released");
        }
    }

    let effects = passive_decay(player, age, rng).with_money(income);
    let next = apply_effects(&next, &effects);
    if !next.alive {
        notes.push("health.failed");
    }
    log::debug!(
        "player {} aged to {age}: income={income} health={}",
        next.id,
        next.stats.health
    );
    AgingOutcome {
        player: next,
        income,
        released,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STAT_MAX;
    use crate::jobs::find_job;
    use crate::legacy::StartingBonuses;
    use crate::player::Gender;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn baby(seed: u64) -> Player {
        let mut rng = SmallRng::seed_from_u64(seed);
        Player::new_random("Gus", Gender::Male, 2000, &StartingBonuses::default(), &mut rng)
    }

    fn age_to(mut player: Player, years: u32, rng: &mut SmallRng) -> Player {
        for _ in 0..years {
            player = age_one_year(&player, rng).player;
        }
        player
    }

    #[test]
    fn age_advances_by_exactly_one_per_tick() {
        let mut rng = SmallRng::seed_from_u64(1);
        let start = baby(1);
        let once = age_one_year(&start, &mut rng).player;
        assert_eq!(once.age, 1);
        let later = age_to(start, 37, &mut rng);
        assert_eq!(later.age, 37);
    }

    #[test]
    fn dead_players_only_age() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ghost = baby(2);
        ghost.alive = false;
        ghost.stats.health = 0;
        ghost.newspaper_job = true;
        ghost.age = 50;
        let outcome = age_one_year(&ghost, &mut rng);
        assert_eq!(outcome.player.age, 51);
        assert_eq!(outcome.income, 0);
        assert_eq!(outcome.player.stats, ghost.stats);
        assert!(outcome.notes.is_empty());
    }

    #[test]
    fn education_follows_age_thresholds() {
        let mut rng = SmallRng::seed_from_u64(3);
        let player = age_to(baby(3), 6, &mut rng);
        assert_eq!(player.education, EducationStage::Elementary);
        assert!(player.in_school);
        let player = age_to(player, 4, &mut rng);
        assert_eq!(player.education, EducationStage::Middleschool);
        let player = age_to(player, 3, &mut rng);
        assert_eq!(player.education, EducationStage::Highschool);
        let player = age_to(player, 3, &mut rng);
        assert_eq!(player.age, 16);
        assert!(player.in_school);
        assert_eq!(player.school_years, 11);
        let player = age_to(player, 1, &mut rng);
        assert!(!player.in_school);
    }

    #[test]
    fn extra_years_extend_enrollment() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut player = age_to(baby(4), 16, &mut rng);
        player = player
            .choose_further_education(EducationStage::Apprenticeship)
            .unwrap();
        let player = age_to(player, 3, &mut rng);
        assert_eq!(player.age, 19);
        assert!(player.in_school);
        let player = age_to(player, 1, &mut rng);
        assert!(!player.in_school);
        assert_eq!(player.education, EducationStage::Apprenticeship);
    }

    #[test]
    fn stipend_and_salary_accrue() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut player = baby(5);
        player.age = 13;
        player.money = 0;
        player.newspaper_job = true;
        let outcome = age_one_year(&player, &mut rng);
        assert_eq!(outcome.income, NEWSPAPER_STIPEND);
        assert_eq!(outcome.player.money, NEWSPAPER_STIPEND);

        player.age = 30;
        player.newspaper_job = false;
        player.job = find_job("retail").cloned();
        let salary = player.job.as_ref().map_or(0, |job| job.salary);
        let outcome = age_one_year(&player, &mut rng);
        assert_eq!(outcome.income, salary);
        assert_eq!(outcome.player.lifetime_earnings, salary);
    }

    #[test]
    fn prison_blocks_income_and_counts_down() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut inmate = baby(6);
        inmate.age = 30;
        inmate.job = find_job("retail").cloned();
        inmate.incarcerated = true;
        inmate.prison_years_left = 2;
        inmate.newspaper_job = true;
        let first = age_one_year(&inmate, &mut rng);
        assert_eq!(first.income, 0);
        assert_eq!(first.player.lifetime_earnings, inmate.lifetime_earnings);
        assert!(first.player.incarcerated);
        assert_eq!(first.player.prison_years_left, 1);
        assert!(!first.released);
        let second = age_one_year(&first.player, &mut rng);
        assert!(!second.player.incarcerated);
        assert!(second.released);
        assert!(second.notes.contains(&"prison.released"));
    }

    #[test]
    fn prison_costs_health_and_luck() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut inmate = baby(7);
        inmate.age = 20;
        inmate.stats.health = 80;
        inmate.stats.luck = 40;
        inmate.incarcerated = true;
        inmate.prison_years_left = 5;
        let next = age_one_year(&inmate, &mut rng).player;
        assert_eq!(next.stats.health, 80 - PRISON_HEALTH_PENALTY);
        assert_eq!(next.stats.luck, 40 - PRISON_LUCK_PENALTY);
    }

    #[test]
    fn decay_keeps_stats_in_range_until_death() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut player = baby(8);
        for _ in 0..200 {
            player = age_one_year(&player, &mut rng).player;
            for stat in Stat::ALL {
                assert!((0..=STAT_MAX).contains(&player.stats.get(stat)));
            }
        }
        assert_eq!(player.age, 200);
        assert!(!player.alive, "health decays to zero eventually");
    }

    #[test]
    fn young_players_do_not_lose_health() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut player = baby(9);
        player.stats.health = 70;
        let grown = age_to(player, HEALTH_DECAY_AGE, &mut rng);
        assert_eq!(grown.stats.health, 70);
    }
}
