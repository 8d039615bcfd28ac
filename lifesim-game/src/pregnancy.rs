//! Conception, gestation and birth.
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{
    PREGNANCY_FEMALE_MAX_AGE, PREGNANCY_MALE_MAX_AGE, PREGNANCY_MIN_AGE, PREGNANCY_MONTHS,
    TWIN_CHANCE,
};
use crate::names::pick_name;
use crate::player::{DecisionError, Gender, Player};
use crate::relationships::{Child, RelationshipState, generate_child};

pub type Babies<T> = SmallVec<[T; 2]>;

/// Transient gestation state. Birth-control preferences persist across
/// pregnancies; everything else is cleared at delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PregnancyState {
    #[serde(default)]
    pub pregnant: bool,
    #[serde(default)]
    pub months: u8,
    #[serde(default)]
    pub expected_babies: u8,
    #[serde(default)]
    pub baby_genders: Babies<Gender>,
    #[serde(default)]
    pub player_birth_control: bool,
    #[serde(default)]
    pub partner_birth_control: bool,
}

/// Result of a conception roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PregnancyOutcome {
    pub twins: bool,
    pub genders: Babies<Gender>,
    pub suggested_names: Babies<String>,
}

/// Age window for the player given their gender.
#[must_use]
pub const fn fertility_window(gender: Gender) -> (u32, u32) {
    match gender {
        Gender::Female => (PREGNANCY_MIN_AGE, PREGNANCY_FEMALE_MAX_AGE),
        Gender::Male => (PREGNANCY_MIN_AGE, PREGNANCY_MALE_MAX_AGE),
    }
}

/// Whether the couple can conceive right now.
///
/// Requires a married partner, the player inside their gender's age window,
/// no active pregnancy, and neither party using birth control.
#[must_use]
pub fn can_get_pregnant(
    player: &Player,
    relationships: &RelationshipState,
    pregnancy: &PregnancyState,
) -> bool {
    let (min, max) = fertility_window(player.gender);
    player.alive
        && !player.incarcerated
        && relationships.is_married()
        && (min..=max).contains(&player.age)
        && !pregnancy.pregnant
        && !pregnancy.player_birth_control
        && !pregnancy.partner_birth_control
}

/// Draw twins (25%) or a single baby, each gender independently 50/50.
pub fn roll_pregnancy_outcome<R: Rng + ?Sized>(rng: &mut R) -> PregnancyOutcome {
    let twins = rng.gen_bool(TWIN_CHANCE);
    let count = if twins { 2 } else { 1 };
    let genders: Babies<Gender> = (0..count).map(|_| Gender::random(rng)).collect();
    let suggested_names = genders
        .iter()
        .map(|&gender| pick_name(gender, rng).to_string())
        .collect();
    PregnancyOutcome {
        twins,
        genders,
        suggested_names,
    }
}

impl PregnancyState {
    #[must_use]
    pub fn with_player_birth_control(&self, enabled: bool) -> Self {
        Self {
            player_birth_control: enabled,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_partner_birth_control(&self, enabled: bool) -> Self {
        Self {
            partner_birth_control: enabled,
            ..self.clone()
        }
    }

    /// Start a pregnancy with the given outcome.
    #[must_use]
    pub fn conceive(&self, outcome: &PregnancyOutcome) -> Self {
        Self {
            pregnant: true,
            months: 0,
            expected_babies: u8::try_from(outcome.genders.len()).unwrap_or(1),
            baby_genders: outcome.genders.clone(),
            ..self.clone()
        }
    }

    /// Try for a baby, returning the new state and the drawn outcome.
    ///
    /// # Errors
    ///
    /// Fails when [`can_get_pregnant`] does not hold.
    pub fn try_conceive<R: Rng + ?Sized>(
        &self,
        player: &Player,
        relationships: &RelationshipState,
        rng: &mut R,
    ) -> Result<(Self, PregnancyOutcome), DecisionError> {
        if self.pregnant {
            return Err(DecisionError::AlreadyActive("expecting"));
        }
        if !relationships.is_married() {
            return Err(DecisionError::NoEligiblePartner("children require marriage"));
        }
        if self.player_birth_control || self.partner_birth_control {
            return Err(DecisionError::Unqualified("birth control in use"));
        }
        if !can_get_pregnant(player, relationships, self) {
            let (min, max) = fertility_window(player.gender);
            return Err(DecisionError::AgeOutOfRange {
                age: player.age,
                min,
                max,
            });
        }
        let outcome = roll_pregnancy_outcome(rng);
        Ok((self.conceive(&outcome), outcome))
    }

    /// Advance gestation. Returns the new state and whether the babies are due.
    #[must_use]
    pub fn advance(&self, months: u8) -> (Self, bool) {
        if !self.pregnant {
            return (self.clone(), false);
        }
        let months = self.months.saturating_add(months).min(PREGNANCY_MONTHS);
        (
            Self {
                months,
                ..self.clone()
            },
            months >= PREGNANCY_MONTHS,
        )
    }

    /// Deliver the expected babies, naming them from `names` where given.
    #[must_use]
    pub fn deliver<R: Rng + ?Sized>(
        &self,
        names: &[String],
        birth_year: i32,
        rng: &mut R,
    ) -> (Self, Vec<Child>) {
        if !self.pregnant {
            return (self.clone(), Vec::new());
        }
        let babies = self
            .baby_genders
            .iter()
            .enumerate()
            .map(|(index, &gender)| {
                generate_child(
                    Some(gender),
                    names.get(index).map(String::as_str),
                    birth_year,
                    rng,
                )
            })
            .collect();
        let cleared = Self {
            player_birth_control: self.player_birth_control,
            partner_birth_control: self.partner_birth_control,
            ..Self::default()
        };
        (cleared, babies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::StartingBonuses;
    use crate::relationships::{Partner, PartnerStatus, Personality};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn couple(gender: Gender, age: u32) -> (Player, RelationshipState) {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut player =
            Player::new_random("Eve", gender, 1990, &StartingBonuses::default(), &mut rng);
        player.age = age;
        let relationships = RelationshipState {
            partner: Some(Partner {
                name: "Kai".into(),
                gender: gender.opposite(),
                age,
                looks: 55,
                personality: Personality::Caring,
                compatibility: 80,
                years_together: 3,
                status: PartnerStatus::Married,
                meeting_story: "You matched on a dating app.".into(),
            }),
            ..RelationshipState::default()
        };
        (player, relationships)
    }

    #[test]
    fn eligibility_depends_on_gender_window() {
        let state = PregnancyState::default();
        let (woman, rel) = couple(Gender::Female, 45);
        assert!(can_get_pregnant(&woman, &rel, &state));
        let (woman, rel) = couple(Gender::Female, 46);
        assert!(!can_get_pregnant(&woman, &rel, &state));
        let (man, rel) = couple(Gender::Male, 50);
        assert!(can_get_pregnant(&man, &rel, &state));
        let (man, rel) = couple(Gender::Male, 19);
        assert!(!can_get_pregnant(&man, &rel, &state));
    }

    #[test]
    fn birth_control_on_either_side_blocks() {
        let (player, rel) = couple(Gender::Female, 30);
        let base = PregnancyState::default();
        assert!(!can_get_pregnant(&player, &rel, &base.with_player_birth_control(true)));
        assert!(!can_get_pregnant(&player, &rel, &base.with_partner_birth_control(true)));
    }

    #[test]
    fn existing_pregnancy_blocks_another() {
        let (player, rel) = couple(Gender::Female, 30);
        let mut rng = SmallRng::seed_from_u64(2);
        let (pregnant, outcome) = PregnancyState::default()
            .try_conceive(&player, &rel, &mut rng)
            .unwrap();
        assert!(pregnant.pregnant);
        assert_eq!(usize::from(pregnant.expected_babies), outcome.genders.len());
        assert!(!can_get_pregnant(&player, &rel, &pregnant));
        assert!(pregnant.try_conceive(&player, &rel, &mut rng).is_err());
    }

    #[test]
    fn twins_appear_about_a_quarter_of_the_time() {
        let mut rng = SmallRng::seed_from_u64(0xBABE);
        let samples = 4000u32;
        let twins = (0..samples)
            .filter(|_| roll_pregnancy_outcome(&mut rng).twins)
            .count();
        let rate = f64::from(u32::try_from(twins).unwrap()) / f64::from(samples);
        assert!((rate - TWIN_CHANCE).abs() < 0.03, "twin rate {rate:.3}");
    }

    #[test]
    fn gestation_resolves_into_children() {
        let (player, rel) = couple(Gender::Male, 30);
        let mut rng = SmallRng::seed_from_u64(9);
        let (state, outcome) = PregnancyState::default()
            .with_partner_birth_control(false)
            .try_conceive(&player, &rel, &mut rng)
            .unwrap();
        let (halfway, due) = state.advance(4);
        assert!(!due);
        assert_eq!(halfway.months, 4);
        let (term, due) = halfway.advance(12);
        assert!(due);
        assert_eq!(term.months, PREGNANCY_MONTHS);

        let names: Vec<String> = outcome.suggested_names.iter().cloned().collect();
        let (cleared, babies) = term.deliver(&names, 2020, &mut rng);
        assert!(!cleared.pregnant);
        assert!(cleared.baby_genders.is_empty());
        assert_eq!(babies.len(), outcome.genders.len());
        for (baby, gender) in babies.iter().zip(outcome.genders.iter()) {
            assert_eq!(baby.gender, *gender);
            assert_eq!(baby.birth_year, 2020);
            assert_eq!(baby.age, 0);
        }
        assert_eq!(babies[0].name, names[0]);
    }
}
