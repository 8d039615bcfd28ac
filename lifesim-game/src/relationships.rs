//! Partners, marriage, divorce and children.
//!
//! All operations return a new [`RelationshipState`]; the input is never
//! modified.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    CHILD_RELATIONSHIP_MAX, CHILD_RELATIONSHIP_MIN, COMPATIBILITY_MAX, COMPATIBILITY_MIN,
    DIVORCE_BASE, DIVORCE_CHANCE_FLOOR, DIVORCE_DEBT_PENALTY, DIVORCE_INCOMPAT_WEIGHT,
    DIVORCE_YEARS_RELIEF_CAP, DIVORCE_YEARS_RELIEF_PER_YEAR, MARRIAGE_CHANCE_CAP,
    MARRIAGE_COMPAT_WEIGHT, MARRIAGE_LUCK_WEIGHT, MARRIAGE_MIN_YEARS,
    MARRIAGE_YEARS_BONUS_CAP, MARRIAGE_YEARS_BONUS_PER_YEAR, PARENT_MAX_AGE, PARENT_MIN_AGE,
    PARTNER_AGE_SPREAD, PARTNER_LOOKS_MAX, PARTNER_LOOKS_MIN, PARTNER_LOOKS_SPREAD,
    PARTNER_MIN_AGE, PARTNER_MORTALITY_STEP,
};
use crate::names::{pick_meeting_story, pick_name};
use crate::numbers::round_f64_to_i32;
use crate::player::{DecisionError, Gender, Player};
use crate::stats::clamp_stat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PartnerStatus {
    #[default]
    Dating,
    Engaged,
    Married,
    Divorced,
    Widowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Romantic,
    Adventurous,
    Ambitious,
    Caring,
    Funny,
    Intellectual,
    Homebody,
}

impl Personality {
    pub const ALL: [Self; 7] = [
        Self::Romantic,
        Self::Adventurous,
        Self::Ambitious,
        Self::Caring,
        Self::Funny,
        Self::Intellectual,
        Self::Homebody,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Romantic => "romantic",
            Self::Adventurous => "adventurous",
            Self::Ambitious => "ambitious",
            Self::Caring => "caring",
            Self::Funny => "funny",
            Self::Intellectual => "intellectual",
            Self::Homebody => "homebody",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub name: String,
    pub gender: Gender,
    pub age: u32,
    pub looks: i32,
    pub personality: Personality,
    pub compatibility: i32,
    pub years_together: u32,
    pub status: PartnerStatus,
    /// Assigned once at creation.
    pub meeting_story: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub name: String,
    pub gender: Gender,
    pub age: u32,
    pub birth_year: i32,
    pub relationship: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RelationshipState {
    #[serde(default)]
    pub partner: Option<Partner>,
    #[serde(default)]
    pub exes: Vec<Partner>,
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub marriages: u32,
    #[serde(default)]
    pub divorces: u32,
}

/// What happened to the household during a yearly tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HouseholdYear {
    pub divorced: bool,
    pub widowed: bool,
}

/// Generate a single romantic candidate for `player`.
pub fn generate_partner<R: Rng + ?Sized>(player: &Player, rng: &mut R) -> Partner {
    let gender = player.gender.opposite();
    let min_age = i64::from(PARTNER_MIN_AGE);
    let center = i64::from(player.age);
    let low = (center - PARTNER_AGE_SPREAD).max(min_age);
    let high = (center + PARTNER_AGE_SPREAD).max(min_age);
    let age = u32::try_from(rng.gen_range(low..=high)).unwrap_or(PARTNER_MIN_AGE);

    let looks_offset = rng.gen_range(-PARTNER_LOOKS_SPREAD..=PARTNER_LOOKS_SPREAD);
    let looks = (player.stats.looks + looks_offset).clamp(PARTNER_LOOKS_MIN, PARTNER_LOOKS_MAX);
    let personality = Personality::ALL[rng.gen_range(0..Personality::ALL.len())];

    let similarity = f64::from(100 - (player.stats.looks - looks).abs());
    let chemistry = f64::from(rng.gen_range(0..=100));
    let compatibility = round_f64_to_i32(similarity * 0.5 + chemistry * 0.5)
        .clamp(COMPATIBILITY_MIN, COMPATIBILITY_MAX);

    Partner {
        name: pick_name(gender, rng).to_string(),
        gender,
        age,
        looks,
        personality,
        compatibility,
        years_together: 0,
        status: PartnerStatus::Dating,
        meeting_story: pick_meeting_story(rng).to_string(),
    }
}

/// `count` independent candidates, most compatible first. Ties keep
/// generation order.
pub fn partner_candidates<R: Rng + ?Sized>(
    player: &Player,
    count: usize,
    rng: &mut R,
) -> Vec<Partner> {
    let mut candidates: Vec<Partner> = (0..count).map(|_| generate_partner(player, rng)).collect();
    candidates.sort_by(|a, b| b.compatibility.cmp(&a.compatibility));
    candidates
}

/// Percent chance that a proposal or wedding succeeds, capped at 95.
#[must_use]
pub fn marriage_chance(partner: &Partner, luck: i32) -> f64 {
    let years_bonus = (f64::from(partner.years_together) * MARRIAGE_YEARS_BONUS_PER_YEAR)
        .min(MARRIAGE_YEARS_BONUS_CAP);
    (MARRIAGE_COMPAT_WEIGHT * f64::from(partner.compatibility)
        + MARRIAGE_LUCK_WEIGHT * f64::from(luck)
        + years_bonus)
        .min(MARRIAGE_CHANCE_CAP)
}

/// Annual percent chance that a marriage ends, floored at 1.
#[must_use]
pub fn divorce_chance(partner: &Partner, money: i64) -> f64 {
    let debt = if money < 0 { DIVORCE_DEBT_PENALTY } else { 0.0 };
    let relief = (f64::from(partner.years_together) * DIVORCE_YEARS_RELIEF_PER_YEAR)
        .min(DIVORCE_YEARS_RELIEF_CAP);
    (DIVORCE_BASE + DIVORCE_INCOMPAT_WEIGHT * f64::from(100 - partner.compatibility) + debt
        - relief)
        .max(DIVORCE_CHANCE_FLOOR)
}

fn roll_percent<R: Rng + ?Sized>(chance: f64, rng: &mut R) -> bool {
    rng.gen_range(0.0..100.0) < chance
}

/// A newborn with a name from the fixed pool.
pub fn generate_child<R: Rng + ?Sized>(
    gender: Option<Gender>,
    name: Option<&str>,
    birth_year: i32,
    rng: &mut R,
) -> Child {
    let gender = gender.unwrap_or_else(|| Gender::random(rng));
    let name = name.map_or_else(|| pick_name(gender, rng).to_string(), str::to_string);
    Child {
        name,
        gender,
        age: 0,
        birth_year,
        relationship: rng.gen_range(CHILD_RELATIONSHIP_MIN..CHILD_RELATIONSHIP_MAX),
    }
}

impl RelationshipState {
    #[must_use]
    pub fn is_married(&self) -> bool {
        self.partner
            .as_ref()
            .is_some_and(|p| p.status == PartnerStatus::Married)
    }

    /// Begin dating `partner`.
    ///
    /// # Errors
    ///
    /// Fails when someone is already the active partner or the player is a minor.
    pub fn start_dating(&self, player: &Player, partner: Partner) -> Result<Self, DecisionError> {
        player.ensure_active()?;
        if player.age < PARTNER_MIN_AGE {
            return Err(DecisionError::AgeOutOfRange {
                age: player.age,
                min: PARTNER_MIN_AGE,
                max: u32::MAX,
            });
        }
        if self.partner.is_some() {
            return Err(DecisionError::AlreadyActive("in a relationship"));
        }
        Ok(Self {
            partner: Some(Partner {
                status: PartnerStatus::Dating,
                years_together: 0,
                ..partner
            }),
            ..self.clone()
        })
    }

    /// A dating or engaged partner with at least one year together.
    #[must_use]
    pub fn can_marry(&self) -> bool {
        self.partner.as_ref().is_some_and(|p| {
            matches!(p.status, PartnerStatus::Dating | PartnerStatus::Engaged)
                && p.years_together >= MARRIAGE_MIN_YEARS
        })
    }

    /// Propose to a dating partner; on success the couple is engaged.
    ///
    /// # Errors
    ///
    /// Fails without a dating partner of at least one year.
    pub fn propose<R: Rng + ?Sized>(
        &self,
        luck: i32,
        rng: &mut R,
    ) -> Result<(Self, bool), DecisionError> {
        let partner = self.eligible_partner()?;
        if partner.status != PartnerStatus::Dating {
            return Err(DecisionError::AlreadyActive("engaged"));
        }
        let accepted = roll_percent(marriage_chance(partner, luck), rng);
        if !accepted {
            return Ok((self.clone(), false));
        }
        Ok((self.with_partner_status(PartnerStatus::Engaged), true))
    }

    /// Try to marry the active partner.
    ///
    /// # Errors
    ///
    /// Fails without a dating/engaged partner of at least one year.
    pub fn attempt_marriage<R: Rng + ?Sized>(
        &self,
        luck: i32,
        rng: &mut R,
    ) -> Result<(Self, bool), DecisionError> {
        let partner = self.eligible_partner()?;
        let wed = roll_percent(marriage_chance(partner, luck), rng);
        if !wed {
            return Ok((self.clone(), false));
        }
        let mut next = self.with_partner_status(PartnerStatus::Married);
        next.marriages += 1;
        Ok((next, true))
    }

    fn eligible_partner(&self) -> Result<&Partner, DecisionError> {
        let Some(partner) = self.partner.as_ref() else {
            return Err(DecisionError::NoEligiblePartner("not in a relationship"));
        };
        if !self.can_marry() {
            return Err(DecisionError::NoEligiblePartner(
                "need a dating partner of at least one year",
            ));
        }
        Ok(partner)
    }

    fn with_partner_status(&self, status: PartnerStatus) -> Self {
        let mut next = self.clone();
        if let Some(partner) = next.partner.as_mut() {
            partner.status = status;
        }
        next
    }

    /// End a dating or engaged relationship.
    ///
    /// # Errors
    ///
    /// Fails when there is no partner, or the partner is a spouse (use
    /// [`Self::divorce`]).
    pub fn break_up(&self) -> Result<Self, DecisionError> {
        match self.partner.as_ref() {
            None => Err(DecisionError::NoEligiblePartner("not in a relationship")),
            Some(p) if p.status == PartnerStatus::Married => {
                Err(DecisionError::NoEligiblePartner("spouses must divorce"))
            }
            Some(_) => Ok(self.retire_partner(None)),
        }
    }

    /// Divorce the current spouse.
    ///
    /// # Errors
    ///
    /// Fails when not married.
    pub fn divorce(&self) -> Result<Self, DecisionError> {
        if !self.is_married() {
            return Err(DecisionError::NoEligiblePartner("not married"));
        }
        let mut next = self.retire_partner(Some(PartnerStatus::Divorced));
        next.divorces += 1;
        Ok(next)
    }

    fn retire_partner(&self, status: Option<PartnerStatus>) -> Self {
        let mut next = self.clone();
        if let Some(mut partner) = next.partner.take() {
            if let Some(status) = status {
                partner.status = status;
            }
            next.exes.push(partner);
        }
        next
    }

    /// Yearly divorce roll for married couples.
    pub fn roll_divorce<R: Rng + ?Sized>(&self, money: i64, rng: &mut R) -> (Self, bool) {
        let Some(partner) = self.partner.as_ref().filter(|_| self.is_married()) else {
            return (self.clone(), false);
        };
        if roll_percent(divorce_chance(partner, money), rng) {
            let mut next = self.retire_partner(Some(PartnerStatus::Divorced));
            next.divorces += 1;
            (next, true)
        } else {
            (self.clone(), false)
        }
    }

    /// Married, and the player is within the parenting age window.
    #[must_use]
    pub fn can_have_children(&self, player_age: u32) -> bool {
        self.is_married() && (PARENT_MIN_AGE..=PARENT_MAX_AGE).contains(&player_age)
    }

    /// Welcome a newborn (adoption or a resolved birth).
    ///
    /// # Errors
    ///
    /// Fails unless [`Self::can_have_children`] holds.
    pub fn have_child<R: Rng + ?Sized>(
        &self,
        player_age: u32,
        year: i32,
        rng: &mut R,
    ) -> Result<(Self, Child), DecisionError> {
        if !self.is_married() {
            return Err(DecisionError::NoEligiblePartner("children require marriage"));
        }
        if !self.can_have_children(player_age) {
            return Err(DecisionError::AgeOutOfRange {
                age: player_age,
                min: PARENT_MIN_AGE,
                max: PARENT_MAX_AGE,
            });
        }
        let child = generate_child(None, None, year, rng);
        Ok((self.with_children(std::slice::from_ref(&child)), child))
    }

    #[must_use]
    pub fn with_children(&self, born: &[Child]) -> Self {
        let mut next = self.clone();
        next.children.extend_from_slice(born);
        next
    }

    /// Spend time with the child at `index`, raising their relationship.
    ///
    /// # Errors
    ///
    /// Fails for an unknown child index.
    pub fn spend_time_with_child<R: Rng + ?Sized>(
        &self,
        index: usize,
        rng: &mut R,
    ) -> Result<Self, DecisionError> {
        let mut next = self.clone();
        let Some(child) = next.children.get_mut(index) else {
            return Err(DecisionError::Unknown {
                kind: "child",
                id: index.to_string(),
            });
        };
        child.relationship = clamp_stat(child.relationship + rng.gen_range(2..=8));
        Ok(next)
    }

    /// Age the household by one year alongside the player.
    ///
    /// Children and the partner age by exactly one year; the couple gains a
    /// year together; a partner past `mortality_age` may pass away.
    pub fn advance_year<R: Rng + ?Sized>(
        &self,
        mortality_age: u32,
        rng: &mut R,
    ) -> (Self, HouseholdYear) {
        let mut next = self.clone();
        let mut year = HouseholdYear::default();
        for child in &mut next.children {
            child.age += 1;
        }
        if let Some(partner) = next.partner.as_mut() {
            partner.age += 1;
            partner.years_together += 1;
            if partner.age > mortality_age {
                let chance = f64::from(partner.age - mortality_age) * PARTNER_MORTALITY_STEP;
                year.widowed = rng.gen_bool(chance.clamp(0.0, 1.0));
            }
        }
        if year.widowed {
            next = next.retire_partner(Some(PartnerStatus::Widowed));
        }
        (next, year)
    }
}
