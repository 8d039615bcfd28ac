//! A single life in progress.
//!
//! [`LifeSession`] owns the player and every subsystem state, runs the
//! yearly tick, and forwards decisions to the pure transition functions.
//! Random streams are re-keyed from `(seed, year)` after every tick, so a
//! session resumed from an end-of-year save continues exactly as the
//! uninterrupted one would have.
use once_cell::unsync::OnceCell;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::aging::age_one_year;
use crate::config::LifeConfig;
use crate::crime::{CrimeKind, CrimeOutcome, commit_crime, draw_prison_event};
use crate::events::{EventCatalog, EventChoice, LifeEvent, resolve_choice};
use crate::jobs::find_job;
use crate::legacy::StartingBonuses;
use crate::persistence::LifeRecord;
use crate::player::{DecisionError, EducationStage, Gender, Player, apply_effects};
use crate::pregnancy::{PregnancyOutcome, PregnancyState};
use crate::property::PropertyState;
use crate::relationships::{Child, Partner, RelationshipState, partner_candidates};
use crate::rng::RngBundle;
use crate::stats::Effects;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub year: i32,
    pub age: u32,
    pub key: String,
    pub importance: u8,
}

/// How memorable a timeline key is when picking life highlights.
#[must_use]
pub fn importance(key: &str) -> u8 {
    match key {
        "life.died" | "family.married" | "family.child_born" => 5,
        "family.divorced" | "family.widowed" | "crime.caught" => 4,
        "prison.released" | "career.hired" | "property.bought" => 3,
        _ if key.starts_with("education.") || key.starts_with("crime.") => 2,
        _ => 1,
    }
}

/// What happened during one [`LifeSession::advance_year`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct YearReport {
    pub year: i32,
    pub age: u32,
    pub income: i64,
    pub rent: i64,
    pub births: Vec<Child>,
    pub divorced: bool,
    pub widowed: bool,
    pub released: bool,
    pub prison_event: Option<&'static str>,
    /// Narrative event awaiting [`LifeSession::resolve_event`].
    pub event: Option<LifeEvent>,
    pub died: bool,
}

/// Cause recorded for a natural death.
#[must_use]
pub const fn cause_of_death(player: &Player, old_age: u32) -> &'static str {
    if player.incarcerated {
        "died in prison"
    } else if player.age >= old_age {
        "old age"
    } else {
        "poor health"
    }
}

fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.gen_range(0.0..1.0) < chance
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LifeSession {
    pub seed: u64,
    pub year: i32,
    #[serde(default)]
    pub config: LifeConfig,
    pub player: Player,
    #[serde(default)]
    pub relationships: RelationshipState,
    #[serde(default)]
    pub pregnancy: PregnancyState,
    #[serde(default)]
    pub property: PropertyState,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    #[serde(default)]
    pub peak_money: i64,
    #[serde(default)]
    pub pending_event: Option<LifeEvent>,
    /// Names for the babies currently expected, in birth order.
    #[serde(default)]
    pub baby_names: Vec<String>,
    #[serde(default)]
    pub cause_of_death: Option<String>,
    /// Set once [`LifeSession::end_life`] has produced the archive record.
    #[serde(default)]
    pub archived: bool,
    #[serde(skip)]
    rng: OnceCell<RngBundle>,
}

impl LifeSession {
    /// Start a new life born in `config.start_year`.
    #[must_use]
    pub fn new(
        seed: u64,
        name: impl Into<String>,
        gender: Gender,
        config: LifeConfig,
        bonuses: &StartingBonuses,
    ) -> Self {
        let year = config.start_year;
        let rng = RngBundle::for_year(seed, year);
        let player = Player::new_random(name, gender, year, bonuses, &mut *rng.family());
        let mut session = Self {
            seed,
            year,
            config,
            peak_money: player.money,
            player,
            relationships: RelationshipState::default(),
            pregnancy: PregnancyState::default(),
            property: PropertyState::default(),
            timeline: Vec::new(),
            pending_event: None,
            baby_names: Vec::new(),
            cause_of_death: None,
            archived: false,
            rng: OnceCell::with_value(rng),
        };
        session.note("life.born");
        session
    }

    fn rng(&self) -> &RngBundle {
        self.rng
            .get_or_init(|| RngBundle::for_year(self.seed, self.year))
    }

    /// Draws made since the streams were last keyed.
    #[must_use]
    pub fn rng_draws(&self) -> u64 {
        self.rng.get().map_or(0, RngBundle::total_draws)
    }

    fn note(&mut self, key: &str) {
        self.timeline.push(TimelineEntry {
            year: self.year,
            age: self.player.age,
            key: key.to_string(),
            importance: importance(key),
        });
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        !self.player.alive
    }

    /// Run one yearly tick across every subsystem.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Deceased`] once the life has ended.
    pub fn advance_year(&mut self, catalog: &EventCatalog) -> Result<YearReport, DecisionError> {
        if !self.player.alive {
            return Err(DecisionError::Deceased);
        }
        let rng = std::mem::take(&mut self.rng);
        let rng = rng.get_or_init(|| RngBundle::for_year(self.seed, self.year));
        self.year += 1;

        let served = self.player.incarcerated;
        let aging = age_one_year(&self.player, &mut *rng.aging());
        let mut player = aging.player;
        let mut notes = aging.notes;

        let (relationships, household) = self
            .relationships
            .advance_year(self.config.partner_mortality_age, &mut *rng.family());
        if household.widowed {
            notes.push("family.widowed");
        }
        let (relationships, divorced) =
            relationships.roll_divorce(player.money, &mut *rng.romance());
        if divorced {
            notes.push("family.divorced");
        }

        let (pregnancy, due) = self.pregnancy.advance(12);
        let (pregnancy, births) = if due {
            pregnancy.deliver(&self.baby_names, self.year, &mut *rng.family())
        } else {
            (pregnancy, Vec::new())
        };
        if !births.is_empty() {
            self.baby_names.clear();
            notes.push("family.child_born");
        }

        let (property, rent) = self.property.advance_year();
        if rent > 0 {
            player = apply_effects(&player, &Effects::money(-rent));
        }

        let mut prison_event = None;
        if player.alive && served && roll(&mut *rng.crime(), self.config.prison_event_chance) {
            let drawn = draw_prison_event(&mut *rng.crime());
            player = apply_effects(&player, &drawn.effects());
            prison_event = Some(drawn.key);
            notes.push(drawn.key);
        }

        let event = if player.alive
            && !served
            && roll(&mut *rng.events(), self.config.event_chance)
        {
            catalog.pick_event(player.age, &mut *rng.events()).cloned()
        } else {
            None
        };

        let died = !player.alive;
        if died {
            self.cause_of_death = Some(cause_of_death(&player, self.config.old_age).to_string());
            notes.push("life.died");
        }

        self.player = player;
        self.relationships = relationships.with_children(&births);
        self.pregnancy = pregnancy;
        self.property = property;
        self.peak_money = self.peak_money.max(self.player.money);
        self.pending_event.clone_from(&event);
        for key in notes {
            self.note(key);
        }
        log::debug!(
            "year {} for {}: age={} money={} draws={}",
            self.year,
            self.player.id,
            self.player.age,
            self.player.money,
            rng.total_draws()
        );

        Ok(YearReport {
            year: self.year,
            age: self.player.age,
            income: aging.income,
            rent,
            births,
            divorced,
            widowed: household.widowed,
            released: aging.released,
            prison_event,
            event,
            died,
        })
    }

    /// Answer the pending narrative event.
    ///
    /// # Errors
    ///
    /// Fails without a pending event or for an unknown choice; the event
    /// stays pending in the latter case.
    pub fn resolve_event(&mut self, choice: usize) -> Result<EventChoice, DecisionError> {
        let Some(event) = self.pending_event.as_ref() else {
            return Err(DecisionError::Unknown {
                kind: "event",
                id: "pending".to_string(),
            });
        };
        let (player, picked) = resolve_choice(&self.player, event, choice)?;
        let key = format!("event.{}", event.id);
        self.pending_event = None;
        self.player = player;
        self.peak_money = self.peak_money.max(self.player.money);
        self.note(&key);
        Ok(picked)
    }

    /// Apply for a catalog job by id.
    ///
    /// # Errors
    ///
    /// Fails for unknown jobs or unmet requirements.
    pub fn apply_for_job(&mut self, job_id: &str) -> Result<(), DecisionError> {
        let job = find_job(job_id).ok_or_else(|| DecisionError::Unknown {
            kind: "job",
            id: job_id.to_string(),
        })?;
        self.player = self.player.apply_for_job(job)?;
        self.note("career.hired");
        Ok(())
    }

    pub fn quit_job(&mut self) {
        if self.player.job.is_some() {
            self.player = self.player.quit_job();
            self.note("career.quit");
        }
    }

    /// # Errors
    ///
    /// See [`Player::take_newspaper_job`].
    pub fn take_newspaper_job(&mut self) -> Result<(), DecisionError> {
        self.player = self.player.take_newspaper_job()?;
        Ok(())
    }

    pub fn quit_newspaper_job(&mut self) {
        self.player = self.player.quit_newspaper_job();
    }

    /// # Errors
    ///
    /// See [`Player::start_kindergarten`].
    pub fn start_kindergarten(&mut self) -> Result<(), DecisionError> {
        self.player = self.player.start_kindergarten()?;
        self.note("education.kindergarten");
        Ok(())
    }

    /// # Errors
    ///
    /// See [`Player::choose_further_education`].
    pub fn choose_further_education(&mut self, track: EducationStage) -> Result<(), DecisionError> {
        self.player = self.player.choose_further_education(track)?;
        self.note("education.further");
        Ok(())
    }

    /// # Errors
    ///
    /// Refused for dead or incarcerated players.
    pub fn commit_crime(&mut self, kind: CrimeKind) -> Result<CrimeOutcome, DecisionError> {
        let (player, outcome) =
            commit_crime(&self.player, kind, self.year, &mut *self.rng().crime())?;
        self.player = player;
        self.peak_money = self.peak_money.max(self.player.money);
        self.note(if outcome.success {
            "crime.success"
        } else {
            "crime.caught"
        });
        Ok(outcome)
    }

    /// Meet `count` potential partners, most compatible first.
    ///
    /// # Errors
    ///
    /// Refused for minors and for players who cannot act.
    pub fn find_partners(&self, count: usize) -> Result<Vec<Partner>, DecisionError> {
        self.player.ensure_active()?;
        if !self.player.is_adult() {
            return Err(DecisionError::AgeOutOfRange {
                age: self.player.age,
                min: crate::constants::PARTNER_MIN_AGE,
                max: u32::MAX,
            });
        }
        Ok(partner_candidates(
            &self.player,
            count,
            &mut *self.rng().romance(),
        ))
    }

    /// # Errors
    ///
    /// See [`RelationshipState::start_dating`].
    pub fn start_dating(&mut self, partner: Partner) -> Result<(), DecisionError> {
        self.relationships = self.relationships.start_dating(&self.player, partner)?;
        self.note("family.dating");
        Ok(())
    }

    /// # Errors
    ///
    /// See [`RelationshipState::propose`].
    pub fn propose(&mut self) -> Result<bool, DecisionError> {
        self.player.ensure_active()?;
        let (next, accepted) = self
            .relationships
            .propose(self.player.stats.luck, &mut *self.rng().romance())?;
        self.relationships = next;
        if accepted {
            self.note("family.engaged");
        }
        Ok(accepted)
    }

    /// # Errors
    ///
    /// See [`RelationshipState::attempt_marriage`].
    pub fn marry(&mut self) -> Result<bool, DecisionError> {
        self.player.ensure_active()?;
        let (next, wed) = self
            .relationships
            .attempt_marriage(self.player.stats.luck, &mut *self.rng().romance())?;
        self.relationships = next;
        if wed {
            self.note("family.married");
        }
        Ok(wed)
    }

    /// # Errors
    ///
    /// See [`RelationshipState::break_up`].
    pub fn break_up(&mut self) -> Result<(), DecisionError> {
        self.relationships = self.relationships.break_up()?;
        self.note("family.break_up");
        Ok(())
    }

    /// # Errors
    ///
    /// See [`RelationshipState::divorce`].
    pub fn divorce(&mut self) -> Result<(), DecisionError> {
        self.relationships = self.relationships.divorce()?;
        self.note("family.divorced");
        Ok(())
    }

    pub fn set_player_birth_control(&mut self, enabled: bool) {
        self.pregnancy = self.pregnancy.with_player_birth_control(enabled);
    }

    pub fn set_partner_birth_control(&mut self, enabled: bool) {
        self.pregnancy = self.pregnancy.with_partner_birth_control(enabled);
    }

    /// Try for a baby. The suggested names become the default baby names.
    ///
    /// # Errors
    ///
    /// See [`PregnancyState::try_conceive`].
    pub fn try_for_baby(&mut self) -> Result<PregnancyOutcome, DecisionError> {
        self.player.ensure_active()?;
        let (next, outcome) =
            self.pregnancy
                .try_conceive(&self.player, &self.relationships, &mut *self.rng().family())?;
        self.pregnancy = next;
        self.baby_names = outcome.suggested_names.iter().cloned().collect();
        self.note("family.expecting");
        Ok(outcome)
    }

    /// Choose names for the expected babies, in birth order.
    pub fn name_babies(&mut self, names: Vec<String>) {
        self.baby_names = names;
    }

    /// # Errors
    ///
    /// See [`RelationshipState::have_child`].
    pub fn adopt_child(&mut self) -> Result<Child, DecisionError> {
        self.player.ensure_active()?;
        let (next, child) =
            self.relationships
                .have_child(self.player.age, self.year, &mut *self.rng().family())?;
        self.relationships = next;
        self.note("family.child_born");
        Ok(child)
    }

    /// # Errors
    ///
    /// See [`RelationshipState::spend_time_with_child`].
    pub fn spend_time_with_child(&mut self, index: usize) -> Result<(), DecisionError> {
        self.player.ensure_active()?;
        let next = self
            .relationships
            .spend_time_with_child(index, &mut *self.rng().family())?;
        self.relationships = next;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`PropertyState::buy`].
    pub fn buy_property(&mut self, listing_id: &str) -> Result<(), DecisionError> {
        let (property, player) = self.property.buy(listing_id, &self.player)?;
        self.property = property;
        self.player = player;
        self.note("property.bought");
        Ok(())
    }

    /// # Errors
    ///
    /// See [`PropertyState::sell`].
    pub fn sell_property(&mut self, index: usize) -> Result<(), DecisionError> {
        let (property, player) = self.property.sell(index, &self.player)?;
        self.property = property;
        self.player = player;
        self.peak_money = self.peak_money.max(self.player.money);
        self.note("property.sold");
        Ok(())
    }

    /// # Errors
    ///
    /// See [`PropertyState::rent`].
    pub fn rent_property(&mut self, listing_id: &str) -> Result<(), DecisionError> {
        self.property = self.property.rent(listing_id, &self.player)?;
        self.note("property.rented");
        Ok(())
    }

    pub fn stop_renting(&mut self) {
        self.property = self.property.stop_renting();
    }

    /// # Errors
    ///
    /// See [`PropertyState::move_into`].
    pub fn move_into(&mut self, index: usize) -> Result<(), DecisionError> {
        self.property = self.property.move_into(index)?;
        Ok(())
    }

    /// The most memorable timeline keys, chronological among equals.
    #[must_use]
    pub fn highlights(&self, count: usize) -> Vec<String> {
        let mut ranked: Vec<&TimelineEntry> = self.timeline.iter().collect();
        ranked.sort_by(|a, b| b.importance.cmp(&a.importance));
        ranked
            .into_iter()
            .take(count)
            .map(|entry| format!("{} (age {})", entry.key, entry.age))
            .collect()
    }

    /// Close the life and build its archive record.
    ///
    /// A life still in progress ends with `cause`, or "ended early". A cause
    /// already recorded at death is kept.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Archived`] if the record was already built.
    pub fn end_life(&mut self, cause: Option<&str>) -> Result<LifeRecord, DecisionError> {
        if self.archived {
            return Err(DecisionError::Archived);
        }
        if self.player.alive {
            self.player.alive = false;
            self.cause_of_death = Some(cause.unwrap_or("ended early").to_string());
            self.note("life.died");
        } else if self.cause_of_death.is_none() {
            let natural = cause_of_death(&self.player, self.config.old_age);
            self.cause_of_death = Some(cause.unwrap_or(natural).to_string());
        }
        self.archived = true;
        let player = &self.player;
        Ok(LifeRecord {
            id: player.id.clone(),
            name: player.name.clone(),
            gender: player.gender,
            birth_year: player.birth_year,
            death_year: self.year,
            age_at_death: player.age,
            peak_money: self.peak_money.max(player.money),
            final_money: player.money,
            lifetime_earnings: player.lifetime_earnings,
            cause_of_death: self.cause_of_death.clone().unwrap_or_default(),
            highlights: self.highlights(self.config.timeline_highlights),
            final_stats: player.stats,
            education: player.education,
            job_title: player.job.as_ref().map(|job| job.title.clone()),
            children: u32::try_from(self.relationships.children.len()).unwrap_or(u32::MAX),
            marriages: self.relationships.marriages,
        })
    }
}
