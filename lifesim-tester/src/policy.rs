//! Scripted decision-making for autoplayed lives.
use chrono::Utc;
use lifesim_game::{
    CrimeKind, DecisionError, EducationStage, KeyValueStore, LegacyData, LifeEngine, LifeSession,
    MinigameKind, available_jobs, property_catalog,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const DATING_CHANCE: f64 = 0.35;
const BABY_CHANCE: f64 = 0.3;
const CHILD_TIME_CHANCE: f64 = 0.5;
const CRIME_CHANCE: f64 = 0.04;
const MINIGAME_CHANCE: f64 = 0.15;
const MAX_CHILDREN: usize = 3;
const RENT_RESERVE_YEARS: i64 = 2;

/// Counters for the decisions a policy made over one life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyTally {
    pub crimes: u32,
    pub minigames: u32,
    pub refused: u32,
}

/// A plain "sensible citizen" strategy with a small appetite for risk.
pub struct AutoplayPolicy {
    rng: ChaCha20Rng,
    tally: PolicyTally,
}

impl AutoplayPolicy {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            tally: PolicyTally::default(),
        }
    }

    #[must_use]
    pub const fn tally(&self) -> PolicyTally {
        self.tally
    }

    pub fn coin(&mut self, chance: f64) -> bool {
        self.rng.gen_bool(chance.clamp(0.0, 1.0))
    }

    /// Index of the event choice to take.
    pub fn pick_choice(&mut self, choices: usize) -> usize {
        if choices == 0 {
            0
        } else {
            self.rng.gen_range(0..choices)
        }
    }

    fn attempt<T>(&mut self, label: &str, result: Result<T, DecisionError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log::debug!("policy {label} refused: {err}");
                self.tally.refused += 1;
                None
            }
        }
    }

    /// Buy the cheapest affordable legacy bonus until the currency runs dry.
    pub fn spend_legacy<S: KeyValueStore>(&mut self, engine: &LifeEngine<S>) -> Vec<String> {
        let mut bought = Vec::new();
        loop {
            let legacy: LegacyData = engine.legacy();
            let Some(id) = legacy
                .bonuses
                .iter()
                .filter(|bonus| !bonus.is_maxed() && bonus.next_cost() <= legacy.currency)
                .min_by_key(|bonus| bonus.next_cost())
                .map(|bonus| bonus.id.clone())
            else {
                break;
            };
            match engine.purchase_bonus(&id) {
                Ok(_) => bought.push(id),
                Err(err) => {
                    log::warn!("legacy purchase {id} failed: {err}");
                    break;
                }
            }
        }
        bought
    }

    /// Decisions taken before the year ticks.
    pub fn act<S: KeyValueStore>(&mut self, session: &mut LifeSession, engine: &LifeEngine<S>) {
        if session.is_over() || session.player.incarcerated {
            return;
        }
        self.schooling(session);
        self.career(session);
        if session.player.is_adult() {
            self.romance(session);
            self.family(session);
            self.housing(session);
            if self.coin(CRIME_CHANCE) {
                let kind = if self.coin(0.8) {
                    CrimeKind::Pickpocket
                } else {
                    CrimeKind::Shoplifting
                };
                if self.attempt("crime", session.commit_crime(kind)).is_some() {
                    self.tally.crimes += 1;
                }
            }
        }
        if self.coin(MINIGAME_CHANCE) {
            self.play_minigame(engine);
        }
    }

    fn schooling(&mut self, session: &mut LifeSession) {
        let player = &session.player;
        if player.age == 3 && player.education == EducationStage::None {
            let result = session.start_kindergarten();
            self.attempt("kindergarten", result);
        }
        let player = &session.player;
        if player.age == 16 && player.education == EducationStage::Highschool {
            let track = if player.stats.intelligence >= 60 {
                Some(EducationStage::University)
            } else if self.coin(0.4) {
                Some(EducationStage::Apprenticeship)
            } else {
                None
            };
            if let Some(track) = track {
                let result = session.choose_further_education(track);
                self.attempt("further education", result);
            }
        }
    }

    fn career(&mut self, session: &mut LifeSession) {
        let player = &session.player;
        if player.age >= 13 && player.job.is_none() && !player.newspaper_job && player.age < 16 {
            let result = session.take_newspaper_job();
            self.attempt("newspaper", result);
            return;
        }
        if player.in_school || player.age < 16 {
            return;
        }
        let current = player.job.as_ref().map_or(0, |job| job.salary);
        let best = available_jobs(player)
            .first()
            .filter(|job| job.salary > current)
            .map(|job| job.id.clone());
        if let Some(id) = best {
            let result = session.apply_for_job(&id);
            if self.attempt("job", result).is_some() {
                session.quit_newspaper_job();
            }
        }
    }

    fn romance(&mut self, session: &mut LifeSession) {
        if session.relationships.partner.is_none() {
            if self.coin(DATING_CHANCE) {
                let candidates = self.attempt("find partners", session.find_partners(3));
                if let Some(best) = candidates.and_then(|found| found.into_iter().next()) {
                    let result = session.start_dating(best);
                    self.attempt("dating", result);
                }
            }
        } else if session.relationships.can_marry() {
            let result = session.marry();
            self.attempt("marry", result);
        }
    }

    fn family(&mut self, session: &mut LifeSession) {
        let married = session.relationships.is_married();
        if married
            && !session.pregnancy.pregnant
            && session.relationships.children.len() < MAX_CHILDREN
            && self.coin(BABY_CHANCE)
        {
            let result = session.try_for_baby();
            self.attempt("baby", result);
        }
        let children = session.relationships.children.len();
        if children > 0 && self.coin(CHILD_TIME_CHANCE) {
            let index = self.rng.gen_range(0..children);
            let result = session.spend_time_with_child(index);
            self.attempt("child time", result);
        }
    }

    fn housing(&mut self, session: &mut LifeSession) {
        let money = session.player.money;
        let Some(cheapest) = property_catalog().iter().min_by_key(|p| p.purchase_price) else {
            return;
        };
        if session.property.owned.is_empty() && money > cheapest.purchase_price.saturating_mul(2) {
            let result = session.buy_property(&cheapest.id);
            if self.attempt("buy", result).is_some() {
                session.stop_renting();
                let result = session.move_into(0);
                self.attempt("move in", result);
            }
            return;
        }
        let yearly_rent = cheapest.monthly_rent.saturating_mul(12);
        if session.property.current_home().is_none()
            && session.player.job.is_some()
            && money > yearly_rent.saturating_mul(RENT_RESERVE_YEARS)
        {
            let result = session.rent_property(&cheapest.id);
            self.attempt("rent", result);
        }
    }

    fn play_minigame<S: KeyValueStore>(&mut self, engine: &LifeEngine<S>) {
        let kind = MinigameKind::ALL[self.rng.gen_range(0..MinigameKind::ALL.len())];
        let score = self.rng.gen_range(0..=1_000);
        let result = engine.record_minigame(kind, score, score >= 500, Utc::now());
        self.tally.minigames += 1;
        if let Some(best) = result.new_highscore {
            log::debug!("new {} highscore: {}", best.minigame, best.score);
        }
    }
}
