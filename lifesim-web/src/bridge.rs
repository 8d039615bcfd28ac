//! JSON bridge exported to the browser UI.
//!
//! Every decision autosaves the running life; results come back as JSON
//! strings and failures are thrown as their display message.
use lifesim_game::{
    DecisionError, LifeEngine, LifeSession, Partner, available_jobs, property_catalog,
};
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;

use crate::error::BridgeError;
use crate::input::{parse_crime, parse_gender, parse_minigame, parse_track, timestamp_from_millis};
use crate::storage::{LocalStorageStore, create_local_engine};

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, BridgeError> {
    Ok(serde_json::to_string(value)?)
}

#[wasm_bindgen]
pub struct LifeApp {
    engine: LifeEngine<LocalStorageStore>,
    session: Option<LifeSession>,
    candidates: Vec<Partner>,
}

impl LifeApp {
    fn session(&self) -> Result<&LifeSession, BridgeError> {
        self.session.as_ref().ok_or(BridgeError::NoSession)
    }

    /// Run a decision against the live session and autosave on success.
    fn decide<T>(
        &mut self,
        decision: impl FnOnce(&mut LifeSession) -> Result<T, DecisionError>,
    ) -> Result<T, BridgeError> {
        let session = self.session.as_mut().ok_or(BridgeError::NoSession)?;
        let value = decision(session)?;
        self.engine.save(session);
        Ok(value)
    }
}

#[wasm_bindgen]
impl LifeApp {
    /// Attach to `localStorage` and pick up any saved life.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Self, BridgeError> {
        let engine = create_local_engine()?;
        let session = engine.resume();
        Ok(Self {
            engine,
            session,
            candidates: Vec::new(),
        })
    }

    #[wasm_bindgen(js_name = hasLife)]
    pub fn has_life(&self) -> bool {
        self.session.is_some()
    }

    #[wasm_bindgen(js_name = startLife)]
    pub fn start_life(
        &mut self,
        seed: u64,
        name: &str,
        gender: &str,
    ) -> Result<String, BridgeError> {
        let gender = parse_gender(gender)?;
        let session = self.engine.start_life(seed, name, gender);
        let json = to_json(&session)?;
        self.session = Some(session);
        self.candidates.clear();
        Ok(json)
    }

    #[wasm_bindgen(js_name = sessionJson)]
    pub fn session_json(&self) -> Result<String, BridgeError> {
        to_json(self.session()?)
    }

    #[wasm_bindgen(js_name = advanceYear)]
    pub fn advance_year(&mut self) -> Result<String, BridgeError> {
        let session = self.session.as_mut().ok_or(BridgeError::NoSession)?;
        let report = self.engine.advance_year(session)?;
        self.candidates.clear();
        to_json(&report)
    }

    #[wasm_bindgen(js_name = resolveEvent)]
    pub fn resolve_event(&mut self, choice: usize) -> Result<String, BridgeError> {
        let picked = self.decide(|session| session.resolve_event(choice))?;
        to_json(&picked)
    }

    #[wasm_bindgen(js_name = availableJobs)]
    pub fn available_jobs(&self) -> Result<String, BridgeError> {
        to_json(&available_jobs(&self.session()?.player))
    }

    #[wasm_bindgen(js_name = applyForJob)]
    pub fn apply_for_job(&mut self, job_id: &str) -> Result<(), BridgeError> {
        self.decide(|session| session.apply_for_job(job_id))
    }

    #[wasm_bindgen(js_name = quitJob)]
    pub fn quit_job(&mut self) -> Result<(), BridgeError> {
        self.decide(|session| {
            session.quit_job();
            Ok(())
        })
    }

    #[wasm_bindgen(js_name = setNewspaperJob)]
    pub fn set_newspaper_job(&mut self, enabled: bool) -> Result<(), BridgeError> {
        self.decide(|session| {
            if enabled {
                session.take_newspaper_job()
            } else {
                session.quit_newspaper_job();
                Ok(())
            }
        })
    }

    #[wasm_bindgen(js_name = startKindergarten)]
    pub fn start_kindergarten(&mut self) -> Result<(), BridgeError> {
        self.decide(LifeSession::start_kindergarten)
    }

    #[wasm_bindgen(js_name = chooseFurtherEducation)]
    pub fn choose_further_education(&mut self, track: &str) -> Result<(), BridgeError> {
        let track = parse_track(track)?;
        self.decide(|session| session.choose_further_education(track))
    }

    #[wasm_bindgen(js_name = commitCrime)]
    pub fn commit_crime(&mut self, crime: &str) -> Result<String, BridgeError> {
        let kind = parse_crime(crime)?;
        let outcome = self.decide(|session| session.commit_crime(kind))?;
        to_json(&outcome)
    }

    /// Meet new candidates; they stay available until the next year.
    #[wasm_bindgen(js_name = findPartners)]
    pub fn find_partners(&mut self, count: usize) -> Result<String, BridgeError> {
        self.candidates = self.session()?.find_partners(count)?;
        to_json(&self.candidates)
    }

    #[wasm_bindgen(js_name = startDating)]
    pub fn start_dating(&mut self, index: usize) -> Result<(), BridgeError> {
        let partner = self
            .candidates
            .get(index)
            .cloned()
            .ok_or_else(|| BridgeError::Unknown {
                kind: "candidate",
                value: index.to_string(),
            })?;
        self.decide(|session| session.start_dating(partner))?;
        self.candidates.clear();
        Ok(())
    }

    pub fn propose(&mut self) -> Result<bool, BridgeError> {
        self.decide(LifeSession::propose)
    }

    pub fn marry(&mut self) -> Result<bool, BridgeError> {
        self.decide(LifeSession::marry)
    }

    #[wasm_bindgen(js_name = breakUp)]
    pub fn break_up(&mut self) -> Result<(), BridgeError> {
        self.decide(LifeSession::break_up)
    }

    pub fn divorce(&mut self) -> Result<(), BridgeError> {
        self.decide(LifeSession::divorce)
    }

    #[wasm_bindgen(js_name = setBirthControl)]
    pub fn set_birth_control(&mut self, player: bool, partner: bool) -> Result<(), BridgeError> {
        self.decide(|session| {
            session.set_player_birth_control(player);
            session.set_partner_birth_control(partner);
            Ok(())
        })
    }

    #[wasm_bindgen(js_name = tryForBaby)]
    pub fn try_for_baby(&mut self) -> Result<String, BridgeError> {
        let outcome = self.decide(LifeSession::try_for_baby)?;
        to_json(&outcome)
    }

    /// `names` is a JSON array of strings in birth order.
    #[wasm_bindgen(js_name = nameBabies)]
    pub fn name_babies(&mut self, names: &str) -> Result<(), BridgeError> {
        let names: Vec<String> = serde_json::from_str(names)?;
        self.decide(|session| {
            session.name_babies(names);
            Ok(())
        })
    }

    #[wasm_bindgen(js_name = adoptChild)]
    pub fn adopt_child(&mut self) -> Result<String, BridgeError> {
        let child = self.decide(LifeSession::adopt_child)?;
        to_json(&child)
    }

    #[wasm_bindgen(js_name = spendTimeWithChild)]
    pub fn spend_time_with_child(&mut self, index: usize) -> Result<(), BridgeError> {
        self.decide(|session| session.spend_time_with_child(index))
    }

    #[wasm_bindgen(js_name = propertyListings)]
    pub fn property_listings(&self) -> Result<String, BridgeError> {
        to_json(property_catalog())
    }

    #[wasm_bindgen(js_name = buyProperty)]
    pub fn buy_property(&mut self, listing_id: &str) -> Result<(), BridgeError> {
        self.decide(|session| session.buy_property(listing_id))
    }

    #[wasm_bindgen(js_name = sellProperty)]
    pub fn sell_property(&mut self, index: usize) -> Result<(), BridgeError> {
        self.decide(|session| session.sell_property(index))
    }

    #[wasm_bindgen(js_name = rentProperty)]
    pub fn rent_property(&mut self, listing_id: &str) -> Result<(), BridgeError> {
        self.decide(|session| session.rent_property(listing_id))
    }

    #[wasm_bindgen(js_name = stopRenting)]
    pub fn stop_renting(&mut self) -> Result<(), BridgeError> {
        self.decide(|session| {
            session.stop_renting();
            Ok(())
        })
    }

    #[wasm_bindgen(js_name = moveInto)]
    pub fn move_into(&mut self, index: usize) -> Result<(), BridgeError> {
        self.decide(|session| session.move_into(index))
    }

    /// Archive the life, pay out legacy currency and clear the save.
    #[wasm_bindgen(js_name = endLife)]
    pub fn end_life(&mut self, cause: Option<String>) -> Result<String, BridgeError> {
        let mut session = self.session.take().ok_or(BridgeError::NoSession)?;
        let record = self.engine.finish_life(&mut session, cause.as_deref())?;
        self.candidates.clear();
        to_json(&record)
    }

    pub fn archive(&self) -> Result<String, BridgeError> {
        to_json(&self.engine.archive())
    }

    #[wasm_bindgen(js_name = clearArchive)]
    pub fn clear_archive(&self) -> bool {
        self.engine.persistence().clear_archive()
    }

    pub fn highscores(&self) -> Result<String, BridgeError> {
        to_json(&self.engine.highscores())
    }

    #[wasm_bindgen(js_name = minigameStats)]
    pub fn minigame_stats(&self) -> Result<String, BridgeError> {
        to_json(&self.engine.persistence().minigame_stats())
    }

    /// Record a finished minigame; `at_millis` is `Date.now()`.
    #[wasm_bindgen(js_name = recordMinigame)]
    pub fn record_minigame(
        &self,
        minigame: &str,
        score: i64,
        won: bool,
        at_millis: f64,
    ) -> Result<String, BridgeError> {
        let kind = parse_minigame(minigame)?;
        let at = timestamp_from_millis(at_millis)?;
        let result = self.engine.record_minigame(kind, score, won, at);
        to_json(&json!({
            "stats": result.stats,
            "new_highscore": result.new_highscore,
        }))
    }

    pub fn legacy(&self) -> Result<String, BridgeError> {
        to_json(&self.engine.legacy())
    }

    #[wasm_bindgen(js_name = purchaseBonus)]
    pub fn purchase_bonus(&self, id: &str) -> Result<String, BridgeError> {
        to_json(&self.engine.purchase_bonus(id)?)
    }
}
