use lifesim_game::crime::{max_sentence, prison_sentence, resolve_crime};
use lifesim_game::relationships::Personality;
use lifesim_game::{CrimeKind, Gender, Partner, PartnerStatus, RelationshipState};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::convert::TryFrom;

const SAMPLE_SIZE: usize = 5000;
const TOLERANCE: f64 = 0.025;

fn rate(hits: usize) -> f64 {
    let sample_size = u32::try_from(SAMPLE_SIZE).expect("sample size fits u32");
    f64::from(u32::try_from(hits).expect("count fits")) / f64::from(sample_size)
}

fn partner(status: PartnerStatus, compatibility: i32, years_together: u32) -> Partner {
    Partner {
        name: "Robin".into(),
        gender: Gender::Female,
        age: 30,
        looks: 55,
        personality: Personality::Caring,
        compatibility,
        years_together,
        status,
        meeting_story: "You met at a friend's birthday party.".into(),
    }
}

#[test]
fn pickpocket_success_tracks_base_rate() {
    let mut rng = SmallRng::seed_from_u64(0xC0FFEE);
    let mut successes = 0usize;
    for _ in 0..SAMPLE_SIZE {
        let outcome = resolve_crime(CrimeKind::Pickpocket, 50, 50, 0, 2020, &mut rng);
        if outcome.success {
            successes += 1;
            assert!((50..=500).contains(&outcome.reward));
        } else {
            assert!((1..=3).contains(&outcome.prison_years));
        }
    }
    let observed = rate(successes);
    assert!(
        (observed - 0.70).abs() <= TOLERANCE,
        "pickpocket success drifted: observed {observed:.4}"
    );
}

#[test]
fn priors_lower_success_rate() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut successes = 0usize;
    for _ in 0..SAMPLE_SIZE {
        if resolve_crime(CrimeKind::Pickpocket, 50, 50, 4, 2020, &mut rng).success {
            successes += 1;
        }
    }
    let observed = rate(successes);
    assert!(
        (observed - 0.50).abs() <= TOLERANCE,
        "repeat offender success drifted: observed {observed:.4}"
    );
}

#[test]
fn sentences_stay_within_bounds() {
    let mut rng = SmallRng::seed_from_u64(7);
    for kind in CrimeKind::ALL {
        let spec = kind.spec();
        for priors in 0..6 {
            for _ in 0..200 {
                let years = prison_sentence(&spec, priors, &mut rng);
                assert!(years >= spec.prison_min, "{kind} sentence {years} below minimum");
                assert!(
                    years <= max_sentence(&spec, priors),
                    "{kind} sentence {years} above cap with {priors} priors"
                );
            }
        }
    }
}

#[test]
fn wedding_rate_matches_compatibility_formula() {
    // 0.6 * 50 + 0.2 * 50 + 5 * 1 = 45 percent
    let state = RelationshipState {
        partner: Some(partner(PartnerStatus::Dating, 50, 1)),
        ..RelationshipState::default()
    };
    let mut rng = SmallRng::seed_from_u64(99);
    let mut weddings = 0usize;
    for _ in 0..SAMPLE_SIZE {
        let (_, wed) = state.attempt_marriage(50, &mut rng).expect("eligible couple");
        if wed {
            weddings += 1;
        }
    }
    let observed = rate(weddings);
    assert!(
        (observed - 0.45).abs() <= TOLERANCE,
        "wedding rate drifted: observed {observed:.4}"
    );
}

#[test]
fn divorce_rate_rises_with_debt() {
    // 5 + 0.1 * (100 - 50) = 10 percent; debt adds 10 more
    let state = RelationshipState {
        partner: Some(partner(PartnerStatus::Married, 50, 0)),
        marriages: 1,
        ..RelationshipState::default()
    };
    let mut rng = SmallRng::seed_from_u64(5);
    let mut solvent = 0usize;
    let mut indebted = 0usize;
    for _ in 0..SAMPLE_SIZE {
        if state.roll_divorce(1_000, &mut rng).1 {
            solvent += 1;
        }
        if state.roll_divorce(-1_000, &mut rng).1 {
            indebted += 1;
        }
    }
    let solvent = rate(solvent);
    let indebted = rate(indebted);
    assert!(
        (solvent - 0.10).abs() <= TOLERANCE,
        "divorce rate drifted: observed {solvent:.4}"
    );
    assert!(
        (indebted - 0.20).abs() <= TOLERANCE,
        "indebted divorce rate drifted: observed {indebted:.4}"
    );
}
