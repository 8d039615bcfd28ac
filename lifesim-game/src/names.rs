//! Fixed name and flavor-text pools.
use rand::Rng;

use crate::player::Gender;

pub const FEMALE_NAMES: [&str; 16] = [
    "Emma", "Olivia", "Ava", "Sophia", "Mia", "Isabella", "Charlotte", "Amelia", "Harper",
    "Evelyn", "Abigail", "Ella", "Grace", "Chloe", "Lily", "Nora",
];

pub const MALE_NAMES: [&str; 16] = [
    "Liam", "Noah", "Oliver", "Elijah", "James", "William", "Benjamin", "Lucas", "Henry",
    "Alexander", "Mason", "Ethan", "Daniel", "Jacob", "Logan", "Jack",
];

pub const MEETING_STORIES: [&str; 10] = [
    "You met at a friend's birthday party.",
    "You bumped into each other at the grocery store.",
    "You matched on a dating app.",
    "You were introduced by a coworker.",
    "You met while waiting out the rain at a bus stop.",
    "You sat next to each other on a long flight.",
    "You met in an evening pottery class.",
    "You both reached for the last coffee at the cafe.",
    "You met at a concert in the park.",
    "You were paired up for a charity run.",
];

#[must_use]
pub const fn names_for(gender: Gender) -> &'static [&'static str] {
    match gender {
        Gender::Female => &FEMALE_NAMES,
        Gender::Male => &MALE_NAMES,
    }
}

pub fn pick_name<R: Rng + ?Sized>(gender: Gender, rng: &mut R) -> &'static str {
    let pool = names_for(gender);
    pool[rng.gen_range(0..pool.len())]
}

pub fn pick_meeting_story<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    MEETING_STORIES[rng.gen_range(0..MEETING_STORIES.len())]
}
