//! Tunable constants shared across the life engine.

pub const STAT_MIN: i32 = 0;
pub const STAT_MAX: i32 = 100;
pub const STAT_CENTER: i32 = 50;
pub const START_STAT_MIN: i32 = 30;
pub const START_STAT_MAX: i32 = 80;

/// Age from which money may fall below zero.
pub const MAJORITY_AGE: u32 = 18;
/// Age from which the player may hold a primary job.
pub const WORKING_AGE: u32 = 16;

// Passive decay
pub const HEALTH_DECAY_AGE: u32 = 40;
pub const HEALTH_DECAY_MAX: i32 = 2;
pub const SENIOR_DECAY_AGE: u32 = 60;
pub const SENIOR_HEALTH_DECAY_MAX: i32 = 3;
pub const FITNESS_DECAY_FLOOR: i32 = 30;
pub const FITNESS_DECAY_MAX: i32 = 2;
pub const LOOKS_DECAY_AGE: u32 = 35;
pub const LOOKS_DECAY_CHANCE: f64 = 0.3;
pub const LOOKS_DECAY_AMOUNT: i32 = 1;
pub const PRISON_HEALTH_PENALTY: i32 = 3;
pub const PRISON_LUCK_PENALTY: i32 = 1;

// Education
pub const KINDERGARTEN_MIN_AGE: u32 = 3;
pub const ELEMENTARY_AGE: u32 = 6;
pub const MIDDLESCHOOL_AGE: u32 = 10;
pub const HIGHSCHOOL_AGE: u32 = 13;
pub const SCHOOL_START_AGE: u32 = 6;
pub const SCHOOL_END_AGE: u32 = 16;
pub const EXTENDED_EXTRA_YEARS: u32 = 2;
pub const APPRENTICESHIP_EXTRA_YEARS: u32 = 3;
pub const UNIVERSITY_EXTRA_YEARS: u32 = 5;

// Income
pub const NEWSPAPER_MIN_AGE: u32 = 13;
pub const NEWSPAPER_STIPEND: i64 = 600;

// Crime
pub const CRIME_INTELLIGENCE_DIVISOR: f64 = 200.0;
pub const CRIME_LUCK_DIVISOR: f64 = 250.0;
pub const CRIME_PRIOR_PENALTY: f64 = 0.05;
pub const CRIME_MIN_SUCCESS: f64 = 0.05;
pub const CRIME_MAX_SUCCESS: f64 = 0.95;

// Relationships
pub const PARTNER_MIN_AGE: u32 = 18;
pub const PARTNER_AGE_SPREAD: i64 = 8;
pub const PARTNER_LOOKS_SPREAD: i32 = 15;
pub const PARTNER_LOOKS_MIN: i32 = 20;
pub const PARTNER_LOOKS_MAX: i32 = 100;
pub const COMPATIBILITY_MIN: i32 = 10;
pub const COMPATIBILITY_MAX: i32 = 100;
pub const MARRIAGE_COMPAT_WEIGHT: f64 = 0.6;
pub const MARRIAGE_LUCK_WEIGHT: f64 = 0.2;
pub const MARRIAGE_YEARS_BONUS_PER_YEAR: f64 = 5.0;
pub const MARRIAGE_YEARS_BONUS_CAP: f64 = 20.0;
pub const MARRIAGE_CHANCE_CAP: f64 = 95.0;
pub const MARRIAGE_MIN_YEARS: u32 = 1;
pub const DIVORCE_BASE: f64 = 5.0;
pub const DIVORCE_INCOMPAT_WEIGHT: f64 = 0.1;
pub const DIVORCE_DEBT_PENALTY: f64 = 10.0;
pub const DIVORCE_YEARS_RELIEF_PER_YEAR: f64 = 1.0;
pub const DIVORCE_YEARS_RELIEF_CAP: f64 = 15.0;
pub const DIVORCE_CHANCE_FLOOR: f64 = 1.0;
pub const PARENT_MIN_AGE: u32 = 20;
pub const PARENT_MAX_AGE: u32 = 50;
pub const CHILD_RELATIONSHIP_MIN: i32 = 80;
pub const CHILD_RELATIONSHIP_MAX: i32 = 100;
pub const PARTNER_MORTALITY_STEP: f64 = 0.02;

// Pregnancy
pub const PREGNANCY_MIN_AGE: u32 = 20;
pub const PREGNANCY_FEMALE_MAX_AGE: u32 = 45;
pub const PREGNANCY_MALE_MAX_AGE: u32 = 50;
pub const PREGNANCY_MONTHS: u8 = 9;
pub const TWIN_CHANCE: f64 = 0.25;

// Legacy
pub const LEGACY_TOP_EVENTS: usize = 5;
