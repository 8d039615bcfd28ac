//! Deterministic random streams for a life session.
//!
//! Each concern draws from its own stream so that, for example, an extra
//! crime attempt never shifts the outcome of the next romance roll.

use std::cell::{RefCell, RefMut};

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;

/// Named random streams derived from a single user seed.
#[derive(Debug)]
pub struct RngBundle {
    aging: RefCell<CountingRng<SmallRng>>,
    crime: RefCell<CountingRng<SmallRng>>,
    romance: RefCell<CountingRng<SmallRng>>,
    family: RefCell<CountingRng<SmallRng>>,
    events: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            aging: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"aging"))),
            crime: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"crime"))),
            romance: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"romance"))),
            family: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"family"))),
            events: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"events"))),
        }
    }

    /// Streams for a session resumed at `year`.
    ///
    /// Resuming the same save twice replays identically, while resuming a
    /// later save does not repeat the draws of the first year.
    #[must_use]
    pub fn for_year(seed: u64, year: i32) -> Self {
        let year_bits = u64::from(year.unsigned_abs()).rotate_left(32);
        Self::from_user_seed(seed ^ year_bits)
    }

    /// Access the aging stream.
    #[must_use]
    pub fn aging(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.aging.borrow_mut()
    }

    /// Access the crime stream.
    #[must_use]
    pub fn crime(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.crime.borrow_mut()
    }

    /// Access the romance stream.
    #[must_use]
    pub fn romance(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.romance.borrow_mut()
    }

    /// Access the family stream.
    #[must_use]
    pub fn family(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.family.borrow_mut()
    }

    /// Access the narrative event stream.
    #[must_use]
    pub fn events(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.events.borrow_mut()
    }

    /// Total draws across every stream.
    #[must_use]
    pub fn total_draws(&self) -> u64 {
        [
            self.aging.borrow().draws(),
            self.crime.borrow().draws(),
            self.romance.borrow().draws(),
            self.family.borrow().draws(),
            self.events.borrow().draws(),
        ]
        .iter()
        .sum()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so this branch is unreachable in practice.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
