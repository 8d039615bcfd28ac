//! Real-estate catalog, valuation and rent.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::MAJORITY_AGE;
use crate::numbers::{floor_f64_to_i64, i64_to_f64};
use crate::player::{DecisionError, Player, apply_effects};
use crate::stats::Effects;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyTier {
    Apartment,
    House,
    Villa,
    Mansion,
}

impl PropertyTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::House => "house",
            Self::Villa => "villa",
            Self::Mansion => "mansion",
        }
    }
}

impl fmt::Display for PropertyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub tier: PropertyTier,
    pub purchase_price: i64,
    pub monthly_rent: i64,
    pub condition: i32,
    /// Percent per year.
    pub appreciation_rate: f64,
    #[serde(default)]
    pub years_owned: u32,
    #[serde(default)]
    pub rented: bool,
}

impl Property {
    fn listing(
        id: &str,
        name: &str,
        tier: PropertyTier,
        purchase_price: i64,
        monthly_rent: i64,
        appreciation_rate: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tier,
            purchase_price,
            monthly_rent,
            condition: 100,
            appreciation_rate,
            years_owned: 0,
            rented: false,
        }
    }

    /// Value after the years this property has been owned.
    #[must_use]
    pub fn current_value(&self) -> i64 {
        value_after(self, self.years_owned)
    }
}

static PROPERTY_CATALOG: Lazy<Vec<Property>> = Lazy::new(|| {
    use PropertyTier as T;
    vec![
        Property::listing("studio_apartment", "Studio Apartment", T::Apartment, 120_000, 700, 2.0),
        Property::listing("city_apartment", "City Apartment", T::Apartment, 220_000, 1_200, 2.5),
        Property::listing("suburban_house", "Suburban House", T::House, 350_000, 1_800, 3.0),
        Property::listing("family_house", "Family House", T::House, 480_000, 2_400, 3.0),
        Property::listing("seaside_villa", "Seaside Villa", T::Villa, 900_000, 4_500, 3.5),
        Property::listing("hillside_villa", "Hillside Villa", T::Villa, 1_200_000, 5_500, 3.5),
        Property::listing("country_mansion", "Country Mansion", T::Mansion, 2_500_000, 9_000, 4.0),
        Property::listing("city_mansion", "City Mansion", T::Mansion, 4_000_000, 14_000, 4.5),
    ]
});

#[must_use]
pub fn property_catalog() -> &'static [Property] {
    &PROPERTY_CATALOG
}

#[must_use]
pub fn find_listing(id: &str) -> Option<&'static Property> {
    PROPERTY_CATALOG.iter().find(|p| p.id == id)
}

/// Yearly rent owed; zero unless the property is rented.
#[must_use]
pub const fn yearly_rent_cost(property: &Property) -> i64 {
    if property.rented {
        property.monthly_rent.saturating_mul(12)
    } else {
        0
    }
}

/// `purchase_price × (1 + rate/100)^years`, floored.
#[must_use]
pub fn value_after(property: &Property, years: u32) -> i64 {
    let years = i32::try_from(years).unwrap_or(i32::MAX);
    let growth = (1.0 + property.appreciation_rate / 100.0).powi(years);
    floor_f64_to_i64(i64_to_f64(property.purchase_price) * growth)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum Residence {
    Owned(usize),
    Rented,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PropertyState {
    #[serde(default)]
    pub home: Option<Residence>,
    #[serde(default)]
    pub owned: Vec<Property>,
    #[serde(default)]
    pub rented: Option<Property>,
    /// Cached sum of [`Property::current_value`] over `owned`.
    #[serde(default)]
    pub owned_value: i64,
}

impl PropertyState {
    fn refreshed(mut self) -> Self {
        self.owned_value = self.owned.iter().map(Property::current_value).sum();
        self
    }

    /// Buy a catalog listing outright.
    ///
    /// # Errors
    ///
    /// Fails for minors, unknown listings or insufficient funds.
    pub fn buy(&self, listing_id: &str, player: &Player) -> Result<(Self, Player), DecisionError> {
        player.ensure_active()?;
        require_adult(player)?;
        let listing = lookup(listing_id)?;
        if player.money < listing.purchase_price {
            return Err(DecisionError::InsufficientFunds {
                required: listing.purchase_price,
                available: player.money,
            });
        }
        let mut next = self.clone();
        next.owned.push(Property {
            years_owned: 0,
            rented: false,
            ..listing.clone()
        });
        if next.home.is_none() {
            next.home = Some(Residence::Owned(next.owned.len() - 1));
        }
        let buyer = apply_effects(player, &Effects::money(-listing.purchase_price));
        Ok((next.refreshed(), buyer))
    }

    /// Sell the owned property at `index` for its current value.
    ///
    /// # Errors
    ///
    /// Fails for an unknown index.
    pub fn sell(&self, index: usize, player: &Player) -> Result<(Self, Player), DecisionError> {
        player.ensure_active()?;
        if index >= self.owned.len() {
            return Err(DecisionError::Unknown {
                kind: "property",
                id: index.to_string(),
            });
        }
        let mut next = self.clone();
        let sold = next.owned.remove(index);
        next.home = match next.home {
            Some(Residence::Owned(home)) if home == index => None,
            Some(Residence::Owned(home)) if home > index => Some(Residence::Owned(home - 1)),
            other => other,
        };
        let seller = apply_effects(player, &Effects::money(sold.current_value()));
        Ok((next.refreshed(), seller))
    }

    /// Rent a catalog listing and move in. Replaces any previous rental.
    ///
    /// # Errors
    ///
    /// Fails for minors or unknown listings.
    pub fn rent(&self, listing_id: &str, player: &Player) -> Result<Self, DecisionError> {
        player.ensure_active()?;
        require_adult(player)?;
        let listing = lookup(listing_id)?;
        Ok(Self {
            rented: Some(Property {
                rented: true,
                ..listing.clone()
            }),
            home: Some(Residence::Rented),
            ..self.clone()
        })
    }

    #[must_use]
    pub fn stop_renting(&self) -> Self {
        let home = match self.home {
            Some(Residence::Rented) => (!self.owned.is_empty()).then_some(Residence::Owned(0)),
            other => other,
        };
        Self {
            rented: None,
            home,
            ..self.clone()
        }
    }

    /// Move into an owned property.
    ///
    /// # Errors
    ///
    /// Fails for an unknown index.
    pub fn move_into(&self, index: usize) -> Result<Self, DecisionError> {
        if index >= self.owned.len() {
            return Err(DecisionError::Unknown {
                kind: "property",
                id: index.to_string(),
            });
        }
        Ok(Self {
            home: Some(Residence::Owned(index)),
            ..self.clone()
        })
    }

    /// Rent owed for the current year.
    #[must_use]
    pub fn yearly_rent(&self) -> i64 {
        self.rented.as_ref().map_or(0, yearly_rent_cost)
    }

    /// One year passes: owned properties appreciate. Returns the new state and
    /// the rent due for the year.
    #[must_use]
    pub fn advance_year(&self) -> (Self, i64) {
        let rent = self.yearly_rent();
        let mut next = self.clone();
        for property in &mut next.owned {
            property.years_owned += 1;
        }
        (next.refreshed(), rent)
    }

    /// The property currently lived in, if any.
    #[must_use]
    pub fn current_home(&self) -> Option<&Property> {
        match self.home? {
            Residence::Owned(index) => self.owned.get(index),
            Residence::Rented => self.rented.as_ref(),
        }
    }
}

const fn require_adult(player: &Player) -> Result<(), DecisionError> {
    if player.age < MAJORITY_AGE {
        return Err(DecisionError::AgeOutOfRange {
            age: player.age,
            min: MAJORITY_AGE,
            max: u32::MAX,
        });
    }
    Ok(())
}

fn lookup(listing_id: &str) -> Result<&'static Property, DecisionError> {
    find_listing(listing_id).ok_or_else(|| DecisionError::Unknown {
        kind: "listing",
        id: listing_id.to_string(),
    })
}
