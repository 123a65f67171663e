//! The closed set of canonical reward categories
//!
//! Every merchant resolves to exactly one of these. The rule-based classifier
//! only produces the base retail/food/travel set; the merchant matcher also
//! emits the brand-aware travel refinements (`Flights`, `RentalCars`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Canonical reward category for a merchant.
///
/// Serialized in snake_case; the AI provider contract requires responses to
/// use exactly these names, and anything else is rejected by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Taxonomy {
    Dining,
    Coffee,
    Groceries,
    Gas,
    Shopping,
    Pharmacy,
    Entertainment,
    Travel,
    Electronics,
    Hotels,
    HomeImprovement,
    Flights,
    RentalCars,
    EverythingElse,
}

impl Taxonomy {
    /// All variants, in a stable order used for prompt enumeration and
    /// deterministic vote tie-breaking.
    pub const ALL: [Taxonomy; 14] = [
        Taxonomy::Dining,
        Taxonomy::Coffee,
        Taxonomy::Groceries,
        Taxonomy::Gas,
        Taxonomy::Shopping,
        Taxonomy::Pharmacy,
        Taxonomy::Entertainment,
        Taxonomy::Travel,
        Taxonomy::Electronics,
        Taxonomy::Hotels,
        Taxonomy::HomeImprovement,
        Taxonomy::Flights,
        Taxonomy::RentalCars,
        Taxonomy::EverythingElse,
    ];

    /// The category used when no signal produced anything better.
    pub const DEFAULT: Taxonomy = Taxonomy::EverythingElse;

    pub fn as_str(&self) -> &'static str {
        match self {
            Taxonomy::Dining => "dining",
            Taxonomy::Coffee => "coffee",
            Taxonomy::Groceries => "groceries",
            Taxonomy::Gas => "gas",
            Taxonomy::Shopping => "shopping",
            Taxonomy::Pharmacy => "pharmacy",
            Taxonomy::Entertainment => "entertainment",
            Taxonomy::Travel => "travel",
            Taxonomy::Electronics => "electronics",
            Taxonomy::Hotels => "hotels",
            Taxonomy::HomeImprovement => "home_improvement",
            Taxonomy::Flights => "flights",
            Taxonomy::RentalCars => "rental_cars",
            Taxonomy::EverythingElse => "everything_else",
        }
    }

    /// Whether this is a generic catch-all rather than a specific category.
    pub fn is_generic(&self) -> bool {
        matches!(self, Taxonomy::Shopping | Taxonomy::EverythingElse)
    }

    /// Whether this category belongs to the broader travel family.
    pub fn is_travel_family(&self) -> bool {
        matches!(
            self,
            Taxonomy::Travel | Taxonomy::Hotels | Taxonomy::Flights | Taxonomy::RentalCars
        )
    }

    /// Category-family widening: does a merchant in `self` satisfy a reward
    /// rule targeting `target`?
    ///
    /// Hotels, flights and rental cars all satisfy the broader travel family,
    /// and coffee shops satisfy dining.
    pub fn matches_family(&self, target: Taxonomy) -> bool {
        if *self == target {
            return true;
        }
        match target {
            Taxonomy::Travel => self.is_travel_family(),
            Taxonomy::Dining => matches!(self, Taxonomy::Coffee),
            _ => false,
        }
    }

    /// Stable ordering index, used to break vote ties deterministically.
    pub(crate) fn ordinal(&self) -> usize {
        Taxonomy::ALL.iter().position(|t| t == self).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Taxonomy {
    type Err = Error;

    /// Parses a snake_case taxonomy name. Tolerates surrounding whitespace,
    /// case, and space/hyphen separators, but any name outside the closed
    /// enumeration is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Taxonomy::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| Error::UnknownTaxonomy(s.to_string()))
    }
}
