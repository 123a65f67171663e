//! Merchant category code (MCC) mapping
//!
//! Payment networks tag merchants with four-digit codes; when present this
//! is the primary-authority signal. Lookup goes through an exact table
//! first, then an ordered list of inclusive ranges where the first
//! containing range wins. The airline and hotel ranges carry brand-specific
//! sub-codes for named carriers and chains.

use crate::taxonomy::Taxonomy;

/// Marker returned for a code inside a brand family range that does not
/// belong to a named chain.
pub const UNBRANDED: &str = "unbranded";

/// Exact code table, consulted before the ranges.
const EXACT: &[(u16, Taxonomy)] = &[
    // Food
    (5411, Taxonomy::Groceries),
    (5422, Taxonomy::Groceries),
    (5451, Taxonomy::Groceries),
    (5462, Taxonomy::Coffee),
    (5499, Taxonomy::Groceries),
    (5811, Taxonomy::Dining),
    (5812, Taxonomy::Dining),
    (5813, Taxonomy::Dining),
    (5814, Taxonomy::Dining),
    // Fuel
    (5541, Taxonomy::Gas),
    (5542, Taxonomy::Gas),
    // Health
    (5122, Taxonomy::Pharmacy),
    (5912, Taxonomy::Pharmacy),
    // Retail
    (5045, Taxonomy::Electronics),
    (5311, Taxonomy::Shopping),
    (5331, Taxonomy::Shopping),
    (5399, Taxonomy::Shopping),
    (5651, Taxonomy::Shopping),
    (5691, Taxonomy::Shopping),
    (5732, Taxonomy::Electronics),
    (5734, Taxonomy::Electronics),
    (5999, Taxonomy::Shopping),
    // Home improvement
    (5200, Taxonomy::HomeImprovement),
    (5211, Taxonomy::HomeImprovement),
    (5231, Taxonomy::HomeImprovement),
    (5251, Taxonomy::HomeImprovement),
    (5261, Taxonomy::HomeImprovement),
    // Transport and travel
    (4111, Taxonomy::Travel),
    (4112, Taxonomy::Travel),
    (4121, Taxonomy::Travel),
    (4131, Taxonomy::Travel),
    (4411, Taxonomy::Travel),
    (4511, Taxonomy::Flights),
    (4722, Taxonomy::Travel),
    (7011, Taxonomy::Hotels),
    (7512, Taxonomy::RentalCars),
    (7513, Taxonomy::RentalCars),
    // Entertainment
    (7832, Taxonomy::Entertainment),
    (7922, Taxonomy::Entertainment),
    (7929, Taxonomy::Entertainment),
    (7941, Taxonomy::Entertainment),
    (7991, Taxonomy::Entertainment),
    (7996, Taxonomy::Entertainment),
    (7998, Taxonomy::Entertainment),
    (7999, Taxonomy::Entertainment),
];

/// Inclusive ranges, in priority order; first containing range wins.
const RANGES: &[(u16, u16, Taxonomy)] = &[
    (3000, 3299, Taxonomy::Flights),
    (3351, 3441, Taxonomy::RentalCars),
    (3501, 3999, Taxonomy::Hotels),
    (4000, 4799, Taxonomy::Travel),
    (5200, 5299, Taxonomy::HomeImprovement),
    (5300, 5999, Taxonomy::Shopping),
    (7800, 7999, Taxonomy::Entertainment),
];

/// Named airline sub-codes within 3000–3299.
const AIRLINE_CODES: &[(u16, &str)] = &[
    (3000, "united"),
    (3001, "american"),
    (3005, "british_airways"),
    (3007, "air_france"),
    (3008, "lufthansa"),
    (3009, "air_canada"),
    (3058, "delta"),
    (3066, "southwest"),
    (3075, "singapore_airlines"),
    (3174, "jetblue"),
    (3256, "alaska"),
];

/// Named hotel chain sub-codes within 3501–3999.
const HOTEL_CODES: &[(u16, &str)] = &[
    (3501, "holiday_inn"),
    (3502, "best_western"),
    (3503, "sheraton"),
    (3504, "hilton"),
    (3509, "marriott"),
    (3512, "intercontinental"),
    (3513, "westin"),
    (3543, "four_seasons"),
    (3615, "travelodge"),
    (3637, "ramada"),
    (3640, "hyatt"),
    (3649, "radisson"),
    (3710, "ritz_carlton"),
];

const AIRLINE_RANGE: (u16, u16) = (3000, 3299);
const HOTEL_RANGE: (u16, u16) = (3501, 3999);

/// Read-only MCC lookup table, loaded once and shared by reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryCodeMap {
    _private: (),
}

impl CategoryCodeMap {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Map a code to a taxonomy: exact table first, then the first
    /// containing range.
    pub fn lookup(&self, code: u16) -> Option<Taxonomy> {
        if let Some((_, taxonomy)) = EXACT.iter().find(|(c, _)| *c == code) {
            return Some(*taxonomy);
        }
        RANGES
            .iter()
            .find(|(lo, hi, _)| (*lo..=*hi).contains(&code))
            .map(|(_, _, taxonomy)| *taxonomy)
    }

    /// Named hotel chain for a code, [`UNBRANDED`] inside the hotel range
    /// without a named chain, `None` outside the range.
    pub fn hotel_brand_for_code(&self, code: u16) -> Option<&'static str> {
        if !(HOTEL_RANGE.0..=HOTEL_RANGE.1).contains(&code) {
            return None;
        }
        Some(
            HOTEL_CODES
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, brand)| *brand)
                .unwrap_or(UNBRANDED),
        )
    }

    /// Named airline for a code, [`UNBRANDED`] inside the airline range
    /// without a named carrier, `None` outside the range.
    pub fn airline_brand_for_code(&self, code: u16) -> Option<&'static str> {
        if !(AIRLINE_RANGE.0..=AIRLINE_RANGE.1).contains(&code) {
            return None;
        }
        Some(
            AIRLINE_CODES
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, brand)| *brand)
                .unwrap_or(UNBRANDED),
        )
    }

    /// Reverse mapping: representative candidate codes for a taxonomy.
    /// Never empty for any variant.
    pub fn candidates_for(&self, taxonomy: Taxonomy) -> &'static [u16] {
        match taxonomy {
            Taxonomy::Dining => &[5812, 5814, 5811, 5813],
            Taxonomy::Coffee => &[5814, 5462],
            Taxonomy::Groceries => &[5411, 5499, 5422],
            Taxonomy::Gas => &[5541, 5542],
            Taxonomy::Shopping => &[5311, 5399, 5651, 5999],
            Taxonomy::Pharmacy => &[5912, 5122],
            Taxonomy::Entertainment => &[7832, 7922, 7991, 7996],
            Taxonomy::Travel => &[4722, 4111, 4121, 4411],
            Taxonomy::Electronics => &[5732, 5045, 5734],
            Taxonomy::Hotels => &[7011, 3501],
            Taxonomy::HomeImprovement => &[5211, 5251, 5200],
            Taxonomy::Flights => &[4511, 3000],
            Taxonomy::RentalCars => &[7512, 3351],
            Taxonomy::EverythingElse => &[5999],
        }
    }
}
