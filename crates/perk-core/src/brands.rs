//! Static brand registry
//!
//! Maps known brand name variants to a guaranteed taxonomy and category
//! code. Matching is exact or variant-prefix only, no fuzzy distance; a
//! brand hit carries confidence 1.0. Registry order is significant: first
//! match wins, and more specific names are listed before any brand they
//! could shadow as a prefix.

use crate::normalize::normalize;
use crate::taxonomy::Taxonomy;

/// A known brand: id, normalized name variants, taxonomy, representative MCC.
#[derive(Debug, Clone, Copy)]
pub struct BrandRecord {
    pub id: &'static str,
    /// Normalized name variants; a variant matches by equality or prefix
    pub variants: &'static [&'static str],
    pub taxonomy: Taxonomy,
    pub mcc: u16,
}

/// Registered brands in precedence order.
static BRANDS: &[BrandRecord] = &[
    // Coffee
    BrandRecord { id: "starbucks", variants: &["starbucks", "sbux"], taxonomy: Taxonomy::Coffee, mcc: 5814 },
    BrandRecord { id: "dunkin", variants: &["dunkin"], taxonomy: Taxonomy::Coffee, mcc: 5814 },
    BrandRecord { id: "peets", variants: &["peet's", "peets"], taxonomy: Taxonomy::Coffee, mcc: 5814 },
    BrandRecord { id: "blue_bottle", variants: &["blue bottle"], taxonomy: Taxonomy::Coffee, mcc: 5814 },
    // Dining. Applebee's sits above any future "apple" retail variant on
    // purpose; prefix matching would otherwise misroute it.
    BrandRecord { id: "applebees", variants: &["applebee's", "applebees"], taxonomy: Taxonomy::Dining, mcc: 5812 },
    BrandRecord { id: "mcdonalds", variants: &["mcdonald's", "mcdonalds"], taxonomy: Taxonomy::Dining, mcc: 5814 },
    BrandRecord { id: "chipotle", variants: &["chipotle"], taxonomy: Taxonomy::Dining, mcc: 5814 },
    BrandRecord { id: "subway", variants: &["subway"], taxonomy: Taxonomy::Dining, mcc: 5814 },
    BrandRecord { id: "taco_bell", variants: &["taco bell"], taxonomy: Taxonomy::Dining, mcc: 5814 },
    BrandRecord { id: "chick_fil_a", variants: &["chick fil a", "chickfila"], taxonomy: Taxonomy::Dining, mcc: 5814 },
    BrandRecord { id: "dominos", variants: &["domino's", "dominos"], taxonomy: Taxonomy::Dining, mcc: 5814 },
    BrandRecord { id: "panera", variants: &["panera"], taxonomy: Taxonomy::Dining, mcc: 5812 },
    BrandRecord { id: "wendys", variants: &["wendy's", "wendys"], taxonomy: Taxonomy::Dining, mcc: 5814 },
    BrandRecord { id: "burger_king", variants: &["burger king"], taxonomy: Taxonomy::Dining, mcc: 5814 },
    BrandRecord { id: "kfc", variants: &["kfc", "kentucky fried chicken"], taxonomy: Taxonomy::Dining, mcc: 5814 },
    BrandRecord { id: "olive_garden", variants: &["olive garden"], taxonomy: Taxonomy::Dining, mcc: 5812 },
    BrandRecord { id: "in_n_out", variants: &["in n out"], taxonomy: Taxonomy::Dining, mcc: 5814 },
    // Groceries
    BrandRecord { id: "whole_foods", variants: &["whole foods", "wholefds"], taxonomy: Taxonomy::Groceries, mcc: 5411 },
    BrandRecord { id: "trader_joes", variants: &["trader joe's", "trader joes"], taxonomy: Taxonomy::Groceries, mcc: 5411 },
    BrandRecord { id: "safeway", variants: &["safeway"], taxonomy: Taxonomy::Groceries, mcc: 5411 },
    BrandRecord { id: "kroger", variants: &["kroger"], taxonomy: Taxonomy::Groceries, mcc: 5411 },
    BrandRecord { id: "albertsons", variants: &["albertsons"], taxonomy: Taxonomy::Groceries, mcc: 5411 },
    BrandRecord { id: "publix", variants: &["publix"], taxonomy: Taxonomy::Groceries, mcc: 5411 },
    BrandRecord { id: "aldi", variants: &["aldi"], taxonomy: Taxonomy::Groceries, mcc: 5411 },
    // Gas
    BrandRecord { id: "shell", variants: &["shell"], taxonomy: Taxonomy::Gas, mcc: 5541 },
    BrandRecord { id: "chevron", variants: &["chevron"], taxonomy: Taxonomy::Gas, mcc: 5541 },
    BrandRecord { id: "exxon", variants: &["exxon", "exxonmobil"], taxonomy: Taxonomy::Gas, mcc: 5541 },
    BrandRecord { id: "mobil", variants: &["mobil"], taxonomy: Taxonomy::Gas, mcc: 5541 },
    BrandRecord { id: "bp", variants: &["bp"], taxonomy: Taxonomy::Gas, mcc: 5541 },
    BrandRecord { id: "sunoco", variants: &["sunoco"], taxonomy: Taxonomy::Gas, mcc: 5541 },
    // Pharmacy
    BrandRecord { id: "cvs", variants: &["cvs"], taxonomy: Taxonomy::Pharmacy, mcc: 5912 },
    BrandRecord { id: "walgreens", variants: &["walgreens", "walgreen"], taxonomy: Taxonomy::Pharmacy, mcc: 5912 },
    BrandRecord { id: "rite_aid", variants: &["rite aid"], taxonomy: Taxonomy::Pharmacy, mcc: 5912 },
    // Shopping
    BrandRecord { id: "walmart", variants: &["walmart", "wal mart"], taxonomy: Taxonomy::Shopping, mcc: 5311 },
    BrandRecord { id: "target", variants: &["target"], taxonomy: Taxonomy::Shopping, mcc: 5311 },
    BrandRecord { id: "costco", variants: &["costco"], taxonomy: Taxonomy::Shopping, mcc: 5300 },
    BrandRecord { id: "amazon", variants: &["amazon", "amzn"], taxonomy: Taxonomy::Shopping, mcc: 5399 },
    BrandRecord { id: "macys", variants: &["macy's", "macys"], taxonomy: Taxonomy::Shopping, mcc: 5311 },
    // Electronics
    BrandRecord { id: "best_buy", variants: &["best buy", "bestbuy"], taxonomy: Taxonomy::Electronics, mcc: 5732 },
    BrandRecord { id: "apple_store", variants: &["apple store"], taxonomy: Taxonomy::Electronics, mcc: 5732 },
    // Home improvement
    BrandRecord { id: "home_depot", variants: &["home depot", "the home depot"], taxonomy: Taxonomy::HomeImprovement, mcc: 5211 },
    BrandRecord { id: "lowes", variants: &["lowe's", "lowes"], taxonomy: Taxonomy::HomeImprovement, mcc: 5211 },
    BrandRecord { id: "ace_hardware", variants: &["ace hardware"], taxonomy: Taxonomy::HomeImprovement, mcc: 5251 },
    // Entertainment
    BrandRecord { id: "amc", variants: &["amc"], taxonomy: Taxonomy::Entertainment, mcc: 7832 },
    BrandRecord { id: "regal", variants: &["regal cinemas", "regal"], taxonomy: Taxonomy::Entertainment, mcc: 7832 },
    BrandRecord { id: "cinemark", variants: &["cinemark"], taxonomy: Taxonomy::Entertainment, mcc: 7832 },
    // Hotels
    BrandRecord { id: "marriott", variants: &["marriott", "courtyard by marriott"], taxonomy: Taxonomy::Hotels, mcc: 3509 },
    BrandRecord { id: "hilton", variants: &["hilton", "hampton inn"], taxonomy: Taxonomy::Hotels, mcc: 3504 },
    BrandRecord { id: "hyatt", variants: &["hyatt"], taxonomy: Taxonomy::Hotels, mcc: 3640 },
    BrandRecord { id: "holiday_inn", variants: &["holiday inn"], taxonomy: Taxonomy::Hotels, mcc: 3501 },
    BrandRecord { id: "best_western", variants: &["best western"], taxonomy: Taxonomy::Hotels, mcc: 3502 },
    BrandRecord { id: "sheraton", variants: &["sheraton"], taxonomy: Taxonomy::Hotels, mcc: 3503 },
    BrandRecord { id: "westin", variants: &["westin"], taxonomy: Taxonomy::Hotels, mcc: 3513 },
    BrandRecord { id: "ritz_carlton", variants: &["ritz carlton", "the ritz carlton"], taxonomy: Taxonomy::Hotels, mcc: 3710 },
    BrandRecord { id: "four_seasons", variants: &["four seasons"], taxonomy: Taxonomy::Hotels, mcc: 3543 },
    BrandRecord { id: "radisson", variants: &["radisson"], taxonomy: Taxonomy::Hotels, mcc: 3649 },
    // Airlines
    BrandRecord { id: "delta", variants: &["delta air lines", "delta airlines", "delta"], taxonomy: Taxonomy::Flights, mcc: 3058 },
    BrandRecord { id: "united", variants: &["united airlines", "united air"], taxonomy: Taxonomy::Flights, mcc: 3000 },
    BrandRecord { id: "american", variants: &["american airlines", "american air"], taxonomy: Taxonomy::Flights, mcc: 3001 },
    BrandRecord { id: "southwest", variants: &["southwest airlines", "southwest"], taxonomy: Taxonomy::Flights, mcc: 3066 },
    BrandRecord { id: "jetblue", variants: &["jetblue"], taxonomy: Taxonomy::Flights, mcc: 3174 },
    BrandRecord { id: "alaska", variants: &["alaska airlines", "alaska air"], taxonomy: Taxonomy::Flights, mcc: 3256 },
    // Rental cars
    BrandRecord { id: "hertz", variants: &["hertz"], taxonomy: Taxonomy::RentalCars, mcc: 3357 },
    BrandRecord { id: "avis", variants: &["avis"], taxonomy: Taxonomy::RentalCars, mcc: 3389 },
    BrandRecord { id: "enterprise", variants: &["enterprise rent a car", "enterprise"], taxonomy: Taxonomy::RentalCars, mcc: 3405 },
    // Travel
    BrandRecord { id: "uber", variants: &["uber"], taxonomy: Taxonomy::Travel, mcc: 4121 },
    BrandRecord { id: "lyft", variants: &["lyft"], taxonomy: Taxonomy::Travel, mcc: 4121 },
    BrandRecord { id: "airbnb", variants: &["airbnb"], taxonomy: Taxonomy::Travel, mcc: 4722 },
];

/// Read-only lookup over the static brand table.
///
/// Constructed once at process start and shared by reference; never mutated.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrandRegistry {
    _private: (),
}

impl BrandRegistry {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Look up a brand by raw name.
    ///
    /// The input is normalized, then compared for equality or a
    /// variant-prefix match against each registered brand, in registry order.
    pub fn find(&self, name: &str) -> Option<&'static BrandRecord> {
        let normalized = normalize(name);
        if normalized.is_empty() {
            return None;
        }

        BRANDS.iter().find(|brand| {
            brand
                .variants
                .iter()
                .any(|v| normalized == *v || normalized.starts_with(&format!("{} ", v)))
        })
    }

    /// All registered brands, in precedence order.
    pub fn records(&self) -> &'static [BrandRecord] {
        BRANDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let registry = BrandRegistry::new();
        let brand = registry.find("STARBUCKS").unwrap();
        assert_eq!(brand.id, "starbucks");
        assert_eq!(brand.taxonomy, Taxonomy::Coffee);
    }

    #[test]
    fn test_prefix_match() {
        let registry = BrandRegistry::new();
        let brand = registry.find("Starbucks Reserve Roastery").unwrap();
        assert_eq!(brand.id, "starbucks");

        let brand = registry.find("Marriott Downtown Seattle").unwrap();
        assert_eq!(brand.id, "marriott");
        assert_eq!(brand.taxonomy, Taxonomy::Hotels);
    }

    #[test]
    fn test_prefix_requires_word_boundary() {
        let registry = BrandRegistry::new();
        // "targette boutique" must not match "target"
        assert!(registry.find("Targette Boutique").is_none());
    }

    #[test]
    fn test_registry_order_disambiguates_prefixes() {
        let registry = BrandRegistry::new();
        let brand = registry.find("Applebee's Grill").unwrap();
        assert_eq!(brand.taxonomy, Taxonomy::Dining);
    }

    #[test]
    fn test_unknown_name() {
        let registry = BrandRegistry::new();
        assert!(registry.find("Joe's Corner Store").is_none());
        assert!(registry.find("").is_none());
    }

    #[test]
    fn test_airline_and_rental_brands() {
        let registry = BrandRegistry::new();
        assert_eq!(registry.find("Delta Air Lines Inc").unwrap().taxonomy, Taxonomy::Flights);
        assert_eq!(registry.find("Hertz Rent A Car").unwrap().taxonomy, Taxonomy::RentalCars);
    }
}
