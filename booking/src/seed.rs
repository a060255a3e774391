//! Built-in reference catalog.
//!
//! Two restaurants on one address, three sessions, the add-on list and a
//! handful of featured experiences scheduled relative to `today`.

use crate::catalog::{Catalog, CatalogData, CatalogError};
use crate::types::{
    Addon, ChargeBasis, ExperienceId, FeaturedExperience, Money, Restaurant, RestaurantId,
    Session, SessionId, UsagePolicy,
};
use chrono::{Days, NaiveDate};

/// Primary restaurant id
pub const PRIMARY_RESTAURANT: &str = "bellini";
/// Sister restaurant id
pub const SISTER_RESTAURANT: &str = "aurora";

/// Add-on ids used across the reference data
pub mod ids {
    use crate::types::AddonId;

    /// Set Menu - 4 Course
    pub const SET_MENU_4: AddonId = AddonId::new(1000);
    /// Set Menu - 6 Course
    pub const SET_MENU_6: AddonId = AddonId::new(1001);
    /// Set Menu - Large Party (6+)
    pub const LARGE_PARTY_MENU: AddonId = AddonId::new(1002);
    /// Wine Pairing (requires the 4 course menu)
    pub const WINE_PAIRING: AddonId = AddonId::new(1003);
    /// Premium Wine Pairing (requires the 6 course menu)
    pub const PREMIUM_WINE_PAIRING: AddonId = AddonId::new(1004);
    /// Champagne Bottle
    pub const CHAMPAGNE: AddonId = AddonId::new(1005);
    /// Celebration Cake
    pub const CAKE: AddonId = AddonId::new(1006);
    /// Rose Bouquet
    pub const ROSES: AddonId = AddonId::new(1007);
    /// Continental Breakfast
    pub const CONTINENTAL: AddonId = AddonId::new(2000);
    /// Full English Breakfast
    pub const FULL_ENGLISH: AddonId = AddonId::new(2001);
    /// Mimosa Flight
    pub const MIMOSAS: AddonId = AddonId::new(2002);
    /// Business Lunch Set
    pub const BUSINESS_LUNCH: AddonId = AddonId::new(3000);
    /// Leisurely Lunch
    pub const LEISURELY_LUNCH: AddonId = AddonId::new(3001);
    /// Wine by the Glass
    pub const WINE_BY_GLASS: AddonId = AddonId::new(3002);
    /// Omakase Tasting
    pub const OMAKASE: AddonId = AddonId::new(4000);
    /// Sake Pairing (requires the omakase)
    pub const SAKE_PAIRING: AddonId = AddonId::new(4001);
    /// Photo with Chef
    pub const CHEF_PHOTO: AddonId = AddonId::new(4002);
    /// Wine Tasting Flight (included)
    pub const TASTING_FLIGHT: AddonId = AddonId::new(5000);
    /// Reserve Wine Upgrade (requires the tasting flight)
    pub const RESERVE_UPGRADE: AddonId = AddonId::new(5001);
    /// Cheese Pairing Board
    pub const CHEESE_BOARD: AddonId = AddonId::new(5002);
}

fn times(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn restaurants() -> Vec<Restaurant> {
    vec![
        Restaurant {
            id: RestaurantId::new(PRIMARY_RESTAURANT),
            name: "Mudbrick".to_string(),
            location: "126 Church Bay Road, Oneroa, Waiheke Island".to_string(),
            description: "Contemporary Italian cuisine with a focus on fresh, seasonal ingredients \
                          and traditional techniques reimagined for the modern palate."
                .to_string(),
            cuisine: "Italian".to_string(),
            price_range: "$$$".to_string(),
            rating: 4.8,
            is_sister: false,
        },
        Restaurant {
            id: RestaurantId::new(SISTER_RESTAURANT),
            name: "Archive Bistro".to_string(),
            location: "126 Church Bay Road, Oneroa, Waiheke Island".to_string(),
            description: "Mediterranean-inspired dishes served in an elegant waterfront setting \
                          with panoramic views of the bay."
                .to_string(),
            cuisine: "Mediterranean".to_string(),
            price_range: "$$$".to_string(),
            rating: 4.7,
            is_sister: true,
        },
    ]
}

fn sessions() -> Vec<Session> {
    vec![
        Session {
            id: SessionId::new("breakfast"),
            name: "Breakfast".to_string(),
            time_range: "7:00 AM - 11:00 AM".to_string(),
            menu_policy: UsagePolicy::Optional,
            times: times(&[
                "7:00 AM", "7:30 AM", "8:00 AM", "8:30 AM", "9:00 AM", "9:30 AM", "10:00 AM", "10:30 AM",
            ]),
            peak: false,
        },
        Session {
            id: SessionId::new("lunch"),
            name: "Lunch".to_string(),
            time_range: "11:30 AM - 3:00 PM".to_string(),
            menu_policy: UsagePolicy::Optional,
            times: times(&[
                "11:30 AM", "12:00 PM", "12:30 PM", "1:00 PM", "1:30 PM", "2:00 PM", "2:30 PM",
            ]),
            peak: false,
        },
        Session {
            id: SessionId::new("dinner"),
            name: "Dinner".to_string(),
            time_range: "5:00 PM - 10:00 PM".to_string(),
            menu_policy: UsagePolicy::SharedMenu,
            times: times(&[
                "5:00 PM", "5:30 PM", "6:00 PM", "6:30 PM", "7:00 PM", "7:30 PM", "8:00 PM", "8:30 PM",
                "9:00 PM",
            ]),
            peak: true,
        },
    ]
}

fn addons() -> Vec<Addon> {
    use ChargeBasis::{Guest, Party};
    let cents = Money::from_cents;
    let all_day = ["dinner", "lunch", "breakfast"];

    vec![
        // Dinner set menus
        Addon::menu(1000, "Set Menu - 4 Course", "Our signature 4-course tasting menu with seasonal ingredients", cents(8500), Guest)
            .in_sessions(&["dinner"]),
        Addon::menu(1001, "Set Menu - 6 Course", "Extended tasting experience with chef's special courses", cents(12_500), Guest)
            .in_sessions(&["dinner"]),
        Addon::menu(1002, "Set Menu - Large Party", "Special group dining menu for parties of 6 or more", cents(7500), Guest)
            .for_parties(6, 20)
            .in_sessions(&["dinner"]),
        Addon::option(1003, "Wine Pairing", "Sommelier-selected wines paired with each course", cents(6500), Guest)
            .requires(ids::SET_MENU_4)
            .in_sessions(&["dinner"]),
        Addon::option(1004, "Premium Wine Pairing", "Reserve wine selections paired with each course", cents(9500), Guest)
            .requires(ids::SET_MENU_6)
            .in_sessions(&["dinner"]),
        Addon::option(1005, "Champagne Bottle", "Dom Pérignon Vintage 2012, chilled and ready for your arrival", cents(25_000), Party)
            .in_sessions(&["dinner"]),
        Addon::option(1006, "Celebration Cake", "Custom decorated chocolate or vanilla cake, serves 4-6", cents(6500), Party)
            .in_sessions(&all_day),
        Addon::option(1007, "Rose Bouquet", "Fresh red roses arranged at your table upon arrival", cents(4500), Party)
            .in_sessions(&all_day),
        // Breakfast
        Addon::menu(2000, "Continental Breakfast", "Fresh pastries, fruits, and artisan breads", cents(2800), Guest)
            .in_sessions(&["breakfast"]),
        Addon::menu(2001, "Full English Breakfast", "Traditional full breakfast with eggs, bacon, and all the trimmings", cents(3500), Guest)
            .in_sessions(&["breakfast"]),
        Addon::option(2002, "Mimosa Flight", "Four artisanal mimosas with fresh-squeezed juices", cents(3500), Party)
            .in_sessions(&["breakfast"]),
        // Lunch
        Addon::menu(3000, "Business Lunch Set", "Quick 2-course lunch ideal for business meetings", cents(4500), Guest)
            .in_sessions(&["lunch"]),
        Addon::menu(3001, "Leisurely Lunch", "Relaxed 3-course lunch with no time pressure", cents(5500), Guest)
            .in_sessions(&["lunch"]),
        Addon::option(3002, "Wine by the Glass", "Premium selection from our curated wine list", cents(1800), Guest)
            .in_sessions(&["lunch"]),
        // Chef's table
        Addon::menu(4000, "Omakase Tasting", "7-course chef's selection menu for the experience", cents(19_500), Guest)
            .for_parties(1, 8)
            .in_experiences(&["chef-table-1"]),
        Addon::option(4001, "Sake Pairing", "Premium sake selections paired with each course", cents(6500), Guest)
            .for_parties(1, 8)
            .requires(ids::OMAKASE)
            .in_experiences(&["chef-table-1"]),
        Addon::option(4002, "Photo with Chef", "Commemorative photo and signed menu from Chef Marco", cents(2500), Party)
            .for_parties(1, 8)
            .in_experiences(&["chef-table-1"]),
        // Wine evening
        Addon::menu(5000, "Wine Tasting Flight", "6 premium Tuscan wines included with your experience", Money::ZERO, Guest)
            .for_parties(1, 12)
            .in_experiences(&["wine-tasting-1"]),
        Addon::option(5001, "Reserve Wine Upgrade", "Upgrade to rare reserve vintages for your tasting", cents(5000), Guest)
            .for_parties(1, 12)
            .requires(ids::TASTING_FLIGHT)
            .in_experiences(&["wine-tasting-1"]),
        Addon::option(5002, "Cheese Pairing Board", "Artisan cheeses selected to complement each wine", cents(3500), Party)
            .for_parties(1, 12)
            .in_experiences(&["wine-tasting-1"]),
    ]
}

struct ExperienceSeed {
    id: &'static str,
    restaurant: &'static str,
    days_ahead: u64,
    session: &'static str,
    name: &'static str,
    description: &'static str,
    dollars: i64,
    times: &'static [&'static str],
    policy: UsagePolicy,
}

const EXPERIENCES: &[ExperienceSeed] = &[
    ExperienceSeed {
        id: "wine-tasting-1",
        restaurant: PRIMARY_RESTAURANT,
        days_ahead: 3,
        session: "dinner",
        name: "Tuscan Wine Evening",
        description: "Join our sommelier for an exclusive journey through Tuscany's finest wines paired with chef's selections",
        dollars: 125,
        times: &["6:30 PM", "7:00 PM", "8:00 PM"],
        policy: UsagePolicy::SharedMenu,
    },
    ExperienceSeed {
        id: "chef-table-1",
        restaurant: PRIMARY_RESTAURANT,
        days_ahead: 3,
        session: "dinner",
        name: "Chef's Omakase Night",
        description: "An intimate 7-course tasting menu crafted tableside by Chef Marco",
        dollars: 195,
        times: &["6:00 PM", "8:30 PM"],
        policy: UsagePolicy::SharedMenu,
    },
    ExperienceSeed {
        id: "brunch-special",
        restaurant: PRIMARY_RESTAURANT,
        days_ahead: 5,
        session: "breakfast",
        name: "Champagne Brunch",
        description: "Unlimited champagne paired with our weekend brunch tasting menu",
        dollars: 95,
        times: &["9:00 AM", "9:30 AM", "10:00 AM", "10:30 AM"],
        policy: UsagePolicy::Optional,
    },
    ExperienceSeed {
        id: "sunset-dinner",
        restaurant: SISTER_RESTAURANT,
        days_ahead: 4,
        session: "dinner",
        name: "Sunset Dinner Experience",
        description: "Premium waterfront seating with a curated sunset menu as the sun sets over the bay",
        dollars: 85,
        times: &["5:30 PM", "6:00 PM", "6:30 PM"],
        policy: UsagePolicy::SharedMenu,
    },
    ExperienceSeed {
        id: "seafood-feast",
        restaurant: SISTER_RESTAURANT,
        days_ahead: 7,
        session: "dinner",
        name: "Mediterranean Seafood Feast",
        description: "Private dining experience featuring the freshest catch and Mediterranean traditions",
        dollars: 175,
        times: &["7:00 PM"],
        policy: UsagePolicy::PerGuest,
    },
    ExperienceSeed {
        id: "wine-lunch",
        restaurant: SISTER_RESTAURANT,
        days_ahead: 5,
        session: "lunch",
        name: "Wine & Dine Lunch",
        description: "A relaxed afternoon of fine wines paired with our signature lunch courses",
        dollars: 85,
        times: &["12:00 PM", "12:30 PM", "1:00 PM", "1:30 PM"],
        policy: UsagePolicy::Optional,
    },
];

fn experiences(today: NaiveDate) -> Vec<FeaturedExperience> {
    EXPERIENCES
        .iter()
        .map(|seed| FeaturedExperience {
            id: ExperienceId::new(seed.id),
            restaurant_id: RestaurantId::new(seed.restaurant),
            date: today + Days::new(seed.days_ahead),
            session_id: SessionId::new(seed.session),
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            price_per_person: Money::from_dollars(seed.dollars),
            available_times: times(seed.times),
            menu_policy: seed.policy,
        })
        .collect()
}

/// The reference catalog with experiences scheduled relative to `today`
///
/// # Errors
///
/// Returns a [`CatalogError`] if the built-in data fails validation.
pub fn reference_catalog(today: NaiveDate) -> Result<Catalog, CatalogError> {
    Catalog::new(CatalogData {
        restaurants: restaurants(),
        sessions: sessions(),
        addons: addons(),
        experiences: experiences(today),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn reference_catalog_is_valid() {
        let catalog = reference_catalog(today()).unwrap();
        assert_eq!(catalog.addons().len(), 20);
        assert_eq!(catalog.sessions().len(), 3);
        assert_eq!(catalog.experiences().len(), 6);
    }

    #[test]
    fn dependent_options_point_at_menus() {
        let catalog = reference_catalog(today()).unwrap();
        let parent = |id| catalog.addon(id).and_then(|a| a.parent);

        assert_eq!(parent(ids::WINE_PAIRING), Some(ids::SET_MENU_4));
        assert_eq!(parent(ids::PREMIUM_WINE_PAIRING), Some(ids::SET_MENU_6));
        assert_eq!(parent(ids::SAKE_PAIRING), Some(ids::OMAKASE));
        assert_eq!(parent(ids::RESERVE_UPGRADE), Some(ids::TASTING_FLIGHT));
        assert_eq!(parent(ids::CHAMPAGNE), None);
    }

    #[test]
    fn experiences_are_scheduled_from_today() {
        let catalog = reference_catalog(today()).unwrap();
        let primary = RestaurantId::new(PRIMARY_RESTAURANT);
        let in_three_days = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();

        let names: Vec<_> = catalog
            .experiences_on(&primary, in_three_days)
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(names, ["wine-tasting-1", "chef-table-1"]);
        assert!(!catalog.has_experiences_on(&primary, today()));
    }

    #[test]
    fn sister_venue_is_the_other_restaurant() {
        let catalog = reference_catalog(today()).unwrap();
        let sister = catalog.sister_of(&RestaurantId::new(PRIMARY_RESTAURANT)).unwrap();
        assert_eq!(sister.id.as_str(), SISTER_RESTAURANT);
    }
}
