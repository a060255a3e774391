//! Domain types for the reservation wizard.
//!
//! Value objects and reference records: identifiers, money, add-ons,
//! sessions, featured experiences and restaurants. Reference records are
//! immutable once loaded into a [`Catalog`](crate::catalog::Catalog).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable identifier of a catalog add-on
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddonId(u32);

impl AddonId {
    /// Creates an `AddonId` from its numeric value
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AddonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier from a string
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the inner string value
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a dining session (breakfast, lunch, dinner)
    SessionId
);
string_id!(
    /// Identifier of a featured experience
    ExperienceId
);
string_id!(
    /// Identifier of a restaurant
    RestaurantId
);

// ============================================================================
// Money
// ============================================================================

/// Money amount in cents (to avoid floating point issues)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates a new money amount from cents
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates a new money amount from whole dollars
    #[must_use]
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// Returns the value in cents
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Multiplies by a count (guests or quantity)
    #[must_use]
    pub fn times(self, count: u32) -> Self {
        Self(self.0 * i64::from(count))
    }

    /// Returns true for a zero amount
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

// ============================================================================
// Add-ons
// ============================================================================

/// How an add-on's price is multiplied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeBasis {
    /// Price per assigned guest
    Guest,
    /// Flat price per unit ordered
    Party,
}

/// Whether an add-on is a meal selection or an extra
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddonKind {
    /// A full meal selection, governed by the usage policy
    Menu,
    /// An extra, optionally unlocked by a specific menu
    Option,
}

impl fmt::Display for AddonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Menu => f.write_str("menu"),
            Self::Option => f.write_str("option"),
        }
    }
}

/// A purchasable catalog item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    /// Stable identifier
    pub id: AddonId,
    /// Display name
    pub name: String,
    /// Display description
    #[serde(default)]
    pub description: String,
    /// Unit price
    pub price: Money,
    /// Charge basis
    pub basis: ChargeBasis,
    /// Menu or option
    pub kind: AddonKind,
    /// Smallest party this add-on is offered to (inclusive)
    pub min_party: u32,
    /// Largest party this add-on is offered to (inclusive)
    pub max_party: u32,
    /// Menu that must be selected before this option is selectable
    #[serde(default)]
    pub parent: Option<AddonId>,
    /// Sessions this add-on is offered in (plain session browsing)
    #[serde(default)]
    pub session_ids: Vec<SessionId>,
    /// Experiences this add-on is offered in
    #[serde(default)]
    pub experience_ids: Vec<ExperienceId>,
}

impl Addon {
    fn new(id: u32, name: &str, description: &str, price: Money, basis: ChargeBasis, kind: AddonKind) -> Self {
        Self {
            id: AddonId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            price,
            basis,
            kind,
            min_party: 1,
            max_party: 20,
            parent: None,
            session_ids: Vec::new(),
            experience_ids: Vec::new(),
        }
    }

    /// Creates a menu offered to parties of 1–20
    #[must_use]
    pub fn menu(id: u32, name: &str, description: &str, price: Money, basis: ChargeBasis) -> Self {
        Self::new(id, name, description, price, basis, AddonKind::Menu)
    }

    /// Creates an option offered to parties of 1–20
    #[must_use]
    pub fn option(id: u32, name: &str, description: &str, price: Money, basis: ChargeBasis) -> Self {
        Self::new(id, name, description, price, basis, AddonKind::Option)
    }

    /// Restricts the party sizes this add-on is offered to
    #[must_use]
    pub const fn for_parties(mut self, min: u32, max: u32) -> Self {
        self.min_party = min;
        self.max_party = max;
        self
    }

    /// Makes this option depend on a menu
    #[must_use]
    pub const fn requires(mut self, parent: AddonId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Offers this add-on in the given sessions
    #[must_use]
    pub fn in_sessions(mut self, sessions: &[&str]) -> Self {
        self.session_ids = sessions.iter().copied().map(SessionId::new).collect();
        self
    }

    /// Offers this add-on in the given experiences
    #[must_use]
    pub fn in_experiences(mut self, experiences: &[&str]) -> Self {
        self.experience_ids = experiences.iter().copied().map(ExperienceId::new).collect();
        self
    }

    /// Returns true for menus
    #[must_use]
    pub fn is_menu(&self) -> bool {
        self.kind == AddonKind::Menu
    }

    /// Returns true if `party_size` falls within `[min_party, max_party]`
    #[must_use]
    pub const fn accepts_party(&self, party_size: u32) -> bool {
        party_size >= self.min_party && party_size <= self.max_party
    }

    /// Returns true if this add-on may be offered under `context`
    ///
    /// Experience-tagged add-ons are never offered while browsing a plain session.
    #[must_use]
    pub fn offered_in(&self, context: &AddonContext) -> bool {
        match context {
            AddonContext::Experience(experience) => self.experience_ids.contains(experience),
            AddonContext::Session(session) => {
                self.experience_ids.is_empty() && self.session_ids.contains(session)
            },
        }
    }
}

// ============================================================================
// Usage policy
// ============================================================================

/// Rule set governing how menus may be selected for a session or experience
///
/// Serialized as its numeric code (0–4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UsagePolicy {
    /// 0: no menu step
    NoMenu,
    /// 1: one menu shared by the whole party
    SharedMenu,
    /// 2: every guest is assigned a menu
    PerGuest,
    /// 3: optional, independent selection
    Optional,
    /// 4: some guests are assigned a menu
    PartialPerGuest,
}

impl UsagePolicy {
    /// Numeric code of this policy
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::NoMenu => 0,
            Self::SharedMenu => 1,
            Self::PerGuest => 2,
            Self::Optional => 3,
            Self::PartialPerGuest => 4,
        }
    }

    /// Short guidance shown above the menu list (empty for `NoMenu`)
    #[must_use]
    pub fn guidance(self, party_size: u32) -> String {
        match self {
            Self::NoMenu => String::new(),
            Self::SharedMenu => "All guests will have the same menu selection".to_string(),
            Self::PerGuest => format!("Assign a menu to each of your {party_size} guests"),
            Self::Optional => "Optionally pre-order items for your visit".to_string(),
            Self::PartialPerGuest => "Select menus for some or all guests".to_string(),
        }
    }
}

/// A usage policy code outside 0–4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unknown usage policy code {0}")]
pub struct UnknownPolicy(pub u8);

impl TryFrom<u8> for UsagePolicy {
    type Error = UnknownPolicy;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NoMenu),
            1 => Ok(Self::SharedMenu),
            2 => Ok(Self::PerGuest),
            3 => Ok(Self::Optional),
            4 => Ok(Self::PartialPerGuest),
            other => Err(UnknownPolicy(other)),
        }
    }
}

impl From<UsagePolicy> for u8 {
    fn from(policy: UsagePolicy) -> Self {
        policy.code()
    }
}

impl fmt::Display for UsagePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoMenu => "no menu",
            Self::SharedMenu => "shared menu",
            Self::PerGuest => "per-guest menus",
            Self::Optional => "optional menus",
            Self::PartialPerGuest => "partial per-guest menus",
        };
        write!(f, "{name} ({})", self.code())
    }
}

// ============================================================================
// Sessions, experiences, restaurants
// ============================================================================

/// A named dining window
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identifier
    pub id: SessionId,
    /// Display name
    pub name: String,
    /// Display time range
    #[serde(default)]
    pub time_range: String,
    /// Menu policy for plain session bookings
    pub menu_policy: UsagePolicy,
    /// Bookable times, in order
    #[serde(default)]
    pub times: Vec<String>,
    /// Peak sessions close at the primary restaurant on busy weekend days
    #[serde(default)]
    pub peak: bool,
}

/// A date- and session-bound special event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedExperience {
    /// Identifier
    pub id: ExperienceId,
    /// Hosting restaurant
    pub restaurant_id: RestaurantId,
    /// Date of the event
    pub date: NaiveDate,
    /// Session the event runs in
    pub session_id: SessionId,
    /// Display name
    pub name: String,
    /// Display description
    #[serde(default)]
    pub description: String,
    /// Price per person
    pub price_per_person: Money,
    /// Bookable times; these replace the session's slots
    pub available_times: Vec<String>,
    /// Menu policy while this experience is chosen
    pub menu_policy: UsagePolicy,
}

/// A restaurant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Identifier
    pub id: RestaurantId,
    /// Display name
    pub name: String,
    /// Street address
    #[serde(default)]
    pub location: String,
    /// Display description
    #[serde(default)]
    pub description: String,
    /// Cuisine
    #[serde(default)]
    pub cuisine: String,
    /// Price range marker ("$$$")
    #[serde(default)]
    pub price_range: String,
    /// Guest rating
    #[serde(default)]
    pub rating: f32,
    /// Sister venue offered when the primary is fully booked
    #[serde(default)]
    pub is_sister: bool,
}

/// A bookable time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Display time ("7:30 PM")
    pub time: String,
    /// Whether the slot can be booked
    pub available: bool,
}

impl TimeSlot {
    /// Creates a slot
    #[must_use]
    pub fn new(time: impl Into<String>, available: bool) -> Self {
        Self {
            time: time.into(),
            available,
        }
    }
}

// ============================================================================
// Context
// ============================================================================

/// The session or experience add-ons are resolved against
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddonContext {
    /// Plain session browsing
    Session(SessionId),
    /// A featured experience
    Experience(ExperienceId),
}

impl AddonContext {
    /// Builds a context from optional parts; an experience takes precedence
    #[must_use]
    pub fn from_parts(session: Option<&SessionId>, experience: Option<&ExperienceId>) -> Option<Self> {
        match (experience, session) {
            (Some(experience), _) => Some(Self::Experience(experience.clone())),
            (None, Some(session)) => Some(Self::Session(session.clone())),
            (None, None) => None,
        }
    }
}

/// What the booking collaborator hands the add-on engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingContext {
    /// Chosen session, if any
    pub session_id: Option<SessionId>,
    /// Chosen experience, if any
    pub experience_id: Option<ExperienceId>,
    /// Number of guests (at least 1)
    pub party_size: u32,
}

impl BookingContext {
    /// The context add-ons are filtered by
    #[must_use]
    pub fn addon_context(&self) -> Option<AddonContext> {
        AddonContext::from_parts(self.session_id.as_ref(), self.experience_id.as_ref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn money_display() {
        assert_eq!(Money::from_cents(8500).to_string(), "$85.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-1250).to_string(), "-$12.50");
        assert_eq!(Money::from_dollars(125).cents(), 12_500);
    }

    #[test]
    fn money_times_and_sum() {
        let total: Money = [Money::from_cents(8500).times(4), Money::from_cents(6500).times(4)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(60_000));
    }

    #[test]
    fn policy_codes_round_trip() {
        for code in 0..=4u8 {
            let policy = UsagePolicy::try_from(code).unwrap();
            assert_eq!(u8::from(policy), code);
        }
        assert_eq!(UsagePolicy::try_from(5), Err(UnknownPolicy(5)));
    }

    #[test]
    fn policy_serializes_as_code() {
        let json = serde_json::to_string(&UsagePolicy::PerGuest).unwrap();
        assert_eq!(json, "2");
        let parsed: Result<UsagePolicy, _> = serde_json::from_str("9");
        assert!(parsed.is_err());
    }

    #[test]
    fn experience_takes_precedence() {
        let session = SessionId::new("dinner");
        let experience = ExperienceId::new("chef-table-1");

        assert_eq!(
            AddonContext::from_parts(Some(&session), Some(&experience)),
            Some(AddonContext::Experience(experience))
        );
        assert_eq!(
            AddonContext::from_parts(Some(&session), None),
            Some(AddonContext::Session(session))
        );
        assert_eq!(AddonContext::from_parts(None, None), None);
    }

    #[test]
    fn experience_tags_exclude_session_browsing() {
        let tagged_both = Addon::option(9, "Both", "", Money::ZERO, ChargeBasis::Party)
            .in_sessions(&["dinner"])
            .in_experiences(&["chef-table-1"]);

        assert!(!tagged_both.offered_in(&AddonContext::Session(SessionId::new("dinner"))));
        assert!(tagged_both.offered_in(&AddonContext::Experience(ExperienceId::new("chef-table-1"))));
    }

    #[test]
    fn party_bounds_are_inclusive() {
        let large = Addon::menu(1002, "Large Party", "", Money::ZERO, ChargeBasis::Guest).for_parties(6, 20);
        assert!(!large.accepts_party(5));
        assert!(large.accepts_party(6));
        assert!(large.accepts_party(20));
        assert!(!large.accepts_party(21));
    }
}
