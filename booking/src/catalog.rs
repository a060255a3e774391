//! Read-only reference data: restaurants, sessions, add-ons and experiences.
//!
//! A [`Catalog`] is validated once when it is built and never mutated
//! afterwards, so reducers can share it behind an `Arc`.

use crate::types::{
    Addon, AddonId, AddonKind, ExperienceId, FeaturedExperience, Restaurant, RestaurantId, Session,
    SessionId, UsagePolicy,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Reasons a catalog is rejected
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Two add-ons share an id
    #[error("Duplicate addon id {0}")]
    DuplicateAddon(AddonId),

    /// Two sessions share an id
    #[error("Duplicate session id {0}")]
    DuplicateSession(SessionId),

    /// Two experiences share an id
    #[error("Duplicate experience id {0}")]
    DuplicateExperience(ExperienceId),

    /// Two restaurants share an id
    #[error("Duplicate restaurant id {0}")]
    DuplicateRestaurant(RestaurantId),

    /// An add-on names a parent that does not exist
    #[error("Addon {addon} depends on unknown addon {parent}")]
    UnknownParent {
        /// The dependent add-on
        addon: AddonId,
        /// The missing parent
        parent: AddonId,
    },

    /// An add-on names itself as parent
    #[error("Addon {0} cannot depend on itself")]
    SelfParent(AddonId),

    /// Only options may depend on a menu
    #[error("Menu {0} cannot depend on another addon")]
    MenuWithParent(AddonId),

    /// The parent of an option is not a menu
    #[error("Addon {addon} depends on {parent}, which is not a menu")]
    ParentNotMenu {
        /// The dependent add-on
        addon: AddonId,
        /// The parent that is not a menu
        parent: AddonId,
    },

    /// Party bounds are empty or start at zero
    #[error("Addon {addon} has invalid party bounds {min}..={max}")]
    InvalidPartyBounds {
        /// The add-on
        addon: AddonId,
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },

    /// An experience is hosted by an unknown restaurant
    #[error("Experience {experience} references unknown restaurant {restaurant}")]
    UnknownRestaurant {
        /// The experience
        experience: ExperienceId,
        /// The missing restaurant
        restaurant: RestaurantId,
    },

    /// An experience runs in an unknown session
    #[error("Experience {experience} references unknown session {session}")]
    UnknownSession {
        /// The experience
        experience: ExperienceId,
        /// The missing session
        session: SessionId,
    },

    /// The catalog document is malformed
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog file could not be read
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialized form of a catalog
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    /// Restaurants, primary first
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,
    /// Sessions in display order
    #[serde(default)]
    pub sessions: Vec<Session>,
    /// Add-ons in display order
    #[serde(default)]
    pub addons: Vec<Addon>,
    /// Featured experiences
    #[serde(default)]
    pub experiences: Vec<FeaturedExperience>,
}

/// Validated, immutable reference data
#[derive(Clone, Debug)]
pub struct Catalog {
    data: CatalogData,
    addon_index: HashMap<AddonId, usize>,
}

impl Catalog {
    /// Validates and indexes reference data
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on duplicate ids, dangling or invalid
    /// parent references, empty party bounds, or experiences that point at
    /// unknown restaurants or sessions.
    pub fn new(data: CatalogData) -> Result<Self, CatalogError> {
        let mut restaurant_ids = HashSet::new();
        for restaurant in &data.restaurants {
            if !restaurant_ids.insert(&restaurant.id) {
                return Err(CatalogError::DuplicateRestaurant(restaurant.id.clone()));
            }
        }

        let mut session_ids = HashSet::new();
        for session in &data.sessions {
            if !session_ids.insert(&session.id) {
                return Err(CatalogError::DuplicateSession(session.id.clone()));
            }
        }

        let mut addon_index = HashMap::with_capacity(data.addons.len());
        for (position, addon) in data.addons.iter().enumerate() {
            if addon_index.insert(addon.id, position).is_some() {
                return Err(CatalogError::DuplicateAddon(addon.id));
            }
            if addon.min_party == 0 || addon.min_party > addon.max_party {
                return Err(CatalogError::InvalidPartyBounds {
                    addon: addon.id,
                    min: addon.min_party,
                    max: addon.max_party,
                });
            }
        }

        for addon in &data.addons {
            let Some(parent) = addon.parent else {
                continue;
            };
            if addon.kind == AddonKind::Menu {
                return Err(CatalogError::MenuWithParent(addon.id));
            }
            if parent == addon.id {
                return Err(CatalogError::SelfParent(addon.id));
            }
            match addon_index.get(&parent).map(|&i| &data.addons[i]) {
                None => {
                    return Err(CatalogError::UnknownParent {
                        addon: addon.id,
                        parent,
                    });
                },
                Some(parent_addon) if !parent_addon.is_menu() => {
                    return Err(CatalogError::ParentNotMenu {
                        addon: addon.id,
                        parent,
                    });
                },
                Some(_) => {},
            }
        }

        let mut experience_ids = HashSet::new();
        for experience in &data.experiences {
            if !experience_ids.insert(&experience.id) {
                return Err(CatalogError::DuplicateExperience(experience.id.clone()));
            }
            if !restaurant_ids.contains(&experience.restaurant_id) {
                return Err(CatalogError::UnknownRestaurant {
                    experience: experience.id.clone(),
                    restaurant: experience.restaurant_id.clone(),
                });
            }
            if !session_ids.contains(&experience.session_id) {
                return Err(CatalogError::UnknownSession {
                    experience: experience.id.clone(),
                    session: experience.session_id.clone(),
                });
            }
        }

        tracing::debug!(
            restaurants = data.restaurants.len(),
            sessions = data.sessions.len(),
            addons = data.addons.len(),
            experiences = data.experiences.len(),
            "catalog loaded"
        );

        Ok(Self { data, addon_index })
    }

    /// Parses and validates a JSON catalog document
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON (including unknown
    /// usage policy codes) and any validation error from [`Catalog::new`].
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data)
    }

    /// Reads a JSON catalog document from disk
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, otherwise as
    /// [`Catalog::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes the catalog as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// The underlying data
    #[must_use]
    pub const fn data(&self) -> &CatalogData {
        &self.data
    }

    /// All add-ons in catalog order
    #[must_use]
    pub fn addons(&self) -> &[Addon] {
        &self.data.addons
    }

    /// Looks up an add-on by id
    #[must_use]
    pub fn addon(&self, id: AddonId) -> Option<&Addon> {
        self.addon_index.get(&id).map(|&i| &self.data.addons[i])
    }

    /// All sessions
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.data.sessions
    }

    /// Looks up a session
    #[must_use]
    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.data.sessions.iter().find(|s| &s.id == id)
    }

    /// All restaurants
    #[must_use]
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.data.restaurants
    }

    /// Looks up a restaurant
    #[must_use]
    pub fn restaurant(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.data.restaurants.iter().find(|r| &r.id == id)
    }

    /// The sister venue offered alongside `id`, if any
    #[must_use]
    pub fn sister_of(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.data
            .restaurants
            .iter()
            .find(|r| r.is_sister && &r.id != id)
    }

    /// All featured experiences
    #[must_use]
    pub fn experiences(&self) -> &[FeaturedExperience] {
        &self.data.experiences
    }

    /// Looks up an experience
    #[must_use]
    pub fn experience(&self, id: &ExperienceId) -> Option<&FeaturedExperience> {
        self.data.experiences.iter().find(|e| &e.id == id)
    }

    /// Experiences hosted by `restaurant` on `date`
    pub fn experiences_on<'a>(
        &'a self,
        restaurant: &'a RestaurantId,
        date: NaiveDate,
    ) -> impl Iterator<Item = &'a FeaturedExperience> + 'a {
        self.data
            .experiences
            .iter()
            .filter(move |e| &e.restaurant_id == restaurant && e.date == date)
    }

    /// Experiences hosted by `restaurant` on `date` during `session`
    pub fn experiences_for_session<'a>(
        &'a self,
        restaurant: &'a RestaurantId,
        date: NaiveDate,
        session: &'a SessionId,
    ) -> impl Iterator<Item = &'a FeaturedExperience> + 'a {
        self.experiences_on(restaurant, date)
            .filter(move |e| &e.session_id == session)
    }

    /// Returns true if `restaurant` hosts anything on `date`
    #[must_use]
    pub fn has_experiences_on(&self, restaurant: &RestaurantId, date: NaiveDate) -> bool {
        self.experiences_on(restaurant, date).next().is_some()
    }

    /// Experiences hosted by `restaurant` from `today` on, soonest first
    #[must_use]
    pub fn upcoming_experiences(
        &self,
        restaurant: &RestaurantId,
        today: NaiveDate,
    ) -> Vec<&FeaturedExperience> {
        let mut upcoming: Vec<_> = self
            .data
            .experiences
            .iter()
            .filter(|e| &e.restaurant_id == restaurant && e.date >= today)
            .collect();
        upcoming.sort_by_key(|e| e.date);
        upcoming
    }

    /// The menu policy of an experience, if it exists
    #[must_use]
    pub fn experience_policy(&self, id: &ExperienceId) -> Option<UsagePolicy> {
        self.experience(id).map(|e| e.menu_policy)
    }

    /// The menu policy of a session, if it exists
    #[must_use]
    pub fn session_policy(&self, id: &SessionId) -> Option<UsagePolicy> {
        self.session(id).map(|s| s.menu_policy)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{ChargeBasis, Money};

    fn menu(id: u32) -> Addon {
        Addon::menu(id, "Menu", "", Money::from_cents(1000), ChargeBasis::Guest).in_sessions(&["dinner"])
    }

    fn option(id: u32) -> Addon {
        Addon::option(id, "Option", "", Money::from_cents(500), ChargeBasis::Party).in_sessions(&["dinner"])
    }

    fn data_with(addons: Vec<Addon>) -> CatalogData {
        CatalogData {
            addons,
            ..CatalogData::default()
        }
    }

    #[test]
    fn rejects_duplicate_addon_ids() {
        let result = Catalog::new(data_with(vec![menu(1), menu(1)]));
        assert!(matches!(result, Err(CatalogError::DuplicateAddon(id)) if id == AddonId::new(1)));
    }

    #[test]
    fn rejects_dangling_parent() {
        let result = Catalog::new(data_with(vec![option(2).requires(AddonId::new(9))]));
        assert!(matches!(result, Err(CatalogError::UnknownParent { .. })));
    }

    #[test]
    fn rejects_self_parent() {
        let result = Catalog::new(data_with(vec![option(2).requires(AddonId::new(2))]));
        assert!(matches!(result, Err(CatalogError::SelfParent(_))));
    }

    #[test]
    fn rejects_option_parent() {
        let result = Catalog::new(data_with(vec![option(1), option(2).requires(AddonId::new(1))]));
        assert!(matches!(result, Err(CatalogError::ParentNotMenu { .. })));
    }

    #[test]
    fn rejects_menu_with_parent() {
        let result = Catalog::new(data_with(vec![menu(1), menu(2).requires(AddonId::new(1))]));
        assert!(matches!(result, Err(CatalogError::MenuWithParent(_))));
    }

    #[test]
    fn rejects_empty_party_bounds() {
        let result = Catalog::new(data_with(vec![menu(1).for_parties(6, 2)]));
        assert!(matches!(result, Err(CatalogError::InvalidPartyBounds { min: 6, max: 2, .. })));

        let result = Catalog::new(data_with(vec![menu(1).for_parties(0, 2)]));
        assert!(matches!(result, Err(CatalogError::InvalidPartyBounds { .. })));
    }

    #[test]
    fn addon_lookup_by_id() {
        let catalog = Catalog::new(data_with(vec![menu(1), option(2).requires(AddonId::new(1))])).unwrap();
        assert_eq!(catalog.addon(AddonId::new(2)).and_then(|a| a.parent), Some(AddonId::new(1)));
        assert!(catalog.addon(AddonId::new(3)).is_none());
    }
}
