//! Which add-ons may be offered for a booking context.

use crate::catalog::Catalog;
use crate::types::{Addon, AddonContext, AddonId, UsagePolicy};
use serde::{Deserialize, Serialize};

/// Policy applied when the context names an unknown session or experience
pub const FALLBACK_POLICY: UsagePolicy = UsagePolicy::Optional;

/// Anything that can resolve an add-on by id
pub trait AddonLookup {
    /// Looks up an add-on
    fn addon(&self, id: AddonId) -> Option<&Addon>;
}

impl AddonLookup for Catalog {
    fn addon(&self, id: AddonId) -> Option<&Addon> {
        Catalog::addon(self, id)
    }
}

/// The add-ons eligible for one booking context, split by kind
///
/// Both lists keep catalog order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offerable {
    /// Eligible menus
    pub menus: Vec<Addon>,
    /// Eligible options (dependent or not)
    pub options: Vec<Addon>,
}

impl Offerable {
    /// Returns true when nothing is offered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty() && self.options.is_empty()
    }

    /// Offered menu by id
    #[must_use]
    pub fn menu(&self, id: AddonId) -> Option<&Addon> {
        self.menus.iter().find(|a| a.id == id)
    }

    /// Offered option by id
    #[must_use]
    pub fn option(&self, id: AddonId) -> Option<&Addon> {
        self.options.iter().find(|a| a.id == id)
    }

    /// All offered add-ons, menus first
    pub fn iter(&self) -> impl Iterator<Item = &Addon> {
        self.menus.iter().chain(&self.options)
    }
}

impl AddonLookup for Offerable {
    fn addon(&self, id: AddonId) -> Option<&Addon> {
        self.iter().find(|a| a.id == id)
    }
}

/// Resolves the add-ons offered for `context` and `party_size`
///
/// Experience context: add-ons tagged with that experience. Session context:
/// add-ons tagged with the session and with no experience tags. Either way
/// the party size must fall within the add-on's bounds. No context means
/// nothing is offered.
#[must_use]
pub fn resolve_offerable(catalog: &Catalog, context: Option<&AddonContext>, party_size: u32) -> Offerable {
    let Some(context) = context else {
        return Offerable::default();
    };

    let (menus, options) = catalog
        .addons()
        .iter()
        .filter(|addon| addon.offered_in(context) && addon.accepts_party(party_size))
        .cloned()
        .partition(Addon::is_menu);

    Offerable { menus, options }
}

/// Options that are currently selectable
///
/// An option is selectable when it has no parent or its parent menu is
/// selected.
pub fn available_options<'a, F>(options: &'a [Addon], is_selected: F) -> Vec<&'a Addon>
where
    F: Fn(AddonId) -> bool,
{
    options
        .iter()
        .filter(|option| option.parent.is_none_or(&is_selected))
        .collect()
}

/// The usage policy in force for `context`
///
/// The experience's policy wins; an unknown session or experience (or no
/// context at all) falls back to [`FALLBACK_POLICY`].
#[must_use]
pub fn policy_for(catalog: &Catalog, context: Option<&AddonContext>) -> UsagePolicy {
    let resolved = match context {
        Some(AddonContext::Experience(id)) => catalog.experience_policy(id),
        Some(AddonContext::Session(id)) => catalog.session_policy(id),
        None => None,
    };

    resolved.unwrap_or_else(|| {
        tracing::debug!(?context, "no usage policy for context, using fallback");
        FALLBACK_POLICY
    })
}
