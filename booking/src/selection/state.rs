//! State of the add-on step and its derived queries.

use super::pricing;
use super::types::{
    AddonSelection, CommittedAddon, CommittedAddons, GuestAssignments, MenuSelections, MenuShare,
    OptionSelection, SelectionError,
};
use crate::catalog::Catalog;
use crate::eligibility::{self, AddonLookup, Offerable};
use crate::types::{Addon, AddonContext, AddonId, ChargeBasis, Money, UsagePolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The add-on step of one booking
///
/// Created at step entry from the booking context. The offerable set,
/// policy and party size are fixed for the lifetime of the step; only the
/// selections change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub(crate) context: Option<AddonContext>,
    pub(crate) policy: UsagePolicy,
    pub(crate) party_size: u32,
    pub(crate) offerable: Offerable,
    pub(crate) menus: MenuSelections,
    pub(crate) options: BTreeMap<AddonId, OptionSelection>,
    /// Last rejected command, cleared by the next accepted one
    pub last_error: Option<SelectionError>,
}

impl SelectionState {
    /// Enters the add-on step for `context` and `party_size`
    ///
    /// A zero party size is treated as one guest.
    #[must_use]
    pub fn enter(catalog: &Catalog, context: Option<&AddonContext>, party_size: u32) -> Self {
        let party_size = party_size.max(1);
        let policy = eligibility::policy_for(catalog, context);
        let offerable = if policy == UsagePolicy::NoMenu {
            Offerable::default()
        } else {
            eligibility::resolve_offerable(catalog, context, party_size)
        };

        tracing::debug!(
            ?context,
            %policy,
            party_size,
            menus = offerable.menus.len(),
            options = offerable.options.len(),
            "entered add-on step"
        );

        Self {
            context: context.cloned(),
            policy,
            party_size,
            offerable,
            menus: Self::empty_menus(policy),
            options: BTreeMap::new(),
            last_error: None,
        }
    }

    const fn empty_menus(policy: UsagePolicy) -> MenuSelections {
        match policy {
            UsagePolicy::NoMenu => MenuSelections::Skipped,
            UsagePolicy::SharedMenu => MenuSelections::Shared(None),
            UsagePolicy::PerGuest => MenuSelections::PerGuest(GuestAssignments::new()),
            UsagePolicy::Optional => MenuSelections::Optional(Vec::new()),
            UsagePolicy::PartialPerGuest => MenuSelections::PartialPerGuest(GuestAssignments::new()),
        }
    }

    /// Context the step was entered with
    #[must_use]
    pub const fn context(&self) -> Option<&AddonContext> {
        self.context.as_ref()
    }

    /// Policy in force
    #[must_use]
    pub const fn policy(&self) -> UsagePolicy {
        self.policy
    }

    /// Party size captured at step entry
    #[must_use]
    pub const fn party_size(&self) -> u32 {
        self.party_size
    }

    /// Add-ons offered in this step
    #[must_use]
    pub const fn offerable(&self) -> &Offerable {
        &self.offerable
    }

    /// Policy-shaped menu selections
    #[must_use]
    pub const fn menu_selections(&self) -> &MenuSelections {
        &self.menus
    }

    /// Returns true if the add-on is selected
    #[must_use]
    pub fn is_selected(&self, id: AddonId) -> bool {
        self.is_menu_selected(id) || self.options.contains_key(&id)
    }

    pub(crate) fn is_menu_selected(&self, id: AddonId) -> bool {
        match &self.menus {
            MenuSelections::Skipped => false,
            MenuSelections::Shared(menu) => *menu == Some(id),
            MenuSelections::PerGuest(assigned) | MenuSelections::PartialPerGuest(assigned) => {
                assigned.contains_key(&id)
            },
            MenuSelections::Optional(menus) => menus.contains(&id),
        }
    }

    /// The selection record of an add-on, if selected
    #[must_use]
    pub fn selection_for(&self, id: AddonId) -> Option<AddonSelection> {
        if let Some(option) = self.options.get(&id) {
            let (quantity, guest_count) = match *option {
                OptionSelection::PerGuest { guests } => (1, Some(guests)),
                OptionSelection::PerParty { quantity } => (quantity, None),
            };
            return Some(AddonSelection {
                addon: id,
                quantity,
                guest_count,
            });
        }

        let (quantity, guest_count) = match &self.menus {
            MenuSelections::Skipped => return None,
            MenuSelections::Shared(menu) => {
                if *menu != Some(id) {
                    return None;
                }
                (self.party_size, Some(self.party_size))
            },
            MenuSelections::PerGuest(assigned) | MenuSelections::PartialPerGuest(assigned) => {
                match assigned.get(&id)? {
                    MenuShare::Guests(n) => (*n, Some(*n)),
                    MenuShare::WholeParty(n) => (1, Some(*n)),
                    MenuShare::Flat => (1, None),
                }
            },
            MenuSelections::Optional(menus) => {
                if !menus.contains(&id) {
                    return None;
                }
                let guest_count = self
                    .offerable
                    .menu(id)
                    .filter(|menu| menu.basis == ChargeBasis::Guest)
                    .map(|_| self.party_size);
                (1, guest_count)
            },
        };

        Some(AddonSelection {
            addon: id,
            quantity,
            guest_count,
        })
    }

    /// All selection records, menus first, in catalog order
    #[must_use]
    pub fn selections(&self) -> Vec<AddonSelection> {
        self.offerable
            .iter()
            .filter_map(|addon| self.selection_for(addon.id))
            .collect()
    }

    /// Options selectable right now
    #[must_use]
    pub fn available_options(&self) -> Vec<&Addon> {
        eligibility::available_options(&self.offerable.options, |id| self.is_menu_selected(id))
    }

    /// Running price of every selection
    #[must_use]
    pub fn price_total(&self) -> Money {
        pricing::price_total(&self.offerable, &self.selections(), self.party_size)
    }

    /// Guests assigned a menu under per-guest policies
    #[must_use]
    pub fn assigned_guests(&self) -> u32 {
        match &self.menus {
            MenuSelections::PerGuest(assigned) | MenuSelections::PartialPerGuest(assigned) => {
                assigned.values().map(|share| share.guests()).sum()
            },
            _ => 0,
        }
    }

    /// Whether the selection may be submitted
    #[must_use]
    pub fn is_complete(&self) -> bool {
        pricing::is_complete(self.policy, self.assigned_guests(), self.party_size)
    }

    /// Whether the wizard may leave the step
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.is_complete()
    }

    /// "N of M guests assigned" for per-guest policies
    #[must_use]
    pub fn assignment_message(&self) -> Option<String> {
        if !matches!(self.policy, UsagePolicy::PerGuest | UsagePolicy::PartialPerGuest) {
            return None;
        }
        let assigned = self.assigned_guests();
        if assigned == self.party_size {
            Some(format!("All {} guests assigned", self.party_size))
        } else {
            Some(format!("{assigned} of {} guests assigned", self.party_size))
        }
    }

    /// Produces the final selection handed to the booking
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Incomplete`] while a per-guest assignment
    /// is only partly done.
    pub fn commit(&self) -> Result<CommittedAddons, SelectionError> {
        if !self.can_advance() {
            return Err(SelectionError::Incomplete {
                assigned: self.assigned_guests(),
                party_size: self.party_size,
            });
        }

        let addon_selections = self.selections();
        let addons: Vec<CommittedAddon> = addon_selections
            .iter()
            .filter_map(|selection| {
                let addon = self.offerable.addon(selection.addon)?;
                Some(CommittedAddon {
                    addon: addon.clone(),
                    quantity: selection.quantity,
                    guest_count: selection.guest_count,
                    line_total: pricing::line_total(addon, selection, self.party_size),
                })
            })
            .collect();
        let total = addons.iter().map(|line| line.line_total).sum();

        Ok(CommittedAddons {
            addons,
            addon_selections,
            total,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::seed::{ids, reference_catalog};
    use crate::types::{ExperienceId, SessionId};
    use chrono::NaiveDate;

    fn catalog() -> Catalog {
        reference_catalog(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap()
    }

    #[test]
    fn enter_resolves_policy_and_offerable() {
        let context = AddonContext::Session(SessionId::new("dinner"));
        let state = SelectionState::enter(&catalog(), Some(&context), 4);

        assert_eq!(state.policy(), UsagePolicy::SharedMenu);
        assert_eq!(state.menu_selections(), &MenuSelections::Shared(None));
        assert_eq!(state.offerable().menus.len(), 2);
        assert!(state.selections().is_empty());
        assert_eq!(state.price_total(), Money::ZERO);
        assert!(state.can_advance());
    }

    #[test]
    fn zero_party_counts_as_one_guest() {
        let context = AddonContext::Experience(ExperienceId::new("seafood-feast"));
        let state = SelectionState::enter(&catalog(), Some(&context), 0);
        assert_eq!(state.party_size(), 1);
        assert_eq!(state.assignment_message().unwrap(), "0 of 1 guests assigned");
    }

    #[test]
    fn only_unlocked_options_are_available() {
        let context = AddonContext::Session(SessionId::new("dinner"));
        let mut state = SelectionState::enter(&catalog(), Some(&context), 2);
        assert!(!state.available_options().iter().any(|o| o.id == ids::WINE_PAIRING));

        state.menus = MenuSelections::Shared(Some(ids::SET_MENU_4));
        assert!(state.available_options().iter().any(|o| o.id == ids::WINE_PAIRING));
        assert_eq!(
            state.selection_for(ids::SET_MENU_4),
            Some(AddonSelection {
                addon: ids::SET_MENU_4,
                quantity: 2,
                guest_count: Some(2)
            })
        );
    }

    #[test]
    fn commit_copies_lines_in_catalog_order() {
        let context = AddonContext::Session(SessionId::new("dinner"));
        let mut state = SelectionState::enter(&catalog(), Some(&context), 2);
        state.options.insert(ids::ROSES, OptionSelection::PerParty { quantity: 2 });
        state.menus = MenuSelections::Shared(Some(ids::SET_MENU_6));

        let committed = state.commit().unwrap();
        let order: Vec<_> = committed.addons.iter().map(|line| line.addon.id).collect();
        assert_eq!(order, [ids::SET_MENU_6, ids::ROSES]);
        assert_eq!(committed.total.cents(), 12_500 * 2 + 4500 * 2);
        assert_eq!(committed.total, state.price_total());
    }
}
