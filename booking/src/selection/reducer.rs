//! Reducer applying add-on events under the active usage policy.

use super::state::SelectionState;
use super::types::{
    GuestAssignments, MAX_OPTION_QUANTITY, MenuSelections, MenuShare, OptionSelection,
    SelectionAction, SelectionError,
};
use crate::types::{Addon, AddonId, AddonKind, ChargeBasis, UsagePolicy};
use smallvec::SmallVec;
use tablewise_core::{effect::Effect, reducer::Reducer};

/// Applies [`SelectionAction`]s to a [`SelectionState`]
///
/// Every command is validated before anything is touched, so a rejected
/// command leaves the selections unchanged and only records `last_error`.
/// The reducer never produces effects.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectionReducer;

impl SelectionReducer {
    /// Creates a new `SelectionReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn offered(state: &SelectionState, id: AddonId, kind: AddonKind) -> Result<Addon, SelectionError> {
        let found = match kind {
            AddonKind::Menu => state.offerable.menu(id),
            AddonKind::Option => state.offerable.option(id),
        };
        if let Some(addon) = found {
            return Ok(addon.clone());
        }

        let other = match kind {
            AddonKind::Menu => state.offerable.option(id),
            AddonKind::Option => state.offerable.menu(id),
        };
        Err(other.map_or(SelectionError::NotOffered(id), |_| SelectionError::WrongKind {
            addon: id,
            expected: kind,
        }))
    }

    fn select_menu(state: &mut SelectionState, id: AddonId) -> Result<(), SelectionError> {
        let menu = Self::offered(state, id, AddonKind::Menu)?;
        if state.is_menu_selected(id) {
            return Ok(());
        }
        let party_size = state.party_size;

        match &mut state.menus {
            MenuSelections::Skipped => {},
            MenuSelections::Shared(current) => {
                *current = Some(id);
            },
            MenuSelections::PerGuest(assigned) => {
                let remaining = Self::remaining_guests(assigned, party_size);
                if remaining == 0 {
                    return Err(SelectionError::NoGuestsRemaining { addon: id, party_size });
                }
                assigned.insert(id, MenuShare::Guests(1));
            },
            MenuSelections::PartialPerGuest(assigned) => {
                let share = match menu.basis {
                    ChargeBasis::Party => MenuShare::Flat,
                    ChargeBasis::Guest => MenuShare::WholeParty(party_size),
                };
                assigned.insert(id, share);
            },
            MenuSelections::Optional(menus) => menus.push(id),
        }

        Self::prune_orphans(state);
        Ok(())
    }

    fn remaining_guests(assigned: &GuestAssignments, party_size: u32) -> u32 {
        let taken: u32 = assigned.values().map(|share| share.guests()).sum();
        party_size.saturating_sub(taken)
    }

    fn deselect_menu(state: &mut SelectionState, id: AddonId) -> Result<(), SelectionError> {
        Self::offered(state, id, AddonKind::Menu)?;
        if !state.is_menu_selected(id) {
            return Err(SelectionError::NotSelected(id));
        }

        match &mut state.menus {
            MenuSelections::Skipped => {},
            MenuSelections::Shared(current) => *current = None,
            MenuSelections::PerGuest(assigned) | MenuSelections::PartialPerGuest(assigned) => {
                assigned.remove(&id);
            },
            MenuSelections::Optional(menus) => menus.retain(|menu| *menu != id),
        }

        Self::prune_orphans(state);
        Ok(())
    }

    fn adjust_menu_guests(state: &mut SelectionState, id: AddonId, delta: i32) -> Result<(), SelectionError> {
        Self::offered(state, id, AddonKind::Menu)?;
        let party_size = state.party_size;

        let (MenuSelections::PerGuest(assigned) | MenuSelections::PartialPerGuest(assigned)) = &mut state.menus
        else {
            return Err(SelectionError::NotAdjustable(id));
        };
        let current = match assigned.get(&id) {
            None => return Err(SelectionError::NotSelected(id)),
            Some(MenuShare::Flat) => return Err(SelectionError::NotAdjustable(id)),
            Some(MenuShare::Guests(n) | MenuShare::WholeParty(n)) => *n,
        };

        let others: u32 = assigned
            .iter()
            .filter(|(menu, _)| **menu != id)
            .map(|(_, share)| share.guests())
            .sum();
        let ceiling = party_size.saturating_sub(others);
        let next = clamp_adjusted(current, delta, ceiling);
        assigned.insert(id, MenuShare::Guests(next));
        Ok(())
    }

    fn select_option(state: &mut SelectionState, id: AddonId) -> Result<(), SelectionError> {
        let option = Self::offered(state, id, AddonKind::Option)?;
        if let Some(parent) = option.parent.filter(|parent| !state.is_menu_selected(*parent)) {
            return Err(SelectionError::ParentNotSelected { option: id, parent });
        }
        if state.options.contains_key(&id) {
            return Ok(());
        }

        let selection = match option.basis {
            ChargeBasis::Guest => OptionSelection::PerGuest {
                guests: state.party_size,
            },
            ChargeBasis::Party => OptionSelection::PerParty { quantity: 1 },
        };
        state.options.insert(id, selection);
        Ok(())
    }

    fn deselect_option(state: &mut SelectionState, id: AddonId) -> Result<(), SelectionError> {
        Self::offered(state, id, AddonKind::Option)?;
        state
            .options
            .remove(&id)
            .map(|_| ())
            .ok_or(SelectionError::NotSelected(id))
    }

    fn adjust_option_quantity(state: &mut SelectionState, id: AddonId, delta: i32) -> Result<(), SelectionError> {
        Self::offered(state, id, AddonKind::Option)?;
        match state.options.get_mut(&id) {
            None => Err(SelectionError::NotSelected(id)),
            Some(OptionSelection::PerGuest { .. }) => Err(SelectionError::NotAdjustable(id)),
            Some(OptionSelection::PerParty { quantity }) => {
                *quantity = clamp_adjusted(*quantity, delta, MAX_OPTION_QUANTITY);
                Ok(())
            },
        }
    }

    /// Drops options whose parent menu is no longer selected
    fn prune_orphans(state: &mut SelectionState) {
        let orphans: Vec<AddonId> = state
            .options
            .keys()
            .copied()
            .filter(|id| {
                state
                    .offerable
                    .option(*id)
                    .and_then(|option| option.parent)
                    .is_some_and(|parent| !state.is_menu_selected(parent))
            })
            .collect();

        for id in &orphans {
            state.options.remove(id);
        }
        if !orphans.is_empty() {
            tracing::debug!(removed = ?orphans, "removed options of deselected menu");
        }
    }
}

/// `current + delta`, clamped to `1..=max` (and to 1 when `max` is 0)
fn clamp_adjusted(current: u32, delta: i32, max: u32) -> u32 {
    let wanted = i64::from(current) + i64::from(delta);
    let clamped = wanted.min(i64::from(max)).max(1);
    u32::try_from(clamped).unwrap_or(1)
}

impl Reducer for SelectionReducer {
    type State = SelectionState;
    type Action = SelectionAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if state.policy == UsagePolicy::NoMenu {
            tracing::debug!(?action, "add-on step is skipped, ignoring");
            return SmallVec::new();
        }

        let result = match &action {
            SelectionAction::SelectMenu { addon } => Self::select_menu(state, *addon),
            SelectionAction::DeselectMenu { addon } => Self::deselect_menu(state, *addon),
            SelectionAction::AdjustMenuGuests { addon, delta } => {
                Self::adjust_menu_guests(state, *addon, *delta)
            },
            SelectionAction::SelectOption { addon } => Self::select_option(state, *addon),
            SelectionAction::DeselectOption { addon } => Self::deselect_option(state, *addon),
            SelectionAction::AdjustOptionQuantity { addon, delta } => {
                Self::adjust_option_quantity(state, *addon, *delta)
            },
        };

        match result {
            Ok(()) => {
                state.last_error = None;
                tracing::debug!(
                    ?action,
                    policy = %state.policy,
                    total = %state.price_total(),
                    "add-on selection updated"
                );
            },
            Err(error) => {
                tracing::warn!(?action, %error, "add-on command rejected");
                state.last_error = Some(error);
            },
        }

        SmallVec::new()
    }
}
