//! Actions, errors and records of the add-on step.

use crate::types::{Addon, AddonId, AddonKind, Money};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Largest quantity of a Party-basis option
pub const MAX_OPTION_QUANTITY: u32 = 10;

/// A selected add-on as handed to the booking
///
/// `quantity` repeats Party-basis items; `guest_count` is present for
/// Guest-basis items and for menus under per-guest policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonSelection {
    /// Selected add-on
    pub addon: AddonId,
    /// Units ordered
    pub quantity: u32,
    /// Guests the add-on is assigned to
    pub guest_count: Option<u32>,
}

/// Guests assigned to one menu under per-guest policies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuShare {
    /// Assigned to this many guests
    Guests(u32),
    /// Guest-basis menu ordered once for the party captured at selection,
    /// until its guest count is adjusted
    WholeParty(u32),
    /// Party-basis menu ordered once, not tied to guests
    Flat,
}

impl MenuShare {
    /// Guests covered by this share
    #[must_use]
    pub const fn guests(self) -> u32 {
        match self {
            Self::Guests(n) | Self::WholeParty(n) => n,
            Self::Flat => 0,
        }
    }
}

/// Per-guest menu assignments, keyed by menu
pub type GuestAssignments = BTreeMap<AddonId, MenuShare>;

/// Menu selections, shaped by the usage policy in force
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuSelections {
    /// Policy 0: the step is skipped
    Skipped,
    /// Policy 1: at most one menu, shared by the whole party
    Shared(Option<AddonId>),
    /// Policy 2: every guest must be assigned
    PerGuest(GuestAssignments),
    /// Policy 3: free multi-select
    Optional(Vec<AddonId>),
    /// Policy 4: some guests may stay unassigned
    PartialPerGuest(GuestAssignments),
}

/// A selected option
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionSelection {
    /// Guest-basis option, covering the party size captured at selection
    PerGuest {
        /// Guests covered
        guests: u32,
    },
    /// Party-basis option
    PerParty {
        /// Units ordered, in `1..=MAX_OPTION_QUANTITY`
        quantity: u32,
    },
}

/// Events of the add-on step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionAction {
    /// Select a menu
    ///
    /// Under per-guest assignment the menu starts with one guest and is
    /// rejected once every guest already has a menu, rather than being
    /// added on top of a fully assigned party. Under partial assignment a
    /// guest-priced menu covers the whole party until adjusted.
    SelectMenu {
        /// Menu to select
        addon: AddonId,
    },
    /// Remove a menu and every option depending on it
    DeselectMenu {
        /// Menu to remove
        addon: AddonId,
    },
    /// Change the guests assigned to a menu (per-guest policies)
    AdjustMenuGuests {
        /// Menu to adjust
        addon: AddonId,
        /// Signed change, clamped
        delta: i32,
    },
    /// Select an option
    SelectOption {
        /// Option to select
        addon: AddonId,
    },
    /// Remove an option
    DeselectOption {
        /// Option to remove
        addon: AddonId,
    },
    /// Change the quantity of a Party-basis option
    AdjustOptionQuantity {
        /// Option to adjust
        addon: AddonId,
        /// Signed change, clamped
        delta: i32,
    },
}

/// Rejected add-on commands
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionError {
    /// The add-on is not offered for this context and party size
    #[error("Addon {0} is not offered for this booking")]
    NotOffered(AddonId),

    /// A menu command named an option or vice versa
    #[error("Addon {addon} is not a {expected}")]
    WrongKind {
        /// The add-on
        addon: AddonId,
        /// Kind the command works on
        expected: AddonKind,
    },

    /// The option's parent menu is not selected
    #[error("Addon {option} requires menu {parent} to be selected first")]
    ParentNotSelected {
        /// The dependent option
        option: AddonId,
        /// The required menu
        parent: AddonId,
    },

    /// Deselect or adjust of an add-on that is not selected
    #[error("Addon {0} is not selected")]
    NotSelected(AddonId),

    /// Its count follows the party or the policy, not the guest
    #[error("Addon {0} has no adjustable count")]
    NotAdjustable(AddonId),

    /// Every guest is already assigned to a menu under per-guest assignment
    #[error("All {party_size} guests already have a menu; cannot add {addon}")]
    NoGuestsRemaining {
        /// The menu that could not be added
        addon: AddonId,
        /// Party size
        party_size: u32,
    },

    /// Advancing while a per-guest assignment is only partly done
    #[error("{assigned} of {party_size} guests assigned a menu")]
    Incomplete {
        /// Guests assigned so far
        assigned: u32,
        /// Party size
        party_size: u32,
    },
}

/// One committed add-on with its quantity and price
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedAddon {
    /// The catalog add-on
    pub addon: Addon,
    /// Units ordered
    pub quantity: u32,
    /// Guests assigned, if any
    pub guest_count: Option<u32>,
    /// Price of this line
    pub line_total: Money,
}

/// Final add-on selection copied into the booking
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedAddons {
    /// Selected add-ons with quantities, menus first, in catalog order
    pub addons: Vec<CommittedAddon>,
    /// The raw selection records
    pub addon_selections: Vec<AddonSelection>,
    /// Sum of line totals
    pub total: Money,
}

impl CommittedAddons {
    /// Returns true when nothing was selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addon_selections.is_empty()
    }
}
