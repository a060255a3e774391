//! The add-on selection engine.
//!
//! A [`SelectionState`] is entered with a context and party size, mutated
//! only through [`SelectionAction`]s applied by the [`SelectionReducer`],
//! and finally [`committed`](SelectionState::commit) into the booking.
//!
//! Menu selections are shaped by the [`UsagePolicy`](crate::types::UsagePolicy)
//! in force:
//!
//! | policy | menus | guest counts |
//! |--------|-------|--------------|
//! | 0 no menu | step skipped | - |
//! | 1 shared | one, replaced on reselect | whole party |
//! | 2 per guest | many | must cover the party (or be untouched) |
//! | 3 optional | many | whole party for Guest-basis menus |
//! | 4 partial | many | may leave guests unassigned |
//!
//! Options whose parent menu is not selected never survive a mutation.

pub mod pricing;
mod reducer;
mod state;
pub mod types;

pub use reducer::SelectionReducer;
pub use state::SelectionState;
pub use types::{
    AddonSelection, CommittedAddon, CommittedAddons, GuestAssignments, MAX_OPTION_QUANTITY,
    MenuSelections, MenuShare, OptionSelection, SelectionAction, SelectionError,
};
