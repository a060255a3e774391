//! The booking wizard.
//!
//! `Restaurant → Schedule → Addons → Details → Review → Confirmed`
//!
//! The [`BookingReducer`] owns step order and schedule validation and
//! embeds the add-on selection engine for the `Addons` step. Contexts
//! whose policy is "no menu" skip that step through a feedback action.

mod reducer;
mod state;
mod summary;
mod types;

pub use reducer::BookingReducer;
pub use state::{BookingState, CommittedSelection};
pub use summary::{BookingSummary, ExperienceLine};
pub use types::{BookingAction, BookingEnvironment, Confirmation, WizardError, WizardStep};
