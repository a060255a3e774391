//! # Tablewise Booking
//!
//! Restaurant reservations built on the tablewise reducer architecture.
//!
//! The heart of the crate is the add-on [`selection`] engine: given a
//! session or featured experience and a party size it decides which menus
//! and options are offered, enforces the context's [`UsagePolicy`], keeps
//! options tied to their parent menu and prices the result. The
//! [`wizard`] wraps it in the full booking flow.
//!
//! ```text
//! Restaurant ─▶ Schedule ─▶ Addons ─▶ Details ─▶ Review ─▶ Confirmed
//!                              │
//!                     SelectionReducer (scoped)
//!                              │
//!               Catalog ─▶ eligibility ─▶ pricing
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use tablewise_booking::selection::{SelectionAction, SelectionReducer, SelectionState};
//! use tablewise_core::reducer::Reducer;
//!
//! let mut step = SelectionState::enter(&catalog, Some(&dinner), 4);
//! SelectionReducer::new().reduce(&mut step, SelectionAction::SelectMenu { addon }, &());
//! assert!(step.can_advance());
//! let committed = step.commit()?;
//! ```

pub mod availability;
pub mod catalog;
pub mod config;
pub mod eligibility;
pub mod guest;
pub mod seed;
pub mod selection;
pub mod types;
pub mod wizard;

pub use catalog::{Catalog, CatalogData, CatalogError};
pub use config::{Config, ConfigError};
pub use selection::{SelectionAction, SelectionError, SelectionReducer, SelectionState};
pub use types::{Addon, AddonContext, AddonId, ChargeBasis, Money, UsagePolicy};
pub use wizard::{BookingAction, BookingEnvironment, BookingReducer, BookingState, WizardStep};
