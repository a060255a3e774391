//! Steps, commands, errors and environment of the booking wizard.

use crate::availability::SlotAvailability;
use crate::catalog::Catalog;
use crate::guest::{GuestErrors, GuestInfo};
use crate::selection::{SelectionAction, SelectionError};
use crate::types::{ExperienceId, RestaurantId, SessionId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tablewise_core::environment::Clock;
use thiserror::Error;

/// Wizard steps, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    /// Pick a restaurant and party size
    Restaurant,
    /// Pick date, session, time and optionally an experience
    Schedule,
    /// Select menus and options
    Addons,
    /// Enter guest details
    Details,
    /// Review (and pay)
    Review,
    /// Booking confirmed
    Confirmed,
}

impl WizardStep {
    /// Steps shown in the progress indicator
    pub const PROGRESS: [Self; 5] = [
        Self::Restaurant,
        Self::Schedule,
        Self::Addons,
        Self::Details,
        Self::Review,
    ];

    /// 1-based position in the progress indicator
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Restaurant => 1,
            Self::Schedule => 2,
            Self::Addons => 3,
            Self::Details => 4,
            Self::Review => 5,
            Self::Confirmed => 6,
        }
    }

    /// Display label; the review step mentions payment when one is due
    #[must_use]
    pub const fn label(self, requires_payment: bool) -> &'static str {
        match self {
            Self::Restaurant => "Restaurant",
            Self::Schedule => "Date & Time",
            Self::Addons => "Add-ons",
            Self::Details => "Details",
            Self::Review if requires_payment => "Confirm & Pay",
            Self::Review => "Confirm",
            Self::Confirmed => "Confirmed",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(false))
    }
}

/// Booking confirmation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Confirmation number (`RES-…`)
    pub number: String,
    /// When the booking was confirmed
    pub confirmed_at: DateTime<Utc>,
}

/// Wizard commands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingAction {
    /// Choose the restaurant and party size
    SelectRestaurant {
        /// Restaurant
        restaurant_id: RestaurantId,
        /// Number of guests
        party_size: u32,
    },
    /// Choose the date
    ChooseDate {
        /// Date of the visit
        date: NaiveDate,
    },
    /// Choose the session
    ChooseSession {
        /// Session
        session_id: SessionId,
    },
    /// Toggle a featured experience on the chosen date and session
    ChooseExperience {
        /// Experience
        experience_id: ExperienceId,
    },
    /// Drop the chosen experience
    ClearExperience,
    /// Jump to an upcoming experience, picking its date and session
    BrowseExperience {
        /// Experience
        experience_id: ExperienceId,
    },
    /// Choose a time slot
    ChooseTime {
        /// Slot time
        time: String,
        /// Book at the sister restaurant instead
        at_sister: bool,
    },
    /// Finish the schedule step and enter the add-on step
    ConfirmSchedule,
    /// Add-on step event
    Addons(SelectionAction),
    /// Commit add-ons and move on to guest details
    AdvanceFromAddons,
    /// Submit guest details
    SubmitGuestDetails {
        /// Details entered
        guest: GuestInfo,
    },
    /// Go back one step
    Back,
    /// Go back to an earlier step
    GoToStep {
        /// Target step
        step: WizardStep,
    },
    /// Confirm the booking
    Confirm,
}

impl BookingAction {
    /// Short name for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectRestaurant { .. } => "select_restaurant",
            Self::ChooseDate { .. } => "choose_date",
            Self::ChooseSession { .. } => "choose_session",
            Self::ChooseExperience { .. } => "choose_experience",
            Self::ClearExperience => "clear_experience",
            Self::BrowseExperience { .. } => "browse_experience",
            Self::ChooseTime { .. } => "choose_time",
            Self::ConfirmSchedule => "confirm_schedule",
            Self::Addons(_) => "addons",
            Self::AdvanceFromAddons => "advance_from_addons",
            Self::SubmitGuestDetails { .. } => "submit_guest_details",
            Self::Back => "back",
            Self::GoToStep { .. } => "go_to_step",
            Self::Confirm => "confirm",
        }
    }
}

/// Rejected wizard commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Command sent while the wizard is on another step
    #[error("Only allowed on the {expected} step, but the wizard is on {actual}")]
    WrongStep {
        /// Step the command belongs to
        expected: WizardStep,
        /// Current step
        actual: WizardStep,
    },

    /// The booking is already confirmed
    #[error("Booking is already confirmed")]
    AlreadyConfirmed,

    /// Back from the first step
    #[error("Already on the first step")]
    CannotGoBack,

    /// Jump forwards or to the current step
    #[error("Cannot jump from {from} to {to}")]
    InvalidStepJump {
        /// Current step
        from: WizardStep,
        /// Requested step
        to: WizardStep,
    },

    /// Unknown restaurant id
    #[error("Unknown restaurant {0}")]
    UnknownRestaurant(RestaurantId),

    /// Unknown session id
    #[error("Unknown session {0}")]
    UnknownSession(SessionId),

    /// Unknown experience id
    #[error("Unknown experience {0}")]
    UnknownExperience(ExperienceId),

    /// Party size out of range
    #[error("Party size {requested} is outside 1..={max}")]
    InvalidPartySize {
        /// Requested size
        requested: u32,
        /// Largest accepted size
        max: u32,
    },

    /// Date before today
    #[error("{date} is in the past (today is {today})")]
    DateInPast {
        /// Requested date
        date: NaiveDate,
        /// Today
        today: NaiveDate,
    },

    /// No restaurant chosen yet
    #[error("Choose a restaurant first")]
    MissingRestaurant,

    /// No date chosen yet
    #[error("Choose a date first")]
    MissingDate,

    /// No session chosen yet
    #[error("Choose a session first")]
    MissingSession,

    /// No time chosen yet
    #[error("Choose a time first")]
    MissingTime,

    /// Experience does not run at the chosen restaurant, date or session
    #[error("Experience {0} is not available for this restaurant, date and session")]
    ExperienceMismatch(ExperienceId),

    /// No sister venue to fall back to
    #[error("Restaurant {0} has no sister venue")]
    NoSisterRestaurant(RestaurantId),

    /// Time not offered or already taken
    #[error("{0} is not available")]
    TimeUnavailable(String),

    /// Add-on command rejected
    #[error(transparent)]
    Addons(#[from] SelectionError),

    /// Guest details invalid
    #[error(transparent)]
    Guest(#[from] GuestErrors),
}

/// Dependencies injected into the wizard
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Reference data
    pub catalog: Arc<Catalog>,
    /// Source of "now" and "today"
    pub clock: Arc<dyn Clock>,
    /// Time slot availability
    pub availability: Arc<dyn SlotAvailability>,
    /// Largest party accepted
    pub max_party_size: u32,
}

impl BookingEnvironment {
    /// Creates a new environment
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
        availability: Arc<dyn SlotAvailability>,
        max_party_size: u32,
    ) -> Self {
        Self {
            catalog,
            clock,
            availability,
            max_party_size,
        }
    }
}

impl fmt::Debug for BookingEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingEnvironment")
            .field("max_party_size", &self.max_party_size)
            .finish_non_exhaustive()
    }
}
