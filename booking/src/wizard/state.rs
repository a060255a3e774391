//! Booking aggregate built up by the wizard.

use super::types::{BookingEnvironment, Confirmation, WizardError, WizardStep};
use crate::availability;
use crate::guest::GuestInfo;
use crate::selection::{CommittedAddons, SelectionState};
use crate::types::{
    AddonContext, ExperienceId, FeaturedExperience, Restaurant, RestaurantId, SessionId, TimeSlot,
};
use chrono::NaiveDate;

/// Add-ons committed when leaving the add-on step
///
/// The step state is kept so that returning to the step restores it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommittedSelection {
    /// Step state at the time of commit
    pub step: SelectionState,
    /// The committed add-ons
    pub addons: CommittedAddons,
}

/// The booking being assembled
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingState {
    /// Current step
    pub step: WizardStep,
    /// Chosen restaurant
    pub restaurant: Option<RestaurantId>,
    /// Number of guests
    pub party_size: u32,
    /// Date of the visit
    pub date: Option<NaiveDate>,
    /// Session
    pub session: Option<SessionId>,
    /// Featured experience, if any
    pub experience: Option<ExperienceId>,
    /// Chosen time
    pub time: Option<String>,
    /// The time was taken at the sister restaurant
    pub at_sister: bool,
    /// Add-on step in progress
    pub addon_step: Option<SelectionState>,
    /// Add-ons committed so far
    pub committed: Option<CommittedSelection>,
    /// Guest details
    pub guest: Option<GuestInfo>,
    /// Set once confirmed
    pub confirmation: Option<Confirmation>,
    /// Last rejected command, cleared by the next accepted one
    pub last_error: Option<WizardError>,
}

impl BookingState {
    /// A new booking starting at the restaurant step
    #[must_use]
    pub const fn new(party_size: u32) -> Self {
        Self {
            step: WizardStep::Restaurant,
            restaurant: None,
            party_size,
            date: None,
            session: None,
            experience: None,
            time: None,
            at_sister: false,
            addon_step: None,
            committed: None,
            guest: None,
            confirmation: None,
            last_error: None,
        }
    }

    /// Context add-ons are resolved against
    #[must_use]
    pub fn addon_context(&self) -> Option<AddonContext> {
        AddonContext::from_parts(self.session.as_ref(), self.experience.as_ref())
    }

    /// Committed add-ons, if the add-on step was completed
    #[must_use]
    pub fn committed_addons(&self) -> Option<&CommittedAddons> {
        self.committed.as_ref().map(|committed| &committed.addons)
    }

    /// Whether the booking has anything to pay for
    #[must_use]
    pub fn requires_payment(&self) -> bool {
        self.committed_addons()
            .is_some_and(|addons| addons.total.cents() > 0)
    }

    pub(crate) fn clear_time(&mut self) {
        self.time = None;
        self.at_sister = false;
    }

    pub(crate) fn clear_schedule(&mut self) {
        self.date = None;
        self.session = None;
        self.experience = None;
        self.clear_time();
    }

    /// The chosen experience record
    #[must_use]
    pub fn chosen_experience<'a>(&self, env: &'a BookingEnvironment) -> Option<&'a FeaturedExperience> {
        self.experience.as_ref().and_then(|id| env.catalog.experience(id))
    }

    /// The restaurant the booking is actually made at
    #[must_use]
    pub fn venue<'a>(&self, env: &'a BookingEnvironment) -> Option<&'a Restaurant> {
        let primary = self.restaurant.as_ref()?;
        if self.at_sister {
            env.catalog.sister_of(primary)
        } else {
            env.catalog.restaurant(primary)
        }
    }

    /// Slots for the chosen date and session
    ///
    /// With an experience chosen, its own times are offered instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the date, session or restaurant is missing or
    /// unknown, or if `at_sister` is asked for without a sister venue or
    /// together with an experience.
    pub fn time_slots(&self, env: &BookingEnvironment, at_sister: bool) -> Result<Vec<TimeSlot>, WizardError> {
        let date = self.date.ok_or(WizardError::MissingDate)?;
        let session_id = self.session.as_ref().ok_or(WizardError::MissingSession)?;

        if let Some(experience_id) = &self.experience {
            if at_sister {
                return Err(WizardError::ExperienceMismatch(experience_id.clone()));
            }
            let experience = env
                .catalog
                .experience(experience_id)
                .ok_or_else(|| WizardError::UnknownExperience(experience_id.clone()))?;
            return Ok(availability::experience_slots(experience));
        }

        let primary = self.restaurant.as_ref().ok_or(WizardError::MissingRestaurant)?;
        let venue = if at_sister {
            env.catalog
                .sister_of(primary)
                .ok_or_else(|| WizardError::NoSisterRestaurant(primary.clone()))?
        } else {
            env.catalog
                .restaurant(primary)
                .ok_or_else(|| WizardError::UnknownRestaurant(primary.clone()))?
        };
        let session = env
            .catalog
            .session(session_id)
            .ok_or_else(|| WizardError::UnknownSession(session_id.clone()))?;

        Ok(env.availability.slots(venue, date, session))
    }

    /// Whether the sister venue should be suggested
    ///
    /// True when no experience is chosen, the primary restaurant has no
    /// free slot and a sister venue exists.
    #[must_use]
    pub fn should_offer_sister(&self, env: &BookingEnvironment) -> bool {
        if self.experience.is_some() {
            return false;
        }
        let primary_full = self
            .time_slots(env, false)
            .is_ok_and(|slots| !slots.iter().any(|slot| slot.available));
        primary_full
            && self
                .restaurant
                .as_ref()
                .is_some_and(|id| env.catalog.sister_of(id).is_some())
    }
}

impl Default for BookingState {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Slot lookup used while validating a time choice
pub(crate) fn find_slot<'a>(slots: &'a [TimeSlot], time: &str) -> Option<&'a TimeSlot> {
    slots.iter().find(|slot| slot.time == time)
}
