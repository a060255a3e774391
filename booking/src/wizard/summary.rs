//! Read model shown on the review and confirmation steps.

use super::state::BookingState;
use super::types::{BookingEnvironment, Confirmation};
use crate::guest::GuestInfo;
use crate::selection::CommittedAddon;
use crate::types::{ExperienceId, Money, Restaurant, Session};
use chrono::NaiveDate;
use serde::Serialize;

/// Featured experience line of the summary
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExperienceLine {
    /// Experience id
    pub id: ExperienceId,
    /// Experience name
    pub name: String,
    /// Price per guest
    pub price_per_person: Money,
    /// Price for the whole party
    pub total: Money,
}

/// Everything the guest sees before confirming
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BookingSummary {
    /// Restaurant the table is booked at
    pub restaurant: Restaurant,
    /// The table is at the sister restaurant
    pub booked_at_sister: bool,
    /// Date of the visit
    pub date: NaiveDate,
    /// Session
    pub session: Session,
    /// Time of the visit
    pub time: String,
    /// Number of guests
    pub party_size: u32,
    /// Featured experience, if one was chosen
    pub experience: Option<ExperienceLine>,
    /// Committed add-on lines
    pub addons: Vec<CommittedAddon>,
    /// Add-on total
    pub addons_total: Money,
    /// Whether anything is due
    pub requires_payment: bool,
    /// Guest details, once submitted
    pub guest: Option<GuestInfo>,
    /// Set once confirmed
    pub confirmation: Option<Confirmation>,
}

impl BookingState {
    /// Summary of the booking so far
    ///
    /// Returns `None` until the schedule (restaurant, date, session and time)
    /// is complete.
    #[must_use]
    pub fn summary(&self, env: &BookingEnvironment) -> Option<BookingSummary> {
        let restaurant = self.venue(env)?.clone();
        let date = self.date?;
        let session = self.session.as_ref().and_then(|id| env.catalog.session(id))?.clone();
        let time = self.time.clone()?;

        let party_size = self.party_size;
        let experience = self.chosen_experience(env).map(|experience| ExperienceLine {
            id: experience.id.clone(),
            name: experience.name.clone(),
            price_per_person: experience.price_per_person,
            total: experience.price_per_person.times(party_size),
        });

        let (addons, addons_total) = self
            .committed_addons()
            .map_or_else(|| (Vec::new(), Money::ZERO), |committed| (committed.addons.clone(), committed.total));

        Some(BookingSummary {
            restaurant,
            booked_at_sister: self.at_sister,
            date,
            session,
            time,
            party_size,
            experience,
            addons,
            addons_total,
            requires_payment: self.requires_payment(),
            guest: self.guest.clone(),
            confirmation: self.confirmation.clone(),
        })
    }
}
