//! Time slot availability.
//!
//! The wizard asks a [`SlotAvailability`] which times can be booked for a
//! restaurant, date and session. Featured experiences bypass it: their own
//! times replace the session's slots and are always bookable.

use crate::types::{FeaturedExperience, Restaurant, Session, TimeSlot};
use chrono::{Datelike, NaiveDate, Weekday};

/// Source of bookable time slots
pub trait SlotAvailability: Send + Sync {
    /// Slots for `session` at `restaurant` on `date`, in session order
    fn slots(&self, restaurant: &Restaurant, date: NaiveDate, session: &Session) -> Vec<TimeSlot>;
}

/// Slots offered for a featured experience
#[must_use]
pub fn experience_slots(experience: &FeaturedExperience) -> Vec<TimeSlot> {
    experience
        .available_times
        .iter()
        .map(|time| TimeSlot::new(time.clone(), true))
        .collect()
}

/// Fixed weekly pattern
///
/// - The primary restaurant is busy on Fridays and Saturdays: peak sessions
///   are closed and other sessions only offer their first two times.
/// - The sister restaurant has every slot but the fourth.
/// - Otherwise every third slot (starting with the first) is taken.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeeklyPatternAvailability;

impl WeeklyPatternAvailability {
    const BUSY_DAYS: [Weekday; 2] = [Weekday::Fri, Weekday::Sat];
    const BUSY_DAY_SLOTS: usize = 2;
    const SISTER_TAKEN_SLOT: usize = 3;
}

impl SlotAvailability for WeeklyPatternAvailability {
    fn slots(&self, restaurant: &Restaurant, date: NaiveDate, session: &Session) -> Vec<TimeSlot> {
        let times = session.times.iter();

        if !restaurant.is_sister && Self::BUSY_DAYS.contains(&date.weekday()) {
            if session.peak {
                return Vec::new();
            }
            return times
                .take(Self::BUSY_DAY_SLOTS)
                .map(|time| TimeSlot::new(time.clone(), true))
                .collect();
        }

        if restaurant.is_sister {
            return times
                .enumerate()
                .map(|(i, time)| TimeSlot::new(time.clone(), i != Self::SISTER_TAKEN_SLOT))
                .collect();
        }

        times
            .enumerate()
            .map(|(i, time)| TimeSlot::new(time.clone(), i % 3 != 0))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::seed::{PRIMARY_RESTAURANT, SISTER_RESTAURANT, reference_catalog};
    use crate::types::{RestaurantId, SessionId};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn available(slots: &[TimeSlot]) -> Vec<&str> {
        slots.iter().filter(|s| s.available).map(|s| s.time.as_str()).collect()
    }

    #[test]
    fn primary_is_closed_for_dinner_on_busy_days() {
        let catalog = reference_catalog(date(1)).unwrap();
        let primary = catalog.restaurant(&RestaurantId::new(PRIMARY_RESTAURANT)).unwrap();
        let dinner = catalog.session(&SessionId::new("dinner")).unwrap();
        let lunch = catalog.session(&SessionId::new("lunch")).unwrap();

        // 2025-01-03 is a Friday
        assert!(WeeklyPatternAvailability.slots(primary, date(3), dinner).is_empty());
        assert_eq!(
            available(&WeeklyPatternAvailability.slots(primary, date(4), lunch)),
            ["11:30 AM", "12:00 PM"]
        );
    }

    #[test]
    fn primary_weekday_skips_every_third_slot() {
        let catalog = reference_catalog(date(1)).unwrap();
        let primary = catalog.restaurant(&RestaurantId::new(PRIMARY_RESTAURANT)).unwrap();
        let breakfast = catalog.session(&SessionId::new("breakfast")).unwrap();

        let slots = WeeklyPatternAvailability.slots(primary, date(1), breakfast);
        assert_eq!(slots.len(), 8);
        assert_eq!(
            available(&slots),
            ["7:30 AM", "8:00 AM", "9:00 AM", "9:30 AM", "10:30 AM"]
        );
    }

    #[test]
    fn sister_has_one_taken_slot() {
        let catalog = reference_catalog(date(1)).unwrap();
        let sister = catalog.restaurant(&RestaurantId::new(SISTER_RESTAURANT)).unwrap();
        let dinner = catalog.session(&SessionId::new("dinner")).unwrap();

        let slots = WeeklyPatternAvailability.slots(sister, date(3), dinner);
        assert_eq!(slots.len(), 9);
        assert!(!slots[3].available);
        assert_eq!(available(&slots).len(), 8);
    }

    #[test]
    fn experience_times_are_all_bookable() {
        let catalog = reference_catalog(date(1)).unwrap();
        let experience = catalog.experiences().first().unwrap();
        let slots = experience_slots(experience);
        assert_eq!(slots.len(), experience.available_times.len());
        assert!(slots.iter().all(|s| s.available));
    }
}
