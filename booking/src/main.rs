//! Command-line walkthrough of a booking.
//!
//! Books a dinner for four at the primary restaurant with the four-course
//! set menu, wine pairing and roses, then prints the summary.

use anyhow::{Context, bail};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::sync::Arc;
use tablewise_booking::availability::WeeklyPatternAvailability;
use tablewise_booking::guest::GuestInfo;
use tablewise_booking::seed::{PRIMARY_RESTAURANT, ids};
use tablewise_booking::types::{RestaurantId, SessionId};
use tablewise_booking::wizard::BookingSummary;
use tablewise_booking::{
    BookingAction, BookingEnvironment, BookingReducer, BookingState, Config, SelectionAction,
};
use tablewise_core::environment::{Clock, SystemClock};
use tablewise_runtime::{Store, StoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BookingStore = Store<BookingState, BookingAction, BookingEnvironment, BookingReducer>;

fn main() -> anyhow::Result<()> {
    let config = Config::try_from_env();
    let filter = config
        .as_ref()
        .map_or_else(|_| Config::default().log_level, |config| config.log_level.clone());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(filter).unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config.unwrap_or_else(|error| {
        tracing::warn!(%error, "invalid configuration, using defaults");
        Config::default()
    });

    println!("=== Tablewise: dinner for four ===\n");

    let clock = Arc::new(SystemClock);
    let today = clock.today();
    let catalog = config.load_catalog(today).context("loading catalog")?;
    let env = BookingEnvironment::new(
        Arc::new(catalog),
        clock,
        Arc::new(WeeklyPatternAvailability),
        config.max_party_size,
    );
    let store_config = StoreConfig::default().with_max_feedback_actions(config.max_feedback_actions);
    let mut store = Store::with_config(
        BookingState::new(config.default_party_size),
        BookingReducer::new(),
        env,
        store_config,
    );

    dispatch(
        &mut store,
        BookingAction::SelectRestaurant {
            restaurant_id: RestaurantId::new(PRIMARY_RESTAURANT),
            party_size: 4,
        },
    )?;
    dispatch(&mut store, BookingAction::ChooseDate { date: quiet_night(today) })?;
    dispatch(
        &mut store,
        BookingAction::ChooseSession {
            session_id: SessionId::new("dinner"),
        },
    )?;

    let slots = store.state(|state| state.time_slots(store.environment(), false))?;
    let Some(slot) = slots.into_iter().find(|slot| slot.available) else {
        bail!("no dinner slot available");
    };
    println!("Table at {}", slot.time);
    dispatch(
        &mut store,
        BookingAction::ChooseTime {
            time: slot.time,
            at_sister: false,
        },
    )?;
    dispatch(&mut store, BookingAction::ConfirmSchedule)?;

    for action in [
        SelectionAction::SelectMenu {
            addon: ids::SET_MENU_4,
        },
        SelectionAction::SelectOption {
            addon: ids::WINE_PAIRING,
        },
        SelectionAction::SelectOption { addon: ids::ROSES },
    ] {
        dispatch(&mut store, BookingAction::Addons(action))?;
        let total = store.state(|state| state.addon_step.as_ref().map(|step| step.price_total()));
        if let Some(total) = total {
            println!("  running total: {total}");
        }
    }
    dispatch(&mut store, BookingAction::AdvanceFromAddons)?;

    dispatch(
        &mut store,
        BookingAction::SubmitGuestDetails {
            guest: GuestInfo {
                first_name: "Ana".to_string(),
                last_name: "Silva".to_string(),
                email: "ana@example.com".to_string(),
                phone: "+64 21 555 0100".to_string(),
                occasion: Some("Anniversary".to_string()),
                ..GuestInfo::default()
            },
        },
    )?;
    dispatch(&mut store, BookingAction::Confirm)?;

    let summary = store
        .state(|state| state.summary(store.environment()))
        .context("booking has no complete schedule")?;
    print_summary(&summary);

    Ok(())
}

/// Sends one command, turning a rejection into an error
fn dispatch(store: &mut BookingStore, action: BookingAction) -> anyhow::Result<()> {
    let name = action.name();
    store.send(action)?;
    if let Some(error) = store.state(|state| state.last_error.clone()) {
        bail!("{name} rejected: {error}");
    }
    Ok(())
}

/// First day after `today` the primary restaurant serves dinner
fn quiet_night(today: NaiveDate) -> NaiveDate {
    (1..=7)
        .filter_map(|days| today.checked_add_days(Days::new(days)))
        .find(|date| !matches!(date.weekday(), Weekday::Fri | Weekday::Sat))
        .unwrap_or(today)
}

fn print_summary(summary: &BookingSummary) {
    println!("\n=== Booking summary ===");
    println!("{} ({})", summary.restaurant.name, summary.restaurant.location);
    println!(
        "{} {} at {}, party of {}",
        summary.date, summary.session.name, summary.time, summary.party_size
    );
    if let Some(experience) = &summary.experience {
        println!("Experience: {} ({} total)", experience.name, experience.total);
    }
    for line in &summary.addons {
        println!("  {:<28} x{:<3} {:>10}", line.addon.name, line.quantity, line.line_total.to_string());
    }
    println!("  {:<33} {:>10}", "Add-ons total", summary.addons_total.to_string());
    if let Some(guest) = &summary.guest {
        println!("Guest: {} <{}>", guest.full_name(), guest.email);
    }
    if let Some(confirmation) = &summary.confirmation {
        println!("Confirmation: {}", confirmation.number);
    }
}
