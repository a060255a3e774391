//! Reducer driving the booking wizard.

use super::state::{BookingState, CommittedSelection, find_slot};
use super::types::{BookingAction, BookingEnvironment, Confirmation, WizardError, WizardStep};
use crate::guest::GuestInfo;
use crate::selection::{SelectionAction, SelectionReducer, SelectionState};
use crate::types::{ExperienceId, RestaurantId, SessionId, UsagePolicy};
use chrono::NaiveDate;
use smallvec::{SmallVec, smallvec};
use tablewise_core::composition::{Scope, ScopedReducer, scope_reducer};
use tablewise_core::{effect::Effect, reducer::Reducer};
use tracing::{info, warn};

type Effects = SmallVec<[Effect<BookingAction>; 4]>;

fn addon_state(state: &mut BookingState) -> Option<&mut SelectionState> {
    state.addon_step.as_mut()
}

fn addon_action(action: BookingAction) -> Option<SelectionAction> {
    match action {
        BookingAction::Addons(inner) => Some(inner),
        _ => None,
    }
}

fn selection_env(_: &BookingEnvironment) -> &() {
    &()
}

/// Applies [`BookingAction`]s to a [`BookingState`]
///
/// Add-on events are handed to a scoped [`SelectionReducer`] running on
/// the add-on step state. Rejected commands leave the booking untouched
/// and are recorded in `last_error`.
pub struct BookingReducer {
    addons: ScopedReducer<SelectionReducer, BookingState, BookingAction, BookingEnvironment>,
}

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub fn new() -> Self {
        Self {
            addons: scope_reducer(
                SelectionReducer::new(),
                Scope {
                    state: addon_state,
                    extract: addon_action,
                    embed: BookingAction::Addons,
                    environment: selection_env,
                },
            ),
        }
    }

    fn expect_step(state: &BookingState, expected: WizardStep) -> Result<(), WizardError> {
        if state.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                expected,
                actual: state.step,
            })
        }
    }

    fn move_to(state: &mut BookingState, step: WizardStep) {
        if state.step != step {
            info!(from = %state.step, to = %step, "wizard step changed");
            state.step = step;
        }
    }

    fn select_restaurant(
        state: &mut BookingState,
        restaurant_id: RestaurantId,
        party_size: u32,
        env: &BookingEnvironment,
    ) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Restaurant)?;
        if env.catalog.restaurant(&restaurant_id).is_none() {
            return Err(WizardError::UnknownRestaurant(restaurant_id));
        }
        if party_size == 0 || party_size > env.max_party_size {
            return Err(WizardError::InvalidPartySize {
                requested: party_size,
                max: env.max_party_size,
            });
        }

        let restaurant_changed = state.restaurant.as_ref() != Some(&restaurant_id);
        if restaurant_changed {
            state.clear_schedule();
        }
        if restaurant_changed || state.party_size != party_size {
            state.committed = None;
        }

        state.restaurant = Some(restaurant_id);
        state.party_size = party_size;
        Self::move_to(state, WizardStep::Schedule);
        Ok(SmallVec::new())
    }

    fn check_date(date: NaiveDate, env: &BookingEnvironment) -> Result<(), WizardError> {
        let today = env.clock.today();
        if date < today {
            return Err(WizardError::DateInPast { date, today });
        }
        Ok(())
    }

    fn choose_date(
        state: &mut BookingState,
        date: NaiveDate,
        env: &BookingEnvironment,
    ) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Schedule)?;
        Self::check_date(date, env)?;

        state.date = Some(date);
        state.experience = None;
        state.clear_time();
        Ok(SmallVec::new())
    }

    fn choose_session(
        state: &mut BookingState,
        session_id: SessionId,
        env: &BookingEnvironment,
    ) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Schedule)?;
        if env.catalog.session(&session_id).is_none() {
            return Err(WizardError::UnknownSession(session_id));
        }

        state.session = Some(session_id);
        state.experience = None;
        state.clear_time();
        Ok(SmallVec::new())
    }

    fn choose_experience(
        state: &mut BookingState,
        experience_id: ExperienceId,
        env: &BookingEnvironment,
    ) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Schedule)?;
        let experience = env
            .catalog
            .experience(&experience_id)
            .ok_or_else(|| WizardError::UnknownExperience(experience_id.clone()))?;

        if state.experience.as_ref() == Some(&experience_id) {
            state.experience = None;
            state.clear_time();
            return Ok(SmallVec::new());
        }

        let matches = state.restaurant.as_ref() == Some(&experience.restaurant_id)
            && state.date == Some(experience.date)
            && state.session.as_ref() == Some(&experience.session_id);
        if !matches {
            return Err(WizardError::ExperienceMismatch(experience_id));
        }

        state.experience = Some(experience_id);
        state.clear_time();
        Ok(SmallVec::new())
    }

    fn clear_experience(state: &mut BookingState) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Schedule)?;
        if state.experience.take().is_some() {
            state.clear_time();
        }
        Ok(SmallVec::new())
    }

    fn browse_experience(
        state: &mut BookingState,
        experience_id: ExperienceId,
        env: &BookingEnvironment,
    ) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Schedule)?;
        let experience = env
            .catalog
            .experience(&experience_id)
            .ok_or_else(|| WizardError::UnknownExperience(experience_id.clone()))?;
        if state.restaurant.as_ref() != Some(&experience.restaurant_id) {
            return Err(WizardError::ExperienceMismatch(experience_id));
        }
        Self::check_date(experience.date, env)?;

        state.date = Some(experience.date);
        state.session = Some(experience.session_id.clone());
        state.experience = Some(experience_id);
        state.clear_time();
        Ok(SmallVec::new())
    }

    fn choose_time(
        state: &mut BookingState,
        time: String,
        at_sister: bool,
        env: &BookingEnvironment,
    ) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Schedule)?;
        let slots = state.time_slots(env, at_sister)?;
        if !find_slot(&slots, &time).is_some_and(|slot| slot.available) {
            return Err(WizardError::TimeUnavailable(time));
        }

        state.time = Some(time);
        state.at_sister = at_sister;
        Ok(SmallVec::new())
    }

    fn confirm_schedule(state: &mut BookingState, env: &BookingEnvironment) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Schedule)?;
        if state.date.is_none() {
            return Err(WizardError::MissingDate);
        }
        if state.session.is_none() {
            return Err(WizardError::MissingSession);
        }
        if state.time.is_none() {
            return Err(WizardError::MissingTime);
        }
        Ok(Self::enter_addons(state, env))
    }

    /// Opens the add-on step, restoring the committed selection when the
    /// context and party size are unchanged
    fn enter_addons(state: &mut BookingState, env: &BookingEnvironment) -> Effects {
        let context = state.addon_context();
        let restored = state
            .committed
            .as_ref()
            .filter(|committed| {
                committed.step.context() == context.as_ref() && committed.step.party_size() == state.party_size
            })
            .map(|committed| committed.step.clone());

        let step = restored.unwrap_or_else(|| {
            state.committed = None;
            SelectionState::enter(&env.catalog, context.as_ref(), state.party_size)
        });
        let skip = step.policy() == UsagePolicy::NoMenu;

        state.addon_step = Some(step);
        Self::move_to(state, WizardStep::Addons);

        if skip {
            smallvec![Effect::Send(BookingAction::AdvanceFromAddons)]
        } else {
            SmallVec::new()
        }
    }

    fn advance_from_addons(state: &mut BookingState) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Addons)?;
        let Some(step) = state.addon_step.take() else {
            return Err(WizardError::WrongStep {
                expected: WizardStep::Addons,
                actual: state.step,
            });
        };

        let addons = match step.commit() {
            Ok(addons) => addons,
            Err(error) => {
                state.addon_step = Some(step);
                return Err(error.into());
            },
        };

        info!(
            lines = addons.addons.len(),
            total = %addons.total,
            "add-ons committed"
        );
        state.committed = Some(CommittedSelection { step, addons });
        Self::move_to(state, WizardStep::Details);
        Ok(SmallVec::new())
    }

    fn submit_guest_details(state: &mut BookingState, guest: GuestInfo) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Details)?;
        guest.validate()?;

        state.guest = Some(guest);
        Self::move_to(state, WizardStep::Review);
        Ok(SmallVec::new())
    }

    fn skipped_addons(state: &BookingState) -> bool {
        state
            .committed
            .as_ref()
            .is_some_and(|committed| committed.step.policy() == UsagePolicy::NoMenu)
    }

    fn back(state: &mut BookingState, env: &BookingEnvironment) -> Result<Effects, WizardError> {
        match state.step {
            WizardStep::Restaurant => Err(WizardError::CannotGoBack),
            WizardStep::Schedule => {
                Self::move_to(state, WizardStep::Restaurant);
                Ok(SmallVec::new())
            },
            WizardStep::Addons => {
                state.addon_step = None;
                Self::move_to(state, WizardStep::Schedule);
                Ok(SmallVec::new())
            },
            WizardStep::Details if Self::skipped_addons(state) => {
                Self::move_to(state, WizardStep::Schedule);
                Ok(SmallVec::new())
            },
            WizardStep::Details => Ok(Self::enter_addons(state, env)),
            WizardStep::Review => {
                Self::move_to(state, WizardStep::Details);
                Ok(SmallVec::new())
            },
            WizardStep::Confirmed => Err(WizardError::AlreadyConfirmed),
        }
    }

    fn go_to_step(
        state: &mut BookingState,
        target: WizardStep,
        env: &BookingEnvironment,
    ) -> Result<Effects, WizardError> {
        if target >= state.step {
            return Err(WizardError::InvalidStepJump {
                from: state.step,
                to: target,
            });
        }

        state.addon_step = None;
        if target == WizardStep::Addons {
            return Ok(Self::enter_addons(state, env));
        }
        Self::move_to(state, target);
        Ok(SmallVec::new())
    }

    fn confirm(state: &mut BookingState, env: &BookingEnvironment) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Review)?;

        let confirmed_at = env.clock.now();
        let millis = u64::try_from(confirmed_at.timestamp_millis()).unwrap_or_default();
        let confirmation = Confirmation {
            number: format!("RES-{}", to_base36(millis)),
            confirmed_at,
        };

        info!(
            number = %confirmation.number,
            restaurant = ?state.restaurant,
            party_size = state.party_size,
            "booking confirmed"
        );
        state.confirmation = Some(confirmation);
        Self::move_to(state, WizardStep::Confirmed);
        Ok(SmallVec::new())
    }

    fn forward_addons(
        &self,
        state: &mut BookingState,
        action: BookingAction,
        env: &BookingEnvironment,
    ) -> Result<Effects, WizardError> {
        Self::expect_step(state, WizardStep::Addons)?;
        let effects = self.addons.reduce(state, action, env);
        if let Some(error) = state.addon_step.as_ref().and_then(|step| step.last_error.clone()) {
            return Err(error.into());
        }
        Ok(effects)
    }
}

impl Default for BookingReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let name = action.name();
        if state.step == WizardStep::Confirmed {
            warn!(action = name, "booking already confirmed");
            state.last_error = Some(WizardError::AlreadyConfirmed);
            return SmallVec::new();
        }

        let result = match action {
            BookingAction::SelectRestaurant {
                restaurant_id,
                party_size,
            } => Self::select_restaurant(state, restaurant_id, party_size, env),
            BookingAction::ChooseDate { date } => Self::choose_date(state, date, env),
            BookingAction::ChooseSession { session_id } => Self::choose_session(state, session_id, env),
            BookingAction::ChooseExperience { experience_id } => {
                Self::choose_experience(state, experience_id, env)
            },
            BookingAction::ClearExperience => Self::clear_experience(state),
            BookingAction::BrowseExperience { experience_id } => {
                Self::browse_experience(state, experience_id, env)
            },
            BookingAction::ChooseTime { time, at_sister } => Self::choose_time(state, time, at_sister, env),
            BookingAction::ConfirmSchedule => Self::confirm_schedule(state, env),
            action @ BookingAction::Addons(_) => self.forward_addons(state, action, env),
            BookingAction::AdvanceFromAddons => Self::advance_from_addons(state),
            BookingAction::SubmitGuestDetails { guest } => Self::submit_guest_details(state, guest),
            BookingAction::Back => Self::back(state, env),
            BookingAction::GoToStep { step } => Self::go_to_step(state, step, env),
            BookingAction::Confirm => Self::confirm(state, env),
        };

        match result {
            Ok(effects) => {
                state.last_error = None;
                effects
            },
            Err(error) => {
                warn!(action = name, %error, "wizard command rejected");
                state.last_error = Some(error);
                SmallVec::new()
            },
        }
    }
}

/// Uppercase base-36 rendering used for confirmation numbers
fn to_base36(mut value: u64) -> String {
    let mut digits = Vec::new();
    loop {
        let digit = u32::try_from(value % 36)
            .ok()
            .and_then(|digit| char::from_digit(digit, 36))
            .unwrap_or('0');
        digits.push(digit.to_ascii_uppercase());
        value /= 36;
        if value == 0 {
            break;
        }
    }
    digits.iter().rev().collect()
}
