//! # Tablewise Runtime
//!
//! Runtime for the tablewise reducer architecture.
//!
//! The [`Store`] owns a feature's state, runs its reducer and executes the
//! effects the reducer returns. Execution is synchronous and single-threaded:
//! one `send` processes the action and every action fed back through
//! `Effect::Send`, in order, before returning.
//!
//! ## Example
//!
//! ```ignore
//! use tablewise_runtime::Store;
//!
//! let mut store = Store::new(BookingState::new(2), BookingReducer::new(), env);
//!
//! store.send(BookingAction::SelectRestaurant { restaurant_id, party_size: 4 })?;
//!
//! let step = store.state(|s| s.step);
//! ```

use std::collections::VecDeque;
use tablewise_core::{effect::Effect, reducer::Reducer};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept feeding actions back past the configured limit.
        ///
        /// State reflects every action processed up to the limit; the
        /// remaining queued actions are dropped.
        #[error("Feedback limit of {limit} actions exceeded")]
        FeedbackLimitExceeded {
            /// The configured limit
            limit: usize,
        },
    }
}

pub use error::StoreError;

/// Configuration for a [`Store`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of actions one `send` may process, including the first
    pub max_feedback_actions: usize,
    /// Keep a copy of every processed action (tests, debugging)
    pub record_history: bool,
}

impl StoreConfig {
    /// Default limit on actions processed by one `send`
    pub const DEFAULT_MAX_FEEDBACK_ACTIONS: usize = 64;

    /// Set the feedback limit (at least one action is always processed)
    #[must_use]
    pub const fn with_max_feedback_actions(mut self, limit: usize) -> Self {
        self.max_feedback_actions = if limit == 0 { 1 } else { limit };
        self
    }

    /// Enable or disable action history
    #[must_use]
    pub const fn with_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_feedback_actions: Self::DEFAULT_MAX_FEEDBACK_ACTIONS,
            record_history: false,
        }
    }
}

/// The Store - owns state and runs the reducer/effect loop
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// The store holds its state exclusively; callers read it through
/// [`Store::state`] or take it with [`Store::into_state`].
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: S,
    reducer: R,
    environment: E,
    config: StoreConfig,
    history: Vec<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    A: Clone + std::fmt::Debug,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new store with a custom configuration
    #[must_use]
    pub const fn with_config(
        initial_state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
    ) -> Self {
        Self {
            state: initial_state,
            reducer,
            environment,
            config,
            history: Vec::new(),
        }
    }

    /// Send an action through the reducer and drain its feedback
    ///
    /// Returns the number of actions processed (the sent action plus every
    /// action produced by `Effect::Send`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FeedbackLimitExceeded`] when effects keep
    /// producing actions beyond [`StoreConfig::max_feedback_actions`].
    pub fn send(&mut self, action: A) -> Result<usize, StoreError> {
        let mut queue = VecDeque::from([action]);
        let mut processed = 0;

        while let Some(action) = queue.pop_front() {
            if processed == self.config.max_feedback_actions {
                tracing::warn!(
                    limit = self.config.max_feedback_actions,
                    dropped = queue.len() + 1,
                    "store feedback limit exceeded"
                );
                return Err(StoreError::FeedbackLimitExceeded {
                    limit: self.config.max_feedback_actions,
                });
            }

            tracing::trace!(?action, "reducing action");
            if self.config.record_history {
                self.history.push(action.clone());
            }

            let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
            metrics::counter!("store.actions.processed").increment(1);
            processed += 1;

            for effect in effects {
                Self::execute_effect(effect, &mut queue);
            }
        }

        Ok(processed)
    }

    fn execute_effect(effect: Effect<A>, queue: &mut VecDeque<A>) {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Send(action) => {
                tracing::trace!(?action, "Executing Effect::Send");
                metrics::counter!("store.effects.executed", "type" => "send").increment(1);
                queue.push_back(action);
            },
            Effect::Sequential(effects) => {
                tracing::trace!(count = effects.len(), "Executing Effect::Sequential");
                metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                for effect in effects {
                    Self::execute_effect(effect, queue);
                }
            },
        }
    }

    /// Read state through a projection
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&self.state)
    }

    /// The injected environment
    #[must_use]
    pub const fn environment(&self) -> &E {
        &self.environment
    }

    /// Actions processed so far, oldest first (empty unless history is enabled)
    #[must_use]
    pub fn history(&self) -> &[A] {
        &self.history
    }

    /// Consume the store, returning its state
    #[must_use]
    pub fn into_state(self) -> S {
        self.state
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tablewise_core::{SmallVec, smallvec};

    #[derive(Clone, Debug, Default)]
    struct CourseState {
        served: Vec<u32>,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum CourseAction {
        Serve(u32),
        ServeThrough(u32),
    }

    struct CourseReducer;

    impl Reducer for CourseReducer {
        type State = CourseState;
        type Action = CourseAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                CourseAction::Serve(n) => {
                    state.served.push(n);
                    SmallVec::new()
                },
                CourseAction::ServeThrough(last) => {
                    let sends = (1..=last).map(|n| Effect::Send(CourseAction::Serve(n))).collect();
                    smallvec![Effect::chain(sends), Effect::None]
                },
            }
        }
    }

    #[test]
    fn send_drains_feedback_in_order() {
        let mut store = Store::new(CourseState::default(), CourseReducer, ());

        let processed = store.send(CourseAction::ServeThrough(4)).unwrap();

        assert_eq!(processed, 5);
        assert_eq!(store.state(|s| s.served.clone()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn feedback_limit_stops_processing() {
        let config = StoreConfig::default().with_max_feedback_actions(3);
        let mut store = Store::with_config(CourseState::default(), CourseReducer, (), config);

        let result = store.send(CourseAction::ServeThrough(6));

        assert_eq!(result, Err(StoreError::FeedbackLimitExceeded { limit: 3 }));
        assert_eq!(store.into_state().served, vec![1, 2]);
    }

    #[test]
    fn history_records_processed_actions() {
        let config = StoreConfig::default().with_history(true);
        let mut store = Store::with_config(CourseState::default(), CourseReducer, (), config);

        store.send(CourseAction::ServeThrough(1)).unwrap();

        assert_eq!(
            store.history(),
            &[CourseAction::ServeThrough(1), CourseAction::Serve(1)]
        );
    }

    #[test]
    fn history_is_empty_by_default() {
        let mut store = Store::new(CourseState::default(), CourseReducer, ());
        store.send(CourseAction::Serve(7)).unwrap();
        assert!(store.history().is_empty());
    }
}
