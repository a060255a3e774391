//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable
//! Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use tablewise_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// Actions given with [`ReducerTest::when_action`] run directly through the
/// reducer; effects are collected but never executed, so feedback actions
/// can be asserted on without running them.
///
/// # Example
///
/// ```ignore
/// use tablewise_testing::ReducerTest;
///
/// ReducerTest::new(SelectionReducer::new())
///     .with_env(())
///     .given_state(SelectionState::enter(&catalog, &context, 4))
///     .when_action(SelectionAction::SelectMenu { addon: AddonId::new(1000) })
///     .then_state(|state| {
///         assert_eq!(state.price_total().cents(), 34_000);
///     })
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Add an action to run (When)
    ///
    /// Calling this more than once runs the actions in order.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add several actions to run in order (When)
    #[must_use]
    pub fn when_actions<I>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
    {
        self.actions.extend(actions);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects returned by the last action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, actions, or environment are not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use tablewise_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect would do something when executed.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that the effects send exactly these actions, in order
    ///
    /// # Panics
    ///
    /// Panics if the sent actions differ.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_sends<A>(effects: &[Effect<A>], expected: &[A])
    where
        A: Clone + std::fmt::Debug + PartialEq,
    {
        let sent: Vec<A> = effects
            .iter()
            .cloned()
            .flat_map(Effect::into_actions)
            .collect();
        assert_eq!(sent, expected, "Sent actions differ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablewise_core::{SmallVec, smallvec};

    #[derive(Clone, Debug)]
    struct TableState {
        seated: u32,
        capacity: u32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TableAction {
        Seat,
        Leave,
        TableFull,
    }

    struct TableReducer;

    impl Reducer for TableReducer {
        type State = TableState;
        type Action = TableAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TableAction::Seat => {
                    state.seated = (state.seated + 1).min(state.capacity);
                    if state.seated == state.capacity {
                        smallvec![Effect::Send(TableAction::TableFull)]
                    } else {
                        smallvec![Effect::None]
                    }
                },
                TableAction::Leave => {
                    state.seated = state.seated.saturating_sub(1);
                    smallvec![Effect::None]
                },
                TableAction::TableFull => SmallVec::new(),
            }
        }
    }

    #[test]
    fn test_single_action() {
        ReducerTest::new(TableReducer)
            .with_env(())
            .given_state(TableState { seated: 0, capacity: 4 })
            .when_action(TableAction::Seat)
            .then_state(|state| {
                assert_eq!(state.seated, 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_action_sequence_keeps_last_effects() {
        ReducerTest::new(TableReducer)
            .with_env(())
            .given_state(TableState { seated: 0, capacity: 2 })
            .when_actions([TableAction::Seat, TableAction::Seat])
            .then_state(|state| {
                assert_eq!(state.seated, 2);
            })
            .then_effects(|effects| {
                assertions::assert_sends(effects, &[TableAction::TableFull]);
            })
            .run();
    }

    #[test]
    fn test_leave_saturates() {
        ReducerTest::new(TableReducer)
            .with_env(())
            .given_state(TableState { seated: 0, capacity: 2 })
            .when_action(TableAction::Leave)
            .then_state(|state| {
                assert_eq!(state.seated, 0);
            })
            .run();
    }

    #[test]
    fn test_assertions_no_effects() {
        assertions::assert_no_effects::<TableAction>(&[Effect::None]);
        assertions::assert_no_effects::<TableAction>(&[]);
    }

    #[test]
    fn test_assertions_effects_count() {
        assertions::assert_effects_count(&[Effect::<TableAction>::None], 1);
        assertions::assert_effects_count::<TableAction>(&[], 0);
    }

    #[test]
    #[should_panic(expected = "Expected no effects")]
    fn test_assert_no_effects_rejects_send() {
        assertions::assert_no_effects(&[Effect::Send(TableAction::TableFull)]);
    }
}
