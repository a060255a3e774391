//! # Tablewise Core
//!
//! Core traits and types for the tablewise booking engine.
//!
//! Every piece of mutable booking state in this workspace is changed the same
//! way: an action is fed to a reducer, the reducer updates state in place and
//! returns a (usually empty) list of effect descriptions.
//!
//! ## Core Concepts
//!
//! - **State**: Owned, `Clone`-able data for one feature (a wizard step, a selection set)
//! - **Action**: Every input a reducer understands
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: A description of follow-up work, executed by the runtime `Store`
//! - **Environment**: Injected dependencies (clock, availability source)
//!
//! Everything is synchronous. Effects never perform I/O; the only feedback an
//! effect can produce is another action sent to the same store.
//!
//! ## Example
//!
//! ```
//! use tablewise_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct PartyState {
//!     guests: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum PartyAction {
//!     AddGuest,
//! }
//!
//! struct PartyReducer;
//!
//! impl Reducer for PartyReducer {
//!     type State = PartyState;
//!     type Action = PartyAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut PartyState,
//!         action: PartyAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<PartyAction>; 4]> {
//!         match action {
//!             PartyAction::AddGuest => state.guests += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = PartyState::default();
//! let effects = PartyReducer.reduce(&mut state, PartyAction::AddGuest, &());
//! assert_eq!(state.guests, 1);
//! assert!(effects.is_empty());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer composition utilities
pub mod composition;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They hold all business rules and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for SelectionReducer {
    ///     type State = SelectionState;
    ///     type Action = SelectionAction;
    ///     type Environment = ();
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut SelectionState,
    ///         action: SelectionAction,
    ///         _env: &(),
    ///     ) -> SmallVec<[Effect<SelectionAction>; 4]> {
    ///         match action {
    ///             SelectionAction::SelectMenu { addon } => {
    ///                 // Policy rules here
    ///                 SmallVec::new()
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// A rejected action must leave the domain part of `state` untouched.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe follow-up work for the runtime. They are plain values,
/// so reducers stay pure and tests can inspect exactly what was requested.
pub mod effect {
    /// Effect type - describes work the `Store` performs after a reduce call
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Feed an action back into the same store, after the current one
        Send(Action),

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns true if executing this effect does nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Send(_) => false,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
            }
        }

        /// Transform the action carried by this effect
        ///
        /// Used when a child reducer runs inside a parent: child actions are
        /// wrapped back into the parent's action type.
        #[must_use]
        pub fn map<B, F>(self, f: &F) -> Effect<B>
        where
            F: Fn(Action) -> B,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Send(action) => Effect::Send(f(action)),
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map(f)).collect())
                },
            }
        }

        /// Flatten into the actions this effect sends, in execution order
        #[must_use]
        pub fn into_actions(self) -> Vec<Action> {
            let mut actions = Vec::new();
            self.collect_actions(&mut actions);
            actions
        }

        fn collect_actions(self, out: &mut Vec<Action>) {
            match self {
                Effect::None => {},
                Effect::Send(action) => out.push(action),
                Effect::Sequential(effects) => {
                    for effect in effects {
                        effect.collect_actions(out);
                    }
                },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected via
/// the Environment parameter.
pub mod environment {
    use chrono::{DateTime, NaiveDate, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use tablewise_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// assert!(clock.today() <= clock.now().date_naive());
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// The current calendar day (UTC)
        fn today(&self) -> NaiveDate {
            self.now().date_naive()
        }
    }

    /// Production clock backed by the system time
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum Inner {
        Skip,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Outer {
        Step(Inner),
    }

    #[test]
    fn map_wraps_nested_sends() {
        let effect = Effect::chain(vec![Effect::None, Effect::Send(Inner::Skip)]);
        let mapped = effect.map(&Outer::Step);
        assert_eq!(
            mapped,
            Effect::Sequential(vec![Effect::None, Effect::Send(Outer::Step(Inner::Skip))])
        );
    }

    #[test]
    fn into_actions_preserves_order() {
        let effect = Effect::chain(vec![
            Effect::Send(1),
            Effect::chain(vec![Effect::Send(2), Effect::None]),
            Effect::Send(3),
        ]);
        assert_eq!(effect.into_actions(), vec![1, 2, 3]);
    }

    #[test]
    fn empty_sequence_is_none() {
        assert!(Effect::<()>::chain(vec![Effect::None, Effect::chain(vec![])]).is_none());
        assert!(!Effect::Send(()).is_none());
    }
}
