//! Reducer composition utilities
//!
//! A feature reducer is written against its own small state and action
//! types. [`scope_reducer`] runs it inside a larger parent:
//!
//! - the child state is borrowed out of the parent (it may be absent, e.g.
//!   a wizard step that is not active yet),
//! - parent actions are narrowed to child actions,
//! - child effects are lifted back into parent actions,
//! - the parent environment is projected to what the child needs.
//!
//! # Example
//!
//! ```
//! use tablewise_core::composition::{Scope, scope_reducer};
//! use tablewise_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct GuestCount {
//!     value: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum GuestAction {
//!     Add,
//! }
//!
//! struct GuestReducer;
//!
//! impl Reducer for GuestReducer {
//!     type State = GuestCount;
//!     type Action = GuestAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut GuestCount, _action: GuestAction, _env: &()) -> SmallVec<[Effect<GuestAction>; 4]> {
//!         state.value += 1;
//!         SmallVec::new()
//!     }
//! }
//!
//! #[derive(Clone, Debug, Default)]
//! struct Wizard {
//!     guests: Option<GuestCount>,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum WizardAction {
//!     Guests(GuestAction),
//!     Reset,
//! }
//!
//! let scoped = scope_reducer(
//!     GuestReducer,
//!     Scope {
//!         state: |w: &mut Wizard| w.guests.as_mut(),
//!         extract: |a: WizardAction| match a {
//!             WizardAction::Guests(inner) => Some(inner),
//!             WizardAction::Reset => None,
//!         },
//!         embed: WizardAction::Guests,
//!         environment: |_: &()| &(),
//!     },
//! );
//!
//! let mut wizard = Wizard { guests: Some(GuestCount::default()) };
//! let _ = scoped.reduce(&mut wizard, WizardAction::Guests(GuestAction::Add), &());
//! assert_eq!(wizard.guests.map(|g| g.value), Some(1));
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Describes how a child reducer is embedded in a parent.
///
/// `S`/`A`/`E` are the parent's state, action and environment; `SubS`/`SubA`/`SubE`
/// the child's.
pub struct Scope<S, A, E, SubS, SubA, SubE> {
    /// Borrow the child state; `None` when the child is not active
    pub state: fn(&mut S) -> Option<&mut SubS>,
    /// Narrow a parent action to a child action
    pub extract: fn(A) -> Option<SubA>,
    /// Wrap a child action back into the parent action type
    pub embed: fn(SubA) -> A,
    /// Project the parent environment to the child's
    pub environment: fn(&E) -> &SubE,
}

/// Scopes a reducer to operate on a part of a larger state.
///
/// The returned reducer ignores parent actions that do not narrow to a child
/// action, and child actions that arrive while the child state is absent.
#[must_use]
pub const fn scope_reducer<R, S, A, E>(
    reducer: R,
    scope: Scope<S, A, E, R::State, R::Action, R::Environment>,
) -> ScopedReducer<R, S, A, E>
where
    R: Reducer,
{
    ScopedReducer { reducer, scope }
}

/// A reducer running on a sub-state of its parent.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<R, S, A, E>
where
    R: Reducer,
{
    reducer: R,
    scope: Scope<S, A, E, R::State, R::Action, R::Environment>,
}

impl<R, S, A, E> ScopedReducer<R, S, A, E>
where
    R: Reducer,
{
    /// The wrapped child reducer
    #[must_use]
    pub const fn inner(&self) -> &R {
        &self.reducer
    }
}

impl<R, S, A, E> Reducer for ScopedReducer<R, S, A, E>
where
    R: Reducer,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.scope.extract)(action) else {
            return SmallVec::new();
        };

        let Some(child_state) = (self.scope.state)(state) else {
            tracing::trace!("scoped action dropped: child state is not active");
            return SmallVec::new();
        };

        let child_env = (self.scope.environment)(env);
        let embed = self.scope.embed;

        self.reducer
            .reduce(child_state, child_action, child_env)
            .into_iter()
            .map(|effect| effect.map(&embed))
            .collect()
    }
}
