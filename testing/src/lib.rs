//! # Tablewise Testing
//!
//! Testing utilities for the tablewise reducer architecture.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - Effect assertion helpers
//! - Mock implementations of Environment traits
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use tablewise_testing::{ReducerTest, assertions, test_clock};
//!
//! #[test]
//! fn shared_menu_is_priced_per_guest() {
//!     ReducerTest::new(SelectionReducer::new())
//!         .with_env(())
//!         .given_state(dinner_for(4))
//!         .when_action(SelectionAction::SelectMenu { addon: SET_MENU_4 })
//!         .then_state(|s| assert_eq!(s.price_total().cents(), 34_000))
//!         .then_effects(assertions::assert_no_effects)
//!         .run();
//! }
//! ```

use chrono::{DateTime, Utc};
use tablewise_core::environment::Clock;

pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tablewise_testing::mocks::FixedClock;
    /// use tablewise_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 12:00:00 UTC, a Wednesday)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T12:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Property-based testing strategies
///
/// Generic building blocks for the booking properties: party sizes,
/// counter deltas and bounded event sequences.
pub mod properties {
    use proptest::prelude::*;

    /// Party sizes in `1..=max`
    pub fn party_size(max: u32) -> impl Strategy<Value = u32> {
        1..=max.max(1)
    }

    /// Single `+n`/`-n` adjustments, biased towards the `±1` steppers a guest uses
    pub fn delta() -> impl Strategy<Value = i32> {
        prop_oneof![
            4 => Just(1),
            4 => Just(-1),
            1 => -12i32..=12,
        ]
    }

    /// Sequences of `len` adjustments
    pub fn deltas(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<i32>> {
        prop::collection::vec(delta(), len)
    }

    /// Pick an element of a non-empty slice
    ///
    /// # Panics
    ///
    /// Panics if `items` is empty.
    #[allow(clippy::panic)]
    pub fn one_of<T>(items: Vec<T>) -> impl Strategy<Value = T>
    where
        T: Clone + std::fmt::Debug + 'static,
    {
        assert!(!items.is_empty(), "one_of needs at least one item");
        prop::sample::select(items)
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(clock.today().to_string(), "2025-01-01");
    }

    proptest! {
        #[test]
        fn party_size_stays_in_bounds(size in properties::party_size(20)) {
            prop_assert!((1..=20).contains(&size));
        }

        #[test]
        fn deltas_respect_length(ds in properties::deltas(0..8)) {
            prop_assert!(ds.len() < 8);
            prop_assert!(ds.iter().all(|d| (-12..=12).contains(d)));
        }
    }
}
