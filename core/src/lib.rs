//! # Request State Core
//!
//! Core traits and types for request-lifecycle reducers.
//!
//! This crate provides the fundamental abstractions shared by the query and
//! server-side-rendering reducers: the [`Reducer`](reducer::Reducer) trait, the
//! [`Transition`](reducer::Transition) it reports, and composition utilities for
//! mounting several reducers over one application state.
//!
//! ## Core Concepts
//!
//! - **State**: Plain data owned by a reducer (query records, SSR bookkeeping)
//! - **Action**: Inputs produced by an external dispatch layer
//! - **Reducer**: Pure function `(State, Action, Environment) → Transition`
//! - **Transition**: Whether the state was touched at all
//! - **Environment**: Injected configuration (normalization strategy, SSR mode)
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Referential stability: an unchanged state is never rewritten
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```
//! use request_state_core::reducer::{Reducer, Transition};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Seen {
//!     types: Vec<String>,
//! }
//!
//! struct SeenReducer;
//!
//! impl Reducer for SeenReducer {
//!     type State = Seen;
//!     type Action = String;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Seen, action: String, _env: &()) -> Transition {
//!         if action.is_empty() {
//!             return Transition::Unchanged;
//!         }
//!         state.types.push(action);
//!         Transition::Changed
//!     }
//! }
//!
//! let mut state = Seen::default();
//! assert!(SeenReducer.reduce(&mut state, "FETCH_BOOK".into(), &()).is_changed());
//! assert!(!SeenReducer.reduce(&mut state, String::new(), &()).is_changed());
//! ```

pub mod composition;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → Transition`
///
/// They contain all state logic and are deterministic and testable.
pub mod reducer {
    use std::ops::{BitOr, BitOrAssign};

    /// Outcome of reducing one action.
    ///
    /// `Unchanged` is a promise: the reducer did not write to the state, so
    /// callers may keep using the previous value (and anything memoized on it).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[must_use]
    pub enum Transition {
        /// The state was left untouched
        #[default]
        Unchanged,
        /// The state was written
        Changed,
    }

    impl Transition {
        /// Build a transition from a "did anything change" flag
        pub const fn from_changed(changed: bool) -> Self {
            if changed { Self::Changed } else { Self::Unchanged }
        }

        /// Whether the state was written
        #[must_use]
        pub const fn is_changed(self) -> bool {
            matches!(self, Self::Changed)
        }

        /// Combine two transitions of passes over the same state
        pub const fn merge(self, other: Self) -> Self {
            Self::from_changed(self.is_changed() || other.is_changed())
        }
    }

    impl BitOr for Transition {
        type Output = Self;

        fn bitor(self, rhs: Self) -> Self {
            self.merge(rhs)
        }
    }

    impl BitOrAssign for Transition {
        fn bitor_assign(&mut self, rhs: Self) {
            *self = self.merge(rhs);
        }
    }

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected configuration this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for QueriesReducer {
    ///     type State = QueriesState;
    ///     type Action = Action;
    ///     type Environment = RequestsConfig;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut QueriesState,
    ///         action: Action,
    ///         config: &RequestsConfig,
    ///     ) -> Transition {
    ///         match action {
    ///             Action::Success { .. } => Transition::Changed,
    ///             _ => Transition::Unchanged,
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected configuration
        type Environment;

        /// Reduce an action into the state
        ///
        /// This is a pure function that:
        /// 1. Inspects the action
        /// 2. Updates state in place, or leaves it untouched
        /// 3. Reports which of the two happened
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected configuration
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Transition;
    }

    /// Functional form of [`Reducer::reduce`].
    ///
    /// Returns `None` when the action leaves the state unchanged, so the caller
    /// keeps its existing value; otherwise the next state.
    ///
    /// # Example
    ///
    /// ```
    /// use request_state_core::reducer::{next_state, Reducer, Transition};
    ///
    /// struct Double;
    ///
    /// impl Reducer for Double {
    ///     type State = i64;
    ///     type Action = bool;
    ///     type Environment = ();
    ///
    ///     fn reduce(&self, state: &mut i64, apply: bool, _env: &()) -> Transition {
    ///         if apply {
    ///             *state *= 2;
    ///         }
    ///         Transition::from_changed(apply)
    ///     }
    /// }
    ///
    /// assert_eq!(next_state(&Double, &4, true, &()), Some(8));
    /// assert_eq!(next_state(&Double, &4, false, &()), None);
    /// ```
    pub fn next_state<R>(
        reducer: &R,
        state: &R::State,
        action: R::Action,
        env: &R::Environment,
    ) -> Option<R::State>
    where
        R: Reducer + ?Sized,
        R::State: Clone,
    {
        let mut next = state.clone();
        match reducer.reduce(&mut next, action, env) {
            Transition::Changed => Some(next),
            Transition::Unchanged => None,
        }
    }
}

pub use reducer::{Reducer, Transition, next_state};
