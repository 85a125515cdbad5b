//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a reducer on a slice of state and environment
//!
//! Together they mount independent reducers (queries, SSR bookkeeping) under
//! one application state, the way a store combines slice reducers.
//!
//! # Examples
//!
//! ```
//! use request_state_core::composition::{combine_reducers, scope_reducer};
//! use request_state_core::reducer::{Reducer, Transition};
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     started: u32,
//!     finished: u32,
//! }
//!
//! struct StartedReducer;
//! struct FinishedReducer;
//!
//! impl Reducer for StartedReducer {
//!     type State = u32;
//!     type Action = &'static str;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut u32, action: &'static str, _env: &()) -> Transition {
//!         if action == "start" {
//!             *state += 1;
//!             return Transition::Changed;
//!         }
//!         Transition::Unchanged
//!     }
//! }
//!
//! impl Reducer for FinishedReducer {
//!     type State = u32;
//!     type Action = &'static str;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut u32, action: &'static str, _env: &()) -> Transition {
//!         if action == "finish" {
//!             *state += 1;
//!             return Transition::Changed;
//!         }
//!         Transition::Unchanged
//!     }
//! }
//!
//! let combined = combine_reducers(vec![
//!     Box::new(scope_reducer(StartedReducer, |s: &mut AppState| &mut s.started, |env: &()| env)),
//!     Box::new(scope_reducer(FinishedReducer, |s: &mut AppState| &mut s.finished, |env: &()| env)),
//! ]);
//!
//! let mut state = AppState::default();
//! assert!(combined.reduce(&mut state, "start", &()).is_changed());
//! assert!(!combined.reduce(&mut state, "noop", &()).is_changed());
//! assert_eq!(state.started, 1);
//! assert_eq!(state.finished, 0);
//! ```

use crate::reducer::{Reducer, Transition};

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence with its own clone of the action. The
/// combined transition is `Changed` if any reducer changed the state.
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type
/// - `E`: The environment type
#[must_use]
pub fn combine_reducers<S, A, E>(
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E>>>,
) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E>>>,
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Transition {
        let mut transition = Transition::Unchanged;

        for reducer in &self.reducers {
            transition |= reducer.reduce(state, action.clone(), env);
        }

        tracing::trace!(
            reducers = self.reducers.len(),
            changed = transition.is_changed(),
            "combined reduction"
        );

        transition
    }
}

/// Scopes a reducer to a slice of a larger state and environment.
///
/// The state lens borrows the child state mutably, so the child reducer
/// writes in place and an `Unchanged` child leaves the parent untouched.
///
/// # Type Parameters
///
/// - `S`: The parent state type
/// - `SubS`: The child state type
/// - `A`: The action type
/// - `E`: The parent environment type
/// - `SubE`: The child environment type
pub fn scope_reducer<S, SubS, A, E, SubE, R>(
    reducer: R,
    get_state: fn(&mut S) -> &mut SubS,
    get_env: fn(&E) -> &SubE,
) -> ScopedReducer<S, SubS, A, E, SubE, R>
where
    S: 'static,
    SubS: 'static,
    A: 'static,
    E: 'static,
    SubE: 'static,
    R: Reducer<State = SubS, Action = A, Environment = SubE>,
{
    ScopedReducer {
        reducer,
        get_state,
        get_env,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a slice of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, E, SubE, R>
where
    S: 'static,
    SubS: 'static,
    A: 'static,
    E: 'static,
    SubE: 'static,
    R: Reducer<State = SubS, Action = A, Environment = SubE>,
{
    reducer: R,
    get_state: fn(&mut S) -> &mut SubS,
    get_env: fn(&E) -> &SubE,
    _phantom: std::marker::PhantomData<A>,
}

impl<S, SubS, A, E, SubE, R> Reducer for ScopedReducer<S, SubS, A, E, SubE, R>
where
    S: 'static,
    SubS: 'static,
    A: 'static,
    E: 'static,
    SubE: 'static,
    R: Reducer<State = SubS, Action = A, Environment = SubE>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Transition {
        let sub_state = (self.get_state)(state);
        let sub_env = (self.get_env)(env);
        self.reducer.reduce(sub_state, action, sub_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct TestState {
        counter: i32,
        name: String,
    }

    #[derive(Clone)]
    enum TestAction {
        Increment,
        Decrement,
        SetName(String),
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> Transition {
            match action {
                TestAction::Increment => {
                    state.counter += 1;
                    Transition::Changed
                },
                TestAction::Decrement => {
                    state.counter -= 1;
                    Transition::Changed
                },
                TestAction::SetName(_) => Transition::Unchanged,
            }
        }
    }

    struct NameReducer;

    impl Reducer for NameReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> Transition {
            if let TestAction::SetName(name) = action {
                state.name = name;
                return Transition::Changed;
            }
            Transition::Unchanged
        }
    }

    #[test]
    fn test_combine_reducers() {
        let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(NameReducer)]);

        let mut state = TestState::default();

        assert!(combined.reduce(&mut state, TestAction::Increment, &()).is_changed());
        assert_eq!(state.counter, 1);

        assert!(
            combined
                .reduce(&mut state, TestAction::SetName("Alice".to_string()), &())
                .is_changed()
        );
        assert_eq!(state.name, "Alice");

        let _ = combined.reduce(&mut state, TestAction::Decrement, &());
        assert_eq!(state.counter, 0);
        assert_eq!(state.name, "Alice");
    }

    #[test]
    fn test_combine_reducers_reports_unchanged() {
        let combined: CombinedReducer<TestState, TestAction, ()> = combine_reducers(vec![]);
        let mut state = TestState::default();
        assert_eq!(
            combined.reduce(&mut state, TestAction::Increment, &()),
            Transition::Unchanged
        );
    }

    #[derive(Clone, Default)]
    struct SubState {
        value: i32,
    }

    #[derive(Clone)]
    enum SubAction {
        Add,
        Noop,
    }

    struct SubReducer;

    impl Reducer for SubReducer {
        type State = SubState;
        type Action = SubAction;
        type Environment = i32;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            step: &Self::Environment,
        ) -> Transition {
            match action {
                SubAction::Add => {
                    state.value += step;
                    Transition::Changed
                },
                SubAction::Noop => Transition::Unchanged,
            }
        }
    }

    #[derive(Clone, Default)]
    struct ParentState {
        sub: SubState,
        other: String,
    }

    struct ParentEnv {
        step: i32,
    }

    #[test]
    fn test_scope_reducer() {
        let scoped = scope_reducer(
            SubReducer,
            |parent: &mut ParentState| &mut parent.sub,
            |env: &ParentEnv| &env.step,
        );

        let mut state = ParentState {
            sub: SubState { value: 5 },
            other: "test".to_string(),
        };
        let env = ParentEnv { step: 3 };

        assert!(scoped.reduce(&mut state, SubAction::Add, &env).is_changed());
        assert_eq!(state.sub.value, 8);
        assert_eq!(state.other, "test");

        assert!(!scoped.reduce(&mut state, SubAction::Noop, &env).is_changed());
        assert_eq!(state.sub.value, 8);
    }
}
