//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`scope_reducer`**: Run a child reducer on a slice of a parent's state and actions
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//!
//! Together they form the registration point for feature slices: each slice
//! is scoped into the root state, and the scoped reducers are combined.
//!
//! # Examples
//!
//! ```
//! use habitkit_core::composition::{combine_reducers, scope_reducer};
//! use habitkit_core::{Effect, Reducer, SmallVec};
//!
//! #[derive(Clone, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! #[derive(Clone)]
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut CounterState, action: CounterAction, _env: &()) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     counter: CounterState,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     Counter(CounterAction),
//!     Ping,
//! }
//!
//! let app = combine_reducers(vec![std::sync::Arc::new(scope_reducer(
//!     CounterReducer,
//!     |app: &mut AppState| &mut app.counter,
//!     |action: AppAction| match action {
//!         AppAction::Counter(inner) => Some(inner),
//!         AppAction::Ping => None,
//!     },
//!     AppAction::Counter,
//!     |env: &()| env,
//! ))]);
//!
//! let mut state = AppState::default();
//! let _ = app.reduce(&mut state, AppAction::Counter(CounterAction::Increment), &());
//! let _ = app.reduce(&mut state, AppAction::Ping, &());
//! assert_eq!(state.counter.count, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::sync::Arc;

/// Shared, thread-safe reducer object as stored by [`CombinedReducer`]
pub type SharedReducer<S, A, E> = Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in registration order, and all effects are collected
/// and concatenated.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// Number of registered reducers
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Returns true if no reducer is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Clone for CombinedReducer<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.clone(),
        }
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
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
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a child reducer to a slice of a parent's state, actions and environment.
///
/// # Arguments
///
/// - `reducer`: The child reducer
/// - `state`: Borrows the child state out of the parent state
/// - `extract`: Returns the child action carried by a parent action, if any
/// - `embed`: Wraps child actions (from child effects) back into parent actions
/// - `environment`: Borrows the child environment out of the parent environment
///
/// Parent actions for which `extract` returns `None` leave state untouched and
/// produce no effects.
pub fn scope_reducer<S, SubS, A, SubA, E, SubE, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
    environment: fn(&E) -> &SubE,
) -> ScopedReducer<S, A, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = SubE>,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        environment,
    }
}

/// A reducer that runs a child reducer on a slice of its parent.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, A, E, R>
where
    R: Reducer,
{
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    environment: fn(&E) -> &R::Environment,
}

impl<S, A, E, R> Clone for ScopedReducer<S, A, E, R>
where
    R: Reducer + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            state: self.state,
            extract: self.extract,
            embed: self.embed,
            environment: self.environment,
        }
    }
}

impl<S, A, E, R> Reducer for ScopedReducer<S, A, E, R>
where
    R: Reducer,
    R::Action: Send + 'static,
    A: Send + 'static,
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
        let Some(child_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let child_state = (self.state)(state);
        let child_env = (self.environment)(env);

        let embed = self.embed;
        self.reducer
            .reduce(child_state, child_action, child_env)
            .into_iter()
            .map(|effect| effect.map(embed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smallvec;

    #[derive(Clone, Default)]
    struct TestState {
        counter: i32,
        name: String,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
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
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            if matches!(action, TestAction::Increment) {
                state.counter += 1;
            }
            smallvec![Effect::None]
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
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            if let TestAction::SetName(name) = action {
                state.name = name;
            }
            smallvec![Effect::None]
        }
    }

    #[test]
    fn combined_reducers_all_see_every_action() {
        let combined = combine_reducers(vec![Arc::new(CounterReducer), Arc::new(NameReducer)]);
        assert_eq!(combined.len(), 2);

        let mut state = TestState::default();

        let effects = combined.reduce(&mut state, TestAction::Increment, &());
        assert_eq!(state.counter, 1);
        assert_eq!(effects.len(), 2);

        let _ = combined.reduce(&mut state, TestAction::SetName("Alice".to_string()), &());
        assert_eq!(state.name, "Alice");
        assert_eq!(state.counter, 1);
    }

    // Scoped reducer tests
    #[derive(Clone, Default)]
    struct SubState {
        value: i32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum SubAction {
        Add(i32),
        Echo(i32),
    }

    struct SubEnv {
        factor: i32,
    }

    struct SubReducer;

    impl Reducer for SubReducer {
        type State = SubState;
        type Action = SubAction;
        type Environment = SubEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                SubAction::Add(n) => {
                    state.value += n * env.factor;
                    SmallVec::new()
                },
                SubAction::Echo(n) => {
                    smallvec![Effect::Future(Box::pin(async move { Some(SubAction::Add(n)) }))]
                },
            }
        }
    }

    #[derive(Clone, Default)]
    struct ParentState {
        sub: SubState,
        other: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ParentAction {
        Sub(SubAction),
        Unrelated,
    }

    struct ParentEnv {
        sub: SubEnv,
    }

    fn scoped() -> ScopedReducer<ParentState, ParentAction, ParentEnv, SubReducer> {
        scope_reducer(
            SubReducer,
            |parent: &mut ParentState| &mut parent.sub,
            |action: ParentAction| match action {
                ParentAction::Sub(inner) => Some(inner),
                ParentAction::Unrelated => None,
            },
            ParentAction::Sub,
            |env: &ParentEnv| &env.sub,
        )
    }

    #[test]
    fn scoped_reducer_updates_only_its_slice() {
        let env = ParentEnv {
            sub: SubEnv { factor: 2 },
        };
        let mut state = ParentState {
            sub: SubState { value: 5 },
            other: "test".to_string(),
        };

        let _ = scoped().reduce(&mut state, ParentAction::Sub(SubAction::Add(3)), &env);
        assert_eq!(state.sub.value, 11);
        assert_eq!(state.other, "test");
    }

    #[test]
    fn scoped_reducer_ignores_foreign_actions() {
        let env = ParentEnv {
            sub: SubEnv { factor: 1 },
        };
        let mut state = ParentState::default();

        let effects = scoped().reduce(&mut state, ParentAction::Unrelated, &env);
        assert!(effects.is_empty());
        assert_eq!(state.sub.value, 0);
    }

    #[tokio::test]
    async fn scoped_reducer_embeds_child_effects() {
        let env = ParentEnv {
            sub: SubEnv { factor: 1 },
        };
        let mut state = ParentState::default();

        let mut effects = scoped().reduce(&mut state, ParentAction::Sub(SubAction::Echo(4)), &env);
        assert_eq!(effects.len(), 1);

        let Some(Effect::Future(fut)) = effects.pop() else {
            unreachable!("echo produces exactly one future");
        };
        assert_eq!(fut.await, Some(ParentAction::Sub(SubAction::Add(4))));
    }
}
