//! Root state aggregator.
//!
//! Registers each feature slice under its own key of [`AppState`] and wires
//! the combined reducer into a [`Store`]. The habit collection is the only
//! slice today; another one registers the same way in [`app_reducer`].

use crate::config::Config;
use crate::reducer::{HabitEnvironment, HabitReducer};
use crate::types::{CompletionDate, Frequency, Habit, HabitAction, HabitId, HabitState};
use habitkit_core::composition::{combine_reducers, scope_reducer, CombinedReducer, SharedReducer};
use habitkit_runtime::{EffectHandle, Store, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Root application state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Habit collection slice
    pub habits: HabitState,
}

/// Root application action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppAction {
    /// Action for the habit slice
    Habits(HabitAction),
}

impl From<HabitAction> for AppAction {
    fn from(action: HabitAction) -> Self {
        Self::Habits(action)
    }
}

/// Root environment
#[derive(Clone)]
pub struct AppEnvironment {
    /// Dependencies of the habit slice
    pub habits: HabitEnvironment,
}

impl AppEnvironment {
    /// Creates a new `AppEnvironment`
    #[must_use]
    pub const fn new(habits: HabitEnvironment) -> Self {
        Self { habits }
    }

    /// Production dependencies for every slice
    #[must_use]
    pub fn production() -> Self {
        Self::new(HabitEnvironment::production())
    }
}

/// Reducer over the whole [`AppState`]
pub type AppReducer = CombinedReducer<AppState, AppAction, AppEnvironment>;

/// Store holding the whole [`AppState`]
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Builds the root reducer from the registered slices
#[must_use]
pub fn app_reducer() -> AppReducer {
    let habits: SharedReducer<AppState, AppAction, AppEnvironment> = Arc::new(scope_reducer(
        HabitReducer::new(),
        |state: &mut AppState| &mut state.habits,
        |action: AppAction| match action {
            AppAction::Habits(action) => Some(action),
        },
        AppAction::Habits,
        |env: &AppEnvironment| &env.habits,
    ));

    combine_reducers(vec![habits])
}

/// Creates an empty store configured from `config`
#[must_use]
pub fn new_app_store(env: AppEnvironment, config: &Config) -> AppStore {
    tracing::debug!(
        broadcast_capacity = config.broadcast_capacity,
        "Creating app store"
    );
    Store::with_config(AppState::default(), app_reducer(), env, config.store_config())
}

/// Dispatches `AddHabit`
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
pub async fn add_habit(
    store: &AppStore,
    name: impl Into<String>,
    frequency: Frequency,
) -> Result<EffectHandle, StoreError> {
    store
        .send(AppAction::Habits(HabitAction::AddHabit {
            name: name.into(),
            frequency,
        }))
        .await
}

/// Dispatches `ToggleHabit`
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
pub async fn toggle_habit(
    store: &AppStore,
    id: HabitId,
    date: CompletionDate,
) -> Result<EffectHandle, StoreError> {
    store
        .send(AppAction::Habits(HabitAction::ToggleHabit { id, date }))
        .await
}

/// Dispatches `RemoveHabit`
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
pub async fn remove_habit(store: &AppStore, id: HabitId) -> Result<EffectHandle, StoreError> {
    store
        .send(AppAction::Habits(HabitAction::RemoveHabit { id }))
        .await
}

/// Snapshot of the habit collection, in order
pub async fn habits(store: &AppStore) -> Vec<Habit> {
    store.state(|s| s.habits.habits.clone()).await
}
