//! Reducer logic for the habit collection.
//!
//! Commands are decided into events against the current state, then events
//! are applied. Nothing here fails: an unknown habit turns a command into a
//! no-op, and names or dates are accepted as given.

use crate::types::{CompletionDate, Habit, HabitAction, HabitId, HabitState};
use habitkit_core::{
    effect::Effect,
    environment::{Clock, IdGenerator, SystemClock, UuidGenerator},
    reducer::Reducer,
    SmallVec,
};
use std::sync::Arc;

/// Environment dependencies for the habit reducer
#[derive(Clone)]
pub struct HabitEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of fresh habit identifiers
    pub ids: Arc<dyn IdGenerator>,
}

impl HabitEnvironment {
    /// Creates a new `HabitEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System time and random v4 identifiers
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }
}

/// Reducer for the habit collection
#[derive(Clone, Copy, Debug)]
pub struct HabitReducer;

impl HabitReducer {
    /// Creates a new `HabitReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decides the event for a `ToggleHabit` command
    fn decide_toggle(state: &HabitState, id: HabitId, date: CompletionDate) -> Option<HabitAction> {
        let habit = state.get(&id)?;
        if habit.is_completed_on(&date) {
            Some(HabitAction::HabitUncompleted { id, date })
        } else {
            Some(HabitAction::HabitCompleted { id, date })
        }
    }

    /// Applies an event to state
    fn apply_event(state: &mut HabitState, action: &HabitAction) {
        match action {
            HabitAction::HabitAdded {
                id,
                name,
                frequency,
                created_at,
            } => {
                state
                    .habits
                    .push(Habit::new(*id, name.clone(), *frequency, *created_at));
            },
            HabitAction::HabitCompleted { id, date } => {
                if let Some(habit) = state.get_mut(id) {
                    habit.mark_completed(date.clone());
                }
            },
            HabitAction::HabitUncompleted { id, date } => {
                if let Some(habit) = state.get_mut(id) {
                    habit.clear_completion(date);
                }
            },
            HabitAction::HabitRemoved { id } => {
                if let Some(index) = state.habits.iter().position(|h| &h.id == id) {
                    state.habits.remove(index);
                }
            },
            // Commands are not applied to state
            HabitAction::AddHabit { .. }
            | HabitAction::ToggleHabit { .. }
            | HabitAction::RemoveHabit { .. } => {},
        }
    }
}

impl Default for HabitReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for HabitReducer {
    type State = HabitState;
    type Action = HabitAction;
    type Environment = HabitEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let command = action.action_name();

        let event = match action {
            // ========== Commands ==========
            HabitAction::AddHabit { name, frequency } => Some(HabitAction::HabitAdded {
                id: HabitId::from_uuid(env.ids.next_id()),
                name,
                frequency,
                created_at: env.clock.now(),
            }),
            HabitAction::ToggleHabit { id, date } => Self::decide_toggle(state, id, date),
            HabitAction::RemoveHabit { id } => {
                state.exists(&id).then_some(HabitAction::HabitRemoved { id })
            },

            // ========== Events ==========
            // Applied as-is (replayed or dispatched directly)
            event @ (HabitAction::HabitAdded { .. }
            | HabitAction::HabitCompleted { .. }
            | HabitAction::HabitUncompleted { .. }
            | HabitAction::HabitRemoved { .. }) => Some(event),
        };

        match event {
            Some(event) => {
                tracing::debug!(action = command, event = event.event_type(), "Applying habit event");
                Self::apply_event(state, &event);
            },
            None => {
                tracing::debug!(action = command, "Unknown habit, ignoring");
            },
        }

        SmallVec::new()
    }
}
