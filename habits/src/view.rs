//! Habit list view.
//!
//! [`HabitListView`] is a read-only projection of [`AppState`] for one
//! calendar day. Whether a habit is done "today" is derived on every
//! projection from its completion history and never stored.
//!
//! [`HabitListController`] drives the view against a live store: it renders
//! frames, turns row clicks into actions, and waits on the store's change
//! notification before rendering again.

use crate::app::{AppAction, AppState, AppStore};
use crate::error::{HabitsError, Result};
use crate::types::{CompletionDate, Frequency, HabitAction, HabitId};
use habitkit_core::environment::Clock;
use habitkit_runtime::StoreError;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Label of the toggle control when the habit is done today
pub const COMPLETED_LABEL: &str = "Completed";
/// Label of the toggle control when the habit is not done today
pub const MARK_COMPLETED_LABEL: &str = "Mark Completed";

/// One rendered habit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HabitRow {
    /// 1-based position in the list
    pub position: usize,
    /// Habit identifier
    pub id: HabitId,
    /// Display name
    pub name: String,
    /// Intended cadence
    pub frequency: Frequency,
    /// Whether the habit is done on the view's day
    pub completed_today: bool,
}

impl HabitRow {
    /// Text of the toggle control
    #[must_use]
    pub const fn toggle_label(&self) -> &'static str {
        if self.completed_today {
            COMPLETED_LABEL
        } else {
            MARK_COMPLETED_LABEL
        }
    }
}

/// Projection of the habit list for one day
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HabitListView {
    /// Day the "completed today" flags refer to
    pub today: CompletionDate,
    /// Rows in collection order
    pub rows: Vec<HabitRow>,
}

impl HabitListView {
    /// Projects `state` for the day `today`
    #[must_use]
    pub fn project(state: &AppState, today: &CompletionDate) -> Self {
        let rows = state
            .habits
            .habits
            .iter()
            .enumerate()
            .map(|(index, habit)| HabitRow {
                position: index + 1,
                id: habit.id,
                name: habit.name.clone(),
                frequency: habit.frequency,
                completed_today: habit.is_completed_on(today),
            })
            .collect();

        Self {
            today: today.clone(),
            rows,
        }
    }

    /// Row at a 1-based position
    #[must_use]
    pub fn row(&self, position: usize) -> Option<&HabitRow> {
        position.checked_sub(1).and_then(|index| self.rows.get(index))
    }

    /// Number of rows done today
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.completed_today).count()
    }

    /// Action issued by clicking the toggle control of a row
    #[must_use]
    pub fn toggle_action(&self, row: &HabitRow) -> AppAction {
        AppAction::Habits(HabitAction::ToggleHabit {
            id: row.id,
            date: self.today.clone(),
        })
    }

    /// Action issued by clicking the delete control of a row
    #[must_use]
    pub fn delete_action(row: &HabitRow) -> AppAction {
        AppAction::Habits(HabitAction::RemoveHabit { id: row.id })
    }
}

impl fmt::Display for HabitListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return write!(f, "No habits yet. Add one with `add <name>`.");
        }

        write!(
            f,
            "Habits for {} ({}/{} completed)",
            self.today,
            self.completed_count(),
            self.rows.len()
        )?;

        for row in &self.rows {
            let marker = if row.completed_today { 'x' } else { ' ' };
            write!(
                f,
                "\n{:>3}. [{marker}] {} ({})  [{}]",
                row.position,
                row.name,
                row.frequency.label(),
                row.toggle_label()
            )?;
        }

        Ok(())
    }
}

/// Drives a [`HabitListView`] against a live store
///
/// Each render computes "today" from the clock once and keeps the frame, so
/// clicks act on exactly the rows that were last shown.
pub struct HabitListController {
    store: AppStore,
    clock: Arc<dyn Clock>,
    changes: watch::Receiver<u64>,
    frame: Option<HabitListView>,
}

impl HabitListController {
    /// Creates a controller for `store`, reading the day from `clock`
    #[must_use]
    pub fn new(store: AppStore, clock: Arc<dyn Clock>) -> Self {
        let changes = store.subscribe_changes();
        Self {
            store,
            clock,
            changes,
            frame: None,
        }
    }

    /// Creates a controller reading the day from the store's own clock
    #[must_use]
    pub fn for_store(store: AppStore) -> Self {
        let clock = Arc::clone(&store.environment().habits.clock);
        Self::new(store, clock)
    }

    /// The store this controller dispatches to
    #[must_use]
    pub const fn store(&self) -> &AppStore {
        &self.store
    }

    /// Last rendered frame, if any
    #[must_use]
    pub const fn frame(&self) -> Option<&HabitListView> {
        self.frame.as_ref()
    }

    /// Renders the current state
    ///
    /// Changes made up to this point count as seen by [`Self::next_frame`].
    pub async fn render(&mut self) -> &HabitListView {
        self.changes.borrow_and_update();
        let today = CompletionDate::today(self.clock.as_ref());
        let view = self
            .store
            .state(|state| HabitListView::project(state, &today))
            .await;
        tracing::trace!(rows = view.rows.len(), today = %view.today, "Rendered habit list");
        self.frame.insert(view)
    }

    /// Waits for the next state change, then renders
    ///
    /// Returns immediately if the state changed since the last render.
    ///
    /// # Errors
    ///
    /// Returns [`HabitsError::Store`] if the store's notification channel closed.
    pub async fn next_frame(&mut self) -> Result<&HabitListView> {
        self.changes
            .changed()
            .await
            .map_err(|_| HabitsError::Store(StoreError::ChannelClosed))?;
        Ok(self.render().await)
    }

    /// Clicks the toggle control of the row at `position` in the last frame
    ///
    /// Returns `false` without dispatching if there is no such row.
    ///
    /// # Errors
    ///
    /// Returns [`HabitsError::Store`] if the store rejects the action.
    pub async fn click_toggle(&mut self, position: usize) -> Result<bool> {
        let view = self.current_frame().await;
        let action = view.row(position).map(|row| view.toggle_action(row));
        self.dispatch(action).await
    }

    /// Clicks the delete control of the row at `position` in the last frame
    ///
    /// Returns `false` without dispatching if there is no such row.
    ///
    /// # Errors
    ///
    /// Returns [`HabitsError::Store`] if the store rejects the action.
    pub async fn click_delete(&mut self, position: usize) -> Result<bool> {
        let view = self.current_frame().await;
        let action = view.row(position).map(HabitListView::delete_action);
        self.dispatch(action).await
    }

    async fn current_frame(&mut self) -> HabitListView {
        match &self.frame {
            Some(view) => view.clone(),
            None => self.render().await.clone(),
        }
    }

    async fn dispatch(&self, action: Option<AppAction>) -> Result<bool> {
        let Some(action) = action else {
            return Ok(false);
        };
        self.store.send(action).await?;
        Ok(true)
    }
}
