//! Domain types for the habit tracker.
//!
//! A habit is a named recurring activity with a history of the calendar days
//! it was done on. The collection keeps insertion order; the only operations
//! on a habit after creation flip single days in that history.

use chrono::{DateTime, NaiveDate, Utc};
use habitkit_core::environment::Clock;
use habitkit_macros::Action;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a habit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(Uuid);

impl HabitId {
    /// Creates a `HabitId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How often a habit is meant to be done
///
/// Informational only: nothing in the tracker changes behavior based on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day
    #[default]
    Daily,
    /// Once a week
    Weekly,
}

impl Frequency {
    /// Wire/CLI spelling (`daily`, `weekly`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// Capitalized display label (`Daily`, `Weekly`)
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known [`Frequency`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown frequency `{0}` (expected `daily` or `weekly`)")]
pub struct ParseFrequencyError(String);

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

/// A calendar day in ISO `YYYY-MM-DD` form
///
/// Stored as text and never validated: a malformed date is kept as-is and
/// simply never equals a real day.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionDate(String);

impl CompletionDate {
    /// Wraps any text as a completion date
    #[must_use]
    pub fn new(date: impl Into<String>) -> Self {
        Self(date.into())
    }

    /// The current UTC calendar day according to `clock`
    #[must_use]
    pub fn today(clock: &dyn Clock) -> Self {
        Self::from(clock.now().date_naive())
    }

    /// The date as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the text as a calendar day, if it is one
    #[must_use]
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }
}

impl From<NaiveDate> for CompletionDate {
    fn from(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }
}

impl From<&str> for CompletionDate {
    fn from(date: &str) -> Self {
        Self::new(date)
    }
}

impl fmt::Display for CompletionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tracked habit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier, fixed at creation
    pub id: HabitId,
    /// Display name, fixed at creation (may be empty)
    pub name: String,
    /// Intended cadence
    pub frequency: Frequency,
    /// Days the habit was done on, each at most once, in marking order
    pub completed_dates: Vec<CompletionDate>,
    /// When the habit was created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Creates a habit with an empty history
    #[must_use]
    pub const fn new(id: HabitId, name: String, frequency: Frequency, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            frequency,
            completed_dates: Vec::new(),
            created_at,
        }
    }

    /// Whether the habit was done on `date`
    #[must_use]
    pub fn is_completed_on(&self, date: &CompletionDate) -> bool {
        self.completed_dates.contains(date)
    }

    /// Records `date` as done; no-op if already recorded
    pub fn mark_completed(&mut self, date: CompletionDate) {
        if !self.is_completed_on(&date) {
            self.completed_dates.push(date);
        }
    }

    /// Forgets `date`; no-op if it was not recorded
    pub fn clear_completion(&mut self, date: &CompletionDate) {
        if let Some(index) = self.completed_dates.iter().position(|d| d == date) {
            self.completed_dates.remove(index);
        }
    }
}

/// State of the habit collection
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitState {
    /// All habits, in creation order
    pub habits: Vec<Habit>,
}

impl HabitState {
    /// Creates an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self { habits: Vec::new() }
    }

    /// Returns the number of habits
    #[must_use]
    pub fn count(&self) -> usize {
        self.habits.len()
    }

    /// Returns true if there are no habits
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Returns a habit by ID
    #[must_use]
    pub fn get(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| &h.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &HabitId) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| &h.id == id)
    }

    /// Checks if a habit exists
    #[must_use]
    pub fn exists(&self, id: &HabitId) -> bool {
        self.get(id).is_some()
    }

    /// Whether habit `id` was done on `date` (false for unknown habits)
    #[must_use]
    pub fn is_completed_on(&self, id: &HabitId, date: &CompletionDate) -> bool {
        self.get(id).is_some_and(|h| h.is_completed_on(date))
    }

    /// Number of habits done on `date`
    #[must_use]
    pub fn completed_count_on(&self, date: &CompletionDate) -> usize {
        self.habits.iter().filter(|h| h.is_completed_on(date)).count()
    }
}

/// Actions for the habit collection
///
/// Commands express intent and are turned into events by the reducer.
/// Events describe what happened and are applied to state as-is.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HabitAction {
    // ========== Commands ==========
    /// Command: Append a new habit
    #[command]
    AddHabit {
        /// Display name (not validated)
        name: String,
        /// Intended cadence
        frequency: Frequency,
    },

    /// Command: Flip whether a habit was done on a day
    #[command]
    ToggleHabit {
        /// Habit to toggle
        id: HabitId,
        /// Day to flip
        date: CompletionDate,
    },

    /// Command: Delete a habit
    #[command]
    RemoveHabit {
        /// Habit to delete
        id: HabitId,
    },

    // ========== Events ==========
    /// Event: Habit was created
    #[event]
    HabitAdded {
        /// Habit identifier
        id: HabitId,
        /// Display name
        name: String,
        /// Intended cadence
        frequency: Frequency,
        /// When the habit was created
        created_at: DateTime<Utc>,
    },

    /// Event: Habit was marked done on a day
    #[event]
    HabitCompleted {
        /// Habit identifier
        id: HabitId,
        /// Day marked
        date: CompletionDate,
    },

    /// Event: Habit was unmarked for a day
    #[event]
    HabitUncompleted {
        /// Habit identifier
        id: HabitId,
        /// Day unmarked
        date: CompletionDate,
    },

    /// Event: Habit was deleted
    #[event]
    HabitRemoved {
        /// Habit identifier
        id: HabitId,
    },
}
