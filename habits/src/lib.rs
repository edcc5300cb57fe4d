//! In-memory habit tracker.
//!
//! A list of habits (name and frequency), each of which can be marked done
//! for the current day. State lives in a single [`AppStore`] for the life of
//! the process:
//!
//! - [`types`] / [`reducer`]: the habit collection slice (add, toggle, remove)
//! - [`app`]: the root state aggregating every slice, and the store wiring
//! - [`view`]: the list projection, with "completed today" derived per render
//! - [`cli`]: the interactive line-based front end
//!
//! # Quick Start
//!
//! ```no_run
//! use habits::{app, AppEnvironment, Config, CompletionDate, Frequency};
//! use habitkit_core::environment::SystemClock;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = app::new_app_store(AppEnvironment::production(), &Config::default());
//!
//! app::add_habit(&store, "Drink water", Frequency::Daily).await?;
//!
//! let habits = app::habits(&store).await;
//! let today = CompletionDate::today(&SystemClock);
//! app::toggle_habit(&store, habits[0].id, today.clone()).await?;
//!
//! assert_eq!(store.state(|s| s.habits.completed_count_on(&today)).await, 1);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod reducer;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use app::{app_reducer, new_app_store, AppAction, AppEnvironment, AppState, AppStore};
pub use config::{Config, ConfigError};
pub use error::HabitsError;
pub use reducer::{HabitEnvironment, HabitReducer};
pub use types::{CompletionDate, Frequency, Habit, HabitAction, HabitId, HabitState, ParseFrequencyError};
pub use view::{HabitListController, HabitListView, HabitRow};
