//! Interactive command line.
//!
//! Each input line is parsed with `clap` as a subcommand, then executed
//! against a [`HabitListController`]. Rows are addressed by the 1-based
//! numbers of the last list shown.

use crate::app;
use crate::error::Result;
use crate::types::Frequency;
use crate::view::HabitListController;
use clap::{Parser, Subcommand};

/// One input line
#[derive(Parser, Debug)]
#[command(
    name = "habits",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Track daily and weekly habits"
)]
pub struct Line {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Commands understood by the interactive session
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a habit
    Add {
        /// How often the habit is meant to be done (goes before the name)
        #[arg(short, long, default_value_t = Frequency::Daily)]
        frequency: Frequency,

        /// Habit name: the rest of the line, spacing kept as typed
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true, trailing_var_arg = true)]
        name: Vec<String>,
    },

    /// Mark or unmark the habit in row N as done today
    Toggle {
        /// Row number from the last list
        row: usize,
    },

    /// Delete the habit in row N
    #[command(alias = "delete")]
    Remove {
        /// Row number from the last list
        row: usize,
    },

    /// Show the habit list
    #[command(alias = "ls")]
    List {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Leave the program
    #[command(alias = "exit")]
    Quit,
}

/// Parses one input line; blank lines yield `None`
///
/// # Errors
///
/// Returns the `clap` error for unknown commands or bad arguments. `help`
/// also comes back as an error whose rendering is the help text.
pub fn parse_line(line: &str) -> std::result::Result<Option<Command>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }

    let command = match Line::try_parse_from(words.iter().copied())?.command {
        Command::Add { frequency, name } => Command::Add {
            frequency,
            name: verbatim_name(line, &words, name),
        },
        other => other,
    };
    Ok(Some(command))
}

/// Replaces the name words with the original text they span
///
/// The name always ends the line, so its words are the last `name.len()`
/// words. If they do not line up (e.g. clap consumed a `--`), the words are
/// kept as parsed.
fn verbatim_name(line: &str, words: &[&str], name: Vec<String>) -> Vec<String> {
    let Some(first) = words.len().checked_sub(name.len()) else {
        return name;
    };
    if words[first..] != name[..] {
        return name;
    }

    let offset = words[first].as_ptr() as usize - line.as_ptr() as usize;
    vec![line[offset..].trim_end().to_string()]
}

/// Result of handling one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to show the user
    Output(String),
    /// The user asked to leave
    Quit,
}

/// Interactive session over one store
pub struct Session {
    controller: HabitListController,
}

impl Session {
    /// Creates a session driving `controller`
    #[must_use]
    pub const fn new(controller: HabitListController) -> Self {
        Self { controller }
    }

    /// The underlying controller
    #[must_use]
    pub const fn controller(&self) -> &HabitListController {
        &self.controller
    }

    /// Renders the current list
    pub async fn render(&mut self) -> String {
        self.controller.render().await.to_string()
    }

    /// Parses and executes one input line
    ///
    /// Parse failures (and `help`) are shown to the user, not returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects an action or the snapshot
    /// cannot be encoded.
    pub async fn handle_line(&mut self, line: &str) -> Result<Reply> {
        match parse_line(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => Ok(Reply::Output(String::new())),
            Err(err) => {
                tracing::debug!(kind = ?err.kind(), "Could not parse input line");
                Ok(Reply::Output(err.render().to_string().trim_end().to_string()))
            },
        }
    }

    /// Executes one command
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects an action or the snapshot
    /// cannot be encoded.
    pub async fn execute(&mut self, command: Command) -> Result<Reply> {
        let output = match command {
            Command::Add { frequency, name } => {
                let name = name.join(" ");
                tracing::info!(%frequency, name = %name, "Adding habit");
                app::add_habit(self.controller.store(), name, frequency).await?;
                self.controller.next_frame().await?.to_string()
            },
            Command::Toggle { row } => {
                if self.controller.click_toggle(row).await? {
                    self.controller.next_frame().await?.to_string()
                } else {
                    no_such_row(row)
                }
            },
            Command::Remove { row } => {
                if self.controller.click_delete(row).await? {
                    tracing::info!(row, "Removed habit");
                    self.controller.next_frame().await?.to_string()
                } else {
                    no_such_row(row)
                }
            },
            Command::List { json: false } => self.render().await,
            Command::List { json: true } => {
                let habits = app::habits(self.controller.store()).await;
                serde_json::to_string_pretty(&habits)?
            },
            Command::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Output(output))
    }
}

fn no_such_row(row: usize) -> String {
    format!("No habit in row {row}. Run `list` to see row numbers.")
}
