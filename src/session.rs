//! Interactive admin and student sessions.
//!
//! A [`Session`] logs a user in, then repeatedly shows the menu for their
//! [`Role`] and runs the selected workflow against the [`RecordStore`].
//! Rejected input is reported and asked for again where it was entered; only
//! I/O failures end the session early.

use std::io::{self, BufRead, Write};

use crate::{
    domain::{Config, DisplayMode, validate},
    storage::{RecordError, RecordStore, StorageError},
};

mod admin;
mod console;
pub use console::Console;

/// Rendering of record listings.
pub mod display;

mod role;
pub use role::{AdminOption, Role, StudentOption, parse_selection};

mod student;

/// Terminal colour support.
pub mod terminal;

/// Why a session ended before the user logged out.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Standard input could not be read.
    #[error("failed to read input")]
    Input(#[source] io::Error),

    /// Output could not be written.
    #[error("failed to write output")]
    Output(#[source] io::Error),

    /// Input ended while waiting for an answer.
    #[error("input closed")]
    InputClosed,

    /// A collection file could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<io::Error> for SessionError {
    fn from(error: io::Error) -> Self {
        Self::Output(error)
    }
}

/// Whether the menu loop keeps going after an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Logout,
}

/// One interactive session, from login to logout.
#[derive(Debug)]
pub struct Session<'a, R, W> {
    store: &'a mut RecordStore,
    console: Console<R, W>,
    config: &'a Config,
    display: Option<DisplayMode>,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Creates a session starting in the configured display mode.
    pub fn new(store: &'a mut RecordStore, console: Console<R, W>, config: &'a Config) -> Self {
        Self {
            store,
            console,
            config,
            display: config.display,
        }
    }

    /// Overrides the starting display mode.
    #[must_use]
    pub fn with_display(mut self, display: Option<DisplayMode>) -> Self {
        self.display = display;
        self
    }

    /// Consumes the session, returning its console.
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Logs a user in and serves their menu until they log out.
    ///
    /// # Errors
    ///
    /// Returns an error if input ends, if the console fails, or if a
    /// collection file cannot be read or written.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run(&mut self) -> Result<(), SessionError> {
        self.console.heading("=== Student Management System ===")?;
        let role = self.login()?;

        loop {
            self.show_menu(&role)?;
            let Some(selection) = self.read_selection(&role)? else {
                continue;
            };

            let flow = match &role {
                Role::Admin => match AdminOption::from_number(selection) {
                    Some(option) => self.handle_admin(option)?,
                    None => Flow::Continue,
                },
                Role::Student { id } => match StudentOption::from_number(selection) {
                    Some(option) => self.handle_student(id, option)?,
                    None => Flow::Continue,
                },
            };

            if flow == Flow::Logout {
                return Ok(());
            }
        }
    }

    fn login(&mut self) -> Result<Role, SessionError> {
        loop {
            let username = self.console.prompt("Username (admin or student ID): ")?;
            let password = self.console.prompt("Password: ")?;

            if self.config.is_admin(&username, &password) {
                tracing::info!("Admin logged in");
                self.store.log_event("Admin logged in");
                return Ok(Role::Admin);
            }

            if let Some(student) = self.store.authenticate_student(&username, &password)? {
                tracing::info!("Student {} logged in", student.id);
                self.store
                    .log_event(format_args!("Student {} logged in", student.id));
                return Ok(Role::Student { id: student.id });
            }

            tracing::debug!("Rejected login for '{username}'");
            self.console
                .warn("Login failed: Invalid credentials. Try again.")?;
        }
    }

    fn show_menu(&mut self, role: &Role) -> Result<(), SessionError> {
        self.console.say("")?;
        self.console.heading(role.menu_title())?;
        for (i, label) in role.menu_labels().iter().enumerate() {
            self.console.say(format_args!("{}. {label}", i + 1))?;
        }
        Ok(())
    }

    fn read_selection(&mut self, role: &Role) -> Result<Option<usize>, SessionError> {
        let input = self.console.prompt("Select option: ")?;
        let count = role.option_count();
        let selection = parse_selection(&input, count);
        if selection.is_none() {
            self.console.warn(&format!(
                "Invalid input. Please enter a number from 1 to {count} only."
            ))?;
        }
        Ok(selection)
    }

    /// Asks for a display mode until the user enters exactly `1` or `2`.
    fn choose_display(&mut self) -> Result<DisplayMode, SessionError> {
        loop {
            self.console.say("\nChoose display format:")?;
            self.console.say("1. Table View")?;
            self.console.say("2. Summary View")?;
            let mode = match self.console.prompt("Select option: ")?.as_str() {
                "1" => DisplayMode::Table,
                "2" => DisplayMode::Summary,
                _ => {
                    self.console
                        .warn("Invalid input. Please enter 1 or 2 only.")?;
                    continue;
                }
            };
            self.display = Some(mode);
            return Ok(mode);
        }
    }

    fn display_mode(&mut self) -> Result<DisplayMode, SessionError> {
        match self.display {
            Some(mode) => Ok(mode),
            None => self.choose_display(),
        }
    }

    /// Asks until `accept` holds, reporting `rejection` otherwise.
    fn prompt_until(
        &mut self,
        label: &str,
        accept: fn(&str) -> bool,
        rejection: &str,
    ) -> Result<String, SessionError> {
        loop {
            let input = self.console.prompt(label)?;
            if accept(&input) {
                return Ok(input);
            }
            self.console.warn(rejection)?;
        }
    }

    /// Asks for a replacement value. Empty input keeps the current one.
    fn prompt_edit(
        &mut self,
        field: &str,
        current: &str,
        accept: fn(&str) -> bool,
        rejection: &str,
    ) -> Result<Option<String>, SessionError> {
        let label = format!("Edit {field} ({current}): ");
        loop {
            let input = self.console.prompt(&label)?;
            if input.is_empty() {
                return Ok(None);
            }
            if accept(&input) {
                return Ok(Some(input));
            }
            self.console.warn(rejection)?;
        }
    }

    /// Asks for a new record key until it is alphanumeric and unused.
    fn prompt_new_key(
        &mut self,
        label: &str,
        noun: &str,
        exists: fn(&RecordStore, &str) -> Result<bool, StorageError>,
        duplicate: &str,
    ) -> Result<String, SessionError> {
        loop {
            let key = self.console.prompt(label)?;
            if key.contains(' ') {
                self.console.warn(&format!("{noun} must not contain spaces."))?;
            } else if !validate::is_alphanumeric(&key) {
                self.console
                    .warn(&format!("{noun} must be strictly alphanumeric."))?;
            } else if exists(&*self.store, &key)? {
                self.console.warn(duplicate)?;
            } else {
                return Ok(key);
            }
        }
    }

    /// Asks for a course code until it names an existing course.
    fn prompt_existing_course(&mut self, label: &str) -> Result<String, SessionError> {
        loop {
            let code = self.console.prompt(label)?;
            if self.store.course_exists(&code)? {
                return Ok(code);
            }
            self.console
                .warn("Course not found (not case sensitive). Please try again.")?;
        }
    }

    /// Reports a recoverable store error to the user and passes storage
    /// failures up.
    fn settle<T>(&mut self, result: Result<T, RecordError>) -> Result<Option<T>, SessionError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(RecordError::Storage(e)) => Err(e.into()),
            Err(e) => {
                self.console.warn(&e.to_string())?;
                Ok(None)
            }
        }
    }
}
