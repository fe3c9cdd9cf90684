//! Line-based prompting over any reader and writer.

use std::{
    fmt,
    io::{BufRead, Write},
};

use crate::session::{SessionError, terminal::Colorize};

/// Reads answers from `input` and writes prompts and messages to `output`.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// A console without colour.
    pub const fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            color: false,
        }
    }

    /// Enables or disables coloured messages.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Writes `label` and returns the next line of input, without its line
    /// terminator.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InputClosed`] at end of input, or an I/O
    /// error if reading or writing fails.
    pub fn prompt(&mut self, label: &str) -> Result<String, SessionError> {
        write!(self.output, "{label}")
            .and_then(|()| self.output.flush())
            .map_err(SessionError::Output)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(SessionError::Input)?;
        if read == 0 {
            return Err(SessionError::InputClosed);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Writes a line of plain text.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn say(&mut self, message: impl fmt::Display) -> Result<(), SessionError> {
        writeln!(self.output, "{message}").map_err(SessionError::Output)
    }

    /// Writes a confirmation message.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn success(&mut self, message: &str) -> Result<(), SessionError> {
        if self.color {
            self.say(message.success())
        } else {
            self.say(message)
        }
    }

    /// Writes a message about rejected input.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn warn(&mut self, message: &str) -> Result<(), SessionError> {
        if self.color {
            self.say(message.warning())
        } else {
            self.say(message)
        }
    }

    /// Writes a heading.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn heading(&mut self, message: &str) -> Result<(), SessionError> {
        if self.color {
            self.say(message.info())
        } else {
            self.say(message)
        }
    }

    /// The underlying writer, for rendering listings.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Consumes the console, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn prompt_strips_line_endings_only() {
        let mut console = Console::new(Cursor::new("  S1 \r\nnext\n"), Vec::new());
        assert_eq!(console.prompt("ID: ").unwrap(), "  S1 ");
        assert_eq!(console.prompt("Other: ").unwrap(), "next");
        assert_eq!(String::from_utf8(console.into_output()).unwrap(), "ID: Other: ");
    }

    #[test]
    fn end_of_input_is_reported() {
        let mut console = Console::new(Cursor::new(""), Vec::new());
        assert!(matches!(
            console.prompt("ID: "),
            Err(SessionError::InputClosed)
        ));
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let mut console = Console::new(Cursor::new("11"), Vec::new());
        assert_eq!(console.prompt("> ").unwrap(), "11");
    }
}
