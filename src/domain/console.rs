//! The line-oriented user boundary the game talks through.

use std::io;

/// Shown when an answer does not start with `y` or `n`.
pub const YES_NO_HINT: &str = "Please answer yes or no:";

/// Interprets a yes/no answer.
///
/// The answer is trimmed and lower-cased; it is yes if it starts with `y`,
/// no if it starts with `n`. Anything else, including an empty line, is `None`.
pub fn parse_yes_no(line: &str) -> Option<bool> {
    match line.trim().to_lowercase().chars().next() {
        Some('y') => Some(true),
        Some('n') => Some(false),
        _ => None,
    }
}

/// Line-based console abstraction for testability.
pub trait Console {
    /// Next full line of input without its line terminator.
    /// Fails with `UnexpectedEof` once input is closed.
    fn read_line(&mut self) -> io::Result<String>;

    /// Prints a prompt without ending the line.
    fn print(&mut self, message: &str) -> io::Result<()>;

    fn print_line(&mut self, message: &str) -> io::Result<()>;

    fn print_blank_line(&mut self) -> io::Result<()> {
        self.print_line("")
    }

    /// Reads lines until one parses as yes or no.
    fn read_yes_no(&mut self) -> io::Result<bool> {
        loop {
            let line = self.read_line()?;
            match parse_yes_no(&line) {
                Some(answer) => return Ok(answer),
                None => self.print(YES_NO_HINT)?,
            }
        }
    }
}
