//! Line-oriented console input with validation and bounded re-prompting.
//!
//! Every workflow receives a [`Console`] instead of reaching for stdin
//! directly. Each prompt re-asks until the answer passes its rule or
//! `max_attempts` answers have been rejected, so a scripted caller can never
//! hang on bad input.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use crossterm::terminal;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use time::Date;

use crate::utils::DATE_FORMAT;

/// Why a prompt gave up without producing a value.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("gave up after {0} invalid answers")]
    TooManyAttempts(u32),

    #[error("input closed")]
    EndOfInput,

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Parses an integer and checks it lies within `[min, max]`.
pub fn parse_in_range(input: &str, min: i64, max: i64) -> Result<i64, String> {
    match input.trim().parse::<i64>() {
        Ok(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(format!(
            "Invalid input. Please enter a number between {min} and {max}"
        )),
    }
}

/// Trims the input and rejects it if nothing is left.
pub fn parse_non_empty(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err("Input cannot be empty!".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parses a `YYYY-MM-DD` date and requires it to fall strictly after `today`.
pub fn parse_future_date(input: &str, today: Date) -> Result<Date, String> {
    let trimmed = input.trim();
    // The format description alone accepts signed or short years.
    let shape_ok = trimmed.len() == 10
        && trimmed.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    let date = shape_ok
        .then(|| Date::parse(trimmed, DATE_FORMAT).ok())
        .flatten()
        .ok_or_else(|| "Invalid date format. Please use YYYY-MM-DD.".to_string())?;

    if date <= today {
        return Err("Date must be in the future!".to_string());
    }
    Ok(date)
}

/// Accepts exactly four ASCII digits, e.g. the tail of a card number.
pub fn parse_last_four(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        Ok(trimmed.to_string())
    } else {
        Err("Please enter exactly 4 digits.".to_string())
    }
}

/// Accepts a ten digit phone number starting with 6, 7, 8 or 9.
pub fn parse_phone(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    let valid = trimmed.len() == 10
        && trimmed.bytes().all(|b| b.is_ascii_digit())
        && matches!(trimmed.as_bytes()[0], b'6'..=b'9');
    if valid {
        Ok(trimmed.to_string())
    } else {
        Err("Invalid phone number! It should be 10 digits and start with 9, 8, 7, or 6.".to_string())
    }
}

/// What a single key press did to a secret being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SecretKey {
    Typed,
    Erased,
    Submit,
    Cancel,
    Ignored,
}

/// Applies one key press to the secret typed so far.
fn edit_secret(secret: &mut String, key: KeyEvent) -> SecretKey {
    if key.kind == KeyEventKind::Release {
        return SecretKey::Ignored;
    }
    match key.code {
        KeyCode::Enter => SecretKey::Submit,
        KeyCode::Esc => SecretKey::Cancel,
        KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            SecretKey::Cancel
        }
        KeyCode::Char(c) => {
            secret.push(c);
            SecretKey::Typed
        }
        KeyCode::Backspace if secret.pop().is_some() => SecretKey::Erased,
        _ => SecretKey::Ignored,
    }
}

/// Console front end shared by every menu and workflow.
pub struct Console<R, W> {
    input: R,
    output: W,
    max_attempts: u32,
    mask_secrets: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, max_attempts: u32) -> Self {
        Self {
            input,
            output,
            max_attempts: max_attempts.max(1),
            mask_secrets: false,
        }
    }

    /// Reads secrets key by key from the terminal, echoing `•` per character.
    /// Only meaningful when the input is an interactive terminal.
    pub fn with_masked_secrets(mut self, mask: bool) -> Self {
        self.mask_secrets = mask;
        self
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Writes a plain line.
    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Writes a section heading preceded by a blank line.
    pub fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.output, "\n{}", format!("=== {title} ===").bold())
    }

    /// Writes a numbered list of options starting at 1.
    pub fn options<T: Display>(&mut self, items: &[T]) -> io::Result<()> {
        for (i, item) in items.iter().enumerate() {
            writeln!(self.output, "{}. {item}", i + 1)?;
        }
        Ok(())
    }

    pub fn success(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", message.to_string().green())
    }

    pub fn notice(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", message.to_string().yellow())
    }

    pub fn failure(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", message.to_string().red())
    }

    /// Prints `prompt` and returns the next line without its line ending.
    pub fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::EndOfInput);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Prints `prompt` and reads a secret without echoing it.
    ///
    /// With masking off the answer is read as a plain line, which is what a
    /// piped or scripted input needs.
    pub fn read_password(&mut self, prompt: &str) -> Result<String, PromptError> {
        if !self.mask_secrets {
            return self.read_line(prompt);
        }

        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        terminal::enable_raw_mode()?;
        let secret = self.read_masked();
        terminal::disable_raw_mode()?;
        writeln!(self.output)?;
        secret
    }

    fn read_masked(&mut self) -> Result<String, PromptError> {
        let mut secret = String::new();
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match edit_secret(&mut secret, key) {
                SecretKey::Submit => return Ok(secret),
                SecretKey::Cancel => return Err(PromptError::EndOfInput),
                SecretKey::Typed => write!(self.output, "•")?,
                SecretKey::Erased => write!(self.output, "\x08 \x08")?,
                SecretKey::Ignored => continue,
            }
            self.output.flush()?;
        }
    }

    /// Re-prompts until `validate` accepts an answer or the attempt budget runs out.
    fn prompt_until<T>(
        &mut self,
        prompt: &str,
        validate: impl Fn(&str) -> Result<T, String>,
    ) -> Result<T, PromptError> {
        for _ in 0..self.max_attempts {
            let line = self.read_line(prompt)?;
            match validate(&line) {
                Ok(value) => return Ok(value),
                Err(message) => self.failure(message)?,
            }
        }
        tracing::warn!(prompt, attempts = self.max_attempts, "prompt abandoned");
        Err(PromptError::TooManyAttempts(self.max_attempts))
    }

    pub fn read_int(&mut self, prompt: &str, min: i64, max: i64) -> Result<i64, PromptError> {
        self.prompt_until(prompt, |line| parse_in_range(line, min, max))
    }

    pub fn read_non_empty(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.prompt_until(prompt, parse_non_empty)
    }

    pub fn read_future_date(&mut self, prompt: &str, today: Date) -> Result<Date, PromptError> {
        let prompt = format!("{prompt} (YYYY-MM-DD): ");
        self.prompt_until(&prompt, |line| parse_future_date(line, today))
    }

    pub fn read_last_four(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.prompt_until(prompt, parse_last_four)
    }

    pub fn read_phone(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.prompt_until(prompt, parse_phone)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;
    use time::macros::date;

    pub(crate) type ScriptedConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

    /// A console fed from `lines`, one answer per line.
    pub(crate) fn scripted(lines: &[&str]) -> ScriptedConsole {
        let mut input = lines.join("\n");
        input.push('\n');
        Console::new(Cursor::new(input.into_bytes()), Vec::new(), 3)
    }

    pub(crate) fn transcript(console: &ScriptedConsole) -> String {
        String::from_utf8_lossy(console.output()).into_owned()
    }

    #[test]
    fn range_rejects_out_of_bounds_and_garbage() {
        assert_eq!(parse_in_range("5", 1, 8), Ok(5));
        assert_eq!(parse_in_range(" 8 ", 1, 8), Ok(8));
        assert!(parse_in_range("0", 1, 8).is_err());
        assert!(parse_in_range("9", 1, 8).is_err());
        assert!(parse_in_range("four", 1, 8).is_err());
        assert!(parse_in_range("", 1, 8).is_err());
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert!(parse_non_empty("   \t ").is_err());
        assert_eq!(parse_non_empty("  Jane ").unwrap(), "Jane");
    }

    #[test]
    fn future_date_must_be_strictly_after_today() {
        let today = date!(2030 - 06 - 15);
        assert_eq!(
            parse_future_date("2030-06-16", today),
            Ok(date!(2030 - 06 - 16))
        );
        assert_eq!(
            parse_future_date("2030-06-15", today).unwrap_err(),
            "Date must be in the future!"
        );
        assert!(parse_future_date("2029-12-31", today).is_err());
    }

    #[test]
    fn future_date_requires_fixed_format() {
        let today = date!(2030 - 06 - 15);
        for bad in ["2030/07/01", "2030-7-1", "01-07-2030", "2030-02-30", "tomorrow", "+2031-01-01"] {
            assert_eq!(
                parse_future_date(bad, today).unwrap_err(),
                "Invalid date format. Please use YYYY-MM-DD.",
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn last_four_needs_exactly_four_digits() {
        assert_eq!(parse_last_four("4242").unwrap(), "4242");
        assert!(parse_last_four("42").is_err());
        assert!(parse_last_four("42424").is_err());
        assert!(parse_last_four("ab12").is_err());
    }

    #[test]
    fn phone_numbers_are_checked() {
        assert!(parse_phone("9876543210").is_ok());
        assert!(parse_phone("5876543210").is_err());
        assert!(parse_phone("987654321").is_err());
    }

    #[test]
    fn read_int_reprompts_until_valid() {
        let mut console = scripted(&["abc", "12", "3"]);
        assert_eq!(console.read_int("Pick: ", 1, 5).unwrap(), 3);
        let out = transcript(&console);
        assert_eq!(out.matches("Pick: ").count(), 3);
        assert_eq!(out.matches("between 1 and 5").count(), 2);
    }

    #[test]
    fn read_int_gives_up_after_max_attempts() {
        let mut console = scripted(&["0", "0", "0", "2"]);
        let err = console.read_int("Pick: ", 1, 5).unwrap_err();
        assert!(matches!(err, PromptError::TooManyAttempts(3)));
    }

    #[test]
    fn closed_input_ends_the_prompt() {
        let mut console: ScriptedConsole = Console::new(Cursor::new(Vec::new()), Vec::new(), 3);
        assert!(matches!(
            console.read_non_empty("Name: "),
            Err(PromptError::EndOfInput)
        ));
    }

    #[test]
    fn unmasked_password_is_read_as_a_line() {
        let mut console = scripted(&["s3cret"]);
        assert_eq!(console.read_password("Password: ").unwrap(), "s3cret");
        let out = transcript(&console);
        assert!(out.contains("Password: "));
        assert!(!out.contains("s3cret"));
    }

    #[test]
    fn secret_editing_keys() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        let mut secret = String::new();

        assert_eq!(edit_secret(&mut secret, key(KeyCode::Char('a'))), SecretKey::Typed);
        assert_eq!(edit_secret(&mut secret, key(KeyCode::Char('b'))), SecretKey::Typed);
        assert_eq!(edit_secret(&mut secret, key(KeyCode::Backspace)), SecretKey::Erased);
        assert_eq!(edit_secret(&mut secret, key(KeyCode::Left)), SecretKey::Ignored);
        assert_eq!(edit_secret(&mut secret, key(KeyCode::Enter)), SecretKey::Submit);
        assert_eq!(secret, "a");

        let mut empty = String::new();
        assert_eq!(edit_secret(&mut empty, key(KeyCode::Backspace)), SecretKey::Ignored);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(edit_secret(&mut empty, ctrl_c), SecretKey::Cancel);
        assert!(empty.is_empty());
    }

    #[test]
    fn read_non_empty_trims() {
        let mut console = scripted(&["   ", "  Doe  "]);
        assert_eq!(console.read_non_empty("Last name: ").unwrap(), "Doe");
        assert!(transcript(&console).contains("Input cannot be empty!"));
    }
}
