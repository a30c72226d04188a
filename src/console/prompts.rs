use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use thiserror::Error;

/// Raised when stdin reaches end-of-file in the middle of a prompt. The menu
/// loop treats it as a request to exit.
#[derive(Debug, Error)]
#[error("input closed")]
pub(crate) struct InputClosed;

/// Line-oriented prompt helpers. Every reader loops until it gets acceptable
/// input, printing a hint after each rejected line.
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub(crate) fn into_output(self) -> W {
        self.output
    }

    /// Write a full line to the output.
    pub(crate) fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref()).context("failed to write to output")
    }

    /// Print `prompt` without a newline and read one line, trailing newline
    /// stripped.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}").context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub(crate) fn menu_choice(&mut self, min: i32, max: i32) -> Result<i32> {
        loop {
            let line = self.ask("Choice: ")?;
            match line.trim().parse::<i32>() {
                Ok(choice) if (min..=max).contains(&choice) => return Ok(choice),
                _ => self.say(format!("Enter a number from {min} to {max}."))?,
            }
        }
    }

    pub(crate) fn int(&mut self, prompt: &str, min: Option<i32>, max: Option<i32>) -> Result<i32> {
        loop {
            let line = self.ask(prompt)?;
            match line.trim().parse::<i32>() {
                Ok(value) if in_bounds(value, min, max) => return Ok(value),
                _ => self.say(format!("Enter a whole number{}.", range_hint(min, max)))?,
            }
        }
    }

    /// Like [`Prompter::int`], but a blank line keeps `current`.
    pub(crate) fn optional_int(
        &mut self,
        prompt: &str,
        current: i32,
        min: Option<i32>,
        max: Option<i32>,
    ) -> Result<i32> {
        loop {
            let line = self.ask(&format!("{prompt} ({current}): "))?;
            if line.trim().is_empty() {
                return Ok(current);
            }
            match line.trim().parse::<i32>() {
                Ok(value) if in_bounds(value, min, max) => return Ok(value),
                _ => self.say(format!(
                    "Enter a whole number{} or leave it blank.",
                    range_hint(min, max)
                ))?,
            }
        }
    }

    /// Read trimmed text. Blank input is refused unless `allow_empty`.
    pub(crate) fn text(&mut self, prompt: &str, allow_empty: bool) -> Result<String> {
        loop {
            let line = self.ask(prompt)?;
            if allow_empty || !line.trim().is_empty() {
                return Ok(line.trim().to_string());
            }
            self.say("The field cannot be empty.")?;
        }
    }

    /// Read text that must not contain digits nor be a bare number.
    pub(crate) fn text_without_digits(&mut self, prompt: &str, allow_empty: bool) -> Result<String> {
        loop {
            let value = self.text(prompt, allow_empty)?;
            if value.is_empty() {
                return Ok(value);
            }
            if value.parse::<i64>().is_err() && !value.chars().any(char::is_numeric) {
                return Ok(value);
            }
            self.say("Text must not contain digits or be a number.")?;
        }
    }

    /// Yes/no question. With a default, a blank answer picks it.
    pub(crate) fn yes_no(&mut self, prompt: &str, default: Option<bool>) -> Result<bool> {
        let suffix = match default {
            None => " (y/n): ",
            Some(true) => " (Y/n): ",
            Some(false) => " (y/N): ",
        };
        loop {
            let answer = self.ask(&format!("{prompt}{suffix}"))?.trim().to_lowercase();
            match (answer.as_str(), default) {
                ("", Some(value)) => return Ok(value),
                ("y" | "yes", _) => return Ok(true),
                ("n" | "no", _) => return Ok(false),
                _ => self.say("Enter y (yes) or n (no).")?,
            }
        }
    }
}

fn in_bounds(value: i32, min: Option<i32>, max: Option<i32>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

fn range_hint(min: Option<i32>, max: Option<i32>) -> String {
    if min.is_none() && max.is_none() {
        return String::new();
    }
    format!(
        " in the range [{}; {}]",
        min.unwrap_or(i32::MIN),
        max.unwrap_or(i32::MAX)
    )
}
