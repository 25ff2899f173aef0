use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use tracing::debug;

use crate::config::{filters::ALL, City, Day, FilterSelection, Month};

/// Print `question` and read one line, without its line terminator.
///
/// `Ok(None)` means the input is exhausted.
pub fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<Option<String>> {
    write!(out, "{}", question)?;
    out.flush()?;
    let mut line = String::new();
    let n = input.read_line(&mut line).context("reading answer")?;
    if n == 0 {
        return Ok(None);
    }
    let answer = line.trim_end_matches(['\r', '\n']).to_string();
    debug!(%question, %answer, "prompt answered");
    Ok(Some(answer))
}

/// Ask until `parse` accepts the answer. Invalid answers re-prompt forever.
fn ask_until<R, W, T, F>(input: &mut R, out: &mut W, question: &str, retry: &str, parse: F) -> Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Option<T>,
{
    loop {
        let Some(answer) = ask(input, out, question)? else {
            bail!("input closed while waiting for an answer to: {}", question.trim());
        };
        if let Some(v) = parse(&answer) {
            return Ok(v);
        }
        writeln!(out, "{}", retry)?;
    }
}

/// `Some(None)` for "all", `Some(Some(v))` for a named value.
fn all_or<T>(answer: &str, parse: fn(&str) -> Option<T>) -> Option<Option<T>> {
    if answer.to_lowercase() == ALL {
        Some(None)
    } else {
        parse(answer).map(Some)
    }
}

/// Collect a valid city, month and day from the user.
pub fn get_filters<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<FilterSelection> {
    writeln!(out, "Hi! Do you want to explore some US bikeshare data? Let's go!")?;

    let city = ask_until(
        input,
        out,
        "Do you want to see the data of Chicago, New York City or Washington?: ",
        "Invalid input. Please select one of the three cities: ",
        City::from_str,
    )?;
    let month = ask_until(
        input,
        out,
        "Which month would you like to filter by? Please enter 'all' if you do not want to filter by month: ",
        "Invalid input. Please enter a valid month or 'all' if you do not want to filter by month: ",
        |a| all_or(a, Month::from_str),
    )?;
    let day = ask_until(
        input,
        out,
        "Which day of the week would you like to filter by? Please enter 'all' if you do not want to filter by day: ",
        "Invalid input. Please enter a valid day of the week or 'all' if you do not want to filter by day: ",
        |a| all_or(a, Day::from_str),
    )?;

    writeln!(out, "{}", "-".repeat(40))?;
    Ok(FilterSelection { city, month, day })
}

/// True only for a case-insensitive "yes"; anything else, or end of input, is no.
pub fn ask_yes<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<bool> {
    Ok(ask(input, out, question)?.is_some_and(|a| a.to_lowercase() == "yes"))
}
