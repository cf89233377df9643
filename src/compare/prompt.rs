//! Asking the user which locations to compare.
//!
//! Reads from any `BufRead` and writes prompts to any `Write`, so the
//! conversation can be driven by stdin/stdout or by a test.

use std::io::{self, BufRead, Write};

use crate::{
    compare::ComparisonRequest,
    core::{Result, trim_line_ending},
    dataset::Granularity,
};

pub const GRANULARITY_PROMPT: &str = "Do you want to compare counties, states, or countries?";
pub const INVALID_INPUT: &str = "Invalid input";

/// Prompts for the first and second identifier of a granularity
pub fn location_prompts(granularity: Granularity) -> (&'static str, &'static str) {
    match granularity {
        Granularity::County => (
            "Enter your first county in county, state format. Example: Union, New Jersey:",
            "Enter your second county:",
        ),
        Granularity::State => ("Enter your first state:", "Enter your second state:"),
        Granularity::Country => ("Enter your first country:", "Enter your second country:"),
    }
}

/// Ask for a granularity and two locations.
///
/// An unrecognized granularity writes "Invalid input" and yields `None`.
pub fn read_request<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<ComparisonRequest>> {
    let choice = ask(input, output, GRANULARITY_PROMPT)?;
    let granularity = match choice.parse::<Granularity>() {
        Ok(granularity) => granularity,
        Err(e) => {
            tracing::debug!("{e}");
            writeln!(output, "{INVALID_INPUT}")?;
            return Ok(None);
        }
    };

    let (first_prompt, second_prompt) = location_prompts(granularity);
    let first = ask(input, output, first_prompt)?;
    let second = ask(input, output, second_prompt)?;

    ComparisonRequest::new(granularity, &first, &second).map(Some)
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    writeln!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("input ended before answering '{prompt}'"),
        )
        .into());
    }

    Ok(trim_line_ending(&line).to_string())
}
