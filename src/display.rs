use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::btt::{Outcome, VariableValue};
use crate::config::RunType;
use crate::response::is_btt_not_running_error;

/// Markdown detail view for a variable lookup.
pub fn variable_markdown(name: &str, outcome: &Outcome<VariableValue>) -> String {
    let body = match outcome {
        Outcome::Error { error } => format!("`Error: {}`", error),
        Outcome::Success {
            data: VariableValue::Null,
        } => "`Variable does not exist or has null value`".to_string(),
        Outcome::Success { data } => format!(
            "**Type:** {}\n\n**Value:** `{}`",
            data.type_label(),
            data
        ),
    };
    format!("# {}\n\n{}", name, body)
}

pub fn confirmation_message(name: &str, run_type: Option<RunType>) -> String {
    let suffix = run_type
        .map(|run_type| format!(" with run type \"{}\"", run_type))
        .unwrap_or_default();
    format!(
        "Are you sure you want to run the Named Trigger \"{}\"{}?",
        name, suffix
    )
}

/// Ask a yes/no question on `output` and read the answer from `input`. Anything but
/// `y`/`yes` declines. The binary passes stderr so stdout only ever carries results.
pub fn confirm<R: BufRead, W: Write>(
    message: &str,
    mut input: R,
    mut output: W,
) -> io::Result<bool> {
    write!(output, "{} [y/N] ", message)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// What the user can do about an error.
pub fn remediation(error: &str, preferences: &Path) -> String {
    if is_btt_not_running_error(error) {
        "Open BetterTouchTool and try again.".to_string()
    } else {
        format!(
            "Check your preferences in {} (shared secret, run type).",
            preferences.display()
        )
    }
}
