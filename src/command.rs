//! Builders for the exact text handed to the OS: `btt://` URLs, AppleScript and JXA sources.
//!
//! Nothing here executes anything. Every caller-supplied value is escaped for the place it
//! lands in: percent-encoding for URL query parameters, JSON string literals inside JXA,
//! AppleScript string expressions inside AppleScript.
//! Credentials are passed in explicitly, builders never read preferences themselves.

use crate::response::{BTT_NOT_RUNNING_ERROR, ERROR_DETAIL_SEPARATOR, ERROR_PREFIX};

pub const BTT_APP_NAME: &str = "BetterTouchTool";
pub const NAMED_TRIGGER_URL: &str = "btt://trigger_named/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLanguage {
    AppleScript,
    /// JavaScript for Automation.
    JavaScript,
}

impl ScriptLanguage {
    /// Value for `osascript -l`.
    pub fn osa_name(self) -> &'static str {
        match self {
            ScriptLanguage::AppleScript => "AppleScript",
            ScriptLanguage::JavaScript => "JavaScript",
        }
    }
}

/// Script source together with the OSA language it is written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub language: ScriptLanguage,
    pub source: String,
}

impl Script {
    pub fn applescript(source: impl Into<String>) -> Self {
        Self {
            language: ScriptLanguage::AppleScript,
            source: source.into(),
        }
    }

    pub fn javascript(source: impl Into<String>) -> Self {
        Self {
            language: ScriptLanguage::JavaScript,
            source: source.into(),
        }
    }
}

/// Quote a value as a JSON string literal, which is also a valid JXA literal.
pub fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

/// Quote a value for AppleScript.
///
/// AppleScript literals only know `\"`, `\\`, `\n`, `\r` and `\t`. Any other control
/// character is spliced in as `(character id N)`, turning the result into a parenthesised
/// concatenation that still evaluates to the original text.
pub fn applescript_string(value: &str) -> String {
    let mut parts = Vec::new();
    let mut literal = String::new();
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if c.is_control() => {
                if !literal.is_empty() {
                    parts.push(format!("\"{}\"", literal));
                    literal.clear();
                }
                parts.push(format!("(character id {})", c as u32));
            }
            c => literal.push(c),
        }
    }
    if parts.is_empty() || !literal.is_empty() {
        parts.push(format!("\"{}\"", literal));
    }
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        format!("({})", parts.join(" & "))
    }
}

fn configured(secret: Option<&str>) -> Option<&str> {
    secret.filter(|secret| !secret.is_empty())
}

pub fn named_trigger_url(name: &str, secret: Option<&str>) -> String {
    let mut params = vec![format!("trigger_name={}", urlencoding::encode(name))];
    if let Some(secret) = configured(secret) {
        params.push(format!("shared_secret={}", urlencoding::encode(secret)));
    }
    format!("{}?{}", NAMED_TRIGGER_URL, params.join("&"))
}

fn tell_btt(verb: &str, argument: &str, secret: Option<&str>) -> String {
    let secret_param = configured(secret)
        .map(|secret| format!(" shared_secret {}", applescript_string(secret)))
        .unwrap_or_default();
    format!(
        "tell application {}\n  {} {}{}\nend tell",
        applescript_string(BTT_APP_NAME),
        verb,
        applescript_string(argument),
        secret_param
    )
}

pub fn named_trigger_applescript(name: &str, secret: Option<&str>) -> String {
    tell_btt("trigger_named_async_without_response", name, secret)
}

pub fn reveal_in_ui_applescript(uuid: &str, secret: Option<&str>) -> String {
    tell_btt("reveal_element_in_ui", uuid, secret)
}

/// A JXA `return` statement producing an `error: ` response.
///
/// When `error_variable` is set the generated code concatenates that variable's value at
/// script runtime, e.g. `return "error: boom. Error: " + e`.
pub fn return_error_text(message: &str, error_variable: Option<&str>) -> String {
    let base = format!("return \"{}{}", ERROR_PREFIX, message);
    match error_variable {
        Some(variable) => format!("{}{}\" + {}", base, ERROR_DETAIL_SEPARATOR, variable),
        None => format!("{}\"", base),
    }
}

/// AppleScript flavour of [`return_error_text`], which concatenates with `&`.
fn return_error_text_applescript(message: &str, error_variable: Option<&str>) -> String {
    let base = format!("return \"{}{}", ERROR_PREFIX, message);
    match error_variable {
        Some(variable) => format!("{}{}\" & {}", base, ERROR_DETAIL_SEPARATOR, variable),
        None => format!("{}\"", base),
    }
}

fn indent(source: &str, by: &str) -> String {
    source
        .lines()
        .map(|line| format!("{}{}", by, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap an AppleScript `tell` block so that it always answers in-band: a not-running
/// guard first, scripting errors caught and prefixed, an empty string on success.
pub fn guarded_applescript(failure_message: &str, body: &str) -> Script {
    Script::applescript(format!(
        "if not (application {app} is running) then\n  {not_running}\nend if\ntry\n{body}\non error errMsg\n  {failed}\nend try\nreturn \"\"",
        app = applescript_string(BTT_APP_NAME),
        not_running = return_error_text_applescript(BTT_NOT_RUNNING_ERROR, None),
        body = indent(body, "  "),
        failed = return_error_text_applescript(failure_message, Some("errMsg")),
    ))
}

pub fn run_named_trigger_script(name: &str, secret: Option<&str>) -> Script {
    guarded_applescript(
        "Failed to run named trigger",
        &named_trigger_applescript(name, secret),
    )
}

pub fn reveal_in_ui_script(uuid: &str, secret: Option<&str>) -> Script {
    guarded_applescript(
        "Failed to reveal element",
        &reveal_in_ui_applescript(uuid, secret),
    )
}

/// JXA that looks a variable up as a string, then as a number, and answers with a JSON
/// encoded variable value (`{"type":"null"}` when neither exists).
pub fn get_variable_script(name: &str, secret: Option<&str>) -> Script {
    let options = configured(secret)
        .map(|secret| format!("{{ shared_secret: {} }}", quote(secret)))
        .unwrap_or_else(|| "{}".to_string());
    Script::javascript(format!(
        r#"(() => {{
  const btt = Application({app});
  if (!btt.running()) {{
    {not_running};
  }}
  const name = {name};
  const options = {options};
  try {{
    const text = btt.get_string_variable(name, options);
    if (text !== undefined && text !== null) {{
      return JSON.stringify({{ type: "string", value: String(text) }});
    }}
    const number = btt.get_number_variable(name, options);
    if (typeof number === "number" && !isNaN(number)) {{
      return JSON.stringify({{ type: "number", value: number }});
    }}
    return JSON.stringify({{ type: "null" }});
  }} catch (error) {{
    {failed};
  }}
}})()"#,
        app = quote(BTT_APP_NAME),
        not_running = return_error_text(BTT_NOT_RUNNING_ERROR, None),
        name = quote(name),
        options = options,
        failed = return_error_text("Failed to get variable", Some("error")),
    ))
}

/// Hide the `shared_secret` argument in text destined for logs. Only the places the
/// builders put the secret are touched: the URL parameter, the AppleScript parameter and
/// the JXA options object.
pub fn redact(text: &str, secret: Option<&str>) -> String {
    let secret = match configured(secret) {
        Some(secret) => secret,
        None => return text.to_owned(),
    };
    text.replace(
        &format!("shared_secret={}", urlencoding::encode(secret)),
        "shared_secret=<redacted>",
    )
    .replace(
        &format!("shared_secret {}", applescript_string(secret)),
        "shared_secret \"<redacted>\"",
    )
    .replace(
        &format!("shared_secret: {}", quote(secret)),
        "shared_secret: \"<redacted>\"",
    )
}
