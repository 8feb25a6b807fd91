use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;
use tracing::{debug, warn};

use crate::command::{self, Script};
use crate::error::{BttError, BttResult};
use crate::macos::Executor;
use crate::response;

/// Uniform answer handed to presentation code. Exactly one of `data`/`error` exists.
///
/// Operations without a payload (`T = ()`) serialize as a bare `{"status":"success"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "status",
    rename_all = "lowercase",
    bound(serialize = "T: Serialize + 'static")
)]
pub enum Outcome<T> {
    Success {
        #[serde(skip_serializing_if = "is_unit")]
        data: T,
    },
    Error {
        error: String,
    },
}

fn is_unit<T: 'static>(_: &T) -> bool {
    TypeId::of::<T>() == TypeId::of::<()>()
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Error { error } => Some(error.as_str()),
        }
    }
}

impl<T> From<BttResult<T>> for Outcome<T> {
    fn from(result: BttResult<T>) -> Self {
        match result {
            Ok(data) => Outcome::Success { data },
            Err(err) => Outcome::Error {
                error: err.to_string(),
            },
        }
    }
}

/// A BetterTouchTool variable as stored by the app. `Null` means unset or missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VariableValue {
    String { value: String },
    Number { value: f64 },
    Null,
}

impl VariableValue {
    pub fn type_label(&self) -> &'static str {
        match self {
            VariableValue::String { .. } => "String",
            VariableValue::Number { .. } => "Number",
            VariableValue::Null => "Null",
        }
    }

    /// Text suitable for copying, `None` for a null variable.
    pub fn copy_text(&self) -> Option<String> {
        match self {
            VariableValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::String { value } => f.write_str(value),
            VariableValue::Number { value } => write!(f, "{}", value),
            VariableValue::Null => f.write_str("null"),
        }
    }
}

/// Talks to BetterTouchTool through an [`Executor`].
///
/// The `try_*` methods keep the typed [`BttError`]; the plain methods flatten it into an
/// [`Outcome`] so that no error escapes to the caller.
pub struct BetterTouchTool<E> {
    executor: E,
}

impl<E: Executor> BetterTouchTool<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Fire a named trigger through the `btt://` URL scheme.
    ///
    /// Success only means the system accepted the URL, the trigger runs asynchronously.
    pub async fn try_run_named_trigger_url(
        &self,
        name: &str,
        secret: Option<&str>,
    ) -> BttResult<()> {
        let url = command::named_trigger_url(name, secret);
        debug!(url = %command::redact(&url, secret), "opening named trigger URL");
        self.executor.open_url(&url).await
    }

    pub async fn try_run_named_trigger_applescript(
        &self,
        name: &str,
        secret: Option<&str>,
    ) -> BttResult<()> {
        let script = command::run_named_trigger_script(name, secret);
        self.run_classified(&script, secret).await.map(|_| ())
    }

    pub async fn try_reveal_in_ui(&self, uuid: &str, secret: Option<&str>) -> BttResult<()> {
        let script = command::reveal_in_ui_script(uuid, secret);
        self.run_classified(&script, secret).await.map(|_| ())
    }

    pub async fn try_get_variable(
        &self,
        name: &str,
        secret: Option<&str>,
    ) -> BttResult<VariableValue> {
        let script = command::get_variable_script(name, secret);
        let payload = self.run_classified(&script, secret).await?;
        parse_variable(&payload)
    }

    pub async fn run_named_trigger_url(&self, name: &str, secret: Option<&str>) -> Outcome<()> {
        normalize(
            "run named trigger (URL)",
            self.try_run_named_trigger_url(name, secret).await,
        )
    }

    pub async fn run_named_trigger_applescript(
        &self,
        name: &str,
        secret: Option<&str>,
    ) -> Outcome<()> {
        normalize(
            "run named trigger (AppleScript)",
            self.try_run_named_trigger_applescript(name, secret).await,
        )
    }

    pub async fn reveal_in_ui(&self, uuid: &str, secret: Option<&str>) -> Outcome<()> {
        normalize("reveal in UI", self.try_reveal_in_ui(uuid, secret).await)
    }

    pub async fn get_variable(&self, name: &str, secret: Option<&str>) -> Outcome<VariableValue> {
        normalize("get variable", self.try_get_variable(name, secret).await)
    }

    async fn run_classified(&self, script: &Script, secret: Option<&str>) -> BttResult<String> {
        debug!(
            language = script.language.osa_name(),
            source = %command::redact(&script.source, secret),
            "running script"
        );
        let raw = self.executor.run_script(script).await?;
        response::classify(&raw).map(str::to_owned)
    }
}

fn parse_variable(payload: &str) -> BttResult<VariableValue> {
    serde_json::from_str(payload.trim())
        .map_err(|err| BttError::MalformedResponse(format!("{} in {:?}", err, payload)))
}

fn normalize<T>(operation: &str, result: BttResult<T>) -> Outcome<T> {
    if let Err(err) = &result {
        warn!(operation, error = ?err, "BetterTouchTool call failed");
    }
    result.into()
}
