use async_trait::async_trait;
use btt_trigger::command::{self, Script};
use btt_trigger::macos::Executor;
use btt_trigger::response::{is_btt_not_running_error, is_error_response};
use btt_trigger::{BetterTouchTool, BttError, BttResult, Outcome, VariableValue};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Pretends to be osascript: answers scripts from a queue, rejects URLs when told to.
#[derive(Default)]
struct FakeSystem {
    answers: Mutex<VecDeque<BttResult<String>>>,
    opened: Mutex<Vec<String>>,
    refuse_urls: bool,
}

impl FakeSystem {
    fn with_answers(answers: Vec<BttResult<String>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Executor for FakeSystem {
    async fn open_url(&self, url: &str) -> BttResult<()> {
        if self.refuse_urls {
            return Err(BttError::Dispatch("LSOpenURLsWithRole() failed".to_string()));
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn run_script(&self, _script: &Script) -> BttResult<String> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BttError::Dispatch("no answer queued".to_string())))
    }
}

#[tokio::test]
async fn variable_lookups_cover_every_shape() {
    let btt = BetterTouchTool::new(FakeSystem::with_answers(vec![
        Ok(r#"{"type":"string","value":"Focus"}"#.to_string()),
        Ok(r#"{"type":"number","value":-2.5}"#.to_string()),
        Ok(r#"{"type":"null"}"#.to_string()),
        Ok("error: Failed to get variable. Error: Error: Can't get object.".to_string()),
        Err(BttError::Dispatch("osascript failed: not allowed".to_string())),
    ]));

    assert_eq!(
        btt.get_variable("mode", None).await,
        Outcome::Success {
            data: VariableValue::String {
                value: "Focus".to_string()
            }
        }
    );
    assert_eq!(
        btt.get_variable("offset", None).await,
        Outcome::Success {
            data: VariableValue::Number { value: -2.5 }
        }
    );
    assert_eq!(
        btt.get_variable("unset", None).await,
        Outcome::Success {
            data: VariableValue::Null
        }
    );
    assert_eq!(
        btt.get_variable("broken", None).await,
        Outcome::Error {
            error: "Failed to get variable. Error: Error: Can't get object.".to_string()
        }
    );
    assert_eq!(
        btt.get_variable("denied", None).await,
        Outcome::Error {
            error: "osascript failed: not allowed".to_string()
        }
    );
}

#[tokio::test]
async fn error_prefix_inside_a_value_is_still_data() {
    let btt = BetterTouchTool::new(FakeSystem::with_answers(vec![Ok(
        r#"{"type":"string","value":"error: x"}"#.to_string(),
    )]));
    assert_eq!(
        btt.get_variable("last_message", None).await,
        Outcome::Success {
            data: VariableValue::String {
                value: "error: x".to_string()
            }
        }
    );
}

#[tokio::test]
async fn malformed_variable_payload_is_an_error() {
    let btt = BetterTouchTool::new(FakeSystem::with_answers(vec![Ok("42".to_string())]));
    let outcome = btt.get_variable("v", None).await;
    let error = outcome.error().unwrap();
    assert!(error.starts_with("Unexpected response from BetterTouchTool"));
    assert!(!is_error_response(error));
}

#[tokio::test]
async fn not_running_survives_normalization() {
    let btt = BetterTouchTool::new(FakeSystem::with_answers(vec![Ok(
        "error: BetterTouchTool is not running".to_string(),
    )]));
    let outcome = btt.run_named_trigger_applescript("Dock", Some("s")).await;
    assert!(is_btt_not_running_error(outcome.error().unwrap()));
}

#[tokio::test]
async fn url_path_only_reports_dispatch() {
    let accepting = BetterTouchTool::new(FakeSystem::default());
    assert!(accepting
        .run_named_trigger_url("a b", Some("s&1"))
        .await
        .is_success());
    assert_eq!(
        accepting.executor().opened.lock().unwrap().as_slice(),
        [command::named_trigger_url("a b", Some("s&1"))]
    );

    let refusing = BetterTouchTool::new(FakeSystem {
        refuse_urls: true,
        ..FakeSystem::default()
    });
    assert_eq!(
        refusing.run_named_trigger_url("a b", None).await,
        Outcome::Error {
            error: "LSOpenURLsWithRole() failed".to_string()
        }
    );
}

#[tokio::test]
async fn outcome_json_matches_launcher_contract() {
    let btt = BetterTouchTool::new(FakeSystem::with_answers(vec![Ok(String::new())]));
    let outcome = btt.reveal_in_ui("6F3C-11AA", None).await;
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({"status": "success"})
    );
}
