use async_trait::async_trait;
use std::process::Output;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::command::Script;
use crate::error::{BttError, BttResult};

const OSASCRIPT: &str = "/usr/bin/osascript";
const OPEN: &str = "/usr/bin/open";
const PBCOPY: &str = "/usr/bin/pbcopy";

/// The two things we ask of the operating system.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Hand a URL to the system URL handler. Returns once the handler accepted it.
    async fn open_url(&self, url: &str) -> BttResult<()>;

    /// Run a script and return what it printed, without the trailing newline.
    async fn run_script(&self, script: &Script) -> BttResult<String>;
}

/// Executor backed by `osascript` and `open`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Osascript;

#[async_trait]
impl Executor for Osascript {
    async fn open_url(&self, url: &str) -> BttResult<()> {
        let output = Command::new(OPEN)
            .arg("-g")
            .arg(url)
            .output()
            .await
            .map_err(|err| BttError::Dispatch(format!("Couldn't spawn open: {}", err)))?;
        check_status("open", &output)?;
        Ok(())
    }

    async fn run_script(&self, script: &Script) -> BttResult<String> {
        let output = Command::new(OSASCRIPT)
            .arg("-l")
            .arg(script.language.osa_name())
            .arg("-e")
            .arg(&script.source)
            .output()
            .await
            .map_err(|err| BttError::Dispatch(format!("Couldn't spawn osascript: {}", err)))?;
        check_status("osascript", &output)?;
        let stdout = String::from_utf8(output.stdout).map_err(|err| {
            BttError::Dispatch(format!("Failed to get process output: {}", err))
        })?;
        debug!(bytes = stdout.len(), "osascript finished");
        Ok(trim_newline(&stdout).to_owned())
    }
}

fn check_status(program: &str, output: &Output) -> BttResult<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    let message = if stderr.is_empty() {
        format!("{} exited with {}", program, output.status)
    } else {
        format!("{} failed: {}", program, stderr)
    };
    Err(BttError::Dispatch(message))
}

fn trim_newline(text: &str) -> &str {
    text.strip_suffix('\n')
        .map(|text| text.strip_suffix('\r').unwrap_or(text))
        .unwrap_or(text)
}

/// Put text on the general pasteboard.
pub async fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    let mut child = Command::new(PBCOPY)
        .stdin(std::process::Stdio::piped())
        .spawn()
        .map_err(|err| anyhow::anyhow!("Couldn't spawn pbcopy: {}", err))?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).await?;
    }
    let status = child.wait().await?;
    if !status.success() {
        anyhow::bail!("pbcopy exited with {}", status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_trailing_newline_is_removed() {
        assert_eq!(trim_newline("value\n"), "value");
        assert_eq!(trim_newline("value\r\n"), "value");
        assert_eq!(trim_newline("value\n\n"), "value\n");
        assert_eq!(trim_newline("  spaced  "), "  spaced  ");
        assert_eq!(trim_newline(""), "");
    }
}
