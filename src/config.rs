use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::BttError;

pub const SECRET_ENV: &str = "BTT_SHARED_SECRET";
pub const RUN_TYPE_ENV: &str = "BTT_RUN_TYPE";

/// How a named trigger is handed to BetterTouchTool.
///
/// Preferences files accept the same spellings as `--run-type`, in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum RunType {
    /// `btt://` URL scheme, fire and forget.
    #[default]
    Url,
    AppleScript,
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunType::Url => f.write_str("URL"),
            RunType::AppleScript => f.write_str("AppleScript"),
        }
    }
}

impl FromStr for RunType {
    type Err = BttError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "url" | "http" | "urlscheme" => Ok(RunType::Url),
            "applescript" | "jxa" | "javascript" | "script" => Ok(RunType::AppleScript),
            _ => Err(BttError::Config(format!("unknown run type '{}'", s))),
        }
    }
}

impl TryFrom<String> for RunType {
    type Error = BttError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// User preferences, read fresh for every invocation and never written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub shared_secret: Option<String>,
    pub run_type: RunType,
}

impl Preferences {
    pub fn default_path() -> Result<PathBuf> {
        ProjectDirs::from("com", "folivora", "btt-trigger")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or_else(|| anyhow!("Couldn't find valid home directory"))
    }

    /// Load from `path`, or the default location. A missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        let mut prefs = Self::from_file(&path)?;
        prefs.apply_overrides(
            std::env::var(SECRET_ENV).ok(),
            std::env::var(RUN_TYPE_ENV).ok(),
        )?;
        Ok(prefs)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading preferences from {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    fn apply_overrides(&mut self, secret: Option<String>, run_type: Option<String>) -> Result<()> {
        if let Some(secret) = secret {
            self.shared_secret = Some(secret);
        }
        if let Some(run_type) = run_type {
            self.run_type = run_type.parse()?;
        }
        Ok(())
    }

    /// The shared secret, if one is actually configured.
    pub fn secret(&self) -> Option<&str> {
        self.shared_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
    }
}
