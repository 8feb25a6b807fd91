use anyhow::Result;
use btt_trigger::btt::{BetterTouchTool, Outcome};
use btt_trigger::config::{Preferences, RunType};
use btt_trigger::macos::{copy_to_clipboard, Osascript};
use btt_trigger::{display, logging};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Parser)]
#[command(name = "btt-trigger", version, about = "Drive BetterTouchTool from the command line")]
struct Cli {
    /// Preferences file (defaults to the per-user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the raw result as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a named trigger
    Run {
        /// Exact name of the named trigger
        name: String,
        /// Override the configured run type (url, applescript)
        #[arg(long, value_parser = RunType::from_str)]
        run_type: Option<RunType>,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the value of a variable
    GetVariable {
        name: String,
        /// Copy the value to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Reveal a trigger in the BetterTouchTool configuration UI
    Reveal { uuid: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init(args.verbose);

    let prefs_path = match args.config {
        Some(path) => path,
        None => Preferences::default_path()?,
    };
    let prefs = Preferences::load(Some(prefs_path.as_path()))?;
    let btt = BetterTouchTool::new(Osascript);

    let succeeded = match args.command {
        Commands::Run {
            name,
            run_type,
            yes,
        } => {
            if !yes
                && !display::confirm(
                    &display::confirmation_message(&name, run_type),
                    io::stdin().lock(),
                    io::stderr(),
                )?
            {
                info!("cancelled by user");
                return Ok(());
            }
            let outcome = match run_type.unwrap_or(prefs.run_type) {
                RunType::Url => btt.run_named_trigger_url(&name, prefs.secret()).await,
                RunType::AppleScript => {
                    btt.run_named_trigger_applescript(&name, prefs.secret())
                        .await
                }
            };
            report(&outcome, args.json, &prefs_path, || {
                format!("Ran named trigger \"{}\"", name)
            })?
        }
        Commands::GetVariable { name, copy } => {
            let outcome = btt.get_variable(&name, prefs.secret()).await;
            if copy {
                if let Outcome::Success { data } = &outcome {
                    match data.copy_text() {
                        Some(text) => copy_to_clipboard(&text).await?,
                        None => eprintln!("Nothing to copy, \"{}\" has no value", name),
                    }
                }
            }
            if args.json {
                report(&outcome, true, &prefs_path, String::new)?
            } else {
                println!("{}", display::variable_markdown(&name, &outcome));
                if let Some(error) = outcome.error() {
                    eprintln!("{}", display::remediation(error, &prefs_path));
                }
                outcome.is_success()
            }
        }
        Commands::Reveal { uuid } => {
            let outcome = btt.reveal_in_ui(&uuid, prefs.secret()).await;
            report(&outcome, args.json, &prefs_path, || {
                format!("Revealed {} in BetterTouchTool", uuid)
            })?
        }
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

fn report<T: Serialize + 'static>(
    outcome: &Outcome<T>,
    json: bool,
    prefs_path: &Path,
    success_message: impl FnOnce() -> String,
) -> Result<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(outcome.is_success());
    }
    match outcome {
        Outcome::Success { .. } => println!("{}", success_message()),
        Outcome::Error { error } => {
            eprintln!("Error: {}", error);
            eprintln!("{}", display::remediation(error, prefs_path));
        }
    }
    Ok(outcome.is_success())
}
