// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Main entry point for the scangate CLI
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use scangate::capture::pipeline::spawn_capture_reader;
use scangate::capture::StdinCapture;
use scangate::config::{Config, FileConfigStore};
use scangate::engine::evaluator::PolicyEvaluator;
use scangate::engine_core::constants;
use scangate::engine_core::errors::GateError;
use scangate::engine_core::models::{
    Notification, NotificationLevel, PolicyDecision, StatusLabel,
};
use scangate::engine_core::traits::{
    ConfigStore, NotificationSink, StatusIndicator, UrlOpener,
};
use scangate::history::open_store;
use scangate::session::driver::{Collaborators, SessionDriver};
use scangate::session::machine::SessionEvent;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for configuration and history files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Listen for scan codes on stdin and gate them through the policy
    Run,
    /// Evaluate a single URL against the configured policy and exit
    Check {
        /// URL (or bare hostname) to evaluate
        url: String,
    },
    /// Inspect or clear the scan history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// Print retained records, most recent first
    List,
    /// Destroy all retained records
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    install_panic_hook();

    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| {
            env::var(constants::config::ENV_DATA_DIR)
                .ok()
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from("."));

    let config_path = FileConfigStore::resolve_path(cli.config.clone(), &data_dir);
    let config_store = Arc::new(FileConfigStore::new(config_path));
    let config = config_store.get().await.unwrap_or_else(|e| {
        eprintln!("Warning: failed to load config, using defaults: {}", e);
        Config::default()
    });

    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to init tracing: {}", e);
    }

    match cli.command {
        Command::Run => run_session(config, config_store, &data_dir).await,
        Command::Check { url } => check_url(&url, &config),
        Command::History { command } => run_history(command, &config, &data_dir).await,
    }
}

async fn run_session(
    config: Config,
    config_store: Arc<FileConfigStore>,
    data_dir: &std::path::Path,
) -> anyhow::Result<()> {
    info!("Starting scangate session");

    let history = open_store(config.history_backend, data_dir, config.max_history_items)?;
    let capture = Arc::new(StdinCapture::new());
    let gate = capture.gate();

    let collaborators = Collaborators {
        capture: capture.clone(),
        opener: Arc::new(ShellUrlOpener),
        notifier: Arc::new(ConsoleNotifier),
        status: Arc::new(ConsoleStatusIndicator),
        config_store,
        history,
    };
    let (driver, handle) = SessionDriver::new(collaborators, config);

    spawn_capture_reader(tokio::io::stdin(), handle.clone(), gate);
    handle.send_event(SessionEvent::StartListening).await;

    driver.run().await;
    Ok(())
}

fn check_url(raw: &str, config: &Config) -> anyhow::Result<()> {
    match PolicyEvaluator::evaluate_input(raw, config) {
        PolicyDecision::Allowed { host } => {
            println!("allowed: {}", host);
            Ok(())
        }
        PolicyDecision::Blocked { host, reason } => {
            println!("blocked: {} ({})", host, reason);
            std::process::exit(1);
        }
        PolicyDecision::Malformed { raw } => {
            println!("malformed: {}", raw);
            std::process::exit(2);
        }
        _ => {
            println!("undetermined");
            std::process::exit(2);
        }
    }
}

async fn run_history(
    command: HistoryCommand,
    config: &Config,
    data_dir: &std::path::Path,
) -> anyhow::Result<()> {
    let store = open_store(config.history_backend, data_dir, config.max_history_items)?;
    match command {
        HistoryCommand::List => {
            let records = store.list().await?;
            if records.is_empty() {
                println!("No history.");
                return Ok(());
            }
            for record in records {
                println!("{}  {}", record.timestamp, record.url);
            }
        }
        HistoryCommand::Clear => {
            store.clear().await?;
            println!("History cleared.");
        }
    }
    Ok(())
}

/// Opens URLs through the platform's default-handler shim.
struct ShellUrlOpener;

#[cfg(target_os = "macos")]
const OPEN_COMMAND: &str = "open";
#[cfg(not(target_os = "macos"))]
const OPEN_COMMAND: &str = "xdg-open";

#[async_trait]
impl UrlOpener for ShellUrlOpener {
    async fn open(&self, url: &str) -> Result<(), GateError> {
        let status = tokio::process::Command::new(OPEN_COMMAND)
            .arg(url)
            .status()
            .await
            .map_err(|e| GateError::OpenError(e.to_string()))?;
        if !status.success() {
            return Err(GateError::OpenError(format!(
                "{} exited with {}",
                OPEN_COMMAND, status
            )));
        }
        Ok(())
    }
}

/// Prints notifications to stdout; the CLI stand-in for desktop toasts.
struct ConsoleNotifier;

#[async_trait]
impl NotificationSink for ConsoleNotifier {
    async fn notify(&self, notification: Notification) {
        let tag = match notification.level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
            NotificationLevel::Info => "info",
        };
        match &notification.description {
            Some(description) => println!("[{}] {}: {}", tag, notification.title, description),
            None => println!("[{}] {}", tag, notification.title),
        }
    }

    async fn dismiss(&self) {}
}

/// Logs the coarse session label where a desktop build would recolor a
/// tray icon.
struct ConsoleStatusIndicator;

#[async_trait]
impl StatusIndicator for ConsoleStatusIndicator {
    async fn set_state(&self, label: StatusLabel) {
        info!(state = %label, "Session state");
    }
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("PANIC: {} at {}", message, location);
    }));
}

fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("scangate=debug,info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
