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

//! Configuration model and file-backed configuration store.
//!
//! The configuration shape is fixed and versionless: policy lists,
//! scan-mode, payload prefix/suffix conventions, history bounds, and
//! notification preferences. Updates take effect only for scans initiated
//! after the update; an in-flight scan keeps the snapshot it started with.

use crate::engine_core::constants;
use crate::engine_core::errors::GateError;
use crate::engine_core::models::ControlKey;
use crate::engine_core::traits::ConfigStore;
use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Whether one accepted scan ends listening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    Single,
    Continuous,
}

/// History persistence strategy, selected once at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryBackend {
    /// Single bounded file-resident JSON collection
    Structured,
    /// Indexed append-only SQLite table
    Relational,
}

/// How decisions are surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationMode {
    Toast,
    StatusOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixMode {
    None,
    /// Strip a well-known scanner preamble, longest match wins
    Default,
    /// Strip an exact configured literal
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixMode {
    None,
    Enter,
    Tab,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixRule {
    pub mode: PrefixMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuffixRule {
    pub mode: SuffixMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl SuffixRule {
    /// The control key that completes a scan. Tab-suffixed scanners end
    /// each code with Tab; everything else ends with Enter.
    pub fn terminator(&self) -> ControlKey {
        match self.mode {
            SuffixMode::Tab => ControlKey::Tab,
            _ => ControlKey::Enter,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Exact hostnames, case-insensitive, no wildcards. Empty means
    /// "allow everything not blocked".
    pub allowlist: Vec<String>,
    /// Exact hostnames, case-insensitive. Takes precedence over the
    /// allowlist.
    pub blocklist: Vec<String>,
    pub scan_mode: ScanMode,
    pub prefix: PrefixRule,
    pub suffix: SuffixRule,
    pub max_history_items: u32,
    pub history_backend: HistoryBackend,
    pub notification_mode: NotificationMode,
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    /// Build a configuration from defaults plus environment overrides.
    pub fn from_env() -> Result<Self, GateError> {
        let mut config = Self::default();
        if let Ok(level) = env::var(constants::config::ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Ok(format) = env::var(constants::config::ENV_LOG_FORMAT) {
            config.log_format = format;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject shapes that would silently misbehave at scan time.
    pub fn validate(&self) -> Result<(), GateError> {
        if self.max_history_items == 0 {
            return Err(GateError::ValidationError(
                "max_history_items must be positive".to_string(),
            ));
        }
        if self.prefix.mode == PrefixMode::Custom
            && self.prefix.value.as_deref().unwrap_or("").is_empty()
        {
            return Err(GateError::ValidationError(
                "custom prefix requires a value".to_string(),
            ));
        }
        if self.suffix.mode == SuffixMode::Custom
            && self.suffix.value.as_deref().unwrap_or("").is_empty()
        {
            return Err(GateError::ValidationError(
                "custom suffix requires a value".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowlist: vec![],
            blocklist: vec![],
            scan_mode: ScanMode::Single,
            prefix: PrefixRule {
                mode: PrefixMode::None,
                value: None,
            },
            suffix: SuffixRule {
                mode: SuffixMode::Enter,
                value: None,
            },
            max_history_items: constants::history::DEFAULT_MAX_ITEMS,
            history_backend: HistoryBackend::Structured,
            notification_mode: NotificationMode::Toast,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

/// JSON file-backed configuration store. Reads and writes hold an
/// advisory file lock so a concurrently running settings UI cannot
/// interleave a partial write with our read.
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the config path: explicit flag, then env var, then the
    /// default file inside the data dir.
    pub fn resolve_path(flag: Option<PathBuf>, data_dir: &Path) -> PathBuf {
        flag.or_else(|| {
            env::var(constants::config::ENV_CONFIG_PATH)
                .ok()
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| data_dir.join(constants::config::CONFIG_FILE))
    }

    fn read_config(&self) -> Result<Config, GateError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No config file; using defaults");
            return Config::from_env();
        }
        let mut file = File::open(&self.path)?;
        file.lock_shared()?;
        let mut contents = String::new();
        let result = file.read_to_string(&mut contents);
        let _ = file.unlock();
        result?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn write_config(&self, config: &Config) -> Result<(), GateError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let payload = serde_json::to_vec_pretty(config)?;
        let result = (&file).write_all(&payload).and_then(|_| (&file).flush());
        let _ = file.unlock();
        result?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get(&self) -> Result<Config, GateError> {
        self.read_config().map_err(|e| {
            warn!("Failed to read config: {}", e);
            e
        })
    }

    async fn set(&self, config: &Config) -> Result<(), GateError> {
        self.write_config(config)
    }
}
