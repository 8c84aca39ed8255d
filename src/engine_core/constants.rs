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

//! scangate constants - single source of truth for all configuration values.
//!
//! This module centralizes magic numbers, file names, and environment
//! variable names to ensure consistency and maintainability.

/// Timer delays
pub mod timing {
    /// Delay between an accepted scan and opening its URL. The user may
    /// cancel the redirect during this window.
    pub const REDIRECT_DELAY_SECS: u64 = 3;
    /// Delay after which a transient generator feedback message clears
    /// itself if the session is still in the generating state.
    pub const FEEDBACK_CLEAR_SECS: u64 = 4;
}

/// Scanner payload conventions
pub mod scanner {
    /// Well-known preambles hardware scanners prepend to a code.
    /// The normalizer strips the longest one that matches.
    pub const DEFAULT_PREFIXES: &[&str] = &["QRCODE:", "SCAN:", "QR:"];
}

/// Policy evaluation constants
pub mod policy {
    /// URL schemes the gate will ever open. Anything else is malformed
    /// input as far as the policy engine is concerned.
    pub const ALLOWED_SCHEMES: &[&str] = &["http", "https"];
}

/// History store defaults
pub mod history {
    /// Default hard cap on retained history records.
    pub const DEFAULT_MAX_ITEMS: u32 = 100;
    /// File name of the structured (JSON) backend inside the data dir.
    pub const STRUCTURED_FILE: &str = "history.json";
    /// File name of the relational (SQLite) backend inside the data dir.
    pub const RELATIONAL_FILE: &str = "history.db";
}

/// Configuration environment variables and file names
pub mod config {
    pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
    pub const ENV_DATA_DIR: &str = "SCANGATE_DATA_DIR";
    pub const ENV_CONFIG_PATH: &str = "SCANGATE_CONFIG_PATH";
    /// File name of the persisted configuration inside the data dir.
    pub const CONFIG_FILE: &str = "config.json";
}
