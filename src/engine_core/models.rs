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

//! Domain models for the scangate core.
//!
//! This module contains pure data structures representing scan events,
//! policy decisions, history records, and session state. It is designed
//! to be free of I/O side effects.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Newtype wrapper around Uuid for type-safe history record identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a new random RecordId
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(RecordId)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0.to_string()
    }
}

impl TryFrom<String> for RecordId {
    type Error = uuid::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Uuid::parse_str(&s).map(RecordId)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One completed raw payload captured from the input stream.
/// Emitted by the code buffer on terminator detection, consumed once by
/// the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanEvent {
    pub payload: String,
    /// Capture timestamp, epoch seconds
    pub captured_at: f64,
}

/// A scan payload after prefix/suffix stripping. Not necessarily a valid
/// URL; validity is the policy engine's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCode(String);

impl NormalizedCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NormalizedCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a host was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// Host appears in the blocklist (takes precedence over the allowlist)
    Blocklisted,
    /// Allowlist is non-empty and the host is not on it
    NotAllowlisted,
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockReason::Blocklisted => write!(f, "blocklisted"),
            BlockReason::NotAllowlisted => write!(f, "not allowlisted"),
        }
    }
}

/// Policy evaluation decision result. Produced once per normalized code,
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PolicyDecision {
    /// Destination host is trusted
    Allowed { host: String },
    /// Destination host is rejected with a reason
    Blocked { host: String, reason: BlockReason },
    /// Input did not parse as an http(s) URL. A normal return value,
    /// not a fault.
    Malformed { raw: String },
}

/// A durable entry representing one accepted scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: RecordId,
    pub url: String,
    pub timestamp: String,
}

/// A single character-arrival event from the input capture collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Printable(char),
    Control(ControlKey),
}

/// Control keys the code buffer cares about. Everything else (modifiers,
/// escape, arrows) arrives as `Other` and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Enter,
    Tab,
    Other,
}

/// The single mutable state of a running session. Exactly one instance
/// exists per session; it is owned exclusively by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Listening,
    Processing { raw: String },
    PendingRedirect { url: String },
    Generating { feedback: Option<String> },
    Error { message: String },
}

impl SessionState {
    /// Coarse label reported to the tray/status indicator on every
    /// transition.
    pub fn label(&self) -> StatusLabel {
        match self {
            SessionState::Idle | SessionState::Error { .. } => StatusLabel::Idle,
            SessionState::Listening
            | SessionState::Processing { .. }
            | SessionState::PendingRedirect { .. } => StatusLabel::Listening,
            SessionState::Generating { .. } => StatusLabel::Generating,
        }
    }

    /// Human-readable status string, the only user-visible surface when
    /// notifications are suppressed.
    pub fn status_line(&self) -> String {
        match self {
            SessionState::Idle => "Ready".to_string(),
            SessionState::Listening => "Listening for a code...".to_string(),
            SessionState::Processing { .. } => "Checking scanned code...".to_string(),
            SessionState::PendingRedirect { url } => format!("Opening {} shortly", url),
            SessionState::Generating { feedback: Some(msg) } => msg.clone(),
            SessionState::Generating { feedback: None } => "Generator".to_string(),
            SessionState::Error { message } => format!("Error: {}", message),
        }
    }
}

/// Coarse session-state label for the tray indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel {
    Idle,
    Listening,
    Generating,
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusLabel::Idle => write!(f, "idle"),
            StatusLabel::Listening => write!(f, "listening"),
            StatusLabel::Generating => write!(f, "generating"),
        }
    }
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// An affordance attached to a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    /// Lets the user stop the pending redirect before the delay elapses
    CancelRedirect,
}

/// A user-facing notification handed to the notification sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: Option<String>,
    pub action: Option<NotificationAction>,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
            action: None,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.action = Some(action);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_roundtrip() {
        let id = RecordId::generate();
        let s: String = id.into();
        let back = RecordId::from_str(&s).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn record_id_rejects_garbage() {
        assert!(RecordId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn state_labels() {
        assert_eq!(SessionState::Idle.label(), StatusLabel::Idle);
        assert_eq!(SessionState::Listening.label(), StatusLabel::Listening);
        assert_eq!(
            SessionState::Processing {
                raw: "x".to_string()
            }
            .label(),
            StatusLabel::Listening
        );
        assert_eq!(
            SessionState::Generating { feedback: None }.label(),
            StatusLabel::Generating
        );
        assert_eq!(
            SessionState::Error {
                message: "m".to_string()
            }
            .label(),
            StatusLabel::Idle
        );
    }

    #[test]
    fn block_reason_display() {
        assert_eq!(BlockReason::Blocklisted.to_string(), "blocklisted");
        assert_eq!(BlockReason::NotAllowlisted.to_string(), "not allowlisted");
    }
}
