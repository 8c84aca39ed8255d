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

//! Collaborator trait contracts.
//!
//! The core drives these interfaces; their implementations (OS keyboard
//! capture, desktop notifications, tray chrome, browser launching) live
//! outside the core and are injected at session start.

use crate::config::Config;
use crate::engine_core::errors::GateError;
use crate::engine_core::models::{Notification, StatusLabel};
use async_trait::async_trait;

/// Input capture device. Emits key events only while told to run and may
/// report a capture fault at any time.
#[async_trait]
pub trait InputCapture: Send + Sync {
    async fn start(&self) -> Result<(), GateError>;
    async fn stop(&self) -> Result<(), GateError>;
}

/// Opens an absolute URL in the user's default handler. Failure is
/// notified, never fatal.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), GateError>;
}

/// User-facing notification surface. Suppressed entirely when the
/// notification mode is status-only.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: Notification);
    /// Dismiss the currently shown notification, if any.
    async fn dismiss(&self);
}

/// Tray/status indicator. Receives a coarse session-state label on every
/// transition; purely informational.
#[async_trait]
pub trait StatusIndicator: Send + Sync {
    async fn set_state(&self, label: StatusLabel);
}

/// The sole source of policy lists and formatting rules. The core never
/// caches the result beyond one evaluation cycle.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self) -> Result<Config, GateError>;
    async fn set(&self, config: &Config) -> Result<(), GateError>;
}
