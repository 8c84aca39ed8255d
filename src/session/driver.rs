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

//! Async session driver.
//!
//! Owns the [`SessionMachine`] and the code buffer, pulls key events and
//! session events off two channels, and executes the effects each
//! transition returns. All transitions run on this single task, so the
//! machine never observes two events concurrently; the timers it arms are
//! spawned tasks that merely send an elapsed event back through the same
//! channel and are disarmed by generation mismatch, never by task abort.

use crate::config::Config;
use crate::engine::evaluator::PolicyEvaluator;
use crate::engine_core::buffer::CodeBuffer;
use crate::engine_core::constants::timing;
use crate::engine_core::models::{HistoryRecord, KeyEvent, Notification, RecordId};
use crate::engine_core::normalizer;
use crate::engine_core::traits::{
    ConfigStore, InputCapture, NotificationSink, StatusIndicator, UrlOpener,
};
use crate::history::HistoryStore;
use crate::session::machine::{Effect, SessionEvent, SessionMachine};
use crate::utils::time;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::NotificationMode;

const EVENT_CHANNEL_CAPACITY: usize = 64;
const KEY_CHANNEL_CAPACITY: usize = 256;

/// Cheap clonable handle for feeding the driver from the capture
/// pipeline and from user commands.
#[derive(Clone)]
pub struct SessionHandle {
    events: mpsc::Sender<SessionEvent>,
    keys: mpsc::Sender<KeyEvent>,
}

impl SessionHandle {
    pub async fn send_event(&self, event: SessionEvent) {
        if self.events.send(event).await.is_err() {
            warn!("Session driver is gone; event dropped");
        }
    }

    pub async fn send_key(&self, key: KeyEvent) {
        if self.keys.send(key).await.is_err() {
            warn!("Session driver is gone; key dropped");
        }
    }
}

/// Everything the driver needs injected at session start.
pub struct Collaborators {
    pub capture: Arc<dyn InputCapture>,
    pub opener: Arc<dyn UrlOpener>,
    pub notifier: Arc<dyn NotificationSink>,
    pub status: Arc<dyn StatusIndicator>,
    pub config_store: Arc<dyn ConfigStore>,
    pub history: Arc<dyn HistoryStore>,
}

pub struct SessionDriver {
    machine: SessionMachine,
    buffer: CodeBuffer,
    config: Config,
    collaborators: Collaborators,
    events_tx: mpsc::Sender<SessionEvent>,
    events_rx: mpsc::Receiver<SessionEvent>,
    keys_rx: mpsc::Receiver<KeyEvent>,
}

impl SessionDriver {
    pub fn new(collaborators: Collaborators, config: Config) -> (Self, SessionHandle) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (keys_tx, keys_rx) = mpsc::channel(KEY_CHANNEL_CAPACITY);
        let handle = SessionHandle {
            events: events_tx.clone(),
            keys: keys_tx,
        };
        let buffer = CodeBuffer::new(config.suffix.terminator());
        let driver = Self {
            machine: SessionMachine::new(),
            buffer,
            config,
            collaborators,
            events_tx,
            events_rx,
            keys_rx,
        };
        (driver, handle)
    }

    /// Run until both input channels close.
    pub async fn run(mut self) {
        info!("Session driver started");
        loop {
            tokio::select! {
                Some(event) = self.events_rx.recv() => {
                    self.apply(event).await;
                }
                Some(key) = self.keys_rx.recv() => {
                    self.on_key(key).await;
                }
                else => break,
            }
        }
        info!("Session driver stopped");
    }

    /// Key events only matter while listening; everything else is
    /// dropped so a scan can never queue up behind an in-flight one.
    async fn on_key(&mut self, key: KeyEvent) {
        use crate::engine_core::models::SessionState;
        if !matches!(self.machine.state(), SessionState::Listening) {
            return;
        }
        if let Some(scan) = self.buffer.push(key) {
            // Each scan evaluates against the freshest configuration;
            // the snapshot rides along so later config edits cannot
            // re-shape this scan mid-flight.
            self.refresh_config().await;
            let mode = self.config.scan_mode;
            self.apply(SessionEvent::Scan { scan, mode }).await;
        }
    }

    /// Apply one external event plus any follow-up events its effects
    /// enqueue, serialized on this task.
    pub async fn apply(&mut self, event: SessionEvent) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let effects = self.machine.handle(event);
            for effect in effects {
                self.perform(effect, &mut queue).await;
            }
            self.collaborators
                .status
                .set_state(self.machine.state().label())
                .await;
        }
    }

    async fn perform(&mut self, effect: Effect, queue: &mut VecDeque<SessionEvent>) {
        match effect {
            Effect::Evaluate { raw } => {
                let code = normalizer::normalize(&raw, &self.config.prefix, &self.config.suffix);
                let decision = PolicyEvaluator::evaluate(&code, &self.config);
                debug!(code = %code, ?decision, "Evaluated scan");
                queue.push_back(SessionEvent::Decision {
                    url: code.into_inner(),
                    decision,
                });
            }
            Effect::AppendHistory { url } => {
                let record = HistoryRecord {
                    id: RecordId::generate(),
                    url,
                    timestamp: time::timestamp(),
                };
                if let Err(e) = self.collaborators.history.append(record).await {
                    // The scan is still accepted; only the durable
                    // record failed.
                    warn!("History append failed: {}", e);
                    self.notify(
                        Notification::error("History unavailable")
                            .with_description(e.user_message()),
                    )
                    .await;
                }
            }
            Effect::ArmRedirectTimer { url, generation } => {
                debug!(%url, generation, "Arming redirect timer");
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(timing::REDIRECT_DELAY_SECS)).await;
                    let _ = tx.send(SessionEvent::RedirectElapsed { generation }).await;
                });
            }
            Effect::ArmFeedbackTimer { generation } => {
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(timing::FEEDBACK_CLEAR_SECS)).await;
                    let _ = tx.send(SessionEvent::FeedbackElapsed { generation }).await;
                });
            }
            Effect::OpenUrl { url } => {
                info!(%url, "Opening URL");
                if let Err(e) = self.collaborators.opener.open(&url).await {
                    warn!("URL open failed: {}", e);
                    self.notify(
                        Notification::error("Could not open URL").with_description(e.user_message()),
                    )
                    .await;
                }
            }
            Effect::Notify(notification) => {
                self.notify(notification).await;
            }
            Effect::DismissNotification => {
                self.collaborators.notifier.dismiss().await;
            }
            Effect::StartCapture => {
                self.refresh_config().await;
                self.buffer = CodeBuffer::new(self.config.suffix.terminator());
                if let Err(e) = self.collaborators.capture.start().await {
                    queue.push_back(SessionEvent::CaptureFault {
                        message: e.user_message(),
                    });
                }
            }
            Effect::StopCapture => {
                self.buffer.reset();
                if let Err(e) = self.collaborators.capture.stop().await {
                    warn!("Capture stop failed: {}", e);
                }
            }
            Effect::Recover => {
                queue.push_back(SessionEvent::Recovered);
            }
        }
    }

    async fn notify(&self, notification: Notification) {
        match self.config.notification_mode {
            NotificationMode::Toast => self.collaborators.notifier.notify(notification).await,
            NotificationMode::StatusOnly => {
                // Status string is the only user-visible surface.
                debug!(title = %notification.title, "Notification suppressed");
            }
        }
    }

    async fn refresh_config(&mut self) {
        match self.collaborators.config_store.get().await {
            Ok(config) => self.config = config,
            Err(e) => warn!("Config reload failed, keeping previous: {}", e),
        }
    }
}
