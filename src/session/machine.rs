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

//! Pure session state machine.
//!
//! `handle` is the single transition function: it mutates the state and
//! returns the side effects the driver must perform, as data. No I/O
//! happens here, which is what makes every transition testable with a
//! plain equality assert.
//!
//! Timers are modelled with generation counters. Arming a timer bumps the
//! counter and hands the new value to the driver; the elapsed event
//! carries it back, and a stale generation is ignored. A cancel therefore
//! only has to bump the counter to make any in-flight timer a no-op, even
//! if its sleep has already completed and its event is queued behind this
//! one.

use crate::config::ScanMode;
use crate::engine_core::models::{
    Notification, NotificationAction, PolicyDecision, ScanEvent, SessionState,
};
use tracing::{debug, warn};

/// External stimulus applied to the machine. Produced by the capture
/// pipeline, the driver's timers, and user commands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StartListening,
    StopListening,
    /// A completed scan, with the scan-mode snapshot the scan started
    /// under. Configuration changes never re-shape an in-flight scan.
    Scan { scan: ScanEvent, mode: ScanMode },
    /// The policy verdict for the payload currently in `Processing`.
    Decision {
        url: String,
        decision: PolicyDecision,
    },
    /// The redirect delay elapsed for the timer armed with `generation`.
    RedirectElapsed { generation: u64 },
    /// User stopped the pending redirect.
    CancelRedirect,
    /// The feedback-clear delay elapsed for `generation`.
    FeedbackElapsed { generation: u64 },
    OpenGenerator,
    CloseGenerator,
    /// Transient status text from the generator surface.
    GeneratorFeedback { message: String },
    /// The input-capture collaborator reported a fault.
    CaptureFault { message: String },
    /// An `Error` state has been surfaced; resume normal operation.
    Recovered,
}

/// A side effect the driver must perform after a transition. Ordering
/// within one returned batch is significant.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run the policy engine over `raw` and feed the verdict back as a
    /// `Decision` event.
    Evaluate { raw: String },
    AppendHistory { url: String },
    ArmRedirectTimer { url: String, generation: u64 },
    ArmFeedbackTimer { generation: u64 },
    OpenUrl { url: String },
    Notify(Notification),
    DismissNotification,
    StartCapture,
    StopCapture,
    /// Schedule a `Recovered` event so `Error` auto-resolves to `Idle`.
    Recover,
}

/// The session machine. Owns the only `SessionState` in the process.
pub struct SessionMachine {
    state: SessionState,
    /// Scan mode captured when the in-flight scan began.
    active_mode: ScanMode,
    redirect_generation: u64,
    feedback_generation: u64,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            active_mode: ScanMode::Single,
            redirect_generation: 0,
            feedback_generation: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply one event. The returned effects must be executed before the
    /// next event is applied; the driver's single event loop guarantees
    /// that.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        let effects = match event {
            SessionEvent::StartListening => self.on_start_listening(),
            SessionEvent::StopListening => self.on_stop_listening(),
            SessionEvent::Scan { scan, mode } => self.on_scan(scan, mode),
            SessionEvent::Decision { url, decision } => self.on_decision(url, decision),
            SessionEvent::RedirectElapsed { generation } => self.on_redirect_elapsed(generation),
            SessionEvent::CancelRedirect => self.on_cancel_redirect(),
            SessionEvent::FeedbackElapsed { generation } => self.on_feedback_elapsed(generation),
            SessionEvent::OpenGenerator => self.on_open_generator(),
            SessionEvent::CloseGenerator => self.on_close_generator(),
            SessionEvent::GeneratorFeedback { message } => self.on_generator_feedback(message),
            SessionEvent::CaptureFault { message } => self.on_capture_fault(message),
            SessionEvent::Recovered => self.on_recovered(),
        };
        debug!(state = %self.state.status_line(), "Transition complete");
        effects
    }

    fn on_start_listening(&mut self) -> Vec<Effect> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Listening;
                vec![Effect::StartCapture]
            }
            _ => vec![],
        }
    }

    fn on_stop_listening(&mut self) -> Vec<Effect> {
        match self.state {
            SessionState::Listening => {
                self.state = SessionState::Idle;
                vec![Effect::StopCapture]
            }
            _ => vec![],
        }
    }

    fn on_scan(&mut self, scan: ScanEvent, mode: ScanMode) -> Vec<Effect> {
        match self.state {
            SessionState::Listening => {
                self.active_mode = mode;
                self.state = SessionState::Processing {
                    raw: scan.payload.clone(),
                };
                vec![Effect::Evaluate { raw: scan.payload }]
            }
            // Capture is paused outside Listening; a scan that slips
            // through anyway is dropped, not queued.
            _ => {
                warn!("Dropping scan received outside Listening");
                vec![]
            }
        }
    }

    fn on_decision(&mut self, url: String, decision: PolicyDecision) -> Vec<Effect> {
        if !matches!(self.state, SessionState::Processing { .. }) {
            return vec![];
        }
        match decision {
            PolicyDecision::Allowed { host } => {
                self.redirect_generation += 1;
                self.state = SessionState::PendingRedirect { url: url.clone() };
                vec![
                    Effect::AppendHistory { url: url.clone() },
                    Effect::ArmRedirectTimer {
                        url,
                        generation: self.redirect_generation,
                    },
                    Effect::Notify(
                        Notification::success("Scan accepted")
                            .with_description(format!("Opening {} shortly", host))
                            .with_action(NotificationAction::CancelRedirect),
                    ),
                ]
            }
            PolicyDecision::Blocked { host, reason } => {
                let mut effects = vec![Effect::Notify(
                    Notification::error("Scan blocked")
                        .with_description(format!("{} is {}", host, reason)),
                )];
                effects.extend(self.resolve_after_scan());
                effects
            }
            PolicyDecision::Malformed { raw } => {
                let mut effects = vec![Effect::Notify(
                    Notification::error("Invalid code")
                        .with_description(format!("Not an http(s) URL: {}", raw)),
                )];
                effects.extend(self.resolve_after_scan());
                effects
            }
        }
    }

    fn on_redirect_elapsed(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.redirect_generation {
            debug!(generation, "Ignoring stale redirect timer");
            return vec![];
        }
        let url = match &self.state {
            SessionState::PendingRedirect { url } => url.clone(),
            _ => return vec![],
        };
        let mut effects = vec![Effect::OpenUrl { url }, Effect::DismissNotification];
        effects.extend(self.resolve_after_scan());
        effects
    }

    fn on_cancel_redirect(&mut self) -> Vec<Effect> {
        if !matches!(self.state, SessionState::PendingRedirect { .. }) {
            return vec![];
        }
        // Disarm: any in-flight timer now carries a stale generation.
        self.redirect_generation += 1;
        let mut effects = vec![
            Effect::DismissNotification,
            Effect::Notify(Notification::info("Redirect stopped")),
        ];
        effects.extend(self.resolve_after_scan());
        effects
    }

    /// Post-scan resolution shared by block, cancel, and redirect
    /// completion: Continuous keeps listening, Single ends the session's
    /// capture.
    fn resolve_after_scan(&mut self) -> Vec<Effect> {
        match self.active_mode {
            ScanMode::Continuous => {
                self.state = SessionState::Listening;
                vec![]
            }
            ScanMode::Single => {
                self.state = SessionState::Idle;
                vec![Effect::StopCapture]
            }
        }
    }

    fn on_feedback_elapsed(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.feedback_generation {
            return vec![];
        }
        if matches!(self.state, SessionState::Generating { feedback: Some(_) }) {
            self.state = SessionState::Generating { feedback: None };
        }
        vec![]
    }

    fn on_open_generator(&mut self) -> Vec<Effect> {
        if matches!(self.state, SessionState::Generating { .. }) {
            return vec![];
        }
        let mut effects = Vec::new();
        match &self.state {
            SessionState::Listening | SessionState::Processing { .. } => {
                effects.push(Effect::StopCapture);
            }
            SessionState::PendingRedirect { .. } => {
                // Leaving the redirect window disarms its timer.
                self.redirect_generation += 1;
                effects.push(Effect::StopCapture);
                effects.push(Effect::DismissNotification);
            }
            _ => {}
        }
        self.state = SessionState::Generating { feedback: None };
        effects
    }

    fn on_close_generator(&mut self) -> Vec<Effect> {
        if matches!(self.state, SessionState::Generating { .. }) {
            // Any state change invalidates a pending feedback clear.
            self.feedback_generation += 1;
            // Listening is never auto-resumed when leaving the generator.
            self.state = SessionState::Idle;
        }
        vec![]
    }

    fn on_generator_feedback(&mut self, message: String) -> Vec<Effect> {
        if !matches!(self.state, SessionState::Generating { .. }) {
            return vec![];
        }
        self.feedback_generation += 1;
        self.state = SessionState::Generating {
            feedback: Some(message),
        };
        vec![Effect::ArmFeedbackTimer {
            generation: self.feedback_generation,
        }]
    }

    fn on_capture_fault(&mut self, message: String) -> Vec<Effect> {
        warn!(%message, "Capture fault");
        self.redirect_generation += 1;
        self.feedback_generation += 1;
        self.state = SessionState::Error {
            message: message.clone(),
        };
        vec![
            Effect::StopCapture,
            Effect::Notify(Notification::error("Input capture failed").with_description(message)),
            Effect::Recover,
        ]
    }

    fn on_recovered(&mut self) -> Vec<Effect> {
        if matches!(self.state, SessionState::Error { .. }) {
            self.state = SessionState::Idle;
        }
        vec![]
    }
}
