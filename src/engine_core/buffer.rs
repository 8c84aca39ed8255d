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

//! Code buffer.
//!
//! Accumulates raw character events into a completed scan payload. A
//! hardware scanner "types" fast and ends each code with a fixed
//! terminator key; the buffer makes no assumption about code length or
//! character set. The session driver only feeds the buffer while the
//! session is listening, so events arriving in any other state are
//! dropped upstream of this type.

use crate::engine_core::models::{ControlKey, KeyEvent, ScanEvent};
use crate::utils::time;

#[derive(Debug)]
pub struct CodeBuffer {
    buf: String,
    terminator: ControlKey,
}

impl CodeBuffer {
    pub fn new(terminator: ControlKey) -> Self {
        Self {
            buf: String::new(),
            terminator,
        }
    }

    /// Feed one character-arrival event. Returns a completed `ScanEvent`
    /// when the terminator arrives with a non-empty accumulation; a bare
    /// terminator is suppressed. Non-terminator control events (modifier
    /// keys and the like) neither reset nor extend the buffer.
    pub fn push(&mut self, event: KeyEvent) -> Option<ScanEvent> {
        match event {
            KeyEvent::Printable(c) => {
                self.buf.push(c);
                None
            }
            KeyEvent::Control(key) if key == self.terminator => {
                if self.buf.is_empty() {
                    return None;
                }
                let payload = std::mem::take(&mut self.buf);
                Some(ScanEvent {
                    payload,
                    captured_at: time::now(),
                })
            }
            KeyEvent::Control(_) => None,
        }
    }

    /// Discard any partial accumulation, e.g. when listening stops
    /// mid-code.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
