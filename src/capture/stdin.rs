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

//! Stdin-backed capture device.
//!
//! The reader task runs for the life of the process; start/stop only
//! flip the delivery gate shared with the pipeline, mirroring how a
//! keyboard hook stays installed while listening is toggled.

use crate::engine_core::errors::GateError;
use crate::engine_core::traits::InputCapture;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

pub struct StdinCapture {
    active: Arc<AtomicBool>,
}

impl StdinCapture {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The delivery gate handed to [`spawn_capture_reader`].
    ///
    /// [`spawn_capture_reader`]: crate::capture::pipeline::spawn_capture_reader
    pub fn gate(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }
}

impl Default for StdinCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputCapture for StdinCapture {
    async fn start(&self) -> Result<(), GateError> {
        debug!("Capture started");
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), GateError> {
        debug!("Capture stopped");
        self.active.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_and_stop_flip_the_gate() {
        let capture = StdinCapture::new();
        let gate = capture.gate();
        assert!(!gate.load(Ordering::SeqCst));
        capture.start().await.unwrap();
        assert!(gate.load(Ordering::SeqCst));
        capture.stop().await.unwrap();
        assert!(!gate.load(Ordering::SeqCst));
    }
}
