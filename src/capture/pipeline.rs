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

//! Capture pipeline: byte source → key events → session driver.

use crate::capture::codec::KeyCodec;
use crate::session::driver::SessionHandle;
use crate::session::machine::SessionEvent;
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tokio_util::codec::FramedRead;
use tracing::{info, warn};

/// Pump a raw byte reader into the session. Key events are forwarded
/// only while `active` is set, which is how the capture device honors
/// start/stop without tearing down the reader. A read error is reported
/// as a capture fault; EOF ends listening cleanly.
pub fn spawn_capture_reader<R>(
    reader: R,
    handle: SessionHandle,
    active: Arc<AtomicBool>,
) -> JoinHandle<()>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    tokio::spawn(async move {
        let mut frames = FramedRead::new(reader, KeyCodec);
        while let Some(item) = frames.next().await {
            match item {
                Ok(key) => {
                    if active.load(Ordering::SeqCst) {
                        handle.send_key(key).await;
                    }
                }
                Err(e) => {
                    warn!("Capture read failed: {}", e);
                    handle
                        .send_event(SessionEvent::CaptureFault {
                            message: e.user_message(),
                        })
                        .await;
                    return;
                }
            }
        }
        info!("Capture stream ended");
        handle.send_event(SessionEvent::StopListening).await;
    })
}
