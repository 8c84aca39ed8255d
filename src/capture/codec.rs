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

//! Byte-stream to key-event decoder.
//!
//! One decoded item per key press. CR, LF, and CRLF all decode to a
//! single Enter; Tab decodes to Tab; any other control byte decodes to
//! `Other` and is ignored downstream. Printable input is decoded as
//! UTF-8, with incomplete trailing sequences held back until more bytes
//! arrive.

use crate::engine_core::errors::GateError;
use crate::engine_core::models::{ControlKey, KeyEvent};
use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;

#[derive(Debug, Default)]
pub struct KeyCodec;

const MAX_UTF8_LEN: usize = 4;

impl Decoder for KeyCodec {
    type Item = KeyEvent;
    type Error = GateError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<KeyEvent>, GateError> {
        if src.is_empty() {
            return Ok(None);
        }
        match src[0] {
            b'\r' => {
                // A CR at the end of the buffer may be the first half of
                // a CRLF; wait for the next read to decide.
                if src.len() == 1 {
                    return Ok(None);
                }
                let consumed = if src[1] == b'\n' { 2 } else { 1 };
                src.advance(consumed);
                Ok(Some(KeyEvent::Control(ControlKey::Enter)))
            }
            b'\n' => {
                src.advance(1);
                Ok(Some(KeyEvent::Control(ControlKey::Enter)))
            }
            b'\t' => {
                src.advance(1);
                Ok(Some(KeyEvent::Control(ControlKey::Tab)))
            }
            0x00..=0x1f | 0x7f => {
                src.advance(1);
                Ok(Some(KeyEvent::Control(ControlKey::Other)))
            }
            _ => decode_char(src),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<KeyEvent>, GateError> {
        // No more bytes will ever follow, so a held-back lone CR is a
        // complete Enter.
        if src.first() == Some(&b'\r') {
            src.advance(1);
            return Ok(Some(KeyEvent::Control(ControlKey::Enter)));
        }
        self.decode(src)
    }
}

fn decode_char(src: &mut BytesMut) -> Result<Option<KeyEvent>, GateError> {
    let window = &src[..src.len().min(MAX_UTF8_LEN)];
    match std::str::from_utf8(window) {
        Ok(s) => emit_first_char(src, s.chars().next()),
        Err(e) if e.valid_up_to() > 0 => {
            let c = std::str::from_utf8(&window[..e.valid_up_to()])
                .ok()
                .and_then(|s| s.chars().next());
            emit_first_char(src, c)
        }
        Err(e) if e.error_len().is_none() && src.len() < MAX_UTF8_LEN => {
            // Incomplete multibyte sequence; wait for more input.
            Ok(None)
        }
        Err(_) => {
            // Not valid UTF-8; swallow one byte as an ignorable key.
            src.advance(1);
            Ok(Some(KeyEvent::Control(ControlKey::Other)))
        }
    }
}

fn emit_first_char(src: &mut BytesMut, c: Option<char>) -> Result<Option<KeyEvent>, GateError> {
    match c {
        Some(c) => {
            src.advance(c.len_utf8());
            Ok(Some(KeyEvent::Printable(c)))
        }
        None => Ok(None),
    }
}
