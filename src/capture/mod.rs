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

//! Input capture.
//!
//! A scanner in keyboard-wedge mode is just a very fast typist, so the
//! capture layer reads a raw byte stream and decodes it into key events.
//! [`codec`] turns bytes into [`KeyEvent`]s, [`pipeline`] pumps a framed
//! reader into the session driver, and [`stdin`] is the byte source used
//! by the CLI.
//!
//! [`KeyEvent`]: crate::engine_core::models::KeyEvent

pub mod codec;
pub mod pipeline;
pub mod stdin;

pub use codec::KeyCodec;
pub use stdin::StdinCapture;
