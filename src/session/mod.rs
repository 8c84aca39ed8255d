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

//! Session lifecycle orchestration.
//!
//! Split in two: [`machine`] holds the pure transition function (one
//! `(state, event)` step returns the next state's effects as data) and
//! [`driver`] is the async loop that owns the machine, executes effects
//! against the collaborator traits, and runs the cancellable timers.

pub mod driver;
pub mod machine;

pub use driver::SessionDriver;
pub use machine::{Effect, SessionEvent, SessionMachine};
