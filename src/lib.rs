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

//! scangate: a policy gate for hardware scan input.
//!
//! This library provides the core logic for the scangate scan-intake
//! application: it reconstructs scan events from a raw character stream,
//! checks the scanned URL against a user-defined allow/block policy, and
//! opens trusted destinations after a cancellable redirect delay while
//! recording accepted scans to a bounded history log.

pub mod capture;
pub mod config;
pub mod engine;
pub mod engine_core;
pub mod history;
pub mod session;
pub mod utils;
