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

//! Bounded history of accepted scans.
//!
//! Two interchangeable persistence strategies sit behind one contract:
//! a structured, file-resident JSON collection and a relational SQLite
//! table. Both honor `max_history_items` as a hard cap with oldest-first
//! eviction by insertion order. Backend selection is a configuration-time
//! decision made once at session start; records are never migrated
//! between backends. Each store serializes its mutations through a single
//! async mutex, which makes `clear` a serialization point: appends that
//! start after a clear begins observe the cleared state.

pub mod relational;
pub mod structured;

use crate::config::HistoryBackend;
use crate::engine_core::constants::history as history_constants;
use crate::engine_core::errors::GateError;
use crate::engine_core::models::HistoryRecord;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append one accepted scan, evicting the oldest record(s) first if
    /// the store would exceed its cap.
    async fn append(&self, record: HistoryRecord) -> Result<(), GateError>;

    /// All retained records, most recent first.
    async fn list(&self) -> Result<Vec<HistoryRecord>, GateError>;

    /// Destroy all records.
    async fn clear(&self) -> Result<(), GateError>;
}

/// Open the backend selected by configuration. Called once at session
/// start.
pub fn open_store(
    backend: HistoryBackend,
    data_dir: &Path,
    max_items: u32,
) -> Result<Arc<dyn HistoryStore>, GateError> {
    match backend {
        HistoryBackend::Structured => {
            let path = data_dir.join(history_constants::STRUCTURED_FILE);
            Ok(Arc::new(structured::StructuredStore::open(path, max_items)?))
        }
        HistoryBackend::Relational => {
            let path = data_dir.join(history_constants::RELATIONAL_FILE);
            Ok(Arc::new(relational::RelationalStore::open(path, max_items)?))
        }
    }
}
