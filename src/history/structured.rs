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

//! Structured history backend.
//!
//! A single bounded JSON file. The full collection lives in memory in
//! insertion order and is rewritten on every mutation under an advisory
//! file lock; at the sizes `max_history_items` allows this is cheaper
//! than being clever.

use crate::engine_core::errors::GateError;
use crate::engine_core::models::HistoryRecord;
use crate::history::HistoryStore;
use async_trait::async_trait;
use fs2::FileExt;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::debug;

pub struct StructuredStore {
    path: PathBuf,
    max_items: u32,
    records: Mutex<VecDeque<HistoryRecord>>,
}

impl StructuredStore {
    /// Load the existing collection (if any) and enforce the cap on
    /// whatever was on disk.
    pub fn open(path: PathBuf, max_items: u32) -> Result<Self, GateError> {
        let mut records = Self::load(&path)?;
        while records.len() > max_items as usize {
            records.pop_front();
        }
        debug!(
            path = %path.display(),
            count = records.len(),
            "Opened structured history store"
        );
        Ok(Self {
            path,
            max_items,
            records: Mutex::new(records),
        })
    }

    fn load(path: &PathBuf) -> Result<VecDeque<HistoryRecord>, GateError> {
        if !path.exists() {
            return Ok(VecDeque::new());
        }
        let mut file = File::open(path)?;
        file.lock_shared()?;
        let mut contents = String::new();
        let result = file.read_to_string(&mut contents);
        let _ = file.unlock();
        result?;
        if contents.trim().is_empty() {
            return Ok(VecDeque::new());
        }
        let records: Vec<HistoryRecord> = serde_json::from_str(&contents)?;
        Ok(records.into())
    }

    fn persist(&self, records: &VecDeque<HistoryRecord>) -> Result<(), GateError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let snapshot: Vec<&HistoryRecord> = records.iter().collect();
        let payload = serde_json::to_vec_pretty(&snapshot)?;
        let result = (&file).write_all(&payload).and_then(|_| (&file).flush());
        let _ = file.unlock();
        result?;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for StructuredStore {
    async fn append(&self, record: HistoryRecord) -> Result<(), GateError> {
        let mut records = self.records.lock().await;
        records.push_back(record);
        // FIFO eviction by insertion order, never by timestamp comparison
        while records.len() > self.max_items as usize {
            records.pop_front();
        }
        self.persist(&records)
    }

    async fn list(&self) -> Result<Vec<HistoryRecord>, GateError> {
        let records = self.records.lock().await;
        Ok(records.iter().rev().cloned().collect())
    }

    async fn clear(&self) -> Result<(), GateError> {
        let mut records = self.records.lock().await;
        records.clear();
        self.persist(&records)
    }
}
