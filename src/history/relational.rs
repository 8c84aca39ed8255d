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

//! Relational history backend.
//!
//! An append-only SQLite table. The `seq` column is a monotonic
//! insertion counter: eviction and the descending read both order by it,
//! never by the human-readable timestamp string.

use crate::engine_core::errors::GateError;
use crate::engine_core::models::{HistoryRecord, RecordId};
use crate::history::HistoryStore;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::str::FromStr;
use tokio::sync::Mutex;
use tracing::debug;

const DDL: &str = "CREATE TABLE IF NOT EXISTS scan_history (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL,
    url TEXT NOT NULL,
    timestamp TEXT NOT NULL
)";

pub struct RelationalStore {
    conn: Mutex<Connection>,
    max_items: u32,
}

impl RelationalStore {
    pub fn open(path: PathBuf, max_items: u32) -> Result<Self, GateError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        conn.execute(DDL, [])?;
        debug!(path = %path.display(), "Opened relational history store");
        Ok(Self {
            conn: Mutex::new(conn),
            max_items,
        })
    }

    /// In-memory store for tests.
    pub fn open_in_memory(max_items: u32) -> Result<Self, GateError> {
        let conn = Connection::open_in_memory()?;
        conn.execute(DDL, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
            max_items,
        })
    }
}

#[async_trait]
impl HistoryStore for RelationalStore {
    async fn append(&self, record: HistoryRecord) -> Result<(), GateError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO scan_history (id, url, timestamp) VALUES (?1, ?2, ?3)",
            params![record.id.to_string(), record.url, record.timestamp],
        )?;
        // Evict by insertion order: keep the highest-seq rows.
        conn.execute(
            "DELETE FROM scan_history WHERE seq NOT IN (
                SELECT seq FROM scan_history ORDER BY seq DESC LIMIT ?1
            )",
            params![self.max_items],
        )?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<HistoryRecord>, GateError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, url, timestamp FROM scan_history ORDER BY seq DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![self.max_items], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, url, timestamp) = row?;
            let id = RecordId::from_str(&id)
                .map_err(|e| GateError::StorageError(format!("corrupt record id: {}", e)))?;
            records.push(HistoryRecord { id, url, timestamp });
        }
        Ok(records)
    }

    async fn clear(&self) -> Result<(), GateError> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM scan_history", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, ts: &str) -> HistoryRecord {
        HistoryRecord {
            id: RecordId::generate(),
            url: url.to_string(),
            timestamp: ts.to_string(),
        }
    }

    #[tokio::test]
    async fn append_and_list() {
        let store = RelationalStore::open_in_memory(100).unwrap();

        store
            .append(record("https://example.com", "2024-01-01 00:00:00"))
            .await
            .unwrap();

        let history = store.list().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].url, "https://example.com");
    }

    #[tokio::test]
    async fn cap_enforced() {
        let store = RelationalStore::open_in_memory(5).unwrap();

        for i in 0..10 {
            store
                .append(record(
                    &format!("https://example{}.com", i),
                    &format!("2024-01-01 00:00:{:02}", i),
                ))
                .await
                .unwrap();
        }

        let history = store.list().await.unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].url, "https://example9.com");
        assert_eq!(history[4].url, "https://example5.com");
    }

    #[tokio::test]
    async fn eviction_ignores_timestamp_strings() {
        let store = RelationalStore::open_in_memory(2).unwrap();

        store
            .append(record("https://first.com", "2099-12-31 23:59:59"))
            .await
            .unwrap();
        store
            .append(record("https://second.com", "2024-01-01 00:00:00"))
            .await
            .unwrap();
        store
            .append(record("https://third.com", "2000-01-01 00:00:00"))
            .await
            .unwrap();

        let history = store.list().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].url, "https://third.com");
        assert_eq!(history[1].url, "https://second.com");
    }

    #[tokio::test]
    async fn clear_empties_the_table() {
        let store = RelationalStore::open_in_memory(100).unwrap();

        store
            .append(record("https://example.com", "2024-01-01 00:00:00"))
            .await
            .unwrap();
        store.clear().await.unwrap();

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        {
            let store = RelationalStore::open(path.clone(), 100).unwrap();
            store
                .append(record("https://example.com", "2024-01-01 00:00:00"))
                .await
                .unwrap();
        }

        let store = RelationalStore::open(path, 100).unwrap();
        let history = store.list().await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn empty_table_lists_empty() {
        let store = RelationalStore::open_in_memory(100).unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_appends_and_clear_keep_the_cap() {
        let store = std::sync::Arc::new(RelationalStore::open_in_memory(5).unwrap());

        let mut writers = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            writers.push(tokio::spawn(async move {
                store
                    .append(record(
                        &format!("https://example{}.com", i),
                        "2024-01-01 00:00:00",
                    ))
                    .await
                    .unwrap();
            }));
        }
        let clearer = {
            let store = store.clone();
            tokio::spawn(async move { store.clear().await.unwrap() })
        };
        for writer in writers {
            writer.await.unwrap();
        }
        clearer.await.unwrap();

        // Whatever the interleaving, the cap holds; anything retained
        // was appended after the clear took its turn on the lock.
        let history = store.list().await.unwrap();
        assert!(history.len() <= 5);

        store.clear().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
