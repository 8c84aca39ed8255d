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

// Domain error types. None of these terminate the session; every failure
// path maps to a defined next session state.

use thiserror::Error;

/// Main error type for the gate
#[derive(Error, Debug)]
pub enum GateError {
    /// Configuration could not be loaded, parsed, or validated
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Invalid value supplied for a configuration field
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// History persistence failure (append, list, clear)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// The external input-capture collaborator reported a fault
    #[error("Capture error: {0}")]
    CaptureError(String),

    /// The external URL opener failed to launch the destination
    #[error("Open error: {0}")]
    OpenError(String),

    /// JSON (de)serialization failure
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Relational backend failure
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// I/O Error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GateError {
    /// Get user-friendly error message for notifications.
    pub fn user_message(&self) -> String {
        match self {
            GateError::ConfigurationError(reason) => format!("Configuration problem: {}", reason),
            GateError::ValidationError(reason) => format!("Invalid setting: {}", reason),
            GateError::StorageError(_) | GateError::DatabaseError(_) => {
                "Could not update scan history".to_string()
            }
            GateError::CaptureError(reason) => format!("Scanner input unavailable: {}", reason),
            GateError::OpenError(_) => "Could not open the URL".to_string(),
            GateError::SerializationError(_) => "Internal data error".to_string(),
            GateError::IoError(_) => "Internal system error".to_string(),
        }
    }
}
