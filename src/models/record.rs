//! Record domain models
//!
//! Records are the protected resource behind the authentication gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record stored in database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique record ID
    pub id: i64,

    /// Record name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Account ID of the user who created the record
    pub created_by: i64,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Create/update request body for a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayload {
    /// Record name
    pub name: String,

    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,
}
