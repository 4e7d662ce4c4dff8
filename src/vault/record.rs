//! The decrypted vault payload.
//!
//! On disk (after decryption) a record set is a JSON object with exactly
//! three fields:
//!
//! ```text
//! {"_createdAt": 1700000000000, "_updatedAt": 1700000000000, "records": {"k": "v"}}
//! ```
//!
//! Anything else (an extra or missing field, a non-numeric timestamp,
//! a `records` value that is not an object of strings) is rejected.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{Result, VaultError};

/// Timestamps plus the key/value mapping stored inside a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSet {
    /// Creation time in epoch milliseconds.  Never changes after creation.
    #[serde(rename = "_createdAt", deserialize_with = "epoch_millis")]
    pub created_at: i64,

    /// Time of the last successful save in epoch milliseconds.
    #[serde(rename = "_updatedAt", deserialize_with = "epoch_millis")]
    pub updated_at: i64,

    /// Stored secrets, in insertion order.
    pub records: IndexMap<String, String>,
}

impl RecordSet {
    /// A fresh, empty record set stamped with the current time.
    pub fn new() -> Self {
        let now = now_millis();
        Self {
            created_at: now,
            updated_at: now,
            records: IndexMap::new(),
        }
    }

    /// Serialize to the JSON text that gets encrypted.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| VaultError::Serialization(format!("records: {e}")))
    }

    /// Parse and structurally validate decrypted JSON bytes.
    ///
    /// The parse error itself is dropped: callers only ever learn that
    /// the vault is invalid.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        // serde would also accept a `[created, updated, records]` array.
        if bytes.trim_ascii_start().first() != Some(&b'{') {
            return Err(VaultError::InvalidVault);
        }
        serde_json::from_slice(bytes).map_err(|_| VaultError::InvalidVault)
    }
}

impl Default for RecordSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert epoch milliseconds into a `DateTime`, clamping out-of-range
/// values to the epoch.
pub fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

/// Accept any JSON number as a timestamp; fractional values are truncated.
fn epoch_millis<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    number
        .as_i64()
        .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
        .ok_or_else(|| <D::Error as serde::de::Error>::custom("timestamp is not a valid number"))
}
