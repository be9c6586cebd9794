//! Primary-key generation for new rows.

use std::collections::HashSet;

use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::model::ColumnType;
use crate::model::Value;

/// How new primary-key values are produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "camelCase")]
pub enum IdScheme {
    /// `prefix` followed by a zero-padded counter, one past the highest
    /// existing counter (`FPC01, FPC02, FPC04 → FPC05`).
    Sequential {
        prefix: String,
        #[serde(default = "default_width")]
        width: usize,
    },
    /// Current epoch milliseconds, bumped until unique.
    #[default]
    Timestamp,
}

fn default_width() -> usize {
    2
}

impl IdScheme {
    /// Creates a sequential scheme with a two-digit counter.
    pub fn sequential(prefix: impl Into<String>) -> Self {
        Self::Sequential {
            prefix: prefix.into(),
            width: default_width(),
        }
    }

    /// Produces an id not present in `existing`.
    ///
    /// A sequence whose counter cannot grow falls back to a timestamp id.
    /// Timestamp ids are numeric when the key column is numeric.
    pub fn next_id(&self, existing: &HashSet<String>, key_type: ColumnType) -> Value {
        match self {
            IdScheme::Sequential { prefix, width } => {
                let next = existing
                    .iter()
                    .filter_map(|id| sequence_number(id, prefix))
                    .max()
                    .map_or(Some(1), |max| max.checked_add(1));
                match next {
                    Some(next) => Value::String(format!("{prefix}{next:0width$}", width = *width)),
                    None => {
                        log::warn!("sequence '{prefix}' exhausted, using a timestamp id");
                        IdScheme::Timestamp.next_id(existing, key_type)
                    }
                }
            }
            IdScheme::Timestamp => {
                let mut token = Utc::now().timestamp_millis();
                while existing.contains(&token.to_string()) {
                    token += 1;
                }
                match key_type {
                    ColumnType::Number => Value::from(token),
                    ColumnType::String | ColumnType::Boolean => Value::String(token.to_string()),
                }
            }
        }
    }
}

fn sequence_number(id: &str, prefix: &str) -> Option<u64> {
    let digits = id.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Derives a unique `"{id}_copy"` style id for a duplicated row.
pub fn copy_id(source_id: &str, existing: &HashSet<String>) -> String {
    let base = format!("{source_id}_copy");
    if !existing.contains(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or(base)
}
