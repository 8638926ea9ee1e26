//! The identities table ("roster") and its TOML loader.
//!
//! The roster maps each canonical student name to a group tag and a set of
//! alias display names. Table order is significant: alias resolution walks
//! the table top to bottom and the first match wins, so the file's entry
//! order is preserved end to end.
//!
//! # File format
//!
//! ```toml
//! [students."Alice Johnson"]
//! group = "10A"
//! aliases = ["Mrs. Smith", "Alice's Mom"]
//!
//! [students."Bob Pérez"]
//! group = "10B"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};
use crate::model::identity::IdentityRecord;

/// The identities table: canonical name → record, in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    /// Entries keyed by canonical student name.
    pub students: IndexMap<String, IdentityRecord>,
}

impl Roster {
    /// Load a roster from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| FetchError::Roster {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let roster: Roster = toml::from_str(&contents).map_err(|e| FetchError::Roster {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::info!(
            path = %path.display(),
            entries = roster.students.len(),
            "Loaded identities table"
        );
        Ok(roster)
    }

    /// Number of identities in the table.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
