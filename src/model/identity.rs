//! Sender identity records and resolution output.

use serde::{Deserialize, Serialize};

/// One entry of the identities table, keyed externally by canonical name.
///
/// Supplied by the roster file; read-only to the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityRecord {
    /// Class/cohort tag used as the directory-name prefix (e.g. `"10A"`).
    pub group: String,

    /// Alternate display names (a parent's name, a nickname) that resolve
    /// to this identity. A raw sender name matches an alias when the alias
    /// contains it.
    pub aliases: Vec<String>,
}

/// The outcome of resolving one raw sender name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// The canonical filing name: either an identities-table key or the raw
    /// name unchanged when nothing matched.
    pub canonical_name: String,

    /// Group tag for the canonical name; empty for unregistered senders.
    pub group: String,
}

impl ResolvedIdentity {
    /// Directory name for this identity: group tag followed by the
    /// canonical name with every space removed, e.g. `"10AAliceJohnson"`.
    pub fn directory_name(&self) -> String {
        format!("{}{}", self.group, self.canonical_name.replace(' ', ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_name_strips_all_spaces() {
        let id = ResolvedIdentity {
            canonical_name: "Alice Mary Johnson".to_string(),
            group: "10A".to_string(),
        };
        assert_eq!(id.directory_name(), "10AAliceMaryJohnson");
    }

    #[test]
    fn test_directory_name_empty_group() {
        let id = ResolvedIdentity {
            canonical_name: "Bob".to_string(),
            group: String::new(),
        };
        assert_eq!(id.directory_name(), "Bob");
    }
}
