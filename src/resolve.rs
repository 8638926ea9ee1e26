//! Sender name resolution against the identities table.

use crate::model::identity::ResolvedIdentity;
use crate::roster::Roster;

/// Resolve a raw sender display name to a canonical identity and group.
///
/// A raw name matches an identity when any stored alias string contains it
/// (case-sensitive). The table is walked in file order and the first match
/// wins; with no match the raw name is kept as the canonical name.
///
/// Unknown senders are not an error: they resolve to themselves with an
/// empty group.
pub fn resolve(sender_raw_name: &str, roster: &Roster) -> ResolvedIdentity {
    let mut canonical_name = sender_raw_name.to_string();

    for (student, record) in &roster.students {
        if record
            .aliases
            .iter()
            .any(|alias| alias.contains(sender_raw_name))
        {
            canonical_name = student.clone();
            break;
        }
    }

    let group = roster
        .students
        .get(&canonical_name)
        .map(|record| record.group.clone())
        .unwrap_or_default();

    ResolvedIdentity {
        canonical_name,
        group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identity::IdentityRecord;

    fn roster_with(entries: &[(&str, &str, &[&str])]) -> Roster {
        let mut roster = Roster::default();
        for (name, group, aliases) in entries {
            roster.students.insert(
                name.to_string(),
                IdentityRecord {
                    group: group.to_string(),
                    aliases: aliases.iter().map(|a| a.to_string()).collect(),
                },
            );
        }
        roster
    }

    #[test]
    fn test_alias_resolves_to_canonical() {
        let roster = roster_with(&[("Alice", "10A", &["Mrs. Smith"])]);
        let id = resolve("Mrs. Smith", &roster);
        assert_eq!(id.canonical_name, "Alice");
        assert_eq!(id.group, "10A");
    }

    #[test]
    fn test_unknown_sender_keeps_raw_name_empty_group() {
        let roster = roster_with(&[("Alice", "10A", &["Mrs. Smith"])]);
        let id = resolve("Bob", &roster);
        assert_eq!(id.canonical_name, "Bob");
        assert_eq!(id.group, "");
    }

    #[test]
    fn test_direct_canonical_name_gets_group() {
        let roster = roster_with(&[("Alice", "10A", &[])]);
        let id = resolve("Alice", &roster);
        assert_eq!(id.canonical_name, "Alice");
        assert_eq!(id.group, "10A");
    }

    #[test]
    fn test_alias_containment_is_substring() {
        // The raw name only needs to appear inside a stored alias string.
        let roster = roster_with(&[("Alice", "10A", &["Sra. Smith de Johnson"])]);
        let id = resolve("Smith", &roster);
        assert_eq!(id.canonical_name, "Alice");
    }

    #[test]
    fn test_containment_is_case_sensitive() {
        let roster = roster_with(&[("Alice", "10A", &["Mrs. Smith"])]);
        let id = resolve("mrs. smith", &roster);
        assert_eq!(id.canonical_name, "mrs. smith");
        assert_eq!(id.group, "");
    }

    #[test]
    fn test_overlapping_aliases_first_table_entry_wins() {
        let roster = roster_with(&[
            ("Zoe", "11C", &["Mrs. Smith"]),
            ("Alice", "10A", &["Mrs. Smith"]),
        ]);
        let id = resolve("Mrs. Smith", &roster);
        assert_eq!(id.canonical_name, "Zoe");
        assert_eq!(id.group, "11C");
    }
}
