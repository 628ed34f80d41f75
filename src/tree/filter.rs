//! Accessor filtering on the flat form.

use super::node::FlatRecord;
use log::debug;
use serde::{Deserialize, Serialize};

/// Drop getter/setter records unless `include_accessors` is set
///
/// Operates on flattened output, after any merge. Descendants of a removed
/// record keep a parent id that no longer resolves.
pub fn filter_accessors(records: Vec<FlatRecord>, include_accessors: bool) -> Vec<FlatRecord> {
    if include_accessors {
        return records;
    }

    let total = records.len();
    let kept: Vec<FlatRecord> = records
        .into_iter()
        .filter(|r| !r.record.is_accessor())
        .collect();

    debug!("Accessor filter kept {} of {} records", kept.len(), total);

    kept
}

/// Counts shown next to the accessor toggle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    /// Records visible in the final view
    pub showing: usize,

    /// Records before filtering
    pub total: usize,

    /// Getter/setter records before filtering
    pub accessors: usize,
}

impl FilterStats {
    pub fn summary(&self) -> String {
        format!("Showing: {} / Total: {}", self.showing, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{MethodType, Record};
    use crate::tree::builder::build_tree;
    use crate::tree::flatten::flatten;

    fn flat_records() -> Vec<FlatRecord> {
        let records = vec![
            Record::new("1", None, "Root", "main", 10),
            Record::new("2", Some("1"), "A", "getName", 1).with_method_type(MethodType::Getter),
            Record::new("3", Some("1"), "A", "setName", 1).with_method_type(MethodType::Setter),
            Record::new("4", Some("1"), "A", "save", 1),
        ];
        flatten(build_tree(records).unwrap(), None)
    }

    #[test]
    fn test_excludes_accessors_by_default() {
        let kept = filter_accessors(flat_records(), false);
        let ids: Vec<&str> = kept.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_include_accessors_keeps_everything() {
        assert_eq!(filter_accessors(flat_records(), true).len(), 4);
    }

    #[test]
    fn test_stats_summary() {
        let stats = FilterStats {
            showing: 2,
            total: 4,
            accessors: 2,
        };
        assert_eq!(stats.summary(), "Showing: 2 / Total: 4");
    }
}
