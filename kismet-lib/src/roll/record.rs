use crate::compare::ComparePoint;
use crate::roll::entry::Entry;
use itertools::Itertools;

/// Kind of rolled node a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RecordKind {
    Die,
    Group,
}

/// Modifier attached to a rolled node, as reported in a record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModifierInfo {
    pub name: &'static str,
    pub priority: u8,
    pub compare_point: Option<ComparePoint>,
}

/// Audit record of one dice or group node: its configuration and every
/// entry it produced, dropped entries included
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Record {
    pub kind: RecordKind,
    pub notation: String,
    pub sides: Option<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub qty: Option<u64>,
    pub modifiers: Vec<ModifierInfo>,
    pub entries: Vec<Entry>,
}

impl Record {
    /// Entries counted into the total
    pub fn used_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_used())
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}]",
            self.notation,
            self.entries.iter().format(", ")
        )
    }
}
