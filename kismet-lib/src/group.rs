use crate::dice::modifier::ModifierSet;
use crate::error::Result;
use crate::expr::Expr;
use crate::roll::record::{Record, RecordKind};
use crate::roll::Set;

/// Brace group: sub-expressions rolled together under one modifier set
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    notation: String,
    expressions: Vec<Expr>,
    modifiers: ModifierSet,
    bounds: Option<(i64, i64)>,
}

impl Group {
    pub fn new(notation: String, expressions: Vec<Expr>, mut modifiers: ModifierSet) -> Result<Self> {
        let bounds = entry_bounds(&expressions);
        if let Some((min, max)) = bounds {
            modifiers.assign_defaults(min, max);
        }
        Ok(Group {
            notation,
            expressions,
            modifiers,
            bounds,
        })
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn expressions(&self) -> &[Expr] {
        &self.expressions
    }

    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    /// Entry-level bounds aggregated over the dice sub-expressions, if any
    pub fn bounds(&self) -> Option<(i64, i64)> {
        self.bounds
    }

    /// Audit record of one roll of this group over its combined set
    pub fn record(&self, set: &Set) -> Record {
        Record {
            kind: RecordKind::Group,
            notation: self.notation.clone(),
            sides: None,
            min: self.bounds.map(|(min, _)| min),
            max: self.bounds.map(|(_, max)| max),
            qty: None,
            modifiers: self.modifiers.describe(),
            entries: set.entries().to_vec(),
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation)
    }
}

fn entry_bounds(expressions: &[Expr]) -> Option<(i64, i64)> {
    let mut bounds = None;
    for expr in expressions {
        let sub = match expr {
            Expr::Dice(dice) => Some((dice.min(), dice.max())),
            Expr::Group(group) => group.bounds(),
            _ => None,
        };
        if let Some((min, max)) = sub {
            bounds = match bounds {
                None => Some((min, max)),
                Some((lo, hi)) => Some((lo.min(min), hi.max(max))),
            };
        }
    }
    bounds
}
