pub mod modifier;

use crate::error::{Error, Result};
use crate::roll::entry::Entry;
use crate::roll::record::{Record, RecordKind};
use crate::roll::{Set, Source};
use modifier::ModifierSet;

pub(crate) mod limits {
    /// Arbitrary limits to avoid oom
    pub(crate) const MAX_DICE_AMOUNT: u64 = 5000;
    pub(crate) const MAX_DICE_SIDES: i64 = 5000;
    /// Extra draws one explode or reroll run may perform before it stops
    pub(crate) const MAX_ROLL_ITERATIONS: u64 = 1000;
}

/// Owner context a modifier runs against: bounds and a way to draw again
pub(crate) trait Entity {
    fn min(&self) -> i64;
    fn max(&self) -> i64;
    fn draw(&self, source: &mut dyn Source) -> i64;
}

/// Face layout of a dice entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Standard(i64),
    Percentile,
    /// Fudge die; `non_blanks` is 2 for the standard d6 layout, 1 for the
    /// d4 variant with two blank faces
    Fudge {
        non_blanks: u8,
    },
}

/// Dice roll configuration: face layout, quantity and modifier set
#[derive(Debug, Clone, PartialEq)]
pub struct Dice {
    notation: String,
    kind: Kind,
    qty: u64,
    modifiers: ModifierSet,
}

impl Dice {
    pub fn new(notation: String, kind: Kind, qty: u64, mut modifiers: ModifierSet) -> Result<Self> {
        if qty == 0 {
            return Err(Error::Configuration(format!(
                "`{notation}` must roll at least one dice"
            )));
        }
        if qty > limits::MAX_DICE_AMOUNT {
            return Err(Error::Configuration(format!(
                "exceeded max allowed amount of dices `{}`",
                limits::MAX_DICE_AMOUNT
            )));
        }
        if let Kind::Standard(sides) = kind {
            if sides == 0 {
                return Err(Error::Configuration(format!(
                    "`{notation}` can't have zero sides"
                )));
            }
            if sides < 0 {
                return Err(Error::Configuration(format!(
                    "`{notation}` must have a positive number of sides"
                )));
            }
            if sides > limits::MAX_DICE_SIDES {
                return Err(Error::Configuration(format!(
                    "exceeded max allowed number of dice sides `{}`",
                    limits::MAX_DICE_SIDES
                )));
            }
        }
        let (min, max) = bounds(kind);
        modifiers.assign_defaults(min, max);
        Ok(Dice {
            notation,
            kind,
            qty,
            modifiers,
        })
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn qty(&self) -> u64 {
        self.qty
    }

    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    pub fn min(&self) -> i64 {
        bounds(self.kind).0
    }

    pub fn max(&self) -> i64 {
        bounds(self.kind).1
    }

    /// Face count when the entity has a plain numeric one
    pub fn sides(&self) -> Option<i64> {
        match self.kind {
            Kind::Standard(sides) => Some(sides),
            Kind::Percentile => Some(100),
            Kind::Fudge { .. } => None,
        }
    }

    /// Draw the base quantity, then run the modifier chain in priority order
    pub fn roll<S: Source>(&self, source: &mut S) -> Set {
        let mut set = Set::with_capacity(self.qty as usize);
        for _ in 0..self.qty {
            set.push(Entry::new(Entity::draw(self, source) as f64));
        }
        for modifier in self.modifiers.by_priority() {
            modifier.run(&mut set, self, source);
        }
        set
    }

    /// Audit record of one roll of this entity
    pub fn record(&self, set: &Set) -> Record {
        Record {
            kind: RecordKind::Die,
            notation: self.notation.clone(),
            sides: self.sides(),
            min: Some(self.min()),
            max: Some(self.max()),
            qty: Some(self.qty),
            modifiers: self.modifiers.describe(),
            entries: set.entries().to_vec(),
        }
    }
}

impl Entity for Dice {
    fn min(&self) -> i64 {
        Dice::min(self)
    }

    fn max(&self) -> i64 {
        Dice::max(self)
    }

    fn draw(&self, source: &mut dyn Source) -> i64 {
        match self.kind {
            Kind::Standard(sides) => source.next_in_range(1, sides),
            Kind::Percentile => source.next_in_range(1, 100),
            Kind::Fudge { non_blanks: 1 } => match source.next_in_range(1, 4) {
                1 => -1,
                2 | 3 => 0,
                _ => 1,
            },
            Kind::Fudge { .. } => match source.next_in_range(1, 6) {
                v if v <= 2 => -1,
                v if v <= 4 => 0,
                _ => 1,
            },
        }
    }
}

impl std::fmt::Display for Dice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation)
    }
}

fn bounds(kind: Kind) -> (i64, i64) {
    match kind {
        Kind::Standard(sides) => (1, sides),
        Kind::Percentile => (1, 100),
        Kind::Fudge { .. } => (-1, 1),
    }
}
