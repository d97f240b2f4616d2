use crate::compare::ComparePoint;
use crate::dice::limits;
use crate::dice::Entity;
use crate::roll::entry::Entry;
use crate::roll::record::ModifierInfo;
use crate::roll::{Dir, Set, Source};
use itertools::Itertools;

/// End of the value ordering a keep or drop selects from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    High,
    Low,
}

/// Roll-result transformation attached to a dice entity or group
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    Explode {
        compound: bool,
        penetrate: bool,
        compare: Option<ComparePoint>,
    },
    ReRoll {
        once: bool,
        compare: Option<ComparePoint>,
    },
    Keep {
        end: End,
        qty: usize,
    },
    Drop {
        end: End,
        qty: usize,
    },
    Target {
        success: ComparePoint,
        failure: Option<ComparePoint>,
    },
    CriticalSuccess {
        compare: ComparePoint,
    },
    CriticalFailure {
        compare: ComparePoint,
    },
    Sort {
        dir: Dir,
    },
}

impl Modifier {
    /// Name keying the modifier inside a set
    pub fn name(&self) -> &'static str {
        match self {
            Self::Explode { .. } => "explode",
            Self::ReRoll { .. } => "reroll",
            Self::Keep { .. } => "keep",
            Self::Drop { .. } => "drop",
            Self::Target { .. } => "target",
            Self::CriticalSuccess { .. } => "critical-success",
            Self::CriticalFailure { .. } => "critical-failure",
            Self::Sort { .. } => "sort",
        }
    }

    /// Fixed execution priority, low runs first; keep and drop share a
    /// tier so notation order decides between them
    pub fn priority(&self) -> u8 {
        match self {
            Self::Explode { .. } => 1,
            Self::ReRoll { .. } => 2,
            Self::Keep { .. } | Self::Drop { .. } => 3,
            Self::Target { .. } => 4,
            Self::CriticalSuccess { .. } | Self::CriticalFailure { .. } => 5,
            Self::Sort { .. } => 6,
        }
    }

    pub fn compare_point(&self) -> Option<ComparePoint> {
        match self {
            Self::Explode { compare, .. } | Self::ReRoll { compare, .. } => *compare,
            Self::Target { success, .. } => Some(*success),
            Self::CriticalSuccess { compare } | Self::CriticalFailure { compare } => Some(*compare),
            Self::Keep { .. } | Self::Drop { .. } | Self::Sort { .. } => None,
        }
    }

    /// Mutate the set in place; entries gain flags or replaced values but
    /// are never removed
    pub(crate) fn run(&self, set: &mut Set, owner: &dyn Entity, source: &mut dyn Source) {
        match self {
            Self::Explode {
                compound,
                penetrate,
                compare,
            } => run_explode(set, owner, source, *compound, *penetrate, compare),
            Self::ReRoll { once, compare } => run_reroll(set, owner, source, *once, compare),
            Self::Keep { end, qty } => run_keep(set, *end, *qty),
            Self::Drop { end, qty } => run_drop(set, *end, *qty),
            Self::Target { success, failure } => run_target(set, success, failure),
            Self::CriticalSuccess { compare } => {
                for entry in set.iter_mut().filter(|e| e.is_used()) {
                    if compare.matches(entry.value()) {
                        entry.set_crit_success();
                    }
                }
            }
            Self::CriticalFailure { compare } => {
                for entry in set.iter_mut().filter(|e| e.is_used()) {
                    if compare.matches(entry.value()) {
                        entry.set_crit_fail();
                    }
                }
            }
            Self::Sort { dir } => set.sort_entries(*dir),
        }
    }
}

fn run_explode(
    set: &mut Set,
    owner: &dyn Entity,
    source: &mut dyn Source,
    compound: bool,
    penetrate: bool,
    compare: &Option<ComparePoint>,
) {
    let Some(compare) = compare else { return };
    let adjust = i64::from(penetrate);
    let mut budget = limits::MAX_ROLL_ITERATIONS;
    let mut i = 0;
    while i < set.len() {
        if !compare.matches(set.entry(i).value()) {
            i += 1;
            continue;
        }
        if compound {
            let mut extra = 0.0;
            while budget > 0 {
                budget -= 1;
                let draw = owner.draw(source);
                extra += (draw - adjust) as f64;
                if !compare.matches(draw as f64) {
                    break;
                }
            }
            let entry = set.entry_mut(i);
            entry.set_value(entry.value() + extra);
            entry.set_exploded();
            i += 1;
        } else {
            set.entry_mut(i).set_exploded();
            let mut at = i + 1;
            while budget > 0 {
                budget -= 1;
                let draw = owner.draw(source);
                let mut entry = Entry::new((draw - adjust) as f64);
                // the chain continues on the raw draw, not the stored value
                let again = compare.matches(draw as f64);
                if again {
                    entry.set_exploded();
                }
                set.insert(at, entry);
                at += 1;
                if !again {
                    break;
                }
            }
            i = at;
        }
        if budget == 0 {
            break;
        }
    }
}

fn run_reroll(
    set: &mut Set,
    owner: &dyn Entity,
    source: &mut dyn Source,
    once: bool,
    compare: &Option<ComparePoint>,
) {
    let Some(compare) = compare else { return };
    let mut budget = limits::MAX_ROLL_ITERATIONS;
    for entry in set.iter_mut() {
        if !compare.matches(entry.value()) {
            continue;
        }
        while budget > 0 {
            budget -= 1;
            entry.set_value(owner.draw(source) as f64);
            entry.set_rerolled();
            if once || !compare.matches(entry.value()) {
                break;
            }
        }
    }
}

fn run_keep(set: &mut Set, end: End, qty: usize) {
    let mut indices = set.used_indices();
    // ties resolve toward earlier-rolled entries
    match end {
        End::High => indices.sort_by(|&a, &b| {
            set.entry(b)
                .value()
                .total_cmp(&set.entry(a).value())
                .then(a.cmp(&b))
        }),
        End::Low => indices.sort_by(|&a, &b| {
            set.entry(a)
                .value()
                .total_cmp(&set.entry(b).value())
                .then(a.cmp(&b))
        }),
    }
    for &index in indices.iter().skip(qty) {
        set.entry_mut(index).set_used(false);
    }
}

fn run_drop(set: &mut Set, end: End, qty: usize) {
    let mut indices = set.used_indices();
    match end {
        End::High => indices.sort_by(|&a, &b| {
            set.entry(b)
                .value()
                .total_cmp(&set.entry(a).value())
                .then(b.cmp(&a))
        }),
        End::Low => indices.sort_by(|&a, &b| {
            set.entry(a)
                .value()
                .total_cmp(&set.entry(b).value())
                .then(b.cmp(&a))
        }),
    }
    for &index in indices.iter().take(qty) {
        set.entry_mut(index).set_used(false);
    }
}

fn run_target(set: &mut Set, success: &ComparePoint, failure: &Option<ComparePoint>) {
    for entry in set.iter_mut().filter(|e| e.is_used()) {
        if success.matches(entry.value()) {
            entry.set_success();
        }
        if let Some(failure) = failure {
            if failure.matches(entry.value()) {
                entry.set_failure();
            }
        }
    }
}

/// Modifiers keyed by name, executed by fixed priority regardless of
/// notation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierSet {
    inner: Vec<Modifier>,
}

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing any modifier of the same name in place
    pub fn insert(&mut self, modifier: Modifier) {
        match self.inner.iter_mut().find(|m| m.name() == modifier.name()) {
            Some(slot) => *slot = modifier,
            None => self.inner.push(modifier),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.inner.iter()
    }

    /// Execution order: stable sort on priority, insertion order breaking
    /// ties inside a shared tier
    pub fn by_priority(&self) -> impl Iterator<Item = &Modifier> {
        self.inner.iter().sorted_by_key(|m| m.priority())
    }

    /// Give explode a `= max` compare point and reroll a `= min` one when
    /// the notation left them out
    pub(crate) fn assign_defaults(&mut self, min: i64, max: i64) {
        for modifier in &mut self.inner {
            match modifier {
                Modifier::Explode { compare, .. } if compare.is_none() => {
                    *compare = Some(ComparePoint::at_max(max));
                }
                Modifier::ReRoll { compare, .. } if compare.is_none() => {
                    *compare = Some(ComparePoint::at_min(min));
                }
                _ => (),
            }
        }
    }

    pub(crate) fn describe(&self) -> Vec<ModifierInfo> {
        self.by_priority()
            .map(|m| ModifierInfo {
                name: m.name(),
                priority: m.priority(),
                compare_point: m.compare_point(),
            })
            .collect()
    }
}
