/// Bit-set of markers attached to a roll entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
    pub const USED: Flags = Flags(1);
    pub const EXPLODED: Flags = Flags(1 << 1);
    pub const REROLLED: Flags = Flags(1 << 2);
    pub const CRIT_SUCCESS: Flags = Flags(1 << 3);
    pub const CRIT_FAIL: Flags = Flags(1 << 4);
    pub const SUCCESS: Flags = Flags(1 << 5);
    pub const FAILURE: Flags = Flags(1 << 6);

    pub fn empty() -> Self {
        Flags(0)
    }

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub(crate) fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    pub(crate) fn remove(&mut self, other: Flags) {
        self.0 &= !other.0;
    }

    /// Names of the set flags, in a fixed order
    pub fn names(self) -> Vec<&'static str> {
        const ALL: [(Flags, &str); 7] = [
            (Flags::USED, "used"),
            (Flags::EXPLODED, "exploded"),
            (Flags::REROLLED, "rerolled"),
            (Flags::CRIT_SUCCESS, "critical-success"),
            (Flags::CRIT_FAIL, "critical-failure"),
            (Flags::SUCCESS, "success"),
            (Flags::FAILURE, "failure"),
        ];
        ALL.iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Flags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// One die outcome with its markers; the raw value is only ever replaced
/// by a reroll or a compound explosion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Entry {
    value: f64,
    flags: Flags,
}

impl Entry {
    pub(crate) fn new(value: f64) -> Self {
        Entry {
            value,
            flags: Flags::USED,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn is_used(&self) -> bool {
        self.flags.contains(Flags::USED)
    }

    pub fn is_exploded(&self) -> bool {
        self.flags.contains(Flags::EXPLODED)
    }

    pub fn is_rerolled(&self) -> bool {
        self.flags.contains(Flags::REROLLED)
    }

    pub fn is_crit_success(&self) -> bool {
        self.flags.contains(Flags::CRIT_SUCCESS)
    }

    pub fn is_crit_fail(&self) -> bool {
        self.flags.contains(Flags::CRIT_FAIL)
    }

    pub fn is_success(&self) -> bool {
        self.flags.contains(Flags::SUCCESS)
    }

    pub fn is_failure(&self) -> bool {
        self.flags.contains(Flags::FAILURE)
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub(crate) fn set_used(&mut self, used: bool) {
        if used {
            self.flags.insert(Flags::USED);
        } else {
            self.flags.remove(Flags::USED);
        }
    }

    pub(crate) fn set_exploded(&mut self) {
        self.flags.insert(Flags::EXPLODED);
    }

    pub(crate) fn set_rerolled(&mut self) {
        self.flags.insert(Flags::REROLLED);
    }

    pub(crate) fn set_crit_success(&mut self) {
        self.flags.insert(Flags::CRIT_SUCCESS);
    }

    pub(crate) fn set_crit_fail(&mut self) {
        self.flags.insert(Flags::CRIT_FAIL);
    }

    pub(crate) fn set_success(&mut self) {
        self.flags.insert(Flags::SUCCESS);
    }

    pub(crate) fn set_failure(&mut self) {
        self.flags.insert(Flags::FAILURE);
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        super::fmt_num(f, self.value)?;
        if self.is_exploded() {
            write!(f, "!")?;
        }
        if self.is_rerolled() {
            write!(f, "r")?;
        }
        if self.is_crit_success() {
            write!(f, "*")?;
        }
        if self.is_crit_fail() {
            write!(f, "_")?;
        }
        if self.is_success() {
            write!(f, "+")?;
        }
        if self.is_failure() {
            write!(f, "-")?;
        }
        if !self.is_used() {
            write!(f, "d")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entries_start_used() {
        let entry = Entry::new(4.0);
        assert!(entry.is_used());
        assert_eq!(vec!["used"], entry.flags().names());
    }

    #[test]
    fn dropping_keeps_other_flags() {
        let mut entry = Entry::new(6.0);
        entry.set_exploded();
        entry.set_used(false);
        assert!(entry.is_exploded());
        assert!(!entry.is_used());
        assert_eq!("6!d", entry.to_string());
    }
}
