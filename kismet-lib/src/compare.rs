/// Comparison operator of a compare point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CompareOp {
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Equal,
    #[cfg_attr(feature = "serde", serde(rename = "!="))]
    NotEqual,
    #[cfg_attr(feature = "serde", serde(rename = "<"))]
    Less,
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    LessEqual,
    #[cfg_attr(feature = "serde", serde(rename = ">"))]
    Greater,
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    GreaterEqual,
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
        };
        write!(f, "{token}")
    }
}

/// Operator and threshold deciding whether a rolled value triggers a modifier
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComparePoint {
    op: CompareOp,
    value: f64,
}

impl ComparePoint {
    pub fn new(op: CompareOp, value: f64) -> Self {
        ComparePoint { op, value }
    }

    /// Default explode trigger, the entity maximum
    pub(crate) fn at_max(max: i64) -> Self {
        Self::new(CompareOp::Equal, max as f64)
    }

    /// Default reroll trigger, the entity minimum
    pub(crate) fn at_min(min: i64) -> Self {
        Self::new(CompareOp::Equal, min as f64)
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn matches(&self, value: f64) -> bool {
        match self.op {
            CompareOp::Equal => value == self.value,
            CompareOp::NotEqual => value != self.value,
            CompareOp::Less => value < self.value,
            CompareOp::LessEqual => value <= self.value,
            CompareOp::Greater => value > self.value,
            CompareOp::GreaterEqual => value >= self.value,
        }
    }
}

impl std::fmt::Display for ComparePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.op)?;
        crate::roll::fmt_num(f, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_each_operator() {
        assert!(ComparePoint::new(CompareOp::Equal, 6.0).matches(6.0));
        assert!(!ComparePoint::new(CompareOp::Equal, 6.0).matches(5.0));
        assert!(ComparePoint::new(CompareOp::NotEqual, 6.0).matches(5.0));
        assert!(ComparePoint::new(CompareOp::Less, 2.0).matches(1.0));
        assert!(ComparePoint::new(CompareOp::LessEqual, 2.0).matches(2.0));
        assert!(ComparePoint::new(CompareOp::Greater, 4.0).matches(5.0));
        assert!(!ComparePoint::new(CompareOp::Greater, 4.0).matches(4.0));
        assert!(ComparePoint::new(CompareOp::GreaterEqual, 4.0).matches(4.0));
    }

    #[test]
    fn display_trims_integral_thresholds() {
        assert_eq!("=6", ComparePoint::new(CompareOp::Equal, 6.0).to_string());
        assert_eq!(
            ">=4.5",
            ComparePoint::new(CompareOp::GreaterEqual, 4.5).to_string()
        );
    }
}
