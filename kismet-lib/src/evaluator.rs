use crate::dice::Entity;
use crate::error::{Error, Result};
use crate::expr::{BinOp, Expr};
use crate::group::Group;
use crate::roll::entry::Entry;
use crate::roll::record::Record;
use crate::roll::{Set, Source};

/// Bounds a group hands to its draw-type modifiers
struct GroupBounds {
    min: i64,
    max: i64,
}

impl Entity for GroupBounds {
    fn min(&self) -> i64 {
        self.min
    }

    fn max(&self) -> i64 {
        self.max
    }

    fn draw(&self, source: &mut dyn Source) -> i64 {
        source.next_in_range(self.min, self.max)
    }
}

/// Represent an evaluator
pub(crate) struct Evaluator;

impl Evaluator {
    /// Walk the tree, rolling every dice and group node and folding the
    /// arithmetic around them; randomness happens only inside rolls
    pub(crate) fn eval<S: Source>(
        expr: &Expr,
        source: &mut S,
        records: &mut Vec<Record>,
    ) -> Result<f64> {
        match expr {
            Expr::Value(value) => Ok(*value),
            Expr::Paren(inner) => Self::eval(inner, source, records),
            Expr::Dice(dice) => {
                let set = dice.roll(source);
                let total = set.total();
                records.push(dice.record(&set));
                Ok(total)
            }
            Expr::Group(group) => {
                let set = Self::roll_group(group, source, records)?;
                let total = set.total();
                records.push(group.record(&set));
                Ok(total)
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = Self::eval(lhs, source, records)?;
                let rhs = Self::eval(rhs, source, records)?;
                Self::binary(*op, lhs, rhs)
            }
            Expr::Function { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| Self::eval(arg, source, records))
                    .collect::<Result<Vec<f64>>>()?;
                let value = function.apply(&args);
                if !value.is_finite() {
                    return Err(Error::Evaluation(format!(
                        "function `{function}` produced a non-finite result"
                    )));
                }
                Ok(value)
            }
        }
    }

    /// Reduce a source-free arithmetic fragment; dice are rejected so no
    /// randomness can hide inside a quantity or sides sub-expression
    pub(crate) fn eval_const(expr: &Expr) -> Result<f64> {
        match expr {
            Expr::Value(value) => Ok(*value),
            Expr::Paren(inner) => Self::eval_const(inner),
            Expr::Dice(dice) => Err(Error::Configuration(format!(
                "`{dice}` can't be rolled inside a dice quantity or sides"
            ))),
            Expr::Group(group) => Err(Error::Configuration(format!(
                "`{group}` can't be rolled inside a dice quantity or sides"
            ))),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = Self::eval_const(lhs)?;
                let rhs = Self::eval_const(rhs)?;
                Self::binary(*op, lhs, rhs)
            }
            Expr::Function { function, args } => {
                let args = args
                    .iter()
                    .map(Self::eval_const)
                    .collect::<Result<Vec<f64>>>()?;
                let value = function.apply(&args);
                if !value.is_finite() {
                    return Err(Error::Evaluation(format!(
                        "function `{function}` produced a non-finite result"
                    )));
                }
                Ok(value)
            }
        }
    }

    /// Roll every sub-expression of a group into one combined set, then run
    /// the group modifiers over it
    fn roll_group<S: Source>(
        group: &Group,
        source: &mut S,
        records: &mut Vec<Record>,
    ) -> Result<Set> {
        let mut set = Set::new();
        for expr in group.expressions() {
            match expr {
                Expr::Dice(dice) => set.extend(dice.roll(source)),
                Expr::Group(nested) => set.extend(Self::roll_group(nested, source, records)?),
                other => {
                    let value = Self::eval(other, source, records)?;
                    set.push(Entry::new(value));
                }
            }
        }
        let (min, max) = group.bounds().unwrap_or((1, 1));
        let bounds = GroupBounds { min, max };
        for modifier in group.modifiers().by_priority() {
            modifier.run(&mut set, &bounds, source);
        }
        Ok(set)
    }

    fn binary(op: BinOp, lhs: f64, rhs: f64) -> Result<f64> {
        let value = match op {
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => {
                if rhs == 0.0 {
                    return Err(Error::Evaluation("can't divide by zero".to_owned()));
                }
                lhs / rhs
            }
            BinOp::Rem => {
                if rhs == 0.0 {
                    return Err(Error::Evaluation(
                        "can't take a remainder modulo zero".to_owned(),
                    ));
                }
                lhs % rhs
            }
            BinOp::Pow => lhs.powf(rhs),
        };
        if !value.is_finite() {
            return Err(Error::Evaluation(
                "arithmetic produced a non-finite result".to_owned(),
            ));
        }
        Ok(value)
    }
}
