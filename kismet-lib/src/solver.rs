use crate::dice::Dice;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::expr::Expr;
use crate::parser;
use crate::roll::{RollResult, Source};
use pest::Parser;
use rand::Rng;

/// Default random dice roller
pub struct RandomSource<'a, T: Rng> {
    pub generator: &'a mut T,
}

impl<T: Rng> Source for RandomSource<'_, T> {
    fn next_in_range(&mut self, min: i64, max: i64) -> i64 {
        self.generator.gen_range(min..=max)
    }
}

/// Holds one parsed roll query, ready to be solved any number of times
#[derive(Clone, Debug)]
pub struct Solver {
    notation: String,
    expr: Expr,
    reason: Option<String>,
}

impl Solver {
    /// Parse the notation; grammar and configuration failures surface here,
    /// never while rolling
    pub fn new(input: &str) -> Result<Self> {
        let mut pairs = parser::Parser::parse(parser::Rule::command, input)?;
        let expr = parser::build_expr(pairs.next().unwrap().into_inner())?;
        let mut reason = None;
        for pair in pairs {
            if pair.as_rule() == parser::Rule::reason {
                reason = Some(pair.as_str()[1..].trim().to_owned());
            }
        }
        Ok(Solver {
            notation: input.trim().to_owned(),
            expr,
            reason,
        })
    }

    /// Solve the roll expression using the default Rng source
    pub fn solve(&self) -> Result<RollResult> {
        self.solve_with(&mut rand::thread_rng())
    }

    /// Solve the roll expression using the provided Rng
    pub fn solve_with<R: Rng>(&self, generator: &mut R) -> Result<RollResult> {
        self.solve_with_source(&mut RandomSource { generator })
    }

    /// Solve the roll expression using the provided source
    pub fn solve_with_source<S: Source>(&self, source: &mut S) -> Result<RollResult> {
        let mut records = Vec::new();
        let total = Evaluator::eval(&self.expr, source, &mut records)?;
        Ok(RollResult::new(total, records, self.reason.clone()))
    }

    /// The parsed expression tree
    pub fn expression(&self) -> &Expr {
        &self.expr
    }

    /// Every dice entity in the query, in notation order
    pub fn dice(&self) -> Vec<&Dice> {
        let mut out = Vec::new();
        self.expr.collect_dice(&mut out);
        out
    }

    /// The query string
    pub fn as_str(&self) -> &str {
        &self.notation
    }

    /// The trailing annotation, if the query carried one
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}
