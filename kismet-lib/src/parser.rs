use crate::climber::C;
use crate::compare::{CompareOp, ComparePoint};
use crate::dice::modifier::{End, Modifier, ModifierSet};
use crate::dice::{Dice, Kind};
use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::expr::{BinOp, Expr, Function};
use crate::group::Group;
use crate::roll::Dir;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

/// Pest parser
#[derive(Parser)]
#[grammar = "kismet.pest"]
pub struct Parser;

/// Build an expression tree from the pairs of one `expr` rule
pub(crate) fn build_expr(pairs: Pairs<Rule>) -> Result<Expr> {
    C.raise(
        pairs,
        |pair: Pair<Rule>| build_primary(pair),
        |lhs: Result<Expr>, op: Pair<Rule>, rhs: Result<Expr>| {
            let op = match op.as_rule() {
                Rule::add => BinOp::Add,
                Rule::sub => BinOp::Sub,
                Rule::mul => BinOp::Mul,
                Rule::div => BinOp::Div,
                Rule::rem => BinOp::Rem,
                Rule::pow => BinOp::Pow,
                _ => unreachable!("{:#?}", op),
            };
            Ok(Expr::Binary {
                op,
                lhs: Box::new(lhs?),
                rhs: Box::new(rhs?),
            })
        },
    )
}

fn build_primary(pair: Pair<Rule>) -> Result<Expr> {
    match pair.as_rule() {
        Rule::number => Ok(Expr::Value(parse_number(&pair)?)),
        Rule::paren => Ok(Expr::Paren(Box::new(build_expr(
            pair.into_inner().next().unwrap().into_inner(),
        )?))),
        Rule::dice => build_dice(pair).map(Expr::Dice),
        Rule::group => build_group(pair).map(Expr::Group),
        Rule::function => build_function(pair),
        _ => unreachable!("{:#?}", pair),
    }
}

fn build_dice(pair: Pair<Rule>) -> Result<Dice> {
    let notation = pair.as_str().trim().to_owned();
    let mut qty = 1u64;
    let mut kind = None;
    let mut modifiers = ModifierSet::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::qty => qty = eval_qty(inner)?,
            Rule::sides => kind = Some(Kind::Standard(eval_sides(inner)?)),
            Rule::percent => kind = Some(Kind::Percentile),
            Rule::fudge => {
                let non_blanks = inner
                    .into_inner()
                    .next()
                    .map(|variant| variant.as_str().parse::<u8>().unwrap())
                    .unwrap_or(2);
                kind = Some(Kind::Fudge { non_blanks });
            }
            _ => modifiers.insert(build_modifier(inner)?),
        }
    }
    Dice::new(notation, kind.unwrap(), qty, modifiers)
}

fn build_group(pair: Pair<Rule>) -> Result<Group> {
    let notation = pair.as_str().trim().to_owned();
    let mut expressions = Vec::new();
    let mut modifiers = ModifierSet::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::expr => expressions.push(build_expr(inner.into_inner())?),
            _ => modifiers.insert(build_modifier(inner)?),
        }
    }
    Group::new(notation, expressions, modifiers)
}

fn build_function(pair: Pair<Rule>) -> Result<Expr> {
    let span = pair.as_span();
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap();
    let function = Function::from_name(name.as_str()).unwrap();
    let args = inner
        .map(|arg| build_expr(arg.into_inner()))
        .collect::<Result<Vec<Expr>>>()?;
    if args.len() != function.arity() {
        return Err(Error::parse_at(
            format!(
                "function `{}` takes {} argument{}",
                function,
                function.arity(),
                if function.arity() == 1 { "" } else { "s" }
            ),
            span,
        ));
    }
    Ok(Expr::Function { function, args })
}

fn build_modifier(pair: Pair<Rule>) -> Result<Modifier> {
    let modifier = match pair.as_rule() {
        Rule::explode => {
            let mut compound = false;
            let mut penetrate = false;
            let mut compare = None;
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::compound => compound = true,
                    Rule::penetrate => penetrate = true,
                    Rule::compare_point => compare = Some(build_compare_point(inner)?),
                    _ => unreachable!("{:#?}", inner),
                }
            }
            Modifier::Explode {
                compound,
                penetrate,
                compare,
            }
        }
        Rule::target => {
            let mut inner = pair.into_inner();
            let success = build_compare_point(inner.next().unwrap())?;
            let failure = inner
                .next()
                .map(|f| build_compare_point(f.into_inner().next().unwrap()))
                .transpose()?;
            Modifier::Target { success, failure }
        }
        Rule::drop => {
            let (end, qty) = build_selection(pair, End::Low)?;
            Modifier::Drop { end, qty }
        }
        Rule::keep => {
            let (end, qty) = build_selection(pair, End::High)?;
            Modifier::Keep { end, qty }
        }
        Rule::reroll => {
            let mut once = false;
            let mut compare = None;
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::once => once = true,
                    Rule::compare_point => compare = Some(build_compare_point(inner)?),
                    _ => unreachable!("{:#?}", inner),
                }
            }
            Modifier::ReRoll { once, compare }
        }
        Rule::crit_success => Modifier::CriticalSuccess {
            compare: build_compare_point(pair.into_inner().next().unwrap())?,
        },
        Rule::crit_fail => Modifier::CriticalFailure {
            compare: build_compare_point(pair.into_inner().next().unwrap())?,
        },
        Rule::sort => {
            let dir = match pair.into_inner().next() {
                Some(dir) if dir.as_str().eq_ignore_ascii_case("d") => Dir::Descending,
                _ => Dir::Ascending,
            };
            Modifier::Sort { dir }
        }
        _ => unreachable!("{:#?}", pair),
    };
    Ok(modifier)
}

fn build_selection(pair: Pair<Rule>, default_end: End) -> Result<(End, usize)> {
    let mut end = default_end;
    let mut qty = 0usize;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::end => {
                end = if inner.as_str().eq_ignore_ascii_case("h") {
                    End::High
                } else {
                    End::Low
                };
            }
            Rule::integer => {
                qty = inner.as_str().parse::<usize>().map_err(|_| {
                    Error::Configuration(format!("`{}` is not a valid amount", inner.as_str()))
                })?;
            }
            _ => unreachable!("{:#?}", inner),
        }
    }
    Ok((end, qty))
}

fn build_compare_point(pair: Pair<Rule>) -> Result<ComparePoint> {
    let mut inner = pair.into_inner();
    let op = match inner.next().unwrap().as_str() {
        "=" => CompareOp::Equal,
        "!=" => CompareOp::NotEqual,
        "<" => CompareOp::Less,
        "<=" => CompareOp::LessEqual,
        ">" => CompareOp::Greater,
        ">=" => CompareOp::GreaterEqual,
        token => unreachable!("{token}"),
    };
    let value = parse_number(&inner.next().unwrap())?;
    Ok(ComparePoint::new(op, value))
}

fn parse_number(pair: &Pair<Rule>) -> Result<f64> {
    pair.as_str()
        .parse::<f64>()
        .map_err(|_| Error::Configuration(format!("`{}` is not a valid number", pair.as_str())))
}

/// Constant-fold a qty fragment to a positive count
fn eval_qty(pair: Pair<Rule>) -> Result<u64> {
    let text = pair.as_str().trim().to_owned();
    let value = eval_count(pair)?;
    if value < 1.0 || value.fract() != 0.0 {
        return Err(Error::Configuration(format!(
            "`{text}` is not a valid dice quantity"
        )));
    }
    Ok(value as u64)
}

/// Constant-fold a sides fragment to a whole number of faces
fn eval_sides(pair: Pair<Rule>) -> Result<i64> {
    let text = pair.as_str().trim().to_owned();
    let value = eval_count(pair)?;
    if value.fract() != 0.0 {
        return Err(Error::Configuration(format!(
            "`{text}` is not a valid number of sides"
        )));
    }
    Ok(value as i64)
}

fn eval_count(pair: Pair<Rule>) -> Result<f64> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::integer => inner
            .as_str()
            .parse::<f64>()
            .map_err(|_| Error::Configuration(format!("`{}` is not a valid number", inner.as_str()))),
        Rule::paren => {
            let expr = build_expr(inner.into_inner().next().unwrap().into_inner())?;
            Evaluator::eval_const(&expr)
        }
        _ => unreachable!("{:#?}", inner),
    }
}
