use crate::dice::Dice;
use crate::group::Group;

/// Node of a parsed roll expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Value(f64),
    Dice(Dice),
    Group(Group),
    Paren(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Function {
        function: Function,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Collect every dice entity reachable from this node, in notation order
    pub(crate) fn collect_dice<'a>(&'a self, out: &mut Vec<&'a Dice>) {
        match self {
            Expr::Value(_) => (),
            Expr::Dice(dice) => out.push(dice),
            Expr::Group(group) => {
                for sub in group.expressions() {
                    sub.collect_dice(out);
                }
            }
            Expr::Paren(inner) => inner.collect_dice(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_dice(out);
                rhs.collect_dice(out);
            }
            Expr::Function { args, .. } => {
                for arg in args {
                    arg.collect_dice(out);
                }
            }
        }
    }
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

/// Math function dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Abs,
    Ceil,
    Cos,
    Exp,
    Floor,
    Log,
    Round,
    Sign,
    Sin,
    Sqrt,
    Tan,
    Pow,
    Max,
    Min,
}

impl Function {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        let function = match name {
            "abs" => Self::Abs,
            "ceil" => Self::Ceil,
            "cos" => Self::Cos,
            "exp" => Self::Exp,
            "floor" => Self::Floor,
            "log" => Self::Log,
            "round" => Self::Round,
            "sign" => Self::Sign,
            "sin" => Self::Sin,
            "sqrt" => Self::Sqrt,
            "tan" => Self::Tan,
            "pow" => Self::Pow,
            "max" => Self::Max,
            "min" => Self::Min,
            _ => return None,
        };
        Some(function)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Ceil => "ceil",
            Self::Cos => "cos",
            Self::Exp => "exp",
            Self::Floor => "floor",
            Self::Log => "log",
            Self::Round => "round",
            Self::Sign => "sign",
            Self::Sin => "sin",
            Self::Sqrt => "sqrt",
            Self::Tan => "tan",
            Self::Pow => "pow",
            Self::Max => "max",
            Self::Min => "min",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::Pow | Self::Max | Self::Min => 2,
            _ => 1,
        }
    }

    /// Apply to already-reduced operands; arity is checked at parse time
    pub(crate) fn apply(&self, args: &[f64]) -> f64 {
        match self {
            Self::Abs => args[0].abs(),
            Self::Ceil => args[0].ceil(),
            Self::Cos => args[0].cos(),
            Self::Exp => args[0].exp(),
            Self::Floor => args[0].floor(),
            Self::Log => args[0].ln(),
            Self::Round => args[0].round(),
            Self::Sign => match args[0] {
                v if v > 0.0 => 1.0,
                v if v < 0.0 => -1.0,
                _ => 0.0,
            },
            Self::Sin => args[0].sin(),
            Self::Sqrt => args[0].sqrt(),
            Self::Tan => args[0].tan(),
            Self::Pow => args[0].powf(args[1]),
            Self::Max => args[0].max(args[1]),
            Self::Min => args[0].min(args[1]),
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
