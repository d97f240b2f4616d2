use crate::parser;

/// Crate Error type
#[derive(Debug)]
pub enum Error {
    /// Notation text does not match the grammar
    Parse(Box<pest::error::Error<parser::Rule>>),
    /// Invalid roll configuration, raised at construction time
    Configuration(String),
    /// Arithmetic failure while reducing an expression
    Evaluation(String),
}

impl Error {
    /// Parse failure pointing at a span of the input
    pub(crate) fn parse_at(message: impl Into<String>, span: pest::Span<'_>) -> Self {
        Self::Parse(Box::new(pest::error::Error::new_from_span(
            pest::error::ErrorVariant::CustomError {
                message: message.into(),
            },
            span,
        )))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Configuration(e) => write!(f, "{e}"),
            Self::Evaluation(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<pest::error::Error<parser::Rule>> for Error {
    fn from(value: pest::error::Error<parser::Rule>) -> Self {
        Self::Parse(Box::new(value))
    }
}

/// Crate Result type
pub type Result<T> = std::result::Result<T, Error>;
