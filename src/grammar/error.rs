use std::error;
use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, GrammarError>;

#[derive(Debug, Clone, PartialEq)]
pub enum GrammarError {
    /// The FOLLOW fixpoint was still changing after `passes` full passes.
    MalformedGrammar { passes: usize },
    UndefinedSymbol { symbol: String, non_terminal: String },
    InvalidInput(String),
    Parse { line: usize, message: String },
    Config(String),
    Json(String),
    Context {
        context: String,
        source: Box<GrammarError>,
    },
}

impl GrammarError {
    pub fn context(self, context: impl Into<String>) -> GrammarError {
        GrammarError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every `Context` layer peeled off.
    pub fn root(&self) -> &GrammarError {
        match self {
            GrammarError::Context { source, .. } => source.root(),
            e => e,
        }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GrammarError::MalformedGrammar { passes } => write!(
                f,
                "malformed grammar: FOLLOW sets did not converge after {} passes",
                passes
            ),
            GrammarError::UndefinedSymbol {
                symbol,
                non_terminal,
            } => write!(
                f,
                "undefined symbol \"{}\" in a production of {}",
                symbol, non_terminal
            ),
            GrammarError::InvalidInput(s) => write!(f, "invalid input: {}", s),
            GrammarError::Parse { line, message } => write!(f, "Line {}: {}", line, message),
            GrammarError::Config(s) => write!(f, "bad configuration: {}", s),
            GrammarError::Json(s) => write!(f, "json: {}", s),
            GrammarError::Context { context, source } => write!(f, "{}: {}", context, source),
        }
    }
}

impl error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            GrammarError::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GrammarError {
    fn from(err: serde_json::Error) -> GrammarError {
        GrammarError::Json(err.to_string())
    }
}
