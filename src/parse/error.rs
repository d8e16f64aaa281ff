use thiserror::Error;

/// Errors produced when parsing a logic expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicParseError {
    #[error("logic parse error: {message}")]
    Syntax { message: String },

    #[error("logic nests parentheses {depth} deep, at most {limit} allowed")]
    TooDeep { depth: usize, limit: usize },

    #[error("logic must be a string")]
    NotAString,
}
