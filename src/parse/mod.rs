mod error;
mod grammar;

pub use error::LogicParseError;

use crate::LogicExpr;

/// Deepest parenthesis nesting the grammar will descend into.
pub const MAX_NESTING: usize = 64;

/// Parse a logic expression string into a [`LogicExpr`].
///
/// # Errors
///
/// Returns [`LogicParseError`] if the input is not a valid expression or
/// nests parentheses deeper than [`MAX_NESTING`].
pub fn parse_logic(input: &str) -> Result<LogicExpr, LogicParseError> {
    use winnow::Parser;
    let depth = nesting(input);
    if depth > MAX_NESTING {
        return Err(LogicParseError::TooDeep {
            depth,
            limit: MAX_NESTING,
        });
    }
    grammar::logic
        .parse(input)
        .map_err(|e| LogicParseError::Syntax {
            message: e.to_string(),
        })
}

/// Maximum count of open parentheses at any point. Unbalanced input is left
/// for the grammar to reject.
fn nesting(input: &str) -> usize {
    let mut open = 0usize;
    let mut max = 0;
    for c in input.chars() {
        match c {
            '(' => {
                open += 1;
                max = max.max(open);
            }
            ')' => open = open.saturating_sub(1),
            _ => {}
        }
    }
    max
}
