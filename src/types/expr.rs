use std::collections::HashMap;
use std::fmt;

/// Connective between two terms of a logic expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connective::And => f.write_str("and"),
            Connective::Or => f.write_str("or"),
        }
    }
}

/// A parsed logic expression combining rule ids with `and` / `or`.
///
/// Built by [`LogicExpr::parse`]. Connectives have no relative precedence:
/// `1 and 2 or 3` folds left-to-right into `(1 and 2) or 3`. A run of terms is
/// kept flat in a [`LogicExpr::Chain`], so only parenthesised groups nest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicExpr {
    Rule(String),
    /// `first`, then each `(connective, term)` folded in order.
    Chain(Box<LogicExpr>, Vec<(Connective, LogicExpr)>),
}

impl fmt::Display for LogicExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicExpr::Rule(id) => write!(f, "{id}"),
            LogicExpr::Chain(first, rest) => {
                for _ in rest {
                    f.write_str("(")?;
                }
                write!(f, "{first}")?;
                for (conn, next) in rest {
                    write!(f, " {conn} {next})")?;
                }
                Ok(())
            }
        }
    }
}

impl LogicExpr {
    /// Parse a logic string such as `"1 and (2 or 3)"`.
    ///
    /// # Errors
    ///
    /// Returns [`LogicParseError`](crate::LogicParseError) if the input is
    /// empty, has unbalanced or too deeply nested parentheses, or places
    /// connectives incorrectly.
    pub fn parse(input: &str) -> Result<Self, crate::LogicParseError> {
        crate::parse::parse_logic(input)
    }

    #[must_use]
    pub fn rule(id: &str) -> Self {
        LogicExpr::Rule(id.to_owned())
    }

    #[must_use]
    pub fn and(self, other: LogicExpr) -> LogicExpr {
        self.then(Connective::And, other)
    }

    #[must_use]
    pub fn or(self, other: LogicExpr) -> LogicExpr {
        self.then(Connective::Or, other)
    }

    /// Append `other` to this expression's left fold.
    #[must_use]
    pub fn then(self, conn: Connective, other: LogicExpr) -> LogicExpr {
        match self {
            LogicExpr::Chain(first, mut rest) => {
                rest.push((conn, other));
                LogicExpr::Chain(first, rest)
            }
            rule @ LogicExpr::Rule(_) => LogicExpr::Chain(Box::new(rule), vec![(conn, other)]),
        }
    }

    /// Evaluate with a lookup from rule id to its precomputed result.
    pub fn evaluate(&self, lookup: &impl Fn(&str) -> bool) -> bool {
        match self {
            LogicExpr::Rule(id) => lookup(id),
            LogicExpr::Chain(first, rest) => {
                let mut acc = first.evaluate(lookup);
                for (conn, next) in rest {
                    acc = match conn {
                        Connective::And => acc && next.evaluate(lookup),
                        Connective::Or => acc || next.evaluate(lookup),
                    };
                }
                acc
            }
        }
    }

    /// Evaluate against a map of rule results. Missing ids read as `false`.
    #[must_use]
    pub fn evaluate_map(&self, results: &HashMap<String, bool>) -> bool {
        self.evaluate(&|id| results.get(id).copied().unwrap_or(false))
    }

    /// Rule ids referenced by this expression, left to right, with repeats.
    #[must_use]
    pub fn rule_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_ids(self, &mut out);
        out
    }
}

fn collect_ids<'a>(expr: &'a LogicExpr, out: &mut Vec<&'a str>) {
    match expr {
        LogicExpr::Rule(id) => out.push(id),
        LogicExpr::Chain(first, rest) => {
            collect_ids(first, out);
            for (_, next) in rest {
                collect_ids(next, out);
            }
        }
    }
}
