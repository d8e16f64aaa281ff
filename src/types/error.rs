use thiserror::Error;

use super::condition::ConditionError;
use crate::parse::LogicParseError;

/// Structural problems found while compiling a validation-rule payload.
///
/// Strict compilation ([`ValidationRules::from_json`](super::ValidationRules::from_json))
/// returns the first of these; lenient compilation records them as
/// diagnostics and fails the offending rule closed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("rule payload must be a JSON object")]
    NotAnObject,

    #[error("'rules' must be an object keyed by rule id")]
    RulesNotAnObject,

    #[error("rule '{rule}' must be an object")]
    RuleNotAnObject { rule: String },

    #[error("rule '{rule}' has no string 'name'")]
    MissingName { rule: String },

    #[error("rule '{rule}' has no 'conditions' object")]
    MissingConditions { rule: String },

    #[error("rule '{rule}' has no operator in its conditions")]
    NoOperator { rule: String },

    #[error("rule '{rule}' has more than one operator: {}", operators.join(", "))]
    MultipleOperators { rule: String, operators: Vec<String> },

    #[error("rule '{rule}': {source}")]
    Condition {
        rule: String,
        #[source]
        source: ConditionError,
    },

    #[error("redemption threshold '{key}' must be a non-negative integer")]
    InvalidThreshold { key: String },

    #[error("invalid logic '{logic}': {source}")]
    InvalidLogic {
        logic: String,
        #[source]
        source: LogicParseError,
    },

    #[error("logic references undefined rule '{reference}'")]
    UndefinedRuleRef { reference: String },
}

impl PayloadError {
    /// The rule id this error concerns, if it concerns a single rule.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        match self {
            PayloadError::RuleNotAnObject { rule }
            | PayloadError::MissingName { rule }
            | PayloadError::MissingConditions { rule }
            | PayloadError::NoOperator { rule }
            | PayloadError::MultipleOperators { rule, .. }
            | PayloadError::Condition { rule, .. } => Some(rule),
            _ => None,
        }
    }
}
