use super::condition::RuleCondition;
use super::error::PayloadError;
use super::field::FieldRef;

/// A validation rule whose field path has been resolved to a [`FieldRef`] and
/// whose condition has been parsed.
///
/// Produced by the compilation step and stored inside
/// [`ValidationRules`](super::ValidationRules) in payload order.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub(crate) id: String,
    /// The field path as written in the payload, if the entry had one.
    pub(crate) path: Option<String>,
    pub(crate) check: RuleCheck,
}

#[derive(Debug, Clone)]
pub(crate) enum RuleCheck {
    Condition {
        field: FieldRef,
        condition: RuleCondition,
    },
    /// Rejected during compilation; always evaluates to `false`.
    Malformed(PayloadError),
}

impl CompiledRule {
    pub(crate) fn new(id: &str, path: &str, condition: RuleCondition) -> Self {
        Self {
            id: id.to_owned(),
            path: Some(path.to_owned()),
            check: RuleCheck::Condition {
                field: FieldRef::parse(path),
                condition,
            },
        }
    }

    pub(crate) fn malformed(id: &str, path: Option<&str>, error: PayloadError) -> Self {
        Self {
            id: id.to_owned(),
            path: path.map(str::to_owned),
            check: RuleCheck::Malformed(error),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The parsed condition, or `None` if the rule is malformed.
    #[must_use]
    pub fn condition(&self) -> Option<&RuleCondition> {
        match &self.check {
            RuleCheck::Condition { condition, .. } => Some(condition),
            RuleCheck::Malformed(_) => None,
        }
    }

    /// The resolved field, or `None` if the rule is malformed.
    #[must_use]
    pub fn field(&self) -> Option<&FieldRef> {
        match &self.check {
            RuleCheck::Condition { field, .. } => Some(field),
            RuleCheck::Malformed(_) => None,
        }
    }

    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self.check, RuleCheck::Malformed(_))
    }
}
