use std::fmt;

use super::context::Context;
use super::error::PayloadError;
use super::evaluation_report::EvaluationReport;
use super::expr::LogicExpr;
use super::options::EvaluationOptions;
use super::rule::CompiledRule;

/// How per-rule results are combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Logic {
    /// No logic string: AND over every rule.
    AllOf,
    /// A logic string that could not be used; behaves like `AllOf`.
    Fallback,
    Expr(LogicExpr),
    /// The payload itself was unusable; always `false`.
    Unsatisfiable,
}

/// A compiled, immutable set of validation rules. Thread-safe and designed to
/// live behind `Arc`.
///
/// # Example
///
/// ```
/// use eligo::{Context, Customer, Order, ValidationRules, Voucher};
/// use serde_json::json;
///
/// let rules = ValidationRules::from_json(&json!({
///     "rules": {
///         "1": {"name": "order.amount", "conditions": {"$gte": 1000}},
///         "2": {"name": "customer.email", "conditions": {"$contains": "@x.com"}}
///     },
///     "logic": "1 and 2"
/// }))
/// .unwrap();
///
/// let ctx = Context::new(Voucher::new("SUMMER"))
///     .with_customer(Customer::new().with_email("a@x.com"))
///     .with_order(Order::new(1500));
/// assert!(rules.evaluate(&ctx));
/// ```
#[derive(Debug, Clone)]
pub struct ValidationRules {
    pub(crate) rules: Vec<CompiledRule>,
    pub(crate) logic: Logic,
    pub(crate) diagnostics: Vec<PayloadError>,
}

impl ValidationRules {
    /// Compile a rule payload, rejecting any structural problem.
    ///
    /// # Errors
    ///
    /// Returns the first [`PayloadError`] found.
    pub fn from_json(payload: &serde_json::Value) -> Result<Self, PayloadError> {
        let compiled = crate::compile::compile(payload);
        match compiled.diagnostics.first() {
            Some(err) => Err(err.clone()),
            None => Ok(compiled),
        }
    }

    /// Compile a rule payload without failing. Malformed rules evaluate to
    /// `false` and unusable logic falls back to AND; the problems are kept in
    /// [`diagnostics()`](Self::diagnostics).
    #[must_use]
    pub fn from_json_lenient(payload: &serde_json::Value) -> Self {
        crate::compile::compile(payload)
    }

    /// Parse JSON text and compile it strictly.
    ///
    /// # Errors
    ///
    /// Returns [`EligoError`](crate::EligoError) on invalid JSON or an invalid payload.
    pub fn from_json_str(input: &str) -> Result<Self, crate::EligoError> {
        let payload: serde_json::Value = serde_json::from_str(input)?;
        Ok(Self::from_json(&payload)?)
    }

    /// Evaluate every rule against the context.
    #[must_use]
    pub fn evaluate(&self, ctx: &Context) -> bool {
        self.evaluate_with(ctx, &EvaluationOptions::default())
    }

    /// Evaluate with the given options (e.g. a namespace allow-list).
    #[must_use]
    pub fn evaluate_with(&self, ctx: &Context, opts: &EvaluationOptions) -> bool {
        crate::evaluate::evaluate(self, ctx, opts)
    }

    /// Evaluate with per-rule diagnostics.
    pub fn evaluate_detailed(&self, ctx: &Context, opts: &EvaluationOptions) -> EvaluationReport {
        crate::evaluate::evaluate_detailed(self, ctx, opts)
    }

    /// Compiled rules in payload order.
    #[must_use]
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// The parsed logic expression, if the payload carried a usable one.
    #[must_use]
    pub fn logic(&self) -> Option<&LogicExpr> {
        match &self.logic {
            Logic::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Problems found during compilation, in discovery order.
    #[must_use]
    pub fn diagnostics(&self) -> &[PayloadError] {
        &self.diagnostics
    }
}

impl fmt::Display for ValidationRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let malformed = self.rules.iter().filter(|r| r.is_malformed()).count();
        write!(f, "ValidationRules({} rules", self.rules.len())?;
        if malformed > 0 {
            write!(f, ", {malformed} malformed")?;
        }
        match &self.logic {
            Logic::Expr(expr) => write!(f, ", logic {expr})"),
            Logic::AllOf | Logic::Fallback => write!(f, ", all of)"),
            Logic::Unsatisfiable => write!(f, ", unsatisfiable)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strict_rejects_first_problem() {
        let err = ValidationRules::from_json(&json!({
            "rules": {
                "1": {"name": "order.amount", "conditions": {}},
                "2": {"name": "order.amount", "conditions": {"$gt": 1, "$lt": 5}}
            }
        }))
        .unwrap_err();
        assert_eq!(err, PayloadError::NoOperator { rule: "1".into() });
    }

    #[test]
    fn lenient_keeps_all_diagnostics() {
        let rules = ValidationRules::from_json_lenient(&json!({
            "rules": {
                "1": {"name": "order.amount", "conditions": {}},
                "2": {"name": "order.amount", "conditions": {"$gt": 1, "$lt": 5}},
                "3": {"name": "order.amount", "conditions": {"$gt": 1}}
            }
        }));
        assert_eq!(rules.diagnostics().len(), 2);
        assert_eq!(rules.rules().len(), 3);
        assert!(rules.rules()[0].is_malformed());
        assert!(!rules.rules()[2].is_malformed());
    }

    #[test]
    fn from_json_str_reports_bad_json() {
        assert!(matches!(
            ValidationRules::from_json_str("{not json"),
            Err(crate::EligoError::Json(_))
        ));
    }

    #[test]
    fn display() {
        let rules = ValidationRules::from_json(&json!({
            "rules": {
                "1": {"name": "order.amount", "conditions": {"$gte": 1000}},
                "2": {"name": "customer.email", "conditions": {"$contains": "@x.com"}}
            },
            "logic": "1 and 2"
        }))
        .unwrap();
        assert_eq!(rules.to_string(), "ValidationRules(2 rules, logic (1 and 2))");
    }
}
