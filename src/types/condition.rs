use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use super::field::Resolved;
use super::value::Value;

/// A single validation-rule condition with a typed operand.
///
/// Produced by [`RuleCondition::parse`] from an operator symbol and a raw
/// operand. Applying a condition never fails: an absent or mistyped value
/// simply yields `false`.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleCondition {
    Eq(Value),
    Ne(Value),
    Gt(Decimal),
    Gte(Decimal),
    Lt(Decimal),
    Lte(Decimal),
    Is(Vec<Value>),
    IsNot(Vec<Value>),
    Contains(Value),
    ContainsAny(Vec<Value>),
    ContainsAll(Vec<Value>),
    True,
    False,
}

/// Why an operator/operand pair could not be turned into a [`RuleCondition`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("operator '{operator}' expects {expected} operand")]
    InvalidOperand {
        operator: &'static str,
        expected: &'static str,
    },
}

fn number(operator: &'static str, operand: &Value) -> Result<Decimal, ConditionError> {
    operand.as_decimal().ok_or(ConditionError::InvalidOperand {
        operator,
        expected: "a numeric",
    })
}

fn list(operator: &'static str, operand: &Value) -> Result<Vec<Value>, ConditionError> {
    match operand {
        Value::List(items) => Ok(items.clone()),
        _ => Err(ConditionError::InvalidOperand {
            operator,
            expected: "a list",
        }),
    }
}

impl RuleCondition {
    /// Build a condition from an operator symbol such as `"$gte"` and its operand.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError`] for unknown operators and for operands of
    /// the wrong shape (e.g. a string passed to `$gt`, a scalar passed to `$is`).
    pub fn parse(operator: &str, operand: &Value) -> Result<Self, ConditionError> {
        Ok(match operator {
            "$eq" => RuleCondition::Eq(operand.clone()),
            "$ne" => RuleCondition::Ne(operand.clone()),
            "$gt" => RuleCondition::Gt(number("$gt", operand)?),
            "$gte" => RuleCondition::Gte(number("$gte", operand)?),
            "$lt" => RuleCondition::Lt(number("$lt", operand)?),
            "$lte" => RuleCondition::Lte(number("$lte", operand)?),
            "$is" => RuleCondition::Is(list("$is", operand)?),
            "$is_not" => RuleCondition::IsNot(list("$is_not", operand)?),
            "$contains" => {
                if operand.is_null() {
                    return Err(ConditionError::InvalidOperand {
                        operator: "$contains",
                        expected: "a non-null",
                    });
                }
                RuleCondition::Contains(operand.clone())
            }
            "$contains_any" => RuleCondition::ContainsAny(list("$contains_any", operand)?),
            "$contains_all" => RuleCondition::ContainsAll(list("$contains_all", operand)?),
            "$true" => RuleCondition::True,
            "$false" => RuleCondition::False,
            other => return Err(ConditionError::UnknownOperator(other.to_owned())),
        })
    }

    /// The operator symbol, e.g. `"$contains_any"`.
    #[must_use]
    pub fn operator(&self) -> &'static str {
        match self {
            RuleCondition::Eq(_) => "$eq",
            RuleCondition::Ne(_) => "$ne",
            RuleCondition::Gt(_) => "$gt",
            RuleCondition::Gte(_) => "$gte",
            RuleCondition::Lt(_) => "$lt",
            RuleCondition::Lte(_) => "$lte",
            RuleCondition::Is(_) => "$is",
            RuleCondition::IsNot(_) => "$is_not",
            RuleCondition::Contains(_) => "$contains",
            RuleCondition::ContainsAny(_) => "$contains_any",
            RuleCondition::ContainsAll(_) => "$contains_all",
            RuleCondition::True => "$true",
            RuleCondition::False => "$false",
        }
    }

    /// Apply this condition to a value. Absent and `null` values never match.
    #[must_use]
    pub fn apply(&self, value: Option<&Value>) -> bool {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return false;
        };
        match self {
            RuleCondition::Eq(operand) => value == operand,
            RuleCondition::Ne(operand) => value != operand,
            RuleCondition::Gt(d) => compare(value, *d) == Some(Ordering::Greater),
            RuleCondition::Gte(d) => {
                matches!(compare(value, *d), Some(Ordering::Greater | Ordering::Equal))
            }
            RuleCondition::Lt(d) => compare(value, *d) == Some(Ordering::Less),
            RuleCondition::Lte(d) => {
                matches!(compare(value, *d), Some(Ordering::Less | Ordering::Equal))
            }
            RuleCondition::Is(options) => options.contains(value),
            RuleCondition::IsNot(options) => !options.contains(value),
            RuleCondition::Contains(operand) => match (value, operand) {
                (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
                (Value::List(items), needle) => items.contains(needle),
                _ => false,
            },
            RuleCondition::ContainsAny(wanted) => value
                .as_list()
                .is_some_and(|items| items.iter().any(|v| wanted.contains(v))),
            RuleCondition::ContainsAll(wanted) => value
                .as_list()
                .is_some_and(|items| wanted.iter().all(|w| items.contains(w))),
            RuleCondition::True => *value == Value::Bool(true),
            RuleCondition::False => *value == Value::Bool(false),
        }
    }

    /// Apply this condition to a resolved field. [`Resolved::AnyOf`] matches
    /// if any candidate satisfies the condition.
    #[must_use]
    pub fn apply_resolved(&self, resolved: &Resolved) -> bool {
        match resolved {
            Resolved::Absent => false,
            Resolved::Value(v) => self.apply(Some(v)),
            Resolved::AnyOf(candidates) => candidates.iter().any(|v| self.apply(Some(v))),
        }
    }
}

fn compare(value: &Value, operand: Decimal) -> Option<Ordering> {
    value.as_decimal().map(|v| v.cmp(&operand))
}

/// Apply an operator given as a raw symbol. Unknown operators and mistyped
/// operands evaluate to `false`.
#[must_use]
pub fn apply_operator(value: Option<&Value>, operator: &str, operand: &Value) -> bool {
    RuleCondition::parse(operator, operand).is_ok_and(|cond| cond.apply(value))
}

impl fmt::Display for RuleCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.operator();
        match self {
            RuleCondition::Eq(v) | RuleCondition::Ne(v) | RuleCondition::Contains(v) => {
                write!(f, "{op} {v}")
            }
            RuleCondition::Gt(d)
            | RuleCondition::Gte(d)
            | RuleCondition::Lt(d)
            | RuleCondition::Lte(d) => write!(f, "{op} {d}"),
            RuleCondition::Is(items)
            | RuleCondition::IsNot(items)
            | RuleCondition::ContainsAny(items)
            | RuleCondition::ContainsAll(items) => write!(f, "{op} {}", Value::List(items.clone())),
            RuleCondition::True | RuleCondition::False => write!(f, "{op}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn apply(value: serde_json::Value, op: &str, operand: serde_json::Value) -> bool {
        apply_operator(Some(&v(value)), op, &v(operand))
    }

    #[test]
    fn eq_is_numeric() {
        assert!(apply(json!(10), "$eq", json!(10.0)));
        assert!(apply(json!("a"), "$eq", json!("a")));
        assert!(!apply(json!("a"), "$eq", json!("A")));
        assert!(!apply(json!(1), "$eq", json!("1")));
    }

    #[test]
    fn ne_requires_present_value() {
        assert!(apply(json!(1), "$ne", json!(2)));
        assert!(!apply(json!(1), "$ne", json!(1.00)));
        assert!(!apply_operator(None, "$ne", &v(json!(2))));
        assert!(!apply(json!(null), "$ne", json!(2)));
    }

    #[test]
    fn relational_operators() {
        assert!(apply(json!(1500), "$gte", json!(1000)));
        assert!(apply(json!(1000), "$gte", json!(1000.0)));
        assert!(!apply(json!(999.99), "$gte", json!(1000)));
        assert!(apply(json!(5), "$gt", json!(4.5)));
        assert!(apply(json!(4.5), "$lt", json!(5)));
        assert!(apply(json!(5), "$lte", json!(5)));
        assert!(!apply(json!(6), "$lte", json!(5)));
    }

    #[test]
    fn relational_on_non_numeric_is_false() {
        assert!(!apply(json!("1500"), "$gte", json!(1000)));
        assert!(!apply(json!(1500), "$gte", json!("1000")));
        assert!(!apply(json!(true), "$gt", json!(0)));
    }

    #[test]
    fn is_and_is_not() {
        assert!(apply(json!("gold"), "$is", json!(["silver", "gold"])));
        assert!(!apply(json!("bronze"), "$is", json!(["silver", "gold"])));
        assert!(apply(json!("bronze"), "$is_not", json!(["silver", "gold"])));
        assert!(!apply(json!("gold"), "$is_not", json!(["silver", "gold"])));
        assert!(!apply(json!("gold"), "$is", json!("gold")));
    }

    #[test]
    fn contains_on_strings_and_lists() {
        assert!(apply(json!("a@x.com"), "$contains", json!("@x.com")));
        assert!(!apply(json!("a@y.com"), "$contains", json!("@x.com")));
        assert!(apply(json!(["A", "B"]), "$contains", json!("B")));
        assert!(!apply(json!(["A", "B"]), "$contains", json!("C")));
        assert!(!apply(json!(42), "$contains", json!("4")));
    }

    #[test]
    fn contains_any_and_all() {
        assert!(apply(json!(["A", "B"]), "$contains_any", json!(["A", "Z"])));
        assert!(!apply(json!(["A", "B"]), "$contains_all", json!(["A", "Z"])));
        assert!(apply(json!(["A", "B", "C"]), "$contains_all", json!(["C", "A"])));
        assert!(!apply(json!("A"), "$contains_any", json!(["A"])));
    }

    #[test]
    fn boolean_flags() {
        assert!(apply(json!(true), "$true", json!(true)));
        assert!(!apply(json!("true"), "$true", json!(true)));
        assert!(apply(json!(false), "$false", json!(true)));
        assert!(!apply(json!(0), "$false", json!(true)));
    }

    #[test]
    fn unknown_operator_is_false() {
        assert!(!apply(json!(1), "$between", json!([0, 2])));
        assert_eq!(
            RuleCondition::parse("$between", &v(json!([0, 2]))),
            Err(ConditionError::UnknownOperator("$between".into()))
        );
    }

    #[test]
    fn mistyped_operands_are_rejected() {
        assert_eq!(
            RuleCondition::parse("$gt", &v(json!("10"))),
            Err(ConditionError::InvalidOperand {
                operator: "$gt",
                expected: "a numeric"
            })
        );
        assert!(matches!(
            RuleCondition::parse("$is", &v(json!("x"))),
            Err(ConditionError::InvalidOperand { operator: "$is", .. })
        ));
        assert!(RuleCondition::parse("$contains", &Value::Null).is_err());
    }

    #[test]
    fn any_of_is_existential() {
        let cond = RuleCondition::parse("$gte", &v(json!(3))).unwrap();
        assert!(cond.apply_resolved(&Resolved::AnyOf(vec![v(json!(1)), v(json!(3))])));
        assert!(!cond.apply_resolved(&Resolved::AnyOf(vec![v(json!(1)), v(json!(2))])));
        assert!(!cond.apply_resolved(&Resolved::AnyOf(vec![])));
        assert!(!cond.apply_resolved(&Resolved::Absent));
    }

    #[test]
    fn display() {
        let cond = RuleCondition::parse("$is", &v(json!(["a", "b"]))).unwrap();
        assert_eq!(cond.to_string(), "$is [\"a\", \"b\"]");
        assert_eq!(RuleCondition::True.to_string(), "$true");
        assert_eq!(RuleCondition::Gte(Decimal::from(1000)).to_string(), "$gte 1000");
    }
}
