use std::collections::HashSet;

use rust_decimal::Decimal;
use serde_json::Map;

use crate::types::{CompiledRule, Logic};
use crate::{LogicExpr, LogicParseError, PayloadError, RuleCondition, ValidationRules, Value};

const LEGACY_TOTAL: &str = "redemptions.count.total";
const LEGACY_PER_CUSTOMER: &str = "redemptions.count.per_customer";

/// Compile a payload, collecting every problem instead of stopping at the first.
pub(crate) fn compile(payload: &serde_json::Value) -> ValidationRules {
    let mut diagnostics = Vec::new();

    let compiled = match payload.as_object() {
        None => {
            diagnostics.push(PayloadError::NotAnObject);
            ValidationRules {
                rules: Vec::new(),
                logic: Logic::Unsatisfiable,
                diagnostics: Vec::new(),
            }
        }
        Some(obj) if obj.contains_key("rules") => compile_general(obj, &mut diagnostics),
        Some(obj) => match obj.get("redemptions") {
            Some(legacy) => compile_legacy(legacy, &mut diagnostics),
            None => ValidationRules {
                rules: Vec::new(),
                logic: Logic::AllOf,
                diagnostics: Vec::new(),
            },
        },
    };

    for err in &diagnostics {
        tracing::warn!(error = %err, "malformed validation rule payload");
    }

    ValidationRules {
        diagnostics,
        ..compiled
    }
}

fn compile_general(
    obj: &Map<String, serde_json::Value>,
    diagnostics: &mut Vec<PayloadError>,
) -> ValidationRules {
    let Some(entries) = obj.get("rules").and_then(serde_json::Value::as_object) else {
        diagnostics.push(PayloadError::RulesNotAnObject);
        return ValidationRules {
            rules: Vec::new(),
            logic: Logic::Unsatisfiable,
            diagnostics: Vec::new(),
        };
    };

    let rules: Vec<CompiledRule> = entries
        .iter()
        .map(|(id, entry)| {
            compile_rule(id, entry).unwrap_or_else(|(path, err)| {
                diagnostics.push(err.clone());
                CompiledRule::malformed(id, path.as_deref(), err)
            })
        })
        .collect();

    let logic = compile_logic(obj.get("logic"), &rules, diagnostics);

    ValidationRules {
        rules,
        logic,
        diagnostics: Vec::new(),
    }
}

/// On failure, returns the rule's field path (when one was readable) with the error.
fn compile_rule(
    id: &str,
    entry: &serde_json::Value,
) -> Result<CompiledRule, (Option<String>, PayloadError)> {
    let Some(entry) = entry.as_object() else {
        return Err((None, PayloadError::RuleNotAnObject { rule: id.to_owned() }));
    };
    let Some(path) = entry.get("name").and_then(serde_json::Value::as_str) else {
        return Err((None, PayloadError::MissingName { rule: id.to_owned() }));
    };
    let fail = |err| Err((Some(path.to_owned()), err));

    let Some(conditions) = entry.get("conditions").and_then(serde_json::Value::as_object) else {
        return fail(PayloadError::MissingConditions { rule: id.to_owned() });
    };

    let mut operators = conditions.iter();
    let (operator, operand) = match (operators.next(), conditions.len()) {
        (None, _) => return fail(PayloadError::NoOperator { rule: id.to_owned() }),
        (Some(first), 1) => first,
        (Some(_), _) => {
            return fail(PayloadError::MultipleOperators {
                rule: id.to_owned(),
                operators: conditions.keys().cloned().collect(),
            })
        }
    };

    match RuleCondition::parse(operator, &Value::from(operand)) {
        Ok(condition) => Ok(CompiledRule::new(id, path, condition)),
        Err(source) => fail(PayloadError::Condition {
            rule: id.to_owned(),
            source,
        }),
    }
}

fn compile_logic(
    raw: Option<&serde_json::Value>,
    rules: &[CompiledRule],
    diagnostics: &mut Vec<PayloadError>,
) -> Logic {
    let text = match raw {
        None | Some(serde_json::Value::Null) => return Logic::AllOf,
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => return Logic::AllOf,
        Some(serde_json::Value::String(s)) => s.as_str(),
        Some(other) => {
            diagnostics.push(PayloadError::InvalidLogic {
                logic: other.to_string(),
                source: LogicParseError::NotAString,
            });
            tracing::debug!(logic = %other, "non-string logic, falling back to AND of all rules");
            return Logic::Fallback;
        }
    };

    match LogicExpr::parse(text) {
        Ok(expr) => {
            let known: HashSet<&str> = rules.iter().map(CompiledRule::id).collect();
            let mut reported = HashSet::new();
            for reference in expr.rule_ids() {
                if !known.contains(reference) && reported.insert(reference) {
                    diagnostics.push(PayloadError::UndefinedRuleRef {
                        reference: reference.to_owned(),
                    });
                }
            }
            Logic::Expr(expr)
        }
        Err(source) => {
            tracing::debug!(logic = text, error = %source, "unparsable logic, falling back to AND of all rules");
            diagnostics.push(PayloadError::InvalidLogic {
                logic: text.to_owned(),
                source,
            });
            Logic::Fallback
        }
    }
}

/// `{ "redemptions": { "quantity"?, "per_customer"? } }` becomes one rule per
/// present threshold: the matching counter must stay below it.
fn compile_legacy(
    legacy: &serde_json::Value,
    diagnostics: &mut Vec<PayloadError>,
) -> ValidationRules {
    let Some(thresholds) = legacy.as_object() else {
        diagnostics.push(PayloadError::NotAnObject);
        return ValidationRules {
            rules: Vec::new(),
            logic: Logic::Unsatisfiable,
            diagnostics: Vec::new(),
        };
    };

    let mut rules = Vec::new();
    for (key, path) in [("quantity", LEGACY_TOTAL), ("per_customer", LEGACY_PER_CUSTOMER)] {
        match thresholds.get(key) {
            None | Some(serde_json::Value::Null) => {}
            Some(raw) => match threshold(raw) {
                Some(limit) => rules.push(CompiledRule::new(key, path, RuleCondition::Lt(limit))),
                None => {
                    let err = PayloadError::InvalidThreshold {
                        key: key.to_owned(),
                    };
                    diagnostics.push(err.clone());
                    rules.push(CompiledRule::malformed(key, Some(path), err));
                }
            },
        }
    }

    ValidationRules {
        rules,
        logic: Logic::AllOf,
        diagnostics: Vec::new(),
    }
}

/// A non-negative whole number, written either way (`1` or `1.0`).
fn threshold(raw: &serde_json::Value) -> Option<Decimal> {
    Value::from(raw)
        .as_decimal()
        .filter(|d| !d.is_sign_negative() && d.fract().is_zero())
}
