use std::collections::HashMap;
use std::time::Instant;

use crate::types::{resolve, CompiledRule, Logic, RuleCheck};
use crate::{Context, EvaluationOptions, EvaluationReport, RuleOutcome, ValidationRules};

pub(crate) fn evaluate(rules: &ValidationRules, ctx: &Context, opts: &EvaluationOptions) -> bool {
    let outcomes: Vec<RuleOutcome> = rules
        .rules
        .iter()
        .map(|rule| rule_outcome(rule, ctx, opts))
        .collect();
    combine(rules, &outcomes)
}

pub(crate) fn evaluate_detailed(
    rules: &ValidationRules,
    ctx: &Context,
    opts: &EvaluationOptions,
) -> EvaluationReport {
    let start = Instant::now();
    let outcomes: Vec<RuleOutcome> = rules
        .rules
        .iter()
        .map(|rule| rule_outcome(rule, ctx, opts))
        .collect();
    let result = combine(rules, &outcomes);
    let duration = start.elapsed();

    let named = rules
        .rules
        .iter()
        .zip(outcomes)
        .map(|(rule, outcome)| (rule.id.clone(), outcome))
        .collect();
    EvaluationReport::new(
        result,
        named,
        matches!(rules.logic, Logic::Fallback),
        duration,
    )
}

fn rule_outcome(rule: &CompiledRule, ctx: &Context, opts: &EvaluationOptions) -> RuleOutcome {
    if let Some(path) = rule.path.as_deref() {
        if !opts.admits(path) {
            tracing::debug!(rule = %rule.id, field = path, "rule outside allowed prefixes, skipped");
            return RuleOutcome::Skipped;
        }
    }
    match &rule.check {
        RuleCheck::Malformed(_) => RuleOutcome::Malformed,
        RuleCheck::Condition { field, condition } => {
            if condition.apply_resolved(&resolve(field, ctx)) {
                RuleOutcome::Passed
            } else {
                RuleOutcome::Failed
            }
        }
    }
}

fn combine(rules: &ValidationRules, outcomes: &[RuleOutcome]) -> bool {
    match &rules.logic {
        Logic::Unsatisfiable => false,
        Logic::AllOf | Logic::Fallback => outcomes.iter().all(|o| o.as_bool()),
        Logic::Expr(expr) => {
            let results: HashMap<&str, bool> = rules
                .rules
                .iter()
                .zip(outcomes)
                .map(|(rule, outcome)| (rule.id.as_str(), outcome.as_bool()))
                .collect();
            expr.evaluate(&|id| results.get(id).copied().unwrap_or(false))
        }
    }
}
