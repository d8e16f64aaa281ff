use std::fmt;
use std::time::Duration;

/// How a single rule fared during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Passed,
    Failed,
    /// Outside the allow-list; counts as satisfied.
    Skipped,
    /// Rejected at compile time; counts as failed.
    Malformed,
}

impl RuleOutcome {
    /// The boolean fed into the logic expression for this rule.
    #[must_use]
    pub fn as_bool(self) -> bool {
        matches!(self, RuleOutcome::Passed | RuleOutcome::Skipped)
    }
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleOutcome::Passed => "passed",
            RuleOutcome::Failed => "failed",
            RuleOutcome::Skipped => "skipped",
            RuleOutcome::Malformed => "malformed",
        };
        f.write_str(s)
    }
}

/// Detailed evaluation report returned by
/// [`ValidationRules::evaluate_detailed()`](super::ValidationRules::evaluate_detailed).
///
/// Contains the overall result, each rule's outcome in payload order,
/// whether the logic expression fell back to AND-of-all-rules, and the
/// wall-clock duration of the evaluation.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    result: bool,
    outcomes: Vec<(String, RuleOutcome)>,
    logic_fallback: bool,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        result: bool,
        outcomes: Vec<(String, RuleOutcome)>,
        logic_fallback: bool,
        duration: Duration,
    ) -> Self {
        Self {
            result,
            outcomes,
            logic_fallback,
            duration,
        }
    }

    /// The evaluation result, same as [`ValidationRules::evaluate_with()`](super::ValidationRules::evaluate_with).
    #[must_use]
    pub fn result(&self) -> bool {
        self.result
    }

    /// Each rule id with its outcome, in payload order.
    #[must_use]
    pub fn outcomes(&self) -> &[(String, RuleOutcome)] {
        &self.outcomes
    }

    /// The outcome of one rule, if present.
    #[must_use]
    pub fn outcome(&self, id: &str) -> Option<RuleOutcome> {
        self.outcomes
            .iter()
            .find(|(rule, _)| rule == id)
            .map(|(_, outcome)| *outcome)
    }

    /// Whether an unusable logic string was replaced by AND-of-all-rules.
    #[must_use]
    pub fn logic_fallback(&self) -> bool {
        self.logic_fallback
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "result: {}", self.result)?;
        let rules: Vec<String> = self
            .outcomes
            .iter()
            .map(|(id, outcome)| format!("{id}={outcome}"))
            .collect();
        write!(f, ", rules: [{}]", rules.join(", "))?;
        if self.logic_fallback {
            write!(f, ", logic: fallback")?;
        }
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_accessors() {
        let report = EvaluationReport::new(
            true,
            vec![
                ("1".into(), RuleOutcome::Passed),
                ("2".into(), RuleOutcome::Skipped),
            ],
            false,
            Duration::from_nanos(500),
        );

        assert!(report.result());
        assert_eq!(report.outcome("2"), Some(RuleOutcome::Skipped));
        assert_eq!(report.outcome("3"), None);
        assert_eq!(report.outcomes().len(), 2);
        assert!(!report.logic_fallback());
        assert_eq!(report.duration(), Duration::from_nanos(500));
    }

    #[test]
    fn report_display() {
        let report = EvaluationReport::new(
            false,
            vec![
                ("1".into(), RuleOutcome::Failed),
                ("2".into(), RuleOutcome::Malformed),
            ],
            true,
            Duration::from_nanos(100),
        );
        let s = report.to_string();
        assert!(s.contains("result: false"));
        assert!(s.contains("rules: [1=failed, 2=malformed]"));
        assert!(s.contains("logic: fallback"));
    }

    #[test]
    fn outcome_as_bool() {
        assert!(RuleOutcome::Passed.as_bool());
        assert!(RuleOutcome::Skipped.as_bool());
        assert!(!RuleOutcome::Failed.as_bool());
        assert!(!RuleOutcome::Malformed.as_bool());
    }
}
