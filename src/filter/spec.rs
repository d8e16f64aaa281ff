use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::query::FilterQueryError;
use super::subject::Subject;

/// Operators accepted in `filters[<field>][conditions][$<op>]` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Is,
    In,
    IsNot,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
    MoreThan,
    LessThan,
    MoreThanEqual,
    LessThanEqual,
    HasValue,
    IsUnknown,
}

impl FilterOperator {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Is => "$is",
            FilterOperator::In => "$in",
            FilterOperator::IsNot => "$is_not",
            FilterOperator::NotIn => "$not_in",
            FilterOperator::Contains => "$contains",
            FilterOperator::StartsWith => "$starts_with",
            FilterOperator::EndsWith => "$ends_with",
            FilterOperator::MoreThan => "$more_than",
            FilterOperator::LessThan => "$less_than",
            FilterOperator::MoreThanEqual => "$more_than_equal",
            FilterOperator::LessThanEqual => "$less_than_equal",
            FilterOperator::HasValue => "$has_value",
            FilterOperator::IsUnknown => "$is_unknown",
        }
    }

    /// Presence flags ignore their value.
    #[must_use]
    pub fn is_flag(self) -> bool {
        matches!(self, FilterOperator::HasValue | FilterOperator::IsUnknown)
    }
}

impl FromStr for FilterOperator {
    type Err = FilterQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "$is" => FilterOperator::Is,
            "$in" => FilterOperator::In,
            "$is_not" => FilterOperator::IsNot,
            "$not_in" => FilterOperator::NotIn,
            "$contains" => FilterOperator::Contains,
            "$starts_with" => FilterOperator::StartsWith,
            "$ends_with" => FilterOperator::EndsWith,
            "$more_than" => FilterOperator::MoreThan,
            "$less_than" => FilterOperator::LessThan,
            "$more_than_equal" => FilterOperator::MoreThanEqual,
            "$less_than_equal" => FilterOperator::LessThanEqual,
            "$has_value" => FilterOperator::HasValue,
            "$is_unknown" => FilterOperator::IsUnknown,
            other => {
                return Err(FilterQueryError::UnknownOperator {
                    operator: other.to_owned(),
                })
            }
        })
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conditions on a single field.
///
/// Exact-match operators accumulate into sets (`$is` with `$in`, `$is_not`
/// with `$not_in`); pattern and relational operators keep their values in
/// insertion order. A spec with nothing configured leaves the field unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
    contains: Vec<String>,
    starts_with: Vec<String>,
    ends_with: Vec<String>,
    more_than: Vec<String>,
    less_than: Vec<String>,
    more_than_equal: Vec<String>,
    less_than_equal: Vec<String>,
    has_value: bool,
    is_unknown: bool,
}

impl FilterSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition. Flags ignore `value`.
    #[must_use]
    pub fn with(mut self, op: FilterOperator, value: impl Into<String>) -> Self {
        self.add(op, value);
        self
    }

    /// Set a presence flag (`$has_value` or `$is_unknown`).
    #[must_use]
    pub fn with_flag(self, op: FilterOperator) -> Self {
        self.with(op, String::new())
    }

    pub fn add(&mut self, op: FilterOperator, value: impl Into<String>) {
        let value = value.into();
        match op {
            FilterOperator::Is | FilterOperator::In => {
                self.include.insert(value);
            }
            FilterOperator::IsNot | FilterOperator::NotIn => {
                self.exclude.insert(value);
            }
            FilterOperator::Contains => self.contains.push(value),
            FilterOperator::StartsWith => self.starts_with.push(value),
            FilterOperator::EndsWith => self.ends_with.push(value),
            FilterOperator::MoreThan => self.more_than.push(value),
            FilterOperator::LessThan => self.less_than.push(value),
            FilterOperator::MoreThanEqual => self.more_than_equal.push(value),
            FilterOperator::LessThanEqual => self.less_than_equal.push(value),
            FilterOperator::HasValue => self.has_value = true,
            FilterOperator::IsUnknown => self.is_unknown = true,
        }
    }

    /// No condition configured: the field is unfiltered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_value && !self.is_unknown && self.exclude.is_empty() && !self.has_include()
    }

    fn has_include(&self) -> bool {
        !(self.include.is_empty()
            && self.contains.is_empty()
            && self.starts_with.is_empty()
            && self.ends_with.is_empty()
            && self.more_than.is_empty()
            && self.less_than.is_empty()
            && self.more_than_equal.is_empty()
            && self.less_than_equal.is_empty())
    }

    /// Whether the subject passes this spec.
    #[must_use]
    pub fn matches(&self, subject: &Subject<'_>) -> bool {
        if subject.is_blank() {
            return self.is_unknown || !(self.has_value || self.has_include());
        }
        match subject {
            Subject::One(v) => self.matches_candidate(v),
            Subject::Many(vs) => vs.iter().any(|v| self.matches_candidate(v)),
            Subject::Absent => false,
        }
    }

    fn matches_candidate(&self, value: &str) -> bool {
        if self.is_unknown {
            return false;
        }
        if self.has_value && value.trim().is_empty() {
            return false;
        }
        if self.exclude.contains(value) {
            return false;
        }
        if !self.has_include() {
            return true;
        }
        if self.include.contains(value) {
            return true;
        }

        let v = value.to_lowercase();
        any_pattern(&v, &self.contains, |v, p| v.contains(p))
            || any_pattern(&v, &self.starts_with, |v, p| v.starts_with(p))
            || any_pattern(&v, &self.ends_with, |v, p| v.ends_with(p))
            || any_pattern(&v, &self.more_than, |v, p| v > p)
            || any_pattern(&v, &self.less_than, |v, p| v < p)
            || any_pattern(&v, &self.more_than_equal, |v, p| v >= p)
            || any_pattern(&v, &self.less_than_equal, |v, p| v <= p)
    }
}

/// `value` is already lowercased.
fn any_pattern(value: &str, patterns: &[String], test: impl Fn(&str, &str) -> bool) -> bool {
    patterns.iter().any(|p| test(value, &p.to_lowercase()))
}
