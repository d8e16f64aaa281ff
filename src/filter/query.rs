use thiserror::Error;
use winnow::combinator::{delimited, preceded, repeat};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::take_while;

use super::sort::SortKey;
use super::spec::FilterOperator;
use super::{FilterSet, Junction};

/// Errors from [`FilterSet::from_query`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterQueryError {
    #[error("malformed filter key `{key}`")]
    MalformedKey { key: String },

    #[error("unknown filter operator `{operator}`")]
    UnknownOperator { operator: String },

    #[error("invalid junction `{value}`, expected `and` or `or`")]
    InvalidJunction { value: String },
}

/// A recognised `filters[..]` key.
#[derive(Debug, PartialEq, Eq)]
enum FilterKey<'a> {
    Junction,
    Condition { field: &'a str, operator: &'a str },
}

fn segment<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited('[', take_while(0.., |c: char| c != '[' && c != ']'), ']').parse_next(input)
}

fn segments<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    preceded("filters", repeat(1.., segment)).parse_next(input)
}

fn is_index(s: &str) -> bool {
    s.is_empty() || s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_key(key: &str) -> Result<FilterKey<'_>, FilterQueryError> {
    let malformed = || FilterQueryError::MalformedKey {
        key: key.to_owned(),
    };
    let parts = segments.parse(key).map_err(|_| malformed())?;
    let (field, operator) = match parts.as_slice() {
        ["junction"] => return Ok(FilterKey::Junction),
        [field, "conditions", operator] => (*field, *operator),
        [field, "conditions", operator, index] if is_index(index) => (*field, *operator),
        _ => return Err(malformed()),
    };
    if field.trim().is_empty() {
        return Err(malformed());
    }
    Ok(FilterKey::Condition { field, operator })
}

impl Junction {
    /// Parse `and`/`or`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`FilterQueryError::InvalidJunction`] for anything else.
    pub fn parse(value: &str) -> Result<Self, FilterQueryError> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("and") {
            Ok(Junction::And)
        } else if trimmed.eq_ignore_ascii_case("or") {
            Ok(Junction::Or)
        } else {
            Err(FilterQueryError::InvalidJunction {
                value: value.to_owned(),
            })
        }
    }
}

impl FilterSet {
    /// Build a filter set from flat query parameters.
    ///
    /// Recognised keys are `filters[<field>][conditions][$<op>]` (optionally
    /// followed by `[]` or `[<n>]` for repeated values), `filters[junction]`
    /// and `order`. Other keys are ignored, as are blank values.
    ///
    /// ```
    /// use eligo::{FilterSet, Junction};
    ///
    /// let set = FilterSet::from_query([
    ///     ("filters[voucher_code][conditions][$contains]", "SUMMER"),
    ///     ("filters[result][conditions][$is]", "SUCCESS"),
    ///     ("filters[junction]", "OR"),
    ///     ("limit", "10"),
    /// ])
    /// .unwrap();
    /// assert_eq!(set.junction(), Junction::Or);
    /// assert_eq!(set.specs().len(), 2);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FilterQueryError`] for malformed `filters[..]` keys, unknown
    /// operators and invalid junctions.
    pub fn from_query<I, K, V>(pairs: I) -> Result<Self, FilterQueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut set = FilterSet::new();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key == "order" {
                set.order = SortKey::parse(value);
                continue;
            }
            if !key.starts_with("filters[") {
                continue;
            }
            match parse_key(key)? {
                FilterKey::Junction => {
                    if !value.trim().is_empty() {
                        set.junction = Junction::parse(value)?;
                    }
                }
                FilterKey::Condition { field, operator } => {
                    let op: FilterOperator = operator.parse()?;
                    if op.is_flag() {
                        if !value.trim().eq_ignore_ascii_case("false") {
                            set.spec_mut(field).add(op, String::new());
                        }
                    } else if !value.trim().is_empty() {
                        set.spec_mut(field).add(op, value);
                    }
                }
            }
        }
        tracing::debug!(
            fields = set.specs.len(),
            junction = ?set.junction,
            order = ?set.order,
            "parsed filter query"
        );
        Ok(set)
    }
}
