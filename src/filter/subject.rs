use std::borrow::Cow;

use crate::{Metadata, Value};

/// The value(s) of one entity field as seen by a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject<'a> {
    /// The field is null or missing.
    Absent,
    One(Cow<'a, str>),
    /// A multi-valued field; matches if any element passes.
    Many(Vec<Cow<'a, str>>),
}

impl<'a> Subject<'a> {
    /// Convert a [`Value`]. `null` becomes [`Subject::Absent`], lists become
    /// [`Subject::Many`] (dropping `null` elements), other values are rendered
    /// as plain text.
    #[must_use]
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Null => Subject::Absent,
            Value::List(items) => {
                Subject::Many(items.iter().filter_map(Self::text).collect())
            }
            other => Self::text(other).map_or(Subject::Absent, Subject::One),
        }
    }

    fn text(value: &'a Value) -> Option<Cow<'a, str>> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Number(d) => Some(Cow::Owned(d.to_string())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    /// Whether the subject takes the "no data" branch: absent, a blank
    /// scalar, or an empty collection.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Subject::Absent => true,
            Subject::One(v) => v.trim().is_empty(),
            Subject::Many(vs) => vs.is_empty(),
        }
    }
}

impl<'a> From<&'a str> for Subject<'a> {
    fn from(v: &'a str) -> Self {
        Subject::One(Cow::Borrowed(v))
    }
}

impl<'a> From<Option<&'a str>> for Subject<'a> {
    fn from(v: Option<&'a str>) -> Self {
        v.map_or(Subject::Absent, Subject::from)
    }
}

impl<'a> From<Vec<&'a str>> for Subject<'a> {
    fn from(v: Vec<&'a str>) -> Self {
        Subject::Many(v.into_iter().map(Cow::Borrowed).collect())
    }
}

/// Items that can be matched by a [`FilterSet`](super::FilterSet).
pub trait Filterable {
    /// The value(s) of `field` on this item.
    fn subject(&self, field: &str) -> Subject<'_>;
}

impl Filterable for Metadata {
    fn subject(&self, field: &str) -> Subject<'_> {
        Value::lookup(self, field).map_or(Subject::Absent, Subject::from_value)
    }
}
