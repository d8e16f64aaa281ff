//! Operator-based filtering and ordering of in-memory collections.
//!
//! A [`FilterSet`] holds one [`FilterSpec`] per field plus a [`Junction`]
//! deciding how the per-field checks combine. Items expose their field values
//! through [`Filterable`].

mod query;
mod sort;
mod spec;
mod subject;

use std::collections::BTreeMap;

pub use query::FilterQueryError;
pub use sort::{Direction, SortKey, Sorter};
pub use spec::{FilterOperator, FilterSpec};
pub use subject::{Filterable, Subject};

/// How per-field checks are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Junction {
    #[default]
    And,
    Or,
}

impl Junction {
    /// Combine per-field results. No checks always matches.
    pub fn combine(self, checks: impl Iterator<Item = bool>) -> bool {
        let mut checks = checks.peekable();
        if checks.peek().is_none() {
            return true;
        }
        match self {
            Junction::And => checks.all(|c| c),
            Junction::Or => checks.any(|c| c),
        }
    }
}

/// Whether `entity` passes `specs` under `junction`. Empty specs are skipped.
pub fn matches_all<'s, T, I>(entity: &T, specs: I, junction: Junction) -> bool
where
    T: Filterable + ?Sized,
    I: IntoIterator<Item = (&'s str, &'s FilterSpec)>,
{
    junction.combine(
        specs
            .into_iter()
            .filter(|(_, spec)| !spec.is_empty())
            .map(|(field, spec)| spec.matches(&entity.subject(field))),
    )
}

/// Per-field filters, their junction and an optional ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub(crate) junction: Junction,
    pub(crate) specs: BTreeMap<String, FilterSpec>,
    pub(crate) order: Option<SortKey>,
}

impl FilterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_junction(mut self, junction: Junction) -> Self {
        self.junction = junction;
        self
    }

    #[must_use]
    pub fn with_spec(mut self, field: impl Into<String>, spec: FilterSpec) -> Self {
        self.specs.insert(field.into(), spec);
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: SortKey) -> Self {
        self.order = Some(order);
        self
    }

    pub(crate) fn spec_mut(&mut self, field: &str) -> &mut FilterSpec {
        self.specs.entry(field.to_owned()).or_default()
    }

    #[must_use]
    pub fn junction(&self) -> Junction {
        self.junction
    }

    #[must_use]
    pub fn spec(&self, field: &str) -> Option<&FilterSpec> {
        self.specs.get(field)
    }

    #[must_use]
    pub fn specs(&self) -> &BTreeMap<String, FilterSpec> {
        &self.specs
    }

    #[must_use]
    pub fn order(&self) -> Option<&SortKey> {
        self.order.as_ref()
    }

    /// Whether `entity` passes every configured field check (or any, under
    /// [`Junction::Or`]).
    pub fn matches<T: Filterable + ?Sized>(&self, entity: &T) -> bool {
        matches_all(
            entity,
            self.specs.iter().map(|(k, v)| (k.as_str(), v)),
            self.junction,
        )
    }

    /// Matching items, ordered by this set's sort key through `sorter`.
    pub fn apply<'a, T: Filterable>(&self, items: &'a [T], sorter: &Sorter<T>) -> Vec<&'a T> {
        let mut matched: Vec<&T> = items.iter().filter(|item| self.matches(*item)).collect();
        sorter.sort(&mut matched, self.order.as_ref());
        tracing::trace!(total = items.len(), matched = matched.len(), "applied filter set");
        matched
    }
}
