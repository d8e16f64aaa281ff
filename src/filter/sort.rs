use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// A requested ordering such as `created_at` or `-created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    field: String,
    direction: Direction,
}

impl SortKey {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// A leading `-` sorts descending, a leading `+` (or none) ascending.
    /// Blank input yields `None`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let (direction, field) = match input.strip_prefix('-') {
            Some(rest) => (Direction::Descending, rest),
            None => (
                Direction::Ascending,
                input.strip_prefix('+').unwrap_or(input),
            ),
        };
        let field = field.trim();
        if field.is_empty() {
            None
        } else {
            Some(Self::new(field, direction))
        }
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Ascending => write!(f, "{}", self.field),
            Direction::Descending => write!(f, "-{}", self.field),
        }
    }
}

type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Named comparators for one item type.
///
/// Keys that are absent or not registered fall back to the fallback field,
/// descending.
///
/// ```
/// use eligo::{SortKey, Sorter};
///
/// struct Row { code: &'static str, created_at: u32 }
///
/// let sorter = Sorter::new("created_at", |a: &Row, b: &Row| a.created_at.cmp(&b.created_at))
///     .with("code", |a, b| a.code.cmp(b.code));
///
/// let rows = [Row { code: "B", created_at: 1 }, Row { code: "A", created_at: 2 }];
/// let mut refs: Vec<&Row> = rows.iter().collect();
/// sorter.sort(&mut refs, None);
/// assert_eq!(refs[0].code, "A");
/// sorter.sort(&mut refs, SortKey::parse("code").as_ref());
/// assert_eq!(refs[0].code, "A");
/// sorter.sort(&mut refs, SortKey::parse("-code").as_ref());
/// assert_eq!(refs[0].code, "B");
/// ```
pub struct Sorter<T> {
    comparators: HashMap<String, Comparator<T>>,
    fallback: String,
}

impl<T> Sorter<T> {
    /// Create a sorter whose fallback ordering is `field`, descending.
    pub fn new<F>(field: impl Into<String>, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        let fallback = field.into();
        let mut comparators: HashMap<String, Comparator<T>> = HashMap::new();
        comparators.insert(fallback.clone(), Box::new(compare));
        Self {
            comparators,
            fallback,
        }
    }

    #[must_use]
    pub fn with<F>(mut self, field: impl Into<String>, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.comparators.insert(field.into(), Box::new(compare));
        self
    }

    /// The key actually used for `requested`.
    #[must_use]
    pub fn resolve(&self, requested: Option<&SortKey>) -> SortKey {
        match requested {
            Some(key) if self.comparators.contains_key(key.field()) => key.clone(),
            Some(key) => {
                tracing::debug!(key = %key, fallback = %self.fallback, "unknown sort key, using fallback");
                SortKey::new(self.fallback.clone(), Direction::Descending)
            }
            None => SortKey::new(self.fallback.clone(), Direction::Descending),
        }
    }

    /// Stable sort by the resolved key.
    pub fn sort(&self, items: &mut [&T], requested: Option<&SortKey>) {
        let key = self.resolve(requested);
        if let Some(compare) = self.comparators.get(key.field()) {
            items.sort_by(|a, b| key.direction().apply(compare(a, b)));
        }
    }
}

impl<T> fmt::Debug for Sorter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.comparators.keys().collect();
        keys.sort();
        f.debug_struct("Sorter")
            .field("keys", &keys)
            .field("fallback", &self.fallback)
            .finish()
    }
}
