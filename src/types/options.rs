/// Per-call evaluation settings.
///
/// By default every rule is evaluated. Restricting evaluation to a set of
/// field-path prefixes makes rules outside those namespaces vacuously true,
/// so a caller can e.g. check only `customer.*` rules before an order exists.
///
/// ```
/// use eligo::EvaluationOptions;
///
/// let opts = EvaluationOptions::new().allow_prefix("customer.");
/// assert!(opts.admits("customer.email"));
/// assert!(!opts.admits("order.amount"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationOptions {
    allowed_prefixes: Option<Vec<String>>,
}

impl EvaluationOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field-path prefix to the allow-list. The first call switches the
    /// options from "evaluate everything" to "evaluate only allowed prefixes".
    #[must_use]
    pub fn allow_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.allowed_prefixes
            .get_or_insert_with(Vec::new)
            .push(prefix.into());
        self
    }

    /// Build options from a complete allow-list.
    #[must_use]
    pub fn with_allowed_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_prefixes: Some(prefixes.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether a rule on `path` should be evaluated.
    #[must_use]
    pub fn admits(&self, path: &str) -> bool {
        self.allowed_prefixes
            .as_ref()
            .map_or(true, |prefixes| prefixes.iter().any(|p| path.starts_with(p.as_str())))
    }

    #[must_use]
    pub fn allowed_prefixes(&self) -> Option<&[String]> {
        self.allowed_prefixes.as_deref()
    }
}
