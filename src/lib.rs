//! Validation-rule and filter evaluation for voucher and loyalty backends.
//!
//! Two engines live here, both pure and synchronous:
//!
//! - [`ValidationRules`] compiles a persisted rule payload and decides whether
//!   a redeemable is eligible against a [`Context`].
//! - [`FilterSet`] matches and orders in-memory collections using
//!   operator-based filters parsed from flat query parameters.

mod compile;
mod error;
mod evaluate;
pub mod filter;
mod parse;
mod types;

pub use error::EligoError;
pub use filter::{
    matches_all, Direction, FilterOperator, FilterQueryError, FilterSet, FilterSpec, Filterable,
    Junction, SortKey, Sorter, Subject,
};
pub use parse::LogicParseError;
pub use types::{
    apply_operator, resolve, resolve_path, Campaign, CompiledRule, ConditionError, Connective,
    Context, Customer, CustomerField, EntityField, EvaluationOptions, EvaluationReport, FieldRef,
    ItemField, LogicExpr, Metadata, Order, OrderField, OrderItem, PayloadError,
    RedemptionCounters, RedemptionField, Resolved, RuleCondition, RuleOutcome, ValidationRules,
    Value, Voucher,
};

/// Compile `payload` leniently and evaluate it against `ctx`.
///
/// Malformed rules evaluate to `false` and unusable logic falls back to AND
/// over all rules; use [`ValidationRules::from_json`] to surface those
/// problems instead.
#[must_use]
pub fn evaluate(payload: &serde_json::Value, ctx: &Context) -> bool {
    ValidationRules::from_json_lenient(payload).evaluate(ctx)
}
