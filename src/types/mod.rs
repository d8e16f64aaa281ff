mod condition;
mod context;
mod error;
mod evaluation_report;
mod expr;
mod field;
mod options;
mod rule;
mod ruleset;
mod value;

pub use condition::{apply_operator, ConditionError, RuleCondition};
pub use context::{Campaign, Context, Customer, Order, OrderItem, RedemptionCounters, Voucher};
pub use error::PayloadError;
pub use evaluation_report::{EvaluationReport, RuleOutcome};
pub use expr::{Connective, LogicExpr};
pub use field::{
    resolve, resolve_path, CustomerField, EntityField, FieldRef, ItemField, OrderField,
    RedemptionField, Resolved,
};
pub use options::EvaluationOptions;
pub use rule::CompiledRule;
pub(crate) use rule::RuleCheck;
pub(crate) use ruleset::Logic;
pub use ruleset::ValidationRules;
pub use value::{Metadata, Value};
