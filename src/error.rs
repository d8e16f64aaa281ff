use thiserror::Error;

use crate::filter::FilterQueryError;
use crate::parse::LogicParseError;
use crate::PayloadError;

/// Unified error type covering payload compilation, logic parsing, filter
/// query parsing and JSON decoding.
///
/// Returned by convenience methods like
/// [`ValidationRules::from_json_str()`](crate::ValidationRules::from_json_str).
/// Evaluation itself never fails.
#[derive(Debug, Error)]
pub enum EligoError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Logic(#[from] LogicParseError),

    #[error(transparent)]
    FilterQuery(#[from] FilterQueryError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
