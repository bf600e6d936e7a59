//! Error taxonomy for the widget pipeline.
//!
//! Every failure surfaces synchronously from dispatch; nothing is swallowed
//! and nothing is retried. Provider failures are opaque and pass through
//! unchanged.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WidgetError>;

#[derive(Debug, Error)]
pub enum WidgetError {
    /// A start/end expression matched no relative pattern and was not a
    /// parseable calendar date, or its count prefix was not an integer.
    #[error("invalid date expression {expr:?}: {reason}")]
    InvalidDateExpression { expr: String, reason: String },

    /// An option was present but its value failed type coercion.
    #[error("could not parse {value:?} for option {option}: {reason}")]
    InvalidOptionValue {
        option: String,
        value: String,
        reason: String,
    },

    /// A handler's hard precondition, checked before any fetch.
    #[error("the widget {kind} requires the {option} option ({hint})")]
    MissingRequiredOption {
        kind: String,
        option: String,
        hint: String,
    },

    #[error("can't find the widget {0}")]
    UnknownWidgetKind(String),

    /// Opaque failure from a data provider.
    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}
