//! Structured error types shared across the null-model crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`NmError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (node indices, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for the null-model engine.
///
/// Every variant is detected before any state is mutated, so a failed call
/// leaves graphs, engines and analyses exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum NmError {
    /// Malformed configuration such as inverted intervals or empty thinning sets.
    #[error("invalid parameter: {0}")]
    InvalidParameter(ErrorInfo),
    /// Out-of-range endpoints, disallowed self-loops or duplicate edges.
    #[error("invalid edge: {0}")]
    InvalidEdge(ErrorInfo),
    /// Trades referencing missing nodes or pairing a node with itself.
    #[error("invalid trade: {0}")]
    InvalidTrade(ErrorInfo),
    /// Degree sequences no simple graph can realise.
    #[error("infeasible degree sequence: {0}")]
    InfeasibleDegreeSequence(ErrorInfo),
    /// Operations issued in the wrong lifecycle phase.
    #[error("state error: {0}")]
    State(ErrorInfo),
    /// Serialization, schema and file errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl NmError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            NmError::InvalidParameter(info)
            | NmError::InvalidEdge(info)
            | NmError::InvalidTrade(info)
            | NmError::InfeasibleDegreeSequence(info)
            | NmError::State(info)
            | NmError::Serde(info) => info,
        }
    }

    /// Shorthand for an [`NmError::InvalidParameter`] without context.
    pub fn invalid_parameter(code: impl Into<String>, message: impl Into<String>) -> Self {
        NmError::InvalidParameter(ErrorInfo::new(code, message))
    }
}
