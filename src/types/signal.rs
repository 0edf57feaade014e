//! Signal: one independently computed indicator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Measured value behind a signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalDetail {
    Count(usize),
    Number(f64),
    Text(String),
}

impl fmt::Display for SignalDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::Number(v) => write!(f, "{:.1}", v),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A named, immutable indicator produced by exactly one extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Human-readable name, also used as the fusion reason
    pub name: String,
    /// Whether the extractor's threshold was crossed
    pub triggered: bool,
    /// The value the threshold was applied to
    pub detail: SignalDetail,
}

impl Signal {
    pub fn new(name: impl Into<String>, triggered: bool, detail: SignalDetail) -> Self {
        Self {
            name: name.into(),
            triggered,
            detail,
        }
    }
}
