//! Rendering configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExprError;

/// How parentheses are placed when rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parenthesis {
    /// Keep explicit parentheses; add only those precedence requires
    #[default]
    Keep,
    /// Parenthesize everything that can be parenthesized
    All,
}

impl FromStr for Parenthesis {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(Parenthesis::Keep),
            "all" => Ok(Parenthesis::All),
            other => Err(ExprError::invalid_argument(format!(
                "unknown parenthesis option \"{}\" (expected \"keep\" or \"all\")",
                other
            ))),
        }
    }
}

impl fmt::Display for Parenthesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parenthesis::Keep => write!(f, "keep"),
            Parenthesis::All => write!(f, "all"),
        }
    }
}

/// Options shared by every render pass.
///
/// Deserializes from records like `{"parenthesis": "all"}`; missing fields
/// take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Parenthesization mode
    pub parenthesis: Parenthesis,
}

impl RenderOptions {
    /// Default options (`parenthesis = keep`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with the given parenthesization mode.
    pub fn with_parenthesis(parenthesis: Parenthesis) -> Self {
        Self { parenthesis }
    }
}
