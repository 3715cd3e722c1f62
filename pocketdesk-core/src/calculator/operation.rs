//! Binary operators understood by the calculator.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// Symbol shown on the key and in the expression trail.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "−",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }

    /// Match a key label, accepting the ASCII spellings too.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Operation::Add),
            "−" | "-" => Some(Operation::Subtract),
            "×" | "*" | "x" => Some(Operation::Multiply),
            "÷" | "/" => Some(Operation::Divide),
            _ => None,
        }
    }

    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Operation::Add => left + right,
            Operation::Subtract => left - right,
            Operation::Multiply => left * right,
            Operation::Divide => {
                if right == 0.0 {
                    // Dividing by zero yields 0 rather than an error state.
                    debug!(left, "division by zero, resolving to 0");
                    0.0
                } else {
                    left / right
                }
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Resolve `left op right`. Without a pending operator the right operand wins.
pub fn resolve(left: f64, right: f64, op: Option<Operation>) -> f64 {
    match op {
        Some(op) => op.apply(left, right),
        None => right,
    }
}
