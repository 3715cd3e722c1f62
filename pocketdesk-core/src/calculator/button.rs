//! Keys on the calculator pad.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calculator::operation::Operation;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    /// `0`-`9` or the decimal point.
    Digit(char),
    Operator(Operation),
    Equals,
    Clear,
    ToggleSign,
    Percent,
}

impl Button {
    pub fn label(&self) -> String {
        match self {
            Button::Digit(c) => c.to_string(),
            Button::Operator(op) => op.symbol().to_string(),
            Button::Equals => "=".to_string(),
            Button::Clear => "AC".to_string(),
            Button::ToggleSign => "±".to_string(),
            Button::Percent => "%".to_string(),
        }
    }
}

impl FromStr for Button {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(op) = Operation::from_symbol(s) {
            return Ok(Button::Operator(op));
        }

        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && (c.is_ascii_digit() || c == '.')
        {
            return Ok(Button::Digit(c));
        }

        match s.to_ascii_uppercase().as_str() {
            "=" => Ok(Button::Equals),
            "AC" | "C" => Ok(Button::Clear),
            "±" | "+/-" => Ok(Button::ToggleSign),
            "%" => Ok(Button::Percent),
            _ => Err(Error::InvalidButton(s.to_string())),
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
