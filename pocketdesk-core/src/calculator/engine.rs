//! Calculator input handling.
//!
//! Every operation receives the text currently on the display and returns
//! the text to show next. Evaluation is strictly left to right: an
//! operator press resolves whatever is pending before it, so
//! `2 + 3 × 4 =` yields `20`.

use tracing::debug;

use crate::calculator::format::{format_result, parse_display};
use crate::calculator::operation::{Operation, resolve};

const DECIMAL_POINT: &str = ".";

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorEngine {
    current_value: f64,
    previous_value: f64,
    pending_operator: Option<Operation>,
    awaiting_new_input: bool,
    expression: String,
}

impl Default for CalculatorEngine {
    fn default() -> Self {
        CalculatorEngine {
            current_value: 0.0,
            previous_value: 0.0,
            pending_operator: None,
            awaiting_new_input: true,
            expression: String::new(),
        }
    }
}

impl CalculatorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trail of the computation so far, e.g. `"5 +"`.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    pub fn pending_operator(&self) -> Option<Operation> {
        self.pending_operator
    }

    pub fn is_awaiting_new_input(&self) -> bool {
        self.awaiting_new_input
    }

    pub fn input_digit(&mut self, token: &str, display: &str) -> String {
        if self.awaiting_new_input {
            self.awaiting_new_input = false;
            return if token == DECIMAL_POINT {
                "0.".to_string()
            } else {
                token.to_string()
            };
        }

        if token == DECIMAL_POINT && display.contains(DECIMAL_POINT) {
            return display.to_string();
        }

        if display == "0" && token != DECIMAL_POINT {
            return token.to_string();
        }

        format!("{display}{token}")
    }

    pub fn input_operator(&mut self, op: Operation, display: &str) -> String {
        let value = parse_display(display).unwrap_or(0.0);

        if !self.awaiting_new_input && self.pending_operator.is_some() {
            let result = resolve(self.previous_value, value, self.pending_operator);
            let formatted = format_result(result);
            debug!(result, %op, "resolved pending operation before chaining");

            self.previous_value = result;
            self.current_value = result;
            self.pending_operator = Some(op);
            self.awaiting_new_input = true;
            self.expression = format!("{formatted} {op}");
            return formatted;
        }

        self.previous_value = value;
        self.current_value = value;
        self.pending_operator = Some(op);
        self.awaiting_new_input = true;
        self.expression = format!("{display} {op}");

        display.to_string()
    }

    pub fn input_equals(&mut self, display: &str) -> String {
        let Some(op) = self.pending_operator else {
            self.expression.clear();
            return display.to_string();
        };

        let value = parse_display(display).unwrap_or(0.0);
        let result = resolve(self.previous_value, value, Some(op));
        debug!(left = self.previous_value, right = value, %op, result, "equals");

        self.expression = format!("{} {}", self.expression, display);
        self.current_value = result;
        self.previous_value = 0.0;
        self.pending_operator = None;
        self.awaiting_new_input = true;

        format_result(result)
    }

    /// Reset to the launch state (AC).
    pub fn clear(&mut self) -> String {
        *self = Self::default();
        "0".to_string()
    }

    pub fn toggle_sign(&self, display: &str) -> String {
        match parse_display(display) {
            Some(value) if value != 0.0 => format_result(-value),
            _ => display.to_string(),
        }
    }

    pub fn percent(&self, display: &str) -> String {
        match parse_display(display) {
            Some(value) => format_result(value / 100.0),
            None => display.to_string(),
        }
    }
}
