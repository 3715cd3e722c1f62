//! What the calculator tab renders: the display and the expression line.

use crate::calculator::button::Button;
use crate::calculator::engine::CalculatorEngine;

#[derive(Debug, Clone)]
pub struct CalculatorViewState {
    engine: CalculatorEngine,
    display_text: String,
    expression_text: String,
}

impl Default for CalculatorViewState {
    fn default() -> Self {
        Self::new(CalculatorEngine::default())
    }
}

impl CalculatorViewState {
    pub fn new(engine: CalculatorEngine) -> Self {
        CalculatorViewState {
            engine,
            display_text: "0".to_string(),
            expression_text: String::new(),
        }
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn expression_text(&self) -> &str {
        &self.expression_text
    }

    pub fn handle_button(&mut self, button: Button) {
        let display = &self.display_text;
        self.display_text = match button {
            Button::Digit(c) => self.engine.input_digit(&c.to_string(), display),
            Button::Operator(op) => self.engine.input_operator(op, display),
            Button::Equals => self.engine.input_equals(display),
            Button::Clear => self.engine.clear(),
            Button::ToggleSign => self.engine.toggle_sign(display),
            Button::Percent => self.engine.percent(display),
        };
        self.expression_text = match button {
            Button::Clear => String::new(),
            _ => self.engine.expression().to_string(),
        };
    }

    /// Press several buttons in order.
    pub fn handle_buttons<I>(&mut self, buttons: I)
    where
        I: IntoIterator<Item = Button>,
    {
        for button in buttons {
            self.handle_button(button);
        }
    }
}
