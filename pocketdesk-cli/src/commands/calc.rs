use anyhow::Result;
use owo_colors::OwoColorize;
use pocketdesk_core::calculator::{Button, CalculatorViewState};

use crate::render::Render;

pub fn run(keys: &[String], steps: bool) -> Result<()> {
    let buttons = keys
        .iter()
        .map(|key| key.parse::<Button>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut calculator = CalculatorViewState::default();

    for button in buttons {
        calculator.handle_button(button);
        if steps {
            println!(
                "{:>3}  {:>20}  {}",
                button.label().bold(),
                calculator.display_text(),
                calculator.expression_text().dimmed()
            );
        }
    }

    if steps {
        println!();
    }
    println!("{}", calculator.render());

    Ok(())
}
