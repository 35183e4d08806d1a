//! Prompt helpers for the setup wizard and the pre-upload confirmation.

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};

/// Pick one item with arrow keys; `default` is the pre-selected index.
pub fn select<T: std::fmt::Display>(prompt: &str, items: &[T], default: usize) -> Result<usize> {
    Ok(Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()?)
}

/// Yes/no question.
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Free-text input, optionally pre-filled with the current value.
pub fn input(prompt: &str, default: Option<&str>) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::with_theme(&theme).with_prompt(prompt);
    if let Some(current) = default {
        input = input.default(current.to_string());
    }
    Ok(input.interact_text()?)
}

/// Secret input; nothing is echoed.
pub fn password(prompt: &str) -> Result<String> {
    Ok(Password::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact()?)
}

pub fn header(text: &str) {
    println!("\n{}\n", style(text).bold().cyan());
}

pub fn info(text: &str) {
    println!("{} {}", style("ℹ").blue(), text);
}

pub fn error(text: &str) {
    eprintln!("{} {}", style("✗").red().bold(), text);
}
