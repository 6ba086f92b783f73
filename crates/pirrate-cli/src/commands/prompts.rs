use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Select};
use media_request_models::Classification;

/// Free text; an empty answer is allowed and returned as ""
pub fn prompt_string(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map(|s| s.trim().to_string())
        .map_err(|e| eyre!("Failed to read input: {}", e))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

/// `None` means the user chose to quit
pub fn choose_classification() -> Result<Option<Classification>> {
    let choice = Select::new()
        .with_prompt("What would you like to search for?")
        .items(&["📺 TV Shows", "🎬 Movies", "Quit"])
        .default(0)
        .interact()
        .map_err(|e| eyre!("Failed to read selection: {}", e))?;

    Ok(match choice {
        0 => Some(Classification::Tv),
        1 => Some(Classification::Movie),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Submit,
    Back,
    Restart,
}

pub fn choose_confirm_action() -> Result<ConfirmAction> {
    let choice = Select::new()
        .with_prompt("Submit this request?")
        .items(&["Confirm download", "Go back", "Start over"])
        .default(0)
        .interact()
        .map_err(|e| eyre!("Failed to read selection: {}", e))?;

    Ok(match choice {
        0 => ConfirmAction::Submit,
        1 => ConfirmAction::Back,
        _ => ConfirmAction::Restart,
    })
}
