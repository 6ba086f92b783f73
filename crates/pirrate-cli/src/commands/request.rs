use crate::commands::prompts::{self, ConfirmAction};
use crate::commands::{load_settings, ui};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_request_core::{FlowEvent, FlowState, SubmissionFlow};
use media_request_models::Classification;
use media_request_sources::Services;
use tracing::info;

fn spinner_for(event: &FlowEvent, state: &FlowState) -> Option<ui::Spinner> {
    match (event, state) {
        (FlowEvent::Search(query), FlowState::Input { classification }) if !query.trim().is_empty() => {
            Some(ui::Spinner::start(format!("Searching for {} \"{}\"...", classification.label(), query.trim())))
        }
        (FlowEvent::Confirm, FlowState::Confirm { .. }) => Some(ui::Spinner::start("Submitting...")),
        _ => None,
    }
}

/// Ask the user for the next event of the current step; `None` ends the session
fn next_event(state: &FlowState, output: &Output) -> Result<Option<FlowEvent>> {
    let event = match state {
        FlowState::Landing => prompts::choose_classification()?.map(FlowEvent::Choose),

        FlowState::Input { classification } => {
            let query = prompts::prompt_string(&format!("Enter a {} title (empty to go back)", classification.label()))?;
            Some(if query.is_empty() {
                FlowEvent::Back
            } else {
                FlowEvent::Search(query)
            })
        }

        FlowState::Suggestions {
            classification,
            resolution,
            ..
        } => {
            let heading = match classification {
                Classification::Tv => "Shows found:",
                Classification::Movie => "Movies found:",
            };
            output.println(heading);
            if let Some(note) = ui::fallback_note(resolution) {
                output.info(note);
            }
            output.println(ui::candidate_table(&resolution.candidates));

            let input = prompts::prompt_string("Type the number(s) or full title of your choice (empty to go back)")?;
            Some(if input.is_empty() {
                FlowEvent::Back
            } else {
                FlowEvent::Select(input)
            })
        }

        FlowState::Confirm { selected, .. } => {
            for candidate in selected {
                output.success(format!("Selected: {}", candidate));
            }
            Some(match prompts::choose_confirm_action()? {
                ConfirmAction::Submit => FlowEvent::Confirm,
                ConfirmAction::Back => FlowEvent::Back,
                ConfirmAction::Restart => FlowEvent::Restart,
            })
        }

        FlowState::Done { .. } => {
            if prompts::prompt_yes_no("Add another?", true)? {
                Some(FlowEvent::Restart)
            } else {
                None
            }
        }
    };
    Ok(event)
}

pub async fn run_request(kind: Option<Classification>, output: &Output) -> Result<()> {
    if !ui::is_interactive() {
        return Err(eyre!("`pirrate request` needs a terminal; use `pirrate submit` in scripts"));
    }

    let settings = load_settings()?;
    let services = Services::from_settings(&settings);
    let flow = SubmissionFlow::from_services(&services);

    let mut state = FlowState::Landing;
    if let Some(classification) = kind {
        state = flow.dispatch(state, FlowEvent::Choose(classification)).await.0;
    }

    while let Some(event) = next_event(&state, output)? {
        let spinner = spinner_for(&event, &state);
        let (next, notices) = flow.dispatch(state, event).await;
        if let Some(spinner) = spinner {
            spinner.finish();
        }

        for notice in &notices {
            output.notice(notice);
        }
        state = next;
    }

    info!(operation = "request_session_end", "Request session finished");
    Ok(())
}
