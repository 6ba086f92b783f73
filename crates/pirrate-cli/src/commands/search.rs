use crate::commands::{load_settings, ui};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_request_core::{FlowEvent, FlowState, Notice, SubmissionFlow};
use media_request_models::Classification;
use media_request_sources::Services;
use serde_json::json;

pub async fn run_search(query: &str, classification: Classification, output: &Output) -> Result<()> {
    let settings = load_settings()?;
    let flow = SubmissionFlow::from_services(&Services::from_settings(&settings));

    let spinner = ui::Spinner::start(format!("Searching for {} \"{}\"...", classification.label(), query));
    let resolution = flow.search(query, classification).await;
    spinner.finish();

    if !output.is_human() {
        output.json(&json!({
            "query": query,
            "classification": classification.tag(),
            "resolution": resolution,
        }));
        return Ok(());
    }

    if resolution.is_empty() {
        output.warn(format!("No {} found for \"{}\".", classification.label(), query));
        return Ok(());
    }
    if let Some(note) = ui::fallback_note(&resolution) {
        output.info(note);
    }
    output.println(ui::candidate_table(&resolution.candidates));
    Ok(())
}

/// Drive the request flow from flags: choose, search, select, confirm.
/// Stops at the first step that does not advance.
pub async fn run_submit(query: &str, classification: Classification, select: &str, output: &Output) -> Result<()> {
    let settings = load_settings()?;
    let flow = SubmissionFlow::from_services(&Services::from_settings(&settings));

    let events = [
        FlowEvent::Choose(classification),
        FlowEvent::Search(query.to_string()),
        FlowEvent::Select(select.to_string()),
        FlowEvent::Confirm,
    ];

    let mut state = FlowState::Landing;
    let mut failed = false;
    for event in events {
        let spinner = matches!(event, FlowEvent::Search(_) | FlowEvent::Confirm)
            .then(|| ui::Spinner::start("Working..."));
        let (next, notices) = flow.dispatch(state, event).await;
        if let Some(spinner) = spinner {
            spinner.finish();
        }

        for notice in &notices {
            failed |= !matches!(notice, Notice::Success(_));
            output.notice(notice);
        }
        state = next;
        if failed {
            break;
        }
    }

    match state {
        FlowState::Done { submitted, .. } => {
            if !output.is_human() {
                output.json(&json!({ "submitted": submitted }));
            }
            Ok(())
        }
        _ => Err(eyre!("Request for \"{}\" was not submitted", query)),
    }
}
