use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use media_request_core::{CycleReport, Resolution, RowOutcome};
use media_request_models::Candidate;
use std::io::IsTerminal;
use std::time::Duration;

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

/// Spinner shown while a search or submission is in flight. Without a
/// terminal the message is logged instead.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let message = message.into();
        if !is_interactive() {
            tracing::info!(operation = "progress", message = %message, "Working");
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "))
        {
            bar.set_style(style);
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

pub fn styled(table: &mut Table) {
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
}

pub fn header(title: &str) -> Cell {
    Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

/// Numbered candidate list; the numbers are what the selection prompt takes
pub fn candidate_table(candidates: &[Candidate]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header("#"), header("Title"), header("Year"), header("Genres")]);
    for (i, c) in candidates.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).add_attribute(Attribute::Bold),
            Cell::new(&c.name),
            Cell::new(&c.year),
            Cell::new(c.genres.join(", ")),
        ]);
    }
    styled(&mut table);
    table
}

/// One line noting that the list came from guessed titles
pub fn fallback_note(resolution: &Resolution) -> Option<String> {
    let suggestions = resolution.suggestions();
    if suggestions.is_empty() {
        None
    } else {
        Some(format!("No direct match; results for suggested titles: {}", suggestions.join(", ")))
    }
}

pub fn report_table(report: &CycleReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header("Title"), header("Outcome"), header("Detail")]);
    for row in &report.rows {
        let (outcome, detail, color) = match &row.outcome {
            RowOutcome::Added => ("added", String::new(), Color::Green),
            RowOutcome::Skipped(reason) => ("skipped", format!("{:?}", reason), Color::Yellow),
            RowOutcome::Failed(e) => ("failed", e.clone(), Color::Red),
        };
        table.add_row(vec![
            Cell::new(row.title.as_deref().unwrap_or("<untitled>")),
            Cell::new(outcome).fg(color),
            Cell::new(detail),
        ]);
    }
    styled(&mut table);
    table
}
