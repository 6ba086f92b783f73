use media_request_models::Candidate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit regex should compile"));

/// Interpret what the user typed against the numbered candidate list.
///
/// Every run of digits is read as a 1-based index, so `"1, 3"`, `"1 and 3"`
/// and `"#1 #3"` all pick the first and third entries. Out-of-range numbers
/// are ignored and repeats collapse. When no number lands in the list, the
/// whole input is matched against the candidate names instead
/// (case-insensitive), which picks at most one, so titles such as
/// "Apollo 13" can still be typed out. The result keeps list order.
pub fn parse_selection(input: &str, candidates: &[Candidate]) -> Vec<Candidate> {
    let indices: BTreeSet<usize> = DIGIT_RUN
        .find_iter(input)
        .filter_map(|m| m.as_str().parse::<usize>().ok())
        .filter(|n| (1..=candidates.len()).contains(n))
        .collect();

    if !indices.is_empty() {
        return indices.into_iter().map(|n| candidates[n - 1].clone()).collect();
    }

    let wanted = input.trim().to_lowercase();
    if wanted.is_empty() {
        return Vec::new();
    }
    candidates
        .iter()
        .find(|c| c.name.to_lowercase() == wanted)
        .cloned()
        .into_iter()
        .collect()
}
