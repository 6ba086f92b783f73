//! The interactive request flow as an explicit state machine.
//!
//! [`update`] is pure: it takes the current [`FlowState`] and one
//! [`FlowEvent`] and returns the next state, an optional [`Effect`] for the
//! driver to run, and an optional [`Notice`] for the user. [`SubmissionFlow`]
//! runs effects against the real services and turns their results back into
//! events.
//!
//! Steps: Landing -> Input -> Suggestions -> Confirm -> Done, with `Back`
//! stepping one screen towards Landing and `Restart` jumping there.

use crate::cross_ref::resolve_cross_ref;
use crate::resolver::{CandidateResolver, Resolution};
use crate::selection::parse_selection;
use crate::submission::submit_request;
use media_request_models::{Candidate, Classification, NewRequest};
use media_request_sources::{MetadataProvider, RequestStore, Services};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum FlowState {
    Landing,
    Input {
        classification: Classification,
    },
    Suggestions {
        classification: Classification,
        query: String,
        resolution: Resolution,
    },
    Confirm {
        classification: Classification,
        query: String,
        resolution: Resolution,
        selected: Vec<Candidate>,
    },
    Done {
        classification: Classification,
        submitted: Vec<NewRequest>,
    },
}

/// Outcome of submitting one selected candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitResult {
    pub candidate: Candidate,
    /// The written row, or the error text
    pub outcome: Result<NewRequest, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    Choose(Classification),
    Search(String),
    SearchFinished { query: String, resolution: Resolution },
    Select(String),
    Confirm,
    SubmitFinished(Vec<SubmitResult>),
    Back,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Search {
        query: String,
        classification: Classification,
    },
    Submit {
        classification: Classification,
        selected: Vec<Candidate>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Warning(m) | Notice::Error(m) => m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub state: FlowState,
    pub effect: Option<Effect>,
    pub notice: Option<Notice>,
}

impl Update {
    fn to(state: FlowState) -> Self {
        Self {
            state,
            effect: None,
            notice: None,
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

fn titles(candidates: &[Candidate]) -> String {
    candidates.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
}

fn nothing_found(query: &str, classification: Classification, resolution: &Resolution) -> Notice {
    let suggestions = resolution.suggestions();
    if suggestions.is_empty() {
        Notice::Warning(format!("No {} found for \"{}\".", classification.label(), query))
    } else {
        Notice::Warning(format!(
            "No {} found for \"{}\" (also tried: {}).",
            classification.label(),
            query,
            suggestions.join(", ")
        ))
    }
}

/// Advance the flow by one event
pub fn update(state: FlowState, event: FlowEvent) -> Update {
    match (state, event) {
        (_, FlowEvent::Restart) => Update::to(FlowState::Landing),

        (FlowState::Landing, FlowEvent::Choose(classification)) => Update::to(FlowState::Input { classification }),

        (FlowState::Input { classification }, FlowEvent::Search(query)) => {
            let query = query.trim().to_string();
            let state = FlowState::Input { classification };
            if query.is_empty() {
                return Update::to(state).with_notice(Notice::Warning("Enter a title to search for.".to_string()));
            }
            Update::to(state).with_effect(Effect::Search { query, classification })
        }

        (FlowState::Input { classification }, FlowEvent::SearchFinished { query, resolution }) => {
            if resolution.is_empty() {
                let notice = nothing_found(&query, classification, &resolution);
                return Update::to(FlowState::Input { classification }).with_notice(notice);
            }
            Update::to(FlowState::Suggestions {
                classification,
                query,
                resolution,
            })
        }

        (
            FlowState::Suggestions {
                classification,
                query,
                resolution,
            },
            FlowEvent::Select(input),
        ) => {
            let selected = parse_selection(&input, &resolution.candidates);
            if selected.is_empty() {
                let state = FlowState::Suggestions {
                    classification,
                    query,
                    resolution,
                };
                return Update::to(state).with_notice(Notice::Warning("Invalid selection.".to_string()));
            }
            Update::to(FlowState::Confirm {
                classification,
                query,
                resolution,
                selected,
            })
        }

        (
            FlowState::Confirm {
                classification,
                query,
                resolution,
                selected,
            },
            FlowEvent::Confirm,
        ) => {
            let effect = Effect::Submit {
                classification,
                selected: selected.clone(),
            };
            Update::to(FlowState::Confirm {
                classification,
                query,
                resolution,
                selected,
            })
            .with_effect(effect)
        }

        (
            FlowState::Confirm {
                classification,
                query,
                resolution,
                ..
            },
            FlowEvent::SubmitFinished(results),
        ) => {
            let (ok, failed): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.outcome.is_ok());
            let submitted: Vec<NewRequest> = ok.into_iter().filter_map(|r| r.outcome.ok()).collect();

            if failed.is_empty() {
                let names: Vec<&str> = submitted.iter().map(|r| r.title.as_str()).collect();
                let notice = Notice::Success(format!("Submitted: {}", names.join(", ")));
                return Update::to(FlowState::Done {
                    classification,
                    submitted,
                })
                .with_notice(notice);
            }

            let errors: Vec<String> = failed
                .iter()
                .map(|r| match &r.outcome {
                    Err(e) => format!("{}: {}", r.candidate, e),
                    Ok(_) => r.candidate.to_string(),
                })
                .collect();
            let mut message = format!("Failed to submit {}", errors.join("; "));
            if !submitted.is_empty() {
                let names: Vec<&str> = submitted.iter().map(|r| r.title.as_str()).collect();
                message.push_str(&format!(" (submitted: {})", names.join(", ")));
            }

            let selected: Vec<Candidate> = failed.into_iter().map(|r| r.candidate).collect();
            Update::to(FlowState::Confirm {
                classification,
                query,
                resolution,
                selected,
            })
            .with_notice(Notice::Error(message))
        }

        (FlowState::Input { .. }, FlowEvent::Back) => Update::to(FlowState::Landing),
        (FlowState::Suggestions { classification, .. }, FlowEvent::Back) => {
            Update::to(FlowState::Input { classification })
        }
        (
            FlowState::Confirm {
                classification,
                query,
                resolution,
                ..
            },
            FlowEvent::Back,
        ) => Update::to(FlowState::Suggestions {
            classification,
            query,
            resolution,
        }),

        (state, event) => {
            debug!(?event, "Event ignored in current step");
            Update::to(state)
        }
    }
}

/// Runs the effects [`update`] asks for
pub struct SubmissionFlow {
    resolver: CandidateResolver,
    metadata: Arc<dyn MetadataProvider>,
    store: Arc<dyn RequestStore>,
}

impl SubmissionFlow {
    pub fn new(resolver: CandidateResolver, metadata: Arc<dyn MetadataProvider>, store: Arc<dyn RequestStore>) -> Self {
        Self {
            resolver,
            metadata,
            store,
        }
    }

    pub fn from_services(services: &Services) -> Self {
        let resolver = CandidateResolver::new(services.metadata.clone(), services.suggester.clone());
        Self::new(resolver, services.metadata.clone(), services.store.clone())
    }

    pub async fn search(&self, query: &str, classification: Classification) -> Resolution {
        self.resolver.resolve(query, classification).await
    }

    /// Resolve the cross-reference id and write a row for each candidate,
    /// one after the other; a failure only affects its own candidate
    pub async fn submit(&self, classification: Classification, selected: &[Candidate]) -> Vec<SubmitResult> {
        let mut results = Vec::with_capacity(selected.len());
        for candidate in selected {
            let outcome = match resolve_cross_ref(self.metadata.as_ref(), candidate.tmdb_id, classification).await {
                Ok(cross_ref_id) => submit_request(self.store.as_ref(), &candidate.name, cross_ref_id, classification)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(format!("could not resolve {} id: {}", classification.cross_ref_catalog(), e)),
            };
            match &outcome {
                Ok(request) => info!(
                    operation = "submit",
                    title = %request.title,
                    classification = %classification,
                    cross_ref_id = ?request.cross_ref_id,
                    "Request submitted"
                ),
                Err(e) => warn!(operation = "submit", title = %candidate.name, error = %e, "Request not submitted"),
            }
            results.push(SubmitResult {
                candidate: candidate.clone(),
                outcome,
            });
        }
        results
    }

    /// Execute one effect and return the event carrying its result
    pub async fn run(&self, effect: Effect) -> FlowEvent {
        match effect {
            Effect::Search { query, classification } => {
                let resolution = self.search(&query, classification).await;
                FlowEvent::SearchFinished { query, resolution }
            }
            Effect::Submit {
                classification,
                selected,
            } => FlowEvent::SubmitFinished(self.submit(classification, &selected).await),
        }
    }

    /// Apply `event`, then keep running requested effects until the flow
    /// settles. Returns the settled state and every notice raised on the way.
    pub async fn dispatch(&self, state: FlowState, event: FlowEvent) -> (FlowState, Vec<Notice>) {
        let mut notices = Vec::new();
        let mut step = update(state, event);
        loop {
            notices.extend(step.notice.take());
            match step.effect.take() {
                Some(effect) => {
                    let next = self.run(effect).await;
                    step = update(step.state, next);
                }
                None => return (step.state, notices),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{hit, FakeMetadata, FakeStore};

    fn candidate(id: u64, name: &str) -> Candidate {
        Candidate::new(name, Some("2020-05-01"), id)
    }

    fn resolution(candidates: Vec<Candidate>) -> Resolution {
        Resolution::primary(candidates)
    }

    fn suggestions_state() -> FlowState {
        FlowState::Suggestions {
            classification: Classification::Movie,
            query: "matrix".to_string(),
            resolution: resolution(vec![candidate(603, "The Matrix"), candidate(604, "The Matrix Reloaded")]),
        }
    }

    #[test]
    fn test_landing_to_input() {
        let step = update(FlowState::Landing, FlowEvent::Choose(Classification::Tv));
        assert_eq!(step.state, FlowState::Input { classification: Classification::Tv });
        assert!(step.effect.is_none());
    }

    #[test]
    fn test_blank_search_warns() {
        let input = FlowState::Input { classification: Classification::Tv };
        let step = update(input.clone(), FlowEvent::Search("   ".to_string()));
        assert_eq!(step.state, input);
        assert!(step.effect.is_none());
        assert!(matches!(step.notice, Some(Notice::Warning(_))));
    }

    #[test]
    fn test_search_requests_effect() {
        let input = FlowState::Input { classification: Classification::Movie };
        let step = update(input, FlowEvent::Search(" dune ".to_string()));
        assert_eq!(
            step.effect,
            Some(Effect::Search {
                query: "dune".to_string(),
                classification: Classification::Movie
            })
        );
    }

    #[test]
    fn test_empty_result_stays_on_input() {
        let input = FlowState::Input { classification: Classification::Tv };
        let empty = Resolution {
            candidates: vec![],
            origin: crate::resolver::Origin::Fallback {
                suggestions: vec!["Severance".to_string()],
            },
        };
        let step = update(
            input.clone(),
            FlowEvent::SearchFinished {
                query: "severence".to_string(),
                resolution: empty,
            },
        );
        assert_eq!(step.state, input);
        let notice = step.notice.unwrap();
        assert!(notice.message().contains("\"severence\""));
        assert!(notice.message().contains("also tried: Severance"));
    }

    #[test]
    fn test_invalid_selection_keeps_suggestions() {
        let step = update(suggestions_state(), FlowEvent::Select("7".to_string()));
        assert_eq!(step.state, suggestions_state());
        assert_eq!(step.notice, Some(Notice::Warning("Invalid selection.".to_string())));
    }

    #[test]
    fn test_select_then_confirm_emits_submit() {
        let step = update(suggestions_state(), FlowEvent::Select("2".to_string()));
        let FlowState::Confirm { ref selected, .. } = step.state else {
            panic!("expected confirm, got {:?}", step.state);
        };
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].tmdb_id, 604);

        let step = update(step.state, FlowEvent::Confirm);
        assert_eq!(
            step.effect,
            Some(Effect::Submit {
                classification: Classification::Movie,
                selected: vec![candidate(604, "The Matrix Reloaded")],
            })
        );
    }

    #[test]
    fn test_back_walks_towards_landing() {
        let confirm = update(suggestions_state(), FlowEvent::Select("1".to_string())).state;
        let back = update(confirm, FlowEvent::Back).state;
        assert_eq!(back, suggestions_state());
        let back = update(back, FlowEvent::Back).state;
        assert_eq!(back, FlowState::Input { classification: Classification::Movie });
        let back = update(back, FlowEvent::Back).state;
        assert_eq!(back, FlowState::Landing);
    }

    #[test]
    fn test_restart_from_anywhere() {
        assert_eq!(update(suggestions_state(), FlowEvent::Restart).state, FlowState::Landing);
        let done = FlowState::Done {
            classification: Classification::Tv,
            submitted: vec![],
        };
        assert_eq!(update(done, FlowEvent::Restart).state, FlowState::Landing);
    }

    #[test]
    fn test_unmatched_event_is_ignored() {
        let step = update(FlowState::Landing, FlowEvent::Confirm);
        assert_eq!(step.state, FlowState::Landing);
        assert!(step.effect.is_none() && step.notice.is_none());
    }

    #[test]
    fn test_partial_failure_keeps_failed_selection() {
        let confirm = update(suggestions_state(), FlowEvent::Select("1 2".to_string())).state;
        let results = vec![
            SubmitResult {
                candidate: candidate(603, "The Matrix"),
                outcome: Ok(NewRequest::new("The Matrix", Classification::Movie, Some(603))),
            },
            SubmitResult {
                candidate: candidate(604, "The Matrix Reloaded"),
                outcome: Err("notion request failed: 400 - bad".to_string()),
            },
        ];
        let step = update(confirm, FlowEvent::SubmitFinished(results));

        let FlowState::Confirm { selected, .. } = step.state else {
            panic!("expected confirm");
        };
        assert_eq!(selected, vec![candidate(604, "The Matrix Reloaded")]);
        let Some(Notice::Error(message)) = step.notice else {
            panic!("expected error notice");
        };
        assert!(message.contains("The Matrix Reloaded (2020): notion request failed"));
        assert!(message.contains("(submitted: The Matrix)"));
    }

    #[tokio::test]
    async fn test_full_flow_writes_one_row_per_selection() {
        let metadata = Arc::new(
            FakeMetadata::new()
                .with_results(
                    "office",
                    vec![hit(2316, "The Office", Some("2005-03-24")), hit(2996, "The Office", Some("2001-07-09"))],
                )
                .with_tvdb_id(2316, 73244),
        );
        let store = Arc::new(FakeStore::new());
        let flow = SubmissionFlow::new(
            CandidateResolver::new(metadata.clone(), None),
            metadata.clone(),
            store.clone(),
        );

        let (state, _) = flow.dispatch(FlowState::Landing, FlowEvent::Choose(Classification::Tv)).await;
        let (state, notices) = flow.dispatch(state, FlowEvent::Search("office".to_string())).await;
        assert!(notices.is_empty());
        assert!(matches!(state, FlowState::Suggestions { .. }));

        let (state, _) = flow.dispatch(state, FlowEvent::Select("1, 2".to_string())).await;
        let (state, notices) = flow.dispatch(state, FlowEvent::Confirm).await;

        let FlowState::Done { submitted, .. } = state else {
            panic!("expected done");
        };
        assert_eq!(submitted.len(), 2);
        assert!(matches!(notices.as_slice(), [Notice::Success(_)]));

        let created = store.created();
        assert_eq!(created[0], NewRequest::new("The Office", Classification::Tv, Some(73244)));
        // No TVDB mapping: written with an absent id
        assert_eq!(created[1].cross_ref_id, None);
    }

    #[tokio::test]
    async fn test_cross_ref_failure_is_per_candidate() {
        let metadata = Arc::new(FakeMetadata::new().failing_external_ids());
        let store = Arc::new(FakeStore::new());
        let flow = SubmissionFlow::new(CandidateResolver::new(metadata.clone(), None), metadata, store.clone());

        let results = flow.submit(Classification::Tv, &[candidate(1, "Dark")]).await;
        assert_eq!(results.len(), 1);
        assert!(results[0].outcome.as_ref().unwrap_err().starts_with("could not resolve tvdb id"));
        assert!(store.created().is_empty());
    }
}
