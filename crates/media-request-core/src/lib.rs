pub mod resolver;
pub mod selection;
pub mod cross_ref;
pub mod submission;
pub mod workflow;
pub mod fulfillment;

#[cfg(test)]
pub(crate) mod testing;

pub use resolver::{CandidateResolver, Origin, Resolution, MAX_CANDIDATES};
pub use selection::parse_selection;
pub use cross_ref::resolve_cross_ref;
pub use submission::submit_request;
pub use workflow::{update, Effect, FlowEvent, FlowState, Notice, SubmissionFlow, SubmitResult, Update};
pub use fulfillment::{CycleReport, FulfillmentPoller, RowOutcome, RowReport, SkipReason, POLL_INTERVAL};
