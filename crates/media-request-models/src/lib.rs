pub mod candidate;
pub mod classification;
pub mod request;
pub mod lookup;

pub use candidate::{Candidate, UNKNOWN_YEAR};
pub use classification::Classification;
pub use request::{CompletedRequest, NewRequest, PendingRequest, ADDED_STATUS, WAITING_STATUS};
pub use lookup::LookupMatch;
