pub mod outcome;
pub mod record;

pub use outcome::{RejectReason, RowOutcome};
pub use record::{CandidateRecord, NormalizedRecord, RawRow};
