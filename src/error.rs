//! Errors that abort an acta run before any row is produced.

use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActaError {
    /// The run needs exactly one id per course slot.
    #[error("expected exactly {expected} course ids, got {actual}")]
    InputCount { expected: usize, actual: usize },

    /// Course ids the data source could not resolve.
    #[error("invalid course ids: {}", .0.join(", "))]
    InvalidCourseIds(Vec<String>),

    /// The courses do not share one cohort signature.
    #[error("courses belong to different cohorts: {}", join_set(.0))]
    MixedCohort(BTreeSet<String>),
}

fn join_set(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
