//! Grade reconciliation and status classification.
//!
//! Enrollment records from the five courses are folded into a [`Roster`],
//! the courses are checked to belong to one cohort, and each student is
//! classified into a [`ClassifiedRow`].

pub mod aggregate;
pub mod classify;
pub mod cohort;
pub mod types;
pub mod utility;

pub use aggregate::{Roster, aggregate_courses};
pub use classify::classify;
pub use cohort::validate_cohort;
pub use types::{
    Average, ClassifiedRow, EnrollmentRecord, GradePair, Observation, SLOT_COUNT, SlotValue,
    Status, StudentAggregate,
};
