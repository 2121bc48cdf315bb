//! Per-student classification: slot resolution, average, status and observation.

use crate::grading::types::{
    Average, ClassifiedRow, GradePair, Observation, PASSING_GRADE, SLOT_COUNT, SlotValue, Status,
    StudentAggregate,
};
use crate::grading::utility::{mean, round_half_up_tenth};
use crate::identity::format_identity;

/// Resolves one slot. Returns the displayed value and whether it failed.
///
/// A slot with no final grade resolves to `0.0` even when a current grade
/// exists.
pub fn resolve_slot(pair: Option<&GradePair>) -> (SlotValue, bool) {
    match pair {
        None => (SlotValue::Missing, false),
        Some(GradePair {
            final_grade: Some(f),
            current_grade: Some(c),
        }) if f != c => (SlotValue::Inconsistent, false),
        Some(GradePair {
            final_grade: Some(f),
            ..
        }) => (SlotValue::Numeric(*f), *f < PASSING_GRADE),
        Some(_) => (SlotValue::Numeric(0.0), false),
    }
}

/// Averages the numeric slots, rounded half-up to one decimal.
pub fn average(slots: &[SlotValue]) -> Average {
    let included: Vec<f64> = slots.iter().filter_map(SlotValue::as_number).collect();
    match mean(&included) {
        Some(m) => Average::Numeric(round_half_up_tenth(m)),
        None => Average::Uncalculated,
    }
}

/// Picks the status; earlier rules take priority.
pub fn status(has_inconsistency: bool, missing: usize, average: Average) -> Status {
    match average {
        _ if has_inconsistency => Status::Pending,
        _ if missing > 0 => Status::NeedsRegularization,
        Average::Uncalculated => Status::NoGrades,
        Average::Numeric(a) if a >= PASSING_GRADE => Status::Approved,
        Average::Numeric(_) => Status::Failed,
    }
}

pub fn observation(failed: usize) -> Observation {
    match failed {
        0 => Observation::None,
        1 => Observation::MayRetake,
        _ => Observation::Lost,
    }
}

/// Classifies one student into an output row.
pub fn classify(student: &StudentAggregate) -> ClassifiedRow {
    let mut slots = [SlotValue::Missing; SLOT_COUNT];
    let mut missing = 0usize;
    let mut failed = 0usize;
    let mut has_inconsistency = false;

    for (i, pair) in student.slots.iter().enumerate() {
        let (value, slot_failed) = resolve_slot(pair.as_ref());
        match value {
            SlotValue::Missing => missing += 1,
            SlotValue::Inconsistent => has_inconsistency = true,
            SlotValue::Numeric(_) => {}
        }
        if slot_failed {
            failed += 1;
        }
        slots[i] = value;
    }

    let average = average(&slots);

    ClassifiedRow {
        given_name: student.given_name.clone(),
        family_name: student.family_name.clone(),
        identity: format_identity(&student.identity),
        slots,
        average,
        status: status(has_inconsistency, missing, average),
        observation: observation(failed),
        email: student.email.clone(),
    }
}
