//! Data types shared by the aggregation and classification stages.

use serde::{Serialize, Serializer};
use std::fmt;

/// Number of course slots in a diploma program.
pub const SLOT_COUNT: usize = 5;

/// Minimum passing grade on the 1.0–7.0 scale.
pub const PASSING_GRADE: f64 = 4.0;

/// One student's enrollment in one course, as reported by the data source.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRecord {
    pub identity: String,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    pub final_grade: Option<f64>,
    pub current_grade: Option<f64>,
}

/// The two grade snapshots recorded for a student in one course.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GradePair {
    pub final_grade: Option<f64>,
    pub current_grade: Option<f64>,
}

/// A student's grades across every course slot.
///
/// `slots[i]` is `None` when the student had no enrollment in course `i + 1`,
/// which is distinct from an enrollment whose grades are both null.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentAggregate {
    pub identity: String,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    pub slots: [Option<GradePair>; SLOT_COUNT],
}

impl StudentAggregate {
    pub fn from_record(record: &EnrollmentRecord) -> Self {
        Self {
            identity: record.identity.clone(),
            given_name: record.given_name.clone(),
            family_name: record.family_name.clone(),
            email: record.email.clone(),
            slots: [None; SLOT_COUNT],
        }
    }
}

/// How a single course slot resolved for a student.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotValue {
    Missing,
    Inconsistent,
    Numeric(f64),
}

impl SlotValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SlotValue::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            SlotValue::Missing => "Missing".into(),
            SlotValue::Inconsistent => "Inconsistent".into(),
            SlotValue::Numeric(v) => format!("{v:.1}"),
        }
    }
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Numeric values serialize as numbers, sentinels as their labels.
impl Serialize for SlotValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SlotValue::Numeric(v) => serializer.serialize_f64(*v),
            other => serializer.serialize_str(&other.label()),
        }
    }
}

/// A student's rounded average, or the sentinel when no slot resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Average {
    Uncalculated,
    Numeric(f64),
}

impl Average {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Average::Numeric(v) => Some(*v),
            Average::Uncalculated => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Average::Uncalculated => "Uncalculated".into(),
            Average::Numeric(v) => format!("{v:.1}"),
        }
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Average {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Average::Numeric(v) => serializer.serialize_f64(*v),
            Average::Uncalculated => serializer.serialize_str("Uncalculated"),
        }
    }
}

/// Final standing of a student across the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    NeedsRegularization,
    NoGrades,
    Approved,
    Failed,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Approved,
        Status::Failed,
        Status::Pending,
        Status::NeedsRegularization,
        Status::NoGrades,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::NeedsRegularization => "Needs regularization",
            Status::NoGrades => "No grades",
            Status::Approved => "Approved",
            Status::Failed => "Failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Remark attached to a student based on how many courses they failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Observation {
    #[default]
    None,
    MayRetake,
    Lost,
}

impl Observation {
    pub fn label(&self) -> &'static str {
        match self {
            Observation::None => "",
            Observation::MayRetake => "May retake",
            Observation::Lost => "Lost",
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Observation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One output line of the acta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRow {
    pub given_name: String,
    pub family_name: String,
    pub identity: String,
    pub slots: [SlotValue; SLOT_COUNT],
    pub average: Average,
    pub status: Status,
    pub observation: Observation,
    pub email: String,
}
