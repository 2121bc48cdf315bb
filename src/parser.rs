//! Decoding of Canvas REST payloads and of the course-id input list.
//!
//! Per-record problems never fail a run: unparseable grades become `None`
//! and enrollments without an identity number are dropped.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;

use crate::services::{Account, CourseMetadata, EnrollmentRecord};

const STUDENT_ENROLLMENT: &str = "StudentEnrollment";

static ID_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("separator pattern is valid"));

/// Splits free-form input such as `"101, 102 103\n104,105"` into course ids.
pub fn parse_course_ids(input: &str) -> Vec<String> {
    ID_SEPARATORS
        .split(input.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct RawCourse {
    pub id: Value,
    #[serde(default)]
    pub account_id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub sis_course_id: Option<String>,
}

impl From<RawCourse> for CourseMetadata {
    fn from(raw: RawCourse) -> Self {
        CourseMetadata {
            id: value_to_id(&raw.id).unwrap_or_default(),
            account_id: value_to_id(&raw.account_id).unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            course_code: raw.course_code.unwrap_or_default(),
            institutional_code: raw.sis_course_id.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawAccount {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<RawAccount> for Account {
    fn from(raw: RawAccount) -> Self {
        Account {
            id: value_to_id(&raw.id).unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub sortable_name: Option<String>,
    #[serde(default)]
    pub login_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawGrades {
    #[serde(default)]
    pub final_grade: Value,
    #[serde(default)]
    pub current_grade: Value,
}

#[derive(Debug, Deserialize)]
pub struct RawEnrollment {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub sis_user_id: Value,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub grades: Option<RawGrades>,
}

/// Canvas ids arrive as numbers, SIS ids as strings; both are kept as text.
fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a grade that may be a JSON number or a numeric string.
pub fn parse_grade(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Some(v),
        _ => {
            warn!(value = %value, "Unparseable grade treated as null");
            None
        }
    }
}

/// Splits Canvas' `"Family, Given"` sortable name.
pub fn split_sortable_name(sortable: &str) -> (String, String) {
    match sortable.split_once(',') {
        Some((family, given)) => (family.trim().to_string(), given.trim().to_string()),
        None => (sortable.trim().to_string(), String::new()),
    }
}

/// Converts raw enrollments into records, one per identity number.
///
/// Non-student enrollments are skipped. When the same identity appears twice,
/// the later record replaces the earlier one in its original position.
pub fn enrollments_from_raw(raw: Vec<RawEnrollment>) -> Vec<EnrollmentRecord> {
    let mut records: Vec<EnrollmentRecord> = Vec::with_capacity(raw.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for enrollment in raw {
        if enrollment.kind.as_deref() != Some(STUDENT_ENROLLMENT) {
            continue;
        }

        let Some(identity) = value_to_id(&enrollment.sis_user_id) else {
            warn!("Student enrollment without identity number skipped");
            continue;
        };

        let user = enrollment.user.unwrap_or_default();
        let (family_name, given_name) =
            split_sortable_name(user.sortable_name.as_deref().unwrap_or(""));
        let grades = enrollment.grades.unwrap_or_default();

        let record = EnrollmentRecord {
            identity: identity.clone(),
            given_name,
            family_name,
            email: user.login_id.unwrap_or_default(),
            final_grade: parse_grade(&grades.final_grade),
            current_grade: parse_grade(&grades.current_grade),
        };

        match positions.get(&identity) {
            Some(&i) => records[i] = record,
            None => {
                positions.insert(identity, records.len());
                records.push(record);
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_course_ids() {
        assert_eq!(
            parse_course_ids(" 101, 102 103\n104,,105 "),
            vec!["101", "102", "103", "104", "105"]
        );
        assert!(parse_course_ids("  ").is_empty());
    }

    #[test]
    fn test_parse_grade_variants() {
        assert_eq!(parse_grade(&json!(5.5)), Some(5.5));
        assert_eq!(parse_grade(&json!(6)), Some(6.0));
        assert_eq!(parse_grade(&json!("4.2")), Some(4.2));
        assert_eq!(parse_grade(&json!("4,7")), Some(4.7));
        assert_eq!(parse_grade(&json!(null)), None);
        assert_eq!(parse_grade(&json!("")), None);
        assert_eq!(parse_grade(&json!("A-")), None);
        assert_eq!(parse_grade(&json!(true)), None);
    }

    #[test]
    fn test_split_sortable_name() {
        assert_eq!(
            split_sortable_name("Pérez Soto, María José"),
            ("Pérez Soto".to_string(), "María José".to_string())
        );
        assert_eq!(split_sortable_name("Cher"), ("Cher".to_string(), String::new()));
        assert_eq!(split_sortable_name(""), (String::new(), String::new()));
    }

    #[test]
    fn test_enrollments_filter_and_dedupe() {
        let raw: Vec<RawEnrollment> = serde_json::from_value(json!([
            {
                "type": "StudentEnrollment",
                "sis_user_id": "111111111",
                "user": { "sortable_name": "Rojas, Ana", "login_id": "ana@x.cl" },
                "grades": { "final_grade": "5.0", "current_grade": "5.0" }
            },
            {
                "type": "TeacherEnrollment",
                "sis_user_id": "999",
                "user": { "sortable_name": "Prof, X" }
            },
            {
                "type": "StudentEnrollment",
                "sis_user_id": null,
                "user": { "sortable_name": "Ghost, Nobody" }
            },
            {
                "type": "StudentEnrollment",
                "sis_user_id": "222222222",
                "user": { "sortable_name": "Lagos, Beto" },
                "grades": { "final_grade": null, "current_grade": 3.2 }
            },
            {
                "type": "StudentEnrollment",
                "sis_user_id": "111111111",
                "user": { "sortable_name": "Rojas, Ana", "login_id": "ana@x.cl" },
                "grades": { "final_grade": "6.0", "current_grade": "6.0" }
            }
        ]))
        .unwrap();

        let records = enrollments_from_raw(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identity, "111111111");
        assert_eq!(records[0].final_grade, Some(6.0));
        assert_eq!(records[0].given_name, "Ana");
        assert_eq!(records[1].family_name, "Lagos");
        assert_eq!(records[1].email, "");
        assert_eq!(records[1].final_grade, None);
        assert_eq!(records[1].current_grade, Some(3.2));
    }

    #[test]
    fn test_course_from_raw() {
        let raw: RawCourse = serde_json::from_value(json!({
            "id": 4521,
            "account_id": 88,
            "name": "Diplomado Gestión - Curso 1",
            "course_code": "DGES-C1",
            "sis_course_id": "DGES-C1-2024"
        }))
        .unwrap();

        let course = CourseMetadata::from(raw);
        assert_eq!(course.id, "4521");
        assert_eq!(course.account_id, "88");
        assert_eq!(course.institutional_code, "DGES-C1-2024");
    }

    #[test]
    fn test_course_without_sis_code() {
        let raw: RawCourse = serde_json::from_value(json!({ "id": 1 })).unwrap();
        let course = CourseMetadata::from(raw);
        assert_eq!(course.institutional_code, "");
        assert_eq!(course.account_id, "");
    }
}
