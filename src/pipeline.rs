//! One acta run: fetch the five courses, validate them, and classify every student.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::error::ActaError;
use crate::grading::cohort::{validate_cohort, version_code};
use crate::grading::{ClassifiedRow, Roster, SLOT_COUNT, Status, classify};
use crate::services::{CourseDataSource, CourseMetadata};

/// Immutable result of a successful run, handed to rendering and export.
#[derive(Debug, Clone, Serialize)]
pub struct ActaReport {
    pub generated_at: DateTime<Utc>,
    pub cohort: String,
    pub account_name: String,
    pub version_code: String,
    pub program_version: String,
    pub courses: Vec<CourseMetadata>,
    pub rows: Vec<ClassifiedRow>,
}

impl ActaReport {
    /// `acta_<account slug>_<version code>.csv`
    pub fn suggested_filename(&self) -> String {
        format!(
            "acta_{}_{}.csv",
            slug(&self.account_name),
            slug(&self.version_code)
        )
    }

    /// Row counts per status, in [`Status::ALL`] order.
    pub fn status_counts(&self) -> Vec<(Status, usize)> {
        Status::ALL
            .iter()
            .map(|status| {
                let count = self.rows.iter().filter(|r| r.status == *status).count();
                (*status, count)
            })
            .collect()
    }
}

fn slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Fails with [`ActaError::InputCount`] unless exactly one id per course slot is given.
pub fn check_course_count(course_ids: &[String]) -> Result<(), ActaError> {
    if course_ids.len() != SLOT_COUNT {
        return Err(ActaError::InputCount {
            expected: SLOT_COUNT,
            actual: course_ids.len(),
        });
    }
    Ok(())
}

/// Ids that appear more than once, in order of their second appearance.
pub fn repeated_course_ids(course_ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    course_ids
        .iter()
        .filter(|id| !seen.insert(id.as_str()))
        .map(String::as_str)
        .collect()
}

/// Runs the full acta pipeline for `course_ids`, given in slot order.
///
/// Fails with an [`ActaError`] (wrapped in `anyhow`) when the id count is not
/// five, when any course is unknown, or when the courses span several cohorts.
/// No source call is made for a wrong id count.
#[tracing::instrument(skip(source))]
pub async fn run_acta<S>(source: &S, course_ids: &[String]) -> Result<ActaReport>
where
    S: CourseDataSource + ?Sized,
{
    check_course_count(course_ids)?;
    let repeated = repeated_course_ids(course_ids);
    if !repeated.is_empty() {
        warn!(?repeated, "Same course given for several slots");
    }

    let mut courses = Vec::with_capacity(SLOT_COUNT);
    let mut invalid = Vec::new();
    for id in course_ids {
        match source.get_course(id).await? {
            Some(course) => courses.push(course),
            None => {
                warn!(course_id = %id, "Course not found");
                invalid.push(id.clone());
            }
        }
    }
    if !invalid.is_empty() {
        return Err(ActaError::InvalidCourseIds(invalid).into());
    }

    let cohort = validate_cohort(courses.iter().map(|c| c.institutional_code.as_str()))?;
    info!(cohort = %cohort, "Courses belong to one cohort");

    let mut roster = Roster::new();
    for (i, id) in course_ids.iter().enumerate() {
        let records = source.get_enrollments(id).await?;
        roster.add_course(i + 1, &records)?;
    }

    let account_id = &courses[0].account_id;
    let account_name = match source.get_account(account_id).await? {
        Some(account) if !account.name.trim().is_empty() => account.name,
        _ => {
            warn!(account_id = %account_id, "Account not found, using its id");
            format!("Account {account_id}")
        }
    };

    let rows: Vec<ClassifiedRow> = roster.iter().map(classify).collect();
    let version_code = version_code(&cohort);

    info!(students = rows.len(), "Acta classified");

    Ok(ActaReport {
        generated_at: Utc::now(),
        program_version: format!("{account_name} {version_code}"),
        cohort,
        account_name,
        version_code,
        courses,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_course_count() {
        let ids: Vec<String> = (1..=4).map(|i| i.to_string()).collect();
        assert_eq!(
            check_course_count(&ids),
            Err(ActaError::InputCount {
                expected: 5,
                actual: 4
            })
        );

        let ids: Vec<String> = (1..=5).map(|i| i.to_string()).collect();
        assert_eq!(check_course_count(&ids), Ok(()));
    }

    #[test]
    fn test_repeated_course_ids() {
        let ids: Vec<String> = ["10", "11", "10", "12", "10"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(repeated_course_ids(&ids), vec!["10", "10"]);

        let distinct: Vec<String> = (1..=5).map(|i| i.to_string()).collect();
        assert!(repeated_course_ids(&distinct).is_empty());
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Escuela de Negocios"), "escuela_de_negocios");
        assert_eq!(slug("  Área / Salud!! "), "área_salud");
        assert_eq!(slug("PROG-2024"), "prog_2024");
        assert_eq!(slug("---"), "unknown");
    }
}
