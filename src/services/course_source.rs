//! Trait and types for reading courses from a learning-management system.

use anyhow::Result;
use serde::Serialize;

pub use crate::grading::types::EnrollmentRecord;

/// Metadata for a single course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseMetadata {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub course_code: String,
    /// Institutional (SIS) code; carries the `-C<n>-` sequence marker.
    pub institutional_code: String,
}

/// The sub-account a course is published under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: String,
    pub name: String,
}

/// Abstraction over the course provider (e.g., Canvas).
///
/// Lookups return `Ok(None)` when the provider does not know the id; `Err` is
/// reserved for transport or decoding failures.
#[async_trait::async_trait]
pub trait CourseDataSource: Send + Sync {
    async fn get_course(&self, course_id: &str) -> Result<Option<CourseMetadata>>;

    /// Active student enrollments of a course, fully paginated.
    async fn get_enrollments(&self, course_id: &str) -> Result<Vec<EnrollmentRecord>>;

    async fn get_account(&self, account_id: &str) -> Result<Option<Account>>;
}
