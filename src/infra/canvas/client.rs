use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, info};

use crate::config::CanvasConfig;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient, get_json, get_paginated};
use crate::parser::{RawAccount, RawCourse, RawEnrollment, enrollments_from_raw};
use crate::services::{Account, CourseDataSource, CourseMetadata, EnrollmentRecord};

pub struct CanvasClient<C> {
    http: C,
    base_url: String,
    per_page: u32,
}

impl CanvasClient<ApiKey<BasicClient>> {
    /// Builds a client authenticated with the configured access token.
    pub fn from_config(config: &CanvasConfig) -> Result<Self> {
        let http = ApiKey::bearer(BasicClient::new()?, &config.api_token)?;
        Self::new(http, &config.base_url, config.per_page)
    }
}

impl<C: HttpClient> CanvasClient<C> {
    pub fn new(http: C, base_url: &str, per_page: u32) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).with_context(|| format!("invalid Canvas base URL '{base_url}'"))?;

        Ok(Self {
            http,
            base_url,
            per_page,
        })
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, path);
        Url::parse_with_params(&raw, params).with_context(|| format!("invalid URL '{raw}'"))
    }

    pub(crate) fn enrollments_url(&self, course_id: &str) -> Result<Url> {
        self.url(
            &format!("courses/{course_id}/enrollments"),
            &[
                ("type[]", "StudentEnrollment".to_string()),
                ("state[]", "active".to_string()),
                ("per_page", self.per_page.to_string()),
            ],
        )
    }
}

/// Course ids are interpolated into the URL path; anything but an id or a
/// `sis_course_id:` reference is treated as unknown.
fn is_valid_course_ref(course_id: &str) -> bool {
    !course_id.is_empty()
        && course_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_' | '.'))
}

#[async_trait]
impl<C: HttpClient> CourseDataSource for CanvasClient<C> {
    #[tracing::instrument(skip(self))]
    async fn get_course(&self, course_id: &str) -> Result<Option<CourseMetadata>> {
        if !is_valid_course_ref(course_id) {
            debug!("Course id rejected before request");
            return Ok(None);
        }

        let url = self.url(&format!("courses/{course_id}"), &[])?;
        let course: Option<RawCourse> = get_json(&self.http, url).await?;
        Ok(course.map(CourseMetadata::from))
    }

    #[tracing::instrument(skip(self))]
    async fn get_enrollments(&self, course_id: &str) -> Result<Vec<EnrollmentRecord>> {
        let url = self.enrollments_url(course_id)?;
        let raw: Vec<RawEnrollment> = get_paginated(&self.http, url)
            .await
            .with_context(|| format!("failed to list enrollments of course {course_id}"))?;

        let fetched = raw.len();
        let records = enrollments_from_raw(raw);
        info!(fetched, students = records.len(), "Enrollments loaded");
        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    async fn get_account(&self, account_id: &str) -> Result<Option<Account>> {
        if !is_valid_course_ref(account_id) {
            return Ok(None);
        }

        let url = self.url(&format!("accounts/{account_id}"), &[])?;
        let account: Option<RawAccount> = get_json(&self.http, url).await?;
        Ok(account.map(Account::from))
    }
}
