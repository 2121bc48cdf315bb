use anyhow::{Context, Result, bail};

pub const DEFAULT_PER_PAGE: u32 = 100;

/// Connection settings for the Canvas REST API.
///
/// Read from the environment (a `.env` file is honored by the binary):
/// ```text
/// CANVAS_BASE_URL=https://school.instructure.com/api/v1
/// CANVAS_API_TOKEN=...
/// CANVAS_PER_PAGE=100
/// ```
#[derive(Clone)]
pub struct CanvasConfig {
    pub base_url: String,
    pub api_token: String,
    pub per_page: u32,
}

impl std::fmt::Debug for CanvasConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl CanvasConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("CANVAS_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .context("CANVAS_BASE_URL must be set")?
            .trim()
            .trim_end_matches('/')
            .to_string();

        let api_token = lookup("CANVAS_API_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .context("CANVAS_API_TOKEN must be set")?
            .trim()
            .to_string();

        let per_page = match lookup("CANVAS_PER_PAGE") {
            Some(raw) => {
                let value: u32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("CANVAS_PER_PAGE is not a number: '{raw}'"))?;
                if !(1..=100).contains(&value) {
                    bail!("CANVAS_PER_PAGE must be between 1 and 100, got {value}");
                }
                value
            }
            None => DEFAULT_PER_PAGE,
        };

        Ok(Self {
            base_url,
            api_token,
            per_page,
        })
    }
}
