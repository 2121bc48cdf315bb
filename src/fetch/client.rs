use async_trait::async_trait;
use reqwest::{Request, Response};

/// Sends a prepared request. Decorators (auth, etc.) wrap an inner client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
