use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam over the HTTP transport so dataset sources can be substituted.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
