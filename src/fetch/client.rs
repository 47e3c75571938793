use async_trait::async_trait;
use reqwest::{Request, Response};

/// Sends a prepared request. Implemented by [`BasicClient`](super::BasicClient)
/// and by the credential wrappers in [`auth`](super::auth).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
