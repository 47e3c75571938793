use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, HeaderValue};

use crate::error::DelayError;

/// An [`HttpClient`] wrapper that sends HTTP basic credentials on every request.
///
/// The monitoring backend takes its API key as the username with an empty
/// password, which is what `https://<key>:@<host>/` means in URL form.
pub struct BasicAuth<C> {
    inner: C,
    header: HeaderValue,
}

impl<C> BasicAuth<C> {
    pub fn new(inner: C, username: &str, password: Option<&str>) -> Result<Self, DelayError> {
        let encoded = STANDARD.encode(format!("{}:{}", username, password.unwrap_or_default()));
        let mut header = HeaderValue::from_str(&format!("Basic {encoded}"))?;
        header.set_sensitive(true);
        Ok(Self { inner, header })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for BasicAuth<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.header.clone());
        self.inner.execute(req).await
    }
}
