mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::BasicClient;

use reqwest::{Method, Request, StatusCode, Url};
use tracing::{debug, error};

use crate::error::DelayError;

/// Parses `uri`, mapping parse failures into [`DelayError::InvalidUri`].
pub fn parse_uri(uri: &str) -> Result<Url, DelayError> {
    Url::parse(uri).map_err(|e| DelayError::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })
}

/// Both APIs answer with 200 or 201 on success; anything else is a failure.
pub fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}

/// Executes `req` and returns the body text if the status is accepted.
pub async fn send_accepted<C: HttpClient>(client: &C, req: Request) -> Result<String, DelayError> {
    let resp = client.execute(req).await?;
    let status = resp.status();
    let body = resp.text().await?;

    if is_accepted(status) {
        Ok(body)
    } else {
        Err(DelayError::UnexpectedStatus { status, body })
    }
}

/// Issues a single GET against `uri` and returns the response text.
///
/// Failures are logged here and handed back to the caller; nothing is retried.
pub async fn fetch<C: HttpClient>(client: &C, uri: &str) -> Result<String, DelayError> {
    let url = parse_uri(uri).inspect_err(|e| error!(error = %e, "CONNECTION ERROR"))?;
    let host = url.host_str().unwrap_or_default().to_string();

    match send_accepted(client, Request::new(Method::GET, url)).await {
        Ok(text) => {
            debug!(host, bytes = text.len(), "Response received");
            Ok(text)
        }
        Err(e) => {
            error!(host, error = %e, "CONNECTION ERROR");
            Err(e)
        }
    }
}
