use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Url};
use serde::Serialize;
use tracing::debug;

use crate::error::DelayError;
use crate::fetch::{HttpClient, fetch, parse_uri, send_accepted};
use crate::services::monitoring_api::{MetricDescriptor, MetricSample, ModelSpec, MonitoringApi};

/// Grok custom-metric API client.
///
/// `base` is the API root (`https://<host>/`). Credentials are expected to be
/// applied by the wrapped [`HttpClient`], normally a
/// [`BasicAuth`](crate::fetch::auth::BasicAuth).
pub struct GrokClient<C> {
    client: C,
    base: Url,
}

impl<C: HttpClient> GrokClient<C> {
    pub fn new(client: C, base: Url) -> Self {
        Self { client, base }
    }

    fn endpoint(&self, path: &str) -> Result<Url, DelayError> {
        self.base.join(path).map_err(|e| DelayError::InvalidUri {
            uri: format!("{}{}", self.base, path),
            reason: e.to_string(),
        })
    }

    async fn post_json<T: Serialize + Sync>(&self, url: Url, body: &T) -> Result<(), DelayError> {
        debug!(path = url.path(), "POST");
        let mut req = Request::new(Method::POST, url);
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *req.body_mut() = Some(serde_json::to_vec(body)?.into());

        send_accepted(&self.client, req).await.map(|_| ())
    }
}

#[async_trait]
impl<C: HttpClient> MonitoringApi for GrokClient<C> {
    async fn publish(&self, metric: &str, sample: &MetricSample) -> Result<(), DelayError> {
        let url = self.endpoint(&format!("_metrics/custom/{metric}"))?;
        self.post_json(url, sample).await
    }

    async fn list_metrics(&self) -> Result<Vec<MetricDescriptor>, DelayError> {
        let url = self.endpoint("_metrics/custom/")?;
        let text = fetch(&self.client, url.as_str()).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn register_model(&self, model: &ModelSpec) -> Result<(), DelayError> {
        let url = self.endpoint("_models")?;
        self.post_json(url, model).await
    }
}

/// Convenience for building the client from a raw base string.
pub fn grok_client<C: HttpClient>(client: C, base: &str) -> Result<GrokClient<C>, DelayError> {
    Ok(GrokClient::new(client, parse_uri(base)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    #[test]
    fn test_endpoints_join_onto_base() {
        let grok = grok_client(BasicClient::new().unwrap(), "https://grok.example.com/").unwrap();

        assert_eq!(
            grok.endpoint("_metrics/custom/mcv_delays").unwrap().as_str(),
            "https://grok.example.com/_metrics/custom/mcv_delays"
        );
        assert_eq!(
            grok.endpoint("_models").unwrap().as_str(),
            "https://grok.example.com/_models"
        );
    }
}
