//! Trait and types for talking to a custom-metric monitoring backend.

use async_trait::async_trait;
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::DelayError;

/// One data point for a custom metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricSample {
    pub value: usize,
    pub timestamp: i64,
}

impl MetricSample {
    /// A sample stamped with the current unix time.
    pub fn now(value: usize) -> Self {
        Self {
            value,
            timestamp: Utc::now().timestamp(),
        }
    }
}

/// An entry of the backend's custom metric listing. Only `uid` is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetricDescriptor {
    pub uid: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSpec {
    pub uid: String,
    pub resource: String,
    pub unit: String,
}

/// Body of a model registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSpec {
    pub datasource: String,
    pub metric_spec: MetricSpec,
}

impl ModelSpec {
    pub fn custom(uid: &str, resource: &str) -> Self {
        Self {
            datasource: "custom".to_string(),
            metric_spec: MetricSpec {
                uid: uid.to_string(),
                resource: resource.to_string(),
                unit: "%".to_string(),
            },
        }
    }
}

/// Abstraction over the monitoring backend (e.g. Grok).
#[async_trait]
pub trait MonitoringApi: Send + Sync {
    /// Posts one sample to the named custom metric.
    async fn publish(&self, metric: &str, sample: &MetricSample) -> Result<(), DelayError>;

    /// Lists the custom metrics the backend already knows about.
    async fn list_metrics(&self) -> Result<Vec<MetricDescriptor>, DelayError>;

    /// Registers an analysis model.
    async fn register_model(&self, model: &ModelSpec) -> Result<(), DelayError>;
}

/// Posts `count` as the current value of `metric`.
pub async fn publish_delays<A: MonitoringApi + ?Sized>(
    api: &A,
    metric: &str,
    count: usize,
) -> Result<(), DelayError> {
    let sample = MetricSample::now(count);
    match api.publish(metric, &sample).await {
        Ok(()) => {
            info!(
                metric,
                count,
                posted_at = %Local::now().format("%a %b %e %H:%M:%S %Y"),
                "New data posted"
            );
            Ok(())
        }
        Err(e) => {
            error!(metric, count, error = %e, "POSTING ERROR. Can't post to monitoring backend");
            Err(e)
        }
    }
}

/// Enables analysis for `metric` on the backend.
///
/// The model is registered against the uid of the *last* custom metric the
/// backend lists, whatever its name. Deployments with one custom metric are
/// unaffected; with several, whichever the backend lists last wins.
#[tracing::instrument(skip(api))]
pub async fn activate_model<A: MonitoringApi + ?Sized>(
    api: &A,
    metric: &str,
) -> Result<(), DelayError> {
    let metrics = api
        .list_metrics()
        .await
        .inspect_err(|e| error!(error = %e, "CONNECTION ERROR. Can't list custom metrics"))?;

    let Some(target) = metrics.last() else {
        error!("Analysis failed: no custom metrics listed");
        return Err(DelayError::NoMetrics);
    };

    let model = ModelSpec::custom(&target.uid, metric);
    match api.register_model(&model).await {
        Ok(()) => {
            info!(uid = %target.uid, "Analysis enabled");
            Ok(())
        }
        Err(e) => {
            info!(uid = %target.uid, error = %e, "Analysis failed");
            Err(e)
        }
    }
}
