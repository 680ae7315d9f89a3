//! Keepalive pinger
//!
//! Periodically GETs the service's own public URL so that hosting platforms
//! which idle inactive services keep this one warm. Shares no state with
//! request handling.

use std::time::Duration;

use chrono::Utc;
use reqwest::{StatusCode, Url};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::CoreError;

#[derive(Clone, Debug)]
pub struct Keepalive {
    client: reqwest::Client,
    url: Url,
    period: Duration,
}

impl Keepalive {
    pub fn new(url: &str, period: Duration) -> Result<Self, CoreError> {
        let url = Url::parse(url).map_err(|e| CoreError::InvalidUrl(format!("{url}: {e}")))?;
        if period.is_zero() {
            return Err(CoreError::InvalidPeriod("keepalive period must be positive".into()));
        }
        Ok(Self { client: reqwest::Client::new(), url, period })
    }

    /// Issue a single GET and report the response status.
    pub async fn ping_once(&self) -> Result<StatusCode, CoreError> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| CoreError::Network(e.to_string()))?;
        Ok(resp.status())
    }

    /// Run forever on a fixed period; the first ping happens one period after start.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(url = %self.url, period_secs = self.period.as_secs(), "keepalive pinger started");
            loop {
                ticker.tick().await;
                let at = Utc::now().to_rfc3339();
                match self.ping_once().await {
                    Ok(status) => info!(%at, status = status.as_u16(), url = %self.url, "keepalive ping"),
                    Err(e) => warn!(%at, error = %e, url = %self.url, "keepalive ping failed"),
                }
            }
        })
    }
}
