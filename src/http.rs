//! Outbound HTTP capability shared by the price providers.
//!
//! Providers only need "GET this URL and give me the JSON body", so that is
//! all the [`JsonFetcher`] trait exposes. The production implementation wraps
//! a `reqwest` client with a per-request timeout.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Issue a single GET and decode the body as JSON.
    async fn get_json(&self, url: Url) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl JsonFetcher for ReqwestFetcher {
    async fn get_json(&self, url: Url) -> Result<Value> {
        tracing::debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .context("request failed")?
            .error_for_status()
            .context("non-success status")?;

        let body = resp.bytes().await.context("read body failed")?;
        serde_json::from_slice(&body).context("parse JSON failed")
    }
}
