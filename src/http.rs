use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::USER_AGENT;
use tracing::debug;

use crate::error::Result;

const AGENT: &str = concat!("podcast-video/", env!("CARGO_PKG_VERSION"));

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    pub body: Bytes,
}

impl Fetched {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<Fetched>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Fetched> {
        debug!("GET {}", url);
        let res = self.client.get(url).header(USER_AGENT, AGENT).send().await?;
        let status = res.status().as_u16();
        let body = res.bytes().await?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(Fetched { status, body })
    }
}
