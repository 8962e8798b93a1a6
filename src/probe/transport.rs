//! HTTP transport seam for the probe scheduler.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use std::time::Duration;

use crate::errors::{PhoenixError, PhoenixResult, ProbeError};

/// The parts of an HTTP response classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// URL after redirects.
    pub final_url: String,
    /// Body prefix, truncated to the transport's read limit.
    pub body: Bytes,
}

/// Issues a single GET. Implementations must bound how much body they read.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, ProbeError>;
}

/// `reqwest`-backed transport with a bounded body read.
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
    max_body_bytes: usize,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str, timeout: Duration, max_body_bytes: usize) -> PhoenixResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| PhoenixError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            timeout,
            max_body_bytes,
        })
    }

    fn map_error(&self, err: reqwest::Error) -> ProbeError {
        if err.is_timeout() {
            ProbeError::Timeout(self.timeout)
        } else if err.is_connect() {
            ProbeError::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            ProbeError::Body(err.to_string())
        } else {
            ProbeError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, ProbeError> {
        let mut response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml,application/xml")
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        let mut body = BytesMut::with_capacity(self.max_body_bytes.min(16 * 1024));
        while body.len() < self.max_body_bytes {
            match response.chunk().await.map_err(|e| self.map_error(e))? {
                Some(chunk) => body.extend_from_slice(&chunk),
                None => break,
            }
        }
        body.truncate(self.max_body_bytes);

        Ok(HttpResponse {
            status,
            final_url,
            body: body.freeze(),
        })
    }
}
