//! HTTP transport collaborator.
//!
//! Scrapers never talk to the network directly; they go through [`HttpClient`]
//! so tests can swap the transport out. [`ReqwestClient`] is the default
//! implementation. Timeouts and retries belong to the transport, not here.

use anyhow;
use async_trait::async_trait;
use log::trace;
use reqwest;

/// Minimal view of an HTTP response: status code and body text.
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> anyhow::Result<HttpResponse>;
}

/// Default transport backed by `reqwest`.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> ReqwestClient {
        ReqwestClient {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> anyhow::Result<HttpResponse> {
        trace!("ReqwestClient::get({})", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Appends `isbn=<isbn>` to a base URL, keeping any query string or fragment
/// the base already carries.
pub fn provider_url(base: &str, isbn: &str) -> String {
    let (head, fragment) = match base.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (base, None),
    };

    let separator = if head.contains('?') { '&' } else { '?' };

    match fragment {
        Some(fragment) => format!("{}{}isbn={}#{}", head, separator, isbn, fragment),
        None => format!("{}{}isbn={}", head, separator, isbn),
    }
}
