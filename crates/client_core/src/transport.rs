use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::{
    error::{ApiError, ApiException},
    protocol::{
        submit_info_route, submit_uncategorized_update_route, ProcessingResult, SubmitInfoRequest,
        UncategorizedUpdate,
    },
};
use tracing::debug;
use url::Url;

use crate::CategorizerBackend;

/// Talks to the categorization server over HTTP/JSON.
pub struct HttpCategorizerBackend {
    http: Client,
    base_url: Url,
}

impl HttpCategorizerBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// No timeout is applied unless one is given.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("invalid server url '{base_url}'"))?;
        // Routes join relative to the base, so a path prefix must end in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post_json<T: Serialize + ?Sized>(&self, route: &str, body: &T) -> Result<ProcessingResult> {
        let url = self
            .base_url
            .join(route.trim_start_matches('/'))
            .with_context(|| format!("failed to build url for {route}"))?;
        debug!(%url, "posting to categorizer");

        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ApiError>(&text) {
                Ok(api_error) => anyhow::Error::from(ApiException::from(api_error)),
                Err(_) => anyhow!("{url} returned {status}: {text}"),
            });
        }

        response
            .json()
            .await
            .with_context(|| format!("malformed response from {url}"))
    }
}

#[async_trait]
impl CategorizerBackend for HttpCategorizerBackend {
    async fn submit_info(&self, request: &SubmitInfoRequest) -> Result<ProcessingResult> {
        self.post_json(submit_info_route(), request).await
    }

    async fn submit_uncategorized_update(
        &self,
        update: &UncategorizedUpdate,
    ) -> Result<ProcessingResult> {
        self.post_json(submit_uncategorized_update_route(), update)
            .await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
