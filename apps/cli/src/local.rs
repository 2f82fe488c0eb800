use anyhow::Result;
use async_trait::async_trait;
use client_core::CategorizerBackend;
use server_api::ApiContext;
use shared::{
    error::ApiException,
    protocol::{ProcessingResult, SubmitInfoRequest, UncategorizedUpdate},
};

/// Runs categorization in-process through the same handlers the server uses.
#[derive(Clone, Default)]
pub struct LocalCategorizerBackend {
    ctx: ApiContext,
}

impl LocalCategorizerBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategorizerBackend for LocalCategorizerBackend {
    async fn submit_info(&self, request: &SubmitInfoRequest) -> Result<ProcessingResult> {
        server_api::submit_info(&self.ctx, request.clone())
            .await
            .map_err(|err| ApiException::from(err).into())
    }

    async fn submit_uncategorized_update(
        &self,
        update: &UncategorizedUpdate,
    ) -> Result<ProcessingResult> {
        server_api::submit_uncategorized_update(&self.ctx, update.clone())
            .await
            .map_err(|err| ApiException::from(err).into())
    }
}
