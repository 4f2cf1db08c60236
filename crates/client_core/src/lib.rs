use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{BaselineId, ProductFilter},
    error::{ApiException, ErrorResponse},
    protocol::{
        BaselineCreationRequest, BaselineDuplicationRequest, BaselineSummary, ProductSummary,
    },
};
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod upload;

pub use config::{load_settings, ConsoleConfig, Messages, DEFAULT_CONFIG_FILE};
pub use error::ClientError;
pub use upload::{FileSource, OfferedFile, PartUpload, UPLOAD_FIELD};

pub type Result<T> = std::result::Result<T, ClientError>;

/// Workspace endpoints the console controllers rely on.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn list_products(&self) -> Result<Vec<ProductSummary>>;
    async fn list_configuration_items(&self) -> Result<Vec<ProductSummary>>;
    async fn list_baselines(&self, filter: &ProductFilter) -> Result<Vec<BaselineSummary>>;
    async fn create_baseline(&self, request: &BaselineCreationRequest) -> Result<BaselineSummary>;
    async fn duplicate_baseline(
        &self,
        source: BaselineId,
        request: &BaselineDuplicationRequest,
    ) -> Result<BaselineSummary>;
    async fn delete_baseline(&self, baseline_id: BaselineId) -> Result<()>;
    async fn import_part(&self, upload: PartUpload) -> Result<()>;
}

/// `reqwest` implementation of [`RemoteApi`].
#[derive(Clone)]
pub struct ConsoleClient {
    http: Client,
    config: ConsoleConfig,
}

impl ConsoleClient {
    pub fn new(config: ConsoleConfig) -> Self {
        Self::with_http(Client::new(), config)
    }

    pub fn with_http(http: Client, config: ConsoleConfig) -> Self {
        Self { http, config }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: url::Url) -> Result<T> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        Ok(error_for_status(response).await?.json().await?)
    }
}

/// Turns a non-success reply into [`ClientError::Api`], keeping the body text.
async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => {
            warn!(%status, "failed to read error body: {err}");
            String::new()
        }
    };
    Err(ApiException::new(ErrorResponse::new(status.as_u16(), text)).into())
}

#[async_trait]
impl RemoteApi for ConsoleClient {
    async fn list_products(&self) -> Result<Vec<ProductSummary>> {
        self.get_json(self.config.products_url()?).await
    }

    async fn list_configuration_items(&self) -> Result<Vec<ProductSummary>> {
        // Configuration items are served by the product collection.
        self.get_json(self.config.products_url()?).await
    }

    async fn list_baselines(&self, filter: &ProductFilter) -> Result<Vec<BaselineSummary>> {
        self.get_json(self.config.baselines_url(filter)?).await
    }

    async fn create_baseline(&self, request: &BaselineCreationRequest) -> Result<BaselineSummary> {
        let url = self.config.baselines_url(&ProductFilter::all())?;
        let response = self.http.post(url).json(request).send().await?;
        let created: BaselineSummary = error_for_status(response).await?.json().await?;
        info!(
            baseline_id = created.id.0,
            product_id = %created.configuration_item_id,
            "baseline created"
        );
        Ok(created)
    }

    async fn duplicate_baseline(
        &self,
        source: BaselineId,
        request: &BaselineDuplicationRequest,
    ) -> Result<BaselineSummary> {
        let url = self.config.baseline_duplicate_url(source)?;
        let response = self.http.post(url).json(request).send().await?;
        let duplicated: BaselineSummary = error_for_status(response).await?.json().await?;
        info!(
            source_id = source.0,
            baseline_id = duplicated.id.0,
            "baseline duplicated"
        );
        Ok(duplicated)
    }

    async fn delete_baseline(&self, baseline_id: BaselineId) -> Result<()> {
        let url = self.config.baseline_url(baseline_id)?;
        let response = self.http.delete(url).send().await?;
        error_for_status(response).await?;
        info!(baseline_id = baseline_id.0, "baseline deleted");
        Ok(())
    }

    async fn import_part(&self, upload: PartUpload) -> Result<()> {
        let url = upload.url.clone();
        let file_name = upload.file_name.clone();
        let form = upload.into_form().await?;
        let response = self.http.post(url).multipart(form).send().await?;
        error_for_status(response).await?;
        info!(file = %file_name, "part import accepted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
