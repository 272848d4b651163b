use reqwest::Client;

use crate::directory::IndexRequest;
use crate::error::{CatalogError, Result};
use crate::model::ProcessedModel;

/// Client for the site's model index endpoint.
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/models[?provider=]`: the full model index.
    pub async fn fetch_index(&self, req: &IndexRequest) -> Result<Vec<ProcessedModel>> {
        let url = format!("{}{}", self.base_url, req.path());
        tracing::debug!("fetching model index: {url}");
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Api { status, body });
        }
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn fetch_models(&self, provider: Option<&str>) -> Result<Vec<ProcessedModel>> {
        self.fetch_index(&IndexRequest {
            provider: provider.map(str::to_string),
        })
        .await
    }
}
