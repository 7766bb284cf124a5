use crate::errors::Result;
use crate::model::{OralHistoriesResponse, OralHistory, Site};
use crate::render::{oral_history_card, site_card, Collection, Listing};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Read-only client for the heritage API.
///
/// Each load is a single best-effort request: no retry, no timeout.
#[derive(Debug, Clone)]
pub struct HeritageClient {
    base_url: String,
    http: reqwest::Client,
}

impl HeritageClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_url, collection.path())
    }

    async fn get_json<T: DeserializeOwned>(&self, collection: Collection) -> Result<T> {
        let url = self.url(collection);
        debug!("GET {}", url);

        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(body)
    }

    pub async fn fetch_sites(&self) -> Result<Vec<Site>> {
        self.get_json(Collection::Sites).await
    }

    pub async fn fetch_oral_histories(&self) -> Result<Vec<OralHistory>> {
        let body: OralHistoriesResponse = self.get_json(Collection::OralHistories).await?;
        Ok(body.data)
    }

    pub async fn load_sites(&self) -> Listing {
        let result = self.fetch_sites().await;
        log_outcome(Collection::Sites, &result);
        Listing::from_result(Collection::Sites, result, site_card)
    }

    pub async fn load_oral_histories(&self) -> Listing {
        let result = self.fetch_oral_histories().await;
        log_outcome(Collection::OralHistories, &result);
        Listing::from_result(Collection::OralHistories, result, oral_history_card)
    }
}

fn log_outcome<T>(collection: Collection, result: &Result<Vec<T>>) {
    match result {
        Ok(items) => info!("Loaded {} {}", items.len(), collection.path()),
        Err(e) => warn!("Failed to load {}: {}", collection.path(), e),
    }
}
