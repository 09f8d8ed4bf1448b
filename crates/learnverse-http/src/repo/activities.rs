use reqwest::Method;
use tracing::instrument;

use learnverse_core::Result;
use learnverse_core::error::InvalidInputError;
use learnverse_core::model::{Activity, ActivityFilter, Page, ProximityQuery};

use crate::client::ApiClient;
use crate::endpoints::{
    ACTIVITIES, ACTIVITIES_FILTER, ACTIVITIES_MY_FEED, ACTIVITIES_NATURAL_SEARCH,
    ACTIVITIES_PROXIMITY, NaturalSearchRequest,
};

/// Activity discovery: personal feed, filters, proximity and natural-language search.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    client: ApiClient,
}

impl ActivityRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Activities recommended for the signed-in user.
    #[instrument(skip(self))]
    pub async fn my_feed(&self) -> Result<Vec<Activity>> {
        self.client.send_json(self.client.get(ACTIVITIES_MY_FEED)).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Activity> {
        let request = self
            .client
            .request_at(Method::GET, ACTIVITIES, [id.to_string()]);
        self.client.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn filter(&self, filter: &ActivityFilter) -> Result<Page<Activity>> {
        let request = self.client.get(ACTIVITIES_FILTER).query(filter)?;
        self.client.send_json(request).await
    }

    /// Activities within `query.radius_km` of a point.
    #[instrument(skip(self))]
    pub async fn nearby(&self, query: &ProximityQuery) -> Result<Page<Activity>> {
        if !(-90.0..=90.0).contains(&query.latitude) || !(-180.0..=180.0).contains(&query.longitude)
        {
            return Err(InvalidInputError::Other {
                message: format!(
                    "coordinates out of range: {}, {}",
                    query.latitude, query.longitude
                ),
            }
            .into());
        }

        let request = self.client.get(ACTIVITIES_PROXIMITY).query(query)?;
        self.client.send_json(request).await
    }

    /// Free-text search ranked by the server.
    #[instrument(skip(self))]
    pub async fn search_natural(&self, query: &str, page: u32, size: u32) -> Result<Page<Activity>> {
        if query.trim().is_empty() {
            return Err(InvalidInputError::Required { field: "query" }.into());
        }

        let request = self
            .client
            .post(ACTIVITIES_NATURAL_SEARCH)
            .json(&NaturalSearchRequest { query, page, size })?;
        self.client.send_json(request).await
    }
}
