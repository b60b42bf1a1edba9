//! Places-search collaborator client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use placebot_core::{ExploreResponse, Location, PlacesProvider, Query};

use crate::retry::with_retries;

/// Pinned provider API version date.
const API_VERSION: &str = "20160108";

/// Delays between retry attempts, in seconds.
const RETRY_DELAYS: [u64; 2] = [2, 4];

pub struct FoursquareProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    base_url: String,
}

impl FoursquareProvider {
    pub fn new(
        client_id: String,
        client_secret: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        info!("Creating FoursquareProvider");
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            client_id,
            client_secret,
            base_url: "https://api.foursquare.com".to_string(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn try_explore(&self, query: &Query) -> anyhow::Result<ExploreResponse> {
        let mut params = vec![
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
        ];
        params.extend(query_params(query));

        // Soft failures (geocode) arrive with a non-2xx status and a
        // meta block, so the body is parsed regardless of status.
        let response = self
            .client
            .get(format!("{}/v2/venues/explore", self.base_url))
            .query(&params)
            .send()
            .await?
            .json::<ExploreResponse>()
            .await?;
        Ok(response)
    }
}

/// Non-credential query-string parameters for one search.
fn query_params(query: &Query) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("v", API_VERSION.to_string()),
        ("m", "foursquare".to_string()),
        ("section", query.category.as_section().to_string()),
        ("limit", query.limit.to_string()),
        ("venuePhotos", "1".to_string()),
    ];
    match &query.location {
        Location::Address(_) => params.push(("near", query.location.query_value())),
        Location::Coordinates { .. } => params.push(("ll", query.location.query_value())),
    }
    if query.open_now {
        params.push(("openNow", "1".to_string()));
    }
    if query.sort_by_distance {
        params.push(("sortByDistance", "1".to_string()));
    }
    params
}

#[async_trait]
impl PlacesProvider for FoursquareProvider {
    async fn explore(&self, query: &Query) -> anyhow::Result<ExploreResponse> {
        info!(
            "Searching venues: section={}, location={}",
            query.category.as_section(),
            query.location.query_value()
        );
        match with_retries(|| self.try_explore(query), &RETRY_DELAYS).await {
            Ok(response) => Ok(response),
            Err(e)
                if e.downcast_ref::<reqwest::Error>()
                    .is_some_and(reqwest::Error::is_timeout) =>
            {
                // A timed-out call is "no response": degrade like an
                // empty result instead of failing the turn.
                warn!("Provider call timed out; treating as no response");
                Ok(ExploreResponse::default())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placebot_core::VenueCategory;

    fn value_of(params: &[(&'static str, String)], key: &str) -> Option<String> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    }

    #[test]
    fn address_queries_use_the_near_parameter() {
        let query = Query::new(
            VenueCategory::Coffee,
            Location::Address("Berlin".to_string()),
        );
        let params = query_params(&query);
        assert_eq!(value_of(&params, "near"), Some("Berlin".to_string()));
        assert_eq!(value_of(&params, "ll"), None);
        assert_eq!(value_of(&params, "section"), Some("coffee".to_string()));
        assert_eq!(value_of(&params, "limit"), Some("5".to_string()));
    }

    #[test]
    fn coordinate_queries_use_the_ll_parameter() {
        let query = Query::new(
            VenueCategory::TopPicks,
            Location::Coordinates {
                lat: 37.77,
                long: -122.42,
            },
        );
        let params = query_params(&query);
        assert_eq!(value_of(&params, "ll"), Some("37.77, -122.42".to_string()));
        assert_eq!(value_of(&params, "near"), None);
        assert_eq!(value_of(&params, "section"), Some("topPicks".to_string()));
    }

    #[test]
    fn filter_flags_appear_only_when_set() {
        let mut query = Query::new(
            VenueCategory::Food,
            Location::Address("Berlin".to_string()),
        );
        assert_eq!(value_of(&query_params(&query), "openNow"), None);
        assert_eq!(value_of(&query_params(&query), "sortByDistance"), None);

        query.open_now = true;
        query.sort_by_distance = true;
        let params = query_params(&query);
        assert_eq!(value_of(&params, "openNow"), Some("1".to_string()));
        assert_eq!(value_of(&params, "sortByDistance"), Some("1".to_string()));
    }
}
