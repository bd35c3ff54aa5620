//! Typed calls against the upstream endpoints.

use super::error::FetchError;
use super::transport::Transport;
use super::types::*;
use serde::de::DeserializeOwned;
use shared::config::ApiConfig;
use tracing::debug;

/// Upstream API client
pub struct ApiClient<T> {
    transport: T,
    endpoints: ApiConfig,
}

/// Substitute `{key}` placeholders in a URL template
pub fn fill_template(template: &str, values: &[(&str, u64)]) -> String {
    values.iter().fold(template.to_string(), |url, (key, value)| {
        url.replace(&format!("{{{}}}", key), &value.to_string())
    })
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, endpoints: ApiConfig) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// GET `url`; anything but a 200 with a matching JSON body is an error
    async fn get_json<D: DeserializeOwned>(&self, url: &str) -> Result<D, FetchError> {
        let response = self.transport.get(url).await?;

        if response.status != 200 {
            return Err(FetchError::Status(response.status));
        }

        serde_json::from_str(&response.body).map_err(|e| FetchError::decode(response.status, e))
    }

    /// Match ids listed directly under an event
    pub async fn event_match_ids(&self, event_id: u64) -> Result<Vec<u64>, FetchError> {
        let url = fill_template(&self.endpoints.event_url, &[("event_id", event_id)]);
        let listing: EventListing = self.get_json(&url).await?;
        debug!(event_id = event_id, matches = listing.events.len(), "Fetched event listing");
        Ok(listing.events.into_iter().map(|e| e.id).collect())
    }

    /// Competition ids listed under an event
    pub async fn event_competition_ids(&self, event_id: u64) -> Result<Vec<u64>, FetchError> {
        let url = fill_template(&self.endpoints.event_competitions_url, &[("event_id", event_id)]);
        let competitions: Vec<IdRef> = self.get_json(&url).await?;
        debug!(event_id = event_id, competitions = competitions.len(), "Fetched competition listing");
        Ok(competitions.into_iter().map(|c| c.id).collect())
    }

    /// Match ids listed under a competition
    pub async fn competition_match_ids(&self, competition_id: u64) -> Result<Vec<u64>, FetchError> {
        let url = fill_template(
            &self.endpoints.competition_events_url,
            &[("competition_id", competition_id)],
        );
        let events: Vec<IdRef> = self.get_json(&url).await?;
        Ok(events.into_iter().map(|e| e.id).collect())
    }

    /// Core metadata of one match
    pub async fn match_detail(&self, match_id: u64) -> Result<MatchDetail, FetchError> {
        let url = fill_template(&self.endpoints.match_url, &[("match_id", match_id)]);
        self.get_json(&url).await
    }

    /// Market groups of one detail group
    pub async fn detail_groups(
        &self,
        match_id: u64,
        group_id: u64,
    ) -> Result<Vec<GroupPayload>, FetchError> {
        let url = fill_template(
            &self.endpoints.group_url,
            &[("match_id", match_id), ("group_id", group_id)],
        );
        self.get_json(&url).await
    }
}
