//! People directory lookup
//!
//! The [`PeopleLookup`] trait is the seam to the external user directory. The production
//! implementation talks to the Bugzilla REST API; tests plug in an in-memory directory.

use crate::config::DirectorySettings;
use crate::error::ApiError;
use crate::people::{PersonId, Profile};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

const PROFILE_FIELDS: &str = "real_name,nick,name,id,email";
const API_KEY_HEADER: &str = "x-bugzilla-api-key";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// External user directory
pub trait PeopleLookup {
    /// Fetch profiles for the given ids in one batched request.
    fn lookup_people(&self, ids: &[PersonId]) -> Result<HashMap<PersonId, Profile>, ApiError>;

    /// Search the directory by free text (name, nick or email).
    fn search_people(&self, query: &str) -> Result<Vec<Profile>, ApiError>;
}

#[derive(Deserialize)]
struct UsersResponse {
    #[serde(default)]
    users: Vec<Profile>,
}

fn map_http_error(error: reqwest::Error) -> ApiError {
    match error.status().map(|s| s.as_u16()) {
        Some(401) | Some(403) => {
            ApiError::ServiceAuthFailed(format!("Authentication failed: {}", error))
        }
        Some(429) => ApiError::ServiceRateLimit(format!("Rate limit exceeded: {}", error)),
        Some(status) => {
            ApiError::ServiceError(format!("Request failed with status {}: {}", status, error))
        }
        None if error.is_timeout() => ApiError::ServiceError(format!("Request timeout: {}", error)),
        None if error.is_connect() => {
            ApiError::ServiceError(format!("Connection error: {}", error))
        }
        None => ApiError::ServiceError(format!("HTTP error: {}", error)),
    }
}

/// Bugzilla REST client for the `user` endpoint.
pub struct BugzillaClient {
    client: Client,
    base_url: String,
    rate_limit_delay: Duration,
}

impl BugzillaClient {
    /// Build a client from settings. An absent API key is a [`ApiError::MissingCredentials`].
    pub fn new(settings: &DirectorySettings) -> Result<Self, ApiError> {
        let api_key = settings
            .resolved_api_key()
            .ok_or_else(|| ApiError::MissingCredentials("no Bugzilla API key".to_string()))?;

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&api_key)
            .map_err(|_| ApiError::ConfigError("API key is not a valid header value".to_string()))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&settings.user_agent)
                .map_err(|_| ApiError::ConfigError("Invalid user agent".to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ApiError::ServiceError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            rate_limit_delay: Duration::from_millis(settings.rate_limit_delay_ms),
        })
    }

    fn get_users(&self, params: &[(&str, String)]) -> Result<Vec<Profile>, ApiError> {
        std::thread::sleep(self.rate_limit_delay);
        let url = format!("{}/user", self.base_url);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("include_fields", PROFILE_FIELDS)])
            .send()
            .map_err(map_http_error)?
            .error_for_status()
            .map_err(map_http_error)?;

        let body: UsersResponse = response
            .json()
            .map_err(|e| ApiError::ServiceError(format!("Invalid response body: {}", e)))?;
        Ok(body.users)
    }
}

impl PeopleLookup for BugzillaClient {
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    fn lookup_people(&self, ids: &[PersonId]) -> Result<HashMap<PersonId, Profile>, ApiError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let params: Vec<(&str, String)> = ids.iter().map(|id| ("ids", id.to_string())).collect();
        let users = self.get_users(&params)?;
        debug!(found = users.len(), "Directory lookup completed");
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    #[instrument(skip(self))]
    fn search_people(&self, query: &str) -> Result<Vec<Profile>, ApiError> {
        self.get_users(&[("match", query.to_string())])
    }
}

/// Fetch profiles for a read-only load. Directory failures degrade to "no profile data".
pub fn lookup_or_empty(
    lookup: Option<&dyn PeopleLookup>,
    ids: &[PersonId],
) -> HashMap<PersonId, Profile> {
    let Some(lookup) = lookup else {
        return HashMap::new();
    };
    match lookup.lookup_people(ids) {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::warn!("People directory unavailable, using stored records: {}", e);
            HashMap::new()
        }
    }
}
