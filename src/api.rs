//! Rick and Morty character API client

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{ApiResponse, Character};

pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api/character";
pub const DEFAULT_USER_AGENT: &str = concat!("CharacterExplorer/", env!("CARGO_PKG_VERSION"));

/// Failure of a single API call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("HTTP error! Status: {status}")]
    Http { status: u16 },
    /// The request never got a response
    #[error("Network error: {0}")]
    Network(String),
    /// The body was not the JSON shape we expected
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Anything that can answer collection and by-id queries
pub trait CharacterSource: Send + Sync {
    fn fetch_page(&self, url: &str) -> Result<ApiResponse, ApiError>;
    fn fetch_character(&self, id: i64) -> Result<Character, ApiError>;
}

pub struct CharacterClient {
    agent: ureq::Agent,
    base_url: String,
    user_agent: String,
}

impl CharacterClient {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        if !user_agent.trim().is_empty() {
            self.user_agent = user_agent.to_string();
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn character_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// GET `url` and decode the body as `T`. One request, no retries.
    pub fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        log::debug!("GET {}", url);

        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("GET {} returned {}", url, status);
            return Err(ApiError::Http { status: status.as_u16() });
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl CharacterSource for CharacterClient {
    fn fetch_page(&self, url: &str) -> Result<ApiResponse, ApiError> {
        self.fetch_json(url)
    }

    fn fetch_character(&self, id: i64) -> Result<Character, ApiError> {
        let url = self.character_url(id);
        self.fetch_json(&url)
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
