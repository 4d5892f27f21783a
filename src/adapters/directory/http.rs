//! HTTP client for the portal's directory service.
//!
//! # Endpoints
//!
//! - `GET {base}/users/{user_id}/context` → `DirectoryEntry`
//! - `GET {base}/students/{profile_id}/class` → `{"class_id": "..." | null}`
//! - `GET {base}/schools/{school_id}` → 200 if the school exists, 404 if not
//!
//! Transport failures and 5xx answers map to `DirectoryError::Unavailable`.
//! No request is retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::domain::foundation::{ClassId, ProfileId, SchoolId, UserId};
use crate::ports::{
    ClassRoster, DirectoryEntry, DirectoryError, DirectoryGateway, SchoolRegistry,
};

/// Configuration for the directory client.
#[derive(Debug, Clone)]
pub struct HttpDirectoryConfig {
    /// Base URL, e.g. "https://directory.internal/api".
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpDirectoryConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct StudentClassResponse {
    #[serde(default)]
    class_id: Option<ClassId>,
}

/// Directory service client.
pub struct HttpDirectory {
    base_url: Url,
    http_client: reqwest::Client,
}

impl HttpDirectory {
    pub fn new(config: HttpDirectoryConfig) -> Result<Self, DirectoryError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DirectoryError::malformed(format!("invalid base url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DirectoryError::malformed("base url cannot carry a path"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DirectoryError::unavailable(format!("cannot build client: {}", e)))?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, DirectoryError> {
        tracing::debug!("Directory request {}", url);

        let response = self.http_client.get(url).send().await.map_err(|e| {
            tracing::error!("Directory request failed: {}", e);
            DirectoryError::unavailable(e.to_string())
        })?;

        let status = response.status();
        if status.is_server_error() {
            tracing::error!("Directory returned {}", status);
            return Err(DirectoryError::unavailable(format!(
                "directory returned {}",
                status
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl DirectoryGateway for HttpDirectory {
    async fn resolve_user_context(&self, user_id: &UserId) -> Result<DirectoryEntry, DirectoryError> {
        let response = self
            .get(self.endpoint(&["users", user_id.as_str(), "context"]))
            .await?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(|e| {
                tracing::error!("Failed to parse directory entry: {}", e);
                DirectoryError::malformed(e.to_string())
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                Err(DirectoryError::Unauthorized)
            }
            other => Err(DirectoryError::malformed(format!("unexpected status {}", other))),
        }
    }
}

#[async_trait]
impl ClassRoster for HttpDirectory {
    async fn student_class(&self, profile_id: &ProfileId) -> Result<Option<ClassId>, DirectoryError> {
        let response = self
            .get(self.endpoint(&["students", profile_id.as_str(), "class"]))
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: StudentClassResponse = response
                    .json()
                    .await
                    .map_err(|e| DirectoryError::malformed(e.to_string()))?;
                Ok(body.class_id)
            }
            StatusCode::NOT_FOUND => Ok(None),
            other => Err(DirectoryError::malformed(format!("unexpected status {}", other))),
        }
    }
}

#[async_trait]
impl SchoolRegistry for HttpDirectory {
    async fn school_exists(&self, school_id: &SchoolId) -> Result<bool, DirectoryError> {
        let response = self.get(self.endpoint(&["schools", school_id.as_str()])).await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            other => Err(DirectoryError::malformed(format!("unexpected status {}", other))),
        }
    }
}
