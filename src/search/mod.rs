// Client for the HTTP search index. Only the pieces the API and the
// retirement command need; index population is driven elsewhere.

use thiserror::Error;
use uuid::Uuid;

use crate::config::SearchConfig;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search index returned status {0}")]
    UnexpectedStatus(u16),
}

pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
    profile_index: String,
}

impl SearchClient {
    pub fn new(cfg: &SearchConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            profile_index: cfg.profile_index.clone(),
        }
    }

    /// Remove a user's profile document from the index. A 404 from the index
    /// counts as success; the document is gone either way.
    pub async fn delete_profile(&self, user_id: Uuid) -> Result<(), SearchError> {
        let url = format!(
            "{}/{}/_doc/{}",
            self.base_url, self.profile_index, user_id
        );

        let response = self.http.delete(&url).send().await?;
        let status = response.status();

        if status.is_success() || status.as_u16() == 404 {
            Ok(())
        } else {
            Err(SearchError::UnexpectedStatus(status.as_u16()))
        }
    }
}
