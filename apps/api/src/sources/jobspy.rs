//! JobSpy sidecar client. Scrapes LinkedIn/Indeed through a small HTTP
//! wrapper around the JobSpy library.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::posting::PostingCandidate;
use crate::sources::{JobSource, SearchQuery, SourceError};

const SEARCH_PATH: &str = "/api/v1/search_jobs";

/// Wire body. The country goes out as `country_indeed`; JobSpy ignores a
/// plain `country` key.
#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    site_name: &'a [String],
    search_term: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_indeed: Option<&'a str>,
    experience_level: &'a str,
    hours_old: u32,
    job_type: &'a str,
    results_wanted: u32,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    jobs: Vec<PostingCandidate>,
}

#[derive(Clone)]
pub struct JobSpyClient {
    client: Client,
    endpoint: String,
    sites: Vec<String>,
}

impl JobSpyClient {
    pub fn new(base_url: &str, sites: Vec<String>, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: format!("{}{SEARCH_PATH}", base_url.trim_end_matches('/')),
            sites,
        })
    }

    fn request_body<'a>(&'a self, query: &'a SearchQuery) -> ScrapeRequest<'a> {
        ScrapeRequest {
            site_name: &self.sites,
            search_term: &query.search_term,
            country_indeed: query.country.as_deref(),
            experience_level: &query.experience_level,
            hours_old: query.hours_old,
            job_type: &query.job_type,
            results_wanted: query.results_wanted,
        }
    }
}

#[async_trait]
impl JobSource for JobSpyClient {
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<PostingCandidate>, SourceError> {
        info!(
            "Scraping {:?} for '{}' (country: {}, level: {}, max age: {}h)",
            self.sites,
            query.search_term,
            query.country.as_deref().unwrap_or("any"),
            query.experience_level,
            query.hours_old
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: ScrapeResponse = response.json().await?;
        Ok(body.jobs)
    }
}
