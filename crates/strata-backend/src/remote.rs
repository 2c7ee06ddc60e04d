//! Remote HTTP backend
//!
//! Paged fetches against the investment-data service. The server is trusted
//! to have applied sector, sort, filter, and pagination; results are not
//! re-validated or re-filtered here.

use crate::backend::{BackendError, ExecutionBackend, FetchedPage};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use strata_query::{FilterOperator, QueryDescriptor};
use strata_sector::{Record, Sector};
use tracing::{debug, error};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote service configuration
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Service base URL, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Configuration with the default timeout
    #[inline]
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Wire shape of the paged list response
///
/// The service reports the grand total row count in a field named
/// `totalPages`; the name is historical and preserved for compatibility.
#[derive(Debug, Deserialize)]
struct PagedResponse {
    data: Vec<Record>,
    #[serde(rename = "totalPages")]
    total_pages: u64,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    data: DetailBody,
}

#[derive(Debug, Deserialize)]
struct DetailBody {
    property: Record,
    meta: DetailMeta,
}

#[derive(Debug, Deserialize)]
struct DetailMeta {
    previous_property_id: Option<i64>,
    next_property_id: Option<i64>,
}

/// One record with its neighbors in the server's record ordering
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDetail {
    /// The record itself
    pub property: Record,
    /// Id of the previous record, if any
    pub previous_id: Option<i64>,
    /// Id of the next record, if any
    pub next_id: Option<i64>,
}

/// HTTP execution backend
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteBackend {
    /// Create a backend for the configured service
    ///
    /// # Errors
    /// Fails with [`BackendError::Transport`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: RemoteConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn list_url(&self) -> String {
        format!(
            "{}/investment-data",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn detail_url(&self, id: i64) -> String {
        format!(
            "{}/investment-data/{id}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn list_params(descriptor: &QueryDescriptor) -> Result<Vec<(&'static str, String)>, BackendError> {
        let mut params = vec![
            ("sector", descriptor.sector.key().to_string()),
            ("page", descriptor.page.to_string()),
            ("limit", descriptor.page_size.to_string()),
        ];
        if let Some(sort) = &descriptor.sort_by {
            params.push(("sortBy", format!("{}:{}", sort.field, sort.direction.as_str())));
        }
        if descriptor.has_filters() {
            params.push(("filter", serde_json::to_string(&descriptor.filters)?));
        }
        if let Some(owner_id) = descriptor.restrict_to_owner_id {
            params.push(("updatedById", owner_id.to_string()));
        }
        Ok(params)
    }

    /// Fetch one record with previous/next navigation metadata
    ///
    /// This is the detail-view path; it bypasses the page cache entirely.
    ///
    /// # Errors
    /// Fails with [`BackendError::NotFound`] when the service answers 404,
    /// and [`BackendError::Transport`] for any other failure.
    pub async fn fetch_detail(
        &self,
        id: i64,
        sector: Sector,
    ) -> Result<RecordDetail, BackendError> {
        let response = self
            .client
            .get(self.detail_url(id))
            .query(&[("sector", sector.key())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound);
        }
        let envelope: DetailEnvelope = response.error_for_status()?.json().await?;

        Ok(RecordDetail {
            property: envelope.data.property,
            previous_id: envelope.data.meta.previous_property_id,
            next_id: envelope.data.meta.next_property_id,
        })
    }
}

#[async_trait]
impl ExecutionBackend for RemoteBackend {
    async fn fetch(&self, descriptor: &QueryDescriptor) -> Result<FetchedPage, BackendError> {
        let params = Self::list_params(descriptor)?;
        debug!(sector = %descriptor.sector, page = descriptor.page, "remote page fetch");

        let response = self
            .client
            .get(self.list_url())
            .query(&params)
            .send()
            .await
            .map_err(|err| {
                error!(sector = %descriptor.sector, %err, "remote fetch failed");
                BackendError::Transport(err)
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound);
        }
        let payload: PagedResponse = response.error_for_status()?.json().await?;

        // With active filters the service's grand total does not reflect the
        // filter, so the filtered row count actually returned is reported
        // instead. Preserved for compatibility with the source system.
        let total_count = if descriptor.has_filters() {
            payload.data.len() as u64
        } else {
            payload.total_pages
        };

        Ok(FetchedPage {
            rows: payload.data,
            total_count,
        })
    }

    fn supported_operators(&self) -> &'static [FilterOperator] {
        &[FilterOperator::Contains, FilterOperator::Equals]
    }
}
