//! Grid controller
//!
//! One controller per view/session. The controller owns its cache and its
//! backend choice, so clearing on sector switch is local state management,
//! never global coordination.

use crate::host::{FetchOutcome, LoadingFlag, RowFetchRequest, ServedPage};
use std::collections::BTreeMap;
use std::sync::Arc;
use strata_backend::{BackendError, ExecutionBackend};
use strata_query::{
    BuildError, CallerScope, DescriptorBuilder, QueryCache, QueryDescriptor, RowWindow,
};
use strata_sector::{FieldDescriptor, Sector, SectorRegistry, UnknownSectorError};
use tracing::{debug, info, warn};

/// Default rows per page, matching the host grid's block size
const DEFAULT_PAGE_SIZE: u64 = 500;

/// Errors that cross the controller's public contract
///
/// Backend failures never appear here; they are translated into
/// [`FetchOutcome::Failed`]. These variants are routing/programmer errors
/// that bypass the cache entirely.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The sector key does not resolve against the registry; the host
    /// should redirect to [`Sector::DEFAULT`]
    #[error(transparent)]
    UnknownSector(#[from] UnknownSectorError),

    /// The request could not be normalized into a descriptor
    #[error("invalid row-fetch request: {0}")]
    InvalidRequest(String),
}

impl From<BuildError> for GridError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::UnknownSector(inner) => GridError::UnknownSector(inner),
            BuildError::InvalidPageSize => {
                GridError::InvalidRequest("page size must be positive".to_string())
            }
        }
    }
}

/// Sector-session grid orchestrator
///
/// Drives one request at a time from a single logical caller. Overlapping
/// requests are not coalesced: each builds, executes, and populates
/// independently, and the later cache write wins. That is benign because
/// results for an identical descriptor are interchangeable.
pub struct GridController {
    registry: Arc<SectorRegistry>,
    backend: Arc<dyn ExecutionBackend>,
    builder: DescriptorBuilder,
    cache: QueryCache,
    scope: CallerScope,
    sector: Sector,
    columns: Vec<FieldDescriptor>,
    page_size: u64,
    loading: LoadingFlag,
    total_records: Option<u64>,
}

impl GridController {
    /// Create a controller for one sector session
    ///
    /// The backend is fixed for the controller's lifetime; orchestration
    /// never branches on which implementation is behind the trait.
    ///
    /// # Errors
    /// Fails with [`GridError::UnknownSector`] when the key does not
    /// resolve; the host redirects to [`Sector::DEFAULT`].
    pub fn new(
        registry: Arc<SectorRegistry>,
        backend: Arc<dyn ExecutionBackend>,
        scope: CallerScope,
        sector_key: &str,
    ) -> Result<Self, GridError> {
        let sector = registry.resolve(sector_key)?;
        let columns = registry.fields_for(sector)?.to_vec();
        Ok(Self {
            builder: DescriptorBuilder::new(Arc::clone(&registry)),
            registry,
            backend,
            cache: QueryCache::new(),
            scope,
            sector,
            columns,
            page_size: DEFAULT_PAGE_SIZE,
            loading: LoadingFlag::default(),
            total_records: None,
        })
    }

    /// Override the page size
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Active sector
    #[inline]
    #[must_use]
    pub fn sector(&self) -> Sector {
        self.sector
    }

    /// Column schema for the active sector
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[FieldDescriptor] {
        &self.columns
    }

    /// Rows per page
    #[inline]
    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Shared handle to the busy indicator
    #[inline]
    #[must_use]
    pub fn loading(&self) -> LoadingFlag {
        self.loading.clone()
    }

    /// Whether a request is currently in flight
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Grand total recorded by the last [`Self::refresh_total`] probe
    #[inline]
    #[must_use]
    pub fn total_records(&self) -> Option<u64> {
        self.total_records
    }

    /// Serve one page to the host
    ///
    /// Cache hits are served without touching the backend; misses execute
    /// the backend and populate the cache before serving. Backend failures
    /// come back as [`FetchOutcome::Failed`].
    ///
    /// # Errors
    /// Only descriptor-build failures surface here; see [`GridError`].
    pub async fn fetch_rows(&self, request: &RowFetchRequest) -> Result<FetchOutcome, GridError> {
        self.loading.set(true);
        let outcome = self.fetch_rows_inner(request).await;
        self.loading.set(false);
        outcome
    }

    async fn fetch_rows_inner(
        &self,
        request: &RowFetchRequest,
    ) -> Result<FetchOutcome, GridError> {
        debug!(
            sector = %self.sector,
            start_row = request.start_row,
            end_row = request.end_row,
            "building descriptor"
        );
        let descriptor = self.builder.build(
            self.sector.key(),
            RowWindow {
                start_row: request.start_row,
                page_size: self.page_size,
            },
            request.sort_model.clone(),
            &request.filter_model,
            self.scope,
            self.backend.supported_operators(),
        )?;

        if let Some(entry) = self.cache.get(&descriptor) {
            debug!(sector = %self.sector, page = descriptor.page, "cache hit");
            return Ok(FetchOutcome::Served(ServedPage {
                rows: entry.rows.clone(),
                total_count: entry.total_count,
                from_cache: true,
            }));
        }

        debug!(sector = %self.sector, page = descriptor.page, "cache miss; executing backend");
        match self.backend.fetch(&descriptor).await {
            Ok(page) => {
                self.cache.put(&descriptor, page.rows.clone(), page.total_count);
                if page.is_empty() {
                    info!(sector = %self.sector, page = descriptor.page, "serving empty page");
                }
                Ok(FetchOutcome::Served(ServedPage {
                    rows: page.rows,
                    total_count: page.total_count,
                    from_cache: false,
                }))
            }
            Err(err) => {
                warn!(sector = %self.sector, page = descriptor.page, %err, "backend failure");
                Ok(FetchOutcome::Failed)
            }
        }
    }

    /// Switch the active sector
    ///
    /// Clears the cache in bulk, rebuilds the column schema from the
    /// registry, and drops the recorded total. An in-flight fetch that
    /// completes afterwards may repopulate a key for the previous sector;
    /// that write is wasted, not hazardous, because it can no longer be
    /// reached through this controller's descriptors.
    ///
    /// # Errors
    /// Fails with [`GridError::UnknownSector`] for an unresolvable key; the
    /// controller state is left untouched in that case.
    pub fn switch_sector(&mut self, sector_key: &str) -> Result<(), GridError> {
        let sector = self.registry.resolve(sector_key)?;
        let columns = self.registry.fields_for(sector)?.to_vec();

        info!(from = %self.sector, to = %sector, "sector switch; clearing cache");
        self.cache.clear();
        self.sector = sector;
        self.columns = columns;
        self.total_records = None;
        self.loading.set(false);
        Ok(())
    }

    /// Probe the backend for the grand total of the active sector
    ///
    /// Issues a single-row descriptor outside the cache, mirroring the
    /// host dashboard's record counter. Backend failures leave the recorded
    /// total unchanged and yield `None`.
    pub async fn refresh_total(&mut self) -> Option<u64> {
        let descriptor = self.probe_descriptor()?;
        match self.backend.fetch(&descriptor).await {
            Ok(page) => {
                self.total_records = Some(page.total_count);
                Some(page.total_count)
            }
            Err(err) => {
                warn!(sector = %self.sector, %err, "total-count probe failed");
                None
            }
        }
    }

    fn probe_descriptor(&self) -> Option<QueryDescriptor> {
        self.builder
            .build(
                self.sector.key(),
                RowWindow {
                    start_row: 0,
                    page_size: 1,
                },
                None,
                &BTreeMap::new(),
                self.scope,
                self.backend.supported_operators(),
            )
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use pretty_assertions::assert_eq;
    use std::sync::OnceLock;
    use strata_backend::FetchedPage;
    use strata_query::FilterOperator;
    use strata_sector::Record;

    mock! {
        pub Backend {}

        #[async_trait]
        impl ExecutionBackend for Backend {
            async fn fetch(
                &self,
                descriptor: &QueryDescriptor,
            ) -> Result<FetchedPage, BackendError>;

            fn supported_operators(&self) -> &'static [FilterOperator];
        }
    }

    const BOTH: &[FilterOperator] = &[FilterOperator::Contains, FilterOperator::Equals];

    fn rows(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::from_fields([("property_code", format!("PC-{i}"))]))
            .collect()
    }

    fn controller_with(backend: MockBackend) -> GridController {
        GridController::new(
            SectorRegistry::builtin(),
            Arc::new(backend),
            CallerScope::admin(1),
            "residential",
        )
        .unwrap()
        .with_page_size(10)
    }

    fn request(start_row: u64) -> RowFetchRequest {
        RowFetchRequest {
            start_row,
            end_row: start_row + 10,
            sort_model: None,
            filter_model: BTreeMap::new(),
        }
    }

    #[test]
    fn construction_rejects_unknown_sector_key() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        let result = GridController::new(
            SectorRegistry::builtin(),
            Arc::new(backend),
            CallerScope::admin(1),
            "warehouse",
        );
        assert!(matches!(result, Err(GridError::UnknownSector(_))));
    }

    #[test]
    fn construction_loads_column_schema() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        let controller = controller_with(backend);
        assert_eq!(controller.sector(), Sector::Residential);
        assert!(controller.columns().iter().any(|c| c.name == "number_of_units"));
    }

    #[tokio::test]
    async fn miss_then_hit_invokes_backend_once() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        backend
            .expect_fetch()
            .times(1)
            .returning(|_| {
                Ok(FetchedPage {
                    rows: rows(10),
                    total_count: 42,
                })
            });

        let controller = controller_with(backend);

        let first = controller.fetch_rows(&request(0)).await.unwrap();
        let first = first.page().expect("first fetch should serve");
        assert!(!first.from_cache);
        assert_eq!(first.total_count, 42);

        let second = controller.fetch_rows(&request(0)).await.unwrap();
        let second = second.page().expect("second fetch should serve");
        assert!(second.from_cache);
        assert_eq!(second.rows, first.rows);
        assert_eq!(second.total_count, 42);
    }

    #[tokio::test]
    async fn distinct_pages_are_cached_separately() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        backend
            .expect_fetch()
            .times(2)
            .returning(|descriptor| {
                Ok(FetchedPage {
                    rows: rows(usize::try_from(descriptor.page).unwrap()),
                    total_count: 42,
                })
            });

        let controller = controller_with(backend);
        let page_one = controller.fetch_rows(&request(0)).await.unwrap();
        let page_two = controller.fetch_rows(&request(10)).await.unwrap();
        assert_eq!(page_one.page().unwrap().rows.len(), 1);
        assert_eq!(page_two.page().unwrap().rows.len(), 2);
    }

    #[tokio::test]
    async fn backend_failure_becomes_failed_outcome() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        backend
            .expect_fetch()
            .times(1)
            .returning(|_| Err(BackendError::NotFound));

        let controller = controller_with(backend);
        let outcome = controller.fetch_rows(&request(0)).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        let mut sequence = mockall::Sequence::new();
        backend
            .expect_fetch()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Err(BackendError::NotFound));
        backend
            .expect_fetch()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| {
                Ok(FetchedPage {
                    rows: rows(1),
                    total_count: 1,
                })
            });

        let controller = controller_with(backend);
        assert_eq!(
            controller.fetch_rows(&request(0)).await.unwrap(),
            FetchOutcome::Failed
        );
        // The failure left no entry behind; the retry goes to the backend.
        let retry = controller.fetch_rows(&request(0)).await.unwrap();
        assert!(!retry.page().unwrap().from_cache);
    }

    #[tokio::test]
    async fn empty_page_is_served_not_failed() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        backend
            .expect_fetch()
            .returning(|_| Ok(FetchedPage::empty()));

        let controller = controller_with(backend);
        let outcome = controller.fetch_rows(&request(0)).await.unwrap();
        let page = outcome.page().expect("zero rows still serves");
        assert!(page.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn loading_flag_is_set_while_the_backend_runs() {
        static FLAG: OnceLock<LoadingFlag> = OnceLock::new();

        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        backend.expect_fetch().returning(|_| {
            let flag = FLAG.get().expect("flag registered before fetch");
            assert!(flag.is_set(), "busy flag must be asserted during execution");
            Ok(FetchedPage::empty())
        });

        let controller = controller_with(backend);
        FLAG.set(controller.loading()).unwrap();

        assert!(!controller.is_loading());
        controller.fetch_rows(&request(0)).await.unwrap();
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn sector_switch_clears_the_cache() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        // Same descriptor before and after the round trip, yet the backend
        // runs twice: the switch dropped the entry.
        backend
            .expect_fetch()
            .times(2)
            .returning(|_| {
                Ok(FetchedPage {
                    rows: rows(10),
                    total_count: 42,
                })
            });

        let mut controller = controller_with(backend);
        controller.fetch_rows(&request(0)).await.unwrap();

        controller.switch_sector("land").unwrap();
        assert_eq!(controller.sector(), Sector::Land);
        assert!(controller.columns().iter().any(|c| c.name == "land_area"));

        controller.switch_sector("residential").unwrap();
        let after = controller.fetch_rows(&request(0)).await.unwrap();
        assert!(!after.page().unwrap().from_cache);
    }

    #[test]
    fn switch_to_unknown_sector_leaves_state_untouched() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        let mut controller = controller_with(backend);

        let result = controller.switch_sector("warehouse");
        assert!(matches!(result, Err(GridError::UnknownSector(_))));
        assert_eq!(controller.sector(), Sector::Residential);
    }

    #[tokio::test]
    async fn refresh_total_probes_with_a_single_row_descriptor() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        backend
            .expect_fetch()
            .withf(|descriptor| descriptor.page_size == 1 && descriptor.page == 1)
            .times(1)
            .returning(|_| {
                Ok(FetchedPage {
                    rows: rows(1),
                    total_count: 1234,
                })
            });

        let mut controller = controller_with(backend);
        assert_eq!(controller.total_records(), None);
        assert_eq!(controller.refresh_total().await, Some(1234));
        assert_eq!(controller.total_records(), Some(1234));
    }

    #[tokio::test]
    async fn refresh_total_failure_keeps_previous_value() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        backend
            .expect_fetch()
            .times(1)
            .returning(|_| Err(BackendError::NotFound));

        let mut controller = controller_with(backend);
        assert_eq!(controller.refresh_total().await, None);
        assert_eq!(controller.total_records(), None);
    }

    #[tokio::test]
    async fn non_admin_scope_reaches_the_backend_descriptor() {
        let mut backend = MockBackend::new();
        backend.expect_supported_operators().return_const(BOTH);
        backend
            .expect_fetch()
            .withf(|descriptor| descriptor.restrict_to_owner_id == Some(9))
            .times(1)
            .returning(|_| Ok(FetchedPage::empty()));

        let controller = GridController::new(
            SectorRegistry::builtin(),
            Arc::new(backend),
            CallerScope::restricted(9),
            "residential",
        )
        .unwrap()
        .with_page_size(10);

        controller.fetch_rows(&request(0)).await.unwrap();
    }
}
