//! The query engine: the single entry point for catalog queries.
//!
//! Local mode runs filter, sort and paginate over a [`LocalCatalog`].
//! Remote mode forwards the query to a [`RemoteAdapter`] and trusts the page
//! and total count it returns.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cancel::CancelSignal;
use super::filter::filter;
use super::local::LocalCatalog;
use super::normalize::{normalize, normalize_all};
use super::paginate::{PageMeta, Paginator};
use super::sort::sort;
use super::types::{CatalogError, CatalogItem, ItemId, PageResult, Query, DEFAULT_PAGE_CAP};
use crate::metrics::CATALOG_QUERIES;
use crate::remote::{AdapterError, FetchParams, RemoteAdapter};

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on the reported page count.
    pub page_cap: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_cap: DEFAULT_PAGE_CAP,
        }
    }
}

/// Where a query is answered from.
#[derive(Clone, Copy)]
pub enum CatalogSource<'a> {
    Local(&'a LocalCatalog),
    Remote(&'a dyn RemoteAdapter),
}

impl CatalogSource<'_> {
    fn mode(&self) -> &'static str {
        match self {
            CatalogSource::Local(_) => "local",
            CatalogSource::Remote(_) => "remote",
        }
    }
}

/// Per-call options for upstream work.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Deadline for the adapter call.
    pub timeout: Option<Duration>,
    /// Withdraws the call when signalled.
    pub cancel: Option<CancelSignal>,
}

impl ExecuteOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Stateless query engine. Safe to share across tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine {
    paginator: Paginator,
}

impl QueryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            paginator: Paginator::new(config.page_cap),
        }
    }

    pub fn page_cap(&self) -> u32 {
        self.paginator.page_cap()
    }

    /// Reject out-of-contract page parameters.
    pub fn validate(query: &Query) -> Result<(), CatalogError> {
        if query.page < 1 {
            return Err(CatalogError::InvalidQuery(format!(
                "page must be at least 1, got {}",
                query.page
            )));
        }
        if query.page_size < 1 {
            return Err(CatalogError::InvalidQuery(format!(
                "page_size must be at least 1, got {}",
                query.page_size
            )));
        }
        Ok(())
    }

    /// Answer `query` from `source`.
    pub async fn execute(
        &self,
        source: CatalogSource<'_>,
        query: &Query,
        opts: &ExecuteOptions,
    ) -> Result<PageResult, CatalogError> {
        let mode = source.mode();
        let result = match source {
            CatalogSource::Local(catalog) => self.run_local(catalog, query),
            CatalogSource::Remote(adapter) => self.run_remote(adapter, query, opts).await,
        };
        record(mode, &result);
        result
    }

    /// Answer `query` from an in-memory catalog.
    pub fn execute_local(
        &self,
        catalog: &LocalCatalog,
        query: &Query,
    ) -> Result<PageResult, CatalogError> {
        let result = self.run_local(catalog, query);
        record("local", &result);
        result
    }

    /// Look up one item through a remote adapter, under the same timeout and
    /// cancellation rules as list queries.
    pub async fn fetch_item(
        &self,
        adapter: &dyn RemoteAdapter,
        id: &ItemId,
        opts: &ExecuteOptions,
    ) -> Result<CatalogItem, CatalogError> {
        debug!(adapter = adapter.name(), %id, "Fetching item");
        let raw = call_upstream(opts, adapter.fetch_item(id)).await?;
        let item = normalize(&raw)?;
        if &item.id != id {
            warn!(requested = %id, returned = %item.id, "Upstream returned a different item id");
        }
        Ok(item)
    }

    fn run_local(&self, catalog: &LocalCatalog, query: &Query) -> Result<PageResult, CatalogError> {
        Self::validate(query)?;

        let matched = filter(catalog.items(), query);
        let ordered = match query.sort {
            Some(key) => sort(&matched, key)?,
            None => matched,
        };

        debug!(
            catalog = catalog.name(),
            matched = ordered.len(),
            page = query.page,
            "Local query"
        );
        self.paginator.paginate(&ordered, query.page, query.page_size)
    }

    async fn run_remote(
        &self,
        adapter: &dyn RemoteAdapter,
        query: &Query,
        opts: &ExecuteOptions,
    ) -> Result<PageResult, CatalogError> {
        Self::validate(query)?;

        if let Some(key) = query.sort {
            if !adapter.supports_sort(key) {
                return Err(CatalogError::UnsupportedSortKey {
                    key,
                    source_name: adapter.name().to_string(),
                });
            }
        }
        if let Some(category) = query.active_category() {
            return Err(CatalogError::InvalidQuery(format!(
                "category filter '{}' is not supported by {}",
                category,
                adapter.name()
            )));
        }

        let params = fetch_params(query);
        debug!(adapter = adapter.name(), ?params, "Remote query");

        let raw = call_upstream(opts, adapter.fetch_page(&params)).await?;
        let meta = PageMeta::compute(
            raw.total_count,
            query.page,
            query.page_size,
            self.paginator.page_cap(),
        )?;

        let items = if meta.out_of_range() {
            Vec::new()
        } else {
            let mut items = normalize_all(&raw.items);
            items.truncate(query.page_size as usize);
            items
        };

        Ok(meta.into_result(items))
    }
}

fn fetch_params(query: &Query) -> FetchParams {
    FetchParams {
        page: query.page,
        page_size: query.page_size,
        ordering: query.sort,
        search: query.active_search().map(str::to_string),
        genre: query.active_genre().map(str::to_string),
        platform: query.active_platform().map(str::to_string),
        dates: query.released_between.map(|w| w.to_string()),
    }
}

/// Run one adapter call under the deadline and cancellation in `opts`.
///
/// When cancellation or the deadline wins, the adapter future is dropped.
pub async fn call_upstream<T, F>(opts: &ExecuteOptions, call: F) -> Result<T, CatalogError>
where
    F: Future<Output = Result<T, AdapterError>>,
{
    let timed = async {
        match opts.timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .map_err(|_| CatalogError::UpstreamTimeout(Some(timeout))),
            None => Ok(call.await),
        }
    };

    let outcome = match &opts.cancel {
        Some(cancel) => {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CatalogError::Cancelled),
                outcome = timed => outcome,
            }
        }
        None => timed.await,
    }?;

    outcome.map_err(|e| upstream_error(e, opts.timeout))
}

fn upstream_error(error: AdapterError, limit: Option<Duration>) -> CatalogError {
    warn!("Upstream call failed: {}", error);
    match error {
        AdapterError::Timeout => CatalogError::UpstreamTimeout(limit),
        other => CatalogError::UpstreamFailure {
            kind: other.kind().to_string(),
            message: other.to_string(),
        },
    }
}

fn record(mode: &str, result: &Result<PageResult, CatalogError>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    CATALOG_QUERIES.with_label_values(&[mode, outcome]).inc();
}
