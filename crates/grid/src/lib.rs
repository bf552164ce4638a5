//! Paginated, filterable, selectable data-grid controller.
//!
//! A [`GridController`] owns the query state (page, size, filters), the last settled page of
//! rows and the selection set. Every query change re-runs the caller-supplied [`RowSource`].
//! Loads are sequence-numbered: a response only lands if no newer load was issued after it.

use std::{collections::BTreeSet, future::Future, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use shared::{
    domain::Entity,
    protocol::{Filters, PageResult, Pagination},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub mod column;
pub mod error;
pub mod filter;
pub mod view;

pub use column::{ActionItem, ColumnSpec, Confirm};
pub use error::{FetchError, MutationError};
pub use filter::{FilterField, FilterOptions, MemoizedOptions, OptionsLoader, SelectOption};
pub use view::{FilterView, PageSummary, RowView, TableView};

use column::{BatchActionRenderer, RowActionRenderer};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Anything a grid can display: an identified, serializable record.
pub trait GridRow: Entity + Serialize + Clone + Send + Sync + 'static {}

impl<T> GridRow for T where T: Entity + Serialize + Clone + Send + Sync + 'static {}

#[async_trait]
pub trait RowSource<T: Send>: Send + Sync {
    async fn fetch(&self, pagination: Pagination, filters: Filters) -> Result<PageResult<T>>;
}

#[async_trait]
impl<T, F, Fut> RowSource<T> for F
where
    T: Send + 'static,
    F: Fn(Pagination, Filters) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageResult<T>>> + Send + 'static,
{
    async fn fetch(&self, pagination: Pagination, filters: Filters) -> Result<PageResult<T>> {
        (self)(pagination, filters).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryState {
    pub pagination: Pagination,
    pub filters: Filters,
}

impl QueryState {
    pub fn page(&self) -> u32 {
        self.pagination.page
    }

    pub fn size(&self) -> u32 {
        self.pagination.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridStatus {
    Idle,
    Loading,
    Settled,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was issued before this one settled; its result was dropped.
    Superseded,
    Failed(FetchError),
}

/// What to re-run once a mutation succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterMutation {
    Refresh,
    Reset,
}

pub struct GridConfig<T> {
    name: String,
    columns: Vec<ColumnSpec<T>>,
    filters: Vec<FilterField>,
    default_filters: Filters,
    page_size: u32,
    row_actions: Option<RowActionRenderer<T>>,
    batch_actions: Option<BatchActionRenderer<T>>,
}

impl<T> GridConfig<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            default_filters: Filters::new(),
            page_size: DEFAULT_PAGE_SIZE,
            row_actions: None,
            batch_actions: None,
        }
    }

    pub fn column(mut self, column: ColumnSpec<T>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn filter(mut self, field: FilterField) -> Self {
        self.filters.push(field);
        self
    }

    pub fn default_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_filters.insert(key.into(), value.into());
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    pub fn row_actions(
        mut self,
        render: impl Fn(&T) -> Vec<ActionItem> + Send + Sync + 'static,
    ) -> Self {
        self.row_actions = Some(Arc::new(render));
        self
    }

    pub fn batch_actions(
        mut self,
        render: impl Fn(&[T]) -> Vec<ActionItem> + Send + Sync + 'static,
    ) -> Self {
        self.batch_actions = Some(Arc::new(render));
        self
    }
}

#[derive(Debug, Clone)]
pub struct GridSnapshot<T: GridRow> {
    pub query: QueryState,
    pub rows: Vec<T>,
    pub total: u64,
    pub selection: BTreeSet<T::Id>,
    pub status: GridStatus,
    pub error: Option<FetchError>,
}

struct GridState<T: GridRow> {
    query: QueryState,
    result: PageResult<T>,
    selection: BTreeSet<T::Id>,
    status: GridStatus,
    error: Option<FetchError>,
    issued: u64,
}

pub struct GridController<T: GridRow> {
    name: String,
    source: Arc<dyn RowSource<T>>,
    columns: Vec<ColumnSpec<T>>,
    filter_fields: Vec<FilterField>,
    default_filters: Filters,
    page_size: u32,
    row_actions: Option<RowActionRenderer<T>>,
    batch_actions: Option<BatchActionRenderer<T>>,
    state: Mutex<GridState<T>>,
}

impl<T: GridRow> GridController<T> {
    pub fn new(source: Arc<dyn RowSource<T>>, config: GridConfig<T>) -> Arc<Self> {
        let query = QueryState {
            pagination: Pagination::new(1, config.page_size),
            filters: config.default_filters.clone(),
        };
        Arc::new(Self {
            name: config.name,
            source,
            columns: config.columns,
            filter_fields: config.filters,
            default_filters: config.default_filters,
            page_size: config.page_size,
            row_actions: config.row_actions,
            batch_actions: config.batch_actions,
            state: Mutex::new(GridState {
                query,
                result: PageResult::empty(),
                selection: BTreeSet::new(),
                status: GridStatus::Idle,
                error: None,
                issued: 0,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(self: &Arc<Self>) -> GridHandle {
        GridHandle {
            inner: self.clone(),
        }
    }

    /// Runs the source against the current query. Fetch failures are logged and recorded on
    /// the grid; the rows from the last successful load stay in place.
    pub async fn load(&self) -> LoadOutcome {
        let (seq, query) = {
            let mut guard = self.state.lock().await;
            guard.issued += 1;
            guard.status = GridStatus::Loading;
            (guard.issued, guard.query.clone())
        };
        debug!(grid = %self.name, seq, page = query.page(), size = query.size(), "loading rows");

        let result = self.source.fetch(query.pagination, query.filters).await;

        let mut guard = self.state.lock().await;
        if seq != guard.issued {
            debug!(grid = %self.name, seq, latest = guard.issued, "discarding superseded load");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(page) => {
                guard.result = page;
                guard.error = None;
                guard.status = GridStatus::Settled;
                LoadOutcome::Applied
            }
            Err(err) => {
                let fetch_error = FetchError::new(&err);
                warn!(grid = %self.name, seq, error = %fetch_error.message, "row load failed");
                guard.error = Some(fetch_error.clone());
                guard.status = GridStatus::Errored;
                LoadOutcome::Failed(fetch_error)
            }
        }
    }

    /// An empty value removes the filter. Always returns to the first page.
    pub async fn set_filter(&self, key: impl Into<String>, value: impl Into<String>) -> LoadOutcome {
        let key = key.into();
        let value = value.into();
        {
            let mut guard = self.state.lock().await;
            if value.trim().is_empty() {
                guard.query.filters.remove(&key);
            } else {
                guard.query.filters.insert(key, value);
            }
            guard.query.pagination.page = 1;
        }
        self.load().await
    }

    pub async fn clear_filter(&self, key: &str) -> LoadOutcome {
        {
            let mut guard = self.state.lock().await;
            guard.query.filters.remove(key);
            guard.query.pagination.page = 1;
        }
        self.load().await
    }

    pub async fn set_page(&self, page: u32) -> LoadOutcome {
        self.state.lock().await.query.pagination.page = page.max(1);
        self.load().await
    }

    pub async fn set_page_size(&self, size: u32) -> LoadOutcome {
        self.state.lock().await.query.pagination.size = size.max(1);
        self.load().await
    }

    /// Replaces the whole query and loads once.
    pub async fn set_query(&self, query: QueryState) -> LoadOutcome {
        {
            let mut guard = self.state.lock().await;
            guard.query = QueryState {
                pagination: Pagination::new(query.pagination.page, query.pagination.size),
                filters: query
                    .filters
                    .into_iter()
                    .filter(|(_, value)| !value.trim().is_empty())
                    .collect(),
            };
        }
        self.load().await
    }

    /// Returns whether `id` is selected afterwards.
    pub async fn toggle_select(&self, id: T::Id) -> bool {
        let mut guard = self.state.lock().await;
        if guard.selection.remove(&id) {
            false
        } else {
            guard.selection.insert(id);
            true
        }
    }

    pub async fn select_all(&self) {
        let mut guard = self.state.lock().await;
        let ids: Vec<T::Id> = guard.result.list.iter().map(Entity::id).collect();
        guard.selection.extend(ids);
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.selection.clear();
    }

    pub async fn refresh(&self) -> LoadOutcome {
        self.load().await
    }

    pub async fn reset(&self) -> LoadOutcome {
        {
            let mut guard = self.state.lock().await;
            guard.query = QueryState {
                pagination: Pagination::new(1, self.page_size),
                filters: self.default_filters.clone(),
            };
            guard.selection.clear();
        }
        self.load().await
    }

    /// Awaits a caller mutation. Success runs `follow_up`; failure is returned untouched by
    /// any reload.
    pub async fn run_mutation<Fut>(
        &self,
        action: &str,
        follow_up: AfterMutation,
        mutation: Fut,
    ) -> Result<LoadOutcome, MutationError>
    where
        Fut: Future<Output = Result<()>>,
    {
        if let Err(err) = mutation.await {
            let err = MutationError::rejected(action, &err);
            warn!(grid = %self.name, action, error = %err, "mutation failed");
            return Err(err);
        }
        info!(grid = %self.name, action, "mutation completed");
        Ok(self.follow_up(follow_up).await)
    }

    /// Hands the selected ids to `mutation`. On success the submitted ids leave the selection;
    /// ids selected while the mutation ran stay selected.
    pub async fn run_batch<F, Fut>(
        &self,
        action: &str,
        follow_up: AfterMutation,
        mutation: F,
    ) -> Result<LoadOutcome, MutationError>
    where
        F: FnOnce(Vec<T::Id>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let ids: Vec<T::Id> = self.state.lock().await.selection.iter().copied().collect();
        if ids.is_empty() {
            return Err(MutationError::EmptySelection {
                action: action.to_string(),
            });
        }

        let count = ids.len();
        if let Err(err) = mutation(ids.clone()).await {
            let err = MutationError::rejected(action, &err);
            warn!(grid = %self.name, action, count, error = %err, "batch mutation failed");
            return Err(err);
        }
        info!(grid = %self.name, action, count, "batch mutation completed");
        {
            let mut guard = self.state.lock().await;
            for id in &ids {
                guard.selection.remove(id);
            }
        }
        Ok(self.follow_up(follow_up).await)
    }

    async fn follow_up(&self, follow_up: AfterMutation) -> LoadOutcome {
        match follow_up {
            AfterMutation::Refresh => self.refresh().await,
            AfterMutation::Reset => self.reset().await,
        }
    }

    /// Finds a row of the current page by id.
    pub async fn row(&self, id: T::Id) -> Option<T> {
        self.state
            .lock()
            .await
            .result
            .list
            .iter()
            .find(|row| row.id() == id)
            .cloned()
    }

    pub async fn snapshot(&self) -> GridSnapshot<T> {
        let guard = self.state.lock().await;
        GridSnapshot {
            query: guard.query.clone(),
            rows: guard.result.list.clone(),
            total: guard.result.total,
            selection: guard.selection.clone(),
            status: guard.status,
            error: guard.error.clone(),
        }
    }

    pub async fn render(&self) -> TableView {
        let mut option_sets = Vec::with_capacity(self.filter_fields.len());
        for field in &self.filter_fields {
            option_sets.push(field.resolve_options().await);
        }

        let guard = self.state.lock().await;
        let filters = self
            .filter_fields
            .iter()
            .zip(option_sets)
            .map(|(field, options)| FilterView {
                key: field.key.clone(),
                placeholder: field.placeholder.clone(),
                value: guard.query.filters.get(&field.key).cloned(),
                options,
            })
            .collect();

        let rows = guard
            .result
            .list
            .iter()
            .map(|row| {
                let fields = serde_json::to_value(row).unwrap_or(serde_json::Value::Null);
                RowView {
                    id: row.id().to_string(),
                    selected: guard.selection.contains(&row.id()),
                    cells: self
                        .columns
                        .iter()
                        .map(|column| column.render_cell(row, &fields))
                        .collect(),
                    actions: self
                        .row_actions
                        .as_ref()
                        .map(|render| render(row))
                        .unwrap_or_default(),
                }
            })
            .collect();

        let batch_actions = match &self.batch_actions {
            Some(render) if !guard.selection.is_empty() => {
                let selected: Vec<T> = guard
                    .result
                    .list
                    .iter()
                    .filter(|row| guard.selection.contains(&row.id()))
                    .cloned()
                    .collect();
                render(&selected)
            }
            _ => Vec::new(),
        };

        TableView {
            headers: self.columns.iter().map(|c| c.label.clone()).collect(),
            rows,
            batch_actions,
            filters,
            summary: PageSummary {
                page: guard.query.page(),
                size: guard.query.size(),
                total: guard.result.total,
                selected: guard.selection.len(),
            },
            status: guard.status,
            error: guard.error.as_ref().map(|err| err.message.clone()),
        }
    }
}

/// The imperative side of a grid, usable without knowing its row type.
#[async_trait]
pub trait GridActions: Send + Sync {
    async fn refresh(&self) -> LoadOutcome;
    async fn reset(&self) -> LoadOutcome;
}

#[async_trait]
impl<T: GridRow> GridActions for GridController<T> {
    async fn refresh(&self) -> LoadOutcome {
        GridController::refresh(self).await
    }

    async fn reset(&self) -> LoadOutcome {
        GridController::reset(self).await
    }
}

#[derive(Clone)]
pub struct GridHandle {
    inner: Arc<dyn GridActions>,
}

impl GridHandle {
    pub async fn refresh(&self) -> LoadOutcome {
        self.inner.refresh().await
    }

    pub async fn reset(&self) -> LoadOutcome {
        self.inner.reset().await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
