//! Generic CRUD page: a grid bound to one admin resource plus its form and delete flows.

use std::sync::Arc;

use anyhow::Context;
use client_core::{Resource, ResourceClient};
use grid::{
    ActionItem, AfterMutation, GridConfig, GridController, GridHandle, GridRow, LoadOutcome,
    MutationError, RowSource, TableView,
};
use serde_json::{Map, Value};
use shared::{
    domain::Entity,
    protocol::{Filters, Pagination},
};
use tokio::sync::broadcast;
use tracing::debug;

use crate::{error::PageError, modal::FormModal, DashboardEvent};

pub type RowId<R> = <<R as Resource>::Row as Entity>::Id;

const DELETE_TITLE: &str = "Confirm delete";
const DELETE_WARNING: &str = "This cannot be undone. Delete anyway?";

/// Per-page differences between the otherwise identical CRUD flows.
#[derive(Debug, Clone, Default)]
pub struct PageBehaviour {
    toggle_field: Option<&'static str>,
    toggle_notice: Option<&'static str>,
    batch_follow_up: Option<AfterMutation>,
    create_overrides: Map<String, Value>,
}

impl PageBehaviour {
    /// Boolean row field flipped by the inline switch.
    pub fn toggle(mut self, field: &'static str) -> Self {
        self.toggle_field = Some(field);
        self
    }

    /// Success notice for the inline switch. Without one the switch refreshes silently.
    pub fn toggle_notice(mut self, message: &'static str) -> Self {
        self.toggle_notice = Some(message);
        self
    }

    pub fn batch_delete(mut self, follow_up: AfterMutation) -> Self {
        self.batch_follow_up = Some(follow_up);
        self
    }

    /// Forced onto every create submission, over whatever the form sent.
    pub fn create_override(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.create_overrides.insert(key.to_string(), value.into());
        self
    }

    pub fn toggle_field(&self) -> Option<&'static str> {
        self.toggle_field
    }

    pub fn batch_follow_up(&self) -> Option<AfterMutation> {
        self.batch_follow_up
    }

    pub fn toggle_message(&self) -> Option<&'static str> {
        self.toggle_notice
    }
}

/// Row source that forwards pagination and filters to the resource's list endpoint.
pub fn list_source<R>(client: ResourceClient<R>) -> Arc<dyn RowSource<R::Row>>
where
    R: Resource,
    R::Row: GridRow,
{
    Arc::new(move |pagination: Pagination, filters: Filters| {
        let client = client.clone();
        async move {
            client
                .list(pagination, &filters)
                .await
                .with_context(|| format!("listing {}", R::PATH))
        }
    })
}

pub fn edit_delete_actions<T>(_row: &T) -> Vec<ActionItem> {
    vec![
        ActionItem::new("edit", "Edit"),
        ActionItem::new("delete", "Delete").confirmed(DELETE_TITLE, DELETE_WARNING),
    ]
}

pub fn batch_delete_actions<T>(_rows: &[T]) -> Vec<ActionItem> {
    vec![ActionItem::new("batch-delete", "Delete").confirmed(DELETE_TITLE, DELETE_WARNING)]
}

pub struct CrudPage<R>
where
    R: Resource,
    R::Row: GridRow,
{
    name: String,
    client: ResourceClient<R>,
    grid: Arc<GridController<R::Row>>,
    behaviour: PageBehaviour,
    modal: FormModal,
    events: broadcast::Sender<DashboardEvent>,
}

impl<R> CrudPage<R>
where
    R: Resource,
    R::Row: GridRow,
{
    pub fn new(
        client: ResourceClient<R>,
        config: GridConfig<R::Row>,
        behaviour: PageBehaviour,
        events: broadcast::Sender<DashboardEvent>,
    ) -> Self {
        let source = list_source(client.clone());
        Self::with_source(client, source, config, behaviour, events)
    }

    pub fn with_source(
        client: ResourceClient<R>,
        source: Arc<dyn RowSource<R::Row>>,
        config: GridConfig<R::Row>,
        behaviour: PageBehaviour,
        events: broadcast::Sender<DashboardEvent>,
    ) -> Self {
        let grid = GridController::new(source, config);
        Self {
            name: grid.name().to_string(),
            client,
            grid,
            behaviour,
            modal: FormModal::default(),
            events,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &Arc<GridController<R::Row>> {
        &self.grid
    }

    pub fn handle(&self) -> GridHandle {
        self.grid.handle()
    }

    pub fn behaviour(&self) -> &PageBehaviour {
        &self.behaviour
    }

    pub fn modal(&self) -> &FormModal {
        &self.modal
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub async fn load(&self) -> LoadOutcome {
        self.grid.load().await
    }

    pub async fn render(&self) -> TableView {
        self.grid.render().await
    }

    /// Sends the create form. On success the modal closes and the grid refreshes; on failure
    /// the modal stays open with the error recorded.
    pub async fn submit_create(&self, values: Value) -> Result<LoadOutcome, PageError> {
        self.modal.begin_submit().await;
        let payload = match self.create_payload(values) {
            Ok(payload) => payload,
            Err(err) => return Err(self.form_failed(err).await),
        };

        let client = self.client.clone();
        let result = self
            .grid
            .run_mutation("create", AfterMutation::Refresh, async move {
                client.create(&payload).await.map_err(anyhow::Error::from)
            })
            .await;
        self.settle_form(result, "Created successfully").await
    }

    /// Sends the edit form for a row of the current page, with `values` merged over the row.
    pub async fn submit_update(
        &self,
        id: RowId<R>,
        values: Value,
    ) -> Result<LoadOutcome, PageError> {
        self.modal.begin_submit().await;
        let payload = match into_object(values) {
            Ok(values) => self.update_payload(id, values).await,
            Err(err) => Err(err),
        };
        let payload = match payload {
            Ok(payload) => payload,
            Err(err) => return Err(self.form_failed(err).await),
        };

        let client = self.client.clone();
        let result = self
            .grid
            .run_mutation("update", AfterMutation::Refresh, async move {
                client.update(&payload).await.map_err(anyhow::Error::from)
            })
            .await;
        self.settle_form(result, "Updated successfully").await
    }

    /// Flips the page's switch field. A failed toggle reloads nothing.
    pub async fn toggle(&self, id: RowId<R>, on: bool) -> Result<LoadOutcome, PageError> {
        let Some(field) = self.behaviour.toggle_field else {
            return Err(self.unsupported("toggle"));
        };
        let mut values = Map::new();
        values.insert(field.to_string(), Value::Bool(on));
        let payload = match self.update_payload(id, values).await {
            Ok(payload) => payload,
            Err(err) => {
                self.notify_error(&err);
                return Err(err);
            }
        };
        debug!(page = %self.name, %id, field, on, "toggling row");

        let client = self.client.clone();
        let result = self
            .grid
            .run_mutation("toggle", AfterMutation::Refresh, async move {
                client.update(&payload).await.map_err(anyhow::Error::from)
            })
            .await;
        self.settle(result, self.behaviour.toggle_notice)
    }

    pub async fn delete(&self, id: RowId<R>) -> Result<LoadOutcome, PageError> {
        let client = self.client.clone();
        let result = self
            .grid
            .run_mutation("delete", AfterMutation::Refresh, async move {
                client.delete(id).await.map_err(anyhow::Error::from)
            })
            .await;
        self.settle(result, Some("Deleted successfully"))
    }

    /// Deletes every selected row. The selection survives a failed call.
    pub async fn batch_delete(&self) -> Result<LoadOutcome, PageError> {
        let Some(follow_up) = self.behaviour.batch_follow_up else {
            return Err(self.unsupported("batch delete"));
        };
        let client = self.client.clone();
        let result = self
            .grid
            .run_batch("batch delete", follow_up, move |ids| async move {
                client.batch_delete(&ids).await.map_err(anyhow::Error::from)
            })
            .await;
        self.settle(result, Some("Deleted successfully"))
    }

    fn create_payload(&self, values: Value) -> Result<R::Create, PageError> {
        let mut fields = into_object(values)?;
        for (key, value) in &self.behaviour.create_overrides {
            fields.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(fields))
            .map_err(|err| PageError::Validation(err.to_string()))
    }

    async fn update_payload(
        &self,
        id: RowId<R>,
        values: Map<String, Value>,
    ) -> Result<R::Update, PageError> {
        let row = self
            .grid
            .row(id)
            .await
            .ok_or_else(|| PageError::MissingRow {
                page: self.name.clone(),
                id: id.to_string(),
            })?;
        let mut fields = match serde_json::to_value(&row) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => Map::new(),
            Err(err) => return Err(PageError::Validation(err.to_string())),
        };
        fields.extend(values);
        serde_json::from_value(Value::Object(fields))
            .map_err(|err| PageError::Validation(err.to_string()))
    }

    async fn settle_form(
        &self,
        result: Result<LoadOutcome, MutationError>,
        message: &str,
    ) -> Result<LoadOutcome, PageError> {
        match result {
            Ok(outcome) => {
                self.modal.finish(Ok(())).await;
                self.notify(DashboardEvent::Success {
                    page: self.name.clone(),
                    message: message.to_string(),
                });
                Ok(outcome)
            }
            Err(err) => Err(self.form_failed(err.into()).await),
        }
    }

    async fn form_failed(&self, err: PageError) -> PageError {
        self.modal.finish(Err(err.to_string())).await;
        self.notify_error(&err);
        err
    }

    fn settle(
        &self,
        result: Result<LoadOutcome, MutationError>,
        message: Option<&str>,
    ) -> Result<LoadOutcome, PageError> {
        match result {
            Ok(outcome) => {
                if let Some(message) = message {
                    self.notify(DashboardEvent::Success {
                        page: self.name.clone(),
                        message: message.to_string(),
                    });
                }
                Ok(outcome)
            }
            Err(err) => {
                let err = PageError::from(err);
                self.notify_error(&err);
                Err(err)
            }
        }
    }

    fn unsupported(&self, action: &'static str) -> PageError {
        PageError::Unsupported {
            page: self.name.clone(),
            action,
        }
    }

    fn notify_error(&self, err: &PageError) {
        self.notify(DashboardEvent::Error {
            page: self.name.clone(),
            message: err.to_string(),
        });
    }

    fn notify(&self, event: DashboardEvent) {
        // No subscribers is fine; nobody is showing notices.
        let _ = self.events.send(event);
    }
}

fn into_object(values: Value) -> Result<Map<String, Value>, PageError> {
    match values {
        Value::Object(fields) => Ok(fields),
        other => Err(PageError::Validation(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
