use std::sync::Arc;

use anyhow::Context;
use client_core::{AdminClient, SubscribeGroups};
use grid::{AfterMutation, ColumnSpec, GridConfig, RowSource};
use shared::{
    domain::SubscribeGroup,
    protocol::{Filters, Pagination},
};
use tokio::sync::broadcast;

use crate::{
    format,
    page::{batch_delete_actions, edit_delete_actions},
    CrudPage, DashboardEvent, PageBehaviour,
};

/// The group list is small and served in one response, so paging and filters are not sent.
pub fn subscribe_group_page(
    client: &AdminClient,
    page_size: u32,
    events: broadcast::Sender<DashboardEvent>,
) -> CrudPage<SubscribeGroups> {
    let resource = client.resource::<SubscribeGroups>();
    let lister = resource.clone();
    let source: Arc<dyn RowSource<SubscribeGroup>> =
        Arc::new(move |_pagination: Pagination, _filters: Filters| {
            let lister = lister.clone();
            async move {
                lister
                    .list_all()
                    .await
                    .context("listing subscribe groups")
            }
        });

    let config = GridConfig::<SubscribeGroup>::new("subscribe-group")
        .page_size(page_size)
        .column(ColumnSpec::new("name", "Name"))
        .column(ColumnSpec::new("description", "Description"))
        .column(
            ColumnSpec::new("updated_at", "Updated at")
                .render_with(|g: &SubscribeGroup| format::date(g.updated_at)),
        )
        .row_actions(edit_delete_actions::<SubscribeGroup>)
        .batch_actions(batch_delete_actions::<SubscribeGroup>);

    CrudPage::with_source(
        resource,
        source,
        config,
        PageBehaviour::default().batch_delete(AfterMutation::Refresh),
        events,
    )
}
