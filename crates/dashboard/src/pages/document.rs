use client_core::{AdminClient, Documents};
use grid::{AfterMutation, ColumnSpec, FilterField, GridConfig};
use shared::domain::Document;
use tokio::sync::broadcast;

use crate::{
    format,
    page::{batch_delete_actions, edit_delete_actions},
    CrudPage, DashboardEvent, PageBehaviour,
};

pub fn document_page(
    client: &AdminClient,
    page_size: u32,
    events: broadcast::Sender<DashboardEvent>,
) -> CrudPage<Documents> {
    let config = GridConfig::<Document>::new("document")
        .page_size(page_size)
        .column(ColumnSpec::new("show", "Show").render_with(|d: &Document| format::switch(d.show)))
        .column(ColumnSpec::new("title", "Title"))
        .column(ColumnSpec::new("tags", "Tags"))
        .column(
            ColumnSpec::new("updated_at", "Updated at")
                .render_with(|d: &Document| format::date(d.updated_at)),
        )
        .filter(FilterField::text("search").placeholder("Search"))
        .filter(FilterField::text("tag").placeholder("Tags"))
        .row_actions(edit_delete_actions::<Document>)
        .batch_actions(batch_delete_actions::<Document>);

    CrudPage::new(
        client.resource::<Documents>(),
        config,
        PageBehaviour::default()
            .toggle("show")
            .batch_delete(AfterMutation::Refresh)
            .create_override("show", false),
        events,
    )
}
