use std::sync::Arc;

use anyhow::Context;
use client_core::{AdminClient, Users};
use grid::{column::EMPTY_CELL, ColumnSpec, GridConfig, RowSource};
use shared::{
    domain::User,
    protocol::{Filters, Pagination},
};
use tokio::sync::broadcast;

use crate::{format, page::edit_delete_actions, CrudPage, DashboardEvent, PageBehaviour};

pub fn referer_label(user: &User) -> String {
    match user.referer_id {
        Some(id) if id.0 != 0 => format!("#{id}"),
        _ => EMPTY_CELL.to_string(),
    }
}

/// Users are listed by page only; there is no batch delete.
pub fn user_page(
    client: &AdminClient,
    page_size: u32,
    events: broadcast::Sender<DashboardEvent>,
) -> CrudPage<Users> {
    let resource = client.resource::<Users>();
    let lister = resource.clone();
    let source: Arc<dyn RowSource<User>> =
        Arc::new(move |pagination: Pagination, _filters: Filters| {
            let lister = lister.clone();
            async move {
                lister
                    .list(pagination, &Filters::new())
                    .await
                    .context("listing users")
            }
        });

    let config = GridConfig::<User>::new("user")
        .page_size(page_size)
        .column(
            ColumnSpec::new("enable", "Enable").render_with(|u: &User| format::switch(u.enable)),
        )
        .column(ColumnSpec::new("id", "ID"))
        .column(ColumnSpec::new("email", "Email"))
        .column(
            ColumnSpec::new("balance", "Balance")
                .render_with(|u: &User| format::major_unit(u.balance)),
        )
        .column(ColumnSpec::new("referer_id", "Referer").render_with(referer_label))
        .column(
            ColumnSpec::new("created_at", "Created at")
                .render_with(|u: &User| format::date(u.created_at)),
        )
        .row_actions(edit_delete_actions::<User>);

    CrudPage::with_source(
        resource,
        source,
        config,
        PageBehaviour::default()
            .toggle("enable")
            .toggle_notice("Updated successfully"),
        events,
    )
}
