use client_core::{AdminClient, Nodes};
use grid::{column::EMPTY_CELL, AfterMutation, ColumnSpec, FilterField, FilterOptions, GridConfig};
use shared::domain::ServerNode;
use tokio::sync::broadcast;

use super::node_group_options;
use crate::{
    format,
    page::{batch_delete_actions, edit_delete_actions},
    CrudPage, DashboardEvent, PageBehaviour,
};

pub fn node_page(
    client: &AdminClient,
    page_size: u32,
    events: broadcast::Sender<DashboardEvent>,
) -> CrudPage<Nodes> {
    let groups = node_group_options(client);
    // Group names come from the filter's option set, resolved before rows render.
    let lookup = groups.clone();
    let config = GridConfig::<ServerNode>::new("node")
        .page_size(page_size)
        .column(ColumnSpec::new("id", "ID").render_with(|n: &ServerNode| {
            format!("{} ({})", n.id, n.protocol.as_str())
        }))
        .column(
            ColumnSpec::new("enable", "Enable")
                .render_with(|n: &ServerNode| format::switch(n.enable)),
        )
        .column(ColumnSpec::new("name", "Name"))
        .column(ColumnSpec::new("server_addr", "Server address"))
        .column(
            ColumnSpec::new("speed_limit", "Speed limit")
                .render_with(|n: &ServerNode| format::traffic(n.speed_limit, true)),
        )
        .column(
            ColumnSpec::new("traffic_ratio", "Traffic ratio")
                .render_with(|n: &ServerNode| format!("{} X", n.traffic_ratio)),
        )
        .column(
            ColumnSpec::new("group_id", "Node group").render_with(move |n: &ServerNode| {
                n.group_id
                    .and_then(|id| lookup.label_for(&id.to_string()).map(str::to_string))
                    .unwrap_or_else(|| EMPTY_CELL.to_string())
            }),
        )
        .filter(FilterField::text("search").placeholder("Search"))
        .filter(
            FilterField::select("group_id", FilterOptions::Dynamic(groups))
                .placeholder("Node group"),
        )
        .row_actions(edit_delete_actions::<ServerNode>)
        .batch_actions(batch_delete_actions::<ServerNode>);

    CrudPage::new(
        client.resource::<Nodes>(),
        config,
        PageBehaviour::default()
            .toggle("enable")
            .batch_delete(AfterMutation::Refresh)
            .create_override("enable", false),
        events,
    )
}
