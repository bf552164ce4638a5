//! The five admin pages. Each builder returns a ready [`CrudPage`](crate::CrudPage) whose
//! grid has not loaded yet.

use std::sync::Arc;

use anyhow::Context;
use client_core::{AdminClient, LOOKUP_PAGE_SIZE};
use grid::{MemoizedOptions, SelectOption};
use shared::protocol::Pagination;

pub mod coupon;
pub mod document;
pub mod node;
pub mod subscribe_group;
pub mod user;

pub use coupon::coupon_page;
pub use document::document_page;
pub use node::node_page;
pub use subscribe_group::subscribe_group_page;
pub use user::user_page;

/// Subscription plans as coupon filter options, fetched once.
pub fn subscribe_plan_options(client: &AdminClient) -> Arc<MemoizedOptions> {
    let client = client.clone();
    MemoizedOptions::new(move || {
        let client = client.clone();
        async move {
            let plans = client
                .list_subscribes(Pagination::new(1, LOOKUP_PAGE_SIZE))
                .await
                .context("loading subscription plans")?;
            Ok::<Vec<SelectOption>, anyhow::Error>(
                plans
                    .list
                    .into_iter()
                    .map(|plan| SelectOption::new(plan.name, plan.id.to_string()))
                    .collect(),
            )
        }
    })
}

pub fn node_group_options(client: &AdminClient) -> Arc<MemoizedOptions> {
    let client = client.clone();
    MemoizedOptions::new(move || {
        let client = client.clone();
        async move {
            let groups = client
                .list_node_groups()
                .await
                .context("loading node groups")?;
            Ok::<Vec<SelectOption>, anyhow::Error>(
                groups
                    .into_iter()
                    .map(|group| SelectOption::new(group.name, group.id.to_string()))
                    .collect(),
            )
        }
    })
}
