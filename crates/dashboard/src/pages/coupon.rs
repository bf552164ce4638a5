use client_core::{AdminClient, Coupons};
use grid::{AfterMutation, ColumnSpec, FilterField, FilterOptions, GridConfig};
use shared::domain::{Coupon, CouponKind};
use tokio::sync::broadcast;

use super::subscribe_plan_options;
use crate::{
    format,
    page::{batch_delete_actions, edit_delete_actions},
    CrudPage, DashboardEvent, PageBehaviour,
};

pub fn kind_label(kind: CouponKind) -> &'static str {
    match kind {
        CouponKind::Percentage => "Percentage",
        CouponKind::Amount => "Amount",
    }
}

pub fn discount_label(coupon: &Coupon) -> String {
    match coupon.kind {
        CouponKind::Percentage => format!("{} %", coupon.discount),
        CouponKind::Amount => format!("¥ {}", format::major_unit(coupon.discount)),
    }
}

pub fn usage_label(coupon: &Coupon) -> String {
    let (count, remaining) = match coupon.remaining() {
        Some(remaining) => (coupon.count.to_string(), remaining.to_string()),
        None => ("unlimited".to_string(), "unlimited".to_string()),
    };
    format!(
        "count: {count}, remaining: {remaining}, used: {}",
        coupon.used_count
    )
}

/// Batch delete resets the grid: the filters may no longer match anything.
pub fn coupon_page(
    client: &AdminClient,
    page_size: u32,
    events: broadcast::Sender<DashboardEvent>,
) -> CrudPage<Coupons> {
    let plans = subscribe_plan_options(client);
    let config = GridConfig::<Coupon>::new("coupon")
        .page_size(page_size)
        .column(
            ColumnSpec::new("enable", "Enable").render_with(|c: &Coupon| format::switch(c.enable)),
        )
        .column(ColumnSpec::new("name", "Name"))
        .column(ColumnSpec::new("code", "Code"))
        .column(
            ColumnSpec::new("type", "Type")
                .render_with(|c: &Coupon| kind_label(c.kind).to_string()),
        )
        .column(ColumnSpec::new("discount", "Discount").render_with(discount_label))
        .column(ColumnSpec::new("count", "Count").render_with(usage_label))
        .column(
            ColumnSpec::new("expire", "Validity period").render_with(|c: &Coupon| {
                format::validity_period(c.start_time, c.expire_time)
            }),
        )
        .filter(FilterField::text("search").placeholder("Search"))
        .filter(
            FilterField::select("subscribe", FilterOptions::Dynamic(plans))
                .placeholder("Subscribe"),
        )
        .row_actions(edit_delete_actions::<Coupon>)
        .batch_actions(batch_delete_actions::<Coupon>);

    CrudPage::new(
        client.resource::<Coupons>(),
        config,
        PageBehaviour::default()
            .toggle("enable")
            .batch_delete(AfterMutation::Reset)
            .create_override("enable", false),
        events,
    )
}
