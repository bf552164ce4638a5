//! Plain-text rendering of a [`TableView`] for terminal surfaces.

use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table,
};
use grid::{GridStatus, TableView};

pub fn table(view: &TableView) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("")];
    header.extend(view.headers.iter().map(Cell::new));
    header.push(Cell::new("Actions"));
    table.set_header(header);

    for row in &view.rows {
        let mut cells = vec![Cell::new(if row.selected { "[x]" } else { "[ ]" })];
        cells.extend(row.cells.iter().map(Cell::new));
        let actions: Vec<&str> = row.actions.iter().map(|a| a.label.as_str()).collect();
        cells.push(Cell::new(actions.join(" | ")));
        table.add_row(cells);
    }

    table.to_string()
}

pub fn summary(view: &TableView) -> String {
    let summary = &view.summary;
    format!(
        "page {}/{} ({} per page), {} total, {} selected",
        summary.page,
        summary.page_count().max(1),
        summary.size,
        summary.total,
        summary.selected
    )
}

/// Table plus the filter, pagination and error lines around it.
pub fn report(view: &TableView) -> String {
    let mut lines = Vec::new();

    let active: Vec<String> = view
        .filters
        .iter()
        .filter_map(|filter| {
            let value = filter.value.as_ref()?;
            let shown = filter
                .options
                .iter()
                .find(|option| &option.value == value)
                .map(|option| option.label.as_str())
                .unwrap_or(value.as_str());
            Some(format!("{}={shown}", filter.key))
        })
        .collect();
    if !active.is_empty() {
        lines.push(format!("filters: {}", active.join(", ")));
    }

    if view.is_empty() {
        lines.push("No data".to_string());
    } else {
        lines.push(table(view));
    }
    lines.push(summary(view));

    if view.status == GridStatus::Errored {
        if let Some(error) = &view.error {
            lines.push(format!("error: {error}"));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use grid::{ActionItem, FilterView, PageSummary, RowView, SelectOption};

    use super::*;

    fn view(rows: Vec<RowView>, total: u64) -> TableView {
        TableView {
            headers: vec!["Name".to_string(), "Code".to_string()],
            rows,
            batch_actions: Vec::new(),
            filters: vec![FilterView {
                key: "subscribe".to_string(),
                placeholder: None,
                value: Some("2".to_string()),
                options: vec![SelectOption::new("Pro", "2")],
            }],
            summary: PageSummary {
                page: 1,
                size: 10,
                total,
                selected: 0,
            },
            status: GridStatus::Settled,
            error: None,
        }
    }

    #[test]
    fn report_lists_rows_and_uses_option_labels() {
        let rendered = report(&view(
            vec![RowView {
                id: "1".to_string(),
                selected: true,
                cells: vec!["spring".to_string(), "SPRING24".to_string()],
                actions: vec![ActionItem::new("edit", "Edit"), ActionItem::new("delete", "Delete")],
            }],
            1,
        ));
        assert!(rendered.contains("filters: subscribe=Pro"));
        assert!(rendered.contains("SPRING24"));
        assert!(rendered.contains("[x]"));
        assert!(rendered.contains("Edit | Delete"));
        assert!(rendered.contains("page 1/1 (10 per page), 1 total, 0 selected"));
    }

    #[test]
    fn empty_page_says_so() {
        let rendered = report(&view(Vec::new(), 0));
        assert!(rendered.contains("No data"));
        assert!(!rendered.contains("Name"));
    }
}
