//! Render output of a grid: plain data a surface can draw however it likes.

use crate::{column::ActionItem, filter::SelectOption, GridStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<RowView>,
    pub batch_actions: Vec<ActionItem>,
    pub filters: Vec<FilterView>,
    pub summary: PageSummary,
    pub status: GridStatus,
    pub error: Option<String>,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: String,
    pub selected: bool,
    pub cells: Vec<String>,
    pub actions: Vec<ActionItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterView {
    pub key: String,
    pub placeholder: Option<String>,
    pub value: Option<String>,
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub selected: usize,
}

impl PageSummary {
    pub fn page_count(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.size.max(1)))
    }
}
