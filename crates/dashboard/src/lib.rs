//! The admin dashboard pages: one grid per resource, wired to the admin API.

use tokio::sync::broadcast;

pub mod error;
pub mod format;
pub mod modal;
pub mod page;
pub mod pages;
pub mod render;

pub use error::PageError;
pub use modal::{FormModal, ModalState};
pub use page::{CrudPage, PageBehaviour};

/// Notices a surface shows after a mutation settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    Success { page: String, message: String },
    Error { page: String, message: String },
}

impl DashboardEvent {
    pub fn page(&self) -> &str {
        match self {
            Self::Success { page, .. } | Self::Error { page, .. } => page,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Error { message, .. } => message,
        }
    }
}

pub fn event_channel() -> (
    broadcast::Sender<DashboardEvent>,
    broadcast::Receiver<DashboardEvent>,
) {
    broadcast::channel(256)
}
