//! Filter field descriptors and memoized option loading.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::OnceCell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[async_trait]
pub trait OptionsLoader: Send + Sync {
    async fn load_options(&self) -> Result<Vec<SelectOption>>;
}

#[async_trait]
impl<F, Fut> OptionsLoader for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<SelectOption>>> + Send + 'static,
{
    async fn load_options(&self) -> Result<Vec<SelectOption>> {
        (self)().await
    }
}

/// Caches the first successful load for the lifetime of the value. Failed loads are retried
/// on the next call.
pub struct MemoizedOptions {
    loader: Box<dyn OptionsLoader>,
    cell: OnceCell<Vec<SelectOption>>,
}

impl MemoizedOptions {
    pub fn new(loader: impl OptionsLoader + 'static) -> Arc<Self> {
        Arc::new(Self {
            loader: Box::new(loader),
            cell: OnceCell::new(),
        })
    }

    pub async fn options(&self) -> Result<&[SelectOption]> {
        let options = self
            .cell
            .get_or_try_init(|| self.loader.load_options())
            .await?;
        Ok(options.as_slice())
    }

    pub fn cached(&self) -> Option<&[SelectOption]> {
        self.cell.get().map(Vec::as_slice)
    }

    pub fn label_for(&self, value: &str) -> Option<&str> {
        self.cached()?
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }
}

#[derive(Clone, Default)]
pub enum FilterOptions {
    /// Free-text input.
    #[default]
    Text,
    Static(Vec<SelectOption>),
    Dynamic(Arc<MemoizedOptions>),
}

#[derive(Clone)]
pub struct FilterField {
    pub key: String,
    pub placeholder: Option<String>,
    pub options: FilterOptions,
}

impl FilterField {
    pub fn text(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            placeholder: None,
            options: FilterOptions::Text,
        }
    }

    pub fn select(key: impl Into<String>, options: FilterOptions) -> Self {
        Self {
            key: key.into(),
            placeholder: None,
            options,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub(crate) async fn resolve_options(&self) -> Vec<SelectOption> {
        match &self.options {
            FilterOptions::Text => Vec::new(),
            FilterOptions::Static(options) => options.clone(),
            FilterOptions::Dynamic(memo) => match memo.options().await {
                Ok(options) => options.to_vec(),
                Err(err) => {
                    tracing::warn!(
                        filter = %self.key,
                        error = %format!("{err:#}"),
                        "filter options unavailable"
                    );
                    Vec::new()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::anyhow;

    use super::*;

    #[tokio::test]
    async fn memoized_options_call_loader_once_after_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let memo = MemoizedOptions::new(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(vec![SelectOption::new("Basic", "1")])
            }
        });

        assert!(memo.cached().is_none());
        assert_eq!(memo.options().await.expect("options").len(), 1);
        assert_eq!(memo.options().await.expect("options").len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(memo.label_for("1"), Some("Basic"));
        assert_eq!(memo.label_for("2"), None);
    }

    #[tokio::test]
    async fn failed_option_loads_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let memo = MemoizedOptions::new(move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(anyhow!("connection refused"))
                } else {
                    Ok(vec![SelectOption::new("Asia", "3")])
                }
            }
        });

        let field = FilterField::select("group_id", FilterOptions::Dynamic(memo.clone()));
        assert!(field.resolve_options().await.is_empty());
        assert_eq!(field.resolve_options().await.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(memo.label_for("3"), Some("Asia"));
    }
}
