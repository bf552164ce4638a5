use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub open: bool,
    pub loading: bool,
    pub last_error: Option<String>,
}

/// Open/loading/error bookkeeping for a create or edit form.
#[derive(Debug, Default)]
pub struct FormModal {
    state: Mutex<ModalState>,
}

impl FormModal {
    pub async fn open(&self) {
        *self.state.lock().await = ModalState {
            open: true,
            ..ModalState::default()
        };
    }

    pub async fn close(&self) {
        *self.state.lock().await = ModalState::default();
    }

    pub async fn begin_submit(&self) {
        let mut state = self.state.lock().await;
        state.open = true;
        state.loading = true;
        state.last_error = None;
    }

    /// Success closes the modal; a failure keeps it open with the error recorded.
    pub async fn finish(&self, outcome: Result<(), String>) {
        let mut state = self.state.lock().await;
        match outcome {
            Ok(()) => *state = ModalState::default(),
            Err(message) => {
                state.loading = false;
                state.last_error = Some(message);
            }
        }
    }

    pub async fn state(&self) -> ModalState {
        self.state.lock().await.clone()
    }
}
