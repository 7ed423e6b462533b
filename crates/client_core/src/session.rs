//! Async bridge between the single snapshot owner and in-flight requests.

use std::sync::Arc;

use tokio::{runtime::Handle, sync::mpsc};
use tracing::debug;

use crate::{
    action::Action,
    dispatcher::{execute, Completion, ResourceApi},
    input::Drafts,
    reconciler::BookController,
    view_state::ViewState,
};

/// Owns the controller and spawns one task per dispatched action on `runtime`.
/// Completions come back over a channel and are applied by whoever drives the
/// session, in arrival order.
pub struct Session {
    controller: BookController,
    api: Arc<dyn ResourceApi>,
    runtime: Handle,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl Session {
    pub fn new(api: Arc<dyn ResourceApi>, drafts: Drafts, runtime: Handle) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            controller: BookController::new(drafts),
            api,
            runtime,
            completion_tx,
            completion_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        self.controller.state()
    }

    pub fn drafts(&self) -> &Drafts {
        self.controller.drafts()
    }

    pub fn drafts_mut(&mut self) -> &mut Drafts {
        self.controller.drafts_mut()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts `action` against the current drafts. Returns `false` when it was
    /// rejected by validation and nothing was sent.
    pub fn submit(&mut self, action: Action) -> bool {
        let Some(request) = self.controller.begin(action) else {
            return false;
        };

        let api = Arc::clone(&self.api);
        let tx = self.completion_tx.clone();
        self.in_flight += 1;
        debug!(action = action.name(), in_flight = self.in_flight, "dispatching");
        self.runtime.spawn(async move {
            let completion = execute(api.as_ref(), request).await;
            let _ = tx.send(completion);
        });
        true
    }

    /// Applies every completion that has already arrived without waiting.
    pub fn process_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Waits for the next completion and applies it. Returns `false` when
    /// nothing is in flight.
    pub async fn settle_next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.completion_rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    pub async fn settle_all(&mut self) {
        while self.settle_next().await {}
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        debug!(
            action = completion.action().name(),
            in_flight = self.in_flight,
            "settling"
        );
        self.controller.settle(completion);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
