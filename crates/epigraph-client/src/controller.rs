// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission lifecycle and state publication.
//!
//! [`AnalysisController`] owns the [`AppState`] and at most one active
//! cancellation token. State changes flow only through [`AppState::apply`]
//! and are published on a `watch` channel, so observers always see whole
//! states and never a torn update.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use epigraph_core::{
    Action, AnalysisBackend, AnalysisRequest, AppState, InputPayload, Locale, Page,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::consumer::{Outcome, StreamConsumer};

struct ActiveRun {
    id: u64,
    token: CancellationToken,
}

/// Coordinates submissions, cancellation and the published [`AppState`].
pub struct AnalysisController {
    consumer: StreamConsumer,
    state: watch::Sender<AppState>,
    active: Mutex<Option<ActiveRun>>,
    next_id: AtomicU64,
    detailed_analysis: bool,
    quick_preview: bool,
}

impl AnalysisController {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        let (state, _) = watch::channel(AppState::new());
        Self {
            consumer: StreamConsumer::new(backend),
            state,
            active: Mutex::new(None),
            next_id: AtomicU64::new(1),
            detailed_analysis: true,
            quick_preview: true,
        }
    }

    /// Sets the preferences sent with every subsequent request.
    pub fn with_preferences(mut self, detailed_analysis: bool, quick_preview: bool) -> Self {
        self.detailed_analysis = detailed_analysis;
        self.quick_preview = quick_preview;
        self
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Token of the live submission, if any.
    pub fn active_signal(&self) -> Option<CancellationToken> {
        self.lock_active().as_ref().map(|run| run.token.clone())
    }

    /// Submits `input` and drives it to a terminal outcome.
    ///
    /// A still-running earlier submission is cancelled first; none of its
    /// events reach the state after this call begins.
    pub async fn submit(&self, input: InputPayload, locale: Locale) -> Outcome {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let previous = self.lock_active().replace(ActiveRun {
            id,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            debug!(run = previous.id, "superseding previous submission");
            previous.token.cancel();
        }

        info!(run = id, kind = %input.kind, %locale, "submitting analysis");
        self.dispatch_for(&token, Action::Submitted(input.clone()));

        let request = AnalysisRequest::new(input, locale)
            .with_preferences(self.detailed_analysis, self.quick_preview);

        let outcome = self
            .consumer
            .run(&request, &token, |event| {
                self.dispatch_for(&token, Action::Event(event.clone()));
            })
            .await;

        if let Outcome::Completed { result, source } = &outcome {
            debug!(run = id, ?source, "submission completed");
            self.dispatch_for(&token, Action::Finished(result.clone()));
        }

        let mut active = self.lock_active();
        if active.as_ref().is_some_and(|run| run.id == id) {
            *active = None;
        }
        outcome
    }

    /// Cancels the live submission and returns to the home page.
    ///
    /// Safe to call repeatedly; does nothing when no submission is live.
    pub fn cancel(&self) {
        let previous = self.lock_active().take();
        let processing = self.state.borrow().processing;

        if let Some(run) = &previous {
            info!(run = run.id, "cancelling analysis");
            run.token.cancel();
        }
        if previous.is_some() || processing {
            self.dispatch(Action::Cancelled);
        }
    }

    /// Cancels anything live and returns to the initial state.
    pub fn reset(&self) {
        if let Some(run) = self.lock_active().take() {
            run.token.cancel();
        }
        self.dispatch(Action::Reset);
    }

    pub fn navigate(&self, page: Page) {
        self.dispatch(Action::Navigate(page));
    }

    fn dispatch(&self, action: Action) {
        self.state.send_if_modified(|state| replace_if_changed(state, action));
    }

    /// Applies `action` unless `token` has been cancelled.
    ///
    /// The check runs under the channel lock, so a run superseded by a new
    /// submission cannot interleave an event after the new `Submitted`.
    fn dispatch_for(&self, token: &CancellationToken, action: Action) {
        self.state.send_if_modified(|state| {
            if token.is_cancelled() {
                return false;
            }
            replace_if_changed(state, action)
        });
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn replace_if_changed(state: &mut AppState, action: Action) -> bool {
    let next = state.clone().apply(action);
    if next == *state {
        false
    } else {
        *state = next;
        true
    }
}
