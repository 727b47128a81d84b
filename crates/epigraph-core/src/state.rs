// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application state container.
//!
//! All state changes go through [`AppState::apply`], which consumes the
//! current state and an [`Action`] and returns the next state. Actions that
//! are not valid in the current state leave it unchanged.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::event::StreamEvent;
use crate::input::InputPayload;
use crate::progress::ProgressState;
use crate::types::AnalysisResult;

/// Top-level views of the client.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Page {
    #[default]
    Home,
    Loading,
    Results,
    About,
}

/// The only ways the state may change.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new submission started.
    Submitted(InputPayload),
    /// An event arrived on the live submission's stream.
    Event(StreamEvent),
    /// The live submission produced its result.
    Finished(AnalysisResult),
    /// The user cancelled the live submission.
    Cancelled,
    /// The user returned to the start, discarding the result.
    Reset,
    /// Plain navigation between views.
    Navigate(Page),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub page: Page,
    pub input: Option<InputPayload>,
    pub progress: ProgressState,
    /// True while a submission is live.
    pub processing: bool,
    pub result: Option<AnalysisResult>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state that follows `action`.
    pub fn apply(self, action: Action) -> AppState {
        match action {
            Action::Submitted(input) => AppState {
                page: Page::Loading,
                input: Some(input),
                progress: ProgressState::initial(),
                processing: true,
                result: None,
            },
            Action::Event(event) => {
                if !self.processing {
                    return self;
                }
                let progress = self.progress.advance(&event);
                match event {
                    StreamEvent::FinalResults { results } => AppState {
                        page: Page::Results,
                        progress,
                        processing: false,
                        result: Some(results),
                        ..self
                    },
                    _ => AppState { progress, ..self },
                }
            }
            Action::Finished(result) => {
                if !self.processing {
                    return self;
                }
                AppState {
                    page: Page::Results,
                    processing: false,
                    result: Some(result),
                    ..self
                }
            }
            Action::Cancelled => AppState {
                page: Page::Home,
                input: None,
                progress: ProgressState::initial(),
                processing: false,
                ..self
            },
            Action::Reset => AppState::new(),
            Action::Navigate(page) => {
                let allowed = match page {
                    Page::Home | Page::About => !self.processing,
                    Page::Results => !self.processing && self.result.is_some(),
                    Page::Loading => false,
                };
                if allowed {
                    AppState { page, ..self }
                } else {
                    self
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Stage;
    use crate::types::ResultTab;

    fn input() -> InputPayload {
        InputPayload::text("a-na {d}nin-gir2-su").unwrap()
    }

    fn result(summary: &str) -> AnalysisResult {
        AnalysisResult {
            summary: summary.into(),
            language: Some("en".into()),
            tabs: vec![ResultTab {
                name: "Content".into(),
                content: "...".into(),
            }],
            preprocessing: None,
        }
    }

    #[test]
    fn submission_enters_loading_with_fresh_progress() {
        let state = AppState::new().apply(Action::Submitted(input()));
        assert_eq!(state.page, Page::Loading);
        assert!(state.processing);
        assert_eq!(state.progress, ProgressState::initial());
        assert!(state.result.is_none());
    }

    #[test]
    fn final_results_event_navigates_in_same_apply() {
        let state = AppState::new()
            .apply(Action::Submitted(input()))
            .apply(Action::Event(StreamEvent::FinalResults {
                results: result("dedication to Ningirsu"),
            }));
        assert_eq!(state.page, Page::Results);
        assert_eq!(state.progress.stage, Stage::Complete);
        assert!(!state.processing);
        assert_eq!(state.result.unwrap().summary, "dedication to Ningirsu");
    }

    #[test]
    fn events_are_ignored_when_nothing_is_processing() {
        let idle = AppState::new();
        let next = idle.clone().apply(Action::Event(StreamEvent::QuickPreview {
            content: "late".into(),
        }));
        assert_eq!(idle, next);

        let next = idle.clone().apply(Action::Finished(result("late")));
        assert_eq!(idle, next);
    }

    #[test]
    fn cancel_returns_home_and_is_idempotent() {
        let loading = AppState::new()
            .apply(Action::Submitted(input()))
            .apply(Action::Event(StreamEvent::Status {
                stage: Stage::Analyzing,
                message: None,
            }));
        let once = loading.apply(Action::Cancelled);
        assert_eq!(once.page, Page::Home);
        assert!(once.input.is_none());
        assert!(!once.processing);
        assert_eq!(once.progress, ProgressState::initial());

        let twice = once.clone().apply(Action::Cancelled);
        assert_eq!(once, twice);
    }

    #[test]
    fn reset_discards_result() {
        let state = AppState::new()
            .apply(Action::Submitted(input()))
            .apply(Action::Finished(result("x")))
            .apply(Action::Reset);
        assert_eq!(state, AppState::new());
    }

    #[test]
    fn navigation_never_enters_loading_or_empty_results() {
        let state = AppState::new().apply(Action::Navigate(Page::Loading));
        assert_eq!(state.page, Page::Home);

        let state = state.apply(Action::Navigate(Page::Results));
        assert_eq!(state.page, Page::Home);

        let state = state.apply(Action::Navigate(Page::About));
        assert_eq!(state.page, Page::About);
    }

    #[test]
    fn navigation_is_blocked_while_processing() {
        let state = AppState::new()
            .apply(Action::Submitted(input()))
            .apply(Action::Navigate(Page::About));
        assert_eq!(state.page, Page::Loading);
    }
}
