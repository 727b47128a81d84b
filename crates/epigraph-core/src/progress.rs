// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Projection of stream events onto the displayed analysis progress.
//!
//! [`ProgressState::advance`] is a pure function: it performs no I/O and
//! never moves the stage or the progress percentage backward.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::event::StreamEvent;
use crate::types::Locale;

/// Named analysis phases, in display order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Initializing,
    QuickPreview,
    Analyzing,
    Processing,
    Finalizing,
    Complete,
}

impl Stage {
    /// Every phase in order.
    pub const ALL: [Stage; 6] = [
        Stage::Initializing,
        Stage::QuickPreview,
        Stage::Analyzing,
        Stage::Processing,
        Stage::Finalizing,
        Stage::Complete,
    ];

    /// Display percentage associated with the phase.
    pub fn progress(&self) -> u8 {
        match self {
            Stage::Initializing => 10,
            Stage::QuickPreview => 30,
            Stage::Analyzing => 50,
            Stage::Processing => 75,
            Stage::Finalizing => 90,
            Stage::Complete => 100,
        }
    }

    /// Position in [`Stage::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Spinner caption for the phase.
    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Stage::Initializing, Locale::He) => "מתחיל ניתוח...",
            (Stage::Initializing, Locale::En) => "Initializing analysis...",
            (Stage::QuickPreview, Locale::He) => "מקבל תוצאות ראשוניות...",
            (Stage::QuickPreview, Locale::En) => "Getting quick preview...",
            (Stage::Analyzing, Locale::He) => "מנתח לעומק...",
            (Stage::Analyzing, Locale::En) => "Deep analysis...",
            (Stage::Processing, Locale::He) => "מעבד תוצאות מפורטות...",
            (Stage::Processing, Locale::En) => "Processing detailed results...",
            (Stage::Finalizing, Locale::He) => "משלים את הניתוח...",
            (Stage::Finalizing, Locale::En) => "Finalizing analysis...",
            (Stage::Complete, Locale::He) => "הושלם!",
            (Stage::Complete, Locale::En) => "Complete!",
        }
    }

    /// Short label for the step indicator.
    pub fn step_label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Stage::Initializing, Locale::He) => "התחלה",
            (Stage::Initializing, Locale::En) => "Start",
            (Stage::QuickPreview, Locale::He) => "תצוגה מקדימה",
            (Stage::QuickPreview, Locale::En) => "Preview",
            (Stage::Analyzing, Locale::He) => "ניתוח",
            (Stage::Analyzing, Locale::En) => "Analysis",
            (Stage::Processing, Locale::He) => "עיבוד",
            (Stage::Processing, Locale::En) => "Processing",
            (Stage::Finalizing, Locale::He) => "סיום",
            (Stage::Finalizing, Locale::En) => "Finalizing",
            (Stage::Complete, Locale::He) => "הושלם",
            (Stage::Complete, Locale::En) => "Complete",
        }
    }
}

/// Progress of the live submission, as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub stage: Stage,
    /// Percentage in `0..=100`, never decreasing within a run.
    pub progress: u8,
    pub quick_preview: Option<String>,
    pub genre: Option<String>,
    pub period: Option<String>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::initial()
    }
}

impl ProgressState {
    /// State at the start of a submission.
    pub fn initial() -> Self {
        Self {
            stage: Stage::Initializing,
            progress: Stage::Initializing.progress(),
            quick_preview: None,
            genre: None,
            period: None,
        }
    }

    /// Folds one event into the state, returning the next state.
    pub fn advance(&self, event: &StreamEvent) -> ProgressState {
        let mut next = self.clone();
        match event {
            StreamEvent::Status { stage, .. } => next.move_to(*stage),
            StreamEvent::QuickPreview { content } => {
                next.quick_preview = Some(content.clone());
                next.move_to(Stage::Analyzing);
            }
            StreamEvent::Classification { genre, period } => {
                if genre.is_some() {
                    next.genre = genre.clone();
                }
                if period.is_some() {
                    next.period = period.clone();
                }
                next.move_to(Stage::Processing);
            }
            StreamEvent::FinalResults { .. } => next.move_to(Stage::Complete),
            StreamEvent::Error { .. } => {}
        }
        next
    }

    fn move_to(&mut self, stage: Stage) {
        self.stage = self.stage.max(stage);
        self.progress = self.progress.max(self.stage.progress());
    }
}
