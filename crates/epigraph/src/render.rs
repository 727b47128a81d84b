// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering of analysis progress and results.
//!
//! Progress, the quick preview and the preliminary classification go to
//! stderr as the state changes. The final result goes to stdout.

use std::io::IsTerminal;
use std::str::FromStr;
use std::time::Duration;

use colored::Colorize;
use epigraph_core::i18n::{self, Message};
use epigraph_core::{AnalysisResult, AppState, Locale, Page, Stage};
use indicatif::{ProgressBar, ProgressStyle};

enum ViewMode {
    Bar(ProgressBar),
    Plain,
    Quiet,
}

/// Live view of one submission, fed with every published [`AppState`].
pub struct ProgressView {
    locale: Locale,
    mode: ViewMode,
    color: bool,
    last_stage: Option<Stage>,
    preview_shown: bool,
    last_classification: Option<(Option<String>, Option<String>)>,
}

impl ProgressView {
    /// `json` silences the view entirely; `plain` replaces the bar with text lines.
    pub fn new(locale: Locale, json: bool, plain: bool) -> Self {
        let interactive = std::io::stderr().is_terminal();
        let mode = if json {
            ViewMode::Quiet
        } else if plain || !interactive {
            ViewMode::Plain
        } else {
            ViewMode::Bar(progress_bar())
        };

        Self {
            locale,
            mode,
            color: !plain && interactive,
            last_stage: None,
            preview_shown: false,
            last_classification: None,
        }
    }

    pub fn update(&mut self, state: &AppState) {
        if !matches!(state.page, Page::Loading | Page::Results) {
            return;
        }
        let progress = &state.progress;

        if self.last_stage.is_none() {
            self.emit(&heading(
                i18n::text(Message::AnalyzingInscription, self.locale),
                self.color,
            ));
        }

        if self.last_stage != Some(progress.stage) {
            self.last_stage = Some(progress.stage);
            let label = progress.stage.label(self.locale);
            match &self.mode {
                ViewMode::Bar(bar) => {
                    bar.set_position(u64::from(progress.progress));
                    bar.set_message(format!(
                        "[{}/{}] {label}",
                        progress.stage.index() + 1,
                        Stage::ALL.len()
                    ));
                }
                ViewMode::Plain => eprintln!("[{:>3}%] {label}", progress.progress),
                ViewMode::Quiet => {}
            }
        }

        if !self.preview_shown {
            if let Some(preview) = &progress.quick_preview {
                self.preview_shown = true;
                self.emit(&format_preview(preview, self.locale, self.color));
            }
        }

        let classification = (progress.genre.clone(), progress.period.clone());
        let classified = classification.0.is_some() || classification.1.is_some();
        if classified && self.last_classification.as_ref() != Some(&classification) {
            self.emit(&format_classification(
                classification.0.as_deref(),
                classification.1.as_deref(),
                self.locale,
                self.color,
            ));
            self.last_classification = Some(classification);
        }
    }

    /// Removes the bar. Printed preview and classification remain.
    pub fn finish(self) {
        if let ViewMode::Bar(bar) = self.mode {
            bar.finish_and_clear();
        }
    }

    /// Removes the bar and reports that the run was cancelled.
    pub fn finish_cancelled(self) {
        self.emit(i18n::text(Message::Cancelled, self.locale));
        self.finish();
    }

    fn emit(&self, text: &str) {
        match &self.mode {
            ViewMode::Bar(bar) => bar.println(text),
            ViewMode::Plain => eprintln!("{text}"),
            ViewMode::Quiet => {}
        }
    }
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
    {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().cyan().to_string()
    } else {
        text.to_string()
    }
}

/// Block shown when the quick preview arrives.
pub fn format_preview(preview: &str, locale: Locale, color: bool) -> String {
    format!(
        "{}\n{preview}\n{}",
        heading(i18n::text(Message::InstantResults, locale), color),
        i18n::text(Message::ContinuingAnalysis, locale)
    )
}

/// Block shown when the preliminary classification arrives.
pub fn format_classification(
    genre: Option<&str>,
    period: Option<&str>,
    locale: Locale,
    color: bool,
) -> String {
    let mut out = heading(i18n::text(Message::InitialClassification, locale), color);
    if let Some(genre) = genre {
        out.push_str(&format!(
            "\n  {}: {genre}",
            i18n::text(Message::InscriptionType, locale)
        ));
    }
    if let Some(period) = period {
        out.push_str(&format!(
            "\n  {}: {period}",
            i18n::text(Message::HistoricalPeriod, locale)
        ));
    }
    out
}

/// Human-readable rendering of the final result.
pub fn format_result(result: &AnalysisResult, locale: Locale, color: bool) -> String {
    let mut out = if color {
        result.summary.bold().to_string()
    } else {
        result.summary.clone()
    };
    out.push('\n');

    if let Some(preprocessing) = result
        .preprocessing
        .as_ref()
        .filter(|p| p.status == "success")
    {
        out.push_str(&format!(
            "\n{}\n{}\n",
            heading(i18n::text(Message::QuickAnalysis, locale), color),
            preprocessing.preview
        ));
    }

    for tab in &result.tabs {
        out.push_str(&format!(
            "\n{}\n{}\n",
            heading(&format!("── {} ──", tab.name), color),
            tab.content
        ));
    }

    if let Some(language) = &result.language {
        let name = Locale::from_str(language)
            .map(|l| i18n::text(Message::LanguageName, l))
            .unwrap_or(language.as_str());
        out.push_str(&format!(
            "\n{} {name}\n",
            i18n::text(Message::AnalyzedIn, locale)
        ));
    }

    out
}
