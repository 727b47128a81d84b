// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `epigraph analyze` command implementation.
//!
//! Builds the input payload, submits it through an [`AnalysisController`]
//! and renders the published state until the run reaches a terminal outcome.
//! Ctrl+C cancels the submission and exits with status 130.

use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

use epigraph_client::{AnalysisController, HttpBackend, Outcome};
use epigraph_config::EpigraphConfig;
use epigraph_core::{AppState, EpigraphError, InputPayload, Locale};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::render::{format_result, ProgressView};
use crate::signal::install_interrupt_handler;
use crate::{AnalyzeArgs, EXIT_INTERRUPTED};

/// Run the `epigraph analyze` command.
pub async fn run_analyze(
    config: &EpigraphConfig,
    args: AnalyzeArgs,
) -> Result<ExitCode, EpigraphError> {
    let locale = args.lang.unwrap_or(config.app.locale);
    let input = build_input(&args)?;

    let backend = HttpBackend::from_config(&config.backend)?;
    debug!(api = %config.backend.api_root(), "using analysis backend");
    let controller = AnalysisController::new(Arc::new(backend)).with_preferences(
        config.analysis.detailed_analysis,
        config.analysis.quick_preview,
    );

    let view = ProgressView::new(locale, args.json, args.plain);
    let watcher = tokio::spawn(follow_state(controller.subscribe(), view));

    let interrupt = install_interrupt_handler();
    let outcome = drive(&controller, input, locale, &interrupt).await;

    // Dropping the controller closes the state channel and ends the watcher.
    drop(controller);
    match watcher.await {
        Ok(view) if matches!(outcome, Outcome::Cancelled) => view.finish_cancelled(),
        Ok(view) => view.finish(),
        Err(e) => debug!(error = %e, "progress watcher ended abnormally"),
    }

    match outcome {
        Outcome::Cancelled => Ok(ExitCode::from(EXIT_INTERRUPTED)),
        Outcome::Completed { result, source } => {
            debug!(?source, "analysis finished");
            if args.json {
                let json = serde_json::to_string_pretty(&result).map_err(|e| {
                    EpigraphError::Internal(format!("failed to render result: {e}"))
                })?;
                println!("{json}");
            } else {
                let color = !args.plain && std::io::stdout().is_terminal();
                print!("{}", format_result(&result, locale, color));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Submits `input`, cancelling the submission when `interrupt` fires.
async fn drive(
    controller: &AnalysisController,
    input: InputPayload,
    locale: Locale,
    interrupt: &CancellationToken,
) -> Outcome {
    let submission = controller.submit(input, locale);
    tokio::pin!(submission);

    // The submission is polled first so its token is registered before any cancel.
    tokio::select! {
        biased;
        outcome = &mut submission => outcome,
        _ = interrupt.cancelled() => {
            controller.cancel();
            submission.await
        }
    }
}

async fn follow_state(mut states: watch::Receiver<AppState>, mut view: ProgressView) -> ProgressView {
    while states.changed().await.is_ok() {
        let state = states.borrow_and_update().clone();
        view.update(&state);
    }
    let last = states.borrow().clone();
    view.update(&last);
    view
}

fn build_input(args: &AnalyzeArgs) -> Result<InputPayload, EpigraphError> {
    if let Some(text) = &args.text {
        InputPayload::text(text.as_str())
    } else if let Some(path) = &args.file {
        InputPayload::load_file(path)
    } else if let Some(path) = &args.camera {
        InputPayload::load_camera(path)
    } else {
        Err(EpigraphError::Input(
            "one of --text, --file or --camera is required".to_string(),
        ))
    }
}
