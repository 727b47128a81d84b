// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bilingual (Hebrew/English) messages displayed by the client itself.

use crate::types::Locale;

/// Messages the client renders without help from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    ErrorLabel,
    RetryHint,
    Cancelled,
    AnalyzingInscription,
    InstantResults,
    ContinuingAnalysis,
    InitialClassification,
    InscriptionType,
    HistoricalPeriod,
    AnalyzedIn,
    LanguageName,
    QuickAnalysis,
}

/// Looks up a message in the given locale.
pub fn text(message: Message, locale: Locale) -> &'static str {
    use Message::*;
    match (message, locale) {
        (ErrorLabel, Locale::He) => "שגיאה",
        (ErrorLabel, Locale::En) => "Error",
        (RetryHint, Locale::He) => "העיבוד נכשל. אנא נסה שוב.",
        (RetryHint, Locale::En) => "Processing failed. Please try again.",
        (Cancelled, Locale::He) => "הניתוח בוטל",
        (Cancelled, Locale::En) => "Analysis cancelled",
        (AnalyzingInscription, Locale::He) => "מנתח כתובת עתיקה...",
        (AnalyzingInscription, Locale::En) => "Analyzing ancient inscription...",
        (InstantResults, Locale::He) => "תוצאות מיידיות",
        (InstantResults, Locale::En) => "Instant Results",
        (ContinuingAnalysis, Locale::He) => "ממשיך לניתוח מעמיק עם מודל מתקדם...",
        (ContinuingAnalysis, Locale::En) => "Continuing with advanced deep analysis...",
        (InitialClassification, Locale::He) => "סיווג ראשוני",
        (InitialClassification, Locale::En) => "Initial Classification",
        (InscriptionType, Locale::He) => "סוג הכתובת",
        (InscriptionType, Locale::En) => "Inscription Type",
        (HistoricalPeriod, Locale::He) => "תקופה היסטורית",
        (HistoricalPeriod, Locale::En) => "Historical Period",
        (AnalyzedIn, Locale::He) => "ניותח בשפה:",
        (AnalyzedIn, Locale::En) => "Analyzed in:",
        (LanguageName, Locale::He) => "עברית",
        (LanguageName, Locale::En) => "English",
        (QuickAnalysis, Locale::He) => "ניתוח מקדים",
        (QuickAnalysis, Locale::En) => "Quick Analysis",
    }
}

/// Summary line for a run that failed on both endpoints.
pub fn analysis_error(reason: &str, locale: Locale) -> String {
    match locale {
        Locale::He => format!("שגיאה בניתוח: {reason}"),
        Locale::En => format!("Analysis error: {reason}"),
    }
}
