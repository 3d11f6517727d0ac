use chrono::{DateTime, Utc};

use super::{AnalysisReport, ReviewKey};

/// Transcripts for long sessions can run past what is worth persisting
/// alongside the assessment; anything beyond this is cut on a char boundary.
pub const MAX_STORED_TRANSCRIPT_CHARS: usize = 200_000;

/// The canonical persisted record: one per (subject, recording), replaced
/// wholesale by a forced re-run.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub key: ReviewKey,
    pub transcript: String,
    pub model: String,
    pub report: AnalysisReport,
    pub created_at: DateTime<Utc>,
}

impl Assessment {
    pub fn new(key: ReviewKey, transcript: String, model: String, report: AnalysisReport) -> Self {
        Self {
            key,
            transcript: truncate_chars(transcript, MAX_STORED_TRANSCRIPT_CHARS),
            model,
            report,
            created_at: Utc::now(),
        }
    }
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text,
    }
}
