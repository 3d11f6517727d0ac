use serde::{Deserialize, Serialize};

/// Structured result of analyzing one transcript window, and the shape of the
/// final merged assessment. Both LLM contracts respond in this schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub risk_flags: Vec<String>,
    pub scores: AnalysisScores,
    pub overall_comment: String,
}

/// 1-5 ratings across the four counseling dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisScores {
    pub empathy: u8,
    pub active_listening: u8,
    pub clarity: u8,
    pub problem_solving: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportParseError {
    #[error("empty response")]
    Empty,
    #[error("invalid json: {0}")]
    Json(String),
    #[error("score {field} out of range: {value}")]
    ScoreOutOfRange { field: &'static str, value: u8 },
}

impl AnalysisReport {
    /// Parses a raw LLM response into a report. Models wrap JSON in Markdown
    /// code fences often enough that fenced and bare payloads are both
    /// accepted.
    pub fn from_llm_response(raw: &str) -> Result<Self, ReportParseError> {
        let body = strip_code_fences(raw.trim());
        if body.is_empty() {
            return Err(ReportParseError::Empty);
        }

        let report: AnalysisReport =
            serde_json::from_str(body).map_err(|e| ReportParseError::Json(e.to_string()))?;
        report.scores.validate()?;
        Ok(report)
    }
}

impl AnalysisScores {
    fn validate(&self) -> Result<(), ReportParseError> {
        for (field, value) in [
            ("empathy", self.empathy),
            ("active_listening", self.active_listening),
            ("clarity", self.clarity),
            ("problem_solving", self.problem_solving),
        ] {
            if !(1..=5).contains(&value) {
                return Err(ReportParseError::ScoreOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop the info string ("json" etc.) on the opening fence line.
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };

    rest.strip_suffix("```").map(str::trim).unwrap_or(rest).trim()
}
