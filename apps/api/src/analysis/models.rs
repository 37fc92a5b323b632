//! Analysis domain types: the verdict returned by the AI service and the enriched,
//! persisted `AnalysisResult`.

use serde::{Deserialize, Serialize};

/// Coarse match level reported by the AI service. Serialized verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLevel {
    Low,
    Moderate,
    High,
    Perfect,
}

impl MatchLevel {
    pub const ALL: [MatchLevel; 4] = [
        MatchLevel::Low,
        MatchLevel::Moderate,
        MatchLevel::High,
        MatchLevel::Perfect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLevel::Low => "Low",
            MatchLevel::Moderate => "Moderate",
            MatchLevel::High => "High",
            MatchLevel::Perfect => "Perfect",
        }
    }
}

/// The validated verdict exactly as the AI service produced it.
///
/// Decoding is strict: every field is required, `matchLevel` must be one of the
/// four levels, and `score` must lie in [0, 100] (fractional scores are rounded).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawVerdict")]
pub struct AnalysisVerdict {
    pub score: u8,
    pub match_level: MatchLevel,
    pub summary: String,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub cultural_fit: String,
    /// Not requested from the service; kept when the model volunteers one.
    pub job_title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerdict {
    score: f64,
    match_level: MatchLevel,
    summary: String,
    matched_keywords: Vec<String>,
    missing_keywords: Vec<String>,
    strengths: Vec<String>,
    improvements: Vec<String>,
    cultural_fit: String,
    #[serde(default)]
    job_title: Option<String>,
}

impl TryFrom<RawVerdict> for AnalysisVerdict {
    type Error = String;

    fn try_from(raw: RawVerdict) -> Result<Self, Self::Error> {
        if !raw.score.is_finite() || !(0.0..=100.0).contains(&raw.score) {
            return Err(format!("score {} is outside 0-100", raw.score));
        }

        Ok(AnalysisVerdict {
            score: raw.score.round() as u8,
            match_level: raw.match_level,
            summary: raw.summary,
            matched_keywords: raw.matched_keywords,
            missing_keywords: raw.missing_keywords,
            strengths: raw.strengths,
            improvements: raw.improvements,
            cultural_fit: raw.cultural_fit,
            job_title: raw.job_title.filter(|t| !t.trim().is_empty()),
        })
    }
}

impl AnalysisVerdict {
    /// Adds the caller-side fields. A title volunteered by the service wins over
    /// `fallback_title`.
    pub fn into_result(self, fallback_title: String, timestamp: i64) -> AnalysisResult {
        AnalysisResult {
            score: self.score,
            match_level: self.match_level,
            job_title: self.job_title.unwrap_or(fallback_title),
            summary: self.summary,
            matched_keywords: self.matched_keywords,
            missing_keywords: self.missing_keywords,
            strengths: self.strengths,
            improvements: self.improvements,
            cultural_fit: self.cultural_fit,
            timestamp,
        }
    }
}

/// One completed analysis. Immutable once created; owned by the history once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: u8,
    pub match_level: MatchLevel,
    #[serde(default)]
    pub job_title: String,
    pub summary: String,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub cultural_fit: String,
    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
}

const JOB_TITLE_MAX_CHARS: usize = 80;

/// Best-effort title: the first non-empty line of the job description.
pub fn guess_job_title(job_description: &str) -> String {
    job_description
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.chars().take(JOB_TITLE_MAX_CHARS).collect::<String>())
        .map(|title| title.trim_end().to_string())
        .unwrap_or_default()
}
