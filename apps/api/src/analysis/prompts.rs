// All LLM prompt constants for the Analysis module.
// The system instruction comes from llm_client::prompts::JSON_ONLY_SYSTEM.

use serde_json::{json, Value};

use crate::analysis::models::MatchLevel;

/// Gap-analysis instructions. Replace `{jd_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Act as an expert Applicant Tracking System (ATS) and Senior Technical Recruiter.

I will provide you with a candidate's RESUME and a JOB DESCRIPTION.

Your task is to perform a deep gap analysis.

JOB DESCRIPTION:
{jd_text}

Analyze the following:
1. Calculate a match score (0-100) based on skills, experience, and semantic relevance.
2. Identify keywords present in both texts (Matched).
3. Identify critical keywords/skills missing from the resume but present in the JD (Missing).
4. List specific strengths of the candidate for this role.
5. Provide actionable improvements (bullet points) to increase the match score.
6. Assess cultural fit based on the tone of the JD vs Resume.

Also write a brief executive summary of the match.

Return the response as a single JSON object matching the declared schema."#;

/// Prefix for a résumé sent inline as text.
pub const RESUME_TEXT_PREFIX: &str = "RESUME CONTENT:\n";

pub fn build_analysis_prompt(jd_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{jd_text}", jd_text)
}

fn string_list(description: &str) -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" },
        "description": description
    })
}

/// The response schema declared to the service. Mirrors `AnalysisVerdict`.
pub fn response_schema() -> Value {
    let levels: Vec<&str> = MatchLevel::ALL.iter().map(MatchLevel::as_str).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER", "description": "Match score from 0 to 100" },
            "matchLevel": { "type": "STRING", "enum": levels },
            "summary": {
                "type": "STRING",
                "description": "A brief executive summary of the match analysis"
            },
            "matchedKeywords": string_list("List of relevant hard and soft skills found in both"),
            "missingKeywords": string_list("List of relevant skills found in JD but missing in Resume"),
            "strengths": string_list("Key selling points of the candidate"),
            "improvements": string_list("Actionable advice to improve the resume"),
            "culturalFit": {
                "type": "STRING",
                "description": "Brief assessment of tone/culture alignment"
            }
        },
        "required": [
            "score",
            "matchLevel",
            "summary",
            "matchedKeywords",
            "missingKeywords",
            "strengths",
            "improvements",
            "culturalFit"
        ]
    })
}
