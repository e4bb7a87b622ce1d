use std::sync::LazyLock;

use regex::Regex;
use smartstats_core::RateCalculator;
use smartstats_types::ScoresheetAnalysis;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?\s*\n?").expect("valid fence pattern"));
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n?```\s*$").expect("valid fence pattern"));

/// Removes a markdown code fence wrapped around the model's JSON, if any
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let start = LEADING_FENCE.find(trimmed).map_or(0, |m| m.end());
    let body = &trimmed[start..];
    let end = TRAILING_FENCE.find(body).map_or(body.len(), |m| m.start());
    &body[..end]
}

/// Parses the model reply. Rates the model reports are discarded and recomputed.
pub fn parse_analysis(text: &str) -> Result<ScoresheetAnalysis, serde_json::Error> {
    let mut analysis: ScoresheetAnalysis = serde_json::from_str(strip_code_fences(text))?;
    RateCalculator::recalculate_all(&mut analysis.players);
    Ok(analysis)
}
