use axum::{extract::Query, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::matching::ranker::{compute_matches, MatchRecord, RankerConfig};
use crate::state::AppState;

/// Résumé snippet length cap, in characters.
const SNIPPET_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
pub struct TopCandidatesQuery {
    pub jd_id: Option<String>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankedMatch {
    #[serde(flatten)]
    pub record: MatchRecord,
    pub resume_snippet: String,
}

/// GET /top_candidates?jd_id=&top_n=
/// Ranks the stored candidates against the stored jobs (optionally one job)
/// and returns the per-job top N with a capped résumé snippet. Missing data
/// files degrade to an empty result, never a server error.
pub async fn handle_top_candidates(
    State(state): State<AppState>,
    Query(params): Query<TopCandidatesQuery>,
) -> Result<Json<Vec<RankedMatch>>, AppError> {
    let candidates = state.store.candidates().unwrap_or_else(|e| {
        warn!("candidate load failed, ranking over empty set: {e:#}");
        Vec::new()
    });
    let jobs = state.store.jobs().unwrap_or_else(|e| {
        warn!("job load failed, ranking over empty set: {e:#}");
        Vec::new()
    });

    let config = RankerConfig {
        top_k: params.top_n.unwrap_or(10),
        ..RankerConfig::default()
    };
    let mut matches = compute_matches(&state.embedder, &candidates, &jobs, &config).await?;

    if let Some(jd_id) = &params.jd_id {
        matches.retain(|m| &m.jd_id == jd_id);
    }
    matches.sort_by_key(|m| m.rank);

    let out = matches
        .into_iter()
        .map(|record| {
            let resume_snippet = candidates
                .iter()
                .find(|c| c.id == record.cv_id)
                .map(|c| snippet(&c.resume_text))
                .unwrap_or_default();
            RankedMatch {
                record,
                resume_snippet,
            }
        })
        .collect();

    Ok(Json(out))
}

/// First `SNIPPET_CHARS` characters, respecting char boundaries.
fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_caps_length() {
        let long = "x".repeat(500);
        assert_eq!(snippet(&long).chars().count(), 300);
        assert_eq!(snippet("short"), "short");
    }

    #[test]
    fn test_snippet_respects_multibyte_boundaries() {
        let text = "é".repeat(400);
        let s = snippet(&text);
        assert_eq!(s.chars().count(), 300);
        assert!(s.chars().all(|c| c == 'é'));
    }
}
