//! Batch ranking — pairwise job×candidate similarity over whole corpora,
//! additive skill/location boosts, and a dense per-job ranking.
//!
//! Read-only over its inputs; the embedding call happens once for the full
//! batch rather than per pair.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::embedding::{similarity, EmbeddingError, EmbeddingProvider};
use crate::models::{CandidateRow, JobRow};
use crate::scoring::engine::location_match;

#[derive(Debug, Clone)]
pub struct RankerConfig {
    /// Candidates kept per job, by raw similarity.
    pub top_k: usize,
    pub boost_skill: f64,
    pub boost_location: f64,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            boost_skill: 0.05,
            boost_location: 0.05,
        }
    }
}

/// One ranked job×candidate pair. Carries both the unboosted base score and
/// the boosted score so consumers can audit the boost contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub jd_id: String,
    pub jd_title: String,
    pub cv_id: String,
    pub cv_name: String,
    pub base_score: f64,
    pub skill_overlap: usize,
    pub location_match: bool,
    pub score: f64,
    /// Dense 1-based rank within the job, by descending boosted score.
    pub rank: u32,
}

/// Computes per-job ranked matches for the full candidate×job batch.
pub async fn compute_matches(
    embedder: &Arc<dyn EmbeddingProvider>,
    candidates: &[CandidateRow],
    jobs: &[JobRow],
    config: &RankerConfig,
) -> Result<Vec<MatchRecord>, EmbeddingError> {
    if candidates.is_empty() || jobs.is_empty() {
        return Ok(Vec::new());
    }

    let cv_texts: Vec<String> = candidates.iter().map(|c| c.resume_text.clone()).collect();
    let jd_texts: Vec<String> = jobs.iter().map(|j| j.corpus_text()).collect();
    let (emb_cv, emb_jd) = embedder.embed_corpus(&cv_texts, &jd_texts).await?;

    let mut records = Vec::new();
    for (job, job_emb) in jobs.iter().zip(&emb_jd) {
        let jd_skills: HashSet<String> = job.skill_list().into_iter().collect();

        // Raw similarity against every candidate, then keep the top K.
        // Stable sort: ties keep original candidate order.
        let mut sims: Vec<(usize, f64)> = emb_cv
            .iter()
            .map(|cv_emb| similarity(cv_emb, job_emb))
            .enumerate()
            .collect();
        sims.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        sims.truncate(config.top_k);

        let mut ranked: Vec<MatchRecord> = sims
            .into_iter()
            .map(|(cv_idx, base_score)| {
                let candidate = &candidates[cv_idx];
                let cv_skills: HashSet<String> = candidate.skill_list().into_iter().collect();
                let skill_overlap = cv_skills.intersection(&jd_skills).count();
                let loc = location_match(&candidate.location, &job.location);
                let score = (base_score
                    + config.boost_skill * skill_overlap as f64
                    + config.boost_location * f64::from(u8::from(loc)))
                .clamp(0.0, 1.0);
                MatchRecord {
                    jd_id: job.id.clone(),
                    jd_title: job.title.clone(),
                    cv_id: candidate.id.clone(),
                    cv_name: candidate.name.clone(),
                    base_score,
                    skill_overlap,
                    location_match: loc,
                    score,
                    rank: 0,
                }
            })
            .collect();

        // Boosts can reorder the top K; the published rank follows the
        // boosted score. Stable sort keeps ties in raw-similarity order.
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        for (i, record) in ranked.iter_mut().enumerate() {
            record.rank = (i + 1) as u32;
        }
        records.extend(ranked);
    }

    Ok(records)
}
