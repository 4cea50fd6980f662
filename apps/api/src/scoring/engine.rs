//! Scoring engine — fuses similarity, skill overlap, location, experience
//! and education into one bounded compatibility score, and orchestrates a
//! full candidate evaluation against a job description.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::embedding::{similarity, EmbeddingError, EmbeddingProvider};
use crate::rl::policy::DecisionSource;
use crate::rl::Action;
use crate::scoring::features::{
    clean_text, education_score, extract_skills, DEFAULT_SKILLS_POOL,
};
use crate::sentiment::{mean_sentiment, SentimentScorer};

/// Fusion weights. Similarity dominates; the rest are secondary signals.
const W_SIMILARITY: f64 = 0.6;
const W_SKILLS: f64 = 0.2;
const W_LOCATION: f64 = 0.1;
const W_EXPERIENCE: f64 = 0.1;

/// Skill overlap saturates at this count.
const SKILL_SATURATION: f64 = 5.0;

/// Months of experience treated as a full career signal.
const EXPERIENCE_CEILING_MONTHS: f64 = 120.0;

/// Continuous features feeding the fusion. `edu_score` rides along for
/// explanations and downstream consumers; the four weighted terms are
/// similarity, skills, location, and experience.
#[derive(Debug, Clone, Copy)]
pub struct Features {
    pub similarity: f64,
    pub skill_overlap: usize,
    pub location_match: bool,
    pub exp_norm: f64,
    pub edu_score: f64,
}

/// The fused compatibility score in [0,1]:
/// `0.6*sim + 0.2*min(1, overlap/5) + 0.1*loc + 0.1*exp`.
pub fn compatibility(features: &Features) -> f64 {
    let skill_term = (features.skill_overlap as f64 / SKILL_SATURATION).min(1.0);
    let score = W_SIMILARITY * features.similarity
        + W_SKILLS * skill_term
        + W_LOCATION * f64::from(u8::from(features.location_match))
        + W_EXPERIENCE * features.exp_norm;
    score.clamp(0.0, 1.0)
}

/// Experience normalization: 10 years saturates.
pub fn experience_norm(months: u32) -> f64 {
    (f64::from(months) / EXPERIENCE_CEILING_MONTHS).min(1.0)
}

/// Alignment is maximal for neutral feedback and degrades toward either
/// extreme — polarized feedback is treated as lower-confidence signal, not
/// a directional one. Computed from the RAW mean sentiment; the
/// [0,1]-normalized form is used only by the RL discretizer.
pub fn alignment(mean_sentiment: f64) -> f64 {
    (1.0 - mean_sentiment.abs()).clamp(0.0, 1.0)
}

/// Location match: case-insensitive, trimmed equality, with "remote" on
/// either side always counting as a match. Two blank locations do not
/// match.
pub fn location_match(candidate_location: &str, job_location: &str) -> bool {
    let cv = candidate_location.trim().to_lowercase();
    let jd = job_location.trim().to_lowercase();
    if cv.is_empty() || jd.is_empty() {
        return false;
    }
    cv == "remote" || jd == "remote" || cv == jd
}

/// Candidate-side metadata accompanying an evaluation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvMeta {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub experience_months: u32,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub skills: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JdMeta {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub required_skills: String,
}

/// Fully resolved inputs for one evaluation.
#[derive(Debug, Clone, Default)]
pub struct EvaluationInput {
    pub cv_text: String,
    pub jd_text: String,
    pub cv_meta: CvMeta,
    pub jd_meta: JdMeta,
    pub feedbacks: Vec<String>,
}

/// The evaluation record. Produced fresh per request, persisted as an audit
/// artifact, never mutated afterward. `action`/`decision_source` stay null
/// until the decision step fills them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub cv_id: String,
    pub cv_name: String,
    pub jd_id: String,
    pub jd_title: String,
    pub match_score: f64,
    pub similarity: f64,
    /// Raw mean feedback sentiment in [-1,1].
    pub sentiment: f64,
    pub alignment: f64,
    pub action: Option<Action>,
    pub decision_source: Option<DecisionSource>,
    pub explanation: Vec<String>,
    pub timestamp: DateTime<Utc>,
    /// Carried for the decision step, not part of the fusion output.
    #[serde(skip)]
    pub location_match: bool,
    #[serde(skip)]
    pub experience_months: u32,
}

/// Runs one full evaluation: clean, extract, embed (whole batch, the only
/// await point), fuse, and explain. An embedding failure propagates as a
/// typed error — a defaulted similarity would silently corrupt the score.
pub async fn evaluate(
    embedder: &Arc<dyn EmbeddingProvider>,
    sentiment_scorer: &Arc<dyn SentimentScorer>,
    input: &EvaluationInput,
) -> Result<Evaluation, EmbeddingError> {
    let cv_clean = clean_text(&input.cv_text);
    let jd_clean = clean_text(&input.jd_text);

    let cv_skills = extract_skills(&cv_clean, DEFAULT_SKILLS_POOL);
    let jd_skills = extract_skills(&jd_clean, DEFAULT_SKILLS_POOL);
    let skill_overlap = cv_skills.intersection(&jd_skills).count();

    let loc = location_match(&input.cv_meta.location, &input.jd_meta.location);
    let exp_months = input.cv_meta.experience_months;
    let exp_norm = experience_norm(exp_months);
    let edu = education_score(&input.cv_meta.education);

    let (emb_cv, emb_jd) = embedder
        .embed_corpus(&[cv_clean], &[jd_clean])
        .await?;
    let sim = similarity(&emb_cv[0], &emb_jd[0]);

    let features = Features {
        similarity: sim,
        skill_overlap,
        location_match: loc,
        exp_norm,
        edu_score: edu,
    };
    let match_score = compatibility(&features);

    let avg_sentiment = mean_sentiment(sentiment_scorer, &input.feedbacks);

    let explanation = vec![
        format!("similarity: {sim:.3}"),
        format!("skill_overlap: {skill_overlap}"),
        format!("experience_months: {exp_months}"),
        format!("location_match: {loc}"),
        format!("education_score: {edu:.1}"),
        format!("baseline_score: {match_score:.3}"),
    ];

    Ok(Evaluation {
        cv_id: input.cv_meta.id.clone(),
        cv_name: input.cv_meta.name.clone(),
        jd_id: input.jd_meta.id.clone(),
        jd_title: input.jd_meta.title.clone(),
        match_score,
        similarity: sim,
        sentiment: avg_sentiment,
        alignment: alignment(avg_sentiment),
        action: None,
        decision_source: None,
        explanation,
        timestamp: Utc::now(),
        location_match: loc,
        experience_months: exp_months,
    })
}
