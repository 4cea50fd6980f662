//! Evaluation and decision endpoints. Both accept the same body: raw texts,
//! record ids (resolved against storage), or a mix. Absent records degrade
//! to whatever was supplied directly — never a failure.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::rl::state::{discretize, RlFeatures};
use crate::rl::Action;
use crate::scoring::engine::{self, CvMeta, Evaluation, EvaluationInput, JdMeta};
use crate::state::AppState;
use crate::store::write_audit_artifact;

#[derive(Debug, Default, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default, alias = "candidate_id")]
    pub cv_id: Option<String>,
    #[serde(default, alias = "job_id")]
    pub jd_id: Option<String>,
    #[serde(default)]
    pub cv_text: Option<String>,
    #[serde(default)]
    pub jd_text: Option<String>,
    #[serde(default)]
    pub cv_meta: Option<CvMeta>,
    #[serde(default)]
    pub jd_meta: Option<JdMeta>,
    #[serde(default)]
    pub feedbacks: Option<Vec<String>>,
    /// Previous action taken for this candidate, if any. Unknown names fall
    /// back to the REJECT default inside the discretizer.
    #[serde(default)]
    pub prev_action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecideResponse {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub rl_action: Action,
}

/// POST /evaluate
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<Evaluation>, AppError> {
    let input = resolve(&state, &req);
    let evaluation = engine::evaluate(&state.embedder, &state.sentiment, &input).await?;
    audit(&state, &evaluation);
    Ok(Json(evaluation))
}

/// POST /decide
/// Evaluates, then consults the decision policy; the action and its source
/// are attached to the returned record.
pub async fn handle_decide(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<DecideResponse>, AppError> {
    let input = resolve(&state, &req);
    let mut evaluation = engine::evaluate(&state.embedder, &state.sentiment, &input).await?;

    let rl_state = discretize(&RlFeatures {
        match_score: evaluation.match_score,
        sentiment: evaluation.sentiment,
        experience_months: evaluation.experience_months,
        location_match: evaluation.location_match,
        prev_action: req.prev_action.as_deref().and_then(Action::from_name),
    });
    let decision = state
        .policy
        .decide(&rl_state, evaluation.match_score, evaluation.location_match);

    evaluation.action = Some(decision.action);
    evaluation.decision_source = Some(decision.source);
    audit(&state, &evaluation);

    Ok(Json(DecideResponse {
        evaluation,
        rl_action: decision.action,
    }))
}

/// Fills in texts, metadata and feedback from storage where ids were given
/// and the caller did not supply the values directly. Stored fields win
/// over caller-supplied metadata for the same record; a missing record
/// leaves the supplied values untouched.
fn resolve(state: &AppState, req: &EvaluateRequest) -> EvaluationInput {
    let mut cv_text = req.cv_text.clone().unwrap_or_default();
    let mut jd_text = req.jd_text.clone().unwrap_or_default();
    let mut cv_meta = req.cv_meta.clone().unwrap_or_default();
    let mut jd_meta = req.jd_meta.clone().unwrap_or_default();
    let mut feedbacks = req.feedbacks.clone().unwrap_or_default();

    if let Some(cv_id) = &req.cv_id {
        if let Some(row) = state.store.candidate_by_id(cv_id) {
            if cv_text.is_empty() {
                cv_text = row.resume_text.clone();
            }
            cv_meta = CvMeta {
                id: row.id,
                name: row.name,
                location: row.location,
                experience_months: row.experience_months,
                education: row.education,
                skills: row.skills,
            };
        } else if cv_meta.id.is_empty() {
            cv_meta.id = cv_id.clone();
        }
        if feedbacks.is_empty() {
            feedbacks = state.store.feedbacks_for(cv_id);
        }
    }

    if let Some(jd_id) = &req.jd_id {
        if let Some(row) = state.store.job_by_id(jd_id) {
            if jd_text.is_empty() {
                jd_text = row.corpus_text();
            }
            jd_meta = JdMeta {
                id: row.id,
                title: row.title,
                location: row.location,
                required_skills: row.required_skills,
            };
        } else if jd_meta.id.is_empty() {
            jd_meta.id = jd_id.clone();
        }
    }

    EvaluationInput {
        cv_text,
        jd_text,
        cv_meta,
        jd_meta,
        feedbacks,
    }
}

fn audit(state: &AppState, evaluation: &Evaluation) {
    let name = format!("run_{}.json", evaluation.timestamp.format("%Y%m%d_%H%M%S%3f"));
    write_audit_artifact(&state.config.outputs_dir, &name, evaluation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::embedding::{EmbeddingProvider, HashingEmbedder};
    use crate::rl::policy::PolicyService;
    use crate::sentiment::{LexiconSentiment, SentimentScorer};
    use crate::store::CsvStore;
    use std::path::Path;
    use std::sync::Arc;

    fn seed_data(dir: &Path) {
        std::fs::write(
            dir.join("sample_cvs.csv"),
            "id,name,location,skills,experience_months,education,resume_text\n\
             c1,Ada,Remote,\"python,sql\",48,B.Tech,Ada builds python sql pipelines\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("sample_jds.csv"),
            "id,title,location,required_skills,description\n\
             JD_1,Data Engineer,Pune,\"python,aws\",Python and aws pipeline work\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("sample_feedbacks.csv"),
            "candidate_id,reviewer_role,feedback_text,date\n\
             c1,recruiter,Good communication,2025-08-10\n",
        )
        .unwrap();
    }

    fn app_state(dir: &Path) -> AppState {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder);
        let sentiment: Arc<dyn SentimentScorer> = Arc::new(LexiconSentiment);
        AppState {
            store: CsvStore::new(dir),
            embedder,
            sentiment,
            policy: Arc::new(PolicyService::new(None)),
            config: Config {
                port: 0,
                rust_log: "info".to_string(),
                data_dir: dir.to_path_buf(),
                q_table_path: dir.join("q_table.json"),
                outputs_dir: dir.join("outputs"),
                embedding_endpoint: None,
                embedding_timeout_secs: 5,
            },
        }
    }

    #[test]
    fn test_resolve_fills_from_store_by_id() {
        let dir = tempfile::tempdir().unwrap();
        seed_data(dir.path());
        let state = app_state(dir.path());

        let req = EvaluateRequest {
            cv_id: Some("c1".to_string()),
            jd_id: Some("JD_1".to_string()),
            ..EvaluateRequest::default()
        };
        let input = resolve(&state, &req);
        assert_eq!(input.cv_meta.name, "Ada");
        assert_eq!(input.cv_meta.experience_months, 48);
        assert!(input.cv_text.contains("pipelines"));
        assert_eq!(input.jd_meta.title, "Data Engineer");
        assert!(input.jd_text.contains("aws"));
        assert_eq!(input.feedbacks, vec!["Good communication".to_string()]);
    }

    #[test]
    fn test_resolve_supplied_text_wins_over_stored() {
        let dir = tempfile::tempdir().unwrap();
        seed_data(dir.path());
        let state = app_state(dir.path());

        let req = EvaluateRequest {
            cv_id: Some("c1".to_string()),
            cv_text: Some("custom resume text".to_string()),
            ..EvaluateRequest::default()
        };
        let input = resolve(&state, &req);
        assert_eq!(input.cv_text, "custom resume text");
        // Metadata still comes from the stored record.
        assert_eq!(input.cv_meta.name, "Ada");
    }

    #[test]
    fn test_resolve_unknown_id_degrades_to_supplied_values() {
        let dir = tempfile::tempdir().unwrap();
        seed_data(dir.path());
        let state = app_state(dir.path());

        let req = EvaluateRequest {
            cv_id: Some("ghost".to_string()),
            cv_text: Some("some resume".to_string()),
            ..EvaluateRequest::default()
        };
        let input = resolve(&state, &req);
        assert_eq!(input.cv_text, "some resume");
        assert_eq!(input.cv_meta.id, "ghost");
        assert!(input.feedbacks.is_empty());
    }

    #[tokio::test]
    async fn test_handle_evaluate_leaves_action_null() {
        let dir = tempfile::tempdir().unwrap();
        seed_data(dir.path());
        let state = app_state(dir.path());

        let req = EvaluateRequest {
            cv_id: Some("c1".to_string()),
            jd_id: Some("JD_1".to_string()),
            ..EvaluateRequest::default()
        };
        let Json(evaluation) = handle_evaluate(State(state), Json(req)).await.unwrap();
        assert!(evaluation.action.is_none());
        assert!(evaluation.decision_source.is_none());
        assert_eq!(evaluation.cv_id, "c1");
        assert_eq!(evaluation.jd_title, "Data Engineer");
    }

    #[tokio::test]
    async fn test_handle_decide_reports_fallback_without_table() {
        let dir = tempfile::tempdir().unwrap();
        seed_data(dir.path());
        let state = app_state(dir.path());

        let req = EvaluateRequest {
            cv_id: Some("c1".to_string()),
            jd_id: Some("JD_1".to_string()),
            ..EvaluateRequest::default()
        };
        let Json(response) = handle_decide(State(state), Json(req)).await.unwrap();
        assert_eq!(response.evaluation.action, Some(response.rl_action));
        assert_eq!(
            response.evaluation.decision_source,
            Some(crate::rl::policy::DecisionSource::RuleFallback)
        );
    }

    #[tokio::test]
    async fn test_handle_decide_uses_table_when_present() {
        let dir = tempfile::tempdir().unwrap();
        seed_data(dir.path());
        let state = app_state(dir.path());
        state.policy.swap(crate::rl::qtable::QTable::new());

        let req = EvaluateRequest {
            cv_id: Some("c1".to_string()),
            jd_id: Some("JD_1".to_string()),
            ..EvaluateRequest::default()
        };
        let Json(response) = handle_decide(State(state), Json(req)).await.unwrap();
        assert_eq!(
            response.evaluation.decision_source,
            Some(crate::rl::policy::DecisionSource::Rl)
        );
    }

    #[tokio::test]
    async fn test_evaluate_writes_audit_artifact() {
        let dir = tempfile::tempdir().unwrap();
        seed_data(dir.path());
        let state = app_state(dir.path());
        let outputs = state.config.outputs_dir.clone();

        let req = EvaluateRequest {
            cv_text: Some("python work".to_string()),
            jd_text: Some("python role".to_string()),
            ..EvaluateRequest::default()
        };
        handle_evaluate(State(state), Json(req)).await.unwrap();
        let entries: Vec<_> = std::fs::read_dir(&outputs).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
