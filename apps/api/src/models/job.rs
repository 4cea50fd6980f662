use serde::{Deserialize, Serialize};

use super::candidate::split_skills;

/// One job record as stored in `sample_jds.csv`. Immutable per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRow {
    pub id: String,
    pub title: String,
    pub location: String,
    pub required_skills: String,
    pub description: String,
}

impl JobRow {
    pub fn skill_list(&self) -> Vec<String> {
        split_skills(&self.required_skills)
    }

    /// The text a job contributes to the embedding corpus: description plus
    /// required skills, matching how evaluations assemble JD text from ids.
    pub fn corpus_text(&self) -> String {
        format!("{} {}", self.description, self.required_skills)
    }
}
