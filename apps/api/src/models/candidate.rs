use serde::{Deserialize, Deserializer, Serialize};

use crate::scoring::features::parse_experience_months;

/// One candidate record as stored in `sample_cvs.csv`. Immutable once loaded
/// for a scoring request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRow {
    pub id: String,
    pub name: String,
    pub location: String,
    /// Comma-separated skill list, compared case-insensitively and trimmed.
    pub skills: String,
    /// Whole months. Non-numeric source values coerce to 0 on read.
    #[serde(deserialize_with = "lenient_months")]
    pub experience_months: u32,
    pub education: String,
    pub resume_text: String,
}

impl CandidateRow {
    /// Skills as a normalized set-friendly list: trimmed, lowered, empties
    /// dropped.
    pub fn skill_list(&self) -> Vec<String> {
        split_skills(&self.skills)
    }
}

/// Splits a comma-separated skill field into trimmed, lowercased tokens.
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn lenient_months<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_experience_months(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_skills_trims_and_lowercases() {
        assert_eq!(
            split_skills(" Python , SQL ,aws"),
            vec!["python", "sql", "aws"]
        );
    }

    #[test]
    fn test_split_skills_drops_empties() {
        assert_eq!(split_skills("python,,sql,"), vec!["python", "sql"]);
        assert!(split_skills("").is_empty());
    }

    #[test]
    fn test_csv_row_with_malformed_experience_reads_as_zero() {
        let data = "id,name,location,skills,experience_months,education,resume_text\n\
                    c1,Ada,Remote,\"python,sql\",lots,B.Tech,Builds things\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let row: CandidateRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.experience_months, 0);
        assert_eq!(row.skill_list(), vec!["python", "sql"]);
    }

    #[test]
    fn test_csv_row_parses_numeric_experience() {
        let data = "id,name,location,skills,experience_months,education,resume_text\n\
                    c1,Ada,Remote,python,48,B.Tech,Builds things\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let row: CandidateRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.experience_months, 48);
    }
}
