use serde::{Deserialize, Serialize};

/// One feedback note tied to a candidate. The stored file may carry extra
/// columns (reviewer role, date); only these two participate in scoring,
/// and the CSV reader ignores the rest by header name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRow {
    pub candidate_id: String,
    pub feedback_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_columns_are_ignored() {
        let data = "candidate_id,reviewer_role,feedback_text,date\n\
                    c1,recruiter,Good communication,2025-08-10\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let row: FeedbackRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.candidate_id, "c1");
        assert_eq!(row.feedback_text, "Good communication");
    }
}
