pub mod candidate;
pub mod feedback;
pub mod job;

pub use candidate::CandidateRow;
pub use feedback::FeedbackRow;
pub use job::JobRow;
