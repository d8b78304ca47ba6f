pub mod outcome;
pub mod survey_flow;

pub use outcome::{AdvanceOutcome, SubmitOutcome};
pub use survey_flow::SurveyFlow;
