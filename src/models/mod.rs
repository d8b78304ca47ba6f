pub mod field;
pub mod pages;
pub mod record;
pub mod session;

pub use field::{FieldError, FieldValidation, FieldValue, FormValidation, PageData};
pub use pages::{page_spec, PageSpec, TOTAL_PAGES};
pub use record::{Feedback, SubmissionRecord};
pub use session::{SurveyPhase, SurveySession};
