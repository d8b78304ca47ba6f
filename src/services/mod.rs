pub mod formatter;
pub mod http_submission;
pub mod memory_submission;
pub mod presenter;
pub mod sanitizer;
pub mod submission;
pub mod validator;

pub use http_submission::HttpSubmissionService;
pub use memory_submission::MemorySubmissionService;
pub use presenter::SurveyPresenter;
pub use submission::SubmissionService;
pub use validator::Validator;
