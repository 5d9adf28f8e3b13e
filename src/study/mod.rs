pub mod catalog;
pub mod prompts;

pub use catalog::{Domain, StudyMode, AWS_SERVICES, EXAM_NAME};
pub use prompts::StudySelection;
