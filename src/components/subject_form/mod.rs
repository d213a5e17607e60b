mod form;
mod instruction_footer;
mod subject_input;

pub use form::SubjectForm;
pub use instruction_footer::InstructionFooter;
pub use subject_input::SubjectInput;
