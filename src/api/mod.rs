pub mod http_subject_api;
#[cfg(test)]
pub mod mock_subject_api;
pub mod types;

pub use http_subject_api::HttpSubjectApi;
pub use types::{Subject, SubjectApi, SubjectId};

pub use crate::error::ApiError;
