use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Server assigned identifier of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub i64);

impl fmt::Display for SubjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub id: SubjectId,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub teacher_id: Option<i64>,
}

impl Subject {
  pub fn new(id: i64, name: impl Into<String>) -> Self {
    Subject { id: SubjectId(id), name: name.into(), teacher_id: None }
  }

  /// Case-insensitive comparison used for duplicate detection and delete resolution.
  pub fn has_name(&self, name: &str) -> bool {
    self.name.to_lowercase() == name.to_lowercase()
  }
}

#[derive(Debug, Serialize)]
pub struct NewSubject<'a> {
  pub name: &'a str,
}

#[async_trait]
pub trait SubjectApi: Send + Sync {
  async fn list_subjects(&self) -> Result<Vec<Subject>, ApiError>;
  async fn create_subject(&self, name: &str) -> Result<Subject, ApiError>;
  async fn delete_subject(&self, id: SubjectId) -> Result<(), ApiError>;
  /// Server side name search over the teacher's subjects.
  async fn search_subjects(&self, query: &str) -> Result<Vec<Subject>, ApiError>;
}
