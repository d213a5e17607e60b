use std::sync::{
  Mutex,
  atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{Subject, SubjectApi, SubjectId};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
  List,
  Create(String),
  Delete(SubjectId),
  Search(String),
}

/// In-memory subjects endpoint that records every call it receives.
#[derive(Debug, Default)]
pub struct MockSubjectApi {
  subjects: Mutex<Vec<Subject>>,
  calls: Mutex<Vec<ApiCall>>,
  failing: AtomicBool,
}

impl MockSubjectApi {
  pub fn with_subjects(subjects: Vec<Subject>) -> Self {
    MockSubjectApi { subjects: Mutex::new(subjects), ..Default::default() }
  }

  /// While set, every call is recorded and then answered with a 500.
  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  pub fn set_subjects(&self, subjects: Vec<Subject>) {
    *self.subjects.lock().unwrap() = subjects;
  }

  pub fn calls(&self) -> Vec<ApiCall> {
    self.calls.lock().unwrap().clone()
  }

  fn record(&self, call: ApiCall) -> Result<(), ApiError> {
    self.calls.lock().unwrap().push(call);
    if self.failing.load(Ordering::SeqCst) {
      return Err(ApiError::Status { status: StatusCode::INTERNAL_SERVER_ERROR, body: "mock failure".to_string() });
    }
    Ok(())
  }
}

#[async_trait]
impl SubjectApi for MockSubjectApi {
  async fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
    self.record(ApiCall::List)?;
    Ok(self.subjects.lock().unwrap().clone())
  }

  async fn create_subject(&self, name: &str) -> Result<Subject, ApiError> {
    self.record(ApiCall::Create(name.to_string()))?;
    let mut subjects = self.subjects.lock().unwrap();
    let next_id = subjects.iter().map(|s| s.id.0).max().unwrap_or(0) + 1;
    let created = Subject::new(next_id, name);
    subjects.push(created.clone());
    Ok(created)
  }

  async fn delete_subject(&self, id: SubjectId) -> Result<(), ApiError> {
    self.record(ApiCall::Delete(id))?;
    let mut subjects = self.subjects.lock().unwrap();
    match subjects.iter().position(|s| s.id == id) {
      Some(index) => {
        subjects.remove(index);
        Ok(())
      },
      None => Err(ApiError::Status { status: StatusCode::NOT_FOUND, body: "Not found.".to_string() }),
    }
  }

  async fn search_subjects(&self, query: &str) -> Result<Vec<Subject>, ApiError> {
    self.record(ApiCall::Search(query.to_string()))?;
    let query = query.to_lowercase();
    Ok(self.subjects.lock().unwrap().iter().filter(|s| s.name.to_lowercase().contains(&query)).cloned().collect())
  }
}
