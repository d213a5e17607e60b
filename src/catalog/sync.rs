use tracing::{error, info};

use crate::{
  api::{Subject, SubjectApi, SubjectId},
  error::CatalogError,
};

// Each call maps the transport error into its catalog variant and logs it; nothing is retried.

pub async fn fetch_subjects(api: &dyn SubjectApi) -> Result<Vec<Subject>, CatalogError> {
  match api.list_subjects().await {
    Ok(subjects) => {
      info!("Fetched {} disciplines", subjects.len());
      Ok(subjects)
    },
    Err(err) => {
      let err = CatalogError::FetchFailed(err);
      error!("{}", err);
      Err(err)
    },
  }
}

pub async fn create_subject(api: &dyn SubjectApi, name: &str) -> Result<Subject, CatalogError> {
  match api.create_subject(name).await {
    Ok(subject) => {
      info!("Created discipline {} '{}'", subject.id, subject.name);
      Ok(subject)
    },
    Err(err) => {
      let err = CatalogError::CreateFailed(err);
      error!("{}", err);
      Err(err)
    },
  }
}

pub async fn delete_subject(api: &dyn SubjectApi, id: SubjectId) -> Result<SubjectId, CatalogError> {
  match api.delete_subject(id).await {
    Ok(()) => {
      info!("Deleted discipline {}", id);
      Ok(id)
    },
    Err(err) => {
      let err = CatalogError::DeleteFailed(err);
      error!("{}", err);
      Err(err)
    },
  }
}

pub async fn search_subjects(api: &dyn SubjectApi, query: &str) -> Result<Vec<Subject>, CatalogError> {
  api.search_subjects(query).await.map_err(|err| {
    let err = CatalogError::FetchFailed(err);
    error!("{}", err);
    err
  })
}
