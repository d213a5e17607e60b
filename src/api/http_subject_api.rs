use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{error, info};
use url::Url;

use crate::{
  api::types::{NewSubject, Subject, SubjectApi, SubjectId},
  error::ApiError,
};

const SUBJECTS_PATH: &str = "api/subjects/";
const TEACHER_SUBJECTS_PATH: &str = "api/teacher-subjects/";

/// Talks to the subjects collection over HTTP, attaching the bearer token to every request.
pub struct HttpSubjectApi {
  client: Client,
  base_url: Url,
  token: Option<String>,
}

impl HttpSubjectApi {
  pub fn new(base_url: &str, token: Option<String>) -> Result<HttpSubjectApi, ApiError> {
    let mut base_url = Url::parse(base_url)?;
    // Url::join drops the last segment unless the base ends with a slash
    if !base_url.path().ends_with('/') {
      let path = format!("{}/", base_url.path());
      base_url.set_path(&path);
    }
    let client = Client::builder().build()?;
    Ok(HttpSubjectApi { client, base_url, token })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
    Ok(self.base_url.join(path)?)
  }

  fn request(&self, method: Method, url: Url) -> RequestBuilder {
    let builder = self.client.request(method, url);
    match &self.token {
      Some(token) => builder.bearer_auth(token),
      None => builder,
    }
  }
}

async fn send(client: &Client, request: RequestBuilder) -> Result<Response, ApiError> {
  let request = request.build()?;
  let description = format!("{} {}", request.method(), request.url());
  info!("Sending `{}`", description);

  let response = match client.execute(request).await {
    Ok(response) => response,
    Err(err) => {
      error!("Failed to send `{}`, error: {}", description, err);
      return Err(err.into());
    },
  };

  let status = response.status();
  if !status.is_success() {
    let body = response.text().await.unwrap_or_default();
    error!("`{}` returned {}: {}", description, status, body);
    return Err(ApiError::Status { status, body });
  }
  info!("`{}` returned {}", description, status);
  Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
  let bytes = response.bytes().await?;
  Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl SubjectApi for HttpSubjectApi {
  async fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
    let url = self.endpoint(SUBJECTS_PATH)?;
    let response = send(&self.client, self.request(Method::GET, url)).await?;
    read_json(response).await
  }

  async fn create_subject(&self, name: &str) -> Result<Subject, ApiError> {
    let url = self.endpoint(SUBJECTS_PATH)?;
    let response = send(&self.client, self.request(Method::POST, url).json(&NewSubject { name })).await?;
    read_json(response).await
  }

  async fn delete_subject(&self, id: SubjectId) -> Result<(), ApiError> {
    let url = self.endpoint(&format!("{SUBJECTS_PATH}{id}/"))?;
    send(&self.client, self.request(Method::DELETE, url)).await?;
    Ok(())
  }

  async fn search_subjects(&self, query: &str) -> Result<Vec<Subject>, ApiError> {
    let url = self.endpoint(TEACHER_SUBJECTS_PATH)?;
    let response = send(&self.client, self.request(Method::GET, url).query(&[("search", query)])).await?;
    read_json(response).await
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use reqwest::StatusCode;
  use serde_json::json;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
  };

  use super::*;

  fn api_for(server: &MockServer, token: Option<&str>) -> HttpSubjectApi {
    HttpSubjectApi::new(&server.uri(), token.map(String::from)).unwrap()
  }

  #[test]
  fn test_base_url_gets_trailing_slash() {
    let api = HttpSubjectApi::new("http://localhost:8000/school", None).unwrap();

    assert_eq!(api.base_url().as_str(), "http://localhost:8000/school/");
    assert_eq!(api.endpoint(SUBJECTS_PATH).unwrap().as_str(), "http://localhost:8000/school/api/subjects/");
  }

  #[test]
  fn test_invalid_base_url() {
    let result = HttpSubjectApi::new("not a url", None);

    assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
  }

  #[tokio::test]
  async fn test_list_subjects_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/subjects/"))
      .and(header("Authorization", "Bearer secret"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        {"id": 1, "name": "Algebra", "teacher_id": 3},
        {"id": 2, "name": "Biology"}
      ])))
      .expect(1)
      .mount(&server)
      .await;

    let subjects = api_for(&server, Some("secret")).list_subjects().await.unwrap();

    assert_eq!(subjects, vec![
      Subject { id: SubjectId(1), name: "Algebra".to_string(), teacher_id: Some(3) },
      Subject::new(2, "Biology"),
    ]);
  }

  #[tokio::test]
  async fn test_requests_without_token_have_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/subjects/"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
      .mount(&server)
      .await;

    api_for(&server, None).list_subjects().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
  }

  #[tokio::test]
  async fn test_create_subject_posts_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/api/subjects/"))
      .and(header("Authorization", "Bearer secret"))
      .and(header("Content-Type", "application/json"))
      .and(body_json(json!({"name": "Chemistry"})))
      .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7, "name": "Chemistry"})))
      .expect(1)
      .mount(&server)
      .await;

    let created = api_for(&server, Some("secret")).create_subject("Chemistry").await.unwrap();

    assert_eq!(created, Subject::new(7, "Chemistry"));
  }

  #[tokio::test]
  async fn test_delete_subject_uses_id_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
      .and(path("/api/subjects/2/"))
      .and(header("Authorization", "Bearer secret"))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&server)
      .await;

    api_for(&server, Some("secret")).delete_subject(SubjectId(2)).await.unwrap();
  }

  #[tokio::test]
  async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
      .and(path("/api/subjects/5/"))
      .respond_with(ResponseTemplate::new(404).set_body_string("Not found."))
      .mount(&server)
      .await;

    let result = api_for(&server, Some("secret")).delete_subject(SubjectId(5)).await;

    match result {
      Err(ApiError::Status { status, body }) => {
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found.");
      },
      other => panic!("expected a status error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/subjects/"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
      .mount(&server)
      .await;

    let result = api_for(&server, None).list_subjects().await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
  }

  #[tokio::test]
  async fn test_search_subjects_passes_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/teacher-subjects/"))
      .and(query_param("search", "bio"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2, "name": "Biology"}])))
      .expect(1)
      .mount(&server)
      .await;

    let found = api_for(&server, Some("secret")).search_subjects("bio").await.unwrap();

    assert_eq!(found, vec![Subject::new(2, "Biology")]);
  }
}
