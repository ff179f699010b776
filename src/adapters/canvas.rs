use crate::domain::model::{CanvasUser, Course, Group, GroupCategory, Membership};
use crate::domain::ports::CanvasApi;
use crate::utils::error::{GroupsError, Result};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, LINK, WWW_AUTHENTICATE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

const USERS_PER_PAGE: &str = "100";

/// HTTP client for the Canvas REST API (v1).
#[derive(Debug, Clone)]
pub struct CanvasClient {
    client: Client,
    api_root: String,
}

impl CanvasClient {
    /// Builds a client for the Canvas instance at `base_url`, sending `token`
    /// as a bearer token on every request.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        crate::utils::validation::validate_url("url", base_url)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim())).map_err(|_| {
            GroupsError::ConfigError {
                message: "Canvas token contains characters not allowed in an HTTP header"
                    .to_string(),
            }
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GroupsError::HttpError {
                operation: "build the HTTP client".to_string(),
                source: e,
            })?;

        Ok(Self {
            client,
            api_root: format!("{}/api/v1", base_url.trim_end_matches('/')),
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path)
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| GroupsError::HttpError {
            operation: operation.to_string(),
            source: e,
        })?;

        let status = response.status();
        tracing::debug!("{} -> {}", operation, status);

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::NOT_FOUND => Err(GroupsError::ResourceNotFound {
                operation: operation.to_string(),
            }),
            StatusCode::UNAUTHORIZED => {
                let challenged = response.headers().contains_key(WWW_AUTHENTICATE);
                let body = response.text().await.unwrap_or_default();
                if is_token_rejection(challenged, &body) {
                    Err(GroupsError::InvalidAccessToken {
                        operation: operation.to_string(),
                    })
                } else {
                    Err(GroupsError::RemoteError {
                        operation: operation.to_string(),
                        status: status.as_u16(),
                        body,
                    })
                }
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(GroupsError::RemoteError {
                    operation: operation.to_string(),
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response, operation: &str) -> Result<T> {
        let body = response.text().await.map_err(|e| GroupsError::HttpError {
            operation: operation.to_string(),
            source: e,
        })?;
        serde_json::from_str(&body).map_err(|e| GroupsError::SerializationError {
            operation: operation.to_string(),
            source: e,
        })
    }
}

/// Canvas answers 401 both for a bad token and for a valid token without
/// permission. Only the former carries a `WWW-Authenticate` challenge or the
/// "Invalid access token" message.
fn is_token_rejection(challenged: bool, body: &str) -> bool {
    challenged || body.to_ascii_lowercase().contains("invalid access token")
}

/// Extracts the `rel="next"` target from a Canvas `Link` header.
pub fn next_page_url(link_header: &str) -> Option<String> {
    static NEXT: OnceLock<Regex> = OnceLock::new();
    let re = NEXT.get_or_init(|| {
        Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).expect("next-link pattern is valid")
    });

    link_header
        .split(',')
        .find_map(|part| re.captures(part).map(|caps| caps[1].to_string()))
}

#[async_trait::async_trait]
impl CanvasApi for CanvasClient {
    async fn get_course(&self, course_id: u64) -> Result<Course> {
        let operation = format!("get course {}", course_id);
        let request = self.client.get(self.endpoint(&format!("courses/{}", course_id)));
        let response = self.send(request, &operation).await?;
        Self::parse(response, &operation).await
    }

    async fn create_group_category(&self, course_id: u64, name: &str) -> Result<GroupCategory> {
        let operation = format!("create group set '{}' in course {}", name, course_id);
        let request = self
            .client
            .post(self.endpoint(&format!("courses/{}/group_categories", course_id)))
            .json(&serde_json::json!({ "name": name }));
        let response = self.send(request, &operation).await?;
        Self::parse(response, &operation).await
    }

    async fn create_group(&self, category: &GroupCategory, name: &str) -> Result<Group> {
        let operation = format!("create group '{}' in group set '{}'", name, category.name);
        let request = self
            .client
            .post(self.endpoint(&format!("group_categories/{}/groups", category.id)))
            .json(&serde_json::json!({ "name": name }));
        let response = self.send(request, &operation).await?;
        Self::parse(response, &operation).await
    }

    async fn list_course_users(&self, course_id: u64) -> Result<Vec<CanvasUser>> {
        let operation = format!("list users of course {}", course_id);
        let mut users = Vec::new();
        let mut request = self
            .client
            .get(self.endpoint(&format!("courses/{}/users", course_id)))
            .query(&[("per_page", USERS_PER_PAGE)]);
        let mut page = 1;

        loop {
            let response = self.send(request, &operation).await?;
            let next = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_page_url);

            let batch: Vec<CanvasUser> = Self::parse(response, &operation).await?;
            tracing::debug!("Fetched {} users on page {}", batch.len(), page);
            users.extend(batch);

            match next {
                Some(url) => {
                    request = self.client.get(url);
                    page += 1;
                }
                None => break,
            }
        }

        Ok(users)
    }

    async fn create_membership(&self, group: &Group, user_id: u64) -> Result<Membership> {
        let operation = format!("add user {} to group '{}'", user_id, group.name);
        let request = self
            .client
            .post(self.endpoint(&format!("groups/{}/memberships", group.id)))
            .json(&serde_json::json!({ "user_id": user_id }));
        let response = self.send(request, &operation).await?;
        Self::parse(response, &operation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_next_page_url() {
        let header = r#"<https://canvas.test/api/v1/courses/1/users?page=1>; rel="current",<https://canvas.test/api/v1/courses/1/users?page=2>; rel="next",<https://canvas.test/api/v1/courses/1/users?page=1>; rel="first""#;
        assert_eq!(
            next_page_url(header).as_deref(),
            Some("https://canvas.test/api/v1/courses/1/users?page=2")
        );
        assert_eq!(
            next_page_url(r#"<https://canvas.test/x?page=1>; rel="first""#),
            None
        );
    }

    #[test]
    fn test_api_root_strips_trailing_slash() {
        let client = CanvasClient::new("https://canvas.ubc.ca/", "abc").unwrap();
        assert_eq!(client.api_root(), "https://canvas.ubc.ca/api/v1");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(CanvasClient::new("canvas.ubc.ca", "abc").is_err());
    }

    #[tokio::test]
    async fn test_get_course_sends_bearer_token() {
        let server = MockServer::start_async().await;
        let course_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/courses/42")
                    .header("Authorization", "Bearer secret");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({"id": 42, "name": "Intro to Data"}));
            })
            .await;

        let client = CanvasClient::new(&server.base_url(), "secret").unwrap();
        let course = client.get_course(42).await.unwrap();

        course_mock.assert_async().await;
        assert_eq!(course.id, 42);
        assert_eq!(course.name.as_deref(), Some("Intro to Data"));
    }

    #[tokio::test]
    async fn test_status_codes_map_to_error_kinds() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/courses/1");
                then.status(401)
                    .header("WWW-Authenticate", "Bearer realm=\"canvas-lms\"")
                    .json_body(serde_json::json!({"errors": [{"message": "Invalid access token."}]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/courses/2");
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/courses/3");
                then.status(500).body("internal");
            })
            .await;

        let client = CanvasClient::new(&server.base_url(), "t").unwrap();

        assert!(matches!(
            client.get_course(1).await,
            Err(GroupsError::InvalidAccessToken { .. })
        ));
        assert!(matches!(
            client.get_course(2).await,
            Err(GroupsError::ResourceNotFound { .. })
        ));
        match client.get_course(3).await {
            Err(GroupsError::RemoteError { status, body, .. }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal");
            }
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_without_challenge_keeps_server_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/courses/1/group_categories");
                then.status(401).json_body(serde_json::json!({
                    "status": "unauthorized",
                    "errors": [{"message": "user not authorized to perform that action"}]
                }));
            })
            .await;

        let client = CanvasClient::new(&server.base_url(), "t").unwrap();
        let err = client.create_group_category(1, "Lab").await.unwrap_err();

        match &err {
            GroupsError::RemoteError { status, body, .. } => {
                assert_eq!(*status, 401);
                assert!(body.contains("user not authorized"));
            }
            other => panic!("expected remote error, got {:?}", other),
        }
        assert!(err.recovery_suggestion().contains("permission"));
    }

    #[tokio::test]
    async fn test_unauthorized_invalid_token_message_without_header() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/courses/1");
                then.status(401).json_body(serde_json::json!({
                    "errors": [{"message": "Invalid access token."}]
                }));
            })
            .await;

        let client = CanvasClient::new(&server.base_url(), "t").unwrap();

        assert!(matches!(
            client.get_course(1).await,
            Err(GroupsError::InvalidAccessToken { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_json_is_serialization_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/courses/1");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let client = CanvasClient::new(&server.base_url(), "t").unwrap();

        match client.get_course(1).await {
            Err(GroupsError::SerializationError { operation, .. }) => {
                assert_eq!(operation, "get course 1");
            }
            other => panic!("expected serialization error, got {:?}", other),
        }
    }

    #[test]
    fn test_is_token_rejection() {
        assert!(is_token_rejection(true, ""));
        assert!(is_token_rejection(false, r#"{"errors":[{"message":"Invalid access token."}]}"#));
        assert!(!is_token_rejection(
            false,
            r#"{"errors":[{"message":"user not authorized to perform that action"}]}"#
        ));
    }

    #[tokio::test]
    async fn test_list_course_users_follows_next_links() {
        let server = MockServer::start_async().await;
        let next = server.url("/api/v1/courses/7/users/page-2");

        let first_page = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/courses/7/users")
                    .query_param("per_page", "100");
                then.status(200)
                    .header("Link", format!("<{}>; rel=\"next\"", next))
                    .json_body(serde_json::json!([
                        {"id": 100, "sis_user_id": "S1", "name": "Ada"},
                        {"id": 101, "sis_user_id": null, "name": "Test Student"}
                    ]));
            })
            .await;
        let second_page = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/courses/7/users/page-2");
                then.status(200)
                    .json_body(serde_json::json!([{"id": 300, "sis_user_id": "S3"}]));
            })
            .await;

        let client = CanvasClient::new(&server.base_url(), "t").unwrap();
        let users = client.list_course_users(7).await.unwrap();

        first_page.assert_async().await;
        second_page.assert_async().await;
        let ids: Vec<u64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![100, 101, 300]);
    }

    #[tokio::test]
    async fn test_create_membership_posts_user_id() {
        let server = MockServer::start_async().await;
        let membership_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/groups/55/memberships")
                    .json_body(serde_json::json!({"user_id": 100}));
                then.status(200)
                    .json_body(serde_json::json!({"id": 9, "group_id": 55, "user_id": 100}));
            })
            .await;

        let client = CanvasClient::new(&server.base_url(), "t").unwrap();
        let group = Group {
            id: 55,
            name: "Group 1".to_string(),
        };
        let membership = client.create_membership(&group, 100).await.unwrap();

        membership_mock.assert_async().await;
        assert_eq!(membership.user_id, 100);
        assert_eq!(membership.group_id, 55);
    }
}
