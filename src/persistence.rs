//! Persistence clients
//!
//! The persistence client is the only component that talks to the remote
//! store. The board hands it a confirmed status change and interprets the
//! result; it never retries on its own.

use crate::error::PersistenceError;
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// What the remote store reports back after a successful status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedItem {
    pub id: String,
    pub status: String,
}

/// Commits status changes to the system of record
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Persist `new_status` for `item_id`
    ///
    /// # Errors
    /// Any failure, transport or application-level, is a
    /// [`PersistenceError`]; callers treat both the same way.
    async fn commit_status(
        &self,
        item_id: &str,
        new_status: &str,
    ) -> Result<UpdatedItem, PersistenceError>;
}

/// REST client: `PUT {base_url}/{resource}/{item_id}` with `{"status": ...}`
///
/// The resource path and the item id are appended as percent-encoded path
/// segments, so an id is always exactly one segment of the request path.
pub struct HttpPersistenceClient {
    client: reqwest::Client,
    base_url: Url,
    resource: Vec<String>,
    token: Option<String>,
}

#[derive(Serialize)]
struct StatusBody<'a> {
    status: &'a str,
}

impl HttpPersistenceClient {
    /// Create a client
    ///
    /// # Arguments
    /// * `base_url` - Root of the REST API (e.g., "https://api.example.com/v1")
    /// * `resource` - Collection path appended to the base URL (e.g., "tickets")
    /// * `token` - Bearer credential, if the API requires one
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    /// Fails if the base URL cannot carry a path or the underlying HTTP
    /// client cannot be built
    pub fn new(
        base_url: impl AsRef<str>,
        resource: impl AsRef<str>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PersistenceError> {
        let base_url = base_url.as_ref();
        let parsed = Url::parse(base_url)
            .map_err(|e| PersistenceError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(PersistenceError::InvalidUrl(format!(
                "{}: cannot be used as a base URL",
                base_url
            )));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: parsed,
            resource: resource
                .as_ref()
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
            token,
        })
    }

    /// URL of one item
    ///
    /// # Errors
    /// Ids that cannot be a single path segment ("", "." and "..") are refused
    pub fn item_url(&self, item_id: &str) -> Result<Url, PersistenceError> {
        if matches!(item_id, "" | "." | "..") {
            return Err(PersistenceError::InvalidUrl(format!(
                "item id '{}' cannot be used in a URL path",
                item_id
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PersistenceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&self.resource)
            .push(item_id);
        Ok(url)
    }
}

#[async_trait]
impl PersistenceClient for HttpPersistenceClient {
    async fn commit_status(
        &self,
        item_id: &str,
        new_status: &str,
    ) -> Result<UpdatedItem, PersistenceError> {
        let url = self.item_url(item_id)?;
        debug!(%url, status = new_status, "committing status");

        let mut request = self
            .client
            .put(url.clone())
            .json(&StatusBody { status: new_status });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let detail = rejection_detail(status.as_u16(), &body);
            warn!(%url, status = status.as_u16(), %detail, "status change rejected");
            return Err(PersistenceError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(parse_updated_item(&body).unwrap_or_else(|| UpdatedItem {
            id: item_id.to_string(),
            status: new_status.to_string(),
        }))
    }
}

/// Extract the human-readable `detail` of an error body
///
/// Falls back to a generic message built from the status code when the body
/// is not JSON or has no string `detail` field.
pub fn rejection_detail(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|d| d.as_str())
                .map(str::to_string)
        })
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

fn parse_updated_item(body: &str) -> Option<UpdatedItem> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

/// Confirms every change without talking to anything
///
/// Used when no remote store is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflinePersistence;

#[async_trait]
impl PersistenceClient for OfflinePersistence {
    async fn commit_status(
        &self,
        item_id: &str,
        new_status: &str,
    ) -> Result<UpdatedItem, PersistenceError> {
        debug!(item_id, status = new_status, "offline commit");
        Ok(UpdatedItem {
            id: item_id.to_string(),
            status: new_status.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_detail_prefers_body_detail() {
        assert_eq!(
            rejection_detail(500, r#"{"detail": "server error"}"#),
            "server error"
        );
    }

    #[test]
    fn test_rejection_detail_falls_back_to_status_code() {
        assert_eq!(
            rejection_detail(502, "<html>Bad Gateway</html>"),
            "Request failed with status 502"
        );
        assert_eq!(
            rejection_detail(422, r#"{"detail": {"loc": ["status"]}}"#),
            "Request failed with status 422"
        );
        assert_eq!(
            rejection_detail(400, r#"{"detail": "  "}"#),
            "Request failed with status 400"
        );
    }

    #[test]
    fn test_parse_updated_item() {
        let item = parse_updated_item(r#"{"id": "T1", "status": "done", "title": "x"}"#).unwrap();
        assert_eq!(item.status, "done");
        assert!(parse_updated_item("").is_none());
        assert!(parse_updated_item("not json").is_none());
    }

    fn client(base_url: &str, token: Option<&str>) -> HttpPersistenceClient {
        HttpPersistenceClient::new(
            base_url,
            "tickets",
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_item_url_normalizes_slashes() {
        let nested = HttpPersistenceClient::new(
            "https://api.example.com/v1/",
            "/tickets/",
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            nested.item_url("T1").unwrap().as_str(),
            "https://api.example.com/v1/tickets/T1"
        );

        let root = client("https://api.example.com", None);
        assert_eq!(
            root.item_url("T1").unwrap().as_str(),
            "https://api.example.com/tickets/T1"
        );
    }

    #[test]
    fn test_item_url_keeps_reserved_characters_in_one_segment() {
        let client = client("https://api.example.com/v1", None);
        let url = client.item_url("T/1?x=#frag").unwrap();

        assert_eq!(url.path(), "/v1/tickets/T%2F1%3Fx=%23frag");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert_eq!(url.path_segments().unwrap().count(), 3);
    }

    #[test]
    fn test_item_url_refuses_dot_segments() {
        let client = client("https://api.example.com/v1", None);
        assert!(matches!(
            client.item_url(".."),
            Err(PersistenceError::InvalidUrl(_))
        ));
        assert!(client.item_url(".").is_err());
        assert!(client.item_url("").is_err());
    }

    #[test]
    fn test_new_rejects_unusable_base_url() {
        let err = HttpPersistenceClient::new("not a url", "tickets", None, Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, PersistenceError::InvalidUrl(_)));
        assert!(
            HttpPersistenceClient::new("mailto:ops@example.com", "tickets", None, Duration::from_secs(5))
                .is_err()
        );
    }

    mod http_commit_tests {
        use super::*;
        use serde_json::json;
        use wiremock::matchers::{body_json, header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        #[tokio::test]
        async fn test_commit_sends_put_with_status_body_and_token() {
            let mock_server = MockServer::start().await;
            Mock::given(method("PUT"))
                .and(path("/v1/tickets/T1"))
                .and(header("Authorization", "Bearer secret-token"))
                .and(body_json(json!({"status": "done"})))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"id": "T1", "status": "done", "title": "Fix bug"})),
                )
                .expect(1)
                .mount(&mock_server)
                .await;

            let client = client(&format!("{}/v1", mock_server.uri()), Some("secret-token"));
            let updated = client.commit_status("T1", "done").await.unwrap();

            assert_eq!(
                updated,
                UpdatedItem {
                    id: "T1".to_string(),
                    status: "done".to_string()
                }
            );
        }

        #[tokio::test]
        async fn test_commit_encodes_item_id_as_one_segment() {
            let mock_server = MockServer::start().await;
            Mock::given(method("PUT"))
                .and(path("/tickets/T%2F1%3Fx=%23frag"))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&mock_server)
                .await;

            let client = client(&mock_server.uri(), None);
            let updated = client.commit_status("T/1?x=#frag", "done").await.unwrap();

            assert_eq!(updated.id, "T/1?x=#frag");
        }

        #[tokio::test]
        async fn test_commit_rejection_carries_detail() {
            let mock_server = MockServer::start().await;
            Mock::given(method("PUT"))
                .and(path("/tickets/T1"))
                .respond_with(
                    ResponseTemplate::new(422).set_body_json(json!({"detail": "status locked"})),
                )
                .mount(&mock_server)
                .await;

            let client = client(&mock_server.uri(), None);
            let err = client.commit_status("T1", "done").await.unwrap_err();

            assert_eq!(
                err,
                PersistenceError::Rejected {
                    status: 422,
                    detail: "status locked".to_string()
                }
            );
        }

        #[tokio::test]
        async fn test_commit_rejection_without_detail_uses_status_code() {
            let mock_server = MockServer::start().await;
            Mock::given(method("PUT"))
                .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
                .mount(&mock_server)
                .await;

            let client = client(&mock_server.uri(), None);
            let err = client.commit_status("T1", "done").await.unwrap_err();

            assert_eq!(err.detail(), "Request failed with status 500");
        }

        #[tokio::test]
        async fn test_commit_empty_success_body_echoes_request() {
            let mock_server = MockServer::start().await;
            Mock::given(method("PUT"))
                .and(path("/tickets/T7"))
                .respond_with(ResponseTemplate::new(200))
                .mount(&mock_server)
                .await;

            let client = client(&mock_server.uri(), None);
            let updated = client.commit_status("T7", "in_progress").await.unwrap();

            assert_eq!(
                updated,
                UpdatedItem {
                    id: "T7".to_string(),
                    status: "in_progress".to_string()
                }
            );
        }

        #[tokio::test]
        async fn test_commit_without_token_sends_no_authorization() {
            let mock_server = MockServer::start().await;
            Mock::given(method("PUT"))
                .respond_with(ResponseTemplate::new(204))
                .mount(&mock_server)
                .await;

            let client = client(&mock_server.uri(), None);
            client.commit_status("T1", "done").await.unwrap();

            let requests = mock_server.received_requests().await.unwrap();
            assert_eq!(requests.len(), 1);
            assert!(!requests[0].headers.contains_key("authorization"));
        }

        #[tokio::test]
        async fn test_commit_to_unreachable_server_is_transport_error() {
            let mock_server = MockServer::start().await;
            let uri = mock_server.uri();
            drop(mock_server);

            let client = client(&uri, None);
            let err = client.commit_status("T1", "done").await.unwrap_err();

            assert!(matches!(err, PersistenceError::Transport(_)));
        }
    }

    #[tokio::test]
    async fn test_offline_client_echoes_request() {
        let updated = OfflinePersistence.commit_status("T1", "done").await.unwrap();
        assert_eq!(
            updated,
            UpdatedItem {
                id: "T1".to_string(),
                status: "done".to_string()
            }
        );
    }
}
