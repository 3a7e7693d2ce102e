use crate::config::Config;
use crate::directus::filter;
use crate::directus::StaffDirectory;
use crate::error::BackendError;
use crate::models::Employee;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Longest error body kept in a `BackendError::Status`
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Directus list endpoint envelope
#[derive(Debug, Deserialize)]
struct ItemsResponse<T> {
    data: Vec<T>,
}

/// HTTP client for the Directus REST API
pub struct DirectusClient {
    client: Client,
    base_url: String,
    collection: String,
    fields: String,
}

impl DirectusClient {
    pub fn new(
        base_url: &str,
        token: &str,
        collection: &str,
        fields: &str,
        timeout: Duration,
    ) -> Result<Self, String> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| format!("Invalid Directus token format: {}", e))?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            fields: fields.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, String> {
        Self::new(
            &config.directus_url,
            &config.directus_token,
            &config.staff_collection,
            &config.staff_fields,
            config.request_timeout,
        )
    }

    /// First published staff record matching `filter`
    async fn find_first_employee(&self, filter: &Value) -> Result<Option<Employee>, BackendError> {
        let url = format!("{}/items/{}", self.base_url, self.collection);
        let filter = filter.to_string();

        log::debug!("[DIRECTUS] GET {} filter={}", url, filter);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("fields", self.fields.as_str()),
                ("filter", filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(BackendError::Unauthorized),
            StatusCode::FORBIDDEN => return Err(BackendError::Forbidden),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(BackendError::Status {
                    status: status.as_u16(),
                    body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                });
            }
            _ => {}
        }

        let body = response.text().await?;
        let items: ItemsResponse<Employee> =
            serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))?;

        Ok(items.data.into_iter().next())
    }
}

#[async_trait]
impl StaffDirectory for DirectusClient {
    async fn resolve_employee(
        &self,
        external_id: i64,
        username: Option<&str>,
    ) -> Result<Option<Employee>, BackendError> {
        if let Some(employee) = self
            .find_first_employee(&filter::by_telegram_id(external_id))
            .await?
        {
            log::debug!("[DIRECTUS] Resolved telegram id {} by id", external_id);
            return Ok(Some(employee));
        }

        let Some(username) = username.filter(|u| !u.trim().trim_start_matches('@').is_empty())
        else {
            return Ok(None);
        };

        let employee = self
            .find_first_employee(&filter::by_telegram_name(username))
            .await?;
        if employee.is_some() {
            log::debug!(
                "[DIRECTUS] Resolved telegram id {} by username {}",
                external_id,
                filter::normalize_username(username)
            );
        }
        Ok(employee)
    }

    async fn check_connectivity(&self) -> bool {
        let url = format!("{}/server/ping", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                log::error!("[DIRECTUS] Ping returned HTTP {}", response.status());
                false
            }
            Err(e) => {
                log::error!("[DIRECTUS] Ping failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const TOKEN: &str = "test-token";

    fn client_for(server: &MockServer, timeout: Duration) -> DirectusClient {
        DirectusClient::new(&server.uri(), TOKEN, "staff", "*,keys.*.*", timeout).unwrap()
    }

    fn filter_of(request: &Request) -> Value {
        let raw = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "filter")
            .map(|(_, v)| v.into_owned())
            .expect("filter param");
        serde_json::from_str(&raw).unwrap()
    }

    fn staff_row(name: &str) -> Value {
        json!({
            "status": "published",
            "telegram_id": 111,
            "telegram_name": "@bob",
            "fio": name,
            "position": "Engineer",
            "department": "Platform",
            "keys": []
        })
    }

    #[tokio::test]
    async fn test_resolve_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/staff"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [staff_row("Bob")] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let employee = client.resolve_employee(111, Some("bob")).await.unwrap().unwrap();
        assert_eq!(employee.full_name, "Bob");

        let requests = server.received_requests().await.unwrap();
        let query: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("fields".to_string(), "*,keys.*.*".to_string())));
        assert!(query.contains(&("limit".to_string(), "1".to_string())));
    }

    #[tokio::test]
    async fn test_falls_back_to_username() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/staff"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let result = client.resolve_employee(111, Some("bob")).await.unwrap();
        assert!(result.is_none());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            filter_of(&requests[0]),
            json!({ "status": { "_eq": "published" }, "telegram_id": { "_eq": 111 } })
        );
        assert_eq!(
            filter_of(&requests[1]),
            json!({ "status": { "_eq": "published" }, "telegram_name": { "_eq": "@bob" } })
        );
    }

    #[tokio::test]
    async fn test_username_match_returned() {
        let server = MockServer::start().await;
        // Id lookup comes back empty, username lookup finds the record
        Mock::given(method("GET"))
            .and(path("/items/staff"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items/staff"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [staff_row("Bob")] })))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let employee = client.resolve_employee(111, Some("@bob")).await.unwrap().unwrap();
        assert_eq!(employee.telegram_name.as_deref(), Some("@bob"));
    }

    #[tokio::test]
    async fn test_no_username_single_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/staff"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(2)
            .mount(&server)
            .await;

        // One id lookup per call, no username fallback
        let client = client_for(&server, Duration::from_secs(5));
        assert!(client.resolve_employee(111, None).await.unwrap().is_none());
        assert!(client.resolve_employee(111, Some("@")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_auth_errors_are_distinct() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/staff"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items/employees"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.resolve_employee(1, None).await.unwrap_err();
        assert!(matches!(err, BackendError::Unauthorized));

        let client = DirectusClient::new(&server.uri(), TOKEN, "employees", "*", Duration::from_secs(5)).unwrap();
        let err = client.resolve_employee(1, None).await.unwrap_err();
        assert!(matches!(err, BackendError::Forbidden));
        assert_ne!(BackendError::Unauthorized.to_string(), BackendError::Forbidden.to_string());
    }

    #[tokio::test]
    async fn test_server_error_and_bad_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/staff"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        match client.resolve_employee(1, None).await {
            Err(BackendError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let client = DirectusClient::new(&server.uri(), TOKEN, "broken", "*", Duration::from_secs(5)).unwrap();
        assert!(matches!(
            client.resolve_employee(1, None).await,
            Err(BackendError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_ping_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server/ping"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&server)
            .await;

        assert!(client_for(&server, Duration::from_secs(5)).check_connectivity().await);
    }

    #[tokio::test]
    async fn test_ping_failures_are_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server/ping"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        assert!(!client_for(&server, Duration::from_secs(5)).check_connectivity().await);

        let slow = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server/ping"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&slow)
            .await;
        assert!(!client_for(&slow, Duration::from_millis(100)).check_connectivity().await);
    }
}
