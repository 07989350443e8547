//! Hosted store client.
//!
//! Speaks PostgREST conventions against the `tasks` table of a hosted
//! relational store: `eq.` filters for row scoping, `apikey` + bearer
//! headers, `Prefer: return=representation` to get the stored row back on
//! insert. Row-level authorization is the server's job; this client only
//! promises to pass the owner id on every call.

use reqwest::{Client, Response};
use url::Url;

use async_trait::async_trait;

use super::TaskStore;
use crate::error::StoreError;
use crate::task::{Task, TaskDraft, TaskPatch};

pub struct RestStore {
    endpoint: Url,
    api_key: String,
    client: Client,
}

impl RestStore {
    /// Build a client for `{base_url}/rest/v1/tasks`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, StoreError> {
        if base_url.is_empty() || api_key.is_empty() {
            return Err(StoreError::NotConfigured);
        }
        let base = Url::parse(base_url)
            .map_err(|e| StoreError::Request(format!("invalid base URL '{base_url}': {e}")))?;
        let endpoint = base
            .join("rest/v1/tasks")
            .map_err(|e| StoreError::Request(format!("invalid base URL '{base_url}': {e}")))?;
        Ok(Self {
            endpoint,
            api_key: api_key.to_string(),
            client: Client::new(),
        })
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.endpoint.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn ensure_ok(resp: Response) -> Result<Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(classify_rejection(status.as_u16(), &body))
    }
}

/// Map a non-2xx response to a store error.
///
/// PostgREST reports an unknown column either as Postgres `42703` or as its
/// own schema-cache code `PGRST204` with a "Could not find ..." message;
/// both mean the store's schema is behind the client's.
fn classify_rejection(status: u16, body: &str) -> StoreError {
    let parsed: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
    let code = parsed["code"].as_str().unwrap_or_default();
    let message = parsed["message"]
        .as_str()
        .unwrap_or(body)
        .to_string();

    if code == "42703" || code == "PGRST204" || message.contains("Could not find") {
        StoreError::SchemaDrift(message)
    } else {
        StoreError::Rejected { status, message }
    }
}

#[async_trait]
impl TaskStore for RestStore {
    async fn list_tasks(&self, owner_id: &str) -> Result<Vec<Task>, StoreError> {
        let owner_filter = format!("eq.{owner_id}");
        let resp = self
            .request(reqwest::Method::GET)
            .query(&[
                ("select", "*"),
                ("user_id", owner_filter.as_str()),
                ("order", "created_at.desc"),
            ])
            .send()
            .await?;
        let resp = Self::ensure_ok(resp).await?;
        Ok(resp.json().await?)
    }

    async fn insert_task(&self, owner_id: &str, draft: &TaskDraft) -> Result<Task, StoreError> {
        let mut body = serde_json::to_value(draft)
            .map_err(|e| StoreError::Request(e.to_string()))?;
        if let Some(object) = body.as_object_mut() {
            object.insert(
                "user_id".into(),
                serde_json::Value::String(owner_id.to_string()),
            );
        }

        let resp = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_ok(resp).await?;
        let status = resp.status().as_u16();
        let mut rows: Vec<Task> = resp.json().await?;
        rows.pop().ok_or(StoreError::Rejected {
            status,
            message: "insert returned no rows".into(),
        })
    }

    async fn update_task(
        &self,
        task_id: &str,
        owner_id: &str,
        patch: &TaskPatch,
    ) -> Result<(), StoreError> {
        let id_filter = format!("eq.{task_id}");
        let owner_filter = format!("eq.{owner_id}");
        let resp = self
            .request(reqwest::Method::PATCH)
            .query(&[
                ("id", id_filter.as_str()),
                ("user_id", owner_filter.as_str()),
            ])
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        Self::ensure_ok(resp).await?;
        Ok(())
    }

    async fn delete_task(&self, task_id: &str, owner_id: &str) -> Result<(), StoreError> {
        let id_filter = format!("eq.{task_id}");
        let owner_filter = format!("eq.{owner_id}");
        let resp = self
            .request(reqwest::Method::DELETE)
            .query(&[
                ("id", id_filter.as_str()),
                ("user_id", owner_filter.as_str()),
            ])
            .send()
            .await?;
        Self::ensure_ok(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn task_row(id: &str, owner: &str) -> String {
        format!(
            r#"{{"id":"{id}","user_id":"{owner}","title":"Fetched","status":"todo","priority":"medium","created_at":"2024-03-04T08:00:00Z","updated_at":"2024-03-04T08:00:00Z"}}"#
        )
    }

    #[tokio::test]
    async fn list_scopes_by_owner_and_orders_by_creation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/tasks")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*".into()),
                Matcher::UrlEncoded("user_id".into(), "eq.owner-1".into()),
                Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            ]))
            .match_header("apikey", "secret")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body(format!("[{}]", task_row("t1", "owner-1")))
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "secret").unwrap();
        let tasks = store.list_tasks("owner-1").await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Fetched");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn insert_returns_the_stored_row() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/tasks")
            .match_header("prefer", "return=representation")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "title": "New task",
                "user_id": "owner-1",
            })))
            .with_status(201)
            .with_body(format!("[{}]", task_row("t2", "owner-1")))
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "secret").unwrap();
        let task = store
            .insert_task("owner-1", &TaskDraft::new("New task"))
            .await
            .unwrap();
        assert_eq!(task.id, "t2");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unknown_column_maps_to_schema_drift() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PATCH", "/rest/v1/tasks")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(
                r#"{"code":"PGRST204","message":"Could not find the 'color' column of 'tasks' in the schema cache"}"#,
            )
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "secret").unwrap();
        let patch = TaskPatch {
            color: Some("red".into()),
            ..TaskPatch::default()
        };
        let err = store.update_task("t1", "owner-1", &patch).await.unwrap_err();
        match err {
            StoreError::SchemaDrift(message) => assert!(message.contains("color")),
            other => panic!("expected SchemaDrift, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_rejections_carry_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/rest/v1/tasks")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body(r#"{"message":"service unavailable"}"#)
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "secret").unwrap();
        let err = store.delete_task("t1", "owner-1").await.unwrap_err();
        match err {
            StoreError::Rejected { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "service unavailable");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn missing_configuration_is_an_error() {
        assert!(matches!(
            RestStore::new("", "key"),
            Err(StoreError::NotConfigured)
        ));
        assert!(matches!(
            RestStore::new("https://example.test", ""),
            Err(StoreError::NotConfigured)
        ));
    }
}
