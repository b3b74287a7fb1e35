use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{ErrorBody, TodoApi, TODOS_PATH};
use crate::error::{Error, Result};
use crate::models::{NewTask, Task, TaskPatch};

/// Blocking HTTP client for the todo API.
///
/// One request per call; no retries and no timeout beyond reqwest's defaults.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    http: Client,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> HttpClient {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpClient {
            base_url,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, TODOS_PATH)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, TODOS_PATH, id)
    }
}

/// Decodes a success body, or turns an error status into [`Error`].
fn decode<T: DeserializeOwned>(resp: Response, id: Option<&str>) -> Result<T> {
    Ok(check_status(resp, id)?.json()?)
}

/// Passes any 2xx response through; maps everything else to [`Error`].
fn check_status(resp: Response, id: Option<&str>) -> Result<Response> {
    let status = resp.status();
    debug!(url = %resp.url(), %status, "response");
    if status.is_success() {
        return Ok(resp);
    }
    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(Error::NotFound(id.to_string()));
    }
    let message = match resp.json::<ErrorBody>() {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

impl TodoApi for HttpClient {
    fn list(&self) -> Result<Vec<Task>> {
        let resp = self.http.get(self.collection_url()).send()?;
        decode(resp, None)
    }

    fn create(&self, new: &NewTask) -> Result<Task> {
        let resp = self.http.post(self.collection_url()).json(new).send()?;
        decode(resp, None)
    }

    fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        let resp = self.http.put(self.item_url(id)).json(patch).send()?;
        decode(resp, Some(id))
    }

    fn delete(&self, id: &str) -> Result<Option<Task>> {
        let resp = self.http.delete(self.item_url(id)).send()?;
        let resp = check_status(resp, Some(id))?;
        Ok(resp.json::<Task>().ok())
    }
}
