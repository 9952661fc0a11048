use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use shared::{
    domain::{Contact, Draft, ServerKey},
    error::FailureBody,
    protocol::{
        contact_search_route, contacts_route, CreateContactRequest, SearchQuery,
        UpdateContactRequest,
    },
};
use tracing::{debug, Instrument};
use url::Url;

use crate::{
    config::Settings,
    error::{ApiCallError, SettingsError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    List,
    Update,
    Delete,
    Search,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Search => "search",
        }
    }
}

/// Identifies one in-flight call by operation and, for addressed calls, the
/// contact it targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub op: Operation,
    pub target: Option<ServerKey>,
}

impl RequestKey {
    pub fn new(op: Operation) -> Self {
        Self { op, target: None }
    }

    pub fn targeting(op: Operation, target: &ServerKey) -> Self {
        Self {
            op,
            target: Some(target.clone()),
        }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{}:{}", self.op.as_str(), target),
            None => f.write_str(self.op.as_str()),
        }
    }
}

#[async_trait]
pub trait ContactApi: Send + Sync {
    async fn create(&self, draft: &Draft) -> Result<(), ApiCallError>;
    async fn list(&self) -> Result<Vec<Contact>, ApiCallError>;
    async fn update(&self, key: &ServerKey, draft: &Draft) -> Result<(), ApiCallError>;
    async fn delete(&self, key: &ServerKey) -> Result<(), ApiCallError>;
    async fn search(&self, query: &str) -> Result<Vec<Contact>, ApiCallError>;
}

pub struct HttpContactApi {
    http: Client,
    collection_url: Url,
    search_url: Url,
}

impl HttpContactApi {
    pub fn new(settings: &Settings) -> Result<Self, SettingsError> {
        let base_url = settings.parsed_base_url()?;
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(SettingsError::HttpClient)?;

        Ok(Self {
            http,
            collection_url: join_route(&base_url, contacts_route()),
            search_url: join_route(&base_url, contact_search_route()),
        })
    }

    pub(crate) fn contact_url(&self, key: &ServerKey) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(key.as_str());
        }
        url
    }

    async fn send(
        &self,
        key: RequestKey,
        request: RequestBuilder,
    ) -> Result<Response, ApiCallError> {
        let span = tracing::debug_span!(
            "contact_request",
            op = key.op.as_str(),
            contact = key.target.as_ref().map(ServerKey::as_str),
        );
        async move {
            debug!("issuing request");
            let response = request.send().await?;
            let status = response.status();
            if status.is_success() {
                debug!(status = status.as_u16(), "request succeeded");
                return Ok(response);
            }
            let body = response.bytes().await.unwrap_or_default();
            let message = FailureBody::message_from_bytes(&body);
            debug!(status = status.as_u16(), reason = ?message, "request rejected");
            Err(ApiCallError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
        .instrument(span)
        .await
    }

    async fn fetch_contacts(
        &self,
        key: RequestKey,
        request: RequestBuilder,
    ) -> Result<Vec<Contact>, ApiCallError> {
        let response = self.send(key, request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn join_route(base_url: &Url, route: &str) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        segments.extend(route.split('/').filter(|segment| !segment.is_empty()));
    }
    url
}

#[async_trait]
impl ContactApi for HttpContactApi {
    async fn create(&self, draft: &Draft) -> Result<(), ApiCallError> {
        let request = self
            .http
            .post(self.collection_url.clone())
            .json(&CreateContactRequest::from(draft));
        self.send(RequestKey::new(Operation::Create), request).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Contact>, ApiCallError> {
        let request = self.http.get(self.collection_url.clone());
        self.fetch_contacts(RequestKey::new(Operation::List), request)
            .await
    }

    async fn update(&self, key: &ServerKey, draft: &Draft) -> Result<(), ApiCallError> {
        let request = self
            .http
            .put(self.contact_url(key))
            .json(&UpdateContactRequest::from(draft));
        self.send(RequestKey::targeting(Operation::Update, key), request)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &ServerKey) -> Result<(), ApiCallError> {
        let request = self.http.delete(self.contact_url(key));
        self.send(RequestKey::targeting(Operation::Delete, key), request)
            .await?;
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<Contact>, ApiCallError> {
        let request = self.http.get(self.search_url.clone()).query(&SearchQuery {
            q: query.to_string(),
        });
        self.fetch_contacts(RequestKey::new(Operation::Search), request)
            .await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
