use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Number, Value};
use shared::{
    domain::{parse_js_int, Contact, ServerKey},
    error::FailureBody,
    protocol::{CreateContactRequest, SearchQuery, UpdateContactRequest},
};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
    task::JoinHandle,
};

use crate::{api::Operation, config::Settings, HttpContactApi};

/// In-memory stand-in for the contact API.
#[derive(Default)]
pub struct MockBackend {
    pub contacts: Vec<Contact>,
    pub requests: Vec<(Operation, Option<String>)>,
    pub bodies: Vec<Value>,
    failures: HashMap<Operation, (StatusCode, String)>,
    list_delay: Option<Duration>,
    next_key: u32,
}

impl MockBackend {
    fn insert(
        &mut self,
        id: Option<i64>,
        first: &str,
        last: &str,
        email: &str,
        phone: &str,
    ) -> Contact {
        self.next_key += 1;
        let contact: Contact = serde_json::from_value(json!({
            "_id": format!("key-{}", self.next_key),
            "id": id,
            "FirstName": first,
            "LastName": last,
            "Email": email,
            "Phone": phone,
        }))
        .expect("contact");
        self.contacts.push(contact.clone());
        contact
    }

    fn scripted_failure(&mut self, op: Operation) -> Option<Response> {
        self.failures
            .remove(&op)
            .map(|(status, body)| (status, body).into_response())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.contacts
            .iter()
            .position(|contact| contact.server_key.as_str() == key)
    }
}

type Shared = Arc<Mutex<MockBackend>>;

type Running = Arc<Mutex<Option<(oneshot::Sender<()>, JoinHandle<()>)>>>;

#[derive(Clone)]
pub struct MockServer {
    pub url: String,
    backend: Shared,
    running: Running,
}

impl MockServer {
    pub async fn spawn() -> Self {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let backend: Shared = Arc::new(Mutex::new(MockBackend::default()));
        let app = Router::new()
            .route("/contact", get(list_contacts).post(create_contact))
            .route("/contact/search", get(search_contacts))
            .route("/contact/:key", put(update_contact).delete(delete_contact))
            .with_state(backend.clone());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.await;
                })
                .await;
        });
        Self {
            url: format!("http://{addr}"),
            backend,
            running: Arc::new(Mutex::new(Some((stop_tx, handle)))),
        }
    }

    /// Closes the listener; later calls fail to connect.
    pub async fn stop(&self) {
        if let Some((stop_tx, handle)) = self.running.lock().await.take() {
            let _ = stop_tx.send(());
            let _ = handle.await;
        }
    }

    pub fn api(&self) -> Arc<HttpContactApi> {
        Arc::new(HttpContactApi::new(&self.settings()).expect("api"))
    }

    pub fn settings(&self) -> Settings {
        Settings {
            base_url: self.url.clone(),
            request_timeout_secs: None,
        }
    }

    pub async fn seed(&self, id: i64, first: &str, last: &str) -> Contact {
        let email = format!("{}@example.com", first.to_lowercase());
        self.backend
            .lock()
            .await
            .insert(Some(id), first, last, &email, "555-0100")
    }

    /// Makes the next call of `op` answer with `status` and a raw `body`.
    pub async fn fail_next(&self, op: Operation, status: StatusCode, body: &str) {
        self.backend
            .lock()
            .await
            .failures
            .insert(op, (status, body.to_string()));
    }

    pub async fn delay_lists(&self, delay: Duration) {
        self.backend.lock().await.list_delay = Some(delay);
    }

    pub async fn contacts(&self) -> Vec<Contact> {
        self.backend.lock().await.contacts.clone()
    }

    pub async fn request_count(&self, op: Operation) -> usize {
        self.backend
            .lock()
            .await
            .requests
            .iter()
            .filter(|(logged, _)| *logged == op)
            .count()
    }

    pub async fn total_requests(&self) -> usize {
        self.backend.lock().await.requests.len()
    }

    pub async fn requests(&self) -> Vec<(Operation, Option<String>)> {
        self.backend.lock().await.requests.clone()
    }

    pub async fn last_body(&self) -> Option<Value> {
        self.backend.lock().await.bodies.last().cloned()
    }
}

/// Address with nothing listening on it.
pub async fn unreachable_url() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn key(raw: &str) -> ServerKey {
    serde_json::from_value(json!(raw)).expect("server key")
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(FailureBody::new(message))).into_response()
}

async fn list_contacts(State(backend): State<Shared>) -> Response {
    let delay = {
        let mut backend = backend.lock().await;
        backend.requests.push((Operation::List, None));
        if let Some(failure) = backend.scripted_failure(Operation::List) {
            return failure;
        }
        backend.list_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Json(backend.lock().await.contacts.clone()).into_response()
}

async fn create_contact(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = backend.lock().await;
    backend.requests.push((Operation::Create, None));
    backend.bodies.push(body.clone());
    if let Some(failure) = backend.scripted_failure(Operation::Create) {
        return failure;
    }
    let request: CreateContactRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(err) => return reject(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    if request.id.is_some() && backend.contacts.iter().any(|c| c.id_as_i64() == request.id) {
        return reject(StatusCode::BAD_REQUEST, "duplicate id");
    }
    let contact = backend.insert(
        request.id,
        &request.first_name,
        &request.last_name,
        &request.email,
        &request.phone,
    );
    (StatusCode::CREATED, Json(contact)).into_response()
}

async fn update_contact(
    State(backend): State<Shared>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = backend.lock().await;
    backend.requests.push((Operation::Update, Some(key.clone())));
    backend.bodies.push(body.clone());
    if let Some(failure) = backend.scripted_failure(Operation::Update) {
        return failure;
    }
    let request: UpdateContactRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(err) => return reject(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    let Some(index) = backend.position(&key) else {
        return reject(StatusCode::NOT_FOUND, "not found");
    };
    let contact = &mut backend.contacts[index];
    contact.id = match request.id {
        Value::Number(number) => Some(number),
        Value::String(text) => parse_js_int(&text).map(Number::from),
        _ => None,
    };
    contact.first_name = request.first_name;
    contact.last_name = request.last_name;
    contact.email = request.email;
    contact.phone = request.phone;
    Json(contact.clone()).into_response()
}

async fn delete_contact(State(backend): State<Shared>, Path(key): Path<String>) -> Response {
    let mut backend = backend.lock().await;
    backend.requests.push((Operation::Delete, Some(key.clone())));
    if let Some(failure) = backend.scripted_failure(Operation::Delete) {
        return failure;
    }
    let Some(index) = backend.position(&key) else {
        return reject(StatusCode::NOT_FOUND, "not found");
    };
    backend.contacts.remove(index);
    Json(json!({"message": "deleted"})).into_response()
}

async fn search_contacts(
    State(backend): State<Shared>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let mut backend = backend.lock().await;
    backend.requests.push((Operation::Search, Some(query.q.clone())));
    if let Some(failure) = backend.scripted_failure(Operation::Search) {
        return failure;
    }
    let needle = query.q.to_lowercase();
    let hits: Vec<Contact> = backend
        .contacts
        .iter()
        .filter(|contact| {
            [
                &contact.first_name,
                &contact.last_name,
                &contact.email,
                &contact.phone,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    Json(hits).into_response()
}
