use std::sync::Arc;

use shared::domain::Contact;
use tracing::{debug, warn};

use crate::{api::ContactApi, error::ApiCallError};

pub trait SearchDelegate: Send {
    fn mount(&mut self);
    fn unmount(&mut self);
    fn is_mounted(&self) -> bool;
}

pub struct ContactSearch {
    api: Arc<dyn ContactApi>,
    mounted: bool,
    query: String,
    results: Vec<Contact>,
    status_message: Option<String>,
}

impl ContactSearch {
    pub fn new(api: Arc<dyn ContactApi>) -> Self {
        Self {
            api,
            mounted: false,
            query: String::new(),
            results: Vec::new(),
            status_message: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn results(&self) -> &[Contact] {
        &self.results
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Runs the current query. Does nothing while unmounted.
    pub async fn run(&mut self) {
        if !self.mounted {
            debug!("search view not mounted; ignoring query");
            return;
        }
        match self.api.search(&self.query).await {
            Ok(results) => {
                self.results = results;
                self.status_message = None;
            }
            Err(err) => {
                warn!(query = %self.query, error = %err, "contact search failed");
                self.status_message = Some(search_failure_message(&err));
            }
        }
    }
}

fn search_failure_message(err: &ApiCallError) -> String {
    if err.is_transport() {
        return "Error: Failed to search contacts".to_string();
    }
    match err.server_message() {
        Some(message) => format!("Failed to search contacts: {message}"),
        None => "Failed to search contacts".to_string(),
    }
}

impl SearchDelegate for ContactSearch {
    fn mount(&mut self) {
        self.mounted = true;
    }

    /// Unmounting discards the query and results; a remount starts fresh.
    fn unmount(&mut self) {
        self.mounted = false;
        self.query.clear();
        self.results.clear();
        self.status_message = None;
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}
