pub mod api;
pub mod config;
pub mod error;
pub mod search;
pub mod store;

pub use api::{ContactApi, HttpContactApi, Operation, RequestKey};
pub use config::{load_settings, Settings};
pub use error::{ApiCallError, SettingsError};
pub use search::{ContactSearch, SearchDelegate};
pub use store::{ContactStore, EditTarget, Outcome, ViewState, VisiblePanel};

#[cfg(test)]
mod tests;
