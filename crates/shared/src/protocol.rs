use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{parse_js_int, Draft};

/// `POST /contact` body. `id` is coerced to an integer; input with no leading
/// digits is sent as `null` and left for the server to reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContactRequest {
    pub id: Option<i64>,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
}

impl From<&Draft> for CreateContactRequest {
    fn from(draft: &Draft) -> Self {
        Self {
            id: parse_js_int(&draft.id),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
        }
    }
}

/// `PUT /contact/{_id}` body. Text fields go out as typed; an untouched `id`
/// is echoed back as loaded, an edited one as its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateContactRequest {
    pub id: Value,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
}

impl From<&Draft> for UpdateContactRequest {
    fn from(draft: &Draft) -> Self {
        Self {
            id: draft
                .loaded_id
                .clone()
                .unwrap_or_else(|| Value::String(draft.id.clone())),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

pub fn contacts_route() -> &'static str {
    "/contact"
}

pub fn contact_search_route() -> &'static str {
    "/contact/search"
}
