use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

/// Server-assigned identifier used to address update and delete calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerKey(String);

impl ServerKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A contact as the server reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub server_key: ServerKey,
    /// User-facing number. Cosmetic: neither unique nor immutable, and `null`
    /// when it was created from non-numeric input.
    #[serde(default, deserialize_with = "lenient_number")]
    pub id: Option<Number>,
    #[serde(rename = "FirstName", default, deserialize_with = "lenient_text")]
    pub first_name: String,
    #[serde(rename = "LastName", default, deserialize_with = "lenient_text")]
    pub last_name: String,
    #[serde(rename = "Email", default, deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(rename = "Phone", default, deserialize_with = "lenient_text")]
    pub phone: String,
}

impl Contact {
    pub fn id_as_i64(&self) -> Option<i64> {
        self.id.as_ref().and_then(Number::as_i64)
    }
}

// One odd entry must not sink a whole list response.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => Some(number),
        Value::String(text) => text.trim().parse::<Number>().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
}

impl DraftField {
    pub const ALL: [DraftField; 5] = [
        DraftField::Id,
        DraftField::FirstName,
        DraftField::LastName,
        DraftField::Email,
        DraftField::Phone,
    ];

    /// Name of the field in request and response bodies.
    pub fn wire_name(self) -> &'static str {
        match self {
            DraftField::Id => "id",
            DraftField::FirstName => "FirstName",
            DraftField::LastName => "LastName",
            DraftField::Email => "Email",
            DraftField::Phone => "Phone",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown contact field: {0}")]
pub struct UnknownDraftField(pub String);

impl FromStr for DraftField {
    type Err = UnknownDraftField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "id" => Ok(DraftField::Id),
            "firstname" => Ok(DraftField::FirstName),
            "lastname" => Ok(DraftField::LastName),
            "email" => Ok(DraftField::Email),
            "phone" => Ok(DraftField::Phone),
            _ => Err(UnknownDraftField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// `id` exactly as the server reported it. Cleared once `id` is edited.
    pub loaded_id: Option<Value>,
}

impl Draft {
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            id: contact
                .id
                .as_ref()
                .map(Number::to_string)
                .unwrap_or_default(),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            loaded_id: Some(contact.id.clone().map_or(Value::Null, Value::Number)),
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Id => &self.id,
            DraftField::FirstName => &self.first_name,
            DraftField::LastName => &self.last_name,
            DraftField::Email => &self.email,
            DraftField::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::Id => {
                self.loaded_id = None;
                &mut self.id
            }
            DraftField::FirstName => &mut self.first_name,
            DraftField::LastName => &mut self.last_name,
            DraftField::Email => &mut self.email,
            DraftField::Phone => &mut self.phone,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        DraftField::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}

/// Integer coercion with the same leniency as a browser's `parseInt(s, 10)`:
/// leading whitespace and an optional sign are accepted, parsing stops at the
/// first non-digit, and input without any leading digit yields `None`.
pub fn parse_js_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
