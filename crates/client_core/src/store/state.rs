use shared::domain::{Contact, Draft, DraftField, ServerKey};
use tracing::{error, info, warn};

use crate::{
    api::{Operation, RequestKey},
    error::ApiCallError,
};

pub const STATUS_SAVED: &str = "Contact saved successfully";
pub const STATUS_UPDATED: &str = "Contact updated successfully";
pub const STATUS_DELETED: &str = "Contact deleted successfully";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditTarget {
    #[default]
    None,
    Editing(ServerKey),
}

impl EditTarget {
    pub fn key(&self) -> Option<&ServerKey> {
        match self {
            EditTarget::None => None,
            EditTarget::Editing(key) => Some(key),
        }
    }

    pub fn is_editing(&self, key: &ServerKey) -> bool {
        self.key() == Some(key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisiblePanel {
    #[default]
    None,
    AllContacts,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Save,
    Update,
    Delete,
}

impl Mutation {
    fn verb(self) -> &'static str {
        match self {
            Mutation::Save => "save",
            Mutation::Update => "update",
            Mutation::Delete => "delete",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Mutation::Save => STATUS_SAVED,
            Mutation::Update => STATUS_UPDATED,
            Mutation::Delete => STATUS_DELETED,
        }
    }

    /// Status text for a failed mutation. Transport failures never leak the
    /// underlying cause.
    pub fn failure_message(self, err: &ApiCallError) -> String {
        let verb = self.verb();
        match err {
            ApiCallError::Transport(_) => format!("Error: Failed to {verb} contact"),
            _ => match err.server_message() {
                Some(message) => format!("Failed to {verb} contact: {message}"),
                None => format!("Failed to {verb} contact"),
            },
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Created(Result<(), ApiCallError>),
    Updated {
        key: ServerKey,
        result: Result<(), ApiCallError>,
    },
    Deleted {
        key: ServerKey,
        result: Result<(), ApiCallError>,
    },
    Refreshed(Result<Vec<Contact>, ApiCallError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Nothing,
    Refresh,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    contact_list: Vec<Contact>,
    edit_target: EditTarget,
    draft: Draft,
    status_message: Option<String>,
    visible_panel: VisiblePanel,
    dialog_open: bool,
}

impl ViewState {
    pub fn contacts(&self) -> &[Contact] {
        &self.contact_list
    }

    pub fn contact(&self, key: &ServerKey) -> Option<&Contact> {
        self.contact_list
            .iter()
            .find(|contact| &contact.server_key == key)
    }

    pub fn edit_target(&self) -> &EditTarget {
        &self.edit_target
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn visible_panel(&self) -> VisiblePanel {
        self.visible_panel
    }

    pub fn dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn apply(&mut self, outcome: Outcome) -> FollowUp {
        match outcome {
            Outcome::Created(Ok(())) => {
                info!("contact created");
                self.status_message = Some(Mutation::Save.success_message().to_string());
                self.draft = Draft::default();
                FollowUp::Refresh
            }
            Outcome::Created(Err(err)) => {
                self.record_failure(Mutation::Save, RequestKey::new(Operation::Create), &err);
                FollowUp::Nothing
            }
            Outcome::Updated { key, result: Ok(()) } => {
                info!(contact = %key, "contact updated");
                self.status_message = Some(Mutation::Update.success_message().to_string());
                self.edit_target = EditTarget::None;
                FollowUp::Refresh
            }
            Outcome::Updated {
                key,
                result: Err(err),
            } => {
                self.record_failure(
                    Mutation::Update,
                    RequestKey::targeting(Operation::Update, &key),
                    &err,
                );
                FollowUp::Nothing
            }
            Outcome::Deleted { key, result: Ok(()) } => {
                info!(contact = %key, "contact deleted");
                self.status_message = Some(Mutation::Delete.success_message().to_string());
                FollowUp::Refresh
            }
            Outcome::Deleted {
                key,
                result: Err(err),
            } => {
                self.record_failure(
                    Mutation::Delete,
                    RequestKey::targeting(Operation::Delete, &key),
                    &err,
                );
                FollowUp::Nothing
            }
            Outcome::Refreshed(Ok(contacts)) => {
                self.contact_list = contacts;
                FollowUp::Nothing
            }
            Outcome::Refreshed(Err(err)) => {
                // Refresh is best-effort: logged, never shown.
                error!(error = %err, "error fetching contacts");
                FollowUp::Nothing
            }
        }
    }

    fn record_failure(&mut self, mutation: Mutation, request: RequestKey, err: &ApiCallError) {
        warn!(request = %request, error = %err, "contact mutation failed");
        self.status_message = Some(mutation.failure_message(err));
    }

    pub(crate) fn set_dialog_open(&mut self, open: bool) {
        self.dialog_open = open;
    }

    pub(crate) fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub(crate) fn set_draft_field(&mut self, field: DraftField, value: String) {
        self.draft.set(field, value);
    }

    /// Toggles edit mode for `contact`. Entering edit on another contact
    /// overwrites the draft, discarding unsaved edits.
    pub(crate) fn toggle_edit(&mut self, contact: &Contact) {
        if self.edit_target.is_editing(&contact.server_key) {
            self.edit_target = EditTarget::None;
        } else {
            self.draft = Draft::from_contact(contact);
            self.edit_target = EditTarget::Editing(contact.server_key.clone());
        }
    }

    pub(crate) fn clear_edit_target(&mut self) {
        self.edit_target = EditTarget::None;
    }

    pub(crate) fn set_visible_panel(&mut self, panel: VisiblePanel) {
        self.visible_panel = panel;
    }
}
