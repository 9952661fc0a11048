mod state;

use std::sync::Arc;

use shared::domain::{Contact, DraftField, ServerKey};
use tracing::debug;

use crate::{
    api::ContactApi,
    search::{ContactSearch, SearchDelegate},
};

pub use state::{
    EditTarget, FollowUp, Mutation, Outcome, ViewState, VisiblePanel, STATUS_DELETED,
    STATUS_SAVED, STATUS_UPDATED,
};

pub struct ContactStore<S: SearchDelegate = ContactSearch> {
    api: Arc<dyn ContactApi>,
    state: ViewState,
    search: S,
}

impl ContactStore<ContactSearch> {
    pub fn new(api: Arc<dyn ContactApi>) -> Self {
        let search = ContactSearch::new(api.clone());
        Self::with_search(api, search)
    }
}

impl<S: SearchDelegate> ContactStore<S> {
    pub fn with_search(api: Arc<dyn ContactApi>, search: S) -> Self {
        Self {
            api,
            state: ViewState::default(),
            search,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut S {
        &mut self.search
    }

    pub fn open_create_dialog(&mut self) {
        self.state.set_dialog_open(true);
    }

    /// Hides the dialog and clears the status line. The draft survives.
    pub fn close_create_dialog(&mut self) {
        self.state.set_dialog_open(false);
        self.state.clear_status();
    }

    pub fn toggle_create_dialog(&mut self) {
        if self.state.dialog_open() {
            self.close_create_dialog();
        } else {
            self.open_create_dialog();
            self.state.clear_status();
        }
    }

    pub fn update_draft_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.state.set_draft_field(field, value.into());
    }

    pub async fn submit_create(&mut self) {
        let draft = self.state.draft().clone();
        let result = self.api.create(&draft).await;
        self.settle(Outcome::Created(result)).await;
    }

    pub fn enter_edit(&mut self, contact: &Contact) {
        self.state.toggle_edit(contact);
    }

    /// Sends the draft as a full replacement for the contact in edit mode.
    pub async fn submit_edit(&mut self) {
        let EditTarget::Editing(key) = self.state.edit_target().clone() else {
            debug!("no contact in edit mode; nothing to submit");
            return;
        };
        let draft = self.state.draft().clone();
        let result = self.api.update(&key, &draft).await;
        self.settle(Outcome::Updated { key, result }).await;
    }

    pub fn cancel_edit(&mut self) {
        self.state.clear_edit_target();
    }

    pub async fn delete_contact(&mut self, key: &ServerKey) {
        let result = self.api.delete(key).await;
        self.settle(Outcome::Deleted {
            key: key.clone(),
            result,
        })
        .await;
    }

    pub async fn refresh_contacts(&mut self) {
        let result = self.api.list().await;
        self.state.apply(Outcome::Refreshed(result));
    }

    /// Showing the panel loads the collection first; hiding it fetches nothing.
    pub async fn toggle_all_contacts_panel(&mut self) {
        if self.state.visible_panel() == VisiblePanel::AllContacts {
            self.show_panel(VisiblePanel::None);
            return;
        }
        self.refresh_contacts().await;
        self.show_panel(VisiblePanel::AllContacts);
    }

    pub fn toggle_search_panel(&mut self) {
        if self.state.visible_panel() == VisiblePanel::Search {
            self.show_panel(VisiblePanel::None);
        } else {
            self.show_panel(VisiblePanel::Search);
        }
    }

    async fn settle(&mut self, outcome: Outcome) {
        if self.state.apply(outcome) == FollowUp::Refresh {
            self.refresh_contacts().await;
        }
    }

    fn show_panel(&mut self, panel: VisiblePanel) {
        let previous = self.state.visible_panel();
        if previous == VisiblePanel::Search && panel != VisiblePanel::Search {
            self.search.unmount();
        }
        if panel == VisiblePanel::Search && previous != VisiblePanel::Search {
            self.search.mount();
        }
        self.state.set_visible_panel(panel);
    }
}
