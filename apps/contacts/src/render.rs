use std::fmt::Write as _;

use client_core::{ContactSearch, ContactStore, EditTarget, VisiblePanel};
use shared::domain::{Contact, Draft, DraftField};

pub fn render_store(store: &ContactStore) -> String {
    let state = store.state();
    let mut out = String::new();

    match state.visible_panel() {
        VisiblePanel::AllContacts => {
            out.push_str(&render_contacts(
                state.contacts(),
                state.edit_target(),
                state.draft(),
            ));
        }
        VisiblePanel::Search => out.push_str(&render_search(store.search())),
        VisiblePanel::None => {}
    }

    if let Some(status) = state.status_message() {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{status}");
    }
    out
}

pub fn render_contacts(contacts: &[Contact], edit_target: &EditTarget, draft: &Draft) -> String {
    if contacts.is_empty() {
        return "No contacts available\n".to_string();
    }
    let mut out = String::new();
    for (index, contact) in contacts.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        if edit_target.is_editing(&contact.server_key) {
            out.push_str(&render_draft(draft));
        } else {
            out.push_str(&render_contact(contact));
        }
    }
    out
}

pub fn render_contact(contact: &Contact) -> String {
    let id = contact.id.as_ref().map(ToString::to_string).unwrap_or_default();
    let mut out = String::new();
    let _ = writeln!(out, "[{}]", contact.server_key);
    let _ = writeln!(out, "ID: {id}");
    let _ = writeln!(out, "First Name: {}", contact.first_name);
    let _ = writeln!(out, "Last Name: {}", contact.last_name);
    let _ = writeln!(out, "Email: {}", contact.email);
    let _ = writeln!(out, "Phone: {}", contact.phone);
    out
}

fn render_draft(draft: &Draft) -> String {
    let mut out = String::from("(editing)\n");
    for field in DraftField::ALL {
        let _ = writeln!(out, "{}: {}", field_label(field), draft.get(field));
    }
    out
}

fn render_search(search: &ContactSearch) -> String {
    let mut out = String::new();
    if let Some(status) = search.status_message() {
        let _ = writeln!(out, "{status}");
        return out;
    }
    if search.results().is_empty() {
        let _ = writeln!(out, "No contacts found for \"{}\"", search.query());
        return out;
    }
    for (index, contact) in search.results().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&render_contact(contact));
    }
    out
}

fn field_label(field: DraftField) -> &'static str {
    match field {
        DraftField::Id => "ID",
        DraftField::FirstName => "First Name",
        DraftField::LastName => "Last Name",
        DraftField::Email => "Email",
        DraftField::Phone => "Phone",
    }
}
