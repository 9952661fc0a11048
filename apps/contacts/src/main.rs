use std::{process::ExitCode, sync::Arc};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, store::Mutation, ContactStore, HttpContactApi, SearchDelegate, Settings,
};
use shared::domain::{Contact, DraftField};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "contacts", about = "Manage contacts on a remote contact API")]
struct Args {
    /// Base address of the contact API (overrides contacts.toml and environment).
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Per-request timeout in seconds; 0 waits forever.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every contact.
    List,
    /// Create a contact.
    Create(FieldArgs),
    /// Replace the fields of an existing contact.
    Edit {
        server_key: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a contact.
    Delete { server_key: String },
    /// Search contacts.
    Search { query: String },
}

#[derive(clap::Args, Debug)]
struct FieldArgs {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    /// Set a field by name, e.g. `--set FirstName=Ann`. Applied after the named flags.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(DraftField, String)>,
}

impl FieldArgs {
    fn values(&self) -> Vec<(DraftField, &str)> {
        let named = [
            (DraftField::Id, &self.id),
            (DraftField::FirstName, &self.first_name),
            (DraftField::LastName, &self.last_name),
            (DraftField::Email, &self.email),
            (DraftField::Phone, &self.phone),
        ];
        named
            .into_iter()
            .filter_map(|(field, value)| value.as_deref().map(|value| (field, value)))
            .chain(
                self.assignments
                    .iter()
                    .map(|(field, value)| (*field, value.as_str())),
            )
            .collect()
    }
}

fn parse_assignment(raw: &str) -> Result<(DraftField, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = name.trim().parse::<DraftField>().map_err(|err| err.to_string())?;
    Ok((field, value.to_string()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = resolve_settings(&args);
    tracing::debug!(base_url = %settings.base_url, "using contact api");
    let api = Arc::new(HttpContactApi::new(&settings)?);
    let mut store = ContactStore::new(api);

    let expected = match &args.command {
        Command::List => {
            store.toggle_all_contacts_panel().await;
            None
        }
        Command::Create(fields) => {
            store.open_create_dialog();
            for (field, value) in fields.values() {
                store.update_draft_field(field, value);
            }
            store.submit_create().await;
            store.toggle_all_contacts_panel().await;
            Some(Mutation::Save)
        }
        Command::Edit { server_key, fields } => {
            store.toggle_all_contacts_panel().await;
            let contact = find_contact(&store, server_key)?;
            store.enter_edit(&contact);
            for (field, value) in fields.values() {
                store.update_draft_field(field, value);
            }
            store.submit_edit().await;
            Some(Mutation::Update)
        }
        Command::Delete { server_key } => {
            store.toggle_all_contacts_panel().await;
            let contact = find_contact(&store, server_key)?;
            store.delete_contact(&contact.server_key).await;
            Some(Mutation::Delete)
        }
        Command::Search { query } => {
            store.toggle_search_panel();
            store.search_mut().set_query(query.as_str());
            store.search_mut().run().await;
            None
        }
    };

    print!("{}", render::render_store(&store));

    let failed = match expected {
        Some(mutation) => store.state().status_message() != Some(mutation.success_message()),
        None => store.search().is_mounted() && store.search().status_message().is_some(),
    };
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn resolve_settings(args: &Args) -> Settings {
    let mut settings = load_settings();
    if let Some(url) = &args.server_url {
        settings.base_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout_secs = Some(secs);
    }
    settings
}

fn find_contact(store: &ContactStore, server_key: &str) -> Result<Contact> {
    store
        .state()
        .contacts()
        .iter()
        .find(|contact| contact.server_key.as_str() == server_key)
        .cloned()
        .ok_or_else(|| anyhow!("no contact with key '{server_key}'"))
}
