use quotevault_core::models::CollectionWithCount;
use quotevault_core::viewmodels::CollectionsViewModel;
use serde::Serialize;

use super::common::{
    check_error, format_quote_line, join_words, parse_collection_id, parse_quote_id, Runtime,
};
use crate::cli::CollectionsCommands;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct CollectionListItem {
    id: String,
    name: String,
    quote_count: usize,
    updated_at: String,
}

fn print_collections(entries: &[CollectionWithCount], json: bool) -> Result<(), CliError> {
    if json {
        let items: Vec<CollectionListItem> = entries
            .iter()
            .map(|entry| CollectionListItem {
                id: entry.id().to_string(),
                name: entry.collection.name.clone(),
                quote_count: entry.quote_count,
                updated_at: entry.collection.updated_at.to_rfc3339(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if entries.is_empty() {
        println!("No collections yet.");
    } else {
        for entry in entries {
            let noun = if entry.quote_count == 1 { "quote" } else { "quotes" };
            println!(
                "{} {} ({} {noun})",
                entry.id(),
                entry.collection.name,
                entry.quote_count
            );
        }
    }
    Ok(())
}

pub async fn run_collections(
    runtime: &Runtime,
    command: CollectionsCommands,
) -> Result<(), CliError> {
    let user = runtime.require_user()?;
    let collections = CollectionsViewModel::new(runtime.ctx.clone());

    match command {
        CollectionsCommands::List { json, offline } => {
            let entries = if offline {
                runtime.mirror.cached_collections(user).await?
            } else {
                collections.load().await;
                let state = collections.state();
                check_error(state.error)?;
                state.collections
            };
            print_collections(&entries, json)?;
        }
        CollectionsCommands::Show { id } => {
            let id = parse_collection_id(&id)?;
            collections.load_collection_quotes(id).await;
            let state = collections.state();
            check_error(state.error)?;
            if state.collection_quotes.is_empty() {
                println!("Collection is empty.");
            }
            for quote in &state.collection_quotes {
                println!("{}", format_quote_line(quote, false));
            }
        }
        CollectionsCommands::Create { name } => {
            let name = join_words(&name);
            if name.is_empty() {
                return Err(CliError::EmptyCollectionName);
            }
            let created = collections.create(&name).await;
            check_error(collections.state().error)?;
            if let Some(id) = created {
                println!("{id}");
            }
        }
        CollectionsCommands::Rename { id, name } => {
            let id = parse_collection_id(&id)?;
            let name = join_words(&name);
            if name.is_empty() {
                return Err(CliError::EmptyCollectionName);
            }
            collections.rename(id, &name).await;
            check_error(collections.state().error)?;
            println!("Renamed {id} to {name}");
        }
        CollectionsCommands::Delete { id } => {
            let id = parse_collection_id(&id)?;
            collections.delete(id).await;
            check_error(collections.state().error)?;
            println!("Deleted collection {id}");
        }
        CollectionsCommands::Add { collection, quote } => {
            let collection = parse_collection_id(&collection)?;
            let quote = parse_quote_id(&quote)?;
            collections.add_quote(collection, quote).await;
            check_error(collections.state().error)?;
            println!("Added {quote} to {collection}");
        }
        CollectionsCommands::Remove { collection, quote } => {
            let collection = parse_collection_id(&collection)?;
            let quote = parse_quote_id(&quote)?;
            collections.remove_quote(collection, quote).await;
            check_error(collections.state().error)?;
            println!("Removed {quote} from {collection}");
        }
    }
    Ok(())
}
