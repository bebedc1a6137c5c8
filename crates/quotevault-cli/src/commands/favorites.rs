use quotevault_core::services::favorites::toggle_favorite;
use quotevault_core::viewmodels::FavoritesViewModel;

use super::common::{check_error, format_quote_line, parse_quote_id, QuoteListItem, Runtime};
use crate::cli::FavoritesCommands;
use crate::error::CliError;

pub async fn run_favorites(runtime: &Runtime, command: FavoritesCommands) -> Result<(), CliError> {
    let user = runtime.require_user()?;
    let favorites = FavoritesViewModel::new(runtime.ctx.clone());

    match command {
        FavoritesCommands::List { json } => {
            favorites.load().await;
            let state = favorites.state();
            check_error(state.error)?;

            if json {
                let items: Vec<QuoteListItem> = state
                    .favorites
                    .iter()
                    .map(|favorite| QuoteListItem::new(&favorite.quote, true))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if state.favorites.is_empty() {
                println!("No favorites yet.");
            } else {
                for favorite in &state.favorites {
                    println!("{}", format_quote_line(&favorite.quote, true));
                }
            }
        }
        FavoritesCommands::Toggle { id } => {
            let quote = parse_quote_id(&id)?;
            let now_favorite = toggle_favorite(runtime.backend(), user, quote).await?;
            if now_favorite {
                println!("Added {quote} to favorites");
            } else {
                println!("Removed {quote} from favorites");
            }
        }
        FavoritesCommands::Remove { id } => {
            let quote = parse_quote_id(&id)?;
            favorites.remove(quote).await;
            check_error(favorites.state().error)?;
            println!("Removed {quote} from favorites");
        }
    }
    Ok(())
}
