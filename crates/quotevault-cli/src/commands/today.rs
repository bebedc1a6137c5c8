use quotevault_core::viewmodels::HomeViewModel;
use serde::Serialize;

use super::common::{check_error, find_category, format_quote_line, today, QuoteListItem, Runtime};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct TodayOutput {
    greeting: String,
    quote_of_day: Option<QuoteListItem>,
    recommended: Vec<QuoteListItem>,
}

pub async fn run_today(
    runtime: &Runtime,
    category: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    let home = HomeViewModel::new(runtime.ctx.clone());
    home.load(today()).await;
    check_error(home.state().error)?;

    if let Some(name) = category {
        let category_id = find_category(&home.state().categories, name)?.id;
        home.select_category(Some(category_id)).await;
        check_error(home.state().error)?;
    }

    let state = home.state();
    let greeting = format!("{}, {}", home.greeting_now(), home.display_name());
    let favorited = |id| state.favorite_ids.contains(&id);

    if json {
        let output = TodayOutput {
            greeting,
            quote_of_day: state
                .quote_of_day
                .as_ref()
                .map(|quote| QuoteListItem::new(quote, favorited(quote.id()))),
            recommended: state
                .recommended
                .iter()
                .map(|quote| QuoteListItem::new(quote, favorited(quote.id())))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{greeting}");
    println!();
    match &state.quote_of_day {
        Some(quote) => {
            println!("Quote of the day");
            println!("  \"{}\"", quote.quote.text);
            println!("  — {}", quote.quote.author);
        }
        None => println!("No quote of the day yet."),
    }
    println!();
    println!("Recommended");
    for quote in &state.recommended {
        println!("{}", format_quote_line(quote, favorited(quote.id())));
    }
    Ok(())
}
