//! Shareable renditions of a quote for every client surface.

use serde::Serialize;

use crate::models::theme::CardPalette;
use crate::models::{CardStyle, QuoteWithCategory};

/// Brand line printed at the foot of every card
pub const CARD_BRANDING: &str = "QUOTEVAULT";

/// Share output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShareFormat {
    Text,
    Card,
}

impl ShareFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Card => "json",
        }
    }
}

/// Plain share text: `"<text>" — <author>`.
#[must_use]
pub fn share_text(quote: &QuoteWithCategory) -> String {
    format!("\"{}\" — {}", quote.quote.text, quote.quote.author)
}

/// Everything a renderer needs to draw a quote card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareCard {
    pub text: String,
    pub author: String,
    pub category: String,
    pub style: CardStyle,
    pub palette: CardPalette,
    pub branding: &'static str,
}

impl ShareCard {
    #[must_use]
    pub fn new(quote: &QuoteWithCategory, style: CardStyle) -> Self {
        Self {
            text: quote.quote.text.clone(),
            author: quote.quote.author.clone(),
            category: quote.category_name().to_string(),
            style,
            palette: style.palette(),
            branding: CARD_BRANDING,
        }
    }
}

/// Render a card as pretty-printed JSON.
pub fn render_card_json(card: &ShareCard) -> serde_json::Result<String> {
    serde_json::to_string_pretty(card)
}
