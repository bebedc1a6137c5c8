//! Category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::theme::{category_color, Rgba};
use super::CategoryId;

const DEFAULT_CATEGORY_ICON: &str = "quote.bubble.fill";
const ALL_CATEGORIES_ICON: &str = "square.grid.2x2.fill";

/// A quote category (read-only to clients)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: Option<String>,
    /// Hex color, e.g. `4F46E5`
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Row color when present, otherwise the default for this name
    #[must_use]
    pub fn display_color(&self) -> Rgba {
        self.color
            .as_deref()
            .map_or_else(|| category_color(&self.name), Rgba::from_hex)
    }

    #[must_use]
    pub fn icon_name(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_CATEGORY_ICON)
    }
}

/// An entry in the category filter bar: either "All" or one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFilter {
    /// `None` means no category restriction
    pub id: Option<CategoryId>,
    pub name: String,
    pub icon: String,
    pub color: Rgba,
}

impl CategoryFilter {
    #[must_use]
    pub fn all() -> Self {
        Self {
            id: None,
            name: "All".to_string(),
            icon: ALL_CATEGORIES_ICON.to_string(),
            color: Rgba::from_hex("6B7280"),
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        self.id.is_none()
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl From<&Category> for CategoryFilter {
    fn from(category: &Category) -> Self {
        Self {
            id: Some(category.id),
            name: category.name.clone(),
            icon: category.icon_name().to_string(),
            color: category.display_color(),
        }
    }
}
