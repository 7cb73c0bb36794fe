//! Core category domain types and validation rules.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Argb, CategoryIcon, DatabaseId, EntityName, Error, screen::Identified};

/// Whether a category groups money going out or coming in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum CategoryKind {
    /// Money going out.
    #[default]
    Expense,
    /// Money coming in.
    Income,
}

impl CategoryKind {
    /// The value stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKind::Expense => "EXPENSE",
            CategoryKind::Income => "INCOME",
        }
    }
}

impl FromStr for CategoryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXPENSE" => Ok(CategoryKind::Expense),
            "INCOME" => Ok(CategoryKind::Income),
            other => Err(Error::InvalidCategoryKind(other.to_owned())),
        }
    }
}

impl Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category for grouping transactions (e.g., 'Groceries', 'Salary').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The database ID, `None` until the category has been saved.
    pub id: Option<DatabaseId>,
    /// The unique name of the category.
    pub name: EntityName,
    /// Whether the category is for expenses or income.
    pub kind: CategoryKind,
    /// The stored icon name, see [Category::icon].
    pub icon: Option<String>,
    /// The color used to draw the category.
    pub color: Option<Argb>,
}

impl Category {
    /// The icon to draw, falling back to [CategoryIcon::Wallet] for missing or unknown names.
    pub fn icon(&self) -> CategoryIcon {
        CategoryIcon::from_name(self.icon.as_deref())
    }
}

impl Identified for Category {
    fn id(&self) -> Option<DatabaseId> {
        self.id
    }
}

/// Check that a category of `kind` has an acceptable color and return it.
///
/// Expense categories need some color, income categories need one that is not
/// [Argb::TRANSPARENT].
///
/// # Errors
/// Returns [Error::MissingColorForExpense] or [Error::MissingColorForIncome].
pub fn validate_category_color(kind: CategoryKind, color: Option<Argb>) -> Result<Argb, Error> {
    match (kind, color) {
        (CategoryKind::Expense, None) => Err(Error::MissingColorForExpense),
        (CategoryKind::Income, None) => Err(Error::MissingColorForIncome),
        (CategoryKind::Income, Some(color)) if color.is_transparent() => {
            Err(Error::MissingColorForIncome)
        }
        (_, Some(color)) => Ok(color),
    }
}
