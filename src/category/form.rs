//! The category edit form.

use crate::{
    Argb, CategoryIcon, DatabaseId, EntityName, Error, MessageRef,
    category::{Category, CategoryKind, validate_category_color},
    screen::EntityForm,
};

/// The unsaved values of the category being created or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryForm {
    /// The ID of the category being edited, `None` for a new category.
    pub id: Option<DatabaseId>,
    /// The name as typed by the user.
    pub name: String,
    /// The error to show under the name field.
    pub name_error: Option<MessageRef>,
    /// Whether the category is for expenses or income.
    pub kind: CategoryKind,
    /// The stored name of the chosen icon.
    pub icon: String,
    /// The chosen color.
    pub color: Option<Argb>,
    /// The error to show under the color picker.
    pub color_error: Option<MessageRef>,
    /// Whether a save is in flight.
    pub is_saving: bool,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            name_error: None,
            kind: CategoryKind::Expense,
            icon: CategoryIcon::default().name().to_owned(),
            color: Some(Argb::TRANSPARENT),
            color_error: None,
            is_saving: false,
        }
    }
}

/// A change to one field of a [CategoryForm].
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryChange {
    /// The name was edited.
    Name(String),
    /// Expense or income was picked.
    Kind(CategoryKind),
    /// An icon was picked, given by its stored name.
    Icon(String),
    /// A color was picked or cleared.
    Color(Option<Argb>),
}

impl EntityForm for CategoryForm {
    type Entity = Category;
    type Change = CategoryChange;

    fn id(&self) -> Option<DatabaseId> {
        self.id
    }

    fn is_saving(&self) -> bool {
        self.is_saving
    }

    fn set_saving(&mut self, is_saving: bool) {
        self.is_saving = is_saving;
    }

    fn apply(&mut self, change: CategoryChange) {
        match change {
            CategoryChange::Name(name) => {
                self.name = name;
                self.name_error = None;
            }
            CategoryChange::Kind(kind) => {
                self.kind = kind;

                // Expense categories accept any color.
                if kind == CategoryKind::Expense
                    && self.color_error == Some(MessageRef::ColorRequiredForIncome)
                {
                    self.color_error = None;
                }
            }
            CategoryChange::Icon(icon) => {
                self.icon = icon;
            }
            CategoryChange::Color(color) => {
                self.color = color;
                self.color_error = None;
            }
        }
    }

    fn from_entity(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.to_string(),
            kind: category.kind,
            icon: category.icon().name().to_owned(),
            color: category.color,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<Category, Error> {
        let name = EntityName::new(&self.name)?;
        let color = validate_category_color(self.kind, self.color)?;

        Ok(Category {
            id: self.id,
            name,
            kind: self.kind,
            icon: Some(self.icon.clone()),
            color: Some(color),
        })
    }

    fn show_error(&mut self, error: &Error) -> bool {
        match error {
            Error::EmptyName => self.name_error = Some(error.message()),
            Error::MissingColorForExpense | Error::MissingColorForIncome => {
                self.color_error = Some(error.message())
            }
            _ => return false,
        }

        true
    }
}
