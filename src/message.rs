//! References to the messages shown to the user.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A user-facing message.
///
/// The UI resolves these to localized text using [MessageRef::key]. The [Display] text is the
/// English fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum MessageRef {
    /// A name field was left blank.
    EmptyName,
    /// An expense category has no color.
    ColorRequiredForExpense,
    /// An income category has no color or a transparent one.
    ColorRequiredForIncome,
    /// A record could not be saved, e.g. because the name is taken.
    SaveFailed,
    /// A record could not be deleted.
    DeleteFailed,
    /// The list of records could not be loaded.
    LoadFailed,
    /// Something unexpected went wrong.
    OperationFailed,
    /// A record was saved.
    SavedSuccessfully,
    /// A record was deleted.
    DeletedSuccessfully,
}

impl MessageRef {
    /// The key used to look up the localized message.
    pub fn key(self) -> &'static str {
        match self {
            MessageRef::EmptyName => "error_empty_name",
            MessageRef::ColorRequiredForExpense => "error_category_color_required_for_expense",
            MessageRef::ColorRequiredForIncome => "error_category_color_required_for_income",
            MessageRef::SaveFailed => "error_save",
            MessageRef::DeleteFailed => "error_delete",
            MessageRef::LoadFailed => "error_load_records",
            MessageRef::OperationFailed => "error_operation_failed",
            MessageRef::SavedSuccessfully => "message_saved_successfully",
            MessageRef::DeletedSuccessfully => "message_deleted_successfully",
        }
    }
}

impl Display for MessageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            MessageRef::EmptyName => "Name cannot be empty.",
            MessageRef::ColorRequiredForExpense => "Pick a color for expense categories.",
            MessageRef::ColorRequiredForIncome => {
                "Pick a color that is not transparent for income categories."
            }
            MessageRef::SaveFailed => "Could not save. Check that the name is not already in use.",
            MessageRef::DeleteFailed => "Could not delete.",
            MessageRef::LoadFailed => "Could not load the records.",
            MessageRef::OperationFailed => "Something went wrong, please try again.",
            MessageRef::SavedSuccessfully => "Saved.",
            MessageRef::DeletedSuccessfully => "Deleted.",
        };

        write!(f, "{text}")
    }
}
