//! The payment method edit form.

use crate::{
    DatabaseId, EntityName, Error, MessageRef, PaymentMethodIcon, payment_method::PaymentMethod,
    screen::EntityForm,
};

/// The unsaved values of the payment method being created or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethodForm {
    /// The ID of the payment method being edited, `None` for a new one.
    pub id: Option<DatabaseId>,
    /// The name as typed by the user.
    pub name: String,
    /// The error to show under the name field.
    pub name_error: Option<MessageRef>,
    /// The stored name of the chosen icon.
    pub icon: String,
    /// Whether a save is in flight.
    pub is_saving: bool,
}

impl Default for PaymentMethodForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            name_error: None,
            icon: PaymentMethodIcon::default().name().to_owned(),
            is_saving: false,
        }
    }
}

/// A change to one field of a [PaymentMethodForm].
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentMethodChange {
    /// The name was edited.
    Name(String),
    /// An icon was picked, given by its stored name.
    Icon(String),
}

impl EntityForm for PaymentMethodForm {
    type Entity = PaymentMethod;
    type Change = PaymentMethodChange;

    fn id(&self) -> Option<DatabaseId> {
        self.id
    }

    fn is_saving(&self) -> bool {
        self.is_saving
    }

    fn set_saving(&mut self, is_saving: bool) {
        self.is_saving = is_saving;
    }

    fn apply(&mut self, change: PaymentMethodChange) {
        match change {
            PaymentMethodChange::Name(name) => {
                self.name = name;
                self.name_error = None;
            }
            PaymentMethodChange::Icon(icon) => {
                self.icon = icon;
            }
        }
    }

    fn from_entity(payment_method: &PaymentMethod) -> Self {
        Self {
            id: payment_method.id,
            name: payment_method.name.to_string(),
            icon: payment_method
                .icon
                .clone()
                .unwrap_or_else(|| PaymentMethodIcon::default().name().to_owned()),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<PaymentMethod, Error> {
        Ok(PaymentMethod {
            id: self.id,
            name: EntityName::new(&self.name)?,
            icon: Some(self.icon.clone()),
        })
    }

    fn show_error(&mut self, error: &Error) -> bool {
        match error {
            Error::EmptyName => {
                self.name_error = Some(error.message());
                true
            }
            _ => false,
        }
    }
}
