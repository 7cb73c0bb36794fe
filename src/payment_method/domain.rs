use serde::{Deserialize, Serialize};

use crate::{DatabaseId, EntityName, PaymentMethodIcon, screen::Identified};

/// A way of paying, such as cash or a credit card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct PaymentMethod {
    /// The database ID, `None` until the payment method has been saved.
    pub id: Option<DatabaseId>,
    /// The unique name of the payment method.
    pub name: EntityName,
    /// The stored icon name, see [PaymentMethod::icon].
    pub icon: Option<String>,
}

impl PaymentMethod {
    /// The icon to draw, falling back to [PaymentMethodIcon::Wallet] for missing or unknown
    /// names.
    pub fn icon(&self) -> PaymentMethodIcon {
        PaymentMethodIcon::from_name(self.icon.as_deref())
    }
}

impl Identified for PaymentMethod {
    fn id(&self) -> Option<DatabaseId> {
        self.id
    }
}
