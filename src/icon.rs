//! Icons for categories and payment methods.
//!
//! Records store their icon as a plain string so that values written by newer versions of the
//! app can still be read. Unknown or missing names fall back to a wallet icon when displayed.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The glyphs the UI knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[allow(missing_docs)]
pub enum Icon {
    AccountBalanceWallet,
    Category,
    CreditCard,
    CreditCardOutlined,
    CurrencyExchange,
    LocalAtm,
    QrCode,
    ReceiptLong,
}

/// Icons that can be picked for a category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[allow(missing_docs)]
pub enum CategoryIcon {
    /// The fallback for missing or unknown icons.
    #[default]
    Wallet,
    Cash,
    Category,
    CreditCard,
    Transfer,
    Receipt,
}

impl CategoryIcon {
    /// Every category icon, in the order they are offered to the user.
    pub const ALL: [CategoryIcon; 6] = [
        CategoryIcon::Wallet,
        CategoryIcon::Cash,
        CategoryIcon::Category,
        CategoryIcon::CreditCard,
        CategoryIcon::Transfer,
        CategoryIcon::Receipt,
    ];

    /// The name stored in the database.
    pub fn name(self) -> &'static str {
        match self {
            CategoryIcon::Wallet => "WALLET",
            CategoryIcon::Cash => "CASH",
            CategoryIcon::Category => "CATEGORY",
            CategoryIcon::CreditCard => "CREDIT_CARD",
            CategoryIcon::Transfer => "TRANSFER",
            CategoryIcon::Receipt => "RECEIPT",
        }
    }

    /// Look up an icon by its stored name, ignoring case.
    ///
    /// Returns [CategoryIcon::Wallet] if `name` is missing or not recognised.
    pub fn from_name(name: Option<&str>) -> Self {
        lookup(&Self::ALL, Self::name, name)
    }

    /// The glyph to draw for this icon.
    pub fn icon(self) -> Icon {
        match self {
            CategoryIcon::Wallet => Icon::AccountBalanceWallet,
            CategoryIcon::Cash => Icon::LocalAtm,
            CategoryIcon::Category => Icon::Category,
            CategoryIcon::CreditCard => Icon::CreditCard,
            CategoryIcon::Transfer => Icon::CurrencyExchange,
            CategoryIcon::Receipt => Icon::ReceiptLong,
        }
    }
}

impl Display for CategoryIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Icons that can be picked for a payment method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[allow(missing_docs)]
pub enum PaymentMethodIcon {
    /// The fallback for missing or unknown icons.
    #[default]
    Wallet,
    Cash,
    CreditCard,
    Pix,
    BankSlip,
    Transfer,
}

impl PaymentMethodIcon {
    /// Every payment method icon, in the order they are offered to the user.
    pub const ALL: [PaymentMethodIcon; 6] = [
        PaymentMethodIcon::Wallet,
        PaymentMethodIcon::Cash,
        PaymentMethodIcon::CreditCard,
        PaymentMethodIcon::Pix,
        PaymentMethodIcon::BankSlip,
        PaymentMethodIcon::Transfer,
    ];

    /// The name stored in the database.
    pub fn name(self) -> &'static str {
        match self {
            PaymentMethodIcon::Wallet => "WALLET",
            PaymentMethodIcon::Cash => "CASH",
            PaymentMethodIcon::CreditCard => "CREDIT_CARD",
            PaymentMethodIcon::Pix => "PIX",
            PaymentMethodIcon::BankSlip => "BANK_SLIP",
            PaymentMethodIcon::Transfer => "TRANSFER",
        }
    }

    /// Look up an icon by its stored name, ignoring case.
    ///
    /// Returns [PaymentMethodIcon::Wallet] if `name` is missing or not recognised.
    pub fn from_name(name: Option<&str>) -> Self {
        lookup(&Self::ALL, Self::name, name)
    }

    /// The glyph to draw for this icon.
    pub fn icon(self) -> Icon {
        match self {
            PaymentMethodIcon::Wallet => Icon::CreditCardOutlined,
            PaymentMethodIcon::Cash => Icon::LocalAtm,
            PaymentMethodIcon::CreditCard => Icon::CreditCard,
            PaymentMethodIcon::Pix => Icon::QrCode,
            PaymentMethodIcon::BankSlip => Icon::ReceiptLong,
            PaymentMethodIcon::Transfer => Icon::CurrencyExchange,
        }
    }
}

impl Display for PaymentMethodIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn lookup<T: Copy + Default>(all: &[T], name_of: fn(T) -> &'static str, name: Option<&str>) -> T {
    let Some(name) = name else {
        return T::default();
    };

    all.iter()
        .copied()
        .find(|icon| name_of(*icon).eq_ignore_ascii_case(name))
        .unwrap_or_default()
}
