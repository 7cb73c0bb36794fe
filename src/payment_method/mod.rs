//! Payment methods record how a transaction was paid, e.g. cash, card or Pix.

mod db;
mod domain;
mod form;

pub use db::{
    PaymentMethodRecord, SQLitePaymentMethodRepository, create_payment_method_table,
    get_all_payment_methods,
};
pub use domain::PaymentMethod;
pub use form::{PaymentMethodChange, PaymentMethodForm};

use crate::ScreenController;

/// The controller behind the payment method screen.
pub type PaymentMethodController =
    ScreenController<PaymentMethodForm, SQLitePaymentMethodRepository>;
