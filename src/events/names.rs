//! Event names crossing the bus.
//!
//! Fixed names are constants. Form events are namespaced by the form that raised them
//! (`order` for the delivery step, `contacts` for the contacts step):
//! `<form>.<field>:change` for field edits and `<form>:submit` for step submission.

use crate::domain::OrderField;

pub const PRODUCTS_CHANGED: &str = "products-changed";
pub const CATALOG_LOADED: &str = "catalog-loaded";
pub const PRODUCT_OPEN_IN_MODAL: &str = "product-open-in-modal";
pub const PRODUCT_ADD_TO_BASKET: &str = "product-add-to-basket";
pub const PRODUCT_REMOVE_FROM_BASKET: &str = "product-remove-from-basket";
pub const BASKET_OPEN: &str = "basket-open";
pub const BASKET_CHANGED: &str = "basket-changed";
pub const ORDER_START: &str = "order-start";
pub const ORDER_SET_PAYMENT_TYPE: &str = "order-set-payment-type";
pub const ORDER_CLEAR: &str = "order-clear";
pub const ORDER_RESOLVED: &str = "order-resolved";
pub const FORM_ERRORS_CHANGED: &str = "form-errors-changed";
pub const MODAL_OPEN: &str = "modal-open";
pub const MODAL_CLOSE: &str = "modal-close";

/// Namespace of the delivery (payment and address) form.
pub const ORDER_FORM: &str = "order";
/// Namespace of the contacts (email and phone) form.
pub const CONTACTS_FORM: &str = "contacts";
/// Both form namespaces.
pub const FORMS: [&str; 2] = [ORDER_FORM, CONTACTS_FORM];

pub const CHANGE_SUFFIX: &str = ":change";
pub const SUBMIT_SUFFIX: &str = ":submit";

/// Form namespace that owns a field.
#[must_use]
pub const fn form_of(field: OrderField) -> &'static str {
    if field.is_contact() {
        CONTACTS_FORM
    } else {
        ORDER_FORM
    }
}

/// `<form>.<field>:change` for the form owning `field`.
#[must_use]
pub fn field_change(field: OrderField) -> String {
    format!("{}.{field}{CHANGE_SUFFIX}", form_of(field))
}

/// `<form>:submit`.
#[must_use]
pub fn submit(form: &str) -> String {
    format!("{form}{SUBMIT_SUFFIX}")
}
