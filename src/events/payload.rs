//! Payloads carried by emitted events.

use crate::domain::{
    FormErrors, OrderField, OrderOutcome, PaymentMethod, Product, Result, StorefrontError,
};

/// A single field edit: `{ field, value }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: OrderField,
    pub value: String,
}

impl FieldChange {
    #[must_use]
    pub fn new(field: OrderField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Data passed to every handler of an emit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EventPayload {
    #[default]
    Empty,
    Products(Vec<Product>),
    Product(Product),
    Field(FieldChange),
    Payment(PaymentMethod),
    Errors(FormErrors),
    Outcome(OrderOutcome),
}

/// Generates typed accessors that fail with [`StorefrontError::Payload`] on a variant
/// mismatch, so handlers can use `?` on the payload.
macro_rules! payload_accessors {
    ($($name:ident => $variant:ident($ty:ty)),* $(,)?) => {
        impl EventPayload {
            $(
                #[doc = concat!("Borrows the `", stringify!($variant), "` payload of `event`.")]
                pub fn $name(&self, event: &str) -> Result<&$ty> {
                    match self {
                        Self::$variant(inner) => Ok(inner),
                        _ => Err(StorefrontError::Payload {
                            event: event.to_string(),
                            expected: stringify!($variant),
                        }),
                    }
                }
            )*
        }
    };
}

payload_accessors! {
    products => Products(Vec<Product>),
    product => Product(Product),
    field => Field(FieldChange),
    payment => Payment(PaymentMethod),
    errors => Errors(FormErrors),
    outcome => Outcome(OrderOutcome),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_mismatch_names_event_and_variant() {
        let err = EventPayload::Empty.product("product-open-in-modal").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected payload for `product-open-in-modal`: expected Product"
        );
    }

    #[test]
    fn accessor_returns_inner_value() {
        let payload = EventPayload::Field(FieldChange::new(OrderField::Email, "a@b.c"));
        let change = payload.field("contacts.email:change").unwrap();
        assert_eq!(change.field, OrderField::Email);
        assert_eq!(change.value, "a@b.c");
    }
}
