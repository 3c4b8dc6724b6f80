//! Draft order, validation, and order submission types.
//!
//! The draft order is assembled across two form steps: delivery (payment method and
//! address) and contacts (email and phone). Validation is presence-based and always
//! recomputed over the whole draft, producing a [`FormErrors`] map that carries an entry
//! only for fields that are currently invalid.

use super::error::StorefrontError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the customer pays for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid by card online.
    Online,
    /// Paid in cash on delivery.
    Cash,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" | "card" => Ok(Self::Online),
            "cash" => Ok(Self::Cash),
            other => Err(StorefrontError::UnknownPayment(other.to_string())),
        }
    }
}

/// Editable fields of the draft order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    Payment,
    Address,
    Email,
    Phone,
}

impl OrderField {
    /// All fields, in form order.
    pub const ALL: [Self; 4] = [Self::Payment, Self::Address, Self::Email, Self::Phone];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Address => "address",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    /// Whether the field belongs to the contacts step rather than the delivery step.
    #[must_use]
    pub const fn is_contact(self) -> bool {
        matches!(self, Self::Email | Self::Phone)
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderField {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| StorefrontError::UnknownField(s.to_string()))
    }
}

/// Order data being filled in by the customer.
///
/// `items` and `total` are not stored here; they are derived from the basket when the
/// order is submitted (see [`DraftOrder::to_request`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftOrder {
    pub payment: Option<PaymentMethod>,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl DraftOrder {
    /// Sets one field from its textual form value.
    ///
    /// An unrecognised payment value unsets the payment method so that validation reports
    /// it as missing.
    pub fn set(&mut self, field: OrderField, value: &str) {
        match field {
            OrderField::Payment => {
                self.payment = value.parse().ok();
            }
            OrderField::Address => value.clone_into(&mut self.address),
            OrderField::Email => value.clone_into(&mut self.email),
            OrderField::Phone => value.clone_into(&mut self.phone),
        }
    }

    /// Returns the textual form value of one field.
    #[must_use]
    pub fn get(&self, field: OrderField) -> &str {
        match field {
            OrderField::Payment => self.payment.map_or("", PaymentMethod::as_str),
            OrderField::Address => &self.address,
            OrderField::Email => &self.email,
            OrderField::Phone => &self.phone,
        }
    }

    /// Validates the whole draft from scratch.
    #[must_use]
    pub fn validate(&self) -> FormErrors {
        let missing = |field: OrderField, message: &str| {
            self.get(field).is_empty().then(|| message.to_string())
        };

        FormErrors {
            payment: missing(OrderField::Payment, "Select a payment method"),
            address: missing(OrderField::Address, "Enter a delivery address"),
            email: missing(OrderField::Email, "Enter an email"),
            phone: missing(OrderField::Phone, "Enter a phone number"),
        }
    }

    /// Payment method and address are both filled in.
    #[must_use]
    pub fn is_delivery_complete(&self) -> bool {
        self.payment.is_some() && !self.address.is_empty()
    }

    /// Builds the submission payload, or `None` while no payment method is chosen.
    #[must_use]
    pub fn to_request(&self, items: Vec<String>, total: u64) -> Option<OrderRequest> {
        Some(OrderRequest {
            payment: self.payment?,
            address: self.address.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            total,
            items,
        })
    }
}

/// Validation messages keyed by field; a key is present only while its field is invalid.
///
/// Serializes to the sparse map shape `{address?, payment?, email?, phone?}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl FormErrors {
    #[must_use]
    pub fn get(&self, field: OrderField) -> Option<&str> {
        match field {
            OrderField::Payment => self.payment.as_deref(),
            OrderField::Address => self.address.as_deref(),
            OrderField::Email => self.email.as_deref(),
            OrderField::Phone => self.phone.as_deref(),
        }
    }

    /// No field is invalid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        OrderField::ALL.into_iter().all(|field| self.get(field).is_none())
    }

    /// Fields that currently carry an error, in form order.
    #[must_use]
    pub fn fields(&self) -> Vec<OrderField> {
        OrderField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_some())
            .collect()
    }

    /// The delivery step (payment and address) is valid.
    #[must_use]
    pub fn is_delivery_valid(&self) -> bool {
        self.payment.is_none() && self.address.is_none()
    }

    /// The contacts step (email and phone) is valid.
    #[must_use]
    pub fn is_contacts_valid(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }

    /// Joined messages of one step's fields.
    #[must_use]
    pub fn step_messages(&self, contacts: bool) -> String {
        OrderField::ALL
            .into_iter()
            .filter(|field| field.is_contact() == contacts)
            .filter_map(|field| self.get(field))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub payment: PaymentMethod,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub total: u64,
    pub items: Vec<String>,
}

/// Response of `POST /order`; `error` signals a business-level rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// How an order submission ended, as seen by the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// The order was placed and the amount charged.
    Accepted { id: String, total: u64 },
    /// The API answered but refused the order.
    Rejected(String),
    /// The request never produced an order result.
    Unreachable(String),
}

impl From<OrderResult> for OrderOutcome {
    fn from(result: OrderResult) -> Self {
        match result.error {
            Some(message) => Self::Rejected(message),
            None => Self::Accepted {
                id: result.id,
                total: result.total,
            },
        }
    }
}
