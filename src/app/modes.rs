//! Flow state types for the ordering state machine.
//!
//! The coordinator tracks where the customer is in the ordering flow:
//!
//! ```text
//! Browsing → ProductDetail → Basket → Order(Delivery) → Order(Contacts)
//!     ↑                                                        │
//!     └──────────── Completed ← Submitting ←──────────────────┘
//! ```
//!
//! Closing the modal returns to `Browsing` from anywhere except `Submitting`, which
//! only ends when the submission resolves.

/// Step of the two-step order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStep {
    /// Payment method and delivery address.
    Delivery,
    /// Email and phone.
    Contacts,
}

/// Current position in the ordering flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowPhase {
    /// Catalog visible, no modal.
    #[default]
    Browsing,
    /// A product preview is open.
    ProductDetail,
    /// The basket is open.
    Basket,
    /// One of the order form steps is open.
    Order(OrderStep),
    /// An order request was sent and nothing else has been opened since.
    Submitting,
    /// The submission result is shown.
    Completed,
}

impl FlowPhase {
    /// Phase after the modal is closed.
    #[must_use]
    pub const fn after_modal_close(self) -> Self {
        match self {
            Self::Submitting => Self::Submitting,
            _ => Self::Browsing,
        }
    }
}
