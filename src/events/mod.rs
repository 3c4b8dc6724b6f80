//! Publish/subscribe event bus connecting state changes to UI updates.
//!
//! # Modules
//!
//! - [`bus`]: The [`EventBus`] broker
//! - [`matcher`]: Exact and structural subscription rules
//! - [`names`]: Event names used by the storefront
//! - [`payload`]: Typed event payloads
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use storefront::events::{EventBus, EventPayload, Matcher};
//!
//! let bus = EventBus::new();
//! let hits = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&hits);
//! bus.subscribe(Matcher::suffix(":change"), move |_| {
//!     counter.set(counter.get() + 1);
//!     Ok(())
//! });
//!
//! bus.emit("order.address:change", &EventPayload::Empty);
//! bus.emit("basket-open", &EventPayload::Empty);
//! assert_eq!(hits.get(), 1);
//! ```

pub mod bus;
pub mod matcher;
pub mod names;
pub mod payload;

pub use bus::{EventBus, SubscriptionId};
pub use matcher::Matcher;
pub use payload::{EventPayload, FieldChange};
