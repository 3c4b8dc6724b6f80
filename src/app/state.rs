//! Application state: the single owner of catalog, basket, and draft order.
//!
//! [`AppState`] is the only component allowed to mutate storefront data. Everyone else
//! receives snapshots (clones) through its accessors. Mutations that other components
//! must react to are announced on the event bus:
//!
//! - [`set_products`](AppState::set_products) emits `products-changed`
//! - [`set_order_field`](AppState::set_order_field) emits `form-errors-changed` with the
//!   complete error map
//!
//! Basket mutations report whether anything changed and leave the `basket-changed`
//! emission to the caller, so exactly one notification follows each effective change.
//!
//! # Re-entrancy
//!
//! Handlers reached from an emit read state again (to build render payloads). The
//! internal borrow is therefore always released before emitting.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use storefront::app::AppState;
//! use storefront::domain::{Category, Product};
//! use storefront::events::EventBus;
//!
//! let state = AppState::new(Rc::new(EventBus::new()));
//! let product = Product {
//!     id: "a".into(),
//!     title: "Product A".into(),
//!     description: String::new(),
//!     image: "/a.svg".into(),
//!     category: Category::Other,
//!     price: Some(100),
//! };
//!
//! assert!(state.add_product_to_basket(&product));
//! assert!(!state.add_product_to_basket(&product));
//! assert_eq!(state.total_price(), 100);
//! ```

use crate::domain::{DraftOrder, FormErrors, OrderField, OrderRequest, Product};
use crate::events::names::{FORM_ERRORS_CHANGED, PRODUCTS_CHANGED};
use crate::events::{EventBus, EventPayload};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Default)]
struct StoreData {
    catalog: Vec<Product>,
    basket: Vec<Product>,
    order: DraftOrder,
}

/// Central application state container.
pub struct AppState {
    bus: Rc<EventBus>,
    data: RefCell<StoreData>,
}

impl AppState {
    /// Creates an empty state publishing through `bus`.
    #[must_use]
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            data: RefCell::new(StoreData::default()),
        }
    }

    /// Replaces the catalog wholesale and emits `products-changed`.
    pub fn set_products(&self, products: Vec<Product>) {
        let count = products.len();
        self.data.borrow_mut().catalog = products;
        tracing::debug!(count = count, "catalog replaced");
        self.bus.emit(PRODUCTS_CHANGED, &EventPayload::Empty);
    }

    /// Snapshot of the catalog.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.data.borrow().catalog.clone()
    }

    /// Snapshot of the basket, in insertion order.
    #[must_use]
    pub fn basket(&self) -> Vec<Product> {
        self.data.borrow().basket.clone()
    }

    /// Snapshot of the draft order.
    #[must_use]
    pub fn order(&self) -> DraftOrder {
        self.data.borrow().order.clone()
    }

    /// Catalog product with the given id.
    #[must_use]
    pub fn find_product(&self, id: &str) -> Option<Product> {
        self.data
            .borrow()
            .catalog
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    #[must_use]
    pub fn is_in_basket(&self, id: &str) -> bool {
        self.data.borrow().basket.iter().any(|p| p.id == id)
    }

    #[must_use]
    pub fn basket_len(&self) -> usize {
        self.data.borrow().basket.len()
    }

    /// Adds a product to the basket.
    ///
    /// No-op when the product is already in the basket (by id) or is not for sale.
    ///
    /// # Returns
    ///
    /// `true` if the basket changed.
    pub fn add_product_to_basket(&self, product: &Product) -> bool {
        let _span =
            tracing::debug_span!("add_product_to_basket", product_id = %product.id).entered();

        if !product.is_for_sale() {
            tracing::debug!("product has no price, not added");
            return false;
        }

        let mut data = self.data.borrow_mut();
        if data.basket.iter().any(|p| p.id == product.id) {
            tracing::debug!("product already in basket");
            return false;
        }

        data.basket.push(product.clone());
        tracing::debug!(basket_size = data.basket.len(), "product added to basket");
        true
    }

    /// Removes a product from the basket.
    ///
    /// # Returns
    ///
    /// `true` if the product was in the basket.
    pub fn remove_product_from_basket(&self, product: &Product) -> bool {
        let mut data = self.data.borrow_mut();
        let before = data.basket.len();
        data.basket.retain(|p| p.id != product.id);
        let removed = data.basket.len() != before;

        tracing::debug!(
            product_id = %product.id,
            removed = removed,
            basket_size = data.basket.len(),
            "remove from basket"
        );
        removed
    }

    /// Sum of basket prices; 0 for an empty basket.
    ///
    /// Basket members always have a price, so nothing is skipped here.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.data
            .borrow()
            .basket
            .iter()
            .filter_map(|p| p.price)
            .sum()
    }

    /// Sets one draft-order field and publishes the recomputed error map.
    ///
    /// The whole draft is revalidated, not just `field`, and `form-errors-changed`
    /// carries every currently invalid field: both form steps derive their validity
    /// from the joint state.
    pub fn set_order_field(&self, field: OrderField, value: &str) {
        let errors = {
            let mut data = self.data.borrow_mut();
            data.order.set(field, value);
            data.order.validate()
        };

        tracing::debug!(
            field = %field,
            invalid_fields = ?errors.fields(),
            "order field updated"
        );

        self.bus.emit(FORM_ERRORS_CHANGED, &EventPayload::Errors(errors));
    }

    /// Current validation errors of the draft order.
    #[must_use]
    pub fn form_errors(&self) -> FormErrors {
        self.data.borrow().order.validate()
    }

    /// Payment method and address are already filled in.
    ///
    /// Decides whether reopening the order flow shows the delivery step or skips to
    /// the contacts step.
    #[must_use]
    pub fn is_first_form_fill_complete(&self) -> bool {
        self.data.borrow().order.is_delivery_complete()
    }

    /// Builds the order payload from the draft and the current basket.
    ///
    /// `items` and `total` are derived here, at submission time.
    ///
    /// # Returns
    ///
    /// `None` while no payment method is selected.
    #[must_use]
    pub fn order_request(&self) -> Option<OrderRequest> {
        let data = self.data.borrow();
        let items = data.basket.iter().map(|p| p.id.clone()).collect();
        let total = data.basket.iter().filter_map(|p| p.price).sum();
        data.order.to_request(items, total)
    }

    /// Empties the basket.
    pub fn clear_basket(&self) {
        self.data.borrow_mut().basket.clear();
        tracing::debug!("basket cleared");
    }

    /// Resets the draft order.
    pub fn clear_order(&self) {
        self.data.borrow_mut().order = DraftOrder::default();
        tracing::debug!("draft order cleared");
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}
