//! View model types representing renderable UI state.
//!
//! View models are built by the coordinator from state snapshots and handed to the
//! view layer inside [`RenderInstruction`](crate::app::RenderInstruction)s. Each target
//! gets its own struct listing exactly the fields it displays; none of them holds a
//! reference back into application state.

use super::helpers::DisplaySettings;
use crate::domain::{Category, DraftOrder, FormErrors, PaymentMethod, Product};

/// The catalog gallery with the header basket counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub cards: Vec<CardView>,
    pub basket_count: usize,
}

/// One gallery card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub image: String,
    pub category: Category,
    pub price: String,
}

impl CardView {
    #[must_use]
    pub fn new(product: &Product, settings: &DisplaySettings) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            image: settings.image_url(&product.image),
            category: product.category,
            price: settings.price(product.price),
        }
    }
}

/// Product detail shown in the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPreview {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: Category,
    pub price: String,
    /// Already in the basket.
    pub in_basket: bool,
    /// The buy button is enabled: the product has a price and is not in the basket.
    pub purchasable: bool,
}

impl ProductPreview {
    #[must_use]
    pub fn new(product: &Product, in_basket: bool, settings: &DisplaySettings) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            image: settings.image_url(&product.image),
            category: product.category,
            price: settings.price(product.price),
            in_basket,
            purchasable: product.is_for_sale() && !in_basket,
        }
    }
}

/// Basket contents with the order total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketView {
    pub lines: Vec<BasketLine>,
    pub total: String,
    /// Checkout can start: the basket is not empty.
    pub can_order: bool,
}

/// One basket row; `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketLine {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub price: String,
}

impl BasketView {
    #[must_use]
    pub fn new(basket: &[Product], total: u64, settings: &DisplaySettings) -> Self {
        let lines = basket
            .iter()
            .enumerate()
            .map(|(i, product)| BasketLine {
                index: i + 1,
                id: product.id.clone(),
                title: product.title.clone(),
                price: settings.price(product.price),
            })
            .collect();

        Self {
            lines,
            total: settings.amount(total),
            can_order: !basket.is_empty(),
        }
    }
}

/// Validity and error text of one form step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub valid: bool,
    pub errors: String,
}

/// Delivery step: payment method and address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFormView {
    pub payment: Option<PaymentMethod>,
    pub address: String,
    pub state: FormState,
}

/// Contacts step: email and phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsFormView {
    pub email: String,
    pub phone: String,
    pub state: FormState,
}

/// State of both form steps, pushed after every draft mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormsView {
    pub delivery: FormState,
    pub contacts: FormState,
}

impl FormsView {
    #[must_use]
    pub fn new(errors: &FormErrors) -> Self {
        Self {
            delivery: FormState {
                valid: errors.is_delivery_valid(),
                errors: errors.step_messages(false),
            },
            contacts: FormState {
                valid: errors.is_contacts_valid(),
                errors: errors.step_messages(true),
            },
        }
    }
}

impl OrderFormView {
    #[must_use]
    pub fn new(order: &DraftOrder, errors: &FormErrors) -> Self {
        Self {
            payment: order.payment,
            address: order.address.clone(),
            state: FormsView::new(errors).delivery,
        }
    }
}

impl ContactsFormView {
    #[must_use]
    pub fn new(order: &DraftOrder, errors: &FormErrors) -> Self {
        Self {
            email: order.email.clone(),
            phone: order.phone.clone(),
            state: FormsView::new(errors).contacts,
        }
    }
}

/// Final message after a submission resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub succeeded: bool,
    pub title: String,
    pub description: String,
}

/// Content placed into the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalContent {
    Preview(ProductPreview),
    Basket(BasketView),
    OrderForm(OrderFormView),
    ContactsForm(ContactsFormView),
    Result(ResultView),
}
