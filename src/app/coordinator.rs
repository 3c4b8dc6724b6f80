//! Event coordination: turns bus events into state mutations and queued actions.
//!
//! The coordinator subscribes to both UI-originated events (`product-open-in-modal`,
//! `order.address:change`, `contacts:submit`, ...) and state change notifications
//! (`products-changed`, `form-errors-changed`, ...). It mutates data only through
//! [`AppState`] methods and never renders or performs I/O itself: every side effect is
//! pushed to an outbox as an [`Action`] and drained by the runtime.
//!
//! # Flow
//!
//! ```text
//! UI emit → handler → AppState mutation → change event → handler → Action::Render
//!                          │
//!                          └→ Action::PostToApi → runtime → handle_response → emit
//! ```
//!
//! # Submission
//!
//! `order:submit` and `contacts:submit` share one handler. An incomplete draft re-emits
//! `order-start`, which opens whichever step still needs input. A complete draft queues
//! exactly one `POST /order` and enters [`FlowPhase::Submitting`]. Until `order-resolved`
//! arrives the order is in flight: further submits, `order-start`, basket edits and draft
//! edits are ignored, whatever the customer navigates to in the meantime.

use crate::api::{ApiRequest, ApiResponse};
use crate::app::actions::{Action, RenderInstruction};
use crate::app::modes::{FlowPhase, OrderStep};
use crate::app::state::AppState;
use crate::domain::{OrderField, OrderOutcome, Result};
use crate::events::names::{
    BASKET_CHANGED, BASKET_OPEN, CATALOG_LOADED, CHANGE_SUFFIX, FORMS, FORM_ERRORS_CHANGED,
    MODAL_CLOSE, MODAL_OPEN, ORDER_CLEAR, ORDER_RESOLVED, ORDER_SET_PAYMENT_TYPE, ORDER_START,
    PRODUCTS_CHANGED, PRODUCT_ADD_TO_BASKET, PRODUCT_OPEN_IN_MODAL, PRODUCT_REMOVE_FROM_BASKET,
    SUBMIT_SUFFIX,
};
use crate::events::{EventBus, EventPayload, Matcher, SubscriptionId};
use crate::ui::helpers::DisplaySettings;
use crate::ui::viewmodel::{
    BasketView, CardView, CatalogView, ContactsFormView, FormsView, ModalContent,
    OrderFormView, ProductPreview, ResultView,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Handler = fn(&Coordinator, &EventPayload) -> Result<()>;

/// Orchestrates the ordering flow on top of [`EventBus`] and [`AppState`].
pub struct Coordinator {
    bus: Rc<EventBus>,
    state: Rc<AppState>,
    settings: DisplaySettings,
    keep_basket_on_failure: bool,
    phase: Cell<FlowPhase>,
    in_flight: Cell<bool>,
    outbox: RefCell<Vec<Action>>,
    subscriptions: RefCell<Vec<SubscriptionId>>,
}

impl Coordinator {
    /// Creates a coordinator and subscribes its handlers on `bus`.
    ///
    /// Handlers hold a weak reference; dropping the returned `Rc` unsubscribes them.
    ///
    /// # Parameters
    ///
    /// * `keep_basket_on_failure` - when `true`, an order refused by the shop leaves the
    ///   basket and draft intact instead of clearing them
    #[must_use]
    pub fn new(
        bus: Rc<EventBus>,
        state: Rc<AppState>,
        settings: DisplaySettings,
        keep_basket_on_failure: bool,
    ) -> Rc<Self> {
        let coordinator = Rc::new(Self {
            bus,
            state,
            settings,
            keep_basket_on_failure,
            phase: Cell::new(FlowPhase::default()),
            in_flight: Cell::new(false),
            outbox: RefCell::new(Vec::new()),
            subscriptions: RefCell::new(Vec::new()),
        });
        coordinator.wire();
        coordinator
    }

    fn wire(self: &Rc<Self>) {
        self.on(PRODUCTS_CHANGED, PRODUCTS_CHANGED, Self::on_products_changed);
        self.on(CATALOG_LOADED, CATALOG_LOADED, Self::on_catalog_loaded);
        self.on(PRODUCT_OPEN_IN_MODAL, PRODUCT_OPEN_IN_MODAL, Self::on_open_product);
        self.on(PRODUCT_ADD_TO_BASKET, PRODUCT_ADD_TO_BASKET, Self::on_add_to_basket);
        self.on(
            PRODUCT_REMOVE_FROM_BASKET,
            PRODUCT_REMOVE_FROM_BASKET,
            Self::on_remove_from_basket,
        );
        self.on(BASKET_OPEN, BASKET_OPEN, Self::on_basket_open);
        self.on(BASKET_CHANGED, BASKET_CHANGED, Self::on_basket_changed);
        self.on(ORDER_START, ORDER_START, Self::on_order_start);
        self.on(ORDER_SET_PAYMENT_TYPE, ORDER_SET_PAYMENT_TYPE, Self::on_payment_type);
        self.on(
            "<form>.<field>:change",
            Matcher::member(FORMS, CHANGE_SUFFIX),
            Self::on_field_change,
        );
        self.on(FORM_ERRORS_CHANGED, FORM_ERRORS_CHANGED, Self::on_form_errors);
        self.on(
            "<form>:submit",
            Matcher::scoped(FORMS, SUBMIT_SUFFIX),
            Self::on_submit,
        );
        self.on(ORDER_RESOLVED, ORDER_RESOLVED, Self::on_order_resolved);
        self.on(ORDER_CLEAR, ORDER_CLEAR, Self::on_order_clear);
        self.on(MODAL_OPEN, MODAL_OPEN, Self::on_modal_open);
        self.on(MODAL_CLOSE, MODAL_CLOSE, Self::on_modal_close);

        tracing::debug!(
            subscriptions = self.subscriptions.borrow().len(),
            "coordinator wired"
        );
    }

    /// Subscribes `handler` under `matcher`, wrapped in a `handle_event` span.
    fn on(self: &Rc<Self>, label: &'static str, matcher: impl Into<Matcher>, handler: Handler) {
        let this: Weak<Self> = Rc::downgrade(self);
        let id = self.bus.subscribe(matcher, move |payload| {
            let Some(coordinator) = this.upgrade() else {
                return Ok(());
            };
            let _span = tracing::debug_span!("handle_event", event = label).entered();
            handler(&coordinator, payload)
        });
        self.subscriptions.borrow_mut().push(id);
    }

    /// Queues the initial catalog fetch.
    pub fn load_catalog(&self) {
        self.push(ApiRequest::FetchProducts);
    }

    /// Drains queued actions in the order they were produced.
    #[must_use]
    pub fn take_actions(&self) -> Vec<Action> {
        std::mem::take(&mut *self.outbox.borrow_mut())
    }

    /// Current position in the ordering flow.
    #[must_use]
    pub fn phase(&self) -> FlowPhase {
        self.phase.get()
    }

    /// Whether an order request is waiting for its response.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.get()
    }

    /// Feeds a completed API call back into the flow.
    ///
    /// A loaded catalog is emitted as `catalog-loaded`, any order response as
    /// `order-resolved`. A failed catalog fetch only logs: the catalog stays as it was.
    pub fn handle_response(&self, response: ApiResponse) {
        let _span = tracing::debug_span!("handle_response").entered();

        if let Some(outcome) = response.order_outcome() {
            self.bus.emit(ORDER_RESOLVED, &EventPayload::Outcome(outcome));
            return;
        }

        match response {
            ApiResponse::ProductsLoaded(list) => {
                tracing::info!(count = list.items.len(), "catalog loaded");
                self.bus
                    .emit(CATALOG_LOADED, &EventPayload::Products(list.items));
            }
            ApiResponse::ProductsFailed { message } => {
                tracing::warn!(error = %message, "catalog unavailable, keeping current products");
            }
            ApiResponse::OrderPlaced(_)
            | ApiResponse::OrderRejected { .. }
            | ApiResponse::OrderFailed { .. } => {}
        }
    }

    fn push(&self, action: impl Into<Action>) {
        self.outbox.borrow_mut().push(action.into());
    }

    fn render(&self, instruction: RenderInstruction) {
        self.push(instruction);
    }

    fn open_modal(&self, phase: FlowPhase, content: ModalContent) {
        self.phase.set(phase);
        self.render(RenderInstruction::OpenModal(content));
    }

    fn close_modal(&self) {
        self.phase.set(self.phase.get().after_modal_close());
        self.render(RenderInstruction::CloseModal);
    }

    /// Returns `true` (and logs) when an order is in flight and `event` must not touch
    /// the basket or draft.
    fn frozen(&self, event: &str) -> bool {
        if self.in_flight.get() {
            tracing::warn!(event = event, "order in flight, ignoring");
        }
        self.in_flight.get()
    }

    fn basket_view(&self) -> BasketView {
        BasketView::new(&self.state.basket(), self.state.total_price(), &self.settings)
    }

    fn on_catalog_loaded(&self, payload: &EventPayload) -> Result<()> {
        let products = payload.products(CATALOG_LOADED)?;
        self.state.set_products(products.clone());
        Ok(())
    }

    fn on_products_changed(&self, _payload: &EventPayload) -> Result<()> {
        let cards = self
            .state
            .products()
            .iter()
            .map(|product| CardView::new(product, &self.settings))
            .collect();
        self.render(RenderInstruction::ShowCatalog(CatalogView {
            cards,
            basket_count: self.state.basket_len(),
        }));
        Ok(())
    }

    fn on_open_product(&self, payload: &EventPayload) -> Result<()> {
        let product = payload.product(PRODUCT_OPEN_IN_MODAL)?;
        let in_basket = self.state.is_in_basket(&product.id);
        tracing::debug!(product_id = %product.id, in_basket = in_basket, "opening preview");

        self.open_modal(
            FlowPhase::ProductDetail,
            ModalContent::Preview(ProductPreview::new(product, in_basket, &self.settings)),
        );
        Ok(())
    }

    fn on_add_to_basket(&self, payload: &EventPayload) -> Result<()> {
        let product = payload.product(PRODUCT_ADD_TO_BASKET)?;
        if self.frozen(PRODUCT_ADD_TO_BASKET) {
            return Ok(());
        }
        if !product.is_for_sale() {
            tracing::warn!(product_id = %product.id, "product is not for sale");
            return Ok(());
        }

        if self.state.add_product_to_basket(product) {
            self.bus.emit(BASKET_CHANGED, &EventPayload::Empty);
        }
        self.close_modal();
        Ok(())
    }

    fn on_remove_from_basket(&self, payload: &EventPayload) -> Result<()> {
        let product = payload.product(PRODUCT_REMOVE_FROM_BASKET)?;
        if self.frozen(PRODUCT_REMOVE_FROM_BASKET) {
            return Ok(());
        }
        if self.state.remove_product_from_basket(product) {
            self.bus.emit(BASKET_CHANGED, &EventPayload::Empty);
        }
        Ok(())
    }

    fn on_basket_open(&self, _payload: &EventPayload) -> Result<()> {
        self.open_modal(FlowPhase::Basket, ModalContent::Basket(self.basket_view()));
        Ok(())
    }

    fn on_basket_changed(&self, _payload: &EventPayload) -> Result<()> {
        self.render(RenderInstruction::SetBasketCounter(self.state.basket_len()));
        if self.phase.get() == FlowPhase::Basket {
            self.render(RenderInstruction::OpenModal(ModalContent::Basket(
                self.basket_view(),
            )));
        }
        Ok(())
    }

    fn on_order_start(&self, _payload: &EventPayload) -> Result<()> {
        if self.frozen(ORDER_START) {
            return Ok(());
        }
        if self.state.basket_len() == 0 {
            tracing::debug!("basket is empty, order not started");
            return Ok(());
        }

        let order = self.state.order();
        let errors = self.state.form_errors();

        if self.state.is_first_form_fill_complete() {
            self.open_modal(
                FlowPhase::Order(OrderStep::Contacts),
                ModalContent::ContactsForm(ContactsFormView::new(&order, &errors)),
            );
        } else {
            self.open_modal(
                FlowPhase::Order(OrderStep::Delivery),
                ModalContent::OrderForm(OrderFormView::new(&order, &errors)),
            );
        }
        Ok(())
    }

    fn on_payment_type(&self, payload: &EventPayload) -> Result<()> {
        let method = payload.payment(ORDER_SET_PAYMENT_TYPE)?;
        if self.frozen(ORDER_SET_PAYMENT_TYPE) {
            return Ok(());
        }
        self.state.set_order_field(OrderField::Payment, method.as_str());
        Ok(())
    }

    fn on_field_change(&self, payload: &EventPayload) -> Result<()> {
        let change = payload.field("<form>.<field>:change")?;
        if self.frozen("<form>.<field>:change") {
            return Ok(());
        }
        self.state.set_order_field(change.field, &change.value);
        Ok(())
    }

    fn on_form_errors(&self, payload: &EventPayload) -> Result<()> {
        let errors = payload.errors(FORM_ERRORS_CHANGED)?;
        self.render(RenderInstruction::UpdateForms(FormsView::new(errors)));
        Ok(())
    }

    fn on_submit(&self, _payload: &EventPayload) -> Result<()> {
        if self.frozen("<form>:submit") {
            return Ok(());
        }

        let errors = self.state.form_errors();
        if !errors.is_empty() {
            tracing::debug!(invalid_fields = ?errors.fields(), "draft incomplete");
            self.bus.emit(ORDER_START, &EventPayload::Empty);
            return Ok(());
        }

        if self.state.basket_len() == 0 {
            tracing::warn!("basket is empty, nothing to submit");
            return Ok(());
        }

        let Some(request) = self.state.order_request() else {
            tracing::warn!("draft order has no payment method");
            return Ok(());
        };

        tracing::info!(
            items = request.items.len(),
            total = request.total,
            payment = %request.payment,
            "submitting order"
        );
        self.in_flight.set(true);
        self.phase.set(FlowPhase::Submitting);
        self.push(ApiRequest::CreateOrder(request));
        Ok(())
    }

    fn on_order_resolved(&self, payload: &EventPayload) -> Result<()> {
        let outcome = payload.outcome(ORDER_RESOLVED)?;
        self.in_flight.set(false);

        let (view, clear) = match outcome {
            OrderOutcome::Accepted { id, total } => {
                tracing::info!(order_id = %id, total = total, "order placed");
                (
                    ResultView {
                        succeeded: true,
                        title: "Order placed".to_string(),
                        description: format!("Charged {}", self.settings.amount(*total)),
                    },
                    true,
                )
            }
            OrderOutcome::Rejected(message) => {
                tracing::warn!(error = %message, "order rejected");
                (failure(message), !self.keep_basket_on_failure)
            }
            OrderOutcome::Unreachable(message) => {
                tracing::warn!(error = %message, "order not delivered");
                (failure(message), false)
            }
        };

        self.open_modal(FlowPhase::Completed, ModalContent::Result(view));
        if clear {
            self.bus.emit(ORDER_CLEAR, &EventPayload::Empty);
        }
        Ok(())
    }

    fn on_order_clear(&self, _payload: &EventPayload) -> Result<()> {
        if self.frozen(ORDER_CLEAR) {
            return Ok(());
        }
        let had_items = self.state.basket_len() > 0;
        self.state.clear_basket();
        self.state.clear_order();
        self.render(RenderInstruction::ResetForms);

        if had_items {
            self.bus.emit(BASKET_CHANGED, &EventPayload::Empty);
        }
        Ok(())
    }

    fn on_modal_open(&self, _payload: &EventPayload) -> Result<()> {
        self.render(RenderInstruction::LockPage(true));
        Ok(())
    }

    fn on_modal_close(&self, _payload: &EventPayload) -> Result<()> {
        self.phase.set(self.phase.get().after_modal_close());
        self.render(RenderInstruction::LockPage(false));
        Ok(())
    }
}

fn failure(message: &str) -> ResultView {
    ResultView {
        succeeded: false,
        title: "Order failed".to_string(),
        description: message.to_string(),
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        for id in self.subscriptions.get_mut().drain(..) {
            self.bus.unsubscribe(id);
        }
    }
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("phase", &self.phase.get())
            .field("in_flight", &self.in_flight.get())
            .field("keep_basket_on_failure", &self.keep_basket_on_failure)
            .field("queued", &self.outbox.borrow().len())
            .finish_non_exhaustive()
    }
}
