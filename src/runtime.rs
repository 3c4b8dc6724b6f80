//! Storefront runtime: owns the component graph and executes queued actions.
//!
//! There are no globals. [`Storefront::new`] builds one [`EventBus`], hands it to a
//! fresh [`AppState`], and wires a [`Coordinator`] to both. Front ends emit events on
//! [`bus`](Storefront::bus) and call [`pump`](Storefront::pump), which runs until the
//! coordinator has nothing left to do.
//!
//! Everything here is `!Send`; drive it from a current-thread runtime.

use crate::api::{self, ShopApi};
use crate::app::{Action, AppState, Coordinator};
use crate::domain::Result;
use crate::events::EventBus;
use crate::ui::View;
use crate::Config;
use std::rc::Rc;

/// One shop session.
#[derive(Debug)]
pub struct Storefront {
    bus: Rc<EventBus>,
    state: Rc<AppState>,
    coordinator: Rc<Coordinator>,
}

impl Storefront {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let bus = Rc::new(EventBus::new());
        let state = Rc::new(AppState::new(Rc::clone(&bus)));
        let coordinator = Coordinator::new(
            Rc::clone(&bus),
            Rc::clone(&state),
            config.display_settings(),
            config.keep_basket_on_failure,
        );

        Self {
            bus,
            state,
            coordinator,
        }
    }

    #[must_use]
    pub const fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    #[must_use]
    pub const fn state(&self) -> &Rc<AppState> {
        &self.state
    }

    #[must_use]
    pub const fn coordinator(&self) -> &Rc<Coordinator> {
        &self.coordinator
    }

    /// Queues the initial catalog fetch; call [`pump`](Self::pump) to execute it.
    pub fn start(&self) {
        self.coordinator.load_catalog();
    }

    /// Executes queued actions until none are left.
    ///
    /// Render instructions go to `view` in the order they were queued. API requests are
    /// awaited one at a time and their responses fed back to the coordinator, which may
    /// queue further actions.
    ///
    /// # Returns
    ///
    /// The number of actions executed.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `view`; the rest of that batch is dropped.
    pub async fn pump(&self, api: &dyn ShopApi, view: &mut dyn View) -> Result<usize> {
        let mut executed = 0;

        loop {
            let actions = self.coordinator.take_actions();
            if actions.is_empty() {
                break;
            }

            for action in actions {
                executed += 1;
                match action {
                    Action::Render(instruction) => view.render(&instruction)?,
                    Action::PostToApi(request) => {
                        let response = api::execute(api, request).await;
                        self.coordinator.handle_response(response);
                    }
                }
            }
        }

        tracing::trace!(executed = executed, "actions pumped");
        Ok(executed)
    }
}
