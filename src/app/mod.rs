//! Application layer: state ownership and flow coordination.
//!
//! This module sits between the runtime (`runtime.rs`) and the domain/events layers.
//!
//! # Architecture
//!
//! ```text
//! UI emit → Coordinator handler → AppState mutation → change event → Actions
//!                  ↑                                                    ↓
//!                  └──────────── ApiResponse ←── runtime ←── PostToApi ─┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects queued by the coordinator
//! - [`coordinator`]: Event handlers and the ordering flow
//! - [`modes`]: Flow phase state machine types
//! - [`state`]: Owner of catalog, basket, and draft order
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use storefront::app::{AppState, Coordinator, FlowPhase};
//! use storefront::events::{names, EventBus, EventPayload};
//! use storefront::ui::helpers::DisplaySettings;
//!
//! let bus = Rc::new(EventBus::new());
//! let state = Rc::new(AppState::new(Rc::clone(&bus)));
//! let coordinator = Coordinator::new(bus.clone(), state, DisplaySettings::default(), false);
//!
//! bus.emit(names::BASKET_OPEN, &EventPayload::Empty);
//! assert_eq!(coordinator.phase(), FlowPhase::Basket);
//! assert_eq!(coordinator.take_actions().len(), 1);
//! ```

pub mod actions;
pub mod coordinator;
pub mod modes;
pub mod state;

pub use actions::{Action, RenderInstruction};
pub use coordinator::Coordinator;
pub use modes::{FlowPhase, OrderStep};
pub use state::AppState;
