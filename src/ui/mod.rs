//! View layer: view models, the [`View`] boundary, and the console front end.
//!
//! ```text
//! Coordinator → RenderInstruction(view model) → View::render → output
//!                                                    │
//!                        modal-open / modal-close ←──┘
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Typed view models, one per render target
//! - [`renderer`]: [`View`] trait and [`ConsoleRenderer`]
//! - [`commands`]: Console command parsing and dispatch to bus events
//! - [`helpers`]: Price and image URL formatting
//! - [`theme`]: Console colors

pub mod commands;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use commands::{dispatch, Command, Flow};
pub use helpers::DisplaySettings;
pub use renderer::{ConsoleRenderer, View};
pub use theme::Theme;
pub use viewmodel::{
    BasketLine, BasketView, CardView, CatalogView, ContactsFormView, FormState, FormsView,
    ModalContent, OrderFormView, ProductPreview, ResultView,
};
