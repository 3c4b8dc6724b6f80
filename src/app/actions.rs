//! Actions representing side effects queued by the coordinator.
//!
//! Event handlers never touch the view layer or the network directly. They push
//! [`Action`]s into the coordinator's outbox; the runtime drains it, handing render
//! instructions to the [`View`](crate::ui::View) and executing API requests.

use crate::api::ApiRequest;
use crate::ui::viewmodel::{CatalogView, FormsView, ModalContent};

/// Instruction for the external view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderInstruction {
    /// Replace the catalog gallery.
    ShowCatalog(CatalogView),
    /// Update the header basket counter.
    SetBasketCounter(usize),
    /// Show content in the modal, replacing what it showed before.
    OpenModal(ModalContent),
    /// Hide the modal.
    CloseModal,
    /// Update validity and error text of both form steps.
    UpdateForms(FormsView),
    /// Reset form inputs, including the payment method buttons.
    ResetForms,
    /// Lock or unlock page scrolling behind the modal.
    LockPage(bool),
}

/// Side effect to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Render(RenderInstruction),
    PostToApi(ApiRequest),
}

impl From<RenderInstruction> for Action {
    fn from(instruction: RenderInstruction) -> Self {
        Self::Render(instruction)
    }
}

impl From<ApiRequest> for Action {
    fn from(request: ApiRequest) -> Self {
        Self::PostToApi(request)
    }
}
