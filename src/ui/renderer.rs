//! View layer boundary and the console renderer.
//!
//! [`View`] is everything the runtime needs from a front end: apply one
//! [`RenderInstruction`]. [`ConsoleRenderer`] implements it for a line-oriented
//! terminal, standing in for a page with a gallery, a header counter, and a modal.
//!
//! The renderer is also a source of UI events. Showing the modal emits `modal-open`;
//! hiding it, whether instructed or by the user, emits `modal-close`.

use crate::app::RenderInstruction;
use crate::domain::Result;
use crate::events::names::{MODAL_CLOSE, MODAL_OPEN};
use crate::events::{EventBus, EventPayload};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    BasketView, CatalogView, ContactsFormView, FormState, FormsView, ModalContent,
    OrderFormView, ProductPreview, ResultView,
};
use std::io::Write;
use std::rc::Rc;

/// Receiver of render instructions.
pub trait View {
    /// Applies one instruction.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn render(&mut self, instruction: &RenderInstruction) -> Result<()>;
}

/// Plain-text front end writing to any [`Write`] sink.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    bus: Rc<EventBus>,
    theme: Theme,
    modal: Option<ModalContent>,
    page_locked: bool,
}

impl<W: Write> ConsoleRenderer<W> {
    #[must_use]
    pub fn new(out: W, bus: Rc<EventBus>, theme: Theme) -> Self {
        Self {
            out,
            bus,
            theme,
            modal: None,
            page_locked: false,
        }
    }

    /// Content currently shown in the modal.
    #[must_use]
    pub const fn modal(&self) -> Option<&ModalContent> {
        self.modal.as_ref()
    }

    #[must_use]
    pub const fn is_page_locked(&self) -> bool {
        self.page_locked
    }

    /// Writes a free-form line, e.g. command feedback.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn notice(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", self.theme.muted(text))?;
        Ok(())
    }

    /// Writes an error line.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn error(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", self.theme.error(text))?;
        Ok(())
    }

    /// Hides the modal on user request. No-op when nothing is shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn close_modal(&mut self) -> Result<()> {
        if self.modal.take().is_none() {
            return Ok(());
        }
        writeln!(self.out, "{}", self.theme.muted("[closed]"))?;
        self.bus.emit(MODAL_CLOSE, &EventPayload::Empty);
        Ok(())
    }

    /// Consumes the renderer and returns its sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn open_modal(&mut self, content: &ModalContent) -> Result<()> {
        let was_open = self.modal.replace(content.clone()).is_some();

        match content {
            ModalContent::Preview(preview) => self.write_preview(preview)?,
            ModalContent::Basket(basket) => self.write_basket(basket)?,
            ModalContent::OrderForm(form) => self.write_order_form(form)?,
            ModalContent::ContactsForm(form) => self.write_contacts_form(form)?,
            ModalContent::Result(result) => self.write_result(result)?,
        }

        if !was_open {
            self.bus.emit(MODAL_OPEN, &EventPayload::Empty);
        }
        Ok(())
    }

    fn write_catalog(&mut self, catalog: &CatalogView) -> Result<()> {
        writeln!(
            self.out,
            "{}",
            self.theme.heading(&format!("Catalog ({} products)", catalog.cards.len()))
        )?;
        for (index, card) in catalog.cards.iter().enumerate() {
            writeln!(
                self.out,
                "{:>3}. {:<40} {:<16} {}",
                index + 1,
                card.title,
                card.category.label(),
                self.theme.price(&card.price)
            )?;
        }
        writeln!(self.out, "{}", self.theme.muted(&format!("Basket: {}", catalog.basket_count)))?;
        Ok(())
    }

    fn write_preview(&mut self, preview: &ProductPreview) -> Result<()> {
        writeln!(self.out, "{}", self.theme.heading(&preview.title))?;
        writeln!(self.out, "  [{}] {}", preview.category.label(), preview.image)?;
        if !preview.description.is_empty() {
            writeln!(self.out, "  {}", preview.description)?;
        }
        writeln!(self.out, "  {}", self.theme.price(&preview.price))?;

        let hint = if preview.in_basket {
            "Already in basket"
        } else if preview.purchasable {
            "`add` to buy"
        } else {
            "Not for sale"
        };
        writeln!(self.out, "  {}", self.theme.muted(hint))?;
        Ok(())
    }

    fn write_basket(&mut self, basket: &BasketView) -> Result<()> {
        writeln!(self.out, "{}", self.theme.heading("Basket"))?;
        if basket.lines.is_empty() {
            writeln!(self.out, "  {}", self.theme.muted("Basket is empty"))?;
        }
        for line in &basket.lines {
            writeln!(
                self.out,
                "{:>3}. {:<40} {}",
                line.index,
                line.title,
                self.theme.price(&line.price)
            )?;
        }
        writeln!(self.out, "  Total: {}", self.theme.price(&basket.total))?;
        if basket.can_order {
            writeln!(self.out, "  {}", self.theme.muted("`order` to check out"))?;
        }
        Ok(())
    }

    fn write_order_form(&mut self, form: &OrderFormView) -> Result<()> {
        writeln!(self.out, "{}", self.theme.heading("Delivery"))?;
        let payment = form.payment.map_or("-", |p| p.as_str());
        writeln!(self.out, "  payment: {payment}")?;
        writeln!(self.out, "  address: {}", form.address)?;
        self.write_form_state(&form.state)
    }

    fn write_contacts_form(&mut self, form: &ContactsFormView) -> Result<()> {
        writeln!(self.out, "{}", self.theme.heading("Contacts"))?;
        writeln!(self.out, "  email: {}", form.email)?;
        writeln!(self.out, "  phone: {}", form.phone)?;
        self.write_form_state(&form.state)
    }

    fn write_form_state(&mut self, state: &FormState) -> Result<()> {
        if state.valid {
            writeln!(self.out, "  {}", self.theme.muted("`next` to continue"))?;
        } else if !state.errors.is_empty() {
            writeln!(self.out, "  {}", self.theme.error(&state.errors))?;
        }
        Ok(())
    }

    /// Only the step on screen reports its state.
    fn write_forms(&mut self, forms: &FormsView) -> Result<()> {
        let state = match self.modal {
            Some(ModalContent::OrderForm(_)) => forms.delivery.clone(),
            Some(ModalContent::ContactsForm(_)) => forms.contacts.clone(),
            _ => return Ok(()),
        };
        self.write_form_state(&state)
    }

    fn write_result(&mut self, result: &ResultView) -> Result<()> {
        let title = if result.succeeded {
            self.theme.success(&result.title)
        } else {
            self.theme.error(&result.title)
        };
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "  {}", result.description)?;
        Ok(())
    }
}

impl<W: Write> View for ConsoleRenderer<W> {
    fn render(&mut self, instruction: &RenderInstruction) -> Result<()> {
        let _span = tracing::trace_span!("render").entered();

        match instruction {
            RenderInstruction::ShowCatalog(catalog) => self.write_catalog(catalog)?,
            RenderInstruction::SetBasketCounter(count) => {
                writeln!(self.out, "{}", self.theme.muted(&format!("Basket: {count}")))?;
            }
            RenderInstruction::OpenModal(content) => self.open_modal(content)?,
            RenderInstruction::CloseModal => self.close_modal()?,
            RenderInstruction::UpdateForms(forms) => self.write_forms(forms)?,
            RenderInstruction::ResetForms => {
                tracing::trace!("forms reset");
            }
            RenderInstruction::LockPage(locked) => {
                self.page_locked = *locked;
            }
        }

        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for ConsoleRenderer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleRenderer")
            .field("modal", &self.modal)
            .field("page_locked", &self.page_locked)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn renderer() -> (Rc<RefCell<Vec<String>>>, ConsoleRenderer<Vec<u8>>) {
        let bus = Rc::new(EventBus::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        for name in [MODAL_OPEN, MODAL_CLOSE] {
            let sink = Rc::clone(&seen);
            bus.subscribe(name, move |_| {
                sink.borrow_mut().push(name.to_string());
                Ok(())
            });
        }
        (seen, ConsoleRenderer::new(Vec::new(), bus, Theme::plain()))
    }

    fn result_modal() -> RenderInstruction {
        RenderInstruction::OpenModal(ModalContent::Result(ResultView {
            succeeded: true,
            title: "Order placed".into(),
            description: "Charged 100 synapses".into(),
        }))
    }

    #[test]
    fn modal_open_is_emitted_once_per_showing() {
        let (seen, mut view) = renderer();
        view.render(&result_modal()).unwrap();
        view.render(&result_modal()).unwrap();
        view.render(&RenderInstruction::CloseModal).unwrap();
        view.render(&RenderInstruction::CloseModal).unwrap();

        assert_eq!(*seen.borrow(), vec![MODAL_OPEN, MODAL_CLOSE]);
        assert!(view.modal().is_none());
    }

    #[test]
    fn user_close_emits_modal_close() {
        let (seen, mut view) = renderer();
        view.render(&result_modal()).unwrap();
        view.close_modal().unwrap();
        assert_eq!(seen.borrow().last().map(String::as_str), Some(MODAL_CLOSE));
    }

    #[test]
    fn writes_result_text() {
        let (_seen, mut view) = renderer();
        view.render(&result_modal()).unwrap();
        let text = String::from_utf8(view.into_inner()).unwrap();
        assert!(text.contains("Order placed"));
        assert!(text.contains("Charged 100 synapses"));
    }

    #[test]
    fn form_errors_only_shown_for_open_step() {
        let (_seen, mut view) = renderer();
        let forms = FormsView {
            delivery: FormState {
                valid: false,
                errors: "Enter a delivery address".into(),
            },
            contacts: FormState {
                valid: false,
                errors: "Enter an email".into(),
            },
        };

        view.render(&RenderInstruction::UpdateForms(forms.clone())).unwrap();
        view.render(&RenderInstruction::OpenModal(ModalContent::ContactsForm(
            ContactsFormView {
                email: String::new(),
                phone: String::new(),
                state: forms.contacts.clone(),
            },
        )))
        .unwrap();
        view.render(&RenderInstruction::UpdateForms(forms)).unwrap();

        let text = String::from_utf8(view.into_inner()).unwrap();
        assert!(!text.contains("delivery address"));
        assert_eq!(text.matches("Enter an email").count(), 2);
    }
}
