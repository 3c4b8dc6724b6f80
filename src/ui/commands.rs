//! Console commands: parsing typed lines and translating them into bus events.
//!
//! Commands play the role of clicks and form inputs. They never touch state directly;
//! each one resolves its arguments against state snapshots and emits the semantic
//! event the coordinator listens for.

use crate::app::AppState;
use crate::domain::{OrderField, PaymentMethod, Product, Result, StorefrontError};
use crate::events::names::{
    field_change, submit, BASKET_OPEN, CONTACTS_FORM, ORDER_FORM, ORDER_SET_PAYMENT_TYPE,
    ORDER_START, PRODUCT_ADD_TO_BASKET, PRODUCT_OPEN_IN_MODAL, PRODUCT_REMOVE_FROM_BASKET,
};
use crate::events::{EventBus, EventPayload, FieldChange};
use crate::ui::renderer::ConsoleRenderer;
use crate::ui::viewmodel::ModalContent;
use std::io::Write;
use std::str::FromStr;

pub const HELP: &str = "\
commands:
  open <n|id>      show a catalog product
  add [n|id]       add the shown (or given) product to the basket
  basket           show the basket
  remove <n|id>    remove a basket line
  order            start checkout
  pay <online|cash>
  address <text>
  email <text>
  phone <text>
  next             submit the form on screen
  close            close the window on screen
  help
  quit";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Add(Option<String>),
    Remove(String),
    Basket,
    Order,
    Pay(PaymentMethod),
    Set(OrderField, String),
    Next,
    Close,
    Help,
    Quit,
}

/// Whether the shell keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl FromStr for Command {
    type Err = StorefrontError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let argument = || {
            if rest.is_empty() {
                Err(StorefrontError::UnknownCommand(line.to_string()))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "open" | "show" => Ok(Self::Open(argument()?)),
            "add" | "buy" => Ok(Self::Add((!rest.is_empty()).then(|| rest.to_string()))),
            "remove" | "rm" => Ok(Self::Remove(argument()?)),
            "basket" | "cart" => Ok(Self::Basket),
            "order" | "checkout" => Ok(Self::Order),
            "pay" => Ok(Self::Pay(argument()?.to_lowercase().parse()?)),
            "address" => Ok(Self::Set(OrderField::Address, rest.to_string())),
            "email" => Ok(Self::Set(OrderField::Email, rest.to_string())),
            "phone" => Ok(Self::Set(OrderField::Phone, rest.to_string())),
            "next" | "submit" => Ok(Self::Next),
            "close" => Ok(Self::Close),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(StorefrontError::UnknownCommand(line.to_string())),
        }
    }
}

/// Finds a product by 1-based position or by id.
fn resolve(products: &[Product], reference: &str) -> Result<Product> {
    let by_index = reference
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| products.get(i));

    by_index
        .or_else(|| products.iter().find(|p| p.id == reference))
        .cloned()
        .ok_or_else(|| StorefrontError::UnknownProduct(reference.to_string()))
}

/// Emits the events a command stands for.
///
/// # Errors
///
/// Returns an error if a product reference does not resolve or the console cannot be
/// written.
pub fn dispatch<W: Write>(
    command: Command,
    bus: &EventBus,
    state: &AppState,
    view: &mut ConsoleRenderer<W>,
) -> Result<Flow> {
    let _span = tracing::debug_span!("dispatch", command = ?command).entered();

    match command {
        Command::Open(reference) => {
            let product = resolve(&state.products(), &reference)?;
            bus.emit(PRODUCT_OPEN_IN_MODAL, &EventPayload::Product(product));
        }
        Command::Add(reference) => {
            let shown = match view.modal() {
                Some(ModalContent::Preview(preview)) => Some(preview.id.clone()),
                _ => None,
            };
            let product = match (reference, shown) {
                (Some(reference), _) => resolve(&state.products(), &reference)?,
                (None, Some(id)) => state
                    .find_product(&id)
                    .ok_or(StorefrontError::UnknownProduct(id))?,
                (None, None) => {
                    view.notice("Open a product first")?;
                    return Ok(Flow::Continue);
                }
            };
            bus.emit(PRODUCT_ADD_TO_BASKET, &EventPayload::Product(product));
        }
        Command::Remove(reference) => {
            let product = resolve(&state.basket(), &reference)?;
            bus.emit(PRODUCT_REMOVE_FROM_BASKET, &EventPayload::Product(product));
        }
        Command::Basket => bus.emit(BASKET_OPEN, &EventPayload::Empty),
        Command::Order => bus.emit(ORDER_START, &EventPayload::Empty),
        Command::Pay(method) => bus.emit(ORDER_SET_PAYMENT_TYPE, &EventPayload::Payment(method)),
        Command::Set(field, value) => bus.emit(
            &field_change(field),
            &EventPayload::Field(FieldChange::new(field, value)),
        ),
        Command::Next => {
            let form = match view.modal() {
                Some(ModalContent::OrderForm(_)) => Some(ORDER_FORM),
                Some(ModalContent::ContactsForm(_)) => Some(CONTACTS_FORM),
                _ => None,
            };
            match form {
                Some(form) => bus.emit(&submit(form), &EventPayload::Empty),
                None => view.notice("No form is open")?,
            }
        }
        Command::Close => view.close_modal()?,
        Command::Help => view.notice(HELP)?,
        Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}
