//! Element handler trait definition.

use std::any::Any;

use super::arena::{HandlerArena, HandlerId};
use crate::types::{AttributeMap, QName};

/// Handler chosen for a sub-element by [`ElementHandler::start_sub_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegate {
    /// Nobody handles the sub-element; its whole subtree is skipped.
    Skip,
    /// The current handler also handles the sub-element.
    Current,
    /// Another handler in the arena handles the sub-element.
    To(HandlerId),
}

/// Trait for element handlers.
///
/// A handler is responsible for one element and, through delegation, decides
/// who handles each of its sub-elements. Every method has a default: start
/// and end are no-ops and all sub-elements are skipped, so a handler only
/// implements the events it cares about.
///
/// Handlers live in a [`HandlerArena`] and are referred to by [`HandlerId`];
/// the router never owns them.
pub trait ElementHandler: Any {
    /// The opening tag of an element this handler is responsible for.
    fn start_element(&mut self, _name: &QName, _attributes: &AttributeMap) {}

    /// The closing tag of an element this handler is responsible for.
    ///
    /// Called exactly once for each `start_element` unless parsing fails.
    /// `contents` is the untrimmed character data directly inside the
    /// element; text of sub-elements is not included.
    fn end_element(&mut self, _name: &QName, _contents: &str) {}

    /// The opening tag of a sub-element.
    ///
    /// The returned [`Delegate`] handles all events inside the sub-element.
    fn start_sub_element(&mut self, _name: &QName) -> Delegate {
        Delegate::Skip
    }

    /// The closing tag of a sub-element.
    ///
    /// Called exactly once for each `start_sub_element`, also for skipped
    /// sub-elements. `handler` is the handler that was used for the
    /// sub-element (`Current` resolved to this handler's id), or `None` if
    /// it was skipped. This handler is checked out of `handlers` while the
    /// method runs, so looking up its own id yields nothing.
    fn end_sub_element(
        &mut self,
        _name: &QName,
        _handler: Option<HandlerId>,
        _handlers: &mut HandlerArena,
    ) {
    }
}

/// Storage for the result of a handler.
///
/// Concrete handlers embed a slot and expose it through [`ResultHandler`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSlot<T> {
    value: T,
}

impl<T: Default> ResultSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the current result.
    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Move the result out, leaving the default value behind.
    pub fn take(&mut self) -> T {
        std::mem::take(&mut self.value)
    }

    /// Restore the default value.
    pub fn reset(&mut self) {
        self.value = T::default();
    }
}

/// A handler that produces a result of type `Output`.
pub trait ResultHandler: ElementHandler {
    type Output: Default + 'static;

    fn slot(&self) -> &ResultSlot<Self::Output>;

    fn slot_mut(&mut self) -> &mut ResultSlot<Self::Output>;

    /// Borrow the result without consuming it.
    fn result(&self) -> &Self::Output {
        self.slot().get()
    }

    /// Move the result out. The handler is left in its reset state and can
    /// be reused for the next element.
    fn take_result(&mut self) -> Self::Output {
        self.slot_mut().take()
    }

    /// Restore the default result.
    fn reset(&mut self) {
        self.slot_mut().reset();
    }
}
