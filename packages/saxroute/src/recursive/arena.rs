//! Arena owning the handler instances of a parse.

use std::any::Any;
use std::fmt;

use super::handler::{ElementHandler, ResultHandler};

/// Handle of a handler stored in a [`HandlerArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(usize);

impl HandlerId {
    /// Position of the handler in its arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Externally owned storage for element handlers.
///
/// Handlers are inserted before parsing and addressed by [`HandlerId`]
/// afterwards. The router borrows the arena for the duration of a parse and
/// only ever holds ids, so results stay with the arena owner once parsing
/// finishes.
#[derive(Default)]
pub struct HandlerArena {
    slots: Vec<Option<Box<dyn ElementHandler>>>,
}

impl HandlerArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Store a handler and return its id.
    pub fn insert(&mut self, handler: impl ElementHandler) -> HandlerId {
        let handler: Box<dyn ElementHandler> = Box::new(handler);
        self.slots.push(Some(handler));
        HandlerId(self.slots.len() - 1)
    }

    /// Check if a handler is stored under `id`.
    #[must_use]
    pub fn contains(&self, id: HandlerId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    /// Number of handlers stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the handler stored under `id` as its concrete type.
    ///
    /// Returns `None` if the id is empty or the handler has another type.
    #[must_use]
    pub fn get<H: ElementHandler>(&self, id: HandlerId) -> Option<&H> {
        let handler: &dyn Any = self.slots.get(id.0)?.as_deref()?;
        handler.downcast_ref::<H>()
    }

    /// Mutably borrow the handler stored under `id` as its concrete type.
    pub fn get_mut<H: ElementHandler>(&mut self, id: HandlerId) -> Option<&mut H> {
        let handler: &mut dyn Any = self.slots.get_mut(id.0)?.as_deref_mut()?;
        handler.downcast_mut::<H>()
    }

    /// Remove the handler stored under `id` and return it.
    ///
    /// The handler is left in place if it has another type.
    pub fn remove<H: ElementHandler>(&mut self, id: HandlerId) -> Option<H> {
        if self.get::<H>(id).is_none() {
            return None;
        }
        let handler: Box<dyn Any> = self.slots.get_mut(id.0)?.take()?;
        handler.downcast::<H>().ok().map(|boxed| *boxed)
    }

    /// Borrow the result of a handler.
    #[must_use]
    pub fn result<H: ResultHandler>(&self, id: HandlerId) -> Option<&H::Output> {
        self.get::<H>(id).map(|handler| handler.result())
    }

    /// Move the result out of a handler, leaving it reset.
    pub fn take_result<H: ResultHandler>(&mut self, id: HandlerId) -> Option<H::Output> {
        self.get_mut::<H>(id).map(|handler| handler.take_result())
    }

    /// Reset the result of a handler. Returns `false` if there is no such
    /// handler.
    pub fn reset<H: ResultHandler>(&mut self, id: HandlerId) -> bool {
        match self.get_mut::<H>(id) {
            Some(handler) => {
                handler.reset();
                true
            }
            None => false,
        }
    }

    /// Run `f` with the handler under `id` checked out of the arena.
    ///
    /// The handler gets the rest of the arena while it runs. Returns `None`
    /// if no handler is stored under `id`, including when it is already
    /// checked out.
    pub(crate) fn with_handler<T>(
        &mut self,
        id: HandlerId,
        f: impl FnOnce(&mut dyn ElementHandler, &mut HandlerArena) -> T,
    ) -> Option<T> {
        let mut handler = self.slots.get_mut(id.0)?.take()?;
        let output = f(&mut *handler, self);
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = Some(handler);
        }
        Some(output)
    }
}

impl fmt::Debug for HandlerArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerArena")
            .field("slots", &self.slots.len())
            .field("handlers", &self.len())
            .finish()
    }
}
