//! Handler collecting the results of its children.

use std::marker::PhantomData;

use crate::recursive::arena::{HandlerArena, HandlerId};
use crate::recursive::handler::{Delegate, ElementHandler, ResultHandler, ResultSlot};
use crate::types::{AttributeMap, QName};

/// Delegates every child to one shared item handler and collects the item
/// results in document order.
///
/// The item handler is reused for all siblings. After each child closes, its
/// result is moved out with [`ResultHandler::take_result`] and the item
/// handler is then reset through [`HandlerArena::reset`], so the next sibling
/// starts from the default result. Skipped children add nothing.
#[derive(Debug)]
pub struct ListHandler<H: ResultHandler> {
    item: HandlerId,
    items: ResultSlot<Vec<H::Output>>,
    _item_type: PhantomData<fn() -> H>,
}

impl<H: ResultHandler> ListHandler<H> {
    /// Create a list over the item handler stored under `item`.
    #[must_use]
    pub fn new(item: HandlerId) -> Self {
        Self {
            item,
            items: ResultSlot::new(),
            _item_type: PhantomData,
        }
    }

    #[must_use]
    pub fn item(&self) -> HandlerId {
        self.item
    }
}

impl<H: ResultHandler> ElementHandler for ListHandler<H> {
    fn start_element(&mut self, _name: &QName, _attributes: &AttributeMap) {
        self.items.reset();
    }

    fn start_sub_element(&mut self, _name: &QName) -> Delegate {
        Delegate::To(self.item)
    }

    fn end_sub_element(
        &mut self,
        name: &QName,
        handler: Option<HandlerId>,
        handlers: &mut HandlerArena,
    ) {
        let Some(id) = handler else {
            return;
        };
        let item = handlers.take_result::<H>(id);
        handlers.reset::<H>(id);

        match item {
            Some(item) => self.items.get_mut().push(item),
            None => tracing::warn!(
                element = %name,
                handler = %id,
                "List item handler missing or of another type"
            ),
        }
    }
}

impl<H: ResultHandler> ResultHandler for ListHandler<H> {
    type Output = Vec<H::Output>;

    fn slot(&self) -> &ResultSlot<Self::Output> {
        &self.items
    }

    fn slot_mut(&mut self) -> &mut ResultSlot<Self::Output> {
        &mut self.items
    }
}
