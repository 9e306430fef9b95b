//! Handler recording that an element occurred.

use crate::recursive::handler::{ElementHandler, ResultHandler, ResultSlot};
use crate::types::{AttributeMap, QName};

/// Sets its result to `true` when its element starts. Never delegates.
#[derive(Debug, Default)]
pub struct PresenceHandler {
    seen: ResultSlot<bool>,
}

impl PresenceHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ElementHandler for PresenceHandler {
    fn start_element(&mut self, _name: &QName, _attributes: &AttributeMap) {
        self.seen.set(true);
    }
}

impl ResultHandler for PresenceHandler {
    type Output = bool;

    fn slot(&self) -> &ResultSlot<bool> {
        &self.seen
    }

    fn slot_mut(&mut self) -> &mut ResultSlot<bool> {
        &mut self.seen
    }
}
