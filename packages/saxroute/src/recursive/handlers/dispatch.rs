//! Handler routing children by element name.

use std::collections::{HashMap, HashSet};

use crate::recursive::arena::HandlerId;
use crate::recursive::handler::{Delegate, ElementHandler, ResultHandler, ResultSlot};
use crate::types::{AttributeMap, QName};

/// Routes sub-elements to registered handlers by local name.
///
/// Names registered with [`skip`](Self::skip) are skipped silently. Any other
/// unregistered child is skipped too, and its name is recorded in the result
/// so callers can spot elements they do not handle yet.
#[derive(Debug, Default)]
pub struct DispatchHandler {
    routes: HashMap<String, HandlerId>,
    skip_names: HashSet<String>,
    unhandled: ResultSlot<Vec<String>>,
}

impl DispatchHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route children named `name` to `handler`.
    #[must_use]
    pub fn route(mut self, name: &str, handler: HandlerId) -> Self {
        self.routes.insert(name.to_string(), handler);
        self
    }

    /// Skip children named `name` without recording them.
    #[must_use]
    pub fn skip(mut self, name: &str) -> Self {
        self.skip_names.insert(name.to_string());
        self
    }

    /// Handler registered for `name`, if any.
    #[must_use]
    pub fn handler_for(&self, name: &str) -> Option<HandlerId> {
        self.routes.get(name).copied()
    }

    /// Check if children named `name` are skipped silently.
    #[must_use]
    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip_names.contains(name)
    }
}

impl ElementHandler for DispatchHandler {
    fn start_element(&mut self, _name: &QName, _attributes: &AttributeMap) {
        self.unhandled.reset();
    }

    fn start_sub_element(&mut self, name: &QName) -> Delegate {
        let local_name = name.local_name();

        if let Some(&handler) = self.routes.get(local_name) {
            return Delegate::To(handler);
        }
        if !self.skip_names.contains(local_name) {
            tracing::debug!(element = %name, "No handler for element");
            self.unhandled.get_mut().push(local_name.to_string());
        }
        Delegate::Skip
    }
}

impl ResultHandler for DispatchHandler {
    type Output = Vec<String>;

    fn slot(&self) -> &ResultSlot<Vec<String>> {
        &self.unhandled
    }

    fn slot_mut(&mut self) -> &mut ResultSlot<Vec<String>> {
        &mut self.unhandled
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::recursive::handlers::{PresenceHandler, StringHandler};
    use crate::recursive::{parse_recursive, HandlerArena};

    const NOTE: &str = r#"<note xmlns:x="urn:x">
  <to>Tove</to>
  <from>Jani</from>
  <heading>Reminder</heading>
  <x:body>Don't forget me this weekend!</x:body>
</note>"#;

    #[test]
    fn test_dispatch_routes_by_local_name() {
        let mut arena = HandlerArena::new();
        let to = arena.insert(StringHandler::new());
        let body = arena.insert(StringHandler::new());
        let root = arena.insert(
            DispatchHandler::new()
                .route("to", to)
                .route("body", body)
                .skip("from"),
        );

        assert!(parse_recursive(NOTE.as_bytes(), "note.xml", &mut arena, root));
        assert_eq!(arena.result::<StringHandler>(to).map(String::as_str), Some("Tove"));
        assert_eq!(
            arena.result::<StringHandler>(body).map(String::as_str),
            Some("Don't forget me this weekend!")
        );
        assert_eq!(
            arena.result::<DispatchHandler>(root),
            Some(&vec!["heading".to_string()])
        );
    }

    #[test]
    fn test_dispatch_builder() {
        let mut arena = HandlerArena::new();
        let flag = arena.insert(PresenceHandler::new());
        let dispatch = DispatchHandler::new().route("flag", flag).skip("meta");

        assert_eq!(dispatch.handler_for("flag"), Some(flag));
        assert_eq!(dispatch.handler_for("meta"), None);
        assert!(dispatch.is_skipped("meta"));
        assert!(!dispatch.is_skipped("flag"));
    }

    #[test]
    fn test_dispatch_unhandled_reset_per_element() {
        let mut arena = HandlerArena::new();
        let root = arena.insert(DispatchHandler::new());

        assert!(parse_recursive("<a><b/></a>".as_bytes(), "first.xml", &mut arena, root));
        assert!(parse_recursive("<a><c/><d/></a>".as_bytes(), "second.xml", &mut arena, root));
        assert_eq!(
            arena.result::<DispatchHandler>(root),
            Some(&vec!["c".to_string(), "d".to_string()])
        );
    }
}
