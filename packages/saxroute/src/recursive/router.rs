//! Router that turns flat SAX events into calls on recursive handlers.

use std::fmt;

use super::arena::{HandlerArena, HandlerId};
use super::handler::Delegate;
use crate::sax::SaxHandler;
use crate::types::{AttributeMap, NamespaceMap, QName, XmlError};

/// One open element: its handler (if any) and its direct text.
#[derive(Debug)]
struct Frame {
    handler: Option<HandlerId>,
    contents: String,
}

/// A [`SaxHandler`] that dispatches events to [`ElementHandler`]s.
///
/// The router keeps one frame per open element. The first element of the
/// document is the root element: it goes straight to the root handler through
/// `start_element`/`end_element`, without a `start_sub_element` call. Every
/// later element is offered to the handler of its parent frame.
///
/// A frame is pushed for every element, also when nobody handles it, so the
/// frame count always equals the nesting depth.
///
/// Tokenizer errors are collected in [`errors`](Self::errors); they do not
/// unwind the frames.
///
/// [`ElementHandler`]: super::ElementHandler
pub struct RecursiveRouter<'a> {
    handlers: &'a mut HandlerArena,
    root: HandlerId,
    frames: Vec<Frame>,
    errors: Vec<XmlError>,
}

impl<'a> RecursiveRouter<'a> {
    /// Create a router delivering the root element to `root`.
    pub fn new(handlers: &'a mut HandlerArena, root: HandlerId) -> Self {
        Self {
            handlers,
            root,
            frames: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Current nesting depth; 0 outside the root element.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Errors reported by the tokenizer so far.
    #[must_use]
    pub fn errors(&self) -> &[XmlError] {
        &self.errors
    }

    /// Take ownership of the collected errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<XmlError> {
        self.errors
    }

    /// Ask `parent` who handles the sub-element `name`.
    fn delegate(&mut self, parent: HandlerId, name: &QName) -> Option<HandlerId> {
        let delegate = self
            .handlers
            .with_handler(parent, |handler, _| handler.start_sub_element(name))?;

        match delegate {
            Delegate::Skip => {
                tracing::debug!(
                    element = %name,
                    parent = %parent,
                    depth = self.frames.len() + 1,
                    "Skipping subtree"
                );
                None
            }
            Delegate::Current => Some(parent),
            Delegate::To(id) => Some(id),
        }
    }

    /// Run `f` on a handler, logging when it is not in the arena.
    fn deliver(
        &mut self,
        id: HandlerId,
        name: &QName,
        f: impl FnOnce(&mut dyn super::ElementHandler, &mut HandlerArena),
    ) {
        if self.handlers.with_handler(id, f).is_none() {
            tracing::warn!(handler = %id, element = %name, "Handler not found in arena");
        }
    }
}

/// Abort on misuse of the router by its caller.
///
/// Continuing would leave frames behind that corrupt the next parse.
#[cold]
#[track_caller]
#[allow(clippy::panic)]
fn contract_violation(args: fmt::Arguments<'_>) -> ! {
    panic!("recursive router contract violation: {args}")
}

impl SaxHandler for RecursiveRouter<'_> {
    fn start_document(&mut self) {
        if !self.frames.is_empty() {
            contract_violation(format_args!(
                "document started with {} open frames",
                self.frames.len()
            ));
        }
    }

    fn end_document(&mut self) {
        if !self.frames.is_empty() {
            contract_violation(format_args!(
                "document ended with {} open frames",
                self.frames.len()
            ));
        }
    }

    fn start_element(&mut self, name: &QName, _namespaces: &NamespaceMap, attributes: &AttributeMap) {
        let handler = match self.frames.last().map(|frame| frame.handler) {
            None => Some(self.root),
            Some(None) => None,
            Some(Some(parent)) => self.delegate(parent, name),
        };

        if let Some(id) = handler {
            self.deliver(id, name, |handler, _| {
                handler.start_element(name, attributes);
            });
        }

        self.frames.push(Frame {
            handler,
            contents: String::new(),
        });
        tracing::trace!(element = %name, depth = self.frames.len(), "Enter");
    }

    fn end_element(&mut self, name: &QName) {
        let Some(frame) = self.frames.pop() else {
            contract_violation(format_args!("end of <{name}> without an open element"));
        };
        tracing::trace!(element = %name, depth = self.frames.len(), "Exit");

        if let Some(id) = frame.handler {
            self.deliver(id, name, |handler, _| {
                handler.end_element(name, &frame.contents);
            });
        }

        if let Some(Some(parent)) = self.frames.last().map(|parent| parent.handler) {
            self.deliver(parent, name, |handler, handlers| {
                handler.end_sub_element(name, frame.handler, handlers);
            });
        }
    }

    fn characters(&mut self, text: &str) {
        match self.frames.last_mut() {
            Some(frame) => frame.contents.push_str(text),
            None => tracing::trace!(len = text.len(), "Ignoring text outside the root element"),
        }
    }

    fn error(&mut self, error: &XmlError) {
        tracing::debug!(
            depth = self.frames.len(),
            kind = ?error.kind,
            "Tokenizer error recorded"
        );
        self.errors.push(error.clone());
    }
}

impl fmt::Debug for RecursiveRouter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveRouter")
            .field("root", &self.root)
            .field("frames", &self.frames)
            .field("errors", &self.errors.len())
            .finish()
    }
}
