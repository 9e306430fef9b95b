//! Flat SAX interface.
//!
//! A [`SaxHandler`] receives every event of a document in order, with no
//! structural memory of its own. [`parse`] drives a handler over any
//! [`std::io::Read`] source using the `quick-xml` tokenizer.
//!
//! ```
//! use saxroute::sax::{parse, SaxHandler};
//! use saxroute::types::{AttributeMap, NamespaceMap, QName};
//!
//! #[derive(Default)]
//! struct Counter(usize);
//!
//! impl SaxHandler for Counter {
//!     fn start_element(&mut self, _: &QName, _: &NamespaceMap, _: &AttributeMap) {
//!         self.0 += 1;
//!     }
//!     fn end_element(&mut self, _: &QName) {}
//! }
//!
//! let mut counter = Counter::default();
//! assert!(parse("<a><b/><c/></a>".as_bytes(), "inline", &mut counter));
//! assert_eq!(counter.0, 3);
//! ```

mod entities;
mod reader;

pub use reader::{parse, parse_with_options};

use crate::types::{AttributeMap, NamespaceMap, QName, XmlError};

/// Callback set invoked by the tokenizer adapter.
///
/// Events arrive on one thread, in document order, and never re-entrantly.
/// Namespace declarations are split out of the attributes before
/// `start_element` is called, and entity references are already replaced.
pub trait SaxHandler {
    /// Called once before the first element.
    fn start_document(&mut self) {}

    /// Called once after the root element closed, only if the document was
    /// read to the end without a fatal error.
    fn end_document(&mut self) {}

    /// Called for every opening tag. Empty elements produce a
    /// `start_element`/`end_element` pair.
    fn start_element(&mut self, name: &QName, namespaces: &NamespaceMap, attributes: &AttributeMap);

    /// Called for every closing tag.
    fn end_element(&mut self, name: &QName);

    /// Character data, including CDATA sections. A single text node may be
    /// delivered in several pieces.
    fn characters(&mut self, _text: &str) {}

    /// Diagnostic reported by the tokenizer.
    fn error(&mut self, _error: &XmlError) {}
}
