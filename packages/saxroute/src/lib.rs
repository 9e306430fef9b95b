//! saxroute - Recursive SAX event routing.
//!
//! This crate streams XML through a tree of small element handlers. A flat
//! SAX tokenizer produces events; the recursive router hands each element to
//! the handler its parent chose, so code for one element type never has to
//! track where in the document it is.
//!
//! # Example
//!
//! ```
//! use saxroute::recursive::handlers::{DispatchHandler, StringHandler};
//! use saxroute::recursive::{parse_recursive, HandlerArena};
//!
//! let mut arena = HandlerArena::new();
//! let to = arena.insert(StringHandler::new());
//! let root = arena.insert(DispatchHandler::new().route("to", to));
//!
//! let xml = "<note><to> Tove </to><from>Jani</from></note>";
//! assert!(parse_recursive(xml.as_bytes(), "note.xml", &mut arena, root));
//! assert_eq!(arena.result::<StringHandler>(to).map(String::as_str), Some("Tove"));
//! ```
//!
//! # Architecture
//!
//! - [`types`]: Qualified names, attribute and namespace maps, diagnostics
//! - [`sax`]: Flat SAX handler trait and the `quick-xml` tokenizer adapter
//! - [`recursive`]: Element handlers, handler arena and the recursive router
//! - [`stats`]: Statistics and well-formedness checks built on both layers
//! - [`config`]: Configuration constants and validation
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod recursive;
pub mod sax;
pub mod stats;
pub mod types;

// Re-export main functions
pub use recursive::{parse_recursive, try_parse_recursive};
pub use sax::parse;

// Re-export commonly used items
pub use error::{Result, SaxrouteError};
pub use recursive::{Delegate, ElementHandler, HandlerArena, HandlerId, ResultHandler};
pub use types::{AttributeMap, ErrorKind, NamespaceMap, QName, XmlError};
