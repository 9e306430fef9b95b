//! Recursive handler routing.
//!
//! Instead of one flat callback set for the whole document, every element is
//! handled by an [`ElementHandler`] chosen by the handler of its parent. A
//! handler only sees its own element: the text directly inside it, and the
//! start and end of its direct children. This keeps the code for each element
//! type small and reusable.
//!
//! Handlers are owned by a [`HandlerArena`] and referred to by [`HandlerId`].
//! The [`RecursiveRouter`] borrows the arena while parsing; results are read
//! back from the arena afterwards.
//!
//! ```
//! use saxroute::recursive::handlers::{ListHandler, StringHandler};
//! use saxroute::recursive::{parse_recursive, HandlerArena};
//!
//! let mut arena = HandlerArena::new();
//! let item = arena.insert(StringHandler::new());
//! let root = arena.insert(ListHandler::<StringHandler>::new(item));
//!
//! let xml = "<note><to>Tove</to><from>Jani</from></note>";
//! assert!(parse_recursive(xml.as_bytes(), "note.xml", &mut arena, root));
//! assert_eq!(
//!     arena.result::<ListHandler<StringHandler>>(root),
//!     Some(&vec!["Tove".to_string(), "Jani".to_string()])
//! );
//! ```

mod arena;
mod handler;
pub mod handlers;
mod router;

pub use arena::{HandlerArena, HandlerId};
pub use handler::{Delegate, ElementHandler, ResultHandler, ResultSlot};
pub use router::RecursiveRouter;

use std::io::Read;

use crate::config::ParseOptions;
use crate::sax;
use crate::types::XmlError;

/// Parse an XML stream, delivering the root element to `root`.
///
/// Returns `false` if the tokenizer reported any error. Use
/// [`try_parse_recursive`] to get the errors themselves.
pub fn parse_recursive<R: Read>(
    input: R,
    filename: &str,
    handlers: &mut HandlerArena,
    root: HandlerId,
) -> bool {
    parse_recursive_with_options(input, filename, handlers, root, &ParseOptions::default())
}

/// [`parse_recursive`] with explicit [`ParseOptions`].
pub fn parse_recursive_with_options<R: Read>(
    input: R,
    filename: &str,
    handlers: &mut HandlerArena,
    root: HandlerId,
    options: &ParseOptions,
) -> bool {
    try_parse_recursive(input, filename, handlers, root, options).is_ok()
}

/// Parse an XML stream and return every reported [`XmlError`] on failure.
///
/// Handler results are in the arena either way; after a failure they only
/// reflect the part of the document read before the error.
pub fn try_parse_recursive<R: Read>(
    input: R,
    filename: &str,
    handlers: &mut HandlerArena,
    root: HandlerId,
    options: &ParseOptions,
) -> Result<(), Vec<XmlError>> {
    let mut router = RecursiveRouter::new(handlers, root);
    let ok = sax::parse_with_options(input, filename, &mut router, options);
    let errors = router.into_errors();

    if ok && errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
