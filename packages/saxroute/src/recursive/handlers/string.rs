//! Handler collecting the text of a leaf element.

use crate::recursive::handler::{ElementHandler, ResultHandler, ResultSlot};
use crate::types::QName;

/// Stores the direct text of its element with ASCII whitespace trimmed.
///
/// Sub-elements are skipped, so for `<a>x<b>y</b>z</a>` the result is `"xz"`.
/// Other Unicode whitespace such as U+00A0 is kept.
#[derive(Debug, Default)]
pub struct StringHandler {
    text: ResultSlot<String>,
}

impl StringHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ElementHandler for StringHandler {
    fn end_element(&mut self, _name: &QName, contents: &str) {
        self.text.set(trim_ascii_space(contents).to_string());
    }
}

/// Strip space, tab, newline, vertical tab, form feed and carriage return.
fn trim_ascii_space(text: &str) -> &str {
    text.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r'))
}

impl ResultHandler for StringHandler {
    type Output = String;

    fn slot(&self) -> &ResultSlot<String> {
        &self.text
    }

    fn slot_mut(&mut self) -> &mut ResultSlot<String> {
        &mut self.text
    }
}
