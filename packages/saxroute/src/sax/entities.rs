//! Internal entities declared in a document type declaration.

use std::collections::HashMap;
use std::sync::LazyLock;

use quick_xml::escape::resolve_predefined_entity;
use regex::Regex;

#[allow(clippy::expect_used)]
/// Regex for a general internal entity: `<!ENTITY name "value">`.
/// Parameter entities (`<!ENTITY % name ...>`) and external entities
/// (`SYSTEM`/`PUBLIC`) do not match.
static ENTITY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<!ENTITY\s+([^\s%"'>]+)\s+(?:"([^"]*)"|'([^']*)')\s*>"#).expect("valid regex")
});

/// Replacement text of the entities a document declares.
///
/// Replacement text is delivered literally; references inside it are not
/// expanded again.
#[derive(Debug, Default)]
pub(super) struct EntityTable {
    entities: HashMap<String, String>,
}

impl EntityTable {
    /// Record the entity declarations in the body of a `<!DOCTYPE ...>`.
    ///
    /// The first declaration of a name wins.
    pub(super) fn declare_from_doctype(&mut self, doctype: &str) {
        for caps in ENTITY_DECL.captures_iter(doctype) {
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            self.entities
                .entry(caps[1].to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    /// Replacement text for `&name;`, predefined entities included.
    pub(super) fn resolve(&self, name: &str) -> Option<&str> {
        resolve_predefined_entity(name).or_else(|| self.entities.get(name).map(String::as_str))
    }

    pub(super) fn len(&self) -> usize {
        self.entities.len()
    }
}
