//! Document statistics and well-formedness checks.
//!
//! [`collect_stats`] runs an [`ElementStats`] handler through the recursive
//! router; [`check_document`] uses the flat [`SaxHandler`] interface directly.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use serde::Serialize;

use crate::config::ParseOptions;
use crate::error::{Result, SaxrouteError};
use crate::recursive::{
    try_parse_recursive, Delegate, ElementHandler, HandlerArena, ResultHandler, ResultSlot,
};
use crate::sax::{self, SaxHandler};
use crate::types::{AttributeMap, NamespaceMap, QName, XmlError};

/// Counts gathered over one element and everything below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    /// Name of the outermost element.
    pub root: Option<String>,
    /// Total number of elements.
    pub elements: usize,
    /// Deepest nesting level; the outermost element is level 1.
    pub max_depth: usize,
    /// Bytes of trimmed character data.
    pub text_bytes: usize,
    /// Occurrences per qualified element name.
    pub names: BTreeMap<String, usize>,
}

/// Handler that keeps every sub-element to itself and counts them.
///
/// Counting restarts whenever an outermost element starts, so the handler can
/// be reused across documents. After a failed parse create a new one.
#[derive(Debug, Default)]
pub struct ElementStats {
    depth: usize,
    stats: ResultSlot<DocumentStats>,
}

impl ElementStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ElementHandler for ElementStats {
    fn start_element(&mut self, name: &QName, _attributes: &AttributeMap) {
        if self.depth == 0 {
            self.stats.reset();
            self.stats.get_mut().root = Some(name.to_string());
        }
        self.depth += 1;

        let stats = self.stats.get_mut();
        stats.elements += 1;
        stats.max_depth = stats.max_depth.max(self.depth);
        *stats.names.entry(name.to_string()).or_insert(0) += 1;
    }

    fn end_element(&mut self, _name: &QName, contents: &str) {
        self.stats.get_mut().text_bytes += contents.trim().len();
        self.depth = self.depth.saturating_sub(1);
    }

    fn start_sub_element(&mut self, _name: &QName) -> Delegate {
        Delegate::Current
    }
}

impl ResultHandler for ElementStats {
    type Output = DocumentStats;

    fn slot(&self) -> &ResultSlot<DocumentStats> {
        &self.stats
    }

    fn slot_mut(&mut self) -> &mut ResultSlot<DocumentStats> {
        &mut self.stats
    }
}

/// Gather [`DocumentStats`] for a whole document.
///
/// # Errors
/// Returns [`SaxrouteError::Parse`] with all collected diagnostics if the
/// document is not well-formed.
pub fn collect_stats<R: Read>(
    input: R,
    filename: &str,
    options: &ParseOptions,
) -> Result<DocumentStats> {
    let mut arena = HandlerArena::new();
    let root = arena.insert(ElementStats::new());

    try_parse_recursive(input, filename, &mut arena, root, options).map_err(|errors| {
        SaxrouteError::Parse {
            filename: filename.to_string(),
            errors,
        }
    })?;

    Ok(arena.take_result::<ElementStats>(root).unwrap_or_default())
}

/// Summary of a successful well-formedness check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub elements: usize,
    pub attributes: usize,
    /// Namespace URIs declared anywhere in the document.
    pub namespaces: BTreeSet<String>,
}

/// Flat handler counting elements and collecting diagnostics.
#[derive(Debug, Default)]
pub struct DocumentCheck {
    report: CheckReport,
    errors: Vec<XmlError>,
}

impl DocumentCheck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn report(&self) -> &CheckReport {
        &self.report
    }

    #[must_use]
    pub fn errors(&self) -> &[XmlError] {
        &self.errors
    }
}

impl SaxHandler for DocumentCheck {
    fn start_element(&mut self, _name: &QName, namespaces: &NamespaceMap, attributes: &AttributeMap) {
        self.report.elements += 1;
        self.report.attributes += attributes.len();
        self.report.namespaces.extend(namespaces.values().cloned());
    }

    fn end_element(&mut self, _name: &QName) {}

    fn error(&mut self, error: &XmlError) {
        self.errors.push(error.clone());
    }
}

/// Check that a document is well-formed.
///
/// # Errors
/// Returns [`SaxrouteError::Parse`] with all collected diagnostics if it is
/// not.
pub fn check_document<R: Read>(
    input: R,
    filename: &str,
    options: &ParseOptions,
) -> Result<CheckReport> {
    let mut check = DocumentCheck::new();
    if sax::parse_with_options(input, filename, &mut check, options) {
        Ok(check.report)
    } else {
        Err(SaxrouteError::Parse {
            filename: filename.to_string(),
            errors: check.errors,
        })
    }
}
