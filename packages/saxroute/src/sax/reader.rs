//! Tokenizer adapter: drives `quick-xml` and presents its output as
//! [`SaxHandler`] callbacks.

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Prefix, PrefixDeclaration, ResolveResult};
use quick_xml::NsReader;

use super::entities::EntityTable;
use super::SaxHandler;
use crate::config::ParseOptions;
use crate::types::{AttributeMap, ErrorKind, NamespaceMap, QName, XmlError};

/// Parse an XML stream delivering SAX events to a handler.
///
/// # Arguments
/// * `input` - The XML data
/// * `filename` - Label used in diagnostics
/// * `handler` - The SAX event handler
///
/// # Returns
/// `true` if parsing succeeded, `false` if any error was reported. Details
/// are only available through [`SaxHandler::error`].
pub fn parse<R, H>(input: R, filename: &str, handler: &mut H) -> bool
where
    R: Read,
    H: SaxHandler + ?Sized,
{
    parse_with_options(input, filename, handler, &ParseOptions::default())
}

/// Parse an XML stream with explicit [`ParseOptions`].
///
/// The input is read in chunks of `options.chunk_size` bytes. A fatal
/// tokenizer error is reported once through the handler and stops event
/// delivery; `end_document` is not called in that case. Recoverable errors
/// (undeclared namespace prefixes) are reported and parsing continues, but
/// the run still returns `false`.
pub fn parse_with_options<R, H>(
    input: R,
    filename: &str,
    handler: &mut H,
    options: &ParseOptions,
) -> bool
where
    R: Read,
    H: SaxHandler + ?Sized,
{
    tracing::debug!(filename, chunk_size = options.chunk_size, "Starting parse");

    let input = BufReader::with_capacity(options.chunk_size, input);
    let mut tokenizer = Tokenizer::new(input, filename);

    handler.start_document();
    match tokenizer.run(handler) {
        Ok(()) => {
            handler.end_document();
            tracing::debug!(
                filename,
                errors = tokenizer.recovered_errors,
                "Finished parse"
            );
            tokenizer.recovered_errors == 0
        }
        Err(error) => {
            tracing::warn!(
                filename,
                position = error.position,
                kind = ?error.kind,
                "{}",
                error.message
            );
            handler.error(&error);
            false
        }
    }
}

/// Classify a tokenizer error.
fn error_kind(error: &quick_xml::Error) -> ErrorKind {
    match error {
        quick_xml::Error::Io(_) => ErrorKind::Io,
        _ => ErrorKind::Syntax,
    }
}

/// Namespace URI bound to a name, or the undeclared prefix as the error.
type Binding = std::result::Result<Option<String>, String>;

struct Tokenizer<'f, R> {
    reader: NsReader<R>,
    filename: &'f str,
    /// Names of the currently open elements, innermost last.
    open: Vec<QName>,
    seen_root: bool,
    recovered_errors: usize,
    entities: EntityTable,
}

impl<'f, R: BufRead> Tokenizer<'f, R> {
    fn new(input: R, filename: &'f str) -> Self {
        Self {
            reader: NsReader::from_reader(input),
            filename,
            open: Vec::new(),
            seen_root: false,
            recovered_errors: 0,
            entities: EntityTable::default(),
        }
    }

    fn run<H: SaxHandler + ?Sized>(&mut self, handler: &mut H) -> Result<(), XmlError> {
        let mut buf = Vec::new();
        loop {
            let event = self
                .reader
                .read_event_into(&mut buf)
                .map_err(|e| self.fail(error_kind(&e), e.to_string()))?;

            match event {
                Event::Start(start) => self.start_element(&start, handler)?,
                Event::Empty(start) => {
                    self.start_element(&start, handler)?;
                    self.end_element(handler)?;
                }
                Event::End(_) => self.end_element(handler)?,
                Event::Text(text) => {
                    let text = text
                        .unescape_with(|name: &str| self.entities.resolve(name))
                        .map_err(|e| self.fail(ErrorKind::Syntax, e.to_string()))?;
                    self.characters(&text, handler)?;
                }
                Event::CData(cdata) => {
                    let text = self.decode(&cdata)?;
                    self.characters(&text, handler)?;
                }
                Event::DocType(doctype) => {
                    let body = self.decode(&doctype)?;
                    self.entities.declare_from_doctype(&body);
                    tracing::debug!(
                        filename = self.filename,
                        entities = self.entities.len(),
                        "Read document type declaration"
                    );
                }
                Event::Eof => return self.finish(),
                // Declarations, comments and processing instructions
                _ => {}
            }
            buf.clear();
        }
    }

    fn start_element<H: SaxHandler + ?Sized>(
        &mut self,
        start: &BytesStart<'_>,
        handler: &mut H,
    ) -> Result<(), XmlError> {
        if self.seen_root && self.open.is_empty() {
            return Err(self.fail(
                ErrorKind::TrailingContent,
                "extra content at the end of the document",
            ));
        }

        let (resolved, local) = self.reader.resolve_element(start.name());
        let namespace = self.namespace_uri(resolved)?;
        let prefix = self.decode_prefix(start.name().prefix())?;
        let local = self.decode(local.as_ref())?.into_owned();
        let namespace = self.recover_namespace(namespace, &local, handler);
        let name = QName::with_namespace(local, prefix, namespace);

        let mut namespaces = NamespaceMap::new();
        let mut attributes = AttributeMap::new();
        for attribute in start.attributes() {
            let attribute =
                attribute.map_err(|e| self.fail(ErrorKind::Syntax, e.to_string()))?;
            let value = attribute
                .decode_and_unescape_value_with(self.reader.decoder(), |name: &str| {
                    self.entities.resolve(name)
                })
                .map_err(|e| self.fail(ErrorKind::Syntax, e.to_string()))?;

            if let Some(binding) = attribute.key.as_namespace_binding() {
                let declared = match binding {
                    PrefixDeclaration::Default => None,
                    PrefixDeclaration::Named(prefix) => Some(self.decode(prefix)?.into_owned()),
                };
                namespaces.insert(declared, value.into_owned());
                continue;
            }

            let (resolved, local) = self.reader.resolve_attribute(attribute.key);
            let namespace = self.namespace_uri(resolved)?;
            let prefix = self.decode_prefix(attribute.key.prefix())?;
            let local = self.decode(local.as_ref())?.into_owned();
            let namespace = self.recover_namespace(namespace, &local, handler);
            attributes.insert(
                QName::with_namespace(local, prefix, namespace),
                value.into_owned(),
            );
        }

        self.seen_root = true;
        handler.start_element(&name, &namespaces, &attributes);
        self.open.push(name);
        Ok(())
    }

    fn end_element<H: SaxHandler + ?Sized>(&mut self, handler: &mut H) -> Result<(), XmlError> {
        let Some(name) = self.open.pop() else {
            return Err(self.fail(ErrorKind::Syntax, "end tag without matching start tag"));
        };
        handler.end_element(&name);
        Ok(())
    }

    fn characters<H: SaxHandler + ?Sized>(
        &mut self,
        text: &str,
        handler: &mut H,
    ) -> Result<(), XmlError> {
        if !self.open.is_empty() {
            handler.characters(text);
            return Ok(());
        }
        if text.trim().is_empty() {
            return Ok(());
        }
        if self.seen_root {
            Err(self.fail(
                ErrorKind::TrailingContent,
                "extra content at the end of the document",
            ))
        } else {
            Err(self.fail(
                ErrorKind::Syntax,
                "character data before the root element",
            ))
        }
    }

    fn finish(&self) -> Result<(), XmlError> {
        if let Some(name) = self.open.last() {
            return Err(self.fail(
                ErrorKind::UnclosedElement,
                format!("premature end of data: unclosed element <{name}>"),
            ));
        }
        if !self.seen_root {
            return Err(self.fail(ErrorKind::EmptyDocument, "document is empty"));
        }
        Ok(())
    }

    /// Report an undeclared prefix without stopping the parse.
    fn recover_namespace<H: SaxHandler + ?Sized>(
        &mut self,
        namespace: Binding,
        local: &str,
        handler: &mut H,
    ) -> Option<String> {
        match namespace {
            Ok(uri) => uri,
            Err(prefix) => {
                let error = self.fail(
                    ErrorKind::Namespace,
                    format!("namespace prefix {prefix} on {local} is not defined"),
                );
                tracing::warn!(
                    filename = self.filename,
                    %prefix,
                    local,
                    "Undeclared namespace prefix"
                );
                handler.error(&error);
                self.recovered_errors += 1;
                None
            }
        }
    }

    /// Decode raw bytes in the document's encoding.
    ///
    /// Bytes that are invalid in that encoding are a syntax error.
    fn decode<'b>(&self, bytes: &'b [u8]) -> Result<Cow<'b, str>, XmlError> {
        self.reader
            .decoder()
            .decode(bytes)
            .map_err(|e| self.fail(ErrorKind::Syntax, e.to_string()))
    }

    fn decode_prefix(&self, prefix: Option<Prefix<'_>>) -> Result<Option<String>, XmlError> {
        prefix
            .map(|p| self.decode(p.as_ref()).map(Cow::into_owned))
            .transpose()
    }

    /// Namespace URI bound to a resolved name.
    fn namespace_uri(&self, resolved: ResolveResult<'_>) -> Result<Binding, XmlError> {
        Ok(match resolved {
            ResolveResult::Bound(namespace) => {
                Ok(Some(self.decode(namespace.as_ref())?.into_owned()))
            }
            ResolveResult::Unbound => Ok(None),
            ResolveResult::Unknown(prefix) => Err(self.decode(&prefix)?.into_owned()),
        })
    }

    fn fail(&self, kind: ErrorKind, message: impl Into<String>) -> XmlError {
        XmlError::new(
            kind,
            message,
            self.filename,
            self.reader.buffer_position() as u64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Records every callback as a line of text.
    #[derive(Default)]
    struct EventLog {
        events: Vec<String>,
        errors: Vec<XmlError>,
    }

    impl SaxHandler for EventLog {
        fn start_document(&mut self) {
            self.events.push("start-document".to_string());
        }

        fn end_document(&mut self) {
            self.events.push("end-document".to_string());
        }

        fn start_element(
            &mut self,
            name: &QName,
            _namespaces: &NamespaceMap,
            attributes: &AttributeMap,
        ) {
            let attrs: Vec<String> = attributes
                .iter()
                .map(|(k, v)| format!(" {k}={v}"))
                .collect();
            self.events.push(format!("start {name}{}", attrs.join("")));
        }

        fn end_element(&mut self, name: &QName) {
            self.events.push(format!("end {name}"));
        }

        fn characters(&mut self, text: &str) {
            self.events.push(format!("text {text:?}"));
        }

        fn error(&mut self, error: &XmlError) {
            self.errors.push(error.clone());
        }
    }

    fn run(xml: impl AsRef<[u8]>) -> (bool, EventLog) {
        let mut log = EventLog::default();
        let ok = parse(xml.as_ref(), "test.xml", &mut log);
        (ok, log)
    }

    #[test]
    fn test_events_in_document_order() {
        let (ok, log) = run(r#"<?xml version="1.0"?><a x="1"><b>hi</b><!-- c --><c/></a>"#);

        assert!(ok);
        assert_eq!(
            log.events,
            vec![
                "start-document",
                "start a x=1",
                "start b",
                "text \"hi\"",
                "end b",
                "start c",
                "end c",
                "end a",
                "end-document",
            ]
        );
    }

    #[test]
    fn test_entities_and_cdata_are_decoded() {
        let (ok, log) = run(r#"<a t="&lt;x&gt;">Don&apos;t<![CDATA[<raw>]]></a>"#);

        assert!(ok);
        assert!(log.events.contains(&"start a t=<x>".to_string()));
        assert!(log.events.contains(&"text \"Don't\"".to_string()));
        assert!(log.events.contains(&"text \"<raw>\"".to_string()));
    }

    #[test]
    fn test_unclosed_element_reports_error() {
        let (ok, log) = run("<note><to>Tove</to>");

        assert!(!ok);
        assert_eq!(log.errors.len(), 1);
        assert_eq!(log.errors[0].kind, ErrorKind::UnclosedElement);
        assert!(log.errors[0].message.contains("<note>"));
        assert!(!log.events.contains(&"end-document".to_string()));
    }

    #[test]
    fn test_mismatched_end_tag_reports_syntax_error() {
        let (ok, log) = run("<a><b></a>");

        assert!(!ok);
        assert_eq!(log.errors[0].kind, ErrorKind::Syntax);
        assert_eq!(log.errors[0].filename, "test.xml");
    }

    #[test]
    fn test_empty_document() {
        let (ok, log) = run("  \n");

        assert!(!ok);
        assert_eq!(log.errors[0].kind, ErrorKind::EmptyDocument);
    }

    #[test]
    fn test_trailing_content() {
        let (ok, log) = run("<a/>text");

        assert!(!ok);
        assert_eq!(log.errors[0].kind, ErrorKind::TrailingContent);

        let (ok, log) = run("<a/><b/>");
        assert!(!ok);
        assert_eq!(log.errors[0].kind, ErrorKind::TrailingContent);
    }

    #[test]
    fn test_whitespace_around_root_is_ignored() {
        let (ok, log) = run("\n  <a/>\n");

        assert!(ok);
        assert!(log.errors.is_empty());
        assert!(!log.events.iter().any(|e| e.starts_with("text")));
    }

    #[test]
    fn test_undeclared_prefix_is_recoverable() {
        let (ok, log) = run("<x:a><b/></x:a>");

        assert!(!ok);
        assert_eq!(log.errors.len(), 1);
        assert_eq!(log.errors[0].kind, ErrorKind::Namespace);
        assert!(log.events.contains(&"end-document".to_string()));
    }

    #[test]
    fn test_small_chunks_produce_same_events() {
        let xml = "<note><to>Tove</to><body>Don't forget me this weekend!</body></note>";
        let (_, expected) = run(xml);

        let mut log = EventLog::default();
        let options = ParseOptions::new().with_chunk_size(3).unwrap();
        assert!(parse_with_options(xml.as_bytes(), "test.xml", &mut log, &options));

        let joined = |log: &EventLog| {
            log.events
                .iter()
                .filter(|e| !e.starts_with("text"))
                .cloned()
                .collect::<Vec<_>>()
        };
        assert_eq!(joined(&log), joined(&expected));
    }

    #[test]
    fn test_invalid_utf8_in_name_is_an_error() {
        let (ok, log) = run(b"<a\xff/>");

        assert!(!ok);
        assert_eq!(log.errors.len(), 1);
        assert_eq!(log.errors[0].kind, ErrorKind::Syntax);
        assert!(!log.events.iter().any(|e| e.starts_with("start a")));
    }

    #[test]
    fn test_invalid_utf8_in_cdata_is_an_error() {
        let (ok, log) = run(b"<a><![CDATA[\xff\xfe]]></a>");

        assert!(!ok);
        assert_eq!(log.errors.len(), 1);
        assert_eq!(log.errors[0].kind, ErrorKind::Syntax);
        assert!(!log.events.iter().any(|e| e.starts_with("text")));
    }

    #[test]
    fn test_invalid_utf8_in_attribute_name_is_an_error() {
        let (ok, log) = run(b"<a k\xff=\"v\"/>");

        assert!(!ok);
        assert_eq!(log.errors[0].kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_declared_encoding_is_honoured() {
        let (ok, log) = run(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><caf\xe9 t=\"\xe0\">caf\xe9</caf\xe9>");

        assert!(ok, "errors: {:?}", log.errors);
        assert_eq!(
            log.events,
            vec![
                "start-document",
                "start caf\u{e9} t=\u{e0}",
                "text \"caf\u{e9}\"",
                "end caf\u{e9}",
                "end-document",
            ]
        );
    }

    #[test]
    fn test_internal_entities_are_replaced() {
        let (ok, log) = run(r#"<!DOCTYPE a [<!ENTITY e "x"><!ENTITY who 'Jani'>]><a from="&who;">&e;&amp;&e;</a>"#);

        assert!(ok, "errors: {:?}", log.errors);
        assert!(log.events.contains(&"start a from=Jani".to_string()));
        let text: String = log
            .events
            .iter()
            .filter_map(|e| e.strip_prefix("text "))
            .map(|e| e.trim_matches('"'))
            .collect();
        assert_eq!(text, "x&x");
    }

    #[test]
    fn test_undeclared_entity_is_an_error() {
        let (ok, log) = run("<!DOCTYPE a [<!ENTITY e \"x\">]><a>&f;</a>");

        assert!(!ok);
        assert_eq!(log.errors[0].kind, ErrorKind::Syntax);
    }
}
