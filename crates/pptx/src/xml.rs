//! Thin wrapper over the quick-xml writer for generated parts.

use pdfdeck_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;

/// Streams XML into an in-memory buffer.
pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Start a document with the standard standalone declaration.
    pub(crate) fn new() -> Result<Self> {
        let mut inner = Writer::new(Vec::new());
        inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { inner })
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Start(elem)).map_err(xml_error)
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Empty(elem)).map_err(xml_error)
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    /// Write escaped character data.
    ///
    /// Characters XML 1.0 cannot represent are dropped.
    pub(crate) fn text(&mut self, text: &str) -> Result<()> {
        let text: Cow<'_, str> = if text.chars().all(is_xml_char) {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
        };
        self.inner
            .write_event(Event::Text(BytesText::new(&text)))
            .map_err(xml_error)
    }

    /// `<name attrs>text</name>`
    pub(crate) fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    pub(crate) fn into_string(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner())
            .map_err(|e| Error::XmlError(format!("Generated XML is not UTF-8: {}", e)))
    }
}

/// Whether `c` is allowed in XML 1.0 character data.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

fn xml_error(e: impl std::fmt::Display) -> Error {
    Error::XmlError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_xml_char() {
        for c in ['a', '\t', '\n', '\r', ' ', '\u{D7FF}', '\u{E000}', '\u{FFFD}', '\u{10000}'] {
            assert!(is_xml_char(c), "{:?}", c);
        }
        for c in ['\u{0}', '\u{1}', '\u{B}', '\u{1F}', '\u{FFFE}', '\u{FFFF}'] {
            assert!(!is_xml_char(c), "{:?}", c);
        }
    }

    #[test]
    fn test_text_drops_invalid_characters() {
        let mut xml = XmlWriter::new().unwrap();
        xml.text_element("t", &[], "A\u{1}B\u{FFFF}C & D").unwrap();
        let out = xml.into_string().unwrap();
        assert!(out.ends_with("<t>ABC &amp; D</t>"));
    }
}
