// Thin wrapper around the quick-xml event writer.
//
// The document is assembled through events rather than serialized structs
// because element names and sub-structures are only resolved once the
// message's schema version is known at render time.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::errors::Result;

pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
        }
    }

    pub(crate) fn declaration(&mut self) -> Result<()> {
        self.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    pub(crate) fn start_element(&mut self, name: &str) -> Result<()> {
        self.inner.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    pub(crate) fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<()> {
        let mut element = BytesStart::new(name);
        for (key, value) in attrs {
            element.push_attribute((*key, *value));
        }
        self.inner.write_event(Event::Start(element))?;
        Ok(())
    }

    pub(crate) fn end_element(&mut self, name: &str) -> Result<()> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Writes `<name>content</name>`, escaping the content.
    pub(crate) fn text_element(&mut self, name: &str, content: &str) -> Result<()> {
        self.start_element(name)?;
        self.inner.write_event(Event::Text(BytesText::new(content)))?;
        self.end_element(name)
    }

    pub(crate) fn text_element_with_attrs(
        &mut self,
        name: &str,
        content: &str,
        attrs: &[(&str, &str)],
    ) -> Result<()> {
        self.start_element_with_attrs(name, attrs)?;
        self.inner.write_event(Event::Text(BytesText::new(content)))?;
        self.end_element(name)
    }

    pub(crate) fn into_string(self) -> String {
        String::from_utf8(self.inner.into_inner()).expect("writer emits UTF-8")
    }
}
