//! Pull cursor over one XML part of the package
//!
//! A [`PartCursor`] opens a single zip entry and walks it element by element.
//! It only reports element boundaries; text is reachable through
//! [`PartCursor::expand`], which snapshots the current element's subtree.
//! The entry is released when the cursor is closed or dropped.

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read, Seek};

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{XlsxError, XlsxResult};

/// Kind of element boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `<name ...>`
    Start,
    /// `</name>`
    End,
    /// `<name .../>`
    Empty,
}

/// One element boundary with its attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    pub kind: NodeKind,
    /// Local name, namespace prefix stripped
    pub name: String,
    attrs: Vec<(String, String)>,
}

impl XmlNode {
    fn from_start(kind: NodeKind, e: &BytesStart<'_>) -> Self {
        XmlNode {
            kind,
            name: local_name(e),
            attrs: attributes(e),
        }
    }

    /// Attribute value by qualified name (`"r"`, `"r:id"`, ...)
    pub fn attr(&self, name: &str) -> Option<&str> {
        find_attr(&self.attrs, name)
    }

    /// Whether this opens (or is an empty) element called `name`
    pub fn opens(&self, name: &str) -> bool {
        self.kind != NodeKind::End && self.name == name
    }

    /// Whether this closes an element called `name`
    pub fn closes(&self, name: &str) -> bool {
        self.kind == NodeKind::End && self.name == name
    }
}

/// Snapshot of an element subtree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<XmlChild>,
}

/// Child of an [`XmlElement`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlChild {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    fn from_start(e: &BytesStart<'_>) -> Self {
        XmlElement {
            name: local_name(e),
            attrs: attributes(e),
            children: Vec::new(),
        }
    }

    /// Attribute value by qualified name
    pub fn attr(&self, name: &str) -> Option<&str> {
        find_attr(&self.attrs, name)
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlChild::Element(e) => Some(e),
            XmlChild::Text(_) => None,
        })
    }

    /// First child element called `name`
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// Follow a path of child names, e.g. `["from", "col"]`
    pub fn descend(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    /// First descendant element called `name`, depth first
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        for el in self.elements() {
            if el.name == name {
                return Some(el);
            }
            if let Some(found) = el.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of the whole subtree
    pub fn text_content(&self) -> String {
        self.text_skipping(&[])
    }

    /// Concatenated text of the subtree, leaving out elements named in `skip`
    pub fn text_skipping(&self, skip: &[&str]) -> String {
        let mut out = String::new();
        self.collect_text(skip, &mut out);
        out
    }

    fn collect_text(&self, skip: &[&str], out: &mut String) {
        for child in &self.children {
            match child {
                XmlChild::Text(t) => out.push_str(t),
                XmlChild::Element(e) if !skip.contains(&e.name.as_str()) => {
                    e.collect_text(skip, out)
                }
                XmlChild::Element(_) => {}
            }
        }
    }
}

impl From<XmlNode> for XmlElement {
    fn from(node: XmlNode) -> Self {
        XmlElement {
            name: node.name,
            attrs: node.attrs,
            children: Vec::new(),
        }
    }
}

/// Streaming reader over one part of the package
pub struct PartCursor<'a> {
    path: String,
    reader: Option<Reader<Box<dyn BufRead + 'a>>>,
    buf: Vec<u8>,
}

impl<'a> PartCursor<'a> {
    /// Open `path` inside the archive
    pub fn open<R: Read + Seek>(archive: &'a mut ZipArchive<R>, path: &str) -> XlsxResult<Self> {
        let file = match archive.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(XlsxError::MissingPart(path.to_string())),
            Err(e) => return Err(e.into()),
        };
        debug!("opened part {}", path);
        Ok(Self::from_reader(BufReader::new(file), path))
    }

    /// Walk XML from any buffered source; `path` is used in errors and logs
    pub fn from_reader<B: BufRead + 'a>(source: B, path: &str) -> Self {
        let source: Box<dyn BufRead + 'a> = Box::new(source);
        let mut reader = Reader::from_reader(source);
        reader.trim_text(false);
        PartCursor {
            path: path.to_string(),
            reader: Some(reader),
            buf: Vec::new(),
        }
    }

    /// Name of the part being read
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the part has been closed (explicitly or by reaching its end)
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    /// Advance to the next element boundary.
    ///
    /// Returns `None` at the end of the part, which also closes it.
    pub fn next_node(&mut self) -> XlsxResult<Option<XmlNode>> {
        let node = {
            let Some(reader) = self.reader.as_mut() else {
                return Ok(None);
            };
            loop {
                self.buf.clear();
                let event = reader
                    .read_event_into(&mut self.buf)
                    .map_err(|e| xml_error(&self.path, e))?;
                match event {
                    Event::Start(e) => break Some(XmlNode::from_start(NodeKind::Start, &e)),
                    Event::Empty(e) => break Some(XmlNode::from_start(NodeKind::Empty, &e)),
                    Event::End(e) => {
                        break Some(XmlNode {
                            kind: NodeKind::End,
                            name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                            attrs: Vec::new(),
                        })
                    }
                    Event::Eof => break None,
                    _ => {}
                }
            }
        };

        if node.is_none() {
            self.close();
        }
        Ok(node)
    }

    /// Skip forward to the next element opening called `name`
    pub fn seek_start(&mut self, name: &str) -> XlsxResult<Option<XmlNode>> {
        while let Some(node) = self.next_node()? {
            if node.opens(name) {
                return Ok(Some(node));
            }
        }
        Ok(None)
    }

    /// Read the rest of the element `start` opened and return it as a tree.
    ///
    /// The cursor is left just past the element's end. A part that ends
    /// inside the element yields whatever was read up to that point.
    pub fn expand(&mut self, start: XmlNode) -> XlsxResult<XmlElement> {
        if start.kind != NodeKind::Start {
            return Ok(start.into());
        }
        let Some(reader) = self.reader.as_mut() else {
            return Ok(start.into());
        };

        let mut stack = vec![XmlElement::from(start)];
        loop {
            self.buf.clear();
            let event = reader
                .read_event_into(&mut self.buf)
                .map_err(|e| xml_error(&self.path, e))?;
            match event {
                Event::Start(e) => stack.push(XmlElement::from_start(&e)),
                Event::Empty(e) => {
                    let el = XmlElement::from_start(&e);
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlChild::Element(el));
                    }
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(|err| xml_error(&self.path, err))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlChild::Text(text.into_owned()));
                    }
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlChild::Text(text));
                    }
                }
                Event::End(_) => {
                    let done = stack.pop().unwrap_or_default();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlChild::Element(done)),
                        None => return Ok(done),
                    }
                }
                Event::Eof => {
                    // Fold every element still open into its parent
                    while let Some(done) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(XmlChild::Element(done)),
                            None => return Ok(done),
                        }
                    }
                    return Ok(XmlElement::default());
                }
                _ => {}
            }
        }
    }

    /// Release the underlying entry; further reads return nothing
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!("closed part {}", self.path);
        }
    }
}

impl Drop for PartCursor<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

fn xml_error(path: &str, source: quick_xml::Error) -> XlsxError {
    XlsxError::Xml {
        part: path.to_string(),
        source,
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>) -> Vec<(String, String)> {
    e.attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .unwrap_or_else(|_| Cow::Owned(String::from_utf8_lossy(&attr.value).into_owned()))
                .into_owned();
            (key, value)
        })
        .collect()
}

fn find_attr<'s>(attrs: &'s [(String, String)], name: &str) -> Option<&'s str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Decode Excel's `_xHHHH_` escapes (`_x000d_` is CR, `_x005f_` an
/// underscore). Malformed sequences are kept verbatim.
pub(crate) fn decode_excel_escapes(s: &str) -> Cow<'_, str> {
    if !s.contains("_x") {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = tail
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| tail.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[7..];
            }
            None => {
                out.push_str("_x");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
