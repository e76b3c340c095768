//! # XML Writer — Sole Construction Path for Wire Bytes
//!
//! A minimal append-only element writer. All document production in the
//! workspace flows through [`XmlBuilder`]; no other code concatenates
//! angle brackets. The builder escapes every text value and attribute, so
//! caller-supplied descriptions and names cannot break document structure.
//!
//! ## Invariants
//!
//! - Output never carries an XML prolog; [`XmlDocument::without_prolog`]
//!   additionally strips prologs that an external signer may have added.
//! - No pretty-printing. The service compares canonical bytes, so the
//!   writer emits nothing between elements.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Prolog spellings produced by common signing backends. Stripped verbatim,
/// the same two strings the service has always tolerated being removed.
const PROLOGS: [&str; 2] = [
    "<?xml version=\"1.0\"?>",
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
];

/// A complete XML document held as its wire bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct XmlDocument(String);

impl XmlDocument {
    /// Wrap an already-produced document string.
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    /// Borrow the document bytes.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Remove any XML declaration line.
    ///
    /// The remote service requires a prolog-free payload because the
    /// document is embedded inside an outer SOAP-style envelope built by
    /// the transport collaborator.
    pub fn without_prolog(&self) -> XmlDocument {
        let mut content = self.0.clone();
        for prolog in PROLOGS {
            content = content.replace(prolog, "");
        }
        XmlDocument(content)
    }
}

impl From<String> for XmlDocument {
    fn from(content: String) -> Self {
        Self(content)
    }
}

impl std::fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only element writer producing prolog-free fragments.
#[derive(Debug, Default)]
pub struct XmlBuilder {
    buf: String,
}

impl XmlBuilder {
    /// Start an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an element with no attributes.
    pub fn open(&mut self, name: &str) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(name);
        self.buf.push('>');
        self
    }

    /// Open an element with the given attributes, in the given order.
    pub fn open_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(name);
        for (key, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(key);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape(value));
            self.buf.push('"');
        }
        self.buf.push('>');
        self
    }

    /// Close the named element.
    pub fn close(&mut self, name: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(name);
        self.buf.push('>');
        self
    }

    /// Emit a leaf element with escaped text content.
    pub fn leaf(&mut self, name: &str, value: &str) -> &mut Self {
        self.open(name);
        self.buf.push_str(&escape(value));
        self.close(name)
    }

    /// Splice an already-assembled fragment, verbatim.
    ///
    /// Only for fragments produced by this writer (e.g. pre-rendered RPS
    /// records concatenated into a lot); caller text goes through
    /// [`XmlBuilder::leaf`].
    pub fn raw(&mut self, fragment: &str) -> &mut Self {
        self.buf.push_str(fragment);
        self
    }

    /// Finish and take the fragment.
    pub fn finish(self) -> String {
        self.buf
    }

    /// Finish as a complete document.
    pub fn finish_document(self) -> XmlDocument {
        XmlDocument(self.buf)
    }
}

/// Escape text for element content and attribute values.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
