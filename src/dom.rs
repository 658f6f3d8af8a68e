// Navigable XML document tree
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of fdi2iclass.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! In-memory XML document tree.
//!
//! A [`Document`] is loaded in full from a [`BufRead`] using
//!   [`quick_xml`] and stored as a flat arena of [`Node`]s.
//! Every node knows its parent,
//!   which is what allows [`crate::walk`] to climb from a `match`
//!   element through its enclosing conditions.
//!
//! Nodes are allocated in document order,
//!   and so [`Document::elements_named`] yields elements in the same order
//!   that they appear in the source.
//!
//! Only elements and character data are retained;
//!   comments,
//!   processing instructions,
//!   the XML declaration and any doctype are discarded while loading.

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader as XmlReader;
use std::fmt::Display;
use std::io::BufRead;
use std::str::Utf8Error;

/// Index of a [`Node`] within its owning [`Document`].
///
/// A `NodeId` is meaningful only for the document that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// An element and its attributes.
#[derive(Debug, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<NodeId>,
}

impl Element {
    /// Qualified tag name as it appears in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unescaped value of the attribute `name`,
    ///   if present.
    ///
    /// An attribute that is present but empty yields `Some("")`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child nodes in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    /// Character data,
    ///   whether from text or a CDATA section.
    Text(String),
}

#[derive(Debug, PartialEq, Eq)]
pub struct Node {
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    /// Parent element,
    ///   or [`None`] for the root element.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }
}

/// A fully loaded XML document.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Load an entire document from `src`.
    ///
    /// Nothing is returned until the whole document has been read;
    ///   a syntax error anywhere in the source fails the load.
    pub fn from_reader<B: BufRead>(src: B) -> Result<Self, DomError> {
        let mut reader = XmlReader::from_reader(src);
        let mut builder = TreeBuilder::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                XmlEvent::Start(start) => {
                    builder.open(&start)?;
                }
                XmlEvent::Empty(start) => {
                    builder.open(&start)?;
                    builder.close()?;
                }
                XmlEvent::End(_) => builder.close()?,
                XmlEvent::Text(text) => {
                    let text =
                        text.unescape().map_err(quick_xml::Error::from)?;
                    builder.text(&text)?;
                }
                XmlEvent::CData(cdata) => {
                    builder.text(std::str::from_utf8(&cdata)?)?;
                }
                XmlEvent::Eof => break,
                _ => (),
            }

            buf.clear();
        }

        builder.finish()
    }

    pub fn parse_str(src: &str) -> Result<Self, DomError> {
        Self::from_reader(src.as_bytes())
    }

    /// The document element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The element at `id`,
    ///   or [`None`] if it is a text node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).as_element()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent()
    }

    /// Direct element children of `id`,
    ///   skipping text.
    pub fn child_elements(
        &self,
        id: NodeId,
    ) -> impl Iterator<Item = (NodeId, &Element)> + '_ {
        self.element(id)
            .map(Element::children)
            .unwrap_or_default()
            .iter()
            .filter_map(|&child| self.element(child).map(|el| (child, el)))
    }

    /// Every element named `name` in document order,
    ///   including the root element itself.
    pub fn elements_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| {
                node.as_element().map_or(false, |el| el.name() == name)
            })
            .map(|(i, _)| NodeId(i))
    }

    /// Concatenated character data of the children of `id`.
    ///
    /// Yields [`None`] if `id` has any element children,
    ///   since its content is then not plain text.
    /// An element without children yields an empty string.
    pub fn text(&self, id: NodeId) -> Option<String> {
        let children = self.element(id).map(Element::children)?;

        children.iter().try_fold(String::new(), |mut acc, &child| {
            match self.node(child).kind() {
                NodeKind::Text(text) => {
                    acc.push_str(text);
                    Some(acc)
                }
                NodeKind::Element(_) => None,
            }
        })
    }
}

/// Accumulates [`Node`]s from a stream of open/close/text events.
#[derive(Debug, Default)]
struct TreeBuilder {
    nodes: Vec<Node>,
    open: Vec<NodeId>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.open.last().copied();

        if let Some(NodeKind::Element(el)) =
            parent.map(|p| &mut self.nodes[p.0].kind)
        {
            el.children.push(id);
        }

        self.nodes.push(Node { parent, kind });
        id
    }

    fn open(&mut self, start: &BytesStart) -> Result<NodeId, DomError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();

        if self.open.is_empty() && self.root.is_some() {
            return Err(DomError::MultipleRoots(name));
        }

        let attrs = start
            .attributes()
            .map(|attr| {
                let attr = attr.map_err(quick_xml::Error::from)?;
                let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
                let value = attr
                    .unescape_value()
                    .map_err(quick_xml::Error::from)?
                    .into_owned();

                Ok::<_, DomError>((key, value))
            })
            .collect::<Result<Vec<_>, DomError>>()?;

        let id = self.push(NodeKind::Element(Element {
            name,
            attrs,
            children: vec![],
        }));

        self.root.get_or_insert(id);
        self.open.push(id);

        Ok(id)
    }

    fn close(&mut self) -> Result<(), DomError> {
        self.open.pop().map(|_| ()).ok_or(DomError::UnmatchedClose)
    }

    fn text(&mut self, text: &str) -> Result<(), DomError> {
        if self.open.is_empty() {
            // Whitespace between the prolog and the root element.
            let trimmed = text.trim();

            if trimmed.is_empty() {
                return Ok(());
            }

            return Err(DomError::TextOutsideRoot(trimmed.into()));
        }

        if !text.is_empty() {
            self.push(NodeKind::Text(text.to_string()));
        }

        Ok(())
    }

    fn finish(self) -> Result<Document, DomError> {
        if let Some(&unclosed) = self.open.last() {
            let name = self.nodes[unclosed.0]
                .as_element()
                .map(|el| el.name.clone())
                .unwrap_or_default();

            return Err(DomError::Unclosed(name));
        }

        match self.root {
            Some(root) => Ok(Document {
                nodes: self.nodes,
                root,
            }),
            None => Err(DomError::NoRoot),
        }
    }
}

/// Failure to load a [`Document`].
#[derive(Debug)]
pub enum DomError {
    /// Syntax error reported by the XML reader.
    Xml(quick_xml::Error),
    /// A name or CDATA section was not valid UTF-8.
    Utf8(Utf8Error),
    /// The source contained no element at all.
    NoRoot,
    /// A second top-level element followed the document element.
    MultipleRoots(String),
    /// Non-whitespace character data outside of the document element.
    TextOutsideRoot(String),
    /// A closing tag with no corresponding opening tag.
    UnmatchedClose,
    /// End of input was reached with this element still open.
    Unclosed(String),
}

impl From<quick_xml::Error> for DomError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

impl From<Utf8Error> for DomError {
    fn from(e: Utf8Error) -> Self {
        Self::Utf8(e)
    }
}

impl Display for DomError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Xml(e) => Display::fmt(e, fmt),
            Self::Utf8(e) => Display::fmt(e, fmt),
            Self::NoRoot => write!(fmt, "document has no root element"),
            Self::MultipleRoots(name) => {
                write!(fmt, "unexpected element `{name}` after root element")
            }
            Self::TextOutsideRoot(text) => {
                write!(fmt, "unexpected text `{text}` outside root element")
            }
            Self::UnmatchedClose => write!(fmt, "unmatched closing tag"),
            Self::Unclosed(name) => {
                write!(fmt, "unexpected end of input: `{name}` is not closed")
            }
        }
    }
}

impl std::error::Error for DomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(e) => Some(e),
            Self::Utf8(e) => Some(e),
            _ => None,
        }
    }
}
