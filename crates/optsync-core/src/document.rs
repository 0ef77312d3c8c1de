//! In-memory settings document tree.
//!
//! The host persists settings as nested XML. This module loads that text once
//! into an arena of nodes so the section walk can hand out cheap `Node` handles
//! whose identity survives the walk (`Node::id`). Nodes are never removed.

use std::fmt;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{OptSyncError, Result};

/// Stable handle to a node inside one `SettingsDocument`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

const DOCUMENT: NodeId = NodeId(0);

#[derive(Debug, Clone, Default)]
struct NodeData {
    /// None only for the document node.
    name: Option<String>,
    attributes: Vec<(String, String)>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed XML tree. Node 0 is the document node; its single element
/// child is the root element.
#[derive(Debug, Clone)]
pub struct SettingsDocument {
    nodes: Vec<NodeData>,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsDocument {
    /// Empty document (document node only, no root element).
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::default()],
        }
    }

    /// Load a document from XML text.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut doc = Self::new();
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<NodeId> = vec![DOCUMENT];

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let id = doc.element_from_start(e)?;
                    doc.attach_parsed(&stack, id)?;
                    stack.push(id);
                }
                Ok(Event::Empty(ref e)) => {
                    let id = doc.element_from_start(e)?;
                    doc.attach_parsed(&stack, id)?;
                }
                Ok(Event::End(_)) => {
                    // check_end_names is on, so mismatched tags fail in read_event
                    stack.pop();
                }
                Ok(Event::Text(ref t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| OptSyncError::InvalidXml(format!("bad text: {e}")))?;
                    doc.push_text(&stack, &text);
                }
                Ok(Event::CData(t)) => {
                    let raw = t.into_inner();
                    let text = std::str::from_utf8(&raw)
                        .map_err(|e| OptSyncError::InvalidXml(format!("bad cdata: {e}")))?;
                    doc.push_text(&stack, text);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OptSyncError::InvalidXml(format!(
                        "at position {}: {e}",
                        reader.buffer_position()
                    )))
                }
                _ => {}
            }
        }

        if stack.len() > 1 {
            return Err(OptSyncError::InvalidXml("unexpected end of document".into()));
        }
        if doc.root().is_none() {
            return Err(OptSyncError::InvalidXml("document has no root element".into()));
        }

        tracing::trace!(nodes = doc.nodes.len(), "settings document parsed");
        Ok(doc)
    }

    fn element_from_start(&mut self, e: &BytesStart<'_>) -> Result<NodeId> {
        let name = std::str::from_utf8(e.name().as_ref())
            .map_err(|err| OptSyncError::InvalidXml(format!("bad element name: {err}")))?
            .to_string();
        let id = self.create_element(name);

        for attr in e.attributes() {
            let attr = attr.map_err(|err| OptSyncError::InvalidXml(format!("bad attribute: {err}")))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|err| OptSyncError::InvalidXml(format!("bad attribute name: {err}")))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|err| OptSyncError::InvalidXml(format!("bad attribute value: {err}")))?
                .into_owned();
            self.nodes[id.0].attributes.push((key, value));
        }
        Ok(id)
    }

    fn attach_parsed(&mut self, stack: &[NodeId], id: NodeId) -> Result<()> {
        let parent = stack.last().copied().unwrap_or(DOCUMENT);
        self.append_child(parent, id)
            .map_err(|_| OptSyncError::InvalidXml("multiple root elements".into()))
    }

    fn push_text(&mut self, stack: &[NodeId], text: &str) {
        // Text outside the root element is ignored.
        if let Some(&id) = stack.last() {
            if id != DOCUMENT {
                self.nodes[id.0].text.push_str(text);
            }
        }
    }

    /// The document node. It has no name and no parent.
    pub fn document(&self) -> Node<'_> {
        Node { doc: self, id: DOCUMENT }
    }

    /// The root element, if one has been appended.
    pub fn root(&self) -> Option<Node<'_>> {
        self.document().children().next()
    }

    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then_some(Node { doc: self, id })
    }

    /// Create a detached element. It has no parent until `append_child`.
    pub fn create_element(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            name: Some(name.into()),
            ..NodeData::default()
        });
        id
    }

    /// Attach a detached element as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check(parent)?;
        self.check(child)?;
        if child == DOCUMENT {
            return Err(OptSyncError::MalformedDocument(
                "document node cannot be a child".into(),
            ));
        }
        if self.nodes[child.0].parent.is_some() {
            return Err(OptSyncError::MalformedDocument(format!(
                "node {} already has a parent",
                child.0
            )));
        }
        if parent == DOCUMENT && !self.nodes[DOCUMENT.0].children.is_empty() {
            return Err(OptSyncError::MalformedDocument(
                "document already has a root element".into(),
            ));
        }

        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(OptSyncError::MalformedDocument(
                    "cannot append a node beneath itself".into(),
                ));
            }
            cursor = self.nodes[id.0].parent;
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Set or replace an attribute on an element.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.check_element(id)?;
        let name = name.into();
        let value = value.into();
        let attrs = &mut self.nodes[id.0].attributes;
        match attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => attrs.push((name, value)),
        }
        Ok(())
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        self.check_element(id)?;
        self.nodes[id.0].text = text.into();
        Ok(())
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(OptSyncError::MalformedDocument(format!("unknown node {}", id.0)))
        }
    }

    fn check_element(&self, id: NodeId) -> Result<()> {
        self.check(id)?;
        if id == DOCUMENT {
            return Err(OptSyncError::MalformedDocument(
                "document node is not an element".into(),
            ));
        }
        Ok(())
    }

    /// Serialize the tree as indented XML with a declaration.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(write_err)?;

        if let Some(root) = self.root() {
            write_node(&mut writer, root)?;
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| OptSyncError::Internal(format!("xml output is not utf-8: {e}")))
    }
}

fn write_err(e: impl fmt::Display) -> OptSyncError {
    OptSyncError::Internal(format!("write xml failed: {e}"))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: Node<'_>) -> Result<()> {
    let name = node.name().unwrap_or_default();
    let data = node.data();
    let start = BytesStart::new(name)
        .with_attributes(data.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    if data.children.is_empty() && data.text.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_err);
    }

    writer.write_event(Event::Start(start)).map_err(write_err)?;
    if !data.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&data.text)))
            .map_err(write_err)?;
    }
    for child in node.children() {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_err)
}

/// Borrowed view of one node. Two handles are equal iff they point at the
/// same node of the same document.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a SettingsDocument,
    id: NodeId,
}

impl<'a> Node<'a> {
    fn data(&self) -> &'a NodeData {
        &self.doc.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Element name; `None` for the document node.
    pub fn name(&self) -> Option<&'a str> {
        self.data().name.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.data()
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> &'a str {
        &self.data().text
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        let doc = self.doc;
        self.data().parent.map(|id| Node { doc, id })
    }

    /// Element children in document order.
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let doc = self.doc;
        self.data().children.iter().map(move |&id| Node { doc, id })
    }

    /// Element children with the given name, in document order.
    pub fn elements<'n>(&self, name: &'n str) -> impl Iterator<Item = Node<'a>> + 'n
    where
        'a: 'n,
    {
        self.children().filter(move |n| n.name() == Some(name))
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id.0)
            .field("name", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn parse_keeps_structure_and_attributes() {
        let doc = SettingsDocument::parse(
            r#"<UserSettings><Category name="A &amp; B"><Item>x &lt; y</Item><Empty/></Category></UserSettings>"#,
        )
        .unwrap();

        let root = doc.root().unwrap();
        assert_eq!(root.name(), Some("UserSettings"));
        assert_eq!(root.parent(), Some(doc.document()));

        let cat = root.elements("Category").next().unwrap();
        assert_eq!(cat.attribute("name"), Some("A & B"));
        let names: Vec<_> = cat.children().filter_map(|n| n.name()).collect();
        assert_eq!(names, ["Item", "Empty"]);
        assert_eq!(cat.children().next().unwrap().text(), "x < y");
    }

    #[test]
    fn parse_rejects_broken_xml() {
        let err = SettingsDocument::parse("<a><b></a>").unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_XML");

        let err = SettingsDocument::parse("<a><b>").unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_XML");

        let err = SettingsDocument::parse("").unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_XML");
    }

    #[test]
    fn append_child_rejects_reparenting_and_cycles() {
        let mut doc = SettingsDocument::new();
        let root = doc.create_element("Root");
        let child = doc.create_element("Child");
        doc.append_child(doc.document().id(), root).unwrap();
        doc.append_child(root, child).unwrap();

        assert!(doc.append_child(root, child).is_err());

        let other = doc.create_element("Other");
        assert!(doc.append_child(doc.document().id(), other).is_err());
        assert!(doc.append_child(other, other).is_err());
    }

    #[test]
    fn built_tree_survives_write_and_reload() {
        let mut doc = SettingsDocument::new();
        let root = doc.create_element("Root");
        doc.append_child(doc.document().id(), root).unwrap();
        let leaf = doc.create_element("Leaf");
        doc.set_attribute(leaf, "name", "a\"b").unwrap();
        doc.set_text(leaf, "1 < 2").unwrap();
        doc.append_child(root, leaf).unwrap();

        let xml = doc.to_xml_string().unwrap();
        let back = SettingsDocument::parse(&xml).unwrap();
        let leaf = back.root().unwrap().elements("Leaf").next().unwrap();
        assert_eq!(leaf.attribute("name"), Some("a\"b"));
        assert_eq!(leaf.text(), "1 < 2");
    }
}
