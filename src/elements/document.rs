use crate::elements::attribute::{Attribute, AttributeRef};
use crate::elements::ElementKind;
use crate::factory::ElementFactory;
use crate::parser::errors::{ElementError, Result};
use crate::parser::fragments::split_fragments;
use crate::source::{SourceAttribute, SourceNode};
use std::ops::Index;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub const DEFAULT_INDENT: &str = "\t";

static NEXT_DOCUMENT: AtomicU32 = AtomicU32::new(0);

/// Handle to a node. Only valid for the [`Document`] that created it, or a
/// clone of that document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    document: u32,
    index: usize,
}

/// One node of the tree. Its tag name is fixed at creation.
#[derive(Debug, Clone)]
pub struct Element {
    kind: ElementKind,
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.name() == name)
    }

    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute(name).map(Attribute::value)
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Anything that can be added to a node. Raw source attributes are wrapped
/// on conversion, so only engine attributes are ever stored.
#[derive(Debug, Clone)]
pub enum Member {
    Attribute(Attribute),
    Child(NodeId),
}

impl From<Attribute> for Member {
    fn from(attribute: Attribute) -> Self {
        Member::Attribute(attribute)
    }
}

impl From<SourceAttribute> for Member {
    fn from(raw: SourceAttribute) -> Self {
        Member::Attribute(Attribute::from(raw))
    }
}

impl From<Arc<SourceAttribute>> for Member {
    fn from(raw: Arc<SourceAttribute>) -> Self {
        Member::Attribute(Attribute::from(raw))
    }
}

impl From<NodeId> for Member {
    fn from(id: NodeId) -> Self {
        Member::Child(id)
    }
}

/// Owns every node of one tree. Nodes refer to each other by [`NodeId`].
#[derive(Debug, Clone)]
pub struct Document {
    id: u32,
    nodes: Vec<Element>,
    root: Option<NodeId>,
    indent: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for Document {
    type Output = Element;

    /// Panics when `id` belongs to another document; [`Document::get`] is
    /// the checked form.
    fn index(&self, id: NodeId) -> &Element {
        match self.get(id) {
            Some(element) => element,
            None => panic!("node {} does not belong to this document", id.index),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    pub fn with_indent(indent: impl Into<String>) -> Self {
        Self {
            id: NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            root: None,
            indent: indent.into(),
        }
    }

    pub fn from_source(source: &SourceNode, factory: &ElementFactory) -> Result<Self> {
        let mut doc = Self::new();
        let root = factory.new_element_from_source(&mut doc, source)?;
        doc.root = Some(root);
        Ok(doc)
    }

    /// Parses a whole document, which must consist of exactly one
    /// top-level construct.
    pub fn from_readable_syntax(readable_syntax: &str, factory: &ElementFactory) -> Result<Self> {
        let fragments = split_fragments(readable_syntax)?;
        if fragments.len() != 1 {
            return Err(ElementError::ExpectedSingleRoot {
                count: fragments.len(),
            });
        }

        let mut doc = Self::new();
        let root = factory.new_element_from_readable(&mut doc, &fragments[0])?;
        doc.root = Some(root);
        Ok(doc)
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn set_indent(&mut self, indent: impl Into<String>) {
        self.indent = indent.into();
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) -> Result<()> {
        self.check_id(id)?;
        self.root = Some(id);
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        if id.document != self.id {
            return None;
        }
        self.nodes.get(id.index)
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn create_element(&mut self, kind: ElementKind) -> NodeId {
        self.create_named(kind, kind.tag())
    }

    pub fn create_named(&mut self, kind: ElementKind, name: impl Into<String>) -> NodeId {
        let id = NodeId {
            document: self.id,
            index: self.nodes.len(),
        };
        self.nodes.push(Element {
            kind,
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
        });
        id
    }

    /// Adds an attribute or a child to `id`.
    ///
    /// An attribute replaces any attribute of the same name in place. A
    /// child is detached from its previous parent first.
    pub fn add(&mut self, id: NodeId, member: impl Into<Member>) -> Result<()> {
        self.check_id(id)?;

        match member.into() {
            Member::Attribute(attribute) => {
                let attributes = &mut self.nodes[id.index].attributes;
                match attributes.iter_mut().find(|a| a.name() == attribute.name()) {
                    Some(existing) => *existing = attribute,
                    None => attributes.push(attribute),
                }
            }
            Member::Child(child) => {
                self.check_id(child)?;
                if child == id || self.is_ancestor(child, id) {
                    return Err(ElementError::InvalidChild(format!(
                        "<{}> cannot contain itself",
                        self[child].name
                    )));
                }

                if let Some(old_parent) = self.nodes[child.index].parent {
                    self.nodes[old_parent.index].children.retain(|&c| c != child);
                }
                self.nodes[child.index].parent = Some(id);
                self.nodes[id.index].children.push(child);
            }
        }

        Ok(())
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.add(id, Attribute::new(name, value))
    }

    /// Removes the attribute that is, or wraps, the given one. Equal values
    /// held elsewhere do not match.
    pub fn remove_attribute<'a>(&mut self, id: NodeId, attribute: impl Into<AttributeRef<'a>>) -> bool {
        let target = attribute.into();
        if self.check_id(id).is_err() {
            return false;
        }
        let element = &mut self.nodes[id.index];

        match element.attributes.iter().position(|a| target.matches(a)) {
            Some(index) => {
                element.attributes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn remove_child(&mut self, id: NodeId, child: NodeId) -> bool {
        if self.get(child).and_then(Element::parent) != Some(id) {
            return false;
        }

        self.nodes[id.index].children.retain(|&c| c != child);
        self.nodes[child.index].parent = None;
        true
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent?;
        let siblings = &self[parent].children;
        let index = siblings.iter().position(|&c| c == id)?;
        index.checked_sub(1).map(|previous| siblings[previous])
    }

    /// `id` and everything below it, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self[current].children.iter().rev());
        }

        result
    }

    /// Copies every source attribute and asks the factory for every child.
    pub(crate) fn build_from_source(
        &mut self,
        kind: ElementKind,
        source: &SourceNode,
        factory: &ElementFactory,
    ) -> Result<NodeId> {
        let id = self.create_named(kind, source.name.as_str());

        for attribute in &source.attributes {
            self.add(id, attribute.clone())?;
        }

        for child in &source.children {
            let child_id = factory.new_element_from_source(self, child)?;
            self.add(id, child_id)?;
        }

        kind.variant().check_structure(self, id)?;
        Ok(id)
    }

    /// Parses every fragment of `body` through the factory and appends the
    /// results to `parent`. An `else` fragment joins the `if` before it.
    pub fn add_elements_from_readable_syntax(
        &mut self,
        parent: NodeId,
        body: &str,
        factory: &ElementFactory,
    ) -> Result<()> {
        for fragment in split_fragments(body)? {
            let child = factory.new_element_from_readable(self, &fragment)?;
            let kind = self[child].kind;

            if kind == ElementKind::Else {
                match self.open_if(parent) {
                    Some(if_id) => self.add(if_id, child)?,
                    None => return Err(ElementError::MisplacedElse { span: fragment }),
                }
                continue;
            }

            if !kind.is_statement() {
                return Err(ElementError::unrecognized(fragment));
            }

            self.add(parent, child)?;
        }

        Ok(())
    }

    /// The last child of `parent` when it is an `if` still missing its `else`.
    fn open_if(&self, parent: NodeId) -> Option<NodeId> {
        let last = *self[parent].children.last()?;
        let is_open_if = self[last].kind == ElementKind::If
            && !self[last]
                .children
                .iter()
                .any(|&c| self[c].kind == ElementKind::Else);

        is_open_if.then_some(last)
    }

    pub fn pad(&self, id: NodeId) -> &str {
        self[id].kind.variant().pad(self)
    }

    pub fn render(&self, id: NodeId) -> String {
        self[id].kind.variant().to_readable_syntax(self, id)
    }

    pub fn render_children(&self, id: NodeId) -> String {
        self[id]
            .children
            .iter()
            .map(|&child| self.render(child))
            .collect()
    }

    /// Wraps rendered `content` as `\n<block name> {<content>\n}`, indenting
    /// every content line by the node's pad. A leading blank line is dropped
    /// and pad-only lines become empty. Enclosing blocks indent the header.
    pub fn create_readable_block(&self, id: NodeId, content: &str) -> String {
        let pad = self.pad(id);
        let mut sb = String::new();

        sb.push('\n');
        sb.push_str(&self[id].kind.variant().block_name(self, id));
        sb.push_str(" {");

        let content = match content.strip_prefix("\n\n") {
            Some(rest) => format!("\n{}", rest),
            None => content.to_string(),
        };
        let content = content.replace('\n', &format!("\n{}", pad));

        sb.push_str(&content.replace(&format!("\n{}\n", pad), "\n\n"));
        sb.push_str("\n}");

        sb
    }

    /// Canonical readable text of the whole document.
    pub fn to_readable_syntax(&self) -> String {
        match self.root {
            Some(root) => format!("{}\n", self.render(root).trim_start_matches('\n')),
            None => String::new(),
        }
    }

    pub fn to_source(&self, id: NodeId) -> SourceNode {
        let element = &self[id];
        SourceNode {
            name: element.name.clone(),
            attributes: element.attributes.iter().map(Attribute::to_source).collect(),
            children: element.children.iter().map(|&c| self.to_source(c)).collect(),
        }
    }

    fn check_id(&self, id: NodeId) -> Result<()> {
        match self.get(id) {
            Some(_) => Ok(()),
            None => Err(ElementError::InvalidChild(format!("unknown node {}", id.index))),
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = self[id].parent;
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self[current].parent;
        }
        false
    }
}
