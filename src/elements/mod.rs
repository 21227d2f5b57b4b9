//! The element engine: an arena-backed tree whose nodes can be built from
//! structured source or from readable syntax, and rendered back to either.

pub mod assignment;
pub mod attribute;
pub mod block;
pub mod command;
pub mod conditional;
pub mod definition;
pub mod document;
pub mod execute;

pub use attribute::{Attribute, AttributeRef};
pub use document::{Document, Element, Member, NodeId, DEFAULT_INDENT};

use crate::factory::ElementFactory;
use crate::parser::errors::{ElementError, Result};
use crate::parser::lexer::parse_assignment;

/// The closed set of constructs the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Definition,
    Command,
    SetUp,
    TearDown,
    If,
    Then,
    Else,
    Condition,
    IsSet,
    Execute,
    Var,
    Property,
}

impl ElementKind {
    pub const ALL: [ElementKind; 12] = [
        ElementKind::Definition,
        ElementKind::Command,
        ElementKind::SetUp,
        ElementKind::TearDown,
        ElementKind::If,
        ElementKind::Then,
        ElementKind::Else,
        ElementKind::Condition,
        ElementKind::IsSet,
        ElementKind::Execute,
        ElementKind::Var,
        ElementKind::Property,
    ];

    /// Tag used in the structured form.
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Definition => "definition",
            ElementKind::Command => "command",
            ElementKind::SetUp => "set-up",
            ElementKind::TearDown => "tear-down",
            ElementKind::If => "if",
            ElementKind::Then => "then",
            ElementKind::Else => "else",
            ElementKind::Condition => "condition",
            ElementKind::IsSet => "isset",
            ElementKind::Execute => "execute",
            ElementKind::Var => "var",
            ElementKind::Property => "property",
        }
    }

    pub fn variant(self) -> &'static dyn Variant {
        match self {
            ElementKind::Definition => &definition::DEFINITION,
            ElementKind::Command => &command::COMMAND,
            ElementKind::SetUp => &block::SET_UP,
            ElementKind::TearDown => &block::TEAR_DOWN,
            ElementKind::If => &conditional::IF,
            ElementKind::Then => &block::THEN,
            ElementKind::Else => &block::ELSE,
            ElementKind::Condition => &conditional::CONDITION,
            ElementKind::IsSet => &conditional::IS_SET,
            ElementKind::Execute => &execute::EXECUTE,
            ElementKind::Var => &assignment::VAR,
            ElementKind::Property => &assignment::PROPERTY,
        }
    }

    /// Kinds that may appear directly inside a definition or a block body.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            ElementKind::Command
                | ElementKind::SetUp
                | ElementKind::TearDown
                | ElementKind::If
                | ElementKind::Execute
                | ElementKind::Var
                | ElementKind::Property
        )
    }

    pub fn is_condition(self) -> bool {
        matches!(self, ElementKind::Condition | ElementKind::IsSet)
    }

    /// Statements that render as a braced block.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            ElementKind::Command | ElementKind::SetUp | ElementKind::TearDown | ElementKind::If
        )
    }
}

/// Behavior every construct supplies: its own grammar, its rendering and
/// the layout hooks the shared block renderer calls back into.
pub trait Variant: Sync {
    /// Header text placed before ` {` by [`Document::create_readable_block`].
    fn block_name(&self, doc: &Document, id: NodeId) -> String {
        doc[id].name().to_string()
    }

    fn pad<'a>(&self, doc: &'a Document) -> &'a str {
        doc.indent()
    }

    fn parse_readable_syntax(
        &self,
        doc: &mut Document,
        id: NodeId,
        readable_syntax: &str,
        factory: &ElementFactory,
    ) -> Result<()>;

    fn to_readable_syntax(&self, doc: &Document, id: NodeId) -> String {
        doc.render_children(id)
    }

    /// Rejects structured input this variant could not render faithfully.
    fn check_structure(&self, _doc: &Document, _id: NodeId) -> Result<()> {
        Ok(())
    }
}

/// Parses `name = "value"` from `span` onto `id`. A name the node already
/// carries is rejected instead of replaced.
pub(crate) fn add_parsed_attribute(doc: &mut Document, id: NodeId, span: &str) -> Result<()> {
    let (name, value) = parse_assignment(span)?;
    if doc[id].attribute(&name).is_some() {
        return Err(ElementError::malformed(span));
    }
    doc.add(id, Attribute::new(name, value))
}

pub(crate) fn parse_annotations(doc: &mut Document, id: NodeId, annotations: &[&str]) -> Result<()> {
    for annotation in annotations {
        add_parsed_attribute(doc, id, annotation)?;
    }
    Ok(())
}

/// One `@name = "value"` line per attribute not listed in `skip`.
pub(crate) fn render_annotations(doc: &Document, id: NodeId, skip: &[&str]) -> String {
    let mut sb = String::new();

    for attribute in doc[id].attributes() {
        if skip.contains(&attribute.name()) {
            continue;
        }
        sb.push_str(&format!("\n@{} = \"{}\"", attribute.name(), attribute.value()));
    }

    sb
}

/// `name = "value"` pairs for every attribute not listed in `skip`.
pub(crate) fn render_arguments(doc: &Document, id: NodeId, skip: &[&str]) -> String {
    doc[id]
        .attributes()
        .iter()
        .filter(|attribute| !skip.contains(&attribute.name()))
        .map(|attribute| format!("{} = \"{}\"", attribute.name(), attribute.value()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Line break that opens a single-line statement. A statement directly
/// after a block gets a blank line.
pub(crate) fn statement_break(doc: &Document, id: NodeId) -> &'static str {
    let follows_block = doc
        .previous_sibling(id)
        .is_some_and(|previous| doc[previous].kind().is_block());

    if follows_block {
        "\n\n"
    } else {
        "\n"
    }
}

/// Containers only hold statements; `then`, `else` and conditions live
/// inside an `if`.
pub(crate) fn check_statement_children(doc: &Document, id: NodeId) -> Result<()> {
    for &child in doc[id].children() {
        let kind = doc[child].kind();
        if !kind.is_statement() {
            return Err(ElementError::structure(
                doc[id].name(),
                format!("<{}> is not allowed here", doc[child].name()),
            ));
        }
    }
    Ok(())
}

pub(crate) fn check_no_attributes(doc: &Document, id: NodeId) -> Result<()> {
    match doc[id].attributes().first() {
        Some(attribute) => Err(ElementError::structure(
            doc[id].name(),
            format!("unexpected \"{}\" attribute", attribute.name()),
        )),
        None => Ok(()),
    }
}

/// Only the listed attribute names may be present.
pub(crate) fn check_allowed_attributes(doc: &Document, id: NodeId, allowed: &[&str]) -> Result<()> {
    match doc[id]
        .attributes()
        .iter()
        .find(|attribute| !allowed.contains(&attribute.name()))
    {
        Some(attribute) => Err(ElementError::structure(
            doc[id].name(),
            format!("unexpected \"{}\" attribute", attribute.name()),
        )),
        None => Ok(()),
    }
}

pub(crate) fn check_no_children(doc: &Document, id: NodeId) -> Result<()> {
    if doc[id].children().is_empty() {
        Ok(())
    } else {
        Err(ElementError::structure(doc[id].name(), "expected no child elements"))
    }
}

/// The value of a required attribute, which must also be non-empty.
pub(crate) fn require_attribute<'a>(doc: &'a Document, id: NodeId, name: &str) -> Result<&'a str> {
    match doc[id].attribute_value(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(ElementError::structure(
            doc[id].name(),
            format!("\"{}\" attribute is empty", name),
        )),
        None => Err(ElementError::structure(
            doc[id].name(),
            format!("missing \"{}\" attribute", name),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    #[test]
    fn test_tags_are_unique() {
        let tags: HashSet<_> = ElementKind::ALL.iter().map(|kind| kind.tag()).collect();
        assert_eq!(tags.len(), ElementKind::ALL.len());
    }

    #[test]
    fn test_statement_and_condition_kinds_are_disjoint() {
        for kind in ElementKind::ALL {
            assert!(!(kind.is_statement() && kind.is_condition()), "{:?}", kind);
        }
    }

    #[test]
    fn test_render_annotations_skips_names() {
        let mut doc = Document::new();
        let id = doc.create_element(ElementKind::Command);
        doc.add(id, Attribute::new("name", "Foo")).unwrap();
        doc.add(id, Attribute::new("priority", "5")).unwrap();
        assert_eq!(
            render_annotations(&doc, id, &["name"]),
            "\n@priority = \"5\""
        );
    }

    #[test]
    fn test_render_arguments() {
        let mut doc = Document::new();
        let id = doc.create_element(ElementKind::Execute);
        doc.add(id, Attribute::new("function", "Type")).unwrap();
        doc.add(id, Attribute::new("locator1", "Login#USER")).unwrap();
        doc.add(id, Attribute::new("value1", "test")).unwrap();
        assert_eq!(
            render_arguments(&doc, id, &["function"]),
            "locator1 = \"Login#USER\", value1 = \"test\""
        );
    }

    #[test]
    fn test_check_allowed_attributes() {
        let mut doc = Document::new();
        let id = doc.create_element(ElementKind::Var);
        doc.add(id, Attribute::new("name", "x")).unwrap();
        assert!(check_allowed_attributes(&doc, id, &["name", "value"]).is_ok());
        doc.add(id, Attribute::new("locator", "y")).unwrap();
        assert!(check_allowed_attributes(&doc, id, &["name", "value"]).is_err());
    }

    #[test]
    fn test_require_attribute_rejects_empty_values() {
        let mut doc = Document::new();
        let id = doc.create_element(ElementKind::Var);
        assert_matches!(
            require_attribute(&doc, id, "name"),
            Err(ElementError::InvalidStructure { message, .. }) if message.contains("missing")
        );

        doc.set_attribute(id, "name", " ").unwrap();
        assert_matches!(
            require_attribute(&doc, id, "name"),
            Err(ElementError::InvalidStructure { message, .. }) if message.contains("empty")
        );

        doc.set_attribute(id, "name", "x").unwrap();
        assert_eq!(require_attribute(&doc, id, "name").unwrap(), "x");
    }

    #[test]
    fn test_duplicate_annotation_is_rejected() {
        let mut doc = Document::new();
        let id = doc.create_element(ElementKind::Definition);
        assert_matches!(
            parse_annotations(&mut doc, id, &["@a = \"1\"", "@a = \"2\""]),
            Err(ElementError::MalformedAssignment { span }) if span == "@a = \"2\""
        );
        assert_eq!(doc[id].attribute_value("a"), Some("1"));
    }

    #[test]
    fn test_parse_annotations() {
        let mut doc = Document::new();
        let id = doc.create_element(ElementKind::Definition);
        parse_annotations(&mut doc, id, &["@component-name = \"portal\""]).unwrap();
        assert_eq!(doc[id].attribute_value("component-name"), Some("portal"));
    }
}
