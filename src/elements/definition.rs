use crate::elements::{
    check_statement_children, parse_annotations, render_annotations, Document, NodeId, Variant,
};
use crate::factory::ElementFactory;
use crate::parser::errors::{ElementError, Result};
use crate::parser::lexer::{split_annotations, split_block_header};

const KEYWORD: &str = "definition";

/// Root of a test or macro file. Every attribute renders as an annotation
/// above the `definition` header.
pub struct Definition;

pub static DEFINITION: Definition = Definition;

impl Variant for Definition {
    fn block_name(&self, _doc: &Document, _id: NodeId) -> String {
        KEYWORD.to_string()
    }

    fn parse_readable_syntax(
        &self,
        doc: &mut Document,
        id: NodeId,
        readable_syntax: &str,
        factory: &ElementFactory,
    ) -> Result<()> {
        let (annotations, rest) = split_annotations(readable_syntax);

        let Some((header, body)) = split_block_header(rest) else {
            return Err(ElementError::unrecognized(readable_syntax));
        };
        if header != KEYWORD {
            return Err(ElementError::unrecognized(readable_syntax));
        }

        parse_annotations(doc, id, &annotations)?;
        doc.add_elements_from_readable_syntax(id, body, factory)
    }

    fn to_readable_syntax(&self, doc: &Document, id: NodeId) -> String {
        let mut sb = render_annotations(doc, id, &[]);
        sb.push_str(&doc.create_readable_block(id, &doc.render_children(id)));
        sb
    }

    fn check_structure(&self, doc: &Document, id: NodeId) -> Result<()> {
        check_statement_children(doc, id)
    }
}

#[cfg(test)]
mod tests {
    use crate::elements::{Document, ElementKind, Variant};
    use crate::factory::ElementFactory;
    use crate::parser::errors::ElementError;
    use crate::source::SourceNode;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_annotations_and_body() {
        let factory = ElementFactory::standard();
        let text = "@component-name = \"portal-tags\"\ndefinition {\nproperty a.b = \"c\";\n}";
        let doc = Document::from_readable_syntax(text, &factory).unwrap();

        let root = doc.root().unwrap();
        assert_eq!(doc[root].kind(), ElementKind::Definition);
        assert_eq!(doc[root].attribute_value("component-name"), Some("portal-tags"));
        assert_eq!(doc[root].children().len(), 1);
    }

    #[test]
    fn test_render_empty_definition() {
        let factory = ElementFactory::standard();
        let doc = Document::from_source(&SourceNode::new("definition"), &factory).unwrap();
        assert_eq!(doc.to_readable_syntax(), "definition {\n}\n");
    }

    #[test]
    fn test_render_annotations_at_column_zero() {
        let factory = ElementFactory::standard();
        let source = SourceNode::new("definition")
            .with_attribute("component-name", "portal-tags")
            .with_child(
                SourceNode::new("var")
                    .with_attribute("name", "x")
                    .with_attribute("value", "1"),
            );
        let doc = Document::from_source(&source, &factory).unwrap();
        assert_eq!(
            doc.to_readable_syntax(),
            "@component-name = \"portal-tags\"\ndefinition {\n\tvar x = \"1\";\n}\n"
        );
    }

    #[test]
    fn test_wrong_header() {
        let factory = ElementFactory::standard();
        let mut doc = Document::new();
        let id = doc.create_element(ElementKind::Definition);
        assert_matches!(
            super::DEFINITION.parse_readable_syntax(&mut doc, id, "definitions {\n}", &factory),
            Err(ElementError::UnrecognizedVariant { .. })
        );
    }

    #[test]
    fn test_text_after_body_is_rejected() {
        let factory = ElementFactory::standard();
        assert_matches!(
            Document::from_readable_syntax("definition {\n} junk", &factory),
            Err(ElementError::UnrecognizedVariant { construct }) if construct == "definition {\n} junk"
        );
    }

    #[test]
    fn test_repeated_annotation_is_rejected() {
        let factory = ElementFactory::standard();
        let text = "@component-name = \"a\"\n@component-name = \"b\"\ndefinition {\n}";
        assert_matches!(
            Document::from_readable_syntax(text, &factory),
            Err(ElementError::MalformedAssignment { span }) if span == "@component-name = \"b\""
        );
    }

    #[test]
    fn test_rejects_misplaced_then() {
        let factory = ElementFactory::standard();
        let source = SourceNode::new("definition").with_child(SourceNode::new("then"));
        assert_matches!(
            Document::from_source(&source, &factory),
            Err(ElementError::InvalidStructure { tag, .. }) if tag == "definition"
        );
    }
}
