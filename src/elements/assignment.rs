use crate::elements::{
    check_allowed_attributes, check_no_children, require_attribute, statement_break, Document,
    NodeId, Variant,
};
use crate::factory::ElementFactory;
use crate::parser::errors::{ElementError, Result};
use crate::parser::lexer::parse_assignment;

const NAME: &str = "name";
const VALUE: &str = "value";

/// `<keyword> name = "value";`
pub struct Assignment {
    keyword: &'static str,
}

pub static VAR: Assignment = Assignment { keyword: "var" };

pub static PROPERTY: Assignment = Assignment { keyword: "property" };

impl Variant for Assignment {
    fn parse_readable_syntax(
        &self,
        doc: &mut Document,
        id: NodeId,
        readable_syntax: &str,
        _factory: &ElementFactory,
    ) -> Result<()> {
        let statement = readable_syntax
            .trim()
            .strip_suffix(';')
            .ok_or_else(|| ElementError::malformed(readable_syntax))?;
        let assignment = statement
            .strip_prefix(self.keyword)
            .filter(|rest| rest.starts_with(char::is_whitespace))
            .ok_or_else(|| ElementError::unrecognized(readable_syntax))?;

        let (name, value) = parse_assignment(assignment)?;
        doc.set_attribute(id, NAME, name)?;
        doc.set_attribute(id, VALUE, value)
    }

    fn to_readable_syntax(&self, doc: &Document, id: NodeId) -> String {
        format!(
            "{}{} {} = \"{}\";",
            statement_break(doc, id),
            self.keyword,
            doc[id].attribute_value(NAME).unwrap_or_default(),
            doc[id].attribute_value(VALUE).unwrap_or_default()
        )
    }

    fn check_structure(&self, doc: &Document, id: NodeId) -> Result<()> {
        require_attribute(doc, id, NAME)?;
        check_allowed_attributes(doc, id, &[NAME, VALUE])?;
        check_no_children(doc, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;
    use crate::source::SourceNode;
    use assert_matches::assert_matches;

    fn parse(text: &str) -> Result<(Document, NodeId)> {
        let factory = ElementFactory::standard();
        let mut doc = Document::new();
        let id = factory.new_element_from_readable(&mut doc, text)?;
        Ok((doc, id))
    }

    #[test]
    fn test_parse_var() {
        let (doc, id) = parse("var tagName = \"tag1\";").unwrap();
        assert_eq!(doc[id].kind(), ElementKind::Var);
        assert_eq!(doc[id].attribute_value("name"), Some("tagName"));
        assert_eq!(doc[id].attribute_value("value"), Some("tag1"));
    }

    #[test]
    fn test_parse_property_with_dotted_name() {
        let (doc, id) = parse("property testray.main.component.name = \"Tags\";").unwrap();
        assert_eq!(doc[id].kind(), ElementKind::Property);
        assert_eq!(doc[id].attribute_value("name"), Some("testray.main.component.name"));
        assert_eq!(doc.render(id), "\nproperty testray.main.component.name = \"Tags\";");
    }

    #[test]
    fn test_unquoted_value_renders_quoted() {
        let (doc, id) = parse("var count = 5;").unwrap();
        assert_eq!(doc[id].attribute_value("value"), Some("5"));
        assert_eq!(doc.render(id), "\nvar count = \"5\";");
    }

    #[test]
    fn test_missing_semicolon() {
        let factory = ElementFactory::standard();
        let mut doc = Document::new();
        let id = doc.create_element(ElementKind::Var);
        assert_matches!(
            VAR.parse_readable_syntax(&mut doc, id, "var x = \"1\"", &factory),
            Err(ElementError::MalformedAssignment { .. })
        );
    }

    #[test]
    fn test_missing_equals() {
        assert_matches!(
            parse("var x;"),
            Err(ElementError::MalformedAssignment { span }) if span == " x"
        );
    }

    #[test]
    fn test_text_after_quoted_value_is_rejected() {
        assert_matches!(
            parse("var x = \"a\" junk;"),
            Err(ElementError::MalformedAssignment { span }) if span == " x = \"a\" junk"
        );
        assert_matches!(
            parse("property x = junk \"a\";"),
            Err(ElementError::MalformedAssignment { .. })
        );
    }

    #[test]
    fn test_source_rejects_empty_name() {
        let factory = ElementFactory::standard();
        let source = SourceNode::new("var")
            .with_attribute("name", "")
            .with_attribute("value", "b");
        assert_matches!(
            Document::from_source(&source, &factory),
            Err(ElementError::InvalidStructure { tag, .. }) if tag == "var"
        );
    }

    #[test]
    fn test_source_rejects_extra_attributes() {
        let factory = ElementFactory::standard();
        let source = SourceNode::new("property")
            .with_attribute("name", "a")
            .with_attribute("value", "b")
            .with_attribute("static", "true");
        assert_matches!(
            Document::from_source(&source, &factory),
            Err(ElementError::InvalidStructure { tag, .. }) if tag == "property"
        );
    }

    #[test]
    fn test_source_requires_name() {
        let factory = ElementFactory::standard();
        let source = SourceNode::new("var").with_attribute("value", "b");
        assert_matches!(
            Document::from_source(&source, &factory),
            Err(ElementError::InvalidStructure { .. })
        );
    }
}
