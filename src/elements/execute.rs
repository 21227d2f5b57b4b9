use crate::elements::{
    add_parsed_attribute, check_allowed_attributes, check_no_children, render_arguments,
    require_attribute, statement_break, Document, ElementKind, NodeId, Variant,
};
use crate::factory::ElementFactory;
use crate::parser::errors::{ElementError, Result};
use crate::parser::lexer::{parse_assignment, split_arguments, split_call};

const FUNCTION: &str = "function";
const MACRO: &str = "macro";

/// A call statement. `Class.command(...)` invokes a macro whose arguments
/// are `var` children; any other callee is a function whose arguments are
/// plain attributes.
pub struct Execute;

pub static EXECUTE: Execute = Execute;

impl Variant for Execute {
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
            .ok_or_else(|| ElementError::unrecognized(readable_syntax))?;
        let (callee, arguments) =
            split_call(statement).ok_or_else(|| ElementError::unrecognized(readable_syntax))?;
        let arguments = split_arguments(arguments);

        if callee.contains('.') {
            doc.set_attribute(id, MACRO, callee.replace('.', "#"))?;
            for argument in arguments {
                let (name, value) = parse_assignment(argument)?;
                let taken = doc[id]
                    .children()
                    .iter()
                    .any(|&var| doc[var].attribute_value("name") == Some(name.as_str()));
                if taken {
                    return Err(ElementError::malformed(argument));
                }
                let var = doc.create_element(ElementKind::Var);
                doc.set_attribute(var, "name", name)?;
                doc.set_attribute(var, "value", value)?;
                doc.add(id, var)?;
            }
        } else {
            doc.set_attribute(id, FUNCTION, callee)?;
            for argument in arguments {
                add_parsed_attribute(doc, id, argument)?;
            }
        }

        Ok(())
    }

    fn to_readable_syntax(&self, doc: &Document, id: NodeId) -> String {
        let element = &doc[id];
        let line_break = statement_break(doc, id);

        match element.attribute_value(MACRO) {
            Some(macro_name) => {
                let arguments = element
                    .children()
                    .iter()
                    .map(|&var| {
                        format!(
                            "{} = \"{}\"",
                            doc[var].attribute_value("name").unwrap_or_default(),
                            doc[var].attribute_value("value").unwrap_or_default()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}{}({});", line_break, macro_name.replace('#', "."), arguments)
            }
            None => format!(
                "{}{}({});",
                line_break,
                element.attribute_value(FUNCTION).unwrap_or_default(),
                render_arguments(doc, id, &[FUNCTION])
            ),
        }
    }

    fn check_structure(&self, doc: &Document, id: NodeId) -> Result<()> {
        let element = &doc[id];

        match (element.attribute_value(FUNCTION), element.attribute_value(MACRO)) {
            (Some(_), None) => {
                let function = require_attribute(doc, id, FUNCTION)?;
                if function.contains('.') {
                    return Err(ElementError::structure(
                        element.name(),
                        format!("function \"{}\" cannot contain \".\"", function),
                    ));
                }
                check_no_children(doc, id)
            }
            (None, Some(_)) => {
                let macro_name = require_attribute(doc, id, MACRO)?;
                let well_formed = macro_name
                    .split_once('#')
                    .is_some_and(|(class, command)| {
                        !class.trim().is_empty() && !command.trim().is_empty()
                    });
                if !well_formed || macro_name.contains('.') {
                    return Err(ElementError::structure(
                        element.name(),
                        format!("macro \"{}\" must look like Class#command", macro_name),
                    ));
                }
                check_allowed_attributes(doc, id, &[MACRO])?;
                match element
                    .children()
                    .iter()
                    .find(|&&child| doc[child].kind() != ElementKind::Var)
                {
                    Some(&child) => Err(ElementError::structure(
                        element.name(),
                        format!("<{}> cannot be a macro argument", doc[child].name()),
                    )),
                    None => Ok(()),
                }
            }
            _ => Err(ElementError::structure(
                element.name(),
                "expected exactly one of \"function\" or \"macro\"",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceNode;
    use assert_matches::assert_matches;

    fn parse(text: &str) -> Result<(Document, NodeId)> {
        let factory = ElementFactory::standard();
        let mut doc = Document::new();
        let id = factory.new_element_from_readable(&mut doc, text)?;
        Ok((doc, id))
    }

    #[test]
    fn test_parse_function() {
        let (doc, id) = parse("AssertTextEquals(locator1 = \"Tags#TAG\", value1 = \"x\");").unwrap();
        let names: Vec<_> = doc[id].attributes().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["function", "locator1", "value1"]);
        assert_eq!(doc[id].attribute_value("function"), Some("AssertTextEquals"));
        assert!(doc[id].children().is_empty());
    }

    #[test]
    fn test_parse_macro() {
        let (doc, id) = parse("Tag.add(tagName = \"${tagName}\");").unwrap();
        assert_eq!(doc[id].attribute_value("macro"), Some("Tag#add"));

        let children = doc[id].children();
        assert_eq!(children.len(), 1);
        assert_eq!(doc[children[0]].kind(), ElementKind::Var);
        assert_eq!(doc[children[0]].attribute_value("name"), Some("tagName"));
        assert_eq!(doc[children[0]].attribute_value("value"), Some("${tagName}"));
    }

    #[test]
    fn test_function_keeps_hash_in_name() {
        let (doc, id) = parse("Click#clickAt(locator1 = \"a\");").unwrap();
        assert_eq!(doc[id].attribute_value("function"), Some("Click#clickAt"));
        assert_eq!(doc.render(id), "\nClick#clickAt(locator1 = \"a\");");
    }

    #[test]
    fn test_render_macro() {
        let (doc, id) = parse("User.firstLoginPG(userEmailAddress = \"test@liferay.com\");").unwrap();
        assert_eq!(
            doc.render(id),
            "\nUser.firstLoginPG(userEmailAddress = \"test@liferay.com\");"
        );
    }

    #[test]
    fn test_render_without_arguments() {
        let (doc, id) = parse("Refresh();").unwrap();
        assert_eq!(doc.render(id), "\nRefresh();");
    }

    #[test]
    fn test_bad_argument() {
        assert_matches!(
            parse("Tag.add(tagName);"),
            Err(ElementError::MalformedAssignment { span }) if span == "tagName"
        );
    }

    #[test]
    fn test_text_after_quoted_argument_is_rejected() {
        assert_matches!(
            parse("Click(locator1 = \"a\" junk);"),
            Err(ElementError::MalformedAssignment { span }) if span == "locator1 = \"a\" junk"
        );
    }

    #[test]
    fn test_text_after_arguments_is_rejected() {
        assert_matches!(
            parse("Click(locator1 = \"a\") junk;"),
            Err(ElementError::UnrecognizedVariant { construct }) if construct == "Click(locator1 = \"a\") junk;"
        );
        assert_matches!(
            parse("Click(locator1 = \"a\")(value1 = \"b\");"),
            Err(ElementError::UnrecognizedVariant { .. })
        );
    }

    #[test]
    fn test_argument_cannot_replace_function() {
        assert_matches!(
            parse("Click(function = \"Type\", locator1 = \"a\");"),
            Err(ElementError::MalformedAssignment { span }) if span == "function = \"Type\""
        );
    }

    #[test]
    fn test_repeated_function_argument_is_rejected() {
        assert_matches!(
            parse("Click(locator1 = \"a\", locator1 = \"b\");"),
            Err(ElementError::MalformedAssignment { span }) if span == "locator1 = \"b\""
        );
    }

    #[test]
    fn test_repeated_macro_argument_is_rejected() {
        assert_matches!(
            parse("Tag.add(tagName = \"a\", tagName = \"b\");"),
            Err(ElementError::MalformedAssignment { span }) if span == "tagName = \"b\""
        );
    }

    #[test]
    fn test_source_rejects_empty_callee() {
        let factory = ElementFactory::standard();
        let source = SourceNode::new("execute").with_attribute("function", "");
        assert_matches!(
            Document::from_source(&source, &factory),
            Err(ElementError::InvalidStructure { message, .. }) if message.contains("empty")
        );

        for name in ["#add", "Tag#", "#"] {
            let source = SourceNode::new("execute").with_attribute("macro", name);
            assert_matches!(
                Document::from_source(&source, &factory),
                Err(ElementError::InvalidStructure { .. }),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_source_needs_exactly_one_callee() {
        let factory = ElementFactory::standard();
        let both = SourceNode::new("execute")
            .with_attribute("function", "Click")
            .with_attribute("macro", "Tag#add");
        assert_matches!(
            Document::from_source(&both, &factory),
            Err(ElementError::InvalidStructure { .. })
        );
        assert_matches!(
            Document::from_source(&SourceNode::new("execute"), &factory),
            Err(ElementError::InvalidStructure { .. })
        );
    }

    #[test]
    fn test_source_macro_rejects_extra_attributes() {
        let factory = ElementFactory::standard();
        let source = SourceNode::new("execute")
            .with_attribute("macro", "Tag#add")
            .with_attribute("tagName", "x");
        assert_matches!(
            Document::from_source(&source, &factory),
            Err(ElementError::InvalidStructure { message, .. }) if message.contains("tagName")
        );
    }

    #[test]
    fn test_source_macro_needs_class() {
        let factory = ElementFactory::standard();
        let source = SourceNode::new("execute").with_attribute("macro", "add");
        assert_matches!(
            Document::from_source(&source, &factory),
            Err(ElementError::InvalidStructure { .. })
        );
    }

    #[test]
    fn test_source_function_rejects_children() {
        let factory = ElementFactory::standard();
        let source = SourceNode::new("execute")
            .with_attribute("function", "Click")
            .with_child(
                SourceNode::new("var")
                    .with_attribute("name", "x")
                    .with_attribute("value", "1"),
            );
        assert_matches!(
            Document::from_source(&source, &factory),
            Err(ElementError::InvalidStructure { .. })
        );
    }

    #[test]
    fn test_source_macro_renders_var_children() {
        let factory = ElementFactory::standard();
        let source = SourceNode::new("execute")
            .with_attribute("macro", "Tag#add")
            .with_child(
                SourceNode::new("var")
                    .with_attribute("name", "tagName")
                    .with_attribute("value", "tag1"),
            );
        let doc = Document::from_source(&source, &factory).unwrap();
        assert_eq!(doc.to_readable_syntax(), "Tag.add(tagName = \"tag1\");\n");
    }
}
