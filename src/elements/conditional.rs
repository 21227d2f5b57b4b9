use crate::elements::{
    add_parsed_attribute, check_allowed_attributes, check_no_attributes, check_no_children,
    render_arguments, require_attribute, Document, ElementKind, NodeId, Variant,
};
use crate::factory::ElementFactory;
use crate::parser::errors::{ElementError, Result};
use crate::parser::lexer::{
    get_enclosed_content, split_arguments, split_block_header, split_call,
};

const FUNCTION: &str = "function";
const VAR: &str = "var";

/// `if (<condition>) { ... }` with an optional trailing `else`. Children
/// are kept in the order condition, then, else.
pub struct If;

pub static IF: If = If;

impl If {
    fn part(doc: &Document, id: NodeId, pred: impl Fn(ElementKind) -> bool) -> Option<NodeId> {
        doc[id]
            .children()
            .iter()
            .copied()
            .find(|&child| pred(doc[child].kind()))
    }
}

impl Variant for If {
    fn block_name(&self, doc: &Document, id: NodeId) -> String {
        let condition = If::part(doc, id, ElementKind::is_condition)
            .map(|condition| doc.render(condition))
            .unwrap_or_default();
        format!("if ({})", condition)
    }

    fn parse_readable_syntax(
        &self,
        doc: &mut Document,
        id: NodeId,
        readable_syntax: &str,
        factory: &ElementFactory,
    ) -> Result<()> {
        let Some((header, body)) = split_block_header(readable_syntax) else {
            return Err(ElementError::unrecognized(readable_syntax));
        };
        let condition_text = header
            .strip_prefix("if")
            .and_then(|rest| get_enclosed_content(rest, '(', ')'))
            .map(str::trim)
            .ok_or_else(|| ElementError::unrecognized(readable_syntax))?;

        let condition = factory.new_element_from_readable(doc, condition_text)?;
        if !doc[condition].kind().is_condition() {
            return Err(ElementError::unrecognized(condition_text));
        }
        doc.add(id, condition)?;

        let then = doc.create_element(ElementKind::Then);
        ElementKind::Then
            .variant()
            .parse_readable_syntax(doc, then, body, factory)?;
        doc.add(id, then)
    }

    fn to_readable_syntax(&self, doc: &Document, id: NodeId) -> String {
        let content = If::part(doc, id, |kind| kind == ElementKind::Then)
            .map(|then| doc.render(then))
            .unwrap_or_default();

        let mut sb = String::from("\n");
        sb.push_str(&doc.create_readable_block(id, &content));
        if let Some(otherwise) = If::part(doc, id, |kind| kind == ElementKind::Else) {
            sb.push_str(&doc.render(otherwise));
        }
        sb
    }

    fn check_structure(&self, doc: &Document, id: NodeId) -> Result<()> {
        check_no_attributes(doc, id)?;

        let kinds: Vec<_> = doc[id].children().iter().map(|&c| doc[c].kind()).collect();
        match kinds.as_slice() {
            [condition, ElementKind::Then] | [condition, ElementKind::Then, ElementKind::Else]
                if condition.is_condition() =>
            {
                Ok(())
            }
            _ => Err(ElementError::structure(
                doc[id].name(),
                "expected a condition, a then and an optional else",
            )),
        }
    }
}

/// A call used as a test: `IsElementPresent(locator1 = "x")`.
pub struct Condition;

pub static CONDITION: Condition = Condition;

impl Variant for Condition {
    fn parse_readable_syntax(
        &self,
        doc: &mut Document,
        id: NodeId,
        readable_syntax: &str,
        _factory: &ElementFactory,
    ) -> Result<()> {
        let (callee, arguments) = split_call(readable_syntax)
            .ok_or_else(|| ElementError::unrecognized(readable_syntax))?;
        doc.set_attribute(id, FUNCTION, callee)?;

        for argument in split_arguments(arguments) {
            add_parsed_attribute(doc, id, argument)?;
        }

        Ok(())
    }

    fn to_readable_syntax(&self, doc: &Document, id: NodeId) -> String {
        format!(
            "{}({})",
            doc[id].attribute_value(FUNCTION).unwrap_or_default(),
            render_arguments(doc, id, &[FUNCTION])
        )
    }

    fn check_structure(&self, doc: &Document, id: NodeId) -> Result<()> {
        require_attribute(doc, id, FUNCTION)?;
        check_no_children(doc, id)
    }
}

/// `isSet(name)`: true when the variable has a value.
pub struct IsSet;

pub static IS_SET: IsSet = IsSet;

impl Variant for IsSet {
    fn parse_readable_syntax(
        &self,
        doc: &mut Document,
        id: NodeId,
        readable_syntax: &str,
        _factory: &ElementFactory,
    ) -> Result<()> {
        let content = readable_syntax
            .trim()
            .strip_prefix("isSet")
            .and_then(|rest| get_enclosed_content(rest, '(', ')'));
        match content.map(str::trim) {
            Some(name) if !name.is_empty() => doc.set_attribute(id, VAR, name),
            _ => Err(ElementError::malformed(readable_syntax)),
        }
    }

    fn to_readable_syntax(&self, doc: &Document, id: NodeId) -> String {
        format!("isSet({})", doc[id].attribute_value(VAR).unwrap_or_default())
    }

    fn check_structure(&self, doc: &Document, id: NodeId) -> Result<()> {
        require_attribute(doc, id, VAR)?;
        check_allowed_attributes(doc, id, &[VAR])?;
        check_no_children(doc, id)
    }
}
