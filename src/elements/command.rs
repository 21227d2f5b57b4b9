use crate::elements::{
    check_statement_children, parse_annotations, render_annotations, require_attribute, Document,
    NodeId, Variant,
};
use crate::factory::ElementFactory;
use crate::parser::errors::{ElementError, Result};
use crate::parser::lexer::{split_annotations, split_block_header};

const KEYWORD: &str = "test";
const NAME: &str = "name";

/// A named test case. `name` is rendered in the header; every other
/// attribute becomes an annotation line above it.
pub struct Command;

pub static COMMAND: Command = Command;

impl Variant for Command {
    fn block_name(&self, doc: &Document, id: NodeId) -> String {
        format!(
            "{} {}",
            KEYWORD,
            doc[id].attribute_value(NAME).unwrap_or_default()
        )
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
        let name = header
            .strip_prefix(KEYWORD)
            .map(str::trim)
            .unwrap_or_default();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(ElementError::unrecognized(readable_syntax));
        }

        doc.set_attribute(id, NAME, name)?;
        parse_annotations(doc, id, &annotations)?;
        doc.add_elements_from_readable_syntax(id, body, factory)
    }

    fn to_readable_syntax(&self, doc: &Document, id: NodeId) -> String {
        let mut sb = String::from("\n");
        sb.push_str(&render_annotations(doc, id, &[NAME]));
        sb.push_str(&doc.create_readable_block(id, &doc.render_children(id)));
        sb
    }

    fn check_structure(&self, doc: &Document, id: NodeId) -> Result<()> {
        require_attribute(doc, id, NAME)?;
        check_statement_children(doc, id)
    }
}
