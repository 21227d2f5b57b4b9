use crate::elements::{check_no_attributes, check_statement_children, Document, NodeId, Variant};
use crate::factory::ElementFactory;
use crate::parser::errors::{ElementError, Result};
use crate::parser::lexer::split_block_header;

/// A keyword followed by a braced body of statements.
pub struct Block {
    keyword: &'static str,
    leading_blank: bool,
}

pub static SET_UP: Block = Block {
    keyword: "setUp",
    leading_blank: true,
};

pub static TEAR_DOWN: Block = Block {
    keyword: "tearDown",
    leading_blank: true,
};

/// `else` hangs off the closing brace of its `if`, so no blank line.
pub static ELSE: Block = Block {
    keyword: "else",
    leading_blank: false,
};

impl Variant for Block {
    fn block_name(&self, _doc: &Document, _id: NodeId) -> String {
        self.keyword.to_string()
    }

    fn parse_readable_syntax(
        &self,
        doc: &mut Document,
        id: NodeId,
        readable_syntax: &str,
        factory: &ElementFactory,
    ) -> Result<()> {
        match split_block_header(readable_syntax) {
            Some((header, body)) if header == self.keyword => {
                doc.add_elements_from_readable_syntax(id, body, factory)
            }
            _ => Err(ElementError::unrecognized(readable_syntax)),
        }
    }

    fn to_readable_syntax(&self, doc: &Document, id: NodeId) -> String {
        let mut sb = String::new();
        if self.leading_blank {
            sb.push('\n');
        }
        sb.push_str(&doc.create_readable_block(id, &doc.render_children(id)));
        sb
    }

    fn check_structure(&self, doc: &Document, id: NodeId) -> Result<()> {
        check_no_attributes(doc, id)?;
        check_statement_children(doc, id)
    }
}

/// Body of an `if`. Has no syntax of its own: its statements render
/// straight into the enclosing block.
pub struct Then;

pub static THEN: Then = Then;

impl Variant for Then {
    fn parse_readable_syntax(
        &self,
        doc: &mut Document,
        id: NodeId,
        readable_syntax: &str,
        factory: &ElementFactory,
    ) -> Result<()> {
        doc.add_elements_from_readable_syntax(id, readable_syntax, factory)
    }

    fn check_structure(&self, doc: &Document, id: NodeId) -> Result<()> {
        check_no_attributes(doc, id)?;
        check_statement_children(doc, id)
    }
}
