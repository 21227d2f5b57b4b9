use crate::parser::balance::is_valid_readable_block;
use crate::parser::errors::{ElementError, Result};

/// Splits a block body into complete fragments.
///
/// Lines are trimmed and blank lines dropped; text accumulates until the
/// buffer forms a valid readable block. Text still buffered when the body
/// ends is an unbalanced fragment.
pub fn split_fragments(body: &str) -> Result<Vec<String>> {
    let mut fragments = Vec::new();
    let mut buffer = String::new();

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(trimmed);

        if is_valid_readable_block(&buffer) {
            tracing::trace!("Completed fragment: {}", buffer);
            fragments.push(std::mem::take(&mut buffer));
        }
    }

    if !buffer.is_empty() {
        return Err(ElementError::UnbalancedSyntax { span: buffer });
    }

    Ok(fragments)
}
