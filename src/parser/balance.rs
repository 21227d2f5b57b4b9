//! Delimiter balance checks used to decide when accumulated text forms a
//! complete, parseable fragment.

/// Opening delimiters and their closing partners.
const CODE_BOUNDARIES: [(char, char); 4] = [('"', '"'), ('(', ')'), ('{', '}'), ('[', ']')];

fn closing_partner(open: char) -> Option<char> {
    CODE_BOUNDARIES
        .iter()
        .find(|(o, _)| *o == open)
        .map(|(_, c)| *c)
}

fn is_closing(c: char) -> bool {
    CODE_BOUNDARIES.iter().any(|(_, close)| *close == c)
}

/// Returns true when every `"`, `(`, `{` and `[` in `readable_syntax` is
/// closed in matching order. Inside a double-quoted span every other
/// delimiter is literal until the closing quote.
pub fn is_balanced(readable_syntax: &str) -> bool {
    let mut stack: Vec<char> = Vec::new();

    for c in readable_syntax.chars() {
        if let Some(&top) = stack.last() {
            if closing_partner(top) == Some(c) {
                stack.pop();
                continue;
            }

            if top == '"' {
                continue;
            }
        }

        if closing_partner(c).is_some() {
            stack.push(c);
            continue;
        }

        if is_closing(c) {
            return false;
        }
    }

    stack.is_empty()
}

/// Statement (`;`) and block (`}`) terminators mark text that must pass
/// the balance scan before it is accepted.
pub fn is_balance_validation_required(readable_syntax: &str) -> bool {
    let trimmed = readable_syntax.trim();
    trimmed.ends_with(';') || trimmed.ends_with('}')
}

/// Decides whether `readable_syntax` is a complete fragment. `false` means
/// the caller should keep accumulating text.
///
/// `property`/`var` assignments are single-line by grammar and are only
/// checked for their trailing `;`; a quoted value spanning several lines
/// is therefore split early.
pub fn is_valid_readable_block(readable_syntax: &str) -> bool {
    let trimmed = readable_syntax.trim();

    if trimmed.starts_with("property") || trimmed.starts_with("var") {
        return trimmed.ends_with(';');
    }

    if is_balance_validation_required(trimmed) {
        return is_balanced(trimmed);
    }

    false
}
