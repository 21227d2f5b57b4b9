use crate::parser::errors::{ElementError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Returns everything between the first `{` and the last `}` of the span.
pub fn get_braced_content(readable_syntax: &str) -> Option<&str> {
    static BRACED_RE: OnceLock<Regex> = OnceLock::new();
    let re = BRACED_RE
        .get_or_init(|| Regex::new(r"(?s).*?\{(.*)\}").expect("braced regex should be valid"));
    first_group(re, readable_syntax)
}

/// Returns everything between the first `(` and the last `)` of the span.
pub fn get_parenthetical_content(readable_syntax: &str) -> Option<&str> {
    static PARENTHETICAL_RE: OnceLock<Regex> = OnceLock::new();
    let re = PARENTHETICAL_RE.get_or_init(|| {
        Regex::new(r"(?s).*?\((.*)\)").expect("parenthetical regex should be valid")
    });
    first_group(re, readable_syntax)
}

/// Returns everything between the first and the last `"` of the span.
pub fn get_quoted_content(readable_syntax: &str) -> Option<&str> {
    static QUOTED_RE: OnceLock<Regex> = OnceLock::new();
    let re =
        QUOTED_RE.get_or_init(|| Regex::new(r#"(?s).*?"(.*)""#).expect("quoted regex should be valid"));
    first_group(re, readable_syntax)
}

fn first_group<'a>(re: &Regex, input: &'a str) -> Option<&'a str> {
    re.captures(input)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Left-hand side of the first `=`, trimmed, with the `@`, `property ` and
/// `var ` prefixes removed.
pub fn get_name_from_assignment(assignment: &str) -> String {
    let name = assignment.split('=').next().unwrap_or_default().trim();

    name.replace('@', "")
        .replace("property ", "")
        .replace("var ", "")
}

/// Splits `name = "value"` into its name and value. A quoted right-hand
/// side must end at its closing quote; an unquoted one is taken trimmed
/// and may not contain quotes.
pub fn parse_assignment(assignment: &str) -> Result<(String, String)> {
    let Some(eq_index) = assignment.find('=') else {
        return Err(ElementError::malformed(assignment));
    };

    let name = get_name_from_assignment(assignment);
    if name.is_empty() {
        return Err(ElementError::malformed(assignment));
    }

    let rhs = assignment[eq_index + 1..].trim();
    let value = match rhs.strip_prefix('"') {
        Some(quoted) => quoted
            .strip_suffix('"')
            .ok_or_else(|| ElementError::malformed(assignment))?,
        None if rhs.contains('"') => return Err(ElementError::malformed(assignment)),
        None => rhs,
    };

    Ok((name, value.to_string()))
}

/// Byte index of the first `target` that sits outside quotes and outside
/// any `()`, `[]` or `{}` nesting.
pub fn find_top_level(input: &str, target: char) -> Option<usize> {
    let mut depth: usize = 0;
    let mut in_quote = false;

    for (byte_index, ch) in input.char_indices() {
        if in_quote {
            if ch == '"' {
                in_quote = false;
            }
            continue;
        }

        if ch == target && depth == 0 {
            return Some(byte_index);
        }

        match ch {
            '"' => in_quote = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    None
}

/// Splits a call's argument list on top-level commas. Commas inside quotes
/// or nested parentheses stay in their argument. Empty pieces are dropped.
pub fn split_arguments(arguments: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = arguments;

    while let Some(comma) = find_top_level(rest, ',') {
        pieces.push(rest[..comma].trim());
        rest = &rest[comma + 1..];
    }
    pieces.push(rest.trim());

    pieces.into_iter().filter(|piece| !piece.is_empty()).collect()
}

/// Splits `header { body }` at the first top-level `{` and its matching
/// `}`. Anything but whitespace after the closing brace rejects the span.
pub fn split_block_header(readable_syntax: &str) -> Option<(&str, &str)> {
    let open = find_top_level(readable_syntax, '{')?;
    let close = open + 1 + find_top_level(&readable_syntax[open + 1..], '}')?;

    if !readable_syntax[close + 1..].trim().is_empty() {
        return None;
    }

    Some((
        readable_syntax[..open].trim(),
        &readable_syntax[open + 1..close],
    ))
}

/// Content of a span that is exactly `<open>...<close>` once trimmed, where
/// the closer matches the opener rather than merely ending the span.
pub fn get_enclosed_content(readable_syntax: &str, open: char, close: char) -> Option<&str> {
    let inner = readable_syntax.trim().strip_prefix(open)?;
    let end = find_top_level(inner, close)?;

    inner[end + close.len_utf8()..]
        .is_empty()
        .then(|| &inner[..end])
}

/// Splits `Callee(arguments)` into the callee and the raw argument list.
/// Text around the parenthesized list rejects the span.
pub fn split_call(readable_syntax: &str) -> Option<(&str, &str)> {
    let callee = get_callee(readable_syntax)?;
    let start = readable_syntax.find(callee)? + callee.len();
    let arguments = get_enclosed_content(&readable_syntax[start..], '(', ')')?;
    Some((callee, arguments))
}

/// Separates leading `@name = "value"` annotation lines from the construct
/// they decorate.
pub fn split_annotations(readable_syntax: &str) -> (Vec<&str>, &str) {
    let mut annotations = Vec::new();
    let mut rest = readable_syntax.trim_start();

    while rest.starts_with('@') {
        let line_end = rest.find('\n').unwrap_or(rest.len());
        annotations.push(rest[..line_end].trim());
        rest = rest[line_end..].trim_start();
    }

    (annotations, rest)
}

/// Callee of a call-shaped fragment such as `Tag.add(name = "x");`.
pub fn get_callee(readable_syntax: &str) -> Option<&str> {
    static CALLEE_RE: OnceLock<Regex> = OnceLock::new();
    let re = CALLEE_RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_#.]*)\s*\(").expect("callee regex should be valid")
    });
    first_group(re, readable_syntax)
}
