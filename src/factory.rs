//! Maps structured tags and readable fragments to element kinds.

use crate::elements::{Document, ElementKind, NodeId};
use crate::parser::errors::{ElementError, Result};
use crate::parser::lexer::{get_callee, split_annotations};
use regex::Regex;
use std::collections::HashMap;

/// Dispatch table from tag or leading keyword to the variant that builds
/// the element. Constructed once and passed to every parse.
#[derive(Debug, Clone)]
pub struct ElementFactory {
    tags: HashMap<String, ElementKind>,
    keywords: Vec<(Regex, ElementKind)>,
}

impl Default for ElementFactory {
    fn default() -> Self {
        Self::standard()
    }
}

impl ElementFactory {
    pub fn standard() -> Self {
        let tags = ElementKind::ALL
            .iter()
            .map(|&kind| (kind.tag().to_string(), kind))
            .collect();

        let keywords = [
            (r"^definition\s*\{", ElementKind::Definition),
            (r"^test\s+", ElementKind::Command),
            (r"^setUp\s*\{", ElementKind::SetUp),
            (r"^tearDown\s*\{", ElementKind::TearDown),
            (r"^else\s*\{", ElementKind::Else),
            (r"^if\s*\(", ElementKind::If),
            (r"^property\s", ElementKind::Property),
            (r"^var\s", ElementKind::Var),
            (r"^isSet\s*\(", ElementKind::IsSet),
        ]
        .into_iter()
        .map(|(pattern, kind)| {
            let re = Regex::new(pattern).expect("keyword regex should be valid");
            (re, kind)
        })
        .collect();

        Self { tags, keywords }
    }

    /// Accepts `tag` as another structured name for `kind`.
    pub fn with_tag(mut self, tag: impl Into<String>, kind: ElementKind) -> Self {
        self.tags.insert(tag.into(), kind);
        self
    }

    /// Registers a keyword pattern checked before the built-in ones.
    pub fn with_keyword(mut self, pattern: &str, kind: ElementKind) -> std::result::Result<Self, regex::Error> {
        self.keywords.insert(0, (Regex::new(pattern)?, kind));
        Ok(self)
    }

    pub fn kind_for_tag(&self, tag: &str) -> Option<ElementKind> {
        self.tags.get(tag).copied()
    }

    /// Picks the variant for a readable fragment from its leading keyword,
    /// or from its call shape: `Name(...);` executes, `Name(...)` is a
    /// condition.
    pub fn classify(&self, readable_syntax: &str) -> Result<ElementKind> {
        let (annotations, rest) = split_annotations(readable_syntax);

        let kind = self
            .keywords
            .iter()
            .find(|(re, _)| re.is_match(rest))
            .map(|(_, kind)| *kind)
            .or_else(|| {
                get_callee(rest)?;
                let trimmed = rest.trim_end();
                if trimmed.ends_with(");") {
                    Some(ElementKind::Execute)
                } else if trimmed.ends_with(')') {
                    Some(ElementKind::Condition)
                } else {
                    None
                }
            })
            .ok_or_else(|| ElementError::unrecognized(readable_syntax))?;

        let annotatable = matches!(kind, ElementKind::Definition | ElementKind::Command);
        if !annotations.is_empty() && !annotatable {
            return Err(ElementError::unrecognized(readable_syntax));
        }

        tracing::debug!("Classified fragment as {:?}", kind);
        Ok(kind)
    }

    pub fn new_element_from_source(
        &self,
        doc: &mut Document,
        source: &crate::source::SourceNode,
    ) -> Result<NodeId> {
        let kind = self
            .kind_for_tag(&source.name)
            .ok_or_else(|| ElementError::unrecognized(format!("<{}>", source.name)))?;

        tracing::debug!("Building <{}> as {:?}", source.name, kind);
        doc.build_from_source(kind, source, self)
    }

    pub fn new_element_from_readable(&self, doc: &mut Document, readable_syntax: &str) -> Result<NodeId> {
        let kind = self.classify(readable_syntax)?;
        let id = doc.create_element(kind);
        kind.variant()
            .parse_readable_syntax(doc, id, readable_syntax, self)?;
        Ok(id)
    }
}
