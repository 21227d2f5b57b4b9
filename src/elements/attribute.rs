use crate::source::SourceAttribute;
use std::sync::Arc;

/// The engine's attribute type. It wraps a shared raw attribute so callers
/// holding the raw value can still find (and remove) the wrapper by identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    inner: Arc<SourceAttribute>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::wrap(Arc::new(SourceAttribute::new(name, value)))
    }

    pub fn wrap(inner: Arc<SourceAttribute>) -> Self {
        Self { inner }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn value(&self) -> &str {
        &self.inner.value
    }

    pub fn inner(&self) -> &Arc<SourceAttribute> {
        &self.inner
    }

    /// True when this wrapper holds exactly `raw`, not just an equal value.
    pub fn wraps(&self, raw: &Arc<SourceAttribute>) -> bool {
        Arc::ptr_eq(&self.inner, raw)
    }

    pub fn to_source(&self) -> SourceAttribute {
        SourceAttribute::clone(&self.inner)
    }
}

impl From<SourceAttribute> for Attribute {
    fn from(raw: SourceAttribute) -> Self {
        Attribute::wrap(Arc::new(raw))
    }
}

impl From<Arc<SourceAttribute>> for Attribute {
    fn from(raw: Arc<SourceAttribute>) -> Self {
        Attribute::wrap(raw)
    }
}

/// An attribute to look up on a node: either an engine wrapper or the raw
/// value some wrapper holds.
#[derive(Debug, Clone, Copy)]
pub enum AttributeRef<'a> {
    Native(&'a Attribute),
    Foreign(&'a Arc<SourceAttribute>),
}

impl<'a> From<&'a Attribute> for AttributeRef<'a> {
    fn from(attribute: &'a Attribute) -> Self {
        AttributeRef::Native(attribute)
    }
}

impl<'a> From<&'a Arc<SourceAttribute>> for AttributeRef<'a> {
    fn from(raw: &'a Arc<SourceAttribute>) -> Self {
        AttributeRef::Foreign(raw)
    }
}

impl AttributeRef<'_> {
    pub(crate) fn matches(&self, candidate: &Attribute) -> bool {
        match self {
            AttributeRef::Native(attribute) => candidate.wraps(attribute.inner()),
            AttributeRef::Foreign(raw) => candidate.wraps(raw),
        }
    }
}
