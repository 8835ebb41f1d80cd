//! Flat decode plan produced by the schema compiler

use std::fmt;

use super::PrimitiveType;

/// Structured key of a decoded field: identifier plus array element index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    /// Field identifier as declared in the schema
    pub id: String,
    /// Zero-based element index for expanded array fields
    pub index: Option<usize>,
}

impl FieldKey {
    /// Key of a non-array field.
    pub fn scalar(id: impl Into<String>) -> Self {
        Self { id: id.into(), index: None }
    }

    /// Key of one element of an array field.
    pub fn element(id: impl Into<String>, index: usize) -> Self {
        Self { id: id.into(), index: Some(index) }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.id, index),
            None => f.write_str(&self.id),
        }
    }
}

/// One decode instruction: read `width` bytes as `primitive` and store under `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub key: FieldKey,
    pub primitive: PrimitiveType,
    pub width: usize,
}

impl PlanEntry {
    /// Entry whose width comes from the primitive type table.
    pub fn new(key: FieldKey, primitive: PrimitiveType) -> Self {
        Self { key, primitive, width: primitive.size() }
    }
}

/// Ordered decode instructions.
///
/// Offsets are never stored; they come from accumulating widths in plan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPlan {
    entries: Vec<PlanEntry>,
    total_width: usize,
}

impl FieldPlan {
    /// Build a plan from entries in decode order.
    pub fn new(entries: Vec<PlanEntry>) -> Self {
        let total_width = entries.iter().map(|entry| entry.width).sum();
        Self { entries, total_width }
    }

    /// Entries in decode order.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Number of entries; array fields count once per element.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry widths.
    pub fn total_width(&self) -> usize {
        self.total_width
    }

    /// Entries paired with their absolute offsets when decoding starts at `start`.
    ///
    /// Offsets saturate at `usize::MAX` rather than wrapping.
    pub fn layout(&self, start: usize) -> impl Iterator<Item = (usize, &PlanEntry)> + '_ {
        self.entries.iter().scan(start, |cursor, entry| {
            let offset = *cursor;
            *cursor = cursor.saturating_add(entry.width);
            Some((offset, entry))
        })
    }
}
