//! Resolved event properties
//!
//! Once the decoder has located a field within a payload, it hands out a [`PropertySlice`]: the
//! [`Field`] description along with the exact bytes it spans.
use crate::field::Field;

/// A field of an event, located in the payload
#[derive(Debug, Clone, Copy)]
pub struct PropertySlice<'schema, 'record> {
    pub field: &'schema Field,
    /// Where the field starts within the payload
    pub offset: usize,
    /// The bytes of the field (including the terminator, for strings)
    pub buffer: &'record [u8],
}

impl PropertySlice<'_, '_> {
    pub fn name(&self) -> &'static str {
        self.field.name
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Offset of the first byte after this field
    pub fn end(&self) -> usize {
        self.offset + self.buffer.len()
    }
}
