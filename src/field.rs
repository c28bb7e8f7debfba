//! Payload field descriptions
//!
//! A [`Field`] is one entry of an event layout: a name, an [`InType`] telling how its bytes are
//! serialized, and optionally the index of a sibling field holding its element count.
//!
//! The [`FieldKind`] of a field (derived from the above) is what the decoder needs to find where
//! the field ends.
use crate::event_record::PointerSize;

/// How a field is serialized in the payload
///
/// This mirrors the `win:` input types used by event manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    /// 4 bytes, zero is `false`
    Boolean,
    HexInt32,
    HexInt64,
    /// 16 bytes, mixed-endian
    Guid,
    /// Address-sized, depends on the bitness of the traced process
    Pointer,
    /// Null-terminated UTF-16LE
    UnicodeString,
}

impl InType {
    /// Size in bytes of a value of this type, `None` for pointers and strings
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            InType::Int8 | InType::UInt8 => Some(1),
            InType::Int16 | InType::UInt16 => Some(2),
            InType::Int32
            | InType::UInt32
            | InType::Float
            | InType::Boolean
            | InType::HexInt32 => Some(4),
            InType::Int64 | InType::UInt64 | InType::Double | InType::HexInt64 => Some(8),
            InType::Guid => Some(16),
            InType::Pointer | InType::UnicodeString => None,
        }
    }

    /// Whether a field of this type can hold the element count of an array
    pub const fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            InType::UInt8
                | InType::UInt16
                | InType::UInt32
                | InType::UInt64
                | InType::HexInt32
                | InType::HexInt64
        )
    }
}

/// Width of one element of an array field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementWidth {
    Fixed(usize),
    Pointer,
}

impl ElementWidth {
    pub const fn bytes(self, pointer_size: PointerSize) -> usize {
        match self {
            ElementWidth::Fixed(width) => width,
            ElementWidth::Pointer => pointer_size.bytes(),
        }
    }
}

/// The layout class of a field, which tells how its byte width is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Always the same number of bytes (1, 2, 4, 8 or 16)
    FixedScalar(usize),
    /// 4 or 8 bytes, depending on the bitness of the traced process
    PointerSized,
    /// UTF-16 code units up to and including a zero unit
    NullTerminatedUtf16String,
    /// `count * element` bytes, where `count` is the value of the field at index `count_field`
    CountPrefixedArray {
        element: ElementWidth,
        count_field: usize,
    },
}

/// One field of an event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: &'static str,
    pub in_type: InType,
    /// Index of the field holding the element count, for arrays
    pub count_field: Option<usize>,
}

impl Field {
    pub const fn new(name: &'static str, in_type: InType) -> Self {
        Field {
            name,
            in_type,
            count_field: None,
        }
    }

    /// An array of `in_type`, whose length is given by the field at index `count_field`
    pub const fn array(name: &'static str, in_type: InType, count_field: usize) -> Self {
        Field {
            name,
            in_type,
            count_field: Some(count_field),
        }
    }

    pub const fn is_array(&self) -> bool {
        self.count_field.is_some()
    }

    /// Returns `None` for arrays of strings, which cannot be laid out
    pub const fn kind(&self) -> Option<FieldKind> {
        let element = match (self.in_type.fixed_width(), self.in_type) {
            (Some(width), _) => ElementWidth::Fixed(width),
            (None, InType::Pointer) => ElementWidth::Pointer,
            (None, _) => {
                return match self.count_field {
                    None => Some(FieldKind::NullTerminatedUtf16String),
                    Some(_) => None,
                }
            }
        };

        match (self.count_field, element) {
            (Some(count_field), element) => Some(FieldKind::CountPrefixedArray {
                element,
                count_field,
            }),
            (None, ElementWidth::Fixed(width)) => Some(FieldKind::FixedScalar(width)),
            (None, ElementWidth::Pointer) => Some(FieldKind::PointerSized),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_field_kinds() {
        assert_eq!(
            Field::new("ClrInstanceID", InType::UInt16).kind(),
            Some(FieldKind::FixedScalar(2))
        );
        assert_eq!(
            Field::new("Signature", InType::Guid).kind(),
            Some(FieldKind::FixedScalar(16))
        );
        assert_eq!(
            Field::new("Address", InType::Pointer).kind(),
            Some(FieldKind::PointerSized)
        );
        assert_eq!(
            Field::new("Name", InType::UnicodeString).kind(),
            Some(FieldKind::NullTerminatedUtf16String)
        );
        assert_eq!(
            Field::array("Offsets", InType::UInt32, 3).kind(),
            Some(FieldKind::CountPrefixedArray {
                element: ElementWidth::Fixed(4),
                count_field: 3
            })
        );
        assert_eq!(
            Field::array("Stack", InType::Pointer, 3).kind(),
            Some(FieldKind::CountPrefixedArray {
                element: ElementWidth::Pointer,
                count_field: 3
            })
        );
        assert_eq!(Field::array("Names", InType::UnicodeString, 0).kind(), None);
    }

    #[test]
    fn test_element_width() {
        assert_eq!(ElementWidth::Fixed(4).bytes(PointerSize::Bits64), 4);
        assert_eq!(ElementWidth::Pointer.bytes(PointerSize::Bits32), 4);
        assert_eq!(ElementWidth::Pointer.bytes(PointerSize::Bits64), 8);
    }
}
