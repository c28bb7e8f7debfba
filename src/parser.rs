//! ETW Payload Parser
//!
//! This module decodes the fields of an event payload, given the [`Schema`] that describes it.
//!
//! Fields are laid out back to back, in declaration order. Some of them have a width that depends on
//! their content (strings), on a previous field (arrays) or on the bitness of the traced process (pointers),
//! so the offset of a field can only be known once every field before it has been sized.
//! The [`Parser`] computes these offsets lazily, the first time a field (or a later one) is accessed,
//! and memoizes them.
use crate::event_record::{EventRecord, PointerSize};
use crate::field::{Field, FieldKind, InType};
use crate::guid::{Guid, GUID_SIZE};
use crate::property::PropertySlice;
use crate::schema::Schema;
use std::cell::RefCell;
#[cfg(test)]
use std::cell::Cell;
use std::marker::PhantomData;

use num_traits::FromPrimitive;

/// Parser module errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// No property has this name (or index)
    NotFound,
    /// The requested type cannot represent this property
    InvalidType,
    /// Length mismatch when parsing a type
    LengthMismatch,
    /// The byte range of a field extends past the end of the payload
    TruncatedBuffer {
        field: &'static str,
        offset: usize,
        /// Width of the field, unknown for a string that has no terminator.
        /// An array whose width overflows `usize` reports `usize::MAX`
        length: Option<usize>,
        buffer_len: usize,
    },
    /// The element count of an array is held by a field that is not an unsigned integer
    InvalidCount {
        field: &'static str,
        count_field: &'static str,
    },
    /// An error trying to get an slice as an array
    SliceError,
}

impl From<std::array::TryFromSliceError> for ParserError {
    fn from(_err: std::array::TryFromSliceError) -> Self {
        ParserError::SliceError
    }
}

impl std::fmt::Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::InvalidType => write!(f, "invalid type"),
            Self::LengthMismatch => write!(f, "length mismatch"),
            Self::TruncatedBuffer {
                field,
                offset,
                length: Some(length),
                buffer_len,
            } => write!(
                f,
                "truncated buffer: `{}` spans {}..{} but the payload is {} bytes long",
                field,
                offset,
                offset.saturating_add(*length),
                buffer_len
            ),
            Self::TruncatedBuffer {
                field,
                offset,
                length: None,
                buffer_len,
            } => write!(
                f,
                "truncated buffer: `{}` starts at {} and is not terminated within the {} bytes of the payload",
                field, offset, buffer_len
            ),
            Self::InvalidCount { field, count_field } => write!(
                f,
                "invalid count: `{}` is sized by `{}`, which is not an unsigned integer",
                field, count_field
            ),
            Self::SliceError => write!(f, "slice error"),
        }
    }
}

impl std::error::Error for ParserError {}

pub type ParserResult<T> = Result<T, ParserError>;

/// Represents a Parser
///
/// This structure provides a way to decode the payload of an ETW event (= extract its properties).
/// Because properties may have variable length (e.g. strings), a `Parser` is only suited to a single [`EventRecord`].
///
/// Offsets are memoized in the `Parser` itself, behind a `RefCell`: a `Parser` must not be shared between
/// threads (it is `!Sync`). Several parsers over different records can be used from different threads.
///
/// # Example
/// ```
/// # use clretw::{EventRecord, SchemaLocator};
/// # use clretw::parser::Parser;
/// fn my_callback(record: &EventRecord) {
///     let schema = SchemaLocator::global().event_schema(record).unwrap();
///     let parser = Parser::create(record, schema);
///
///     // There are several ways to define the type requested for `try_parse`
///     // It is possible to use type inference...
///     let property1: Option<String> = parser.try_parse("MethodName").ok();
///
///     // ...or to use the turbofish operator
///     match parser.try_parse::<u16>("ClrInstanceID") {
///         Ok(_) => println!("ClrInstanceID is a valid u16"),
///         Err(_) => println!("ClrInstanceID is invalid"),
///     }
/// }
/// ```
pub struct Parser<'schema, 'record> {
    properties: &'schema [Field],
    record: EventRecord<'record>,
    /// `offsets[i]` is where field `i` starts, `offsets[properties.len()]` is where the last one ends
    offsets: RefCell<Vec<Option<usize>>>,
    #[cfg(test)]
    width_resolutions: Cell<usize>,
}

impl<'schema, 'record> Parser<'schema, 'record> {
    /// Use the `create` function to create an instance of a Parser
    ///
    /// # Arguments
    /// * `event_record` - The event we want to parse
    /// * `schema` - The [Schema] from the ETW Event we want to parse
    pub fn create(event_record: &EventRecord<'record>, schema: &'schema Schema) -> Self {
        Self::from_fields(event_record, schema.properties())
    }

    /// Creates a Parser from a bare list of fields
    pub fn from_fields(event_record: &EventRecord<'record>, properties: &'schema [Field]) -> Self {
        let mut offsets = vec![None; properties.len() + 1];
        offsets[0] = Some(0);
        Parser {
            properties,
            record: *event_record,
            offsets: RefCell::new(offsets),
            #[cfg(test)]
            width_resolutions: Cell::new(0),
        }
    }

    pub fn record(&self) -> &EventRecord<'record> {
        &self.record
    }

    pub fn properties(&self) -> &'schema [Field] {
        self.properties
    }

    fn buffer(&self) -> &'record [u8] {
        self.record.user_buffer()
    }

    fn truncated(&self, field: &Field, offset: usize, length: Option<usize>) -> ParserError {
        let buffer_len = self.buffer().len();
        log::debug!(
            "field `{}` at offset {} (length {:?}) does not fit in a {} bytes payload",
            field.name,
            offset,
            length,
            buffer_len
        );
        ParserError::TruncatedBuffer {
            field: field.name,
            offset,
            length,
            buffer_len,
        }
    }

    /// Computes the byte width of the field at `index`, which starts at `offset`
    fn resolve_width(&self, index: usize, offset: usize) -> ParserResult<usize> {
        #[cfg(test)]
        self.width_resolutions.set(self.width_resolutions.get() + 1);

        let property = &self.properties[index];
        // Schemas are validated before being served, but a Parser may be built over any field list
        let kind = property.kind().ok_or(ParserError::InvalidType)?;

        match kind {
            FieldKind::FixedScalar(width) => Ok(width),
            FieldKind::PointerSized => Ok(self.record.pointer_size().bytes()),
            FieldKind::NullTerminatedUtf16String => {
                let remaining = self.buffer().get(offset..).unwrap_or_default();
                match remaining
                    .chunks_exact(2)
                    .position(|unit| unit[0] == 0 && unit[1] == 0)
                {
                    Some(units) => Ok((units + 1) * 2),
                    None => Err(self.truncated(property, offset, None)),
                }
            }
            FieldKind::CountPrefixedArray {
                element,
                count_field,
            } => {
                let count = self.read_count(index, count_field)?;
                let width = element.bytes(self.record.pointer_size());
                usize::try_from(count)
                    .ok()
                    .and_then(|count| count.checked_mul(width))
                    // A width past the address space can never fit
                    .ok_or_else(|| self.truncated(property, offset, Some(usize::MAX)))
            }
        }
    }

    /// Reads the element count of the array at `index`
    fn read_count(&self, index: usize, count_field: usize) -> ParserResult<u64> {
        let invalid = || ParserError::InvalidCount {
            field: self.properties[index].name,
            count_field: self
                .properties
                .get(count_field)
                .map(|f| f.name)
                .unwrap_or("?"),
        };

        if count_field >= index {
            return Err(invalid());
        }
        let count = self.property_slice(count_field)?;
        if count.field.is_array() || !count.field.in_type.is_unsigned_integer() {
            return Err(invalid());
        }
        read_unsigned(count.buffer).ok_or_else(invalid)
    }

    /// Returns the offset of the field at `index` within the payload
    ///
    /// `index == self.properties().len()` gives the offset right after the last field.
    /// Every offset up to `index` is memoized, so that it is computed at most once per `Parser`.
    ///
    /// Computing an offset does not check that the field fits within the payload, but it may fail
    /// in case the width of a previous field cannot be resolved (e.g. a string with no terminator).
    pub fn field_offset(&self, index: usize) -> ParserResult<usize> {
        if index > self.properties.len() {
            return Err(ParserError::NotFound);
        }

        // Start from the closest offset we already know. offsets[0] is always known
        let (mut current, mut offset) = {
            let offsets = self.offsets.borrow();
            let mut i = index;
            loop {
                if let Some(offset) = offsets[i] {
                    break (i, offset);
                }
                i -= 1;
            }
        };

        while current < index {
            let width = self.resolve_width(current, offset)?;
            offset = offset
                .checked_add(width)
                .ok_or_else(|| self.truncated(&self.properties[current], offset, Some(width)))?;
            current += 1;
            self.offsets.borrow_mut()[current] = Some(offset);
            log::trace!("memoized offset {} for field #{}", offset, current);
        }

        Ok(offset)
    }

    /// Returns the width in bytes of the field at `index`
    pub fn field_width(&self, index: usize) -> ParserResult<usize> {
        if index >= self.properties.len() {
            return Err(ParserError::NotFound);
        }
        Ok(self.field_offset(index + 1)? - self.field_offset(index)?)
    }

    /// The size of the payload as described by the schema
    ///
    /// Events may carry trailing bytes the schema does not describe, so this can be less than the buffer length.
    pub fn payload_len(&self) -> ParserResult<usize> {
        self.field_offset(self.properties.len())
    }

    pub fn property_index(&self, name: &str) -> ParserResult<usize> {
        self.properties
            .iter()
            .position(|p| p.name == name)
            .ok_or(ParserError::NotFound)
    }

    /// Locates the field at `index` in the payload
    pub fn property_slice(&self, index: usize) -> ParserResult<PropertySlice<'schema, 'record>> {
        let property = self.properties.get(index).ok_or(ParserError::NotFound)?;
        let start = self.field_offset(index)?;
        let end = self.field_offset(index + 1)?;

        match self.buffer().get(start..end) {
            Some(buffer) => Ok(PropertySlice {
                field: property,
                offset: start,
                buffer,
            }),
            None => Err(self.truncated(property, start, Some(end - start))),
        }
    }

    /// Locates the field named `name` in the payload
    pub fn find_property(&self, name: &str) -> ParserResult<PropertySlice<'schema, 'record>> {
        self.property_slice(self.property_index(name)?)
    }

    /// Return a property from the event, or an error in case the parsing failed.
    ///
    /// You must explicitly define `T`, the type you want to parse the property into.<br/>
    /// In case this type is not compatible with the field, [`ParserError::InvalidType`] or
    /// [`ParserError::LengthMismatch`] is returned.
    pub fn try_parse<T>(&self, name: &str) -> ParserResult<T>
    where
        Parser<'schema, 'record>: private::TryParse<T>,
    {
        use crate::parser::private::TryParse;
        self.try_parse_impl(self.property_index(name)?)
    }

    /// Same as [`Self::try_parse`], with the index of the field in the schema instead of its name
    pub fn try_parse_at<T>(&self, index: usize) -> ParserResult<T>
    where
        Parser<'schema, 'record>: private::TryParse<T>,
    {
        use crate::parser::private::TryParse;
        self.try_parse_impl(index)
    }
}

/// Little-endian unsigned integer of 1, 2, 4 or 8 bytes
fn read_unsigned(bytes: &[u8]) -> Option<u64> {
    match bytes.len() {
        1 => Some(bytes[0] as u64),
        2 => Some(u16::from_le_bytes(bytes.try_into().ok()?) as u64),
        4 => Some(u32::from_le_bytes(bytes.try_into().ok()?) as u64),
        8 => Some(u64::from_le_bytes(bytes.try_into().ok()?)),
        _ => None,
    }
}

pub(crate) mod private {
    use super::*;

    /// Trait to try and parse a type
    ///
    /// This trait has to be implemented in order to be able to parse a type we want to retrieve from
    /// within an Event.
    ///
    /// An implementation for most of the Primitive Types is created by using a Macro, any other needed type
    /// requires this trait to be implemented
    pub trait TryParse<T> {
        /// Implement the `try_parse` function to provide a way to Parse `T` from an ETW event or
        /// return an Error in case the type `T` can't be parsed
        ///
        /// # Arguments
        /// * `index` - Index of the property in the Schema
        fn try_parse_impl(&self, index: usize) -> Result<T, ParserError>;
    }
}

macro_rules! impl_try_parse_primitive {
    ($T:ident) => {
        impl private::TryParse<$T> for Parser<'_, '_> {
            fn try_parse_impl(&self, index: usize) -> ParserResult<$T> {
                let prop_slice = self.property_slice(index)?;

                if prop_slice.field.is_array() {
                    return Err(ParserError::InvalidType);
                }
                match prop_slice.field.in_type {
                    InType::UnicodeString | InType::Guid => Err(ParserError::InvalidType),
                    _ => {
                        if std::mem::size_of::<$T>() != prop_slice.buffer.len() {
                            return Err(ParserError::LengthMismatch);
                        }
                        Ok($T::from_le_bytes(prop_slice.buffer.try_into()?))
                    }
                }
            }
        }
    };
}

impl_try_parse_primitive!(u8);
impl_try_parse_primitive!(i8);
impl_try_parse_primitive!(u16);
impl_try_parse_primitive!(i16);
impl_try_parse_primitive!(u32);
impl_try_parse_primitive!(i32);
impl_try_parse_primitive!(u64);
impl_try_parse_primitive!(i64);
impl_try_parse_primitive!(f32);
impl_try_parse_primitive!(f64);

/// Implements parsing of a `bitflags` type from an integer field
///
/// Bits that have no name are preserved, so that flags added by newer runtimes survive decoding.
macro_rules! impl_try_parse_flags {
    ($F:ty, $Bits:ty) => {
        impl $crate::parser::private::TryParse<$F> for $crate::parser::Parser<'_, '_> {
            fn try_parse_impl(&self, index: usize) -> $crate::parser::ParserResult<$F> {
                let bits =
                    <Self as $crate::parser::private::TryParse<$Bits>>::try_parse_impl(self, index)?;
                Ok(<$F>::from_bits_retain(bits))
            }
        }
    };
}

/// The `String` impl of the `TryParse` trait should be used to retrieve [`InType::UnicodeString`] fields
///
/// The null terminator is not part of the returned string. Invalid UTF-16 sequences are replaced with U+FFFD.
impl private::TryParse<String> for Parser<'_, '_> {
    fn try_parse_impl(&self, index: usize) -> ParserResult<String> {
        let prop_slice = self.property_slice(index)?;

        if prop_slice.field.is_array() || prop_slice.field.in_type != InType::UnicodeString {
            return Err(ParserError::InvalidType);
        }

        let mut wide: Vec<u16> = prop_slice
            .buffer
            .chunks_exact(2)
            .map(|unit| u16::from_le_bytes([unit[0], unit[1]]))
            .collect();

        // remove the null terminator
        if wide.last() == Some(&0) {
            wide.pop();
        }

        Ok(widestring::decode_utf16_lossy(wide).collect::<String>())
    }
}

impl private::TryParse<Guid> for Parser<'_, '_> {
    fn try_parse_impl(&self, index: usize) -> ParserResult<Guid> {
        let prop_slice = self.property_slice(index)?;

        if prop_slice.field.is_array() || prop_slice.field.in_type != InType::Guid {
            return Err(ParserError::InvalidType);
        }
        if prop_slice.buffer.len() != GUID_SIZE {
            return Err(ParserError::LengthMismatch);
        }

        Guid::from_le_bytes(prop_slice.buffer).ok_or(ParserError::LengthMismatch)
    }
}

impl private::TryParse<bool> for Parser<'_, '_> {
    fn try_parse_impl(&self, index: usize) -> ParserResult<bool> {
        let prop_slice = self.property_slice(index)?;

        match prop_slice.field.in_type {
            InType::Boolean | InType::UInt8 if !prop_slice.field.is_array() => {
                match read_unsigned(prop_slice.buffer) {
                    Some(value) => Ok(value != 0),
                    None => Err(ParserError::LengthMismatch),
                }
            }
            _ => Err(ParserError::InvalidType),
        }
    }
}

/// An address in the traced process
///
/// Its width on the wire depends on the bitness of the traced process, it is always widened to 64 bits.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pointer(u64);

impl Pointer {
    pub const fn new(address: u64) -> Self {
        Pointer(address)
    }
}

impl std::ops::Deref for Pointer {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for Pointer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl std::fmt::LowerHex for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let val = self.0;

        std::fmt::LowerHex::fmt(&val, f) // delegate to u64 implementation
    }
}

impl std::fmt::UpperHex for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let val = self.0;

        std::fmt::UpperHex::fmt(&val, f) // delegate to u64 implementation
    }
}

impl std::fmt::Display for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let val = self.0;

        std::fmt::Display::fmt(&val, f) // delegate to u64 implementation
    }
}

impl private::TryParse<Pointer> for Parser<'_, '_> {
    fn try_parse_impl(&self, index: usize) -> ParserResult<Pointer> {
        let prop_slice = self.property_slice(index)?;

        if prop_slice.field.is_array() || prop_slice.field.in_type != InType::Pointer {
            return Err(ParserError::InvalidType);
        }
        <Pointer as ArrayElement>::decode(prop_slice.buffer).ok_or(ParserError::LengthMismatch)
    }
}

/// Raw bytes of a field, copied
impl private::TryParse<Vec<u8>> for Parser<'_, '_> {
    fn try_parse_impl(&self, index: usize) -> ParserResult<Vec<u8>> {
        let prop_slice = self.property_slice(index)?;
        Ok(prop_slice.buffer.to_vec())
    }
}

/// Raw bytes of a field, borrowed from the payload
impl<'record> private::TryParse<&'record [u8]> for Parser<'_, 'record> {
    fn try_parse_impl(&self, index: usize) -> ParserResult<&'record [u8]> {
        let prop_slice = self.property_slice(index)?;
        Ok(prop_slice.buffer)
    }
}

/// A field whose value belongs to a named set (a manifest `valueMap`)
///
/// The raw integer is kept as-is: values that have no name in `E` are not an error, [`Self::value`]
/// simply returns `None` for them.
pub struct ValueMap<E> {
    raw: u64,
    _marker: PhantomData<fn() -> E>,
}

impl<E> ValueMap<E> {
    pub const fn new(raw: u64) -> Self {
        ValueMap {
            raw,
            _marker: PhantomData,
        }
    }

    pub const fn raw(&self) -> u64 {
        self.raw
    }
}

impl<E: FromPrimitive> ValueMap<E> {
    /// The named value, if `E` defines one for the raw integer
    pub fn value(&self) -> Option<E> {
        E::from_u64(self.raw)
    }

    pub fn is_known(&self) -> bool {
        self.value().is_some()
    }
}

impl<E> Clone for ValueMap<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ValueMap<E> {}

impl<E> PartialEq for ValueMap<E> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<E> Eq for ValueMap<E> {}

impl<E: FromPrimitive + std::fmt::Debug> std::fmt::Debug for ValueMap<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value() {
            Some(value) => write!(f, "{:?}", value),
            None => write!(f, "Unknown({})", self.raw),
        }
    }
}

impl<E> private::TryParse<ValueMap<E>> for Parser<'_, '_> {
    fn try_parse_impl(&self, index: usize) -> ParserResult<ValueMap<E>> {
        let prop_slice = self.property_slice(index)?;

        if prop_slice.field.is_array() || !prop_slice.field.in_type.is_unsigned_integer() {
            return Err(ParserError::InvalidType);
        }
        read_unsigned(prop_slice.buffer)
            .map(ValueMap::new)
            .ok_or(ParserError::LengthMismatch)
    }
}

/// A type that can be an element of an [`ArrayView`]
pub trait ArrayElement: Sized {
    /// Width of one element in a payload captured from a process with the given bitness
    fn width(pointer_size: PointerSize) -> usize;

    /// Decodes one element, `bytes` being exactly [`Self::width`] long
    fn decode(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_array_element_primitive {
    ($T:ident) => {
        impl ArrayElement for $T {
            fn width(_pointer_size: PointerSize) -> usize {
                std::mem::size_of::<$T>()
            }

            fn decode(bytes: &[u8]) -> Option<Self> {
                Some($T::from_le_bytes(bytes.try_into().ok()?))
            }
        }
    };
}

impl_array_element_primitive!(u8);
impl_array_element_primitive!(i8);
impl_array_element_primitive!(u16);
impl_array_element_primitive!(i16);
impl_array_element_primitive!(u32);
impl_array_element_primitive!(i32);
impl_array_element_primitive!(u64);
impl_array_element_primitive!(i64);
impl_array_element_primitive!(f32);
impl_array_element_primitive!(f64);

impl ArrayElement for Pointer {
    fn width(pointer_size: PointerSize) -> usize {
        pointer_size.bytes()
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        match bytes.len() {
            4 => Some(Pointer(u32::from_le_bytes(bytes.try_into().ok()?) as u64)),
            8 => Some(Pointer(u64::from_le_bytes(bytes.try_into().ok()?))),
            _ => None,
        }
    }
}

impl ArrayElement for Guid {
    fn width(_pointer_size: PointerSize) -> usize {
        GUID_SIZE
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        Guid::from_le_bytes(bytes)
    }
}

/// A lazily-decoded array field
///
/// Elements are decoded on access, from `index * width` within the field bytes.
/// The view is `Copy`: iterating it any number of times is side-effect free.
pub struct ArrayView<'record, T> {
    buffer: &'record [u8],
    width: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<'record, T: ArrayElement> ArrayView<'record, T> {
    fn new(buffer: &'record [u8], width: usize) -> Self {
        ArrayView {
            buffer,
            width,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len() / self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes the element at `index`
    pub fn get(&self, index: usize) -> Option<T> {
        let start = index.checked_mul(self.width)?;
        let bytes = self.buffer.get(start..start.checked_add(self.width)?)?;
        T::decode(bytes)
    }

    pub fn iter(&self) -> ArrayIter<'record, T> {
        ArrayIter {
            view: *self,
            index: 0,
        }
    }

    /// The raw bytes of the array
    pub fn as_bytes(&self) -> &'record [u8] {
        self.buffer
    }
}

impl<T> Clone for ArrayView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArrayView<'_, T> {}

impl<T: ArrayElement + std::fmt::Debug> std::fmt::Debug for ArrayView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'record, T: ArrayElement> IntoIterator for ArrayView<'record, T> {
    type Item = T;
    type IntoIter = ArrayIter<'record, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'record, T: ArrayElement> IntoIterator for &ArrayView<'record, T> {
    type Item = T;
    type IntoIter = ArrayIter<'record, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of an [`ArrayView`]
pub struct ArrayIter<'record, T> {
    view: ArrayView<'record, T>,
    index: usize,
}

impl<T: ArrayElement> Iterator for ArrayIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.view.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T: ArrayElement> ExactSizeIterator for ArrayIter<'_, T> {}

impl<'record, T: ArrayElement> private::TryParse<ArrayView<'record, T>> for Parser<'_, 'record> {
    fn try_parse_impl(&self, index: usize) -> ParserResult<ArrayView<'record, T>> {
        let prop_slice = self.property_slice(index)?;

        let element = match prop_slice.field.kind() {
            Some(FieldKind::CountPrefixedArray { element, .. }) => element,
            _ => return Err(ParserError::InvalidType),
        };
        let width = element.bytes(self.record.pointer_size());
        if width != T::width(self.record.pointer_size()) {
            return Err(ParserError::LengthMismatch);
        }

        Ok(ArrayView::new(prop_slice.buffer, width))
    }
}
