//! Integrates with [serde](https://serde.rs/) enabling decoded events to be serialized to various formats.
//!
//! Requires the `serde` feature be enabled.
//!
//! If the `time_rs` feature is enabled, then time stamps are serialized per the serialization format
//! of the time crate. Otherwise, if `time_rs` is not enabled, then timestamps are serialized as 64bit
//! unix timestamps (in milliseconds).
//!
//! ```
//! use clretw::{EventRecord, EventSerializer, SchemaLocator};
//! extern crate serde_json;
//!
//! fn event_callback(record: &EventRecord) {
//!     match SchemaLocator::global().event_schema(record) {
//!         Err(err) => println!("Error {:?}", err),
//!         Ok(schema) => {
//!             // Generate a serializer for the record using the schema
//!             let ser = EventSerializer::new(record, schema, Default::default());
//!             // Pass the serializer to any serde compatible serializer
//!             match serde_json::to_value(ser) {
//!                 Err(err) => println!("Error {:?}", err),
//!                 Ok(json) => println!("{}", json),
//!             }
//!         }
//!     }
//! }
//! ```
#![cfg(feature = "serde")]

use crate::event_record::{EventHeader, EventRecord, PointerSize};
use crate::field::{Field, InType};
use crate::guid::Guid;
use crate::parser::{ArrayView, Parser, ParserResult, Pointer};
use crate::schema::Schema;
use crate::time::FileTime;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::Serialize;

/// Serialization options for EventSerializer
#[derive(Debug, Clone, Copy)]
pub struct EventSerializerOptions {
    /// Includes information from the schema in the serialized output such as the provider, event, opcode, and task names.
    pub include_schema: bool,
    /// Includes the event header (pid, tid, timestamp, descriptor...) in the serialized output.
    pub include_header: bool,
    /// Serializes the header timestamp as the raw 64-bit value instead of interpreting it as a FILETIME.
    pub raw_timestamps: bool,
    /// When `true` a field that cannot be decoded fails the serialization, otherwise it is serialized as `null`.
    pub fail_on_error: bool,
}

impl core::default::Default for EventSerializerOptions {
    fn default() -> Self {
        Self {
            include_schema: true,
            include_header: true,
            raw_timestamps: false,
            fail_on_error: false,
        }
    }
}

/// Used to serialize an [`EventRecord`] using [serde](https://serde.rs/)
pub struct EventSerializer<'a, 'record> {
    pub(crate) record: &'a EventRecord<'record>,
    pub(crate) schema: &'a Schema,
    pub(crate) parser: Parser<'a, 'record>,
    pub(crate) options: EventSerializerOptions,
}

impl<'a, 'record> EventSerializer<'a, 'record> {
    /// Creates an event serializer object.
    pub fn new(
        record: &'a EventRecord<'record>,
        schema: &'a Schema,
        options: EventSerializerOptions,
    ) -> Self {
        Self {
            record,
            schema,
            parser: Parser::create(record, schema),
            options,
        }
    }
}

impl serde::ser::Serialize for EventSerializer<'_, '_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let mut state = serializer.serialize_struct("Record", 3)?;

        if self.options.include_schema {
            let schema = SchemaSer::new(self.schema);
            state.serialize_field("Schema", &schema)?;
        } else {
            state.skip_field("Schema")?;
        }

        if self.options.include_header {
            let header = HeaderSer::new(self.record.header(), &self.options);
            state.serialize_field("Header", &header)?;
        } else {
            state.skip_field("Header")?;
        }

        let event = EventSer::new(self.schema, &self.parser, &self.options);
        state.serialize_field("Event", &event)?;

        state.end()
    }
}

struct GuidExt(Guid);

impl serde::ser::Serialize for GuidExt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        if serializer.is_human_readable() {
            return serializer.collect_str(&self.0);
        }

        (self.0.data1, self.0.data2, self.0.data3, self.0.data4).serialize(serializer)
    }
}

struct SchemaSer<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaSer<'a> {
    fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }
}

impl serde::ser::Serialize for SchemaSer<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Schema", 4)?;
        state.serialize_field("Provider", self.schema.provider_name())?;
        state.serialize_field("Event", self.schema.event_name())?;
        state.serialize_field("Opcode", self.schema.opcode_name())?;
        state.serialize_field("Task", self.schema.task_name())?;
        state.end()
    }
}

struct HeaderSer<'a> {
    header: &'a EventHeader,
    options: &'a EventSerializerOptions,
}

impl<'a> HeaderSer<'a> {
    fn new(header: &'a EventHeader, options: &'a EventSerializerOptions) -> Self {
        Self { header, options }
    }
}

impl serde::ser::Serialize for HeaderSer<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let mut state = serializer.serialize_struct("Header", 7)?;
        state.serialize_field("ThreadId", &self.header.thread_id)?;
        state.serialize_field("ProcessId", &self.header.process_id)?;
        if self.options.raw_timestamps {
            state.serialize_field("TimeStamp", &self.header.timestamp)?;
        } else {
            state.serialize_field("TimeStamp", &FileTime::from_quad(self.header.timestamp))?;
        }
        state.serialize_field("ProcessorNumber", &self.header.processor_number)?;
        let pointer_size: u8 = match self.header.pointer_size {
            PointerSize::Bits32 => 32,
            PointerSize::Bits64 => 64,
        };
        state.serialize_field("PointerSize", &pointer_size)?;
        state.serialize_field("ProviderId", &GuidExt(self.header.provider_id))?;
        let descriptor = DescriptorSer::new(self.header);
        state.serialize_field("Descriptor", &descriptor)?;
        state.end()
    }
}

struct DescriptorSer<'a> {
    header: &'a EventHeader,
}

impl<'a> DescriptorSer<'a> {
    fn new(header: &'a EventHeader) -> Self {
        Self { header }
    }
}

impl serde::ser::Serialize for DescriptorSer<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let mut state = serializer.serialize_struct("Descriptor", 7)?;
        state.serialize_field("Id", &self.header.id)?;
        state.serialize_field("Version", &self.header.version)?;
        state.serialize_field("Channel", &self.header.channel)?;
        state.serialize_field("Level", &self.header.level)?;
        state.serialize_field("Opcode", &self.header.opcode)?;
        state.serialize_field("Task", &self.header.task)?;
        state.serialize_field("Keyword", &self.header.keyword)?;
        state.end()
    }
}

struct EventSer<'a, 'record> {
    schema: &'a Schema,
    parser: &'a Parser<'a, 'record>,
    options: &'a EventSerializerOptions,
}

impl<'a, 'record> EventSer<'a, 'record> {
    fn new(
        schema: &'a Schema,
        parser: &'a Parser<'a, 'record>,
        options: &'a EventSerializerOptions,
    ) -> Self {
        Self {
            schema,
            parser,
            options,
        }
    }
}

impl serde::ser::Serialize for EventSer<'_, '_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let properties = self.schema.properties();
        let mut state = serializer.serialize_map(Some(properties.len()))?;
        for (index, prop) in properties.iter().enumerate() {
            PropHandler::from(prop).ser::<S>(&mut state, index, prop, self.parser, self.options)?;
        }
        state.end()
    }
}

enum PropHandler {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Pointer,
    Float,
    Double,
    String,
    Guid,
    Array(ElementHandler),
    Binary,
}

enum ElementHandler {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Pointer,
    Float,
    Double,
    Guid,
}

impl From<&Field> for PropHandler {
    fn from(prop: &Field) -> Self {
        if prop.is_array() {
            let element = match prop.in_type {
                InType::Int8 => ElementHandler::Int8,
                InType::UInt8 => ElementHandler::UInt8,
                InType::Int16 => ElementHandler::Int16,
                InType::UInt16 => ElementHandler::UInt16,
                InType::Int32 => ElementHandler::Int32,
                InType::UInt32 | InType::HexInt32 | InType::Boolean => ElementHandler::UInt32,
                InType::Int64 => ElementHandler::Int64,
                InType::UInt64 | InType::HexInt64 => ElementHandler::UInt64,
                InType::Float => ElementHandler::Float,
                InType::Double => ElementHandler::Double,
                InType::Guid => ElementHandler::Guid,
                InType::Pointer => ElementHandler::Pointer,
                InType::UnicodeString => return PropHandler::Binary,
            };
            return PropHandler::Array(element);
        }

        match prop.in_type {
            InType::Int8 => PropHandler::Int8,
            InType::UInt8 => PropHandler::UInt8,
            InType::Int16 => PropHandler::Int16,
            InType::UInt16 => PropHandler::UInt16,
            InType::Int32 => PropHandler::Int32,
            InType::UInt32 | InType::HexInt32 => PropHandler::UInt32,
            InType::Int64 => PropHandler::Int64,
            InType::UInt64 | InType::HexInt64 => PropHandler::UInt64,
            InType::Float => PropHandler::Float,
            InType::Double => PropHandler::Double,
            InType::Boolean => PropHandler::Bool,
            InType::Guid => PropHandler::Guid,
            InType::Pointer => PropHandler::Pointer,
            InType::UnicodeString => PropHandler::String,
        }
    }
}

/// Serializes a decoded value, or handles a decoding error according to the options
fn ser_entry<S, V>(
    map: &mut S::SerializeMap,
    prop: &Field,
    value: ParserResult<V>,
    options: &EventSerializerOptions,
) -> Result<(), S::Error>
where
    S: serde::ser::Serializer,
    V: Serialize,
{
    match value {
        Ok(v) => map.serialize_entry(prop.name, &v),
        Err(err) if options.fail_on_error => Err(serde::ser::Error::custom(format!(
            "cannot decode `{}`: {}",
            prop.name, err
        ))),
        Err(_) => map.serialize_entry(prop.name, &Option::<()>::None),
    }
}

macro_rules! prop_ser_type {
    ($typ:ty, $map:expr, $index:expr, $prop:expr, $parser:expr, $options:expr) => {{
        let value = $parser.try_parse_at::<$typ>($index);
        ser_entry::<S, _>($map, $prop, value, $options)
    }};
}

macro_rules! prop_ser_array {
    ($typ:ty, $map:expr, $index:expr, $prop:expr, $parser:expr, $options:expr) => {{
        let value = $parser
            .try_parse_at::<ArrayView<$typ>>($index)
            .map(|array| array.iter().collect::<Vec<$typ>>());
        ser_entry::<S, _>($map, $prop, value, $options)
    }};
}

impl PropHandler {
    fn ser<S>(
        &self,
        map: &mut S::SerializeMap,
        index: usize,
        prop: &Field,
        parser: &Parser,
        options: &EventSerializerOptions,
    ) -> Result<(), S::Error>
    where
        S: serde::ser::Serializer,
    {
        match self {
            PropHandler::Bool => prop_ser_type!(bool, map, index, prop, parser, options),
            PropHandler::Int8 => prop_ser_type!(i8, map, index, prop, parser, options),
            PropHandler::UInt8 => prop_ser_type!(u8, map, index, prop, parser, options),
            PropHandler::Int16 => prop_ser_type!(i16, map, index, prop, parser, options),
            PropHandler::UInt16 => prop_ser_type!(u16, map, index, prop, parser, options),
            PropHandler::Int32 => prop_ser_type!(i32, map, index, prop, parser, options),
            PropHandler::UInt32 => prop_ser_type!(u32, map, index, prop, parser, options),
            PropHandler::Int64 => prop_ser_type!(i64, map, index, prop, parser, options),
            PropHandler::UInt64 => prop_ser_type!(u64, map, index, prop, parser, options),
            PropHandler::Float => prop_ser_type!(f32, map, index, prop, parser, options),
            PropHandler::Double => prop_ser_type!(f64, map, index, prop, parser, options),
            PropHandler::String => prop_ser_type!(String, map, index, prop, parser, options),
            PropHandler::Binary => prop_ser_type!(Vec<u8>, map, index, prop, parser, options),
            PropHandler::Pointer => {
                let value = parser.try_parse_at::<Pointer>(index).map(|p| *p);
                ser_entry::<S, _>(map, prop, value, options)
            }
            PropHandler::Guid => {
                let value = parser.try_parse_at::<Guid>(index).map(GuidExt);
                ser_entry::<S, _>(map, prop, value, options)
            }
            PropHandler::Array(element) => match element {
                ElementHandler::Int8 => prop_ser_array!(i8, map, index, prop, parser, options),
                ElementHandler::UInt8 => prop_ser_array!(u8, map, index, prop, parser, options),
                ElementHandler::Int16 => prop_ser_array!(i16, map, index, prop, parser, options),
                ElementHandler::UInt16 => prop_ser_array!(u16, map, index, prop, parser, options),
                ElementHandler::Int32 => prop_ser_array!(i32, map, index, prop, parser, options),
                ElementHandler::UInt32 => prop_ser_array!(u32, map, index, prop, parser, options),
                ElementHandler::Int64 => prop_ser_array!(i64, map, index, prop, parser, options),
                ElementHandler::UInt64 => prop_ser_array!(u64, map, index, prop, parser, options),
                ElementHandler::Float => prop_ser_array!(f32, map, index, prop, parser, options),
                ElementHandler::Double => prop_ser_array!(f64, map, index, prop, parser, options),
                ElementHandler::Pointer => {
                    let value = parser
                        .try_parse_at::<ArrayView<Pointer>>(index)
                        .map(|array| array.iter().map(|p| *p).collect::<Vec<u64>>());
                    ser_entry::<S, _>(map, prop, value, options)
                }
                ElementHandler::Guid => {
                    let value = parser
                        .try_parse_at::<ArrayView<Guid>>(index)
                        .map(|array| array.iter().map(GuidExt).collect::<Vec<GuidExt>>());
                    ser_entry::<S, _>(map, prop, value, options)
                }
            },
        }
    }
}
