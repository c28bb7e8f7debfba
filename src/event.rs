//! Decoded events
//!
//! A [`DecodedEvent`] binds an [`EventRecord`] to the [`Schema`] of its payload. It is the unit consumers
//! work with: header metadata comes straight from the record, fields are decoded on access.
use crate::event_record::{CpuTimes, EventRecord, PointerSize};
use crate::parser::{private::TryParse, Parser, ParserResult};
use crate::schema::{EventDescriptor, Schema};
use crate::schema_locator::{SchemaLocator, SchemaResult};
use crate::time::FileTime;

/// An event, together with the schema that describes its payload
///
/// Binding a schema does not read the payload: a truncated buffer only shows up when one of the fields
/// that do not fit is accessed. Fields located before the truncation stay readable.
///
/// Like [`Parser`], a `DecodedEvent` memoizes field offsets without synchronization, and must be used from
/// a single thread at a time.
pub struct DecodedEvent<'schema, 'record> {
    schema: &'schema Schema,
    parser: Parser<'schema, 'record>,
}

impl<'schema, 'record> DecodedEvent<'schema, 'record> {
    /// Binds `record` to an explicitly chosen schema
    pub fn bind(schema: &'schema Schema, record: &EventRecord<'record>) -> Self {
        DecodedEvent {
            schema,
            parser: Parser::create(record, schema),
        }
    }

    /// Binds `record` to the schema registered for its (provider, id, version) in `locator`
    pub fn decode(
        locator: &SchemaLocator,
        record: &EventRecord<'record>,
    ) -> SchemaResult<DecodedEvent<'static, 'record>> {
        let schema = locator.event_schema(record)?;
        Ok(DecodedEvent::bind(schema, record))
    }

    pub fn schema(&self) -> &'schema Schema {
        self.schema
    }

    /// The static descriptor of this event type
    pub fn descriptor(&self) -> &'schema EventDescriptor {
        &self.schema.descriptor
    }

    pub fn record(&self) -> &EventRecord<'record> {
        self.parser.record()
    }

    pub fn parser(&self) -> &Parser<'schema, 'record> {
        &self.parser
    }

    pub fn event_name(&self) -> &'schema str {
        self.schema.event_name
    }

    pub fn process_id(&self) -> u32 {
        self.record().process_id()
    }

    pub fn thread_id(&self) -> u32 {
        self.record().thread_id()
    }

    pub fn timestamp(&self) -> i64 {
        self.record().timestamp()
    }

    /// The timestamp, interpreted as a FILETIME
    pub fn file_time(&self) -> FileTime {
        FileTime::from_quad(self.timestamp())
    }

    pub fn processor_number(&self) -> u8 {
        self.record().processor_number()
    }

    pub fn cpu_times(&self) -> Option<CpuTimes> {
        self.record().cpu_times()
    }

    pub fn pointer_size(&self) -> PointerSize {
        self.record().pointer_size()
    }

    /// Decodes the field named `name`, see [`Parser::try_parse`]
    pub fn try_parse<T>(&self, name: &str) -> ParserResult<T>
    where
        Parser<'schema, 'record>: TryParse<T>,
    {
        self.parser.try_parse(name)
    }

    /// Decodes the field at `index` in the schema, see [`Parser::try_parse_at`]
    pub fn try_parse_at<T>(&self, index: usize) -> ParserResult<T>
    where
        Parser<'schema, 'record>: TryParse<T>,
    {
        self.parser.try_parse_at(index)
    }
}

impl std::fmt::Debug for DecodedEvent<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedEvent")
            .field("event", &self.schema.event_name)
            .field("version", &self.schema.descriptor.version)
            .field("process_id", &self.process_id())
            .field("thread_id", &self.thread_id())
            .field("timestamp", &self.timestamp())
            .finish()
    }
}
