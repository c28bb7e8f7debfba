//! ETW Event Schemas
//!
//! A [`Schema`] is the immutable description of one (provider, event id, version) triple: its
//! [`EventDescriptor`] and the ordered list of [`Field`]s of its payload.
//!
//! Different versions of the "same" event are distinct schemas. The version found in an event header
//! selects which one applies to its payload.
use crate::field::{Field, FieldKind};
use crate::guid::Guid;

/// Severity of an event
#[repr(u8)]
#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventLevel {
    LogAlways = 0,
    Critical = 1,
    Error = 2,
    Warning = 3,
    Information = 4,
    Verbose = 5,
}

/// Identity of an event type
///
/// See the [EVENT_DESCRIPTOR](https://docs.microsoft.com/en-us/windows/win32/api/evntprov/ns-evntprov-event_descriptor) docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventDescriptor {
    pub id: u16,
    /// A revision of the definition of the event with this `id`, e.g. when a field is appended
    pub version: u8,
    pub channel: u8,
    pub level: EventLevel,
    /// Provider-specific meaning, e.g. Start, Stop, DCStart
    pub opcode: u8,
    pub task: u16,
    pub keyword: u64,
}

/// Represents the layout of one version of one event of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub provider_id: Guid,
    pub provider_name: &'static str,
    /// Name of the event, shared by all its versions
    pub event_name: &'static str,
    pub task_name: &'static str,
    pub opcode_name: &'static str,
    pub descriptor: EventDescriptor,
    pub fields: &'static [Field],
}

impl Schema {
    pub fn provider_id(&self) -> Guid {
        self.provider_id
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    pub fn event_name(&self) -> &'static str {
        self.event_name
    }

    pub fn task_name(&self) -> &'static str {
        self.task_name
    }

    pub fn opcode_name(&self) -> &'static str {
        self.opcode_name
    }

    pub fn descriptor(&self) -> &EventDescriptor {
        &self.descriptor
    }

    pub fn event_id(&self) -> u16 {
        self.descriptor.id
    }

    pub fn event_version(&self) -> u8 {
        self.descriptor.version
    }

    pub fn properties(&self) -> &'static [Field] {
        self.fields
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Checks the layout invariants the decoder relies on
    ///
    /// * every field has a layout (no arrays of strings),
    /// * field names are unique,
    /// * an array's count field precedes it and is an unsigned integer.
    pub fn validate(&self) -> Result<(), String> {
        for (index, field) in self.fields.iter().enumerate() {
            let kind = match field.kind() {
                Some(kind) => kind,
                None => return Err(format!("field `{}` cannot be an array", field.name)),
            };

            if self.fields[..index].iter().any(|f| f.name == field.name) {
                return Err(format!("field `{}` is declared twice", field.name));
            }

            if let FieldKind::CountPrefixedArray { count_field, .. } = kind {
                if count_field >= index {
                    return Err(format!(
                        "count of `{}` must be declared before it",
                        field.name
                    ));
                }
                let count = &self.fields[count_field];
                if count.is_array() || !count.in_type.is_unsigned_integer() {
                    return Err(format!(
                        "count of `{}` (`{}`) is not an unsigned integer",
                        field.name, count.name
                    ));
                }
            }
        }
        Ok(())
    }
}
