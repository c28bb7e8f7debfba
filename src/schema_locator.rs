//! A way to retrieve Schemas
//!
//! The [`SchemaLocator`] maps the (provider, event id, version) found in an event header to the [`Schema`]
//! describing its payload. It is immutable once built: the process-wide [`SchemaLocator::global`] holds the
//! CLR catalogue, and [`SchemaLocator::builder`] can assemble a locator over other schemas.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::event_record::EventRecord;
use crate::guid::Guid;
use crate::schema::Schema;

/// Schema module errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No schema is known for this (provider, id, version) triple
    UnknownEventType { provider: Guid, id: u16, version: u8 },
    /// A schema breaks a layout invariant the decoder relies on
    InvalidSchema { event: &'static str, reason: String },
    /// Two schemas were supplied for the same (provider, id, version) triple
    DuplicateSchema { provider: Guid, id: u16, version: u8 },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEventType {
                provider,
                id,
                version,
            } => write!(
                f,
                "unknown event type: id {} version {} of provider {}",
                id, version, provider
            ),
            Self::InvalidSchema { event, reason } => {
                write!(f, "invalid schema for {}: {}", event, reason)
            }
            Self::DuplicateSchema {
                provider,
                id,
                version,
            } => write!(
                f,
                "duplicate schema: id {} version {} of provider {}",
                id, version, provider
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// A way to group events that share the same [`Schema`]
///
/// From the [docs](https://docs.microsoft.com/en-us/windows/win32/api/evntprov/ns-evntprov-event_descriptor):
/// > For manifest-based ETW, the combination Provider.DecodeGuid + Event.Id + Event.Version should uniquely identify an event,
/// > i.e. all events with the same DecodeGuid, Id, and Version should have the same set of fields with no changes in field names, field types, or field ordering.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SchemaKey {
    pub provider: Guid,
    /// A 16-bit number used to identify manifest-based events
    pub id: u16,
    /// The version indicates a revision to the definition of an event with a particular Id,
    /// e.g. the addition of a new field.
    pub version: u8,
}

impl SchemaKey {
    pub fn new(event: &EventRecord) -> Self {
        SchemaKey {
            provider: event.provider_id(),
            id: event.event_id(),
            version: event.version(),
        }
    }

    pub fn of_schema(schema: &Schema) -> Self {
        SchemaKey {
            provider: schema.provider_id(),
            id: schema.event_id(),
            version: schema.event_version(),
        }
    }

    fn unknown(&self) -> SchemaError {
        SchemaError::UnknownEventType {
            provider: self.provider,
            id: self.id,
            version: self.version,
        }
    }
}

static GLOBAL: Lazy<SchemaLocator> = Lazy::new(|| catalogue(crate::clr::schemas()));

/// Lenient counterpart of [`SchemaLocatorBuilder::build`]: invalid schemas are logged and left out,
/// and the first declaration of a key wins over later ones
fn catalogue(declared: impl IntoIterator<Item = &'static Schema>) -> SchemaLocator {
    let mut schemas = HashMap::new();
    for schema in declared {
        if let Err(reason) = schema.validate() {
            log::error!(
                "skipping invalid schema {} v{}: {}",
                schema.event_name(),
                schema.event_version(),
                reason
            );
            continue;
        }
        match schemas.entry(SchemaKey::of_schema(schema)) {
            Entry::Vacant(entry) => {
                entry.insert(schema);
            }
            Entry::Occupied(_) => log::error!(
                "skipping schema {} v{}: its key is already declared",
                schema.event_name(),
                schema.event_version()
            ),
        }
    }
    SchemaLocator { schemas }
}

/// Represents a read-only registry of Schemas
///
/// It is implemented as a [HashMap] where the key is a combination of the following elements
/// of an event header
/// * ProviderId
/// * EventDescriptor.Id
/// * EventDescriptor.Version
///
/// Different versions of an event are distinct entries. A version that is not registered is an
/// [`SchemaError::UnknownEventType`], even though another version of the same event may be known.
#[derive(Default, Clone)]
pub struct SchemaLocator {
    schemas: HashMap<SchemaKey, &'static Schema>,
}

impl std::fmt::Debug for SchemaLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaLocator")
            .field("len", &self.schemas.len())
            .finish()
    }
}

impl SchemaLocator {
    /// The locator over the built-in CLR catalogue
    ///
    /// It is built on first use, and shared by the whole process.
    pub fn global() -> &'static SchemaLocator {
        &GLOBAL
    }

    /// Start building a locator over a custom set of schemas
    pub fn builder() -> SchemaLocatorBuilder {
        SchemaLocatorBuilder::default()
    }

    /// Retrieve the Schema of an ETW Event
    ///
    /// # Arguments
    /// * `event` - The [EventRecord] that's passed to the callback
    ///
    /// # Example
    /// ```
    /// # use clretw::EventRecord;
    /// # use clretw::schema_locator::SchemaLocator;
    /// let my_callback = |record: &EventRecord| {
    ///     let schema = SchemaLocator::global().event_schema(record).unwrap();
    /// };
    /// ```
    pub fn event_schema(&self, event: &EventRecord) -> SchemaResult<&'static Schema> {
        self.get(&SchemaKey::new(event))
    }

    /// Retrieve a Schema from its (provider, id, version) triple
    pub fn lookup(&self, provider: Guid, id: u16, version: u8) -> SchemaResult<&'static Schema> {
        self.get(&SchemaKey {
            provider,
            id,
            version,
        })
    }

    fn get(&self, key: &SchemaKey) -> SchemaResult<&'static Schema> {
        match self.schemas.get(key) {
            Some(schema) => Ok(*schema),
            None => {
                log::debug!(
                    "no schema for event {} v{} of provider {}",
                    key.id,
                    key.version,
                    key.provider
                );
                Err(key.unknown())
            }
        }
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterate over the registered schemas, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &'static Schema> + '_ {
        self.schemas.values().copied()
    }
}

/// Builds a [`SchemaLocator`]
///
/// Every schema is validated when calling [`Self::build`].
#[derive(Debug, Default)]
pub struct SchemaLocatorBuilder {
    schemas: Vec<&'static Schema>,
}

impl SchemaLocatorBuilder {
    /// Register a single schema
    pub fn add(mut self, schema: &'static Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Register every schema of a table
    pub fn add_all(mut self, schemas: &'static [Schema]) -> Self {
        self.schemas.extend(schemas.iter());
        self
    }

    /// Register the built-in CLR catalogue
    pub fn with_clr(mut self) -> Self {
        self.schemas.extend(crate::clr::schemas());
        self
    }

    pub fn build(self) -> SchemaResult<SchemaLocator> {
        let mut schemas = HashMap::with_capacity(self.schemas.len());
        for schema in self.schemas {
            schema
                .validate()
                .map_err(|reason| SchemaError::InvalidSchema {
                    event: schema.event_name(),
                    reason,
                })?;

            let key = SchemaKey::of_schema(schema);
            if schemas.insert(key, schema).is_some() {
                return Err(SchemaError::DuplicateSchema {
                    provider: key.provider,
                    id: key.id,
                    version: key.version,
                });
            }
        }
        Ok(SchemaLocator { schemas })
    }
}
