//! # Decoding .NET runtime ETW events
//! This crate decodes the payloads of the events emitted by the .NET runtime (CLR) through
//! Event Tracing for Windows (ETW).
//!
//! # What's in a CLR event
//! ETW hands consumers an event header (provider, event id, version, process, thread, timestamp...) and an
//! opaque payload. The layout of that payload is described by the provider manifest: an ordered list of
//! fields, some of which have a variable length:
//! * strings are null-terminated UTF-16,
//! * pointers are 4 or 8 bytes wide, depending on the bitness of the traced process,
//! * arrays are preceded (somewhere earlier in the payload) by a field holding their element count.
//!
//! The offset of a field can thus only be known after every field before it has been sized. This crate
//! resolves offsets lazily, when a field is accessed, and memoizes them.
//!
//! This crate does not start trace sessions nor consumes them: the capture layer (e.g. a real-time ETW
//! consumer, or an ETL reader) builds an [`EventRecord`] for each event, and this crate decodes it.
//!
//! # Getting started
//! ```
//! use clretw::{DecodedEvent, EventHeader, EventRecord, SchemaLocator};
//! use clretw::clr::{self, rundown};
//!
//! fn process_event(record: &EventRecord) {
//!     // The global locator knows the schemas of both CLR providers
//!     match DecodedEvent::decode(SchemaLocator::global(), record) {
//!         Err(err) => println!("Error {}", err),
//!         Ok(event) => {
//!             println!("Received a {} event", event.event_name());
//!
//!             // You'll need type inference to tell clretw what type you want to parse into
//!             // In actual code, be sure to correctly handle Err values!
//!             let clr_instance: u16 = event.try_parse("ClrInstanceID").unwrap();
//!             println!("ClrInstanceID: {}", clr_instance);
//!         }
//!     }
//! }
//!
//! fn main() {
//!     // The capture layer would fill this from the native event
//!     let header = EventHeader {
//!         provider_id: clr::RUNDOWN_PROVIDER,
//!         id: rundown::DC_START_COMPLETE_ID,
//!         version: 1,
//!         ..Default::default()
//!     };
//!     let payload = 7u16.to_le_bytes();
//!     process_event(&EventRecord::new(header, &payload));
//! }
//! ```
//!
//! # Errors
//! A malformed payload never panics: accessing a field that does not fit in the payload returns
//! [`ParserError::TruncatedBuffer`](parser::ParserError::TruncatedBuffer), and an event with no known
//! schema is reported as [`SchemaError::UnknownEventType`](schema_locator::SchemaError::UnknownEventType).
//! Deciding whether to skip, log or abort is up to the caller.
//!
//! # Log messages
//! clretw may occasionally write log messages using the [`log`](https://docs.rs/log/latest/log/) crate.<br/>
//! In case you want them to be printed to the console, your binary should use one of the various logger implementations. [`env_logger`](https://docs.rs/env_logger/latest/env_logger/) is one of them.<br/>
//! You can have a look at how to use it in the `demos/` folder in the repository.

#[macro_use]
extern crate bitflags;

#[macro_use]
extern crate num_derive;
extern crate num_traits;

pub mod event;
pub mod event_record;
pub mod field;
pub mod guid;
#[cfg(windows)]
pub mod native;
#[macro_use]
pub mod parser;
pub mod property;
pub mod schema;
pub mod schema_locator;
pub mod ser;
pub mod time;

pub mod clr;

// Convenience re-exports.
pub use crate::event::DecodedEvent;
pub use crate::event_record::{EventHeader, EventRecord, PointerSize};
pub use crate::guid::Guid;
pub use crate::schema::Schema;
pub use crate::schema_locator::SchemaLocator;
#[cfg(feature = "serde")]
pub use crate::ser::{EventSerializer, EventSerializerOptions};
