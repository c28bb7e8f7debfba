#![allow(dead_code)] // every test crate uses its own subset of these helpers

use clretw::{EventHeader, EventRecord, Guid, PointerSize};

/// Serializes payloads the way the runtime lays them out
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    bytes: Vec<u8>,
    pointer_size: PointerSize,
}

impl PayloadBuilder {
    pub fn new(pointer_size: PointerSize) -> Self {
        Self {
            bytes: Vec::new(),
            pointer_size,
        }
    }

    pub fn u8(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub fn u16(mut self, value: u16) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u64(mut self, value: u64) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn guid(mut self, value: Guid) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Null-terminated UTF-16LE
    pub fn string(mut self, value: &str) -> Self {
        for unit in value.encode_utf16().chain(std::iter::once(0)) {
            self.bytes.extend_from_slice(&unit.to_le_bytes());
        }
        self
    }

    /// A pointer, as wide as the traced process ones
    pub fn pointer(mut self, value: u64) -> Self {
        match self.pointer_size {
            PointerSize::Bits32 => self.bytes.extend_from_slice(&(value as u32).to_le_bytes()),
            PointerSize::Bits64 => self.bytes.extend_from_slice(&value.to_le_bytes()),
        }
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

pub fn header(provider: Guid, id: u16, version: u8, pointer_size: PointerSize) -> EventHeader {
    EventHeader {
        provider_id: provider,
        id,
        version,
        process_id: 4242,
        thread_id: 1337,
        timestamp: 132_854_688_000_000_000,
        processor_number: 2,
        pointer_size,
        ..Default::default()
    }
}

pub fn record(header: EventHeader, payload: &[u8]) -> EventRecord<'_> {
    EventRecord::new(header, payload)
}

pub fn init_logger() {
    // this is optional. This makes the debug logs of clretw to be printed to stderr
    let _ = env_logger::builder().is_test(true).try_init();
}
