//! Captured events, as handed over by the capture layer
//!
//! An [`EventRecord`] is a read-only view over one event payload plus the ambient metadata
//! ETW attached to it. It never owns the payload: the capture layer keeps the buffer alive
//! for as long as any decoder built over it.
use crate::guid::Guid;

/// Bitness of the process that emitted an event
///
/// Pointer-valued fields are serialized at the bitness of the traced process, not the one of the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerSize {
    Bits32,
    #[default]
    Bits64,
}

impl PointerSize {
    /// Size in bytes of a pointer in the traced process
    pub const fn bytes(self) -> usize {
        match self {
            PointerSize::Bits32 => 4,
            PointerSize::Bits64 => 8,
        }
    }

    /// Converts a byte width (4 or 8) into a `PointerSize`
    pub const fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            4 => Some(PointerSize::Bits32),
            8 => Some(PointerSize::Bits64),
            _ => None,
        }
    }
}

/// Processor time charged to the emitting thread
///
/// Units are whatever the capture session uses (clock ticks for real-time sessions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuTimes {
    pub kernel_time: u64,
    pub user_time: u64,
    pub processor_time: u64,
}

/// The header of a captured event
///
/// The descriptor fields are the raw values found in the event, they are used to locate the [`Schema`](crate::schema::Schema)
/// that describes the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventHeader {
    pub provider_id: Guid,
    pub id: u16,
    pub version: u8,
    pub channel: u8,
    pub level: u8,
    pub opcode: u8,
    pub task: u16,
    pub keyword: u64,
    pub process_id: u32,
    pub thread_id: u32,
    /// Opaque ticks, following the convention of the capture layer (usually a FILETIME)
    pub timestamp: i64,
    pub processor_number: u8,
    pub cpu_times: Option<CpuTimes>,
    pub pointer_size: PointerSize,
}

/// A read-only captured event: its [`EventHeader`] and a borrowed payload
#[derive(Debug, Clone, Copy)]
pub struct EventRecord<'a> {
    header: EventHeader,
    user_data: &'a [u8],
}

impl<'a> EventRecord<'a> {
    pub fn new(header: EventHeader, user_data: &'a [u8]) -> Self {
        EventRecord { header, user_data }
    }

    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    /// The provider GUID of this event
    pub fn provider_id(&self) -> Guid {
        self.header.provider_id
    }

    /// The `Id` field of the event descriptor
    pub fn event_id(&self) -> u16 {
        self.header.id
    }

    /// The `Version` field of the event descriptor
    pub fn version(&self) -> u8 {
        self.header.version
    }

    pub fn channel(&self) -> u8 {
        self.header.channel
    }

    /// The `Level` field of the event descriptor
    pub fn level(&self) -> u8 {
        self.header.level
    }

    /// The `Opcode` field of the event descriptor
    pub fn opcode(&self) -> u8 {
        self.header.opcode
    }

    pub fn task(&self) -> u16 {
        self.header.task
    }

    pub fn keyword(&self) -> u64 {
        self.header.keyword
    }

    pub fn process_id(&self) -> u32 {
        self.header.process_id
    }

    pub fn thread_id(&self) -> u32 {
        self.header.thread_id
    }

    /// When the event occurred
    ///
    /// The resolution depends on the capture session: system time (FILETIME ticks) unless the session asked
    /// for raw timestamps. See [`FileTime`](crate::time::FileTime) to interpret the former.
    pub fn timestamp(&self) -> i64 {
        self.header.timestamp
    }

    pub fn processor_number(&self) -> u8 {
        self.header.processor_number
    }

    /// CPU times, when the capture session recorded them
    pub fn cpu_times(&self) -> Option<CpuTimes> {
        self.header.cpu_times
    }

    pub fn pointer_size(&self) -> PointerSize {
        self.header.pointer_size
    }

    /// The raw payload of the event
    pub fn user_buffer(&self) -> &'a [u8] {
        self.user_data
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pointer_size() {
        assert_eq!(PointerSize::Bits32.bytes(), 4);
        assert_eq!(PointerSize::Bits64.bytes(), 8);
        assert_eq!(PointerSize::from_bytes(4), Some(PointerSize::Bits32));
        assert_eq!(PointerSize::from_bytes(8), Some(PointerSize::Bits64));
        assert_eq!(PointerSize::from_bytes(2), None);

        assert_eq!(PointerSize::default(), PointerSize::Bits64);
        assert_eq!(EventHeader::default().pointer_size, PointerSize::Bits64);
    }

    #[test]
    fn test_getters() {
        let payload = [1u8, 2, 3];
        let header = EventHeader {
            id: 145,
            version: 1,
            process_id: 42,
            thread_id: 7,
            timestamp: -1,
            processor_number: 3,
            pointer_size: PointerSize::Bits32,
            ..Default::default()
        };
        let record = EventRecord::new(header, &payload);

        assert_eq!(record.event_id(), 145);
        assert_eq!(record.version(), 1);
        assert_eq!(record.process_id(), 42);
        assert_eq!(record.thread_id(), 7);
        assert_eq!(record.timestamp(), -1);
        assert_eq!(record.processor_number(), 3);
        assert_eq!(record.cpu_times(), None);
        assert_eq!(record.pointer_size(), PointerSize::Bits32);
        assert_eq!(record.user_buffer(), &payload);
    }
}
