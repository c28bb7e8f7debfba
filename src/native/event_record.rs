//! Conversion from a native [EVENT_RECORD](https://docs.microsoft.com/en-us/windows/win32/api/evntcons/ns-evntcons-event_record)

use windows::Win32::System::Diagnostics::Etw::{
    EVENT_HEADER_FLAG_32_BIT_HEADER, EVENT_HEADER_FLAG_64_BIT_HEADER, EVENT_HEADER_FLAG_NO_CPUTIME,
    EVENT_HEADER_FLAG_PRIVATE_SESSION, EVENT_RECORD,
};

use crate::event_record::{CpuTimes, EventHeader, EventRecord, PointerSize};

fn pointer_size(flags: u32) -> PointerSize {
    if flags & EVENT_HEADER_FLAG_32_BIT_HEADER != 0 {
        PointerSize::Bits32
    } else if flags & EVENT_HEADER_FLAG_64_BIT_HEADER != 0 {
        PointerSize::Bits64
    } else {
        PointerSize::from_bytes(std::mem::size_of::<usize>()).unwrap_or_default()
    }
}

impl<'a> EventRecord<'a> {
    /// Builds an `EventRecord` from the record ETW passes to the consumer callback
    ///
    /// # Safety
    ///
    /// `record.UserData` must point to at least `record.UserDataLength` readable bytes, and this data must not
    /// be modified (or dealloc'ed) for the lifetime `'a`. This is the case for the record ETW hands to the
    /// consumer callback, as long as the returned value does not outlive the callback.
    pub unsafe fn from_native(record: &'a EVENT_RECORD) -> Self {
        let native_header = &record.EventHeader;
        let flags = native_header.Flags as u32;
        let descriptor = &native_header.EventDescriptor;

        let cpu_times = if flags & EVENT_HEADER_FLAG_NO_CPUTIME != 0 {
            None
        } else if flags & EVENT_HEADER_FLAG_PRIVATE_SESSION != 0 {
            Some(CpuTimes {
                kernel_time: 0,
                user_time: 0,
                processor_time: native_header.Anonymous.ProcessorTime,
            })
        } else {
            let kernel_time = native_header.Anonymous.Anonymous.KernelTime as u64;
            let user_time = native_header.Anonymous.Anonymous.UserTime as u64;
            Some(CpuTimes {
                kernel_time,
                user_time,
                processor_time: kernel_time + user_time,
            })
        };

        let header = EventHeader {
            provider_id: native_header.ProviderId.into(),
            id: descriptor.Id,
            version: descriptor.Version,
            channel: descriptor.Channel,
            level: descriptor.Level,
            opcode: descriptor.Opcode,
            task: descriptor.Task,
            keyword: descriptor.Keyword,
            process_id: native_header.ProcessId,
            thread_id: native_header.ThreadId,
            timestamp: native_header.TimeStamp,
            processor_number: record.BufferContext.Anonymous.Anonymous.ProcessorNumber,
            cpu_times,
            pointer_size: pointer_size(flags),
        };

        let user_data = if record.UserData.is_null() || record.UserDataLength == 0 {
            &[]
        } else {
            std::slice::from_raw_parts(
                record.UserData as *const u8,
                record.UserDataLength.into(),
            )
        };

        EventRecord::new(header, user_data)
    }
}
