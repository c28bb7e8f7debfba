use clretw::clr::views::{
    Assembly, EnumerationMarker, Method, MethodILToNativeMap, MethodVerbose, Module, StackWalk,
    Thread,
};
use clretw::clr::{
    self, rundown, AssemblyFlags, MethodExtent, MethodFlags, ModuleFlags, ThreadFlags,
};
use clretw::parser::{ArrayView, ParserError, Pointer};
use clretw::schema_locator::SchemaError;
use clretw::{DecodedEvent, Guid, PointerSize, SchemaLocator};

mod utils;
use utils::{header, init_logger, record, PayloadBuilder};

#[test]
fn method_dc_start_verbose_v2() {
    init_logger();

    let payload = PayloadBuilder::new(PointerSize::Bits64)
        .u64(0x7ff8_0000_1000) // MethodID
        .u64(0x7ff8_0000_2000) // ModuleID
        .u64(0x7ff8_1234_0000) // MethodStartAddress
        .u32(0x40) // MethodSize
        .u32(0x0600_0001) // MethodToken
        .u32(MethodFlags::JITTED.bits() | (4 << 7)) // MethodFlags
        .string("System.Console")
        .string("WriteLine")
        .string("void  (class System.String)")
        .u16(8) // ClrInstanceID
        .u64(0) // ReJITID
        .build();
    let header = header(
        clr::RUNDOWN_PROVIDER,
        rundown::METHOD_DC_START_VERBOSE_ID,
        2,
        PointerSize::Bits64,
    );
    let record = record(header, &payload);

    let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
    assert_eq!(event.event_name(), "MethodDCStartVerbose");
    assert_eq!(event.descriptor().version, 2);
    assert_eq!(event.descriptor().opcode, rundown::opcode::METHOD_DC_START_VERBOSE);
    assert_eq!(event.process_id(), 4242);
    assert_eq!(event.thread_id(), 1337);
    assert_eq!(event.file_time().as_unix_timestamp(), 1_640_995_200_000);

    let method = MethodVerbose::from_event(&event).unwrap();
    assert_eq!(method.method_id(), Ok(0x7ff8_0000_1000));
    assert_eq!(method.method_start_address(), Ok(0x7ff8_1234_0000));
    assert_eq!(method.method_size(), Ok(0x40));
    let flags = method.method_flags().unwrap();
    assert!(flags.contains(MethodFlags::JITTED));
    assert_eq!(flags.optimization_tier(), clr::OptimizationTier::OptimizedTier1);
    assert_eq!(method.method_namespace().as_deref(), Ok("System.Console"));
    assert_eq!(method.method_name().as_deref(), Ok("WriteLine"));
    assert_eq!(
        method.method_signature().as_deref(),
        Ok("void  (class System.String)")
    );
    assert_eq!(method.clr_instance_id(), Ok(8));
    assert_eq!(method.rejit_id(), Ok(0));

    // Every byte is accounted for
    assert_eq!(event.parser().payload_len(), Ok(payload.len()));

    // This is not a non-verbose method event
    assert!(Method::from_event(&event).is_none());
}

#[test]
fn method_dc_end_versions() {
    let v0 = PayloadBuilder::new(PointerSize::Bits64)
        .u64(1)
        .u64(2)
        .u64(3)
        .u32(4)
        .u32(5)
        .u32(MethodFlags::DYNAMIC.bits())
        .build();
    let v1 = PayloadBuilder::new(PointerSize::Bits64)
        .raw(&v0)
        .u16(9)
        .build();

    let record_v0 = record(
        header(clr::RUNDOWN_PROVIDER, rundown::METHOD_DC_END_ID, 0, PointerSize::Bits64),
        &v0,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record_v0).unwrap();
    let method = Method::from_event(&event).unwrap();
    assert_eq!(method.version(), 0);
    assert_eq!(method.method_token(), Ok(5));
    assert_eq!(method.method_flags(), Ok(MethodFlags::DYNAMIC));
    // Appended in later versions
    assert_eq!(method.clr_instance_id(), Err(ParserError::NotFound));
    assert_eq!(method.rejit_id(), Err(ParserError::NotFound));

    let record_v1 = record(
        header(clr::RUNDOWN_PROVIDER, rundown::METHOD_DC_END_ID, 1, PointerSize::Bits64),
        &v1,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record_v1).unwrap();
    let method = Method::from_event(&event).unwrap();
    assert_eq!(method.clr_instance_id(), Ok(9));
    assert_eq!(method.rejit_id(), Err(ParserError::NotFound));
}

#[test]
fn enumeration_markers() {
    for id in [
        rundown::DC_START_INIT_ID,
        rundown::DC_START_COMPLETE_ID,
        rundown::DC_END_INIT_ID,
        rundown::DC_END_COMPLETE_ID,
    ] {
        let payload = PayloadBuilder::new(PointerSize::Bits64).u16(0x0102).build();
        let record = record(
            header(clr::RUNDOWN_PROVIDER, id, 1, PointerSize::Bits64),
            &payload,
        );
        let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
        let marker = EnumerationMarker::from_event(&event).unwrap();
        assert_eq!(marker.clr_instance_id(), Ok(0x0102));
        assert_eq!(event.parser().payload_len(), Ok(2));
    }

    // Version 0 has no payload at all
    let record = record(
        header(
            clr::RUNDOWN_PROVIDER,
            rundown::DC_START_COMPLETE_ID,
            0,
            PointerSize::Bits64,
        ),
        &[],
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
    assert_eq!(event.parser().payload_len(), Ok(0));
    assert_eq!(
        EnumerationMarker::from_event(&event)
            .unwrap()
            .clr_instance_id(),
        Err(ParserError::NotFound)
    );
}

#[test]
fn il_to_native_map() {
    let payload = PayloadBuilder::new(PointerSize::Bits64)
        .u64(0xabc) // MethodID
        .u64(0) // ReJITID
        .u8(0) // MethodExtent
        .u16(3) // CountOfMapEntries
        .u32(0)
        .u32(4)
        .u32(0xfffffffd) // ILOffsets, the last one being the epilog marker
        .u32(0)
        .u32(0x10)
        .u32(0x28) // NativeOffsets
        .u16(1) // ClrInstanceID
        .build();
    let record = record(
        header(
            clr::RUNDOWN_PROVIDER,
            rundown::METHOD_DC_START_IL_TO_NATIVE_MAP_ID,
            0,
            PointerSize::Bits64,
        ),
        &payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
    let map = MethodILToNativeMap::from_event(&event).unwrap();

    assert_eq!(map.method_id(), Ok(0xabc));
    assert_eq!(map.method_extent().unwrap().value(), Some(MethodExtent::MainBody));
    assert_eq!(map.count_of_map_entries(), Ok(3));

    let il_offsets: ArrayView<u32> = map.il_offsets().unwrap();
    assert_eq!(il_offsets.len(), 3);
    assert_eq!(il_offsets.get(2), Some(0xfffffffd));

    let entries: Vec<(u32, u32)> = map.entries().unwrap().collect();
    assert_eq!(entries, vec![(0, 0), (4, 0x10), (0xfffffffd, 0x28)]);
    // The arrays can be walked again
    assert_eq!(map.entries().unwrap().count(), 3);

    assert_eq!(map.clr_instance_id(), Ok(1));
    assert_eq!(event.parser().field_offset(4), Ok(19));
    assert_eq!(event.parser().field_offset(5), Ok(31));
    assert_eq!(event.parser().field_offset(6), Ok(43));
}

fn stack_walk(pointer_size: PointerSize, frames: &[u64]) -> Vec<u64> {
    let mut builder = PayloadBuilder::new(pointer_size)
        .u16(3)
        .u8(0)
        .u8(0)
        .u32(frames.len() as u32);
    for frame in frames {
        builder = builder.pointer(*frame);
    }
    let payload = builder.build();

    let record = record(
        header(
            clr::RUNDOWN_PROVIDER,
            rundown::CLR_STACK_WALK_ID,
            0,
            pointer_size,
        ),
        &payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
    let stack = StackWalk::from_event(&event).unwrap();
    assert_eq!(stack.clr_instance_id(), Ok(3));
    assert_eq!(stack.frame_count(), Ok(frames.len() as u32));
    assert_eq!(
        event.parser().field_width(4),
        Ok(frames.len() * pointer_size.bytes())
    );

    let view = stack.stack().unwrap();
    view.iter().map(|frame: Pointer| *frame).collect()
}

#[test]
fn stack_walk_follows_process_bitness() {
    let frames = [0x7710_1000, 0x7710_2000, 0x0040_1000];
    assert_eq!(stack_walk(PointerSize::Bits32, &frames), frames);
    assert_eq!(stack_walk(PointerSize::Bits64, &frames), frames);

    let frames64 = [0x7ff8_1234_5678, 0x7ff8_8765_4321];
    assert_eq!(stack_walk(PointerSize::Bits64, &frames64), frames64);

    assert!(stack_walk(PointerSize::Bits32, &[]).is_empty());
}

#[test]
fn module_dc_start_v2() {
    let managed_pdb = Guid::from_u128(0x9e0a1d4c_7b2f_4c55_8d3e_0123456789ab);
    let payload = PayloadBuilder::new(PointerSize::Bits64)
        .u64(0x1000) // ModuleID
        .u64(0x2000) // AssemblyID
        .u32(ModuleFlags::MANIFEST.bits() | ModuleFlags::READY_TO_RUN.bits())
        .u32(0) // Reserved1
        .string(r"C:\app\app.dll")
        .string("")
        .u16(0) // ClrInstanceID
        .guid(managed_pdb)
        .u32(1)
        .string(r"C:\src\app\obj\app.pdb")
        .guid(Guid::zeroed())
        .u32(0)
        .string("")
        .build();
    let record = record(
        header(clr::RUNDOWN_PROVIDER, rundown::MODULE_DC_START_ID, 2, PointerSize::Bits64),
        &payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
    let module = Module::from_event(&event).unwrap();

    assert_eq!(module.module_id(), Ok(0x1000));
    assert!(module.module_flags().unwrap().contains(ModuleFlags::READY_TO_RUN));
    assert_eq!(module.module_il_path().as_deref(), Ok(r"C:\app\app.dll"));
    assert_eq!(module.module_native_path().as_deref(), Ok(""));
    assert_eq!(module.managed_pdb_signature(), Ok(managed_pdb));
    assert_eq!(module.managed_pdb_age(), Ok(1));
    assert_eq!(
        module.managed_pdb_build_path().as_deref(),
        Ok(r"C:\src\app\obj\app.pdb")
    );
    assert_eq!(module.native_pdb_build_path().as_deref(), Ok(""));
    // Only DomainModule events carry it
    assert_eq!(module.app_domain_id(), Err(ParserError::NotFound));
}

#[test]
fn assembly_and_thread() {
    let payload = PayloadBuilder::new(PointerSize::Bits64)
        .u64(0x10) // AssemblyID
        .u64(0x20) // AppDomainID
        .u64(0x30) // BindingID
        .u32(AssemblyFlags::NATIVE.bits() | 0x8000) // with a flag unknown to us
        .string("System.Private.CoreLib, Version=8.0.0.0")
        .u16(0)
        .build();
    let assembly_record = record(
        header(clr::RUNDOWN_PROVIDER, rundown::ASSEMBLY_DC_END_ID, 1, PointerSize::Bits64),
        &payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &assembly_record).unwrap();
    let assembly = Assembly::from_event(&event).unwrap();
    assert_eq!(assembly.binding_id(), Ok(0x30));
    let flags = assembly.assembly_flags().unwrap();
    assert!(flags.contains(AssemblyFlags::NATIVE));
    assert_eq!(flags.bits(), 0x8004);
    assert_eq!(
        assembly.fully_qualified_assembly_name().as_deref(),
        Ok("System.Private.CoreLib, Version=8.0.0.0")
    );

    let payload = PayloadBuilder::new(PointerSize::Bits64)
        .u64(0x55) // ManagedThreadID
        .u64(0x20) // AppDomainID
        .u32(ThreadFlags::FINALIZER.bits())
        .u32(2) // ManagedThreadIndex
        .u32(7788) // OSThreadID
        .u16(0)
        .build();
    let thread_record = record(
        header(clr::RUNDOWN_PROVIDER, rundown::THREAD_DC_END_ID, 0, PointerSize::Bits64),
        &payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &thread_record).unwrap();
    let thread = Thread::from_event(&event).unwrap();
    assert_eq!(thread.flags(), Ok(ThreadFlags::FINALIZER));
    assert_eq!(thread.os_thread_id(), Ok(7788));
}

#[test]
fn truncated_payload_keeps_leading_fields() {
    init_logger();

    let mut payload = PayloadBuilder::new(PointerSize::Bits64)
        .u64(1)
        .u64(2)
        .u64(3)
        .u32(4)
        .u32(5)
        .u32(0)
        .string("Namespace")
        .string("Name")
        .build();
    // The signature is cut in the middle
    payload.extend_from_slice(&[0x76, 0x00, 0x6f]);

    let record = record(
        header(
            clr::RUNDOWN_PROVIDER,
            rundown::METHOD_DC_START_VERBOSE_ID,
            0,
            PointerSize::Bits64,
        ),
        &payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
    let method = MethodVerbose::from_event(&event).unwrap();

    assert_eq!(method.method_id(), Ok(1));
    assert_eq!(method.method_name().as_deref(), Ok("Name"));
    assert!(matches!(
        method.method_signature(),
        Err(ParserError::TruncatedBuffer {
            field: "MethodSignature",
            length: None,
            ..
        })
    ));
    // Still readable afterwards
    assert_eq!(method.method_namespace().as_deref(), Ok("Namespace"));
}

#[test]
fn unknown_events() {
    let payload = [0u8; 2];

    // No such version
    let unknown_version = record(
        header(
            clr::RUNDOWN_PROVIDER,
            rundown::DC_START_COMPLETE_ID,
            9,
            PointerSize::Bits64,
        ),
        &payload,
    );
    let err = DecodedEvent::decode(SchemaLocator::global(), &unknown_version).unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownEventType {
            provider: clr::RUNDOWN_PROVIDER,
            id: rundown::DC_START_COMPLETE_ID,
            version: 9
        }
    );

    // Another provider
    let other = Guid::from_u128(0x22fb2cd6_0e7b_422b_a0c7_2fad1fd0e716);
    let unknown_provider = record(
        header(other, rundown::DC_START_COMPLETE_ID, 1, PointerSize::Bits64),
        &payload,
    );
    assert!(matches!(
        DecodedEvent::decode(SchemaLocator::global(), &unknown_provider),
        Err(SchemaError::UnknownEventType { .. })
    ));
}
