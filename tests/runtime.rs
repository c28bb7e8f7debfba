use clretw::clr::views::{
    EnumerationMarker, ExceptionThrown, GcAllocationTick, GcEnd, GcStart, MethodJittingStarted,
    RuntimeInformation,
};
use clretw::clr::{
    self, rundown, runtime, ExceptionThrownFlags, GcAllocationKind, GcReason, GcType, RuntimeSku,
    StartupFlags, StartupMode,
};
use clretw::parser::{ParserError, Pointer};
use clretw::{DecodedEvent, Guid, PointerSize, SchemaLocator};

mod utils;
use utils::{header, init_logger, record, PayloadBuilder};

#[test]
fn gc_start_v1() {
    init_logger();

    let payload = PayloadBuilder::new(PointerSize::Bits64)
        .u32(12) // Count
        .u32(2) // Depth
        .u32(1) // Reason
        .u32(1) // Type
        .u16(0)
        .build();
    let record = record(
        header(clr::RUNTIME_PROVIDER, runtime::GC_START_ID, 1, PointerSize::Bits64),
        &payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
    assert_eq!(event.event_name(), "GCStart");
    assert_eq!(event.schema().task_name(), "GC");

    let gc = GcStart::from_event(&event).unwrap();
    assert_eq!(gc.count(), Ok(12));
    assert_eq!(gc.depth(), Ok(2));
    assert_eq!(gc.reason().unwrap().value(), Some(GcReason::Induced));
    assert_eq!(gc.gc_type().unwrap().value(), Some(GcType::Background));
    assert_eq!(gc.client_sequence_number(), Err(ParserError::NotFound));
}

#[test]
fn gc_start_unknown_reason() {
    let payload = PayloadBuilder::new(PointerSize::Bits64)
        .u32(1)
        .u32(0)
        .u32(42) // No name for this one
        .u32(0)
        .u16(0)
        .u64(77)
        .build();
    let record = record(
        header(clr::RUNTIME_PROVIDER, runtime::GC_START_ID, 2, PointerSize::Bits64),
        &payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
    let gc = GcStart::from_event(&event).unwrap();

    let reason = gc.reason().unwrap();
    assert!(!reason.is_known());
    assert_eq!(reason.value(), None);
    assert_eq!(reason.raw(), 42);
    assert_eq!(format!("{:?}", reason), "Unknown(42)");
    // Following fields are not affected
    assert_eq!(gc.client_sequence_number(), Ok(77));
}

#[test]
fn gc_end_depth_width() {
    let v0 = PayloadBuilder::new(PointerSize::Bits64)
        .u32(5)
        .u16(1)
        .build();
    let record_v0 = record(
        header(clr::RUNTIME_PROVIDER, runtime::GC_END_ID, 0, PointerSize::Bits64),
        &v0,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record_v0).unwrap();
    let gc = GcEnd::from_event(&event).unwrap();
    assert_eq!(gc.count(), Ok(5));
    assert_eq!(gc.depth(), Ok(1));
    assert_eq!(gc.clr_instance_id(), Err(ParserError::NotFound));

    let v1 = PayloadBuilder::new(PointerSize::Bits64)
        .u32(6)
        .u32(2)
        .u16(3)
        .build();
    let record_v1 = record(
        header(clr::RUNTIME_PROVIDER, runtime::GC_END_ID, 1, PointerSize::Bits64),
        &v1,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record_v1).unwrap();
    let gc = GcEnd::from_event(&event).unwrap();
    assert_eq!(gc.depth(), Ok(2));
    assert_eq!(gc.clr_instance_id(), Ok(3));
}

#[test]
fn gc_allocation_tick_32_bits() {
    let payload = PayloadBuilder::new(PointerSize::Bits32)
        .u32(102_400) // AllocationAmount
        .u32(1) // AllocationKind
        .u16(0)
        .u64(102_400)
        .pointer(0x0a1b_2c3d) // TypeID
        .string("System.Byte[]")
        .u32(0) // HeapIndex
        .pointer(0x0300_1000) // Address
        .build();
    let record = record(
        header(
            clr::RUNTIME_PROVIDER,
            runtime::GC_ALLOCATION_TICK_ID,
            3,
            PointerSize::Bits32,
        ),
        &payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
    let tick = GcAllocationTick::from_event(&event).unwrap();

    assert_eq!(
        tick.allocation_kind().unwrap().value(),
        Some(GcAllocationKind::Large)
    );
    assert_eq!(tick.allocation_amount64(), Ok(102_400));
    assert_eq!(tick.type_id(), Ok(Pointer::new(0x0a1b_2c3d)));
    assert_eq!(tick.type_name().as_deref(), Ok("System.Byte[]"));
    assert_eq!(tick.address(), Ok(Pointer::new(0x0300_1000)));
    // 4 + 4 + 2 + 8 + 4 + 28 + 4 + 4
    assert_eq!(event.parser().payload_len(), Ok(58));
    assert_eq!(payload.len(), 58);
}

#[test]
fn exception_thrown() {
    let payload = PayloadBuilder::new(PointerSize::Bits64)
        .string("System.InvalidOperationException")
        .string("Operation is not valid due to the current state of the object.")
        .pointer(0x7ff8_0000_4242)
        .u32(0x8013_1509) // COR_E_INVALIDOPERATION
        .u16(ExceptionThrownFlags::CLS_COMPLIANT.bits() | 0x0100)
        .u16(0)
        .build();
    let record = record(
        header(clr::RUNTIME_PROVIDER, runtime::EXCEPTION_THROWN_ID, 1, PointerSize::Bits64),
        &payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
    let exception = ExceptionThrown::from_event(&event).unwrap();

    assert_eq!(
        exception.exception_type().as_deref(),
        Ok("System.InvalidOperationException")
    );
    assert_eq!(*exception.exception_eip().unwrap(), 0x7ff8_0000_4242);
    assert_eq!(exception.exception_hresult(), Ok(0x8013_1509));

    // Bits we do not know about are kept
    let flags = exception.exception_flags().unwrap();
    assert!(flags.contains(ExceptionThrownFlags::CLS_COMPLIANT));
    assert!(!flags.contains(ExceptionThrownFlags::NESTED));
    assert_eq!(flags.bits(), 0x0110);
    assert_eq!(exception.clr_instance_id(), Ok(0));
}

#[test]
fn id_145_depends_on_provider() {
    let runtime_payload = PayloadBuilder::new(PointerSize::Bits64)
        .u64(1)
        .u64(2)
        .u32(0x0600_0010)
        .u32(120)
        .string("App")
        .string("Main")
        .string("void  (class System.String[])")
        .u16(0)
        .build();
    let runtime_record = record(
        header(
            clr::RUNTIME_PROVIDER,
            runtime::METHOD_JITTING_STARTED_ID,
            1,
            PointerSize::Bits64,
        ),
        &runtime_payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &runtime_record).unwrap();
    assert_eq!(event.event_name(), "MethodJittingStarted");
    assert!(EnumerationMarker::from_event(&event).is_none());
    let jitting = MethodJittingStarted::from_event(&event).unwrap();
    assert_eq!(jitting.method_il_size(), Ok(120));
    assert_eq!(jitting.method_name().as_deref(), Ok("Main"));

    let rundown_payload = 0u16.to_le_bytes();
    let rundown_record = record(
        header(
            clr::RUNDOWN_PROVIDER,
            rundown::DC_START_COMPLETE_ID,
            1,
            PointerSize::Bits64,
        ),
        &rundown_payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &rundown_record).unwrap();
    assert_eq!(event.event_name(), "DCStartComplete");
    assert!(MethodJittingStarted::from_event(&event).is_none());
    assert!(EnumerationMarker::from_event(&event).is_some());
}

#[test]
fn runtime_information() {
    let com_object = Guid::from_u128(0x5a4b_3c2d_1e0f_4a5b_8c7d_6e5f4a3b2c1d);
    let payload = PayloadBuilder::new(PointerSize::Bits64)
        .u16(0) // ClrInstanceID
        .u16(2) // Sku
        .u16(8)
        .u16(0)
        .u16(24)
        .u16(0)
        .u16(8)
        .u16(0)
        .u16(24)
        .u16(0)
        .u32(StartupFlags::CONCURRENT_GC.bits() | StartupFlags::SERVER_GC.bits())
        .u8(StartupMode::MANAGED_EXE.bits())
        .string(r#""C:\app\app.exe" --verbose"#)
        .guid(com_object)
        .string(r"C:\Program Files\dotnet\shared\Microsoft.NETCore.App\8.0.0\coreclr.dll")
        .build();

    for (provider, id) in [
        (clr::RUNTIME_PROVIDER, runtime::RUNTIME_INFORMATION_START_ID),
        (clr::RUNDOWN_PROVIDER, rundown::RUNTIME_INFORMATION_DC_START_ID),
    ] {
        let record = record(header(provider, id, 0, PointerSize::Bits64), &payload);
        let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();
        let info = RuntimeInformation::from_event(&event).unwrap();

        assert_eq!(info.sku().unwrap().value(), Some(RuntimeSku::CoreClr));
        assert_eq!(info.bcl_major_version(), Ok(8));
        assert_eq!(info.vm_build_number(), Ok(24));
        let startup = info.startup_flags().unwrap();
        assert!(startup.contains(StartupFlags::SERVER_GC));
        assert_eq!(info.startup_mode(), Ok(StartupMode::MANAGED_EXE));
        assert_eq!(
            info.command_line().as_deref(),
            Ok(r#""C:\app\app.exe" --verbose"#)
        );
        assert_eq!(info.com_object_guid(), Ok(com_object));
        assert!(info.runtime_dll_path().unwrap().ends_with("coreclr.dll"));
    }
}

#[test]
fn wrong_type_is_rejected() {
    let payload = PayloadBuilder::new(PointerSize::Bits64)
        .u32(5)
        .u32(1)
        .u16(0)
        .build();
    let record = record(
        header(clr::RUNTIME_PROVIDER, runtime::GC_END_ID, 1, PointerSize::Bits64),
        &payload,
    );
    let event = DecodedEvent::decode(SchemaLocator::global(), &record).unwrap();

    assert_eq!(event.try_parse::<u64>("Count"), Err(ParserError::LengthMismatch));
    assert!(event.try_parse::<String>("Count").is_err());
    assert_eq!(event.try_parse::<u32>("NoSuchField"), Err(ParserError::NotFound));
    assert_eq!(event.try_parse_at::<u16>(2), Ok(0));
}
