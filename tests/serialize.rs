#![cfg(feature = "serde")]

use clretw::clr::{self, rundown, runtime};
use clretw::{EventSerializer, EventSerializerOptions, PointerSize, SchemaLocator};
use serde::Serialize;
use serde_json::json;

mod utils;
use utils::{header, init_logger, record, PayloadBuilder};

fn method_verbose_payload() -> Vec<u8> {
    PayloadBuilder::new(PointerSize::Bits64)
        .u64(0x1000)
        .u64(0x2000)
        .u64(0x3000)
        .u32(0x20)
        .u32(0x0600_0002)
        .u32(0x8)
        .string("App")
        .string("Run")
        .string("void  ()")
        .u16(0)
        .u64(0)
        .build()
}

#[test]
fn json_event() {
    init_logger();

    let payload = method_verbose_payload();
    let record = record(
        header(
            clr::RUNDOWN_PROVIDER,
            rundown::METHOD_DC_START_VERBOSE_ID,
            2,
            PointerSize::Bits64,
        ),
        &payload,
    );
    let schema = SchemaLocator::global().event_schema(&record).unwrap();

    let options = EventSerializerOptions {
        raw_timestamps: true,
        ..Default::default()
    };
    let value = serde_json::to_value(EventSerializer::new(&record, schema, options)).unwrap();

    assert_eq!(
        value["Schema"],
        json!({
            "Provider": "Microsoft-Windows-DotNETRuntimeRundown",
            "Event": "MethodDCStartVerbose",
            "Opcode": "DCStartVerbose",
            "Task": "CLRMethodRundown",
        })
    );
    assert_eq!(value["Header"]["ProcessId"], 4242);
    assert_eq!(value["Header"]["ThreadId"], 1337);
    assert_eq!(value["Header"]["TimeStamp"], 132_854_688_000_000_000_i64);
    assert_eq!(value["Header"]["PointerSize"], 64);
    assert_eq!(
        value["Header"]["ProviderId"],
        "A669021C-C450-4609-A035-5AF59AF4DF18"
    );
    assert_eq!(
        value["Header"]["Descriptor"]["Id"],
        rundown::METHOD_DC_START_VERBOSE_ID
    );

    let event = &value["Event"];
    assert_eq!(event["MethodID"], 0x1000);
    assert_eq!(event["MethodFlags"], 8);
    assert_eq!(event["MethodNamespace"], "App");
    assert_eq!(event["MethodName"], "Run");
    assert_eq!(event["MethodSignature"], "void  ()");
    assert_eq!(event["ReJITID"], 0);
}

#[test]
fn json_without_schema_nor_header() {
    let payload = method_verbose_payload();
    let record = record(
        header(
            clr::RUNDOWN_PROVIDER,
            rundown::METHOD_DC_START_VERBOSE_ID,
            2,
            PointerSize::Bits64,
        ),
        &payload,
    );
    let schema = SchemaLocator::global().event_schema(&record).unwrap();

    let options = EventSerializerOptions {
        include_schema: false,
        include_header: false,
        ..Default::default()
    };
    let value = serde_json::to_value(EventSerializer::new(&record, schema, options)).unwrap();
    let object = value.as_object().unwrap();
    assert!(!object.contains_key("Schema"));
    assert!(!object.contains_key("Header"));
    assert_eq!(value["Event"]["MethodToken"], 0x0600_0002);
}

#[test]
fn json_arrays() {
    let payload = PayloadBuilder::new(PointerSize::Bits32)
        .u16(1)
        .u8(0)
        .u8(0)
        .u32(2)
        .pointer(0x0040_1000)
        .pointer(0x0040_2000)
        .build();
    let record = record(
        header(clr::RUNTIME_PROVIDER, runtime::CLR_STACK_WALK_ID, 0, PointerSize::Bits32),
        &payload,
    );
    let schema = SchemaLocator::global().event_schema(&record).unwrap();

    let value =
        serde_json::to_value(EventSerializer::new(&record, schema, Default::default())).unwrap();
    assert_eq!(value["Header"]["PointerSize"], 32);
    assert_eq!(value["Event"]["FrameCount"], 2);
    assert_eq!(value["Event"]["Stack"], json!([0x0040_1000, 0x0040_2000]));
}

#[test]
fn truncated_fields_are_null() {
    // The method name is cut short
    let mut payload = PayloadBuilder::new(PointerSize::Bits64)
        .u64(1)
        .u64(2)
        .u64(3)
        .u32(4)
        .u32(5)
        .u32(0)
        .string("App")
        .build();
    payload.extend_from_slice(&[0x52, 0x00]);

    let record = record(
        header(
            clr::RUNDOWN_PROVIDER,
            rundown::METHOD_DC_START_VERBOSE_ID,
            0,
            PointerSize::Bits64,
        ),
        &payload,
    );
    let schema = SchemaLocator::global().event_schema(&record).unwrap();

    let value =
        serde_json::to_value(EventSerializer::new(&record, schema, Default::default())).unwrap();
    let event = &value["Event"];
    assert_eq!(event["MethodID"], 1);
    assert_eq!(event["MethodNamespace"], "App");
    assert!(event["MethodName"].is_null());
    assert!(event["MethodSignature"].is_null());

    let options = EventSerializerOptions {
        fail_on_error: true,
        ..Default::default()
    };
    let err = serde_json::to_value(EventSerializer::new(&record, schema, options)).unwrap_err();
    assert!(err.to_string().contains("MethodName"));
}

#[test]
fn flexbuffers() {
    let payload = method_verbose_payload();
    let record = record(
        header(
            clr::RUNDOWN_PROVIDER,
            rundown::METHOD_DC_START_VERBOSE_ID,
            2,
            PointerSize::Bits64,
        ),
        &payload,
    );
    let schema = SchemaLocator::global().event_schema(&record).unwrap();

    let event = EventSerializer::new(&record, schema, Default::default());
    let mut ser = flexbuffers::FlexbufferSerializer::new();
    event.serialize(&mut ser).unwrap();

    let root = flexbuffers::Reader::get_root(ser.view()).unwrap();
    let map = root.as_map();
    let schema = map.idx("Schema").as_map();
    assert_eq!(schema.idx("Event").as_str(), "MethodDCStartVerbose");
    let fields = map.idx("Event").as_map();
    assert_eq!(fields.idx("MethodName").as_str(), "Run");
    assert_eq!(fields.idx("MethodSize").as_u32(), 0x20);
    assert_eq!(map.idx("Header").as_map().idx("ProcessId").as_u32(), 4242);
}
