use clretw::clr::views::{EnumerationMarker, MethodVerbose, Module};
use clretw::clr::{self, rundown};
use clretw::{DecodedEvent, EventHeader, EventRecord, PointerSize, SchemaLocator};

/// Null-terminated UTF-16LE
fn utf16z(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(|unit| unit.to_le_bytes())
        .collect()
}

// What a capture layer would hand us during a rundown of a 64-bit process
fn synthesize() -> Vec<(EventHeader, Vec<u8>)> {
    let header = |id, version| EventHeader {
        provider_id: clr::RUNDOWN_PROVIDER,
        id,
        version,
        process_id: 7412,
        thread_id: 9020,
        timestamp: 133_497_000_000_000_000,
        pointer_size: PointerSize::Bits64,
        ..Default::default()
    };

    let mut method = Vec::new();
    method.extend_from_slice(&0x7ffb_1000_0010u64.to_le_bytes());
    method.extend_from_slice(&0x7ffb_1000_0000u64.to_le_bytes());
    method.extend_from_slice(&0x7ffb_2000_4000u64.to_le_bytes());
    method.extend_from_slice(&0x7cu32.to_le_bytes());
    method.extend_from_slice(&0x0600_0001u32.to_le_bytes());
    method.extend_from_slice(&0x8u32.to_le_bytes());
    method.extend(utf16z("Demo.Program"));
    method.extend(utf16z("Main"));
    method.extend(utf16z("void  (class System.String[])"));
    method.extend_from_slice(&0u16.to_le_bytes());
    method.extend_from_slice(&0u64.to_le_bytes());

    let mut module = Vec::new();
    module.extend_from_slice(&0x7ffb_1000_0000u64.to_le_bytes());
    module.extend_from_slice(&0x7ffb_0800_0000u64.to_le_bytes());
    module.extend_from_slice(&0x8u32.to_le_bytes());
    module.extend_from_slice(&0u32.to_le_bytes());
    module.extend(utf16z(r"C:\demo\Demo.dll"));
    module.extend(utf16z(""));
    module.extend_from_slice(&0u16.to_le_bytes());

    vec![
        (header(rundown::DC_START_INIT_ID, 1), 0u16.to_le_bytes().to_vec()),
        (header(rundown::METHOD_DC_START_VERBOSE_ID, 2), method),
        (header(rundown::MODULE_DC_START_ID, 1), module),
        // Not a version we know of
        (header(rundown::MODULE_DC_START_ID, 7), Vec::new()),
        (header(rundown::DC_START_COMPLETE_ID, 1), 0u16.to_le_bytes().to_vec()),
    ]
}

fn main() {
    env_logger::init(); // this is optional. This makes the (rare) error logs of clretw to be printed to stderr

    let process_callback =
        |record: &EventRecord| match DecodedEvent::decode(SchemaLocator::global(), record) {
            Ok(event) => {
                println!(
                    "[{}] {} v{} (pid {}, tid {})",
                    event.file_time().as_unix_timestamp(),
                    event.event_name(),
                    event.descriptor().version,
                    event.process_id(),
                    event.thread_id()
                );

                if let Some(method) = MethodVerbose::from_event(&event) {
                    match (method.method_namespace(), method.method_name()) {
                        (Ok(namespace), Ok(name)) => println!("    method {}::{}", namespace, name),
                        (Err(err), _) | (_, Err(err)) => println!("    Error: {} getting the method name", err),
                    }
                    if let Ok(flags) = method.method_flags() {
                        println!("    tier {:?}", flags.optimization_tier());
                    }
                } else if let Some(module) = Module::from_event(&event) {
                    match module.module_il_path() {
                        Ok(path) => println!("    module {}", path),
                        Err(err) => println!("    Error: {} getting ModuleILPath", err),
                    }
                } else if let Some(marker) = EnumerationMarker::from_event(&event) {
                    println!("    clr instance {:?}", marker.clr_instance_id());
                }
            }
            Err(err) => println!("Error {}", err),
        };

    for (header, payload) in synthesize() {
        process_callback(&EventRecord::new(header, &payload));
    }
}
