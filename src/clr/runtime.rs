//! `Microsoft-Windows-DotNETRuntime` events
use super::layouts::*;
use super::win_opcode;
use super::{RuntimeKeywords, RUNTIME_PROVIDER, RUNTIME_PROVIDER_NAME};
use crate::field::{Field, InType};
use crate::schema::Schema;

macro_rules! runtime_schema {
    ($($rest:tt)*) => {
        clr_schema!(RUNTIME_PROVIDER, RUNTIME_PROVIDER_NAME, $($rest)*)
    };
}

pub const GC_START_ID: u16 = 1;
pub const GC_END_ID: u16 = 2;
pub const GC_ALLOCATION_TICK_ID: u16 = 10;
pub const EXCEPTION_THROWN_ID: u16 = 80;
pub const CLR_STACK_WALK_ID: u16 = 82;
pub const METHOD_LOAD_ID: u16 = 141;
pub const METHOD_UNLOAD_ID: u16 = 142;
pub const METHOD_LOAD_VERBOSE_ID: u16 = 143;
pub const METHOD_UNLOAD_VERBOSE_ID: u16 = 144;
pub const METHOD_JITTING_STARTED_ID: u16 = 145;
pub const MODULE_LOAD_ID: u16 = 152;
pub const MODULE_UNLOAD_ID: u16 = 153;
pub const RUNTIME_INFORMATION_START_ID: u16 = 187;
pub const METHOD_IL_TO_NATIVE_MAP_ID: u16 = 190;

pub mod task {
    pub const GARBAGE_COLLECTION: u16 = 1;
    pub const EXCEPTION: u16 = 7;
    pub const CLR_METHOD: u16 = 9;
    pub const CLR_LOADER: u16 = 10;
    pub const CLR_STACK: u16 = 11;
    pub const CLR_RUNTIME_INFORMATION: u16 = 19;
}

pub mod opcode {
    // GarbageCollection
    pub const GC_ALLOCATION_TICK: u8 = 11;

    // CLRMethod
    pub const METHOD_LOAD: u8 = 33;
    pub const METHOD_UNLOAD: u8 = 34;
    pub const METHOD_LOAD_VERBOSE: u8 = 37;
    pub const METHOD_UNLOAD_VERBOSE: u8 = 38;
    pub const METHOD_JITTING_STARTED: u8 = 42;
    pub const METHOD_IL_TO_NATIVE_MAP: u8 = 87;

    // CLRLoader
    pub const MODULE_LOAD: u8 = 33;
    pub const MODULE_UNLOAD: u8 = 34;

    // CLRStack
    pub const CLR_STACK_WALK: u8 = 82;
}

const METHOD_KEYWORDS: u64 = RuntimeKeywords::JIT.bits() | RuntimeKeywords::NGEN.bits();
const GC_KEYWORDS: u64 = RuntimeKeywords::GC.bits();
const LOADER_KEYWORDS: u64 = RuntimeKeywords::LOADER.bits();

const GC_START_V0: &[Field] = &[
    Field::new("Count", InType::UInt32),
    Field::new("Reason", InType::UInt32),
];

const GC_START_V1: &[Field] = &[
    Field::new("Count", InType::UInt32),
    Field::new("Depth", InType::UInt32),
    Field::new("Reason", InType::UInt32),
    Field::new("Type", InType::UInt32),
    Field::new("ClrInstanceID", InType::UInt16),
];

const GC_START_V2: &[Field] = &[
    Field::new("Count", InType::UInt32),
    Field::new("Depth", InType::UInt32),
    Field::new("Reason", InType::UInt32),
    Field::new("Type", InType::UInt32),
    Field::new("ClrInstanceID", InType::UInt16),
    Field::new("ClientSequenceNumber", InType::UInt64),
];

const GC_END_V0: &[Field] = &[
    Field::new("Count", InType::UInt32),
    Field::new("Depth", InType::UInt16),
];

const GC_END_V1: &[Field] = &[
    Field::new("Count", InType::UInt32),
    Field::new("Depth", InType::UInt32),
    Field::new("ClrInstanceID", InType::UInt16),
];

const GC_ALLOCATION_TICK_V2: &[Field] = &[
    Field::new("AllocationAmount", InType::UInt32),
    Field::new("AllocationKind", InType::UInt32),
    Field::new("ClrInstanceID", InType::UInt16),
    Field::new("AllocationAmount64", InType::UInt64),
    Field::new("TypeID", InType::Pointer),
    Field::new("TypeName", InType::UnicodeString),
    Field::new("HeapIndex", InType::UInt32),
];

const GC_ALLOCATION_TICK_V3: &[Field] = &[
    Field::new("AllocationAmount", InType::UInt32),
    Field::new("AllocationKind", InType::UInt32),
    Field::new("ClrInstanceID", InType::UInt16),
    Field::new("AllocationAmount64", InType::UInt64),
    Field::new("TypeID", InType::Pointer),
    Field::new("TypeName", InType::UnicodeString),
    Field::new("HeapIndex", InType::UInt32),
    Field::new("Address", InType::Pointer),
];

const EXCEPTION_THROWN_V1: &[Field] = &[
    Field::new("ExceptionType", InType::UnicodeString),
    Field::new("ExceptionMessage", InType::UnicodeString),
    Field::new("ExceptionEIP", InType::Pointer),
    Field::new("ExceptionHRESULT", InType::HexInt32),
    Field::new("ExceptionFlags", InType::UInt16),
    Field::new("ClrInstanceID", InType::UInt16),
];

const METHOD_JITTING_STARTED_V0: &[Field] = &[
    Field::new("MethodID", InType::UInt64),
    Field::new("ModuleID", InType::UInt64),
    Field::new("MethodToken", InType::UInt32),
    Field::new("MethodILSize", InType::UInt32),
    Field::new("MethodNamespace", InType::UnicodeString),
    Field::new("MethodName", InType::UnicodeString),
    Field::new("MethodSignature", InType::UnicodeString),
];

const METHOD_JITTING_STARTED_V1: &[Field] = &[
    Field::new("MethodID", InType::UInt64),
    Field::new("ModuleID", InType::UInt64),
    Field::new("MethodToken", InType::UInt32),
    Field::new("MethodILSize", InType::UInt32),
    Field::new("MethodNamespace", InType::UnicodeString),
    Field::new("MethodName", InType::UnicodeString),
    Field::new("MethodSignature", InType::UnicodeString),
    Field::new("ClrInstanceID", InType::UInt16),
];

/// Schemas of the supported runtime events, one per (event id, version)
pub static SCHEMAS: &[Schema] = &[
    // GarbageCollection
    runtime_schema!("GCStart",
        id: GC_START_ID, version: 0,
        task: (task::GARBAGE_COLLECTION, "GC"),
        opcode: (win_opcode::START, "win:Start"),
        level: Information, keyword: GC_KEYWORDS, fields: GC_START_V0,
    ),
    runtime_schema!("GCStart",
        id: GC_START_ID, version: 1,
        task: (task::GARBAGE_COLLECTION, "GC"),
        opcode: (win_opcode::START, "win:Start"),
        level: Information, keyword: GC_KEYWORDS, fields: GC_START_V1,
    ),
    runtime_schema!("GCStart",
        id: GC_START_ID, version: 2,
        task: (task::GARBAGE_COLLECTION, "GC"),
        opcode: (win_opcode::START, "win:Start"),
        level: Information, keyword: GC_KEYWORDS, fields: GC_START_V2,
    ),
    runtime_schema!("GCEnd",
        id: GC_END_ID, version: 0,
        task: (task::GARBAGE_COLLECTION, "GC"),
        opcode: (win_opcode::STOP, "win:Stop"),
        level: Information, keyword: GC_KEYWORDS, fields: GC_END_V0,
    ),
    runtime_schema!("GCEnd",
        id: GC_END_ID, version: 1,
        task: (task::GARBAGE_COLLECTION, "GC"),
        opcode: (win_opcode::STOP, "win:Stop"),
        level: Information, keyword: GC_KEYWORDS, fields: GC_END_V1,
    ),
    runtime_schema!("GCAllocationTick",
        id: GC_ALLOCATION_TICK_ID, version: 2,
        task: (task::GARBAGE_COLLECTION, "GC"),
        opcode: (opcode::GC_ALLOCATION_TICK, "AllocationTick"),
        level: Verbose, keyword: GC_KEYWORDS, fields: GC_ALLOCATION_TICK_V2,
    ),
    runtime_schema!("GCAllocationTick",
        id: GC_ALLOCATION_TICK_ID, version: 3,
        task: (task::GARBAGE_COLLECTION, "GC"),
        opcode: (opcode::GC_ALLOCATION_TICK, "AllocationTick"),
        level: Verbose, keyword: GC_KEYWORDS, fields: GC_ALLOCATION_TICK_V3,
    ),
    // Exception
    runtime_schema!("ExceptionThrown",
        id: EXCEPTION_THROWN_ID, version: 1,
        task: (task::EXCEPTION, "Exception"),
        opcode: (win_opcode::START, "win:Start"),
        level: Error,
        keyword: RuntimeKeywords::EXCEPTION.bits() | RuntimeKeywords::MONITORING.bits(),
        fields: EXCEPTION_THROWN_V1,
    ),
    // CLRStack
    runtime_schema!("ClrStackWalk",
        id: CLR_STACK_WALK_ID, version: 0,
        task: (task::CLR_STACK, "ClrStack"),
        opcode: (opcode::CLR_STACK_WALK, "Walk"),
        level: LogAlways,
        keyword: RuntimeKeywords::STACK.bits(),
        fields: STACK_WALK,
    ),
    // CLRMethod
    runtime_schema!("MethodLoad",
        id: METHOD_LOAD_ID, version: 0,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_LOAD, "MethodLoad"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V0,
    ),
    runtime_schema!("MethodLoad",
        id: METHOD_LOAD_ID, version: 1,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_LOAD, "MethodLoad"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V1,
    ),
    runtime_schema!("MethodLoad",
        id: METHOD_LOAD_ID, version: 2,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_LOAD, "MethodLoad"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V2,
    ),
    runtime_schema!("MethodUnload",
        id: METHOD_UNLOAD_ID, version: 0,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_UNLOAD, "MethodUnload"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V0,
    ),
    runtime_schema!("MethodUnload",
        id: METHOD_UNLOAD_ID, version: 1,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_UNLOAD, "MethodUnload"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V1,
    ),
    runtime_schema!("MethodUnload",
        id: METHOD_UNLOAD_ID, version: 2,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_UNLOAD, "MethodUnload"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V2,
    ),
    runtime_schema!("MethodLoadVerbose",
        id: METHOD_LOAD_VERBOSE_ID, version: 0,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_LOAD_VERBOSE, "MethodLoadVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V0,
    ),
    runtime_schema!("MethodLoadVerbose",
        id: METHOD_LOAD_VERBOSE_ID, version: 1,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_LOAD_VERBOSE, "MethodLoadVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V1,
    ),
    runtime_schema!("MethodLoadVerbose",
        id: METHOD_LOAD_VERBOSE_ID, version: 2,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_LOAD_VERBOSE, "MethodLoadVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V2,
    ),
    runtime_schema!("MethodUnloadVerbose",
        id: METHOD_UNLOAD_VERBOSE_ID, version: 0,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_UNLOAD_VERBOSE, "MethodUnloadVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V0,
    ),
    runtime_schema!("MethodUnloadVerbose",
        id: METHOD_UNLOAD_VERBOSE_ID, version: 1,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_UNLOAD_VERBOSE, "MethodUnloadVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V1,
    ),
    runtime_schema!("MethodUnloadVerbose",
        id: METHOD_UNLOAD_VERBOSE_ID, version: 2,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_UNLOAD_VERBOSE, "MethodUnloadVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V2,
    ),
    runtime_schema!("MethodJittingStarted",
        id: METHOD_JITTING_STARTED_ID, version: 0,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_JITTING_STARTED, "MethodJittingStarted"),
        level: Verbose,
        keyword: RuntimeKeywords::JIT.bits(),
        fields: METHOD_JITTING_STARTED_V0,
    ),
    runtime_schema!("MethodJittingStarted",
        id: METHOD_JITTING_STARTED_ID, version: 1,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_JITTING_STARTED, "MethodJittingStarted"),
        level: Verbose,
        keyword: RuntimeKeywords::JIT.bits(),
        fields: METHOD_JITTING_STARTED_V1,
    ),
    runtime_schema!("MethodILToNativeMap",
        id: METHOD_IL_TO_NATIVE_MAP_ID, version: 0,
        task: (task::CLR_METHOD, "CLRMethod"),
        opcode: (opcode::METHOD_IL_TO_NATIVE_MAP, "MethodILToNativeMap"),
        level: Verbose,
        keyword: RuntimeKeywords::JITTED_METHOD_IL_TO_NATIVE_MAP.bits(),
        fields: METHOD_IL_TO_NATIVE_MAP,
    ),
    // CLRLoader
    runtime_schema!("ModuleLoad",
        id: MODULE_LOAD_ID, version: 1,
        task: (task::CLR_LOADER, "CLRLoader"),
        opcode: (opcode::MODULE_LOAD, "ModuleLoad"),
        level: Information, keyword: LOADER_KEYWORDS, fields: MODULE_V1,
    ),
    runtime_schema!("ModuleLoad",
        id: MODULE_LOAD_ID, version: 2,
        task: (task::CLR_LOADER, "CLRLoader"),
        opcode: (opcode::MODULE_LOAD, "ModuleLoad"),
        level: Information, keyword: LOADER_KEYWORDS, fields: MODULE_V2,
    ),
    runtime_schema!("ModuleUnload",
        id: MODULE_UNLOAD_ID, version: 1,
        task: (task::CLR_LOADER, "CLRLoader"),
        opcode: (opcode::MODULE_UNLOAD, "ModuleUnload"),
        level: Information, keyword: LOADER_KEYWORDS, fields: MODULE_V1,
    ),
    runtime_schema!("ModuleUnload",
        id: MODULE_UNLOAD_ID, version: 2,
        task: (task::CLR_LOADER, "CLRLoader"),
        opcode: (opcode::MODULE_UNLOAD, "ModuleUnload"),
        level: Information, keyword: LOADER_KEYWORDS, fields: MODULE_V2,
    ),
    // CLRRuntimeInformation
    runtime_schema!("RuntimeInformationStart",
        id: RUNTIME_INFORMATION_START_ID, version: 0,
        task: (task::CLR_RUNTIME_INFORMATION, "CLRRuntimeInformation"),
        opcode: (win_opcode::START, "win:Start"),
        level: LogAlways, keyword: 0, fields: RUNTIME_INFORMATION,
    ),
];
