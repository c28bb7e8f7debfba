//! `Microsoft-Windows-DotNETRuntimeRundown` events
//!
//! Rundown events come in pairs: `DCStart` ones are emitted when a session that enables
//! [`RundownKeywords::START_ENUMERATION`] starts, `DCEnd` ones when a session that enables
//! [`RundownKeywords::END_ENUMERATION`] stops. Each enumeration is bracketed by an `Init` and a `Complete` event.
use super::layouts::*;
use super::win_opcode;
use super::{RundownKeywords, RUNDOWN_PROVIDER, RUNDOWN_PROVIDER_NAME};
use crate::field::{Field, InType};
use crate::schema::Schema;

macro_rules! rundown_schema {
    ($($rest:tt)*) => {
        clr_schema!(RUNDOWN_PROVIDER, RUNDOWN_PROVIDER_NAME, $($rest)*)
    };
}

pub const CLR_STACK_WALK_ID: u16 = 0;
pub const METHOD_DC_START_ID: u16 = 141;
pub const METHOD_DC_END_ID: u16 = 142;
pub const METHOD_DC_START_VERBOSE_ID: u16 = 143;
pub const METHOD_DC_END_VERBOSE_ID: u16 = 144;
pub const DC_START_COMPLETE_ID: u16 = 145;
pub const DC_END_COMPLETE_ID: u16 = 146;
pub const DC_START_INIT_ID: u16 = 147;
pub const DC_END_INIT_ID: u16 = 148;
pub const METHOD_DC_START_IL_TO_NATIVE_MAP_ID: u16 = 149;
pub const METHOD_DC_END_IL_TO_NATIVE_MAP_ID: u16 = 150;
pub const DOMAIN_MODULE_DC_START_ID: u16 = 151;
pub const DOMAIN_MODULE_DC_END_ID: u16 = 152;
pub const MODULE_DC_START_ID: u16 = 153;
pub const MODULE_DC_END_ID: u16 = 154;
pub const ASSEMBLY_DC_START_ID: u16 = 155;
pub const ASSEMBLY_DC_END_ID: u16 = 156;
pub const APP_DOMAIN_DC_START_ID: u16 = 157;
pub const APP_DOMAIN_DC_END_ID: u16 = 158;
pub const THREAD_DC_END_ID: u16 = 159;
pub const RUNTIME_INFORMATION_DC_START_ID: u16 = 187;

pub mod task {
    pub const CLR_METHOD_RUNDOWN: u16 = 1;
    pub const CLR_LOADER_RUNDOWN: u16 = 2;
    pub const CLR_STACK_RUNDOWN: u16 = 11;
    pub const CLR_RUNTIME_INFORMATION_RUNDOWN: u16 = 19;
}

pub mod opcode {
    // CLRMethodRundown
    pub const DC_START_COMPLETE: u8 = 14;
    pub const DC_END_COMPLETE: u8 = 15;
    pub const DC_START_INIT: u8 = 16;
    pub const DC_END_INIT: u8 = 17;
    pub const METHOD_DC_START: u8 = 35;
    pub const METHOD_DC_END: u8 = 36;
    pub const METHOD_DC_START_VERBOSE: u8 = 39;
    pub const METHOD_DC_END_VERBOSE: u8 = 40;
    pub const METHOD_DC_START_IL_TO_NATIVE_MAP: u8 = 41;
    pub const METHOD_DC_END_IL_TO_NATIVE_MAP: u8 = 42;

    // CLRLoaderRundown
    pub const MODULE_DC_START: u8 = 35;
    pub const MODULE_DC_END: u8 = 36;
    pub const ASSEMBLY_DC_START: u8 = 39;
    pub const ASSEMBLY_DC_END: u8 = 40;
    pub const APP_DOMAIN_DC_START: u8 = 43;
    pub const APP_DOMAIN_DC_END: u8 = 44;
    pub const DOMAIN_MODULE_DC_START: u8 = 46;
    pub const DOMAIN_MODULE_DC_END: u8 = 47;
    pub const THREAD_DC_END: u8 = 48;

    // CLRStackRundown
    pub const CLR_STACK_WALK: u8 = 82;
}

const METHOD_KEYWORDS: u64 = RundownKeywords::JIT.bits() | RundownKeywords::NGEN.bits();
const MARKER_KEYWORDS: u64 = RundownKeywords::ENUMERATION_MARKERS.bits();
const LOADER_KEYWORDS: u64 = RundownKeywords::LOADER.bits();
const THREAD_KEYWORDS: u64 = RundownKeywords::APP_DOMAIN_RESOURCE_MANAGEMENT.bits()
    | RundownKeywords::THREADING.bits();

const DOMAIN_MODULE_V0: &[Field] = &[
    Field::new("ModuleID", InType::UInt64),
    Field::new("AssemblyID", InType::UInt64),
    Field::new("AppDomainID", InType::UInt64),
    Field::new("ModuleFlags", InType::HexInt32),
    Field::new("Reserved1", InType::UInt32),
    Field::new("ModuleILPath", InType::UnicodeString),
    Field::new("ModuleNativePath", InType::UnicodeString),
];

const DOMAIN_MODULE_V1: &[Field] = &[
    Field::new("ModuleID", InType::UInt64),
    Field::new("AssemblyID", InType::UInt64),
    Field::new("AppDomainID", InType::UInt64),
    Field::new("ModuleFlags", InType::HexInt32),
    Field::new("Reserved1", InType::UInt32),
    Field::new("ModuleILPath", InType::UnicodeString),
    Field::new("ModuleNativePath", InType::UnicodeString),
    Field::new("ClrInstanceID", InType::UInt16),
];

const ASSEMBLY_V0: &[Field] = &[
    Field::new("AssemblyID", InType::UInt64),
    Field::new("AppDomainID", InType::UInt64),
    Field::new("AssemblyFlags", InType::HexInt32),
    Field::new("FullyQualifiedAssemblyName", InType::UnicodeString),
];

const ASSEMBLY_V1: &[Field] = &[
    Field::new("AssemblyID", InType::UInt64),
    Field::new("AppDomainID", InType::UInt64),
    Field::new("BindingID", InType::UInt64),
    Field::new("AssemblyFlags", InType::HexInt32),
    Field::new("FullyQualifiedAssemblyName", InType::UnicodeString),
    Field::new("ClrInstanceID", InType::UInt16),
];

const APP_DOMAIN_V0: &[Field] = &[
    Field::new("AppDomainID", InType::UInt64),
    Field::new("AppDomainFlags", InType::HexInt32),
    Field::new("AppDomainName", InType::UnicodeString),
];

const APP_DOMAIN_V1: &[Field] = &[
    Field::new("AppDomainID", InType::UInt64),
    Field::new("AppDomainFlags", InType::HexInt32),
    Field::new("AppDomainName", InType::UnicodeString),
    Field::new("AppDomainIndex", InType::UInt32),
    Field::new("ClrInstanceID", InType::UInt16),
];

const THREAD: &[Field] = &[
    Field::new("ManagedThreadID", InType::UInt64),
    Field::new("AppDomainID", InType::UInt64),
    Field::new("Flags", InType::HexInt32),
    Field::new("ManagedThreadIndex", InType::UInt32),
    Field::new("OSThreadID", InType::UInt32),
    Field::new("ClrInstanceID", InType::UInt16),
];

/// Schemas of every rundown event, one per (event id, version)
pub static SCHEMAS: &[Schema] = &[
    rundown_schema!("ClrStackWalk",
        id: CLR_STACK_WALK_ID, version: 0,
        task: (task::CLR_STACK_RUNDOWN, "CLRStackRundown"),
        opcode: (opcode::CLR_STACK_WALK, "Walk"),
        level: LogAlways,
        keyword: RundownKeywords::STACK.bits(),
        fields: STACK_WALK,
    ),
    // MethodDCStart / MethodDCEnd
    rundown_schema!("MethodDCStart",
        id: METHOD_DC_START_ID, version: 0,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_START, "DCStart"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V0,
    ),
    rundown_schema!("MethodDCStart",
        id: METHOD_DC_START_ID, version: 1,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_START, "DCStart"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V1,
    ),
    rundown_schema!("MethodDCStart",
        id: METHOD_DC_START_ID, version: 2,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_START, "DCStart"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V2,
    ),
    rundown_schema!("MethodDCEnd",
        id: METHOD_DC_END_ID, version: 0,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_END, "DCStop"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V0,
    ),
    rundown_schema!("MethodDCEnd",
        id: METHOD_DC_END_ID, version: 1,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_END, "DCStop"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V1,
    ),
    rundown_schema!("MethodDCEnd",
        id: METHOD_DC_END_ID, version: 2,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_END, "DCStop"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_V2,
    ),
    // MethodDCStartVerbose / MethodDCEndVerbose
    rundown_schema!("MethodDCStartVerbose",
        id: METHOD_DC_START_VERBOSE_ID, version: 0,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_START_VERBOSE, "DCStartVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V0,
    ),
    rundown_schema!("MethodDCStartVerbose",
        id: METHOD_DC_START_VERBOSE_ID, version: 1,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_START_VERBOSE, "DCStartVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V1,
    ),
    rundown_schema!("MethodDCStartVerbose",
        id: METHOD_DC_START_VERBOSE_ID, version: 2,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_START_VERBOSE, "DCStartVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V2,
    ),
    rundown_schema!("MethodDCEndVerbose",
        id: METHOD_DC_END_VERBOSE_ID, version: 0,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_END_VERBOSE, "DCStopVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V0,
    ),
    rundown_schema!("MethodDCEndVerbose",
        id: METHOD_DC_END_VERBOSE_ID, version: 1,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_END_VERBOSE, "DCStopVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V1,
    ),
    rundown_schema!("MethodDCEndVerbose",
        id: METHOD_DC_END_VERBOSE_ID, version: 2,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_END_VERBOSE, "DCStopVerbose"),
        level: Verbose, keyword: METHOD_KEYWORDS, fields: METHOD_VERBOSE_V2,
    ),
    // Enumeration markers
    rundown_schema!("DCStartComplete",
        id: DC_START_COMPLETE_ID, version: 0,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::DC_START_COMPLETE, "DCStartComplete"),
        level: Information, keyword: MARKER_KEYWORDS, fields: CLR_INSTANCE_ONLY_V0,
    ),
    rundown_schema!("DCStartComplete",
        id: DC_START_COMPLETE_ID, version: 1,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::DC_START_COMPLETE, "DCStartComplete"),
        level: Information, keyword: MARKER_KEYWORDS, fields: CLR_INSTANCE_ONLY_V1,
    ),
    rundown_schema!("DCEndComplete",
        id: DC_END_COMPLETE_ID, version: 0,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::DC_END_COMPLETE, "DCEndComplete"),
        level: Information, keyword: MARKER_KEYWORDS, fields: CLR_INSTANCE_ONLY_V0,
    ),
    rundown_schema!("DCEndComplete",
        id: DC_END_COMPLETE_ID, version: 1,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::DC_END_COMPLETE, "DCEndComplete"),
        level: Information, keyword: MARKER_KEYWORDS, fields: CLR_INSTANCE_ONLY_V1,
    ),
    rundown_schema!("DCStartInit",
        id: DC_START_INIT_ID, version: 0,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::DC_START_INIT, "DCStartInit"),
        level: Information, keyword: MARKER_KEYWORDS, fields: CLR_INSTANCE_ONLY_V0,
    ),
    rundown_schema!("DCStartInit",
        id: DC_START_INIT_ID, version: 1,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::DC_START_INIT, "DCStartInit"),
        level: Information, keyword: MARKER_KEYWORDS, fields: CLR_INSTANCE_ONLY_V1,
    ),
    rundown_schema!("DCEndInit",
        id: DC_END_INIT_ID, version: 0,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::DC_END_INIT, "DCEndInit"),
        level: Information, keyword: MARKER_KEYWORDS, fields: CLR_INSTANCE_ONLY_V0,
    ),
    rundown_schema!("DCEndInit",
        id: DC_END_INIT_ID, version: 1,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::DC_END_INIT, "DCEndInit"),
        level: Information, keyword: MARKER_KEYWORDS, fields: CLR_INSTANCE_ONLY_V1,
    ),
    // IL to native maps
    rundown_schema!("MethodDCStartILToNativeMap",
        id: METHOD_DC_START_IL_TO_NATIVE_MAP_ID, version: 0,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_START_IL_TO_NATIVE_MAP, "MethodDCStartILToNativeMap"),
        level: Verbose,
        keyword: RundownKeywords::JITTED_METHOD_IL_TO_NATIVE_MAP.bits(),
        fields: METHOD_IL_TO_NATIVE_MAP,
    ),
    rundown_schema!("MethodDCEndILToNativeMap",
        id: METHOD_DC_END_IL_TO_NATIVE_MAP_ID, version: 0,
        task: (task::CLR_METHOD_RUNDOWN, "CLRMethodRundown"),
        opcode: (opcode::METHOD_DC_END_IL_TO_NATIVE_MAP, "MethodDCEndILToNativeMap"),
        level: Verbose,
        keyword: RundownKeywords::JITTED_METHOD_IL_TO_NATIVE_MAP.bits(),
        fields: METHOD_IL_TO_NATIVE_MAP,
    ),
    // Loader
    rundown_schema!("DomainModuleDCStart",
        id: DOMAIN_MODULE_DC_START_ID, version: 0,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::DOMAIN_MODULE_DC_START, "DomainModuleDCStart"),
        level: Information, keyword: LOADER_KEYWORDS, fields: DOMAIN_MODULE_V0,
    ),
    rundown_schema!("DomainModuleDCStart",
        id: DOMAIN_MODULE_DC_START_ID, version: 1,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::DOMAIN_MODULE_DC_START, "DomainModuleDCStart"),
        level: Information, keyword: LOADER_KEYWORDS, fields: DOMAIN_MODULE_V1,
    ),
    rundown_schema!("DomainModuleDCEnd",
        id: DOMAIN_MODULE_DC_END_ID, version: 0,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::DOMAIN_MODULE_DC_END, "DomainModuleDCStop"),
        level: Information, keyword: LOADER_KEYWORDS, fields: DOMAIN_MODULE_V0,
    ),
    rundown_schema!("DomainModuleDCEnd",
        id: DOMAIN_MODULE_DC_END_ID, version: 1,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::DOMAIN_MODULE_DC_END, "DomainModuleDCStop"),
        level: Information, keyword: LOADER_KEYWORDS, fields: DOMAIN_MODULE_V1,
    ),
    rundown_schema!("ModuleDCStart",
        id: MODULE_DC_START_ID, version: 0,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::MODULE_DC_START, "ModuleDCStart"),
        level: Information, keyword: LOADER_KEYWORDS, fields: MODULE_V0,
    ),
    rundown_schema!("ModuleDCStart",
        id: MODULE_DC_START_ID, version: 1,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::MODULE_DC_START, "ModuleDCStart"),
        level: Information, keyword: LOADER_KEYWORDS, fields: MODULE_V1,
    ),
    rundown_schema!("ModuleDCStart",
        id: MODULE_DC_START_ID, version: 2,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::MODULE_DC_START, "ModuleDCStart"),
        level: Information, keyword: LOADER_KEYWORDS, fields: MODULE_V2,
    ),
    rundown_schema!("ModuleDCEnd",
        id: MODULE_DC_END_ID, version: 0,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::MODULE_DC_END, "ModuleDCStop"),
        level: Information, keyword: LOADER_KEYWORDS, fields: MODULE_V0,
    ),
    rundown_schema!("ModuleDCEnd",
        id: MODULE_DC_END_ID, version: 1,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::MODULE_DC_END, "ModuleDCStop"),
        level: Information, keyword: LOADER_KEYWORDS, fields: MODULE_V1,
    ),
    rundown_schema!("ModuleDCEnd",
        id: MODULE_DC_END_ID, version: 2,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::MODULE_DC_END, "ModuleDCStop"),
        level: Information, keyword: LOADER_KEYWORDS, fields: MODULE_V2,
    ),
    rundown_schema!("AssemblyDCStart",
        id: ASSEMBLY_DC_START_ID, version: 0,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::ASSEMBLY_DC_START, "AssemblyDCStart"),
        level: Information, keyword: LOADER_KEYWORDS, fields: ASSEMBLY_V0,
    ),
    rundown_schema!("AssemblyDCStart",
        id: ASSEMBLY_DC_START_ID, version: 1,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::ASSEMBLY_DC_START, "AssemblyDCStart"),
        level: Information, keyword: LOADER_KEYWORDS, fields: ASSEMBLY_V1,
    ),
    rundown_schema!("AssemblyDCEnd",
        id: ASSEMBLY_DC_END_ID, version: 0,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::ASSEMBLY_DC_END, "AssemblyDCStop"),
        level: Information, keyword: LOADER_KEYWORDS, fields: ASSEMBLY_V0,
    ),
    rundown_schema!("AssemblyDCEnd",
        id: ASSEMBLY_DC_END_ID, version: 1,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::ASSEMBLY_DC_END, "AssemblyDCStop"),
        level: Information, keyword: LOADER_KEYWORDS, fields: ASSEMBLY_V1,
    ),
    rundown_schema!("AppDomainDCStart",
        id: APP_DOMAIN_DC_START_ID, version: 0,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::APP_DOMAIN_DC_START, "AppDomainDCStart"),
        level: Information, keyword: LOADER_KEYWORDS, fields: APP_DOMAIN_V0,
    ),
    rundown_schema!("AppDomainDCStart",
        id: APP_DOMAIN_DC_START_ID, version: 1,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::APP_DOMAIN_DC_START, "AppDomainDCStart"),
        level: Information, keyword: LOADER_KEYWORDS, fields: APP_DOMAIN_V1,
    ),
    rundown_schema!("AppDomainDCEnd",
        id: APP_DOMAIN_DC_END_ID, version: 0,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::APP_DOMAIN_DC_END, "AppDomainDCStop"),
        level: Information, keyword: LOADER_KEYWORDS, fields: APP_DOMAIN_V0,
    ),
    rundown_schema!("AppDomainDCEnd",
        id: APP_DOMAIN_DC_END_ID, version: 1,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::APP_DOMAIN_DC_END, "AppDomainDCStop"),
        level: Information, keyword: LOADER_KEYWORDS, fields: APP_DOMAIN_V1,
    ),
    rundown_schema!("ThreadDCEnd",
        id: THREAD_DC_END_ID, version: 0,
        task: (task::CLR_LOADER_RUNDOWN, "CLRLoaderRundown"),
        opcode: (opcode::THREAD_DC_END, "ThreadDCStop"),
        level: Information, keyword: THREAD_KEYWORDS, fields: THREAD,
    ),
    rundown_schema!("RuntimeInformationDCStart",
        id: RUNTIME_INFORMATION_DC_START_ID, version: 0,
        task: (task::CLR_RUNTIME_INFORMATION_RUNDOWN, "CLRRuntimeInformationRundown"),
        opcode: (win_opcode::START, "win:Start"),
        level: LogAlways, keyword: 0, fields: RUNTIME_INFORMATION,
    ),
];
