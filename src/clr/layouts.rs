// Payload layouts shared by both CLR providers
//
// Array fields refer to their count by index, so every edit to a layout must keep these indices in sync.
use crate::field::{Field, InType};

pub(crate) const CLR_INSTANCE_ONLY_V0: &[Field] = &[];

pub(crate) const CLR_INSTANCE_ONLY_V1: &[Field] = &[Field::new("ClrInstanceID", InType::UInt16)];

pub(crate) const STACK_WALK: &[Field] = &[
    Field::new("ClrInstanceID", InType::UInt16),
    Field::new("Reserved1", InType::UInt8),
    Field::new("Reserved2", InType::UInt8),
    Field::new("FrameCount", InType::UInt32),
    Field::array("Stack", InType::Pointer, 3),
];

pub(crate) const METHOD_V0: &[Field] = &[
    Field::new("MethodID", InType::UInt64),
    Field::new("ModuleID", InType::UInt64),
    Field::new("MethodStartAddress", InType::UInt64),
    Field::new("MethodSize", InType::UInt32),
    Field::new("MethodToken", InType::UInt32),
    Field::new("MethodFlags", InType::HexInt32),
];

pub(crate) const METHOD_V1: &[Field] = &[
    Field::new("MethodID", InType::UInt64),
    Field::new("ModuleID", InType::UInt64),
    Field::new("MethodStartAddress", InType::UInt64),
    Field::new("MethodSize", InType::UInt32),
    Field::new("MethodToken", InType::UInt32),
    Field::new("MethodFlags", InType::HexInt32),
    Field::new("ClrInstanceID", InType::UInt16),
];

pub(crate) const METHOD_V2: &[Field] = &[
    Field::new("MethodID", InType::UInt64),
    Field::new("ModuleID", InType::UInt64),
    Field::new("MethodStartAddress", InType::UInt64),
    Field::new("MethodSize", InType::UInt32),
    Field::new("MethodToken", InType::UInt32),
    Field::new("MethodFlags", InType::HexInt32),
    Field::new("ClrInstanceID", InType::UInt16),
    Field::new("ReJITID", InType::UInt64),
];

pub(crate) const METHOD_VERBOSE_V0: &[Field] = &[
    Field::new("MethodID", InType::UInt64),
    Field::new("ModuleID", InType::UInt64),
    Field::new("MethodStartAddress", InType::UInt64),
    Field::new("MethodSize", InType::UInt32),
    Field::new("MethodToken", InType::UInt32),
    Field::new("MethodFlags", InType::HexInt32),
    Field::new("MethodNamespace", InType::UnicodeString),
    Field::new("MethodName", InType::UnicodeString),
    Field::new("MethodSignature", InType::UnicodeString),
];

pub(crate) const METHOD_VERBOSE_V1: &[Field] = &[
    Field::new("MethodID", InType::UInt64),
    Field::new("ModuleID", InType::UInt64),
    Field::new("MethodStartAddress", InType::UInt64),
    Field::new("MethodSize", InType::UInt32),
    Field::new("MethodToken", InType::UInt32),
    Field::new("MethodFlags", InType::HexInt32),
    Field::new("MethodNamespace", InType::UnicodeString),
    Field::new("MethodName", InType::UnicodeString),
    Field::new("MethodSignature", InType::UnicodeString),
    Field::new("ClrInstanceID", InType::UInt16),
];

pub(crate) const METHOD_VERBOSE_V2: &[Field] = &[
    Field::new("MethodID", InType::UInt64),
    Field::new("ModuleID", InType::UInt64),
    Field::new("MethodStartAddress", InType::UInt64),
    Field::new("MethodSize", InType::UInt32),
    Field::new("MethodToken", InType::UInt32),
    Field::new("MethodFlags", InType::HexInt32),
    Field::new("MethodNamespace", InType::UnicodeString),
    Field::new("MethodName", InType::UnicodeString),
    Field::new("MethodSignature", InType::UnicodeString),
    Field::new("ClrInstanceID", InType::UInt16),
    Field::new("ReJITID", InType::UInt64),
];

pub(crate) const METHOD_IL_TO_NATIVE_MAP: &[Field] = &[
    Field::new("MethodID", InType::UInt64),
    Field::new("ReJITID", InType::UInt64),
    Field::new("MethodExtent", InType::UInt8),
    Field::new("CountOfMapEntries", InType::UInt16),
    Field::array("ILOffsets", InType::UInt32, 3),
    Field::array("NativeOffsets", InType::UInt32, 3),
    Field::new("ClrInstanceID", InType::UInt16),
];

pub(crate) const MODULE_V0: &[Field] = &[
    Field::new("ModuleID", InType::UInt64),
    Field::new("AssemblyID", InType::UInt64),
    Field::new("ModuleFlags", InType::HexInt32),
    Field::new("Reserved1", InType::UInt32),
    Field::new("ModuleILPath", InType::UnicodeString),
    Field::new("ModuleNativePath", InType::UnicodeString),
];

pub(crate) const MODULE_V1: &[Field] = &[
    Field::new("ModuleID", InType::UInt64),
    Field::new("AssemblyID", InType::UInt64),
    Field::new("ModuleFlags", InType::HexInt32),
    Field::new("Reserved1", InType::UInt32),
    Field::new("ModuleILPath", InType::UnicodeString),
    Field::new("ModuleNativePath", InType::UnicodeString),
    Field::new("ClrInstanceID", InType::UInt16),
];

pub(crate) const MODULE_V2: &[Field] = &[
    Field::new("ModuleID", InType::UInt64),
    Field::new("AssemblyID", InType::UInt64),
    Field::new("ModuleFlags", InType::HexInt32),
    Field::new("Reserved1", InType::UInt32),
    Field::new("ModuleILPath", InType::UnicodeString),
    Field::new("ModuleNativePath", InType::UnicodeString),
    Field::new("ClrInstanceID", InType::UInt16),
    Field::new("ManagedPdbSignature", InType::Guid),
    Field::new("ManagedPdbAge", InType::UInt32),
    Field::new("ManagedPdbBuildPath", InType::UnicodeString),
    Field::new("NativePdbSignature", InType::Guid),
    Field::new("NativePdbAge", InType::UInt32),
    Field::new("NativePdbBuildPath", InType::UnicodeString),
];

pub(crate) const RUNTIME_INFORMATION: &[Field] = &[
    Field::new("ClrInstanceID", InType::UInt16),
    Field::new("Sku", InType::UInt16),
    Field::new("BclMajorVersion", InType::UInt16),
    Field::new("BclMinorVersion", InType::UInt16),
    Field::new("BclBuildNumber", InType::UInt16),
    Field::new("BclQfeNumber", InType::UInt16),
    Field::new("VMMajorVersion", InType::UInt16),
    Field::new("VMMinorVersion", InType::UInt16),
    Field::new("VMBuildNumber", InType::UInt16),
    Field::new("VMQfeNumber", InType::UInt16),
    Field::new("StartupFlags", InType::UInt32),
    Field::new("StartupMode", InType::UInt8),
    Field::new("CommandLine", InType::UnicodeString),
    Field::new("ComObjectGuid", InType::Guid),
    Field::new("RuntimeDllPath", InType::UnicodeString),
];
