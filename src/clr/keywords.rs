//! Keywords of the CLR providers
//!
//! The keyword of an event tells which categories must be enabled on a session for the event to be emitted.
//! The same bit does not always mean the same thing in both providers.

bitflags! {
    /// Keywords of `Microsoft-Windows-DotNETRuntime`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct RuntimeKeywords: u64 {
        const GC = 0x1;
        const GC_HANDLE = 0x2;
        const BINDER = 0x4;
        const LOADER = 0x8;
        const JIT = 0x10;
        const NGEN = 0x20;
        const START_ENUMERATION = 0x40;
        const END_ENUMERATION = 0x80;
        const SECURITY = 0x400;
        const APP_DOMAIN_RESOURCE_MANAGEMENT = 0x800;
        const JIT_TRACING = 0x1000;
        const INTEROP = 0x2000;
        const CONTENTION = 0x4000;
        const EXCEPTION = 0x8000;
        const THREADING = 0x1_0000;
        const JITTED_METHOD_IL_TO_NATIVE_MAP = 0x2_0000;
        const OVERRIDE_AND_SUPPRESS_NGEN_EVENTS = 0x4_0000;
        const TYPE = 0x8_0000;
        const GC_HEAP_DUMP = 0x10_0000;
        const GC_SAMPLED_OBJECT_ALLOCATION_HIGH = 0x20_0000;
        const GC_HEAP_SURVIVAL_AND_MOVEMENT = 0x40_0000;
        const GC_HEAP_COLLECT = 0x80_0000;
        const GC_HEAP_AND_TYPE_NAMES = 0x100_0000;
        const GC_SAMPLED_OBJECT_ALLOCATION_LOW = 0x200_0000;
        const PERF_TRACK = 0x2000_0000;
        const STACK = 0x4000_0000;
        const THREAD_TRANSFER = 0x8000_0000;
        const DEBUGGER = 0x1_0000_0000;
        const MONITORING = 0x2_0000_0000;
        const CODE_SYMBOLS = 0x4_0000_0000;
        const EVENT_SOURCE = 0x8_0000_0000;
        const COMPILATION = 0x10_0000_0000;
        const COMPILATION_DIAGNOSTIC = 0x20_0000_0000;
        const METHOD_DIAGNOSTIC = 0x40_0000_0000;
        const TYPE_DIAGNOSTIC = 0x80_0000_0000;
    }
}

bitflags! {
    /// Keywords of `Microsoft-Windows-DotNETRuntimeRundown`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct RundownKeywords: u64 {
        const LOADER = 0x8;
        const JIT = 0x10;
        const NGEN = 0x20;
        /// Enumerate when the session starts (DCStart events)
        const START_ENUMERATION = 0x40;
        /// Enumerate when the session stops (DCEnd events)
        const END_ENUMERATION = 0x100;
        const APP_DOMAIN_RESOURCE_MANAGEMENT = 0x800;
        const THREADING = 0x1_0000;
        const JITTED_METHOD_IL_TO_NATIVE_MAP = 0x2_0000;
        const OVERRIDE_AND_SUPPRESS_NGEN_EVENTS = 0x4_0000;
        const PERF_TRACK = 0x2000_0000;
        const STACK = 0x4000_0000;
        const COMPILATION = 0x10_0000_0000;
    }
}

impl RundownKeywords {
    /// The keywords of the DCStart/DCEnd Complete and Init events
    pub const ENUMERATION_MARKERS: RundownKeywords = RundownKeywords::LOADER
        .union(RundownKeywords::JIT)
        .union(RundownKeywords::NGEN)
        .union(RundownKeywords::START_ENUMERATION)
        .union(RundownKeywords::END_ENUMERATION)
        .union(RundownKeywords::APP_DOMAIN_RESOURCE_MANAGEMENT)
        .union(RundownKeywords::THREADING)
        .union(RundownKeywords::JITTED_METHOD_IL_TO_NATIVE_MAP)
        .union(RundownKeywords::OVERRIDE_AND_SUPPRESS_NGEN_EVENTS);
}
