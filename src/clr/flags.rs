//! Flag and value maps of CLR event fields
//!
//! Flags are decoded with [`from_bits_retain`](MethodFlags::from_bits_retain): bits a newer runtime may
//! set without a name here are kept, and can still be read with `bits()`.
//!
//! Value maps are exposed through [`ValueMap`](crate::parser::ValueMap), which keeps the raw integer as well.
use num_traits::FromPrimitive;

bitflags! {
    /// `MethodFlags` of the method load, unload and rundown events
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodFlags: u32 {
        const DYNAMIC = 0x1;
        const GENERIC = 0x2;
        const HAS_SHARED_GENERIC_CODE = 0x4;
        const JITTED = 0x8;
        const JIT_HELPER = 0x10;
        const PROFILER_REJECTED_PRECOMPILED_CODE = 0x20;
        const READY_TO_RUN_REJECTED_PRECOMPILED_CODE = 0x40;
    }
}

/// Code generation tier of a method, stored in bits 7 to 9 of [`MethodFlags`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum OptimizationTier {
    Unknown = 0,
    MinOptJitted = 1,
    Optimized = 2,
    QuickJitted = 3,
    OptimizedTier1 = 4,
    ReadyToRun = 5,
    PreJIT = 6,
    Interpreted = 7,
}

impl MethodFlags {
    const OPTIMIZATION_TIER_SHIFT: u32 = 7;
    const OPTIMIZATION_TIER_MASK: u32 = 0x7;

    pub fn optimization_tier(&self) -> OptimizationTier {
        let tier = (self.bits() >> Self::OPTIMIZATION_TIER_SHIFT) & Self::OPTIMIZATION_TIER_MASK;
        OptimizationTier::from_u32(tier).unwrap_or(OptimizationTier::Unknown)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModuleFlags: u32 {
        const DOMAIN_NEUTRAL = 0x1;
        const NATIVE = 0x2;
        const DYNAMIC = 0x4;
        const MANIFEST = 0x8;
        const IBC_OPTIMIZED = 0x10;
        const READY_TO_RUN = 0x20;
        const PARTIAL_READY_TO_RUN = 0x40;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AssemblyFlags: u32 {
        const DOMAIN_NEUTRAL = 0x1;
        const DYNAMIC = 0x2;
        const NATIVE = 0x4;
        const COLLECTIBLE = 0x8;
        const READY_TO_RUN = 0x10;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AppDomainFlags: u32 {
        const DEFAULT = 0x1;
        const EXECUTABLE = 0x2;
        const SHARED = 0x4;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ThreadFlags: u32 {
        const GC_SPECIAL = 0x1;
        const FINALIZER = 0x2;
        const THREAD_POOL_WORKER = 0x4;
    }
}

bitflags! {
    /// How the runtime was configured when it started
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StartupFlags: u32 {
        const CONCURRENT_GC = 0x1;
        const LOADER_OPTIMIZATION_SINGLE_DOMAIN = 0x2;
        const LOADER_OPTIMIZATION_MULTI_DOMAIN = 0x4;
        const LOADER_SAFE_MODE = 0x10;
        const LOADER_SET_PREFERENCE = 0x100;
        const SERVER_GC = 0x1000;
        const HOARD_GC_VM = 0x2000;
        const SINGLE_VERSION_HOSTING_INTERFACE = 0x4000;
        const LEGACY_IMPERSONATION = 0x1_0000;
        const DISABLE_COMMIT_THREAD_STACK = 0x2_0000;
        const ALWAYS_FLOW_IMPERSONATION = 0x4_0000;
        const TRIM_GC_COMMIT = 0x8_0000;
        const ETW = 0x10_0000;
        const SERVER_BUILD = 0x20_0000;
        const ARM = 0x40_0000;
    }
}

bitflags! {
    /// How the runtime was started
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StartupMode: u8 {
        const MANAGED_EXE = 0x1;
        const HOSTED_CLR = 0x2;
        const IJW_DLL = 0x4;
        const COM_ACTIVATED = 0x8;
        const OTHER = 0x10;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExceptionThrownFlags: u16 {
        const HAS_INNER_EXCEPTION = 0x1;
        const NESTED = 0x2;
        const RETHROWN = 0x4;
        const CORRUPTED_STATE = 0x8;
        const CLS_COMPLIANT = 0x10;
    }
}

impl_try_parse_flags!(MethodFlags, u32);
impl_try_parse_flags!(ModuleFlags, u32);
impl_try_parse_flags!(AssemblyFlags, u32);
impl_try_parse_flags!(AppDomainFlags, u32);
impl_try_parse_flags!(ThreadFlags, u32);
impl_try_parse_flags!(StartupFlags, u32);
impl_try_parse_flags!(StartupMode, u8);
impl_try_parse_flags!(ExceptionThrownFlags, u16);

/// Why a garbage collection was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum GcReason {
    AllocSmall = 0,
    Induced = 1,
    LowMemory = 2,
    Empty = 3,
    AllocLarge = 4,
    OutOfSpaceSmallObjectHeap = 5,
    OutOfSpaceLargeObjectHeap = 6,
    InducedNoForce = 7,
    Stress = 8,
    InducedLowMemory = 9,
    InducedCompacting = 10,
    LowMemoryHost = 11,
    PmFullGc = 12,
    LowMemoryHostBlocking = 13,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum GcType {
    NonConcurrent = 0,
    Background = 1,
    Foreground = 2,
}

/// The heap an allocation tick was counted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum GcAllocationKind {
    Small = 0,
    Large = 1,
    Pinned = 2,
}

/// Which part of a method an IL to native map covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum MethodExtent {
    MainBody = 0,
    ColdBody = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum RuntimeSku {
    None = 0,
    DesktopClr = 1,
    CoreClr = 2,
    Mono = 4,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::ValueMap;

    #[test]
    fn test_unknown_flags_are_kept() {
        let flags = MethodFlags::from_bits_retain(0x8 | 0x1000_0000);
        assert!(flags.contains(MethodFlags::JITTED));
        assert!(!flags.contains(MethodFlags::GENERIC));
        assert_eq!(flags.bits(), 0x1000_0008);
    }

    #[test]
    fn test_optimization_tier() {
        let flags = MethodFlags::from_bits_retain(MethodFlags::JITTED.bits() | (4 << 7));
        assert_eq!(flags.optimization_tier(), OptimizationTier::OptimizedTier1);
        assert_eq!(
            MethodFlags::empty().optimization_tier(),
            OptimizationTier::Unknown
        );
    }

    #[test]
    fn test_value_maps() {
        assert_eq!(ValueMap::<GcReason>::new(1).value(), Some(GcReason::Induced));
        assert_eq!(ValueMap::<GcType>::new(7).value(), None);
        assert_eq!(ValueMap::<GcType>::new(7).raw(), 7);
    }
}
